//! `parley talk` — Interactive or single-message chat mode.

use parley_agent::{ChannelSink, Delivery, TurnEvent, TurnHandler, TurnOutcome, UsageCollector};
use parley_config::AppConfig;
use parley_core::event::EventBus;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(message: Option<String>, trace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  No API key configured: embeddings are disabled and will report 'unknown'.");
        eprintln!("  Set PARLEY_API_KEY or OPENAI_API_KEY (or add it to .env.local) to enable them.");
        eprintln!();
    }

    let provider = parley_providers::build_from_config(&config);
    let mut tools = parley_tools::default_registry(provider, config.embedding.model.clone());
    if let Some(timeout) = config.tools.timeout() {
        tools = tools.with_timeout(timeout);
    }

    let (sink, deliveries) = ChannelSink::new(8);
    let printer = tokio::spawn(print_deliveries(deliveries));
    let handler = TurnHandler::new(Arc::new(tools), Arc::new(sink), Arc::new(EventBus::default()));
    let mut usage = UsageCollector::new();

    if let Some(msg) = message {
        // Single message mode
        let outcome = handler.handle(&msg).await?;
        if trace {
            print_trace(&outcome);
        }
        usage.collect(&outcome);
    } else {
        // Interactive mode
        println!();
        println!("  Parley — Interactive Mode");
        println!("  Embeddings: {} ({})", config.embedding.model, config.embedding.provider);
        println!("  Type your message and press Enter. Type 'exit' or Ctrl+C to quit.");
        println!();

        let interrupted = async {
            // Without a signal handler, only exit words and EOF end the session.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        converse(&handler, BufReader::new(io::stdin()), interrupted, trace, &mut usage).await?;

        println!();
        println!("  Goodbye!");
    }

    drop(handler);
    let _ = printer.await;
    info!("Usage: {}", usage.summary());

    Ok(())
}

/// Run turns for each input line until EOF, an exit word, or `shutdown`.
async fn converse<R, S>(
    handler: &TurnHandler,
    input: R,
    shutdown: S,
    trace: bool,
    usage: &mut UsageCollector,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut lines = input.lines();
    prompt()?;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = &mut shutdown => {
                println!();
                break;
            }
        };
        let Some(line) = line else { break };

        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        let outcome = handler.handle(line).await?;
        if trace {
            print_trace(&outcome);
        }
        usage.collect(&outcome);

        println!();
        prompt()?;
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

/// Print each message as it arrives, then release the turn.
async fn print_deliveries(mut deliveries: mpsc::Receiver<Delivery>) {
    while let Some(delivery) = deliveries.recv().await {
        for line in delivery.message.content.lines() {
            println!("  Assistant > {line}");
        }
        let _ = std::io::stdout().flush();
        delivery.ack();
    }
}

fn print_trace(outcome: &TurnOutcome) {
    for event in &outcome.events {
        match event {
            TurnEvent::ToolCall { name, arguments, .. } => {
                println!("  [tool call] {name}({arguments})");
            }
            TurnEvent::ToolResult { name, output, success, .. } => {
                let marker = if *success { "" } else { " (failed)" };
                println!("  [tool result] {name}{marker}: {output}");
            }
            TurnEvent::Message { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_providers::DisabledProvider;
    use tokio::io::AsyncWriteExt;
    use tokio::sync::oneshot;

    /// A handler whose sink acks everything and reports each terminal message.
    fn handler() -> (TurnHandler, mpsc::UnboundedReceiver<String>) {
        let tools = parley_tools::default_registry(Arc::new(DisabledProvider), "text-embedding-3-large");
        let (sink, mut deliveries) = ChannelSink::new(4);
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(delivery) = deliveries.recv().await {
                if delivery.message.terminal {
                    let _ = done_tx.send(delivery.message.content.clone());
                }
                delivery.ack();
            }
        });
        let handler = TurnHandler::new(Arc::new(tools), Arc::new(sink), Arc::new(EventBus::default()));
        (handler, done_rx)
    }

    #[tokio::test]
    async fn exit_word_ends_session() {
        let (handler, _done) = handler();
        let input: &[u8] = b"What city was I born in?\n\nexit\nteach me hacking\n";
        let mut usage = UsageCollector::new();

        converse(&handler, input, std::future::pending(), false, &mut usage)
            .await
            .unwrap();

        let summary = usage.summary();
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.by_intent["personal_data_refusal"], 1);
    }

    #[tokio::test]
    async fn interrupt_ends_session_with_usage_kept() {
        let (handler, mut done) = handler();
        let (mut stdin, input) = tokio::io::duplex(64);
        let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();

        // Interrupt once the first turn has replied; stdin stays open.
        tokio::spawn(async move {
            stdin.write_all(b"weather in Paris\n").await.unwrap();
            done.recv().await.unwrap();
            interrupt_tx.send(()).unwrap();
            std::future::pending::<()>().await;
            drop(stdin);
        });

        let interrupted = async {
            let _ = interrupt_rx.await;
        };
        let mut usage = UsageCollector::new();
        converse(&handler, BufReader::new(input), interrupted, false, &mut usage)
            .await
            .unwrap();

        let summary = usage.summary();
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.by_intent["weather"], 1);
        assert_eq!(summary.tool_calls, 1);
    }
}
