//! `parley tools` — List registered tools and their input schemas.

use parley_config::AppConfig;
use parley_providers::DisabledProvider;
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = parley_tools::default_registry(Arc::new(DisabledProvider), config.embedding.model);

    println!("Registered tools");
    println!("================");
    for def in registry.definitions() {
        println!();
        println!("  {} — {}", def.name, def.description);
        let schema = serde_json::to_string_pretty(&def.parameters)?;
        for line in schema.lines() {
            println!("    {line}");
        }
    }
    println!();

    Ok(())
}
