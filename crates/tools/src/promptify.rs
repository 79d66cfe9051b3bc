//! Promptify tool — rewrites a raw request as a structured prompt.
//!
//! Purely local: whitespace is collapsed, a couple of product names are
//! canonicalized, and the result is rendered into a fixed four-line template.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::{FieldKind, Tool, ToolResult, ToolSchema};
use regex_lite::Regex;
use std::sync::LazyLock;

const FALLBACK: &str = "Unable to generate a cleaned prompt at the moment.";

static YOLO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\byolo\s*v?(\d+)\b").expect("valid YOLO pattern"));
static ROS2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bros\s*2\b").expect("valid ROS2 pattern"));

const OBJECTIVE_PREFIX: &str = "Objective: ";

/// Collapse whitespace and canonicalize known product names.
pub fn normalize(raw_text: &str) -> String {
    let one_line = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let one_line = YOLO.replace_all(&one_line, "YOLOv${1}");
    ROS2.replace_all(&one_line, "ROS2").into_owned()
}

/// Render the structured prompt for `raw_text`.
pub fn promptify(raw_text: &str, task_hint: Option<&str>) -> String {
    let hint = task_hint.map(str::trim).filter(|h| !h.is_empty()).unwrap_or("none");
    format!(
        "Role: Senior robotics CV engineer\n\
         {OBJECTIVE_PREFIX}{}\n\
         Constraints: Be specific, actionable, and minimal.\n\
         Hint: {hint}",
        normalize(raw_text)
    )
}

/// Extract the objective text from a rendered prompt.
pub fn objective_of(prompt: &str) -> Option<&str> {
    prompt.lines().find_map(|line| line.strip_prefix(OBJECTIVE_PREFIX))
}

pub struct PromptifyTool;

#[async_trait]
impl Tool for PromptifyTool {
    fn name(&self) -> &str {
        "promptify_text"
    }

    fn description(&self) -> &str {
        "Clean up a raw request and render it as a structured prompt."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required("raw_text", FieldKind::String, "The raw user request")
            .optional("task_hint", FieldKind::String, "Optional hint about the task")
    }

    fn fallback(&self) -> Option<&str> {
        Some(FALLBACK)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let raw_text = arguments["raw_text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'raw_text' argument".into()))?;
        let task_hint = arguments["task_hint"].as_str();

        Ok(ToolResult::success(promptify(raw_text, task_hint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_four_line_template() {
        let prompt = promptify("  fix   the\tcamera\nnode ", None);
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Role: Senior robotics CV engineer",
                "Objective: fix the camera node",
                "Constraints: Be specific, actionable, and minimal.",
                "Hint: none",
            ]
        );
    }

    #[test]
    fn canonicalizes_product_names() {
        let prompt = promptify("check yolo5 and ROS 2 setup", None);
        let objective = objective_of(&prompt).unwrap();
        assert!(objective.contains("YOLOv5"));
        assert!(objective.contains("ROS2"));
        assert_eq!(objective, "check YOLOv5 and ROS2 setup");
    }

    #[test]
    fn canonicalization_variants() {
        assert_eq!(normalize("Yolo v8 on ros2"), "YOLOv8 on ROS2");
        assert_eq!(normalize("YOLOV11"), "YOLOv11");
        // Not a whole word, left alone
        assert_eq!(normalize("yolotron microsd2"), "yolotron microsd2");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "check yolo5 and ROS 2 setup",
            "  calibrate   yolo v7\n with ros  2 ",
            "plain request",
            "",
        ] {
            let first = promptify(raw, None);
            let objective = objective_of(&first).unwrap();
            let second = promptify(objective, None);
            assert_eq!(objective_of(&second).unwrap(), objective);
        }
    }

    #[test]
    fn hint_is_trimmed_or_none() {
        assert!(promptify("x", Some("  detection  ")).ends_with("Hint: detection"));
        assert!(promptify("x", Some("   ")).ends_with("Hint: none"));
        assert!(promptify("x", None).ends_with("Hint: none"));
    }

    #[tokio::test]
    async fn tool_execute_with_hint() {
        let result = PromptifyTool
            .execute(serde_json::json!({"raw_text": "tune yolo 5", "task_hint": "latency"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("Objective: tune YOLOv5"));
        assert!(result.output.ends_with("Hint: latency"));
    }
}
