//! Weather lookup tool — deterministic stand-in for a weather API.
//!
//! Any named location gets the same canned report. Locations the tool cannot
//! act on produce the [`UNSUPPORTED_LOCATION`] sentinel as a failure result
//! rather than an error, so callers can answer with an apology.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::{FieldKind, Tool, ToolResult, ToolSchema};

/// Output returned when a location is empty or unknown.
pub const UNSUPPORTED_LOCATION: &str = "UNSUPPORTED_LOCATION";

const CANNED_REPORT: &str = "sunny with a temperature of 70 degrees.";

pub struct WeatherLookupTool;

/// Whether the tool can act on `location`.
pub fn is_supported_location(location: &str) -> bool {
    let normalized = location.trim().to_lowercase();
    !normalized.is_empty() && normalized != "unknown" && normalized != "n/a"
}

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        "lookup_weather"
    }

    fn description(&self) -> &str {
        "Look up the current weather for a location."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new().required(
            "location",
            FieldKind::String,
            "City or location for a weather lookup",
        )
    }

    fn fallback(&self) -> Option<&str> {
        Some(UNSUPPORTED_LOCATION)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let location = arguments["location"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'location' argument".into()))?;

        if !is_supported_location(location) {
            return Ok(ToolResult::failure(UNSUPPORTED_LOCATION));
        }

        Ok(ToolResult::success(CANNED_REPORT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn lookup(location: &str) -> ToolResult {
        WeatherLookupTool
            .execute(serde_json::json!({ "location": location }))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn lookup_returns_weather() {
        let result = lookup("Paris").await;
        assert!(result.success);
        assert_eq!(result.output, "sunny with a temperature of 70 degrees.");
    }

    #[tokio::test]
    async fn empty_and_unknown_locations_are_unsupported() {
        for location in ["", "   ", "unknown", " Unknown ", "N/A", "n/a"] {
            let result = lookup(location).await;
            assert!(!result.success, "{location:?} should be unsupported");
            assert_eq!(result.output, UNSUPPORTED_LOCATION);
        }
    }

    #[tokio::test]
    async fn missing_location_returns_error() {
        let result = WeatherLookupTool.execute(serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[test]
    fn tool_definition() {
        let def = WeatherLookupTool.to_definition();
        assert_eq!(def.name, "lookup_weather");
        assert_eq!(def.parameters["required"], serde_json::json!(["location"]));
    }
}
