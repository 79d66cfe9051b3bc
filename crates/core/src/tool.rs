//! Tool trait — the abstraction over turn capabilities.
//!
//! Tools are the auxiliary calls a turn may make before replying: weather
//! lookup, prompt cleanup, text embedding. Each declares a typed input
//! schema so the registry can reject bad arguments before the tool runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ToolError;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a call with a freshly generated ID.
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: format!("call_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            arguments,
        }
    }
}

/// The result of a tool execution.
///
/// `success = false` marks an expected failure: either the tool could not
/// act on its input (a sentinel output) or the registry substituted the
/// tool's fallback after an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: false,
            output: output.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The JSON type a schema field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
}

impl FieldKind {
    fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One named input of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: String,
}

/// The declared input schema of a tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSchema {
    pub fields: Vec<SchemaField>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    pub fn required(mut self, name: &str, kind: FieldKind, description: &str) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            kind,
            required: true,
            description: description.into(),
        });
        self
    }

    /// Add an optional field. `null` is accepted in its place.
    pub fn optional(mut self, name: &str, kind: FieldKind, description: &str) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            kind,
            required: false,
            description: description.into(),
        });
        self
    }

    /// Render as a JSON Schema object.
    pub fn to_json(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    serde_json::json!({
                        "type": f.kind.json_type(),
                        "description": f.description,
                    }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Check an argument object against this schema.
    pub fn validate(&self, arguments: &serde_json::Value) -> Result<(), ToolError> {
        let args = arguments
            .as_object()
            .ok_or_else(|| ToolError::InvalidArguments("arguments must be a JSON object".into()))?;

        if let Some(unknown) = args.keys().find(|k| !self.fields.iter().any(|f| &f.name == *k)) {
            return Err(ToolError::InvalidArguments(format!("unknown field '{unknown}'")));
        }

        for field in &self.fields {
            match args.get(&field.name) {
                None | Some(serde_json::Value::Null) if field.required => {
                    return Err(ToolError::InvalidArguments(format!(
                        "missing required field '{}'",
                        field.name
                    )));
                }
                None | Some(serde_json::Value::Null) => {}
                Some(value) if !field.kind.accepts(value) => {
                    return Err(ToolError::InvalidArguments(format!(
                        "field '{}' must be of type {}",
                        field.name,
                        field.kind.json_type()
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// A tool description suitable for listing or for sending to a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// The core Tool trait.
///
/// Implementations return `Ok` for every outcome they can describe
/// themselves (including sentinel failures) and `Err` only when they could
/// not run at all.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "lookup_weather").
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// The typed input schema.
    fn schema(&self) -> ToolSchema;

    /// Output substituted when an invocation fails.
    fn fallback(&self) -> Option<&str> {
        None
    }

    /// Execute the tool with already-validated arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value {
        self.schema().to_json()
    }

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// Tools are registered once at start-up and looked up by name for every
/// call. Arguments are validated against the tool's schema before the tool
/// is invoked.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    timeout: Option<Duration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            timeout: None,
        }
    }

    /// Bound every invocation by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool call.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        tool.schema().validate(&call.arguments)?;
        debug!(tool = %call.name, call_id = %call.id, "Executing tool");

        let invocation = tool.execute(call.arguments.clone());
        let mut result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, invocation)
                .await
                .map_err(|_| ToolError::Timeout {
                    tool_name: call.name.clone(),
                    timeout_secs: limit.as_secs(),
                })??,
            None => invocation.await?,
        };

        result.call_id = call.id.clone();
        Ok(result)
    }

    /// Execute a tool call, substituting the tool's fallback on error.
    ///
    /// Never fails: an unknown tool or one without a fallback yields a
    /// failure result carrying the error text.
    pub async fn execute_or_fallback(&self, call: &ToolCall) -> ToolResult {
        match self.execute(call).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool invocation failed, using fallback");
                let output = self
                    .get(&call.name)
                    .and_then(|t| t.fallback())
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string());
                ToolResult {
                    call_id: call.id.clone(),
                    success: false,
                    output,
                    data: None,
                }
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
