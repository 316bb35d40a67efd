// src/mcp/registry.rs
//
// Declarative tool registry. Each tool is registered once with its name,
// description and parameter descriptors; listing and argument validation
// are derived from the same descriptors that dispatch uses, so the
// advertised schema can never drift from what handlers accept.

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use crate::error::ToolError;
use crate::AppState;

/// A single content item of a tool result. Only text content is produced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// What a tool call returns to the agent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem {
                kind: "text".to_string(),
                text: text.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    StringArray,
}

impl ParamKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number() || value.is_string(),
            ParamKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn schema(&self, description: &str) -> Value {
        match self {
            ParamKind::String => json!({ "type": "string", "description": description }),
            ParamKind::Number => json!({ "type": "number", "description": description }),
            ParamKind::StringArray => json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description
            }),
        }
    }
}

/// One declared parameter of a tool.
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

pub type Handler = Box<
    dyn Fn(AppState, Value) -> BoxFuture<'static, Result<ToolResult, ToolError>> + Send + Sync,
>;

/// A tool's full declaration: identity, schema and handler.
pub struct ToolContract {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub handler: Handler,
}

#[derive(Error, Debug)]
#[error("duplicate tool name: {0}")]
pub struct DuplicateToolName(pub &'static str);

/// Dispatch failures that surface as JSON-RPC errors rather than tool
/// results.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing or invalid required argument: '{0}'")]
    InvalidArguments(String),
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolContract>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, contract: ToolContract) -> Result<(), DuplicateToolName> {
        if self.tools.iter().any(|t| t.name == contract.name) {
            return Err(DuplicateToolName(contract.name));
        }
        self.tools.push(contract);
        Ok(())
    }

    /// Tool descriptors in registration order, as `tools/list` returns them.
    pub fn descriptors(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": input_schema(&tool.params),
                })
            })
            .collect();
        Value::Array(tools)
    }

    /// Runs a tool. Domain failures are rendered as text results so the
    /// calling agent can read them; only unknown tools and schema-invalid
    /// arguments escape as dispatch errors.
    pub async fn dispatch(
        &self,
        name: &str,
        args: Value,
        state: AppState,
    ) -> Result<ToolResult, DispatchError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        validate_args(&tool.params, &args)?;

        match (tool.handler)(state, args).await {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                Ok(ToolResult::text(err.to_string()))
            }
        }
    }
}

fn validate_args(params: &[ParamSpec], args: &Value) -> Result<(), DispatchError> {
    for param in params {
        match args.get(param.name) {
            Some(value) if !value.is_null() => {
                if !param.kind.matches(value) {
                    return Err(DispatchError::InvalidArguments(param.name.to_string()));
                }
            }
            _ if param.required => {
                return Err(DispatchError::InvalidArguments(param.name.to_string()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn input_schema(params: &[ParamSpec]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for param in params {
        properties.insert(param.name.to_string(), param.kind.schema(param.description));
        if param.required {
            required.push(Value::String(param.name.to_string()));
        }
    }
    json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": Value::Array(required),
    })
}
