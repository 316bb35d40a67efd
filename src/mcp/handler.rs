// src/mcp/handler.rs
//
// JSON-RPC method routing for the MCP surface. Tool semantics live in the
// registry; this module only speaks the protocol.

use serde_json::{json, Value};
use tracing::info;

use crate::mcp::protocol::{error_codes, Request, Response};
use crate::mcp::registry::{DispatchError, ToolRegistry};
use crate::AppState;

pub const SERVER_NAME: &str = "multiversx-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Returns `None` for notifications, which must not be answered.
pub async fn handle_mcp_request(
    req: Request,
    state: AppState,
    registry: &ToolRegistry,
) -> Option<Response> {
    if req.is_notification() {
        return None;
    }
    Some(route(req, state, registry).await)
}

async fn route(req: Request, state: AppState, registry: &ToolRegistry) -> Response {
    match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => Response::success(
            req.id,
            json!({ "tools": registry.descriptors() }),
        ),
        "tools/call" => handle_tools_call(req, state, registry).await,
        other => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", other),
        ),
    }
}

fn handle_initialize(req: &Request) -> Response {
    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "instructions":
                "MultiversX MCP server for wallet management, EGLD and token transfers, and token issuance.",
        }),
    )
}

async fn handle_tools_call(req: Request, state: AppState, registry: &ToolRegistry) -> Response {
    let params = req.params.unwrap_or(Value::Null);
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return Response::error(
            req.id,
            error_codes::INVALID_PARAMS,
            "tools/call requires a 'name' parameter".to_string(),
        );
    };
    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    info!(tool = name, "tools/call");
    match registry.dispatch(name, args, state).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => Response::success(req.id, value),
            Err(e) => Response::error(req.id, error_codes::INTERNAL_ERROR, e.to_string()),
        },
        Err(err @ DispatchError::UnknownTool(_)) => {
            Response::error(req.id, error_codes::METHOD_NOT_FOUND, err.to_string())
        }
        Err(err @ DispatchError::InvalidArguments(_)) => {
            Response::error(req.id, error_codes::INVALID_PARAMS, err.to_string())
        }
    }
}
