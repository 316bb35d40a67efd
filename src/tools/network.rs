// src/tools/network.rs

use crate::error::ToolError;
use crate::mcp::registry::{ToolContract, ToolResult};
use crate::AppState;

pub fn get_network() -> ToolContract {
    ToolContract {
        name: "get-network",
        description: "Get the network set in the environment config",
        params: Vec::new(),
        handler: Box::new(|state, _| Box::pin(handle(state))),
    }
}

async fn handle(state: AppState) -> Result<ToolResult, ToolError> {
    Ok(ToolResult::text(format!(
        "The current used network is {}.",
        state.config.network
    )))
}
