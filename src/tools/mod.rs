// src/tools/mod.rs
//
// One module per tool family. Every handler takes the shared state plus the
// raw argument object and returns a text result or a typed error; the
// registry turns errors into readable text for the calling agent.

pub mod balance;
pub mod issue;
pub mod mint;
pub mod network;
pub mod tokens;
pub mod transfer;
pub mod wallet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolError;
use crate::mcp::registry::{DuplicateToolName, ToolRegistry};

/// Deserializes the argument object into a tool's parameter struct. The
/// registry has already checked types and requiredness against the declared
/// schema, so a failure here means the two disagree.
fn parse_params<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::BadArguments(e.to_string()))
}

/// Registers the full tool catalogue.
pub fn register_all(registry: &mut ToolRegistry) -> Result<(), DuplicateToolName> {
    registry.register(balance::get_balance_of_address())?;
    registry.register(wallet::get_wallet_address())?;
    registry.register(wallet::create_wallet())?;
    registry.register(transfer::send_egld())?;
    registry.register(transfer::send_fungible_tokens())?;
    registry.register(transfer::send_sft_nft_meta_tokens())?;
    registry.register(issue::issue_fungible_token())?;
    registry.register(issue::issue_semi_fungible_collection())?;
    registry.register(issue::issue_nft_collection())?;
    registry.register(issue::issue_meta_esdt_collection())?;
    registry.register(mint::create_sft_nft_mesdt_tokens())?;
    registry.register(tokens::get_tokens_of_address())?;
    registry.register(transfer::send_egld_to_multiple_receivers())?;
    registry.register(network::get_network())?;
    Ok(())
}
