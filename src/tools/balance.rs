// src/tools/balance.rs

use serde::Deserialize;

use crate::blockchain::address::Address;
use crate::blockchain::denominate::format_egld;
use crate::error::ToolError;
use crate::mcp::registry::{ParamKind, ParamSpec, ToolContract, ToolResult};
use crate::tools::parse_params;
use crate::AppState;

#[derive(Deserialize)]
struct BalanceParams {
    address: String,
}

pub fn get_balance_of_address() -> ToolContract {
    ToolContract {
        name: "get-balance-of-address",
        description: "Get the balance for a MultiversX address",
        params: vec![ParamSpec::required(
            "address",
            ParamKind::String,
            "The bech32 representation of the address",
        )],
        handler: Box::new(|state, args| Box::pin(handle(state, args))),
    }
}

async fn handle(state: AppState, args: serde_json::Value) -> Result<ToolResult, ToolError> {
    let params: BalanceParams = parse_params(args)?;
    let address =
        Address::from_bech32(&params.address).map_err(|_| ToolError::InvalidAddress)?;

    let provider = state.endpoints.provider();
    let account = provider.get_account(&address.to_bech32()).await?;

    Ok(ToolResult::text(format!(
        "The balance for {} is {} EGLD.",
        address.to_bech32(),
        format_egld(&account.balance)
    )))
}
