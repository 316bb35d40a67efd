// src/tools/tokens.rs

use serde::Deserialize;

use crate::blockchain::address::Address;
use crate::error::ToolError;
use crate::mcp::registry::{ParamKind, ParamSpec, ToolContract, ToolResult};
use crate::tools::parse_params;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Deserialize)]
struct TokensParams {
    address: String,
    size: Option<u32>,
}

pub fn get_tokens_of_address() -> ToolContract {
    ToolContract {
        name: "get-tokens-of-address",
        description: "Get the tokens of an address. Returns the first 25 fungible tokens and the first 25 NFTs, SFTs and MetaESDT. To get more tokens, specify the number of tokens you want to get. Will return the specified number of fungible tokens and the same number of non-fungible. The returned list will contain twice the number of tokens specified, if tokens are available.",
        params: vec![
            ParamSpec::required(
                "address",
                ParamKind::String,
                "The bech32 address of the account (erd1...)",
            ),
            ParamSpec::optional(
                "size",
                ParamKind::Number,
                "The number of each token type to be returned. By default, the number is 25.",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle(state, args))),
    }
}

async fn handle(state: AppState, args: serde_json::Value) -> Result<ToolResult, ToolError> {
    let params: TokensParams = parse_params(args)?;
    let address =
        Address::from_bech32(&params.address).map_err(|_| ToolError::InvalidAddress)?;
    let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);

    let provider = state.endpoints.provider();
    let bech32 = address.to_bech32();
    let esdts = provider.get_tokens(&bech32, size).await?;
    let nfts = provider.get_nfts(&bech32, size).await?;

    Ok(ToolResult::text(format!(
        "Found {} tokens:\n\nFungible tokens: {}\n\nNon-fungible tokens: {}",
        esdts.len() + nfts.len(),
        serde_json::to_string_pretty(&esdts)?,
        serde_json::to_string_pretty(&nfts)?
    )))
}
