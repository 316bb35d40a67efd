// src/tools/mint.rs

use num_bigint::BigUint;
use serde::Deserialize;

use crate::blockchain::account::Account;
use crate::blockchain::denominate::denominate;
use crate::blockchain::transactions::TransactionBuilder;
use crate::blockchain::wallet::PemWallet;
use crate::error::ToolError;
use crate::mcp::registry::{ParamKind, ParamSpec, ToolContract, ToolResult};
use crate::tools::parse_params;
use crate::AppState;

const META_ESDT_TYPE: &str = "MetaESDT";

/// Royalties are a percentage with two implied decimal digits on-chain
/// (10000 = 100%), so the human input is scaled by 100.
const ROYALTIES_DECIMALS: u32 = 2;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokensParams {
    token_identifier: String,
    name: String,
    #[serde(default)]
    initial_quantity: Option<String>,
    #[serde(default)]
    royalties: Option<String>,
}

pub fn create_sft_nft_mesdt_tokens() -> ToolContract {
    ToolContract {
        name: "create-sft-nft-mesdt-tokens",
        description: "Create a transaction to issue a semi-fungible token (SFT), or a non-fungible token (NFT), or a MetaESDT token for a collection and send it. Will issue the token with the specified arguments.",
        params: vec![
            ParamSpec::required(
                "tokenIdentifier",
                ParamKind::String,
                "The identifier of the collection.",
            ),
            ParamSpec::optional(
                "initialQuantity",
                ParamKind::String,
                "The initial quantity that will be minted. If not provided, defaults to 1.",
            ),
            ParamSpec::required("name", ParamKind::String, "The name of the token."),
            ParamSpec::optional(
                "royalties",
                ParamKind::String,
                "The royalties you'll receive.",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle(state, args))),
    }
}

async fn handle(state: AppState, args: serde_json::Value) -> Result<ToolResult, ToolError> {
    let params: CreateTokensParams = parse_params(args)?;

    let mut quantity = match &params.initial_quantity {
        Some(text) => text
            .parse::<BigUint>()
            .map_err(|_| ToolError::InvalidAmount(text.clone()))?,
        None => BigUint::from(1u32),
    };

    let royalties = match &params.royalties {
        Some(text) => {
            let scaled = denominate(text, ROYALTIES_DECIMALS)?;
            u64::try_from(&scaled).map_err(|_| ToolError::InvalidAmount(text.clone()))?
        }
        None => 0,
    };

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();

    account.sync_from_network(&provider).await?;

    // The collection definition names the canonical identifier and, for
    // MetaESDT, the decimals the minted quantity must be scaled by.
    let collection = provider
        .get_collection_definition(&params.token_identifier)
        .await?;
    if collection.token_type == META_ESDT_TYPE {
        quantity *= BigUint::from(10u32).pow(collection.decimals);
    }

    let nonce = account.get_nonce_then_increment();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);
    let tx = builder.nft_create(nonce, &collection.collection, &quantity, &params.name, royalties)?;
    let hash = provider.send_transaction(&tx).await?;

    Ok(ToolResult::text(format!(
        "The transaction has been sent. Check out the transaction here: {}.",
        state.endpoints.explorer_tx_url(&hash)
    )))
}
