// src/tools/issue.rs
//
// Token and collection issuance. Fungible issuance is a single transaction;
// collection issuance is a two-step workflow: the issue transaction is
// submitted and polled until the network assigns the collection identifier,
// then a set-special-roles transaction follows with the next nonce. That
// nonce is taken locally, never re-fetched, because the first transaction
// may not be visible on the network yet.

use num_bigint::BigUint;
use serde::Deserialize;

use crate::blockchain::account::Account;
use crate::blockchain::provider::IssueError;
use crate::blockchain::transactions::{TransactionBuilder, NFT_ROLES, SFT_ROLES};
use crate::blockchain::validation::{is_valid_token_name, is_valid_token_ticker};
use crate::blockchain::wallet::PemWallet;
use crate::error::ToolError;
use crate::mcp::registry::{ParamKind, ParamSpec, ToolContract, ToolResult};
use crate::tools::parse_params;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueFungibleParams {
    token_name: String,
    token_ticker: String,
    initial_supply: String,
    num_decimals: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueCollectionParams {
    token_name: String,
    token_ticker: String,
    #[serde(default)]
    num_decimals: Option<String>,
}

/// Which kind of collection a two-step issuance creates.
#[derive(Clone, Copy)]
enum CollectionKind {
    SemiFungible,
    NonFungible,
    MetaEsdt,
}

pub fn issue_fungible_token() -> ToolContract {
    ToolContract {
        name: "issue-fungible-token",
        description: "Create a transaction to issue a fungible token and send it. Will issue the token with the specified arguments. All the properties will be set to true.",
        params: vec![
            ParamSpec::required("tokenName", ParamKind::String, "The token name."),
            ParamSpec::required("tokenTicker", ParamKind::String, "The token ticker."),
            ParamSpec::required(
                "initialSupply",
                ParamKind::String,
                "The initial supply that will be minted.",
            ),
            ParamSpec::required(
                "numDecimals",
                ParamKind::String,
                "The number of decimals the token will have.",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle_issue_fungible(state, args))),
    }
}

pub fn issue_semi_fungible_collection() -> ToolContract {
    ToolContract {
        name: "issue-semi-fungible-collection",
        description: "Create a transaction to issue a semi-fungible collection (SFT) and send it. Will issue the collection with the specified arguments. All the properties will be set to true.",
        params: name_and_ticker_params(),
        handler: Box::new(|state, args| {
            Box::pin(handle_issue_collection(state, args, CollectionKind::SemiFungible))
        }),
    }
}

pub fn issue_nft_collection() -> ToolContract {
    ToolContract {
        name: "issue-nft-collection",
        description: "Create a transaction to issue a non-fungible token collection (NFT) and send it. Will issue the collection with the specified arguments. All the properties will be set to true.",
        params: name_and_ticker_params(),
        handler: Box::new(|state, args| {
            Box::pin(handle_issue_collection(state, args, CollectionKind::NonFungible))
        }),
    }
}

pub fn issue_meta_esdt_collection() -> ToolContract {
    let mut params = name_and_ticker_params();
    params.push(ParamSpec::required(
        "numDecimals",
        ParamKind::String,
        "The number of decimals.",
    ));
    ToolContract {
        name: "issue-meta-esdt-collection",
        description: "Create a transaction to issue a MetaESDT token collection (MESDT) and send it. Will issue the collection with the specified arguments. All the properties will be set to true.",
        params,
        handler: Box::new(|state, args| {
            Box::pin(handle_issue_collection(state, args, CollectionKind::MetaEsdt))
        }),
    }
}

fn name_and_ticker_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::required("tokenName", ParamKind::String, "The token name."),
        ParamSpec::required("tokenTicker", ParamKind::String, "The token ticker."),
    ]
}

fn validate_name_and_ticker(name: &str, ticker: &str) -> Result<(), ToolError> {
    if !is_valid_token_name(name) {
        return Err(ToolError::InvalidTokenName);
    }
    if !is_valid_token_ticker(ticker) {
        return Err(ToolError::InvalidTokenTicker);
    }
    Ok(())
}

fn completion_error(err: IssueError) -> ToolError {
    match err {
        IssueError::Provider(e) => ToolError::Provider(e),
        IssueError::Timeout(hash) => ToolError::IssuanceTimeout(hash),
        IssueError::Failed(hash) => ToolError::IssuanceFailed(hash),
    }
}

async fn handle_issue_fungible(
    state: AppState,
    args: serde_json::Value,
) -> Result<ToolResult, ToolError> {
    let params: IssueFungibleParams = parse_params(args)?;
    validate_name_and_ticker(&params.token_name, &params.token_ticker)?;

    let initial_supply = params
        .initial_supply
        .parse::<BigUint>()
        .map_err(|_| ToolError::InvalidAmount(params.initial_supply.clone()))?;
    let num_decimals = params
        .num_decimals
        .parse::<u32>()
        .map_err(|_| ToolError::InvalidAmount(params.num_decimals.clone()))?;

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();

    account.sync_from_network(&provider).await?;
    let nonce = account.get_nonce_then_increment();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);
    let tx = builder.issue_fungible(
        nonce,
        &params.token_name.to_uppercase(),
        &params.token_ticker.to_uppercase(),
        &initial_supply,
        num_decimals,
    )?;

    let hash = provider.send_transaction(&tx).await?;
    let token = provider
        .await_completed_issue(&hash)
        .await
        .map_err(completion_error)?;

    Ok(ToolResult::text(format!(
        "The transaction has been sent. Check out the transaction here: {}. The collection identifier is {}.",
        state.endpoints.explorer_tx_url(&hash),
        token
    )))
}

async fn handle_issue_collection(
    state: AppState,
    args: serde_json::Value,
    kind: CollectionKind,
) -> Result<ToolResult, ToolError> {
    let params: IssueCollectionParams = parse_params(args)?;
    validate_name_and_ticker(&params.token_name, &params.token_ticker)?;

    let num_decimals = match (kind, &params.num_decimals) {
        (CollectionKind::MetaEsdt, Some(text)) => text
            .parse::<u32>()
            .map_err(|_| ToolError::InvalidAmount(text.clone()))?,
        (CollectionKind::MetaEsdt, None) => {
            return Err(ToolError::BadArguments("numDecimals".to_string()))
        }
        _ => 0,
    };

    let name = params.token_name.to_uppercase();
    let ticker = params.token_ticker.to_uppercase();

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();

    account.sync_from_network(&provider).await?;
    let issue_nonce = account.get_nonce_then_increment();
    let roles_nonce = account.get_nonce_then_increment();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);

    let issue_tx = match kind {
        CollectionKind::SemiFungible => builder.issue_semi_fungible(issue_nonce, &name, &ticker)?,
        CollectionKind::NonFungible => builder.issue_non_fungible(issue_nonce, &name, &ticker)?,
        CollectionKind::MetaEsdt => {
            builder.register_meta_esdt(issue_nonce, &name, &ticker, num_decimals)?
        }
    };

    let issue_hash = provider.send_transaction(&issue_tx).await?;
    let token = provider
        .await_completed_issue(&issue_hash)
        .await
        .map_err(completion_error)?;

    let roles = match kind {
        CollectionKind::NonFungible => NFT_ROLES,
        CollectionKind::SemiFungible | CollectionKind::MetaEsdt => SFT_ROLES,
    };
    let roles_tx =
        builder.set_special_roles(roles_nonce, &token, account.wallet.address(), roles)?;
    let roles_hash = provider.send_transaction(&roles_tx).await?;

    Ok(ToolResult::text(format!(
        "The transaction has been sent. Check out the transaction here: {}. A transaction to set roles has also been sent: {}. The collection identifier is {} and should be used for creating tokens.",
        state.endpoints.explorer_tx_url(&issue_hash),
        state.endpoints.explorer_tx_url(&roles_hash),
        token
    )))
}
