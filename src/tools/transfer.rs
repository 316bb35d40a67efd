// src/tools/transfer.rs
//
// Transfer tools. Each handler syncs the account nonce exactly once, then
// takes nonces locally for every transaction it builds, so dependent
// submissions never race on sequence numbers.

use num_bigint::BigUint;
use serde::Deserialize;

use crate::blockchain::account::Account;
use crate::blockchain::address::Address;
use crate::blockchain::denominate::{denominate, denominate_egld_value};
use crate::blockchain::token::TokenReference;
use crate::blockchain::transactions::{TransactionBuilder, MIN_GAS_LIMIT};
use crate::blockchain::wallet::PemWallet;
use crate::error::ToolError;
use crate::mcp::registry::{ParamKind, ParamSpec, ToolContract, ToolResult};
use crate::tools::parse_params;
use crate::AppState;

const META_ESDT_TYPE: &str = "MetaESDT";

#[derive(Deserialize)]
struct SendEgldParams {
    amount: String,
    receiver: String,
}

#[derive(Deserialize)]
struct SendFungibleParams {
    amount: String,
    token: String,
    receiver: String,
}

#[derive(Deserialize)]
struct SendTokensParams {
    token: String,
    amount: Option<String>,
    receiver: String,
}

#[derive(Deserialize)]
struct MultiReceiverParams {
    amount: String,
    receivers: Vec<String>,
}

pub fn send_egld() -> ToolContract {
    ToolContract {
        name: "send-egld",
        description: "Create a move balance transaction and send it. Will send EGLD using the wallet set in the env to the specified receiver.",
        params: vec![
            ParamSpec::required(
                "amount",
                ParamKind::String,
                "The amount of EGLD to send. This amount will then be denominated (1 EGLD=1000000000000000000)",
            ),
            ParamSpec::required(
                "receiver",
                ParamKind::String,
                "The bech32 address of the receiver (erd1...)",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle_send_egld(state, args))),
    }
}

pub fn send_fungible_tokens() -> ToolContract {
    ToolContract {
        name: "send-fungible-tokens",
        description: "Create a fungible token transfer transaction and send it. Will send the specified token using the wallet set in the env to the specified receiver.",
        params: vec![
            ParamSpec::required(
                "amount",
                ParamKind::String,
                "The amount to send. This amount will then be denominated.",
            ),
            ParamSpec::required(
                "token",
                ParamKind::String,
                "The identifier of the token to send.",
            ),
            ParamSpec::required(
                "receiver",
                ParamKind::String,
                "The bech32 address of the receiver (erd1...)",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle_send_fungible(state, args))),
    }
}

pub fn send_sft_nft_meta_tokens() -> ToolContract {
    ToolContract {
        name: "send-sft-nft-meta-tokens",
        description: "Create a nft, sft or meta esdt transfer transaction and send it. Will send the specified token using the wallet set in the env to the specified receiver.",
        params: vec![
            ParamSpec::required(
                "token",
                ParamKind::String,
                "The extended identifier of the token to send (e.g. NFTEST-123456-0a).",
            ),
            ParamSpec::optional(
                "amount",
                ParamKind::String,
                "The amount of tokens to send. ONLY needed for SFT or Meta-ESDT.",
            ),
            ParamSpec::required(
                "receiver",
                ParamKind::String,
                "The bech32 address of the receiver (erd1...)",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle_send_tokens(state, args))),
    }
}

pub fn send_egld_to_multiple_receivers() -> ToolContract {
    ToolContract {
        name: "send-egld-to-multiple-receivers",
        description: "Create move balance transactions and send them. Will send EGLD using the wallet set in the env to each specified receiver.",
        params: vec![
            ParamSpec::required(
                "amount",
                ParamKind::String,
                "The amount of EGLD to send. This amount will then be denominated (1 EGLD=1000000000000000000)",
            ),
            ParamSpec::required(
                "receivers",
                ParamKind::StringArray,
                "An array of bech32 addresses of the receivers (erd1...)",
            ),
        ],
        handler: Box::new(|state, args| Box::pin(handle_multi_receiver(state, args))),
    }
}

async fn handle_send_egld(state: AppState, args: serde_json::Value) -> Result<ToolResult, ToolError> {
    let params: SendEgldParams = parse_params(args)?;
    let receiver =
        Address::from_bech32(&params.receiver).map_err(|_| ToolError::InvalidAddress)?;
    let denominated = denominate_egld_value(&params.amount)?;

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();

    let on_network = account.sync_from_network(&provider).await?;
    if denominated > on_network.balance {
        return Err(ToolError::InsufficientEgldBalance);
    }

    let nonce = account.get_nonce_then_increment();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);
    let tx = builder.native_transfer(nonce, &receiver, &denominated)?;
    let hash = provider.send_transaction(&tx).await?;

    Ok(ToolResult::text(format!(
        "{} EGLD have been sent to {}. Check out the transaction here: {}",
        params.amount,
        receiver.to_bech32(),
        state.endpoints.explorer_tx_url(&hash)
    )))
}

async fn handle_send_fungible(
    state: AppState,
    args: serde_json::Value,
) -> Result<ToolResult, ToolError> {
    let params: SendFungibleParams = parse_params(args)?;
    let receiver =
        Address::from_bech32(&params.receiver).map_err(|_| ToolError::InvalidAddress)?;

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();
    let sender = account.wallet.address().to_bech32();

    let held = provider.get_token_of_account(&sender, &params.token).await?;
    let denominated = denominate(&params.amount, held.decimals)?;
    if denominated > held.balance {
        return Err(ToolError::InsufficientTokenBalance);
    }

    account.sync_from_network(&provider).await?;
    let nonce = account.get_nonce_then_increment();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);
    let tx = builder.esdt_transfer(nonce, &receiver, &params.token, &denominated)?;
    let hash = provider.send_transaction(&tx).await?;

    Ok(ToolResult::text(format!(
        "{} of {} have been sent to {}. Check out the transaction here: {}",
        params.amount,
        params.token,
        receiver.to_bech32(),
        state.endpoints.explorer_tx_url(&hash)
    )))
}

async fn handle_send_tokens(
    state: AppState,
    args: serde_json::Value,
) -> Result<ToolResult, ToolError> {
    let params: SendTokensParams = parse_params(args)?;
    let receiver =
        Address::from_bech32(&params.receiver).map_err(|_| ToolError::InvalidAddress)?;
    let token = TokenReference::parse(&params.token)?;

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();
    let sender = account.wallet.address().to_bech32();

    let held = provider
        .get_nft_of_account(&sender, &params.token)
        .await
        .map_err(|_| ToolError::TokenFetchFailed)?;

    let final_amount = if held.token_type == META_ESDT_TYPE {
        let amount = params
            .amount
            .as_deref()
            .ok_or(ToolError::MissingMetaEsdtAmount)?;
        let denominated = denominate(amount, held.decimals)?;
        if denominated > held.balance {
            return Err(ToolError::InsufficientTokenBalance);
        }
        denominated
    } else {
        if held.balance < BigUint::from(1u32) {
            return Err(ToolError::InsufficientTokenBalance);
        }
        match &params.amount {
            Some(amount) => amount
                .parse::<BigUint>()
                .map_err(|_| ToolError::InvalidAmount(amount.clone()))?,
            None => BigUint::from(1u32),
        }
    };

    account.sync_from_network(&provider).await?;
    let nonce = account.get_nonce_then_increment();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);
    let tx = builder.esdt_nft_transfer(
        nonce,
        &receiver,
        &token.identifier,
        token.nonce.unwrap_or(0),
        &final_amount,
    )?;
    let hash = provider.send_transaction(&tx).await?;

    Ok(ToolResult::text(format!(
        "Token {} has been sent to {}. Check out the transaction here: {}",
        params.token,
        receiver.to_bech32(),
        state.endpoints.explorer_tx_url(&hash)
    )))
}

/// Fan-out native transfer. All addresses are validated and the total cost
/// (amount plus a gas reservation per transfer) is checked against the
/// balance before anything is submitted; submissions then run strictly in
/// receiver order, one at a time, and each receiver gets its own outcome
/// line so a partial failure is visible instead of silently dropped.
async fn handle_multi_receiver(
    state: AppState,
    args: serde_json::Value,
) -> Result<ToolResult, ToolError> {
    let params: MultiReceiverParams = parse_params(args)?;
    let denominated = denominate_egld_value(&params.amount)?;

    let receivers = params
        .receivers
        .iter()
        .map(|r| Address::from_bech32(r).map_err(|_| ToolError::InvalidAddress))
        .collect::<Result<Vec<_>, _>>()?;

    let wallet = PemWallet::load_from_config(&state.config)?;
    let mut account = Account::new(wallet);
    let provider = state.endpoints.provider();

    let on_network = account.sync_from_network(&provider).await?;
    let count = receivers.len() as u64;
    let required = &denominated * count + BigUint::from(MIN_GAS_LIMIT * count);
    if required > on_network.balance {
        return Err(ToolError::InsufficientEgldBalance);
    }

    let nonces: Vec<u64> = (0..receivers.len())
        .map(|_| account.get_nonce_then_increment())
        .collect();
    let builder = TransactionBuilder::new(&account.wallet, &state.endpoints.chain_id);

    let mut lines = vec![format!(
        "Sent {} EGLD to {} receivers:",
        params.amount,
        receivers.len()
    )];
    for (receiver, nonce) in receivers.iter().zip(nonces) {
        let tx = builder.native_transfer(nonce, receiver, &denominated)?;
        match provider.send_transaction(&tx).await {
            Ok(hash) => lines.push(format!(
                "{}: {}",
                receiver.to_bech32(),
                state.endpoints.explorer_tx_url(&hash)
            )),
            Err(err) => lines.push(format!(
                "{}: submission failed: {}",
                receiver.to_bech32(),
                err
            )),
        }
    }

    Ok(ToolResult::text(lines.join("\n")))
}
