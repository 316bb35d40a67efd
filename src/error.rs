// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

use crate::blockchain::provider::ProviderError;

/// Everything a tool handler can fail with. The dispatcher renders each
/// variant as a text result, so the calling agent always receives a
/// human-readable outcome instead of a protocol-level error.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid address. Please provide a bech32 address (erd1...)")]
    InvalidAddress,

    #[error("Invalid amount '{0}'. Please provide a base-10 decimal number.")]
    InvalidAmount(String),

    #[error("Token name is invalid. Length should be between 3 and 20 characters and contain only alphanumeric characters.")]
    InvalidTokenName,

    #[error("Token ticker is invalid. Length should be between 3 and 10 characters.")]
    InvalidTokenTicker,

    #[error("Invalid token identifier: {0}")]
    InvalidTokenIdentifier(String),

    #[error("No token amount provided for Meta ESDT")]
    MissingMetaEsdtAmount,

    #[error("Not enough EGLD balance")]
    InsufficientEgldBalance,

    #[error("The token amount you want to transfer is larger than the available amount")]
    InsufficientTokenBalance,

    #[error("Wallet path not set in config file.")]
    WalletNotConfigured,

    #[error("Wallet file does not exist at: {}", .0.display())]
    WalletFileMissing(PathBuf),

    #[error("MVX_WALLET points to a directory, not a file: {}", .0.display())]
    WalletPathIsDirectory(PathBuf),

    #[error("Invalid PEM wallet file: {0}")]
    InvalidWalletFile(String),

    #[error("Failed to save wallet: {0}")]
    WalletSaveFailed(String),

    #[error("Can't fetch token of the network")]
    TokenFetchFailed,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Issuance transaction {0} was not completed before the timeout")]
    IssuanceTimeout(String),

    #[error("Issuance transaction {0} failed on-chain")]
    IssuanceFailed(String),

    #[error("Invalid arguments: {0}")]
    BadArguments(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
