// src/config.rs

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::network::NetworkId;

/// File name of the wallet created by the `create-wallet` tool.
pub const WALLET_FILE_NAME: &str = "wallet.pem";

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// The active MultiversX network. Selects API, explorer and chain id.
    pub network: NetworkId,

    /// Path to the PEM wallet file used for signing. Tools that only read
    /// network state work without it.
    pub wallet_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let network = env::var("MVX_NETWORK")
            .context("MVX_NETWORK must be set to one of: devnet, testnet, mainnet")?
            .parse::<NetworkId>()?;

        let wallet_path = env::var("MVX_WALLET").ok().map(PathBuf::from);

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            network,
            wallet_path,
        })
    }

    /// Directory where `create-wallet` persists new wallets (`~/.multiversx`).
    pub fn default_wallet_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".multiversx")
    }
}
