// src/tools/wallet.rs

use std::fs;

use crate::blockchain::wallet::PemWallet;
use crate::config::{Config, WALLET_FILE_NAME};
use crate::error::ToolError;
use crate::mcp::registry::{ToolContract, ToolResult};
use crate::AppState;

pub fn get_wallet_address() -> ToolContract {
    ToolContract {
        name: "get-wallet-address",
        description: "Get the bech32 address of the wallet set in the environment config",
        params: Vec::new(),
        handler: Box::new(|state, _| Box::pin(handle_get_address(state))),
    }
}

pub fn create_wallet() -> ToolContract {
    ToolContract {
        name: "create-wallet",
        description: "Create a new wallet and save it as a PEM file. PEM file ARE NOT SECURE. If a wallet already exists, will abort operation.",
        params: Vec::new(),
        handler: Box::new(|state, _| Box::pin(handle_create(state))),
    }
}

async fn handle_get_address(state: AppState) -> Result<ToolResult, ToolError> {
    let wallet = PemWallet::load_from_config(&state.config)?;
    Ok(ToolResult::text(format!(
        "The bech32 address is {}.",
        wallet.address().to_bech32()
    )))
}

async fn handle_create(_state: AppState) -> Result<ToolResult, ToolError> {
    let dir = Config::default_wallet_dir();
    fs::create_dir_all(&dir).map_err(|e| ToolError::WalletSaveFailed(e.to_string()))?;

    let path = dir.join(WALLET_FILE_NAME);
    if path.exists() {
        // Deliberately a success result: refusing to overwrite is the
        // expected outcome, not a failure.
        return Ok(ToolResult::text(format!(
            "A wallet exists at location {}. Will not overwrite it.",
            path.display()
        )));
    }

    let wallet = PemWallet::generate();
    wallet.save(&path)?;

    Ok(ToolResult::text(format!(
        "A wallet has been created and saved as a PEM file at: {}. PEM files ARE NOT SECURE.\nIf you want to further use the generated wallet, make sure to fund it first and set the absolute path in the config file under the \"MVX_WALLET\" environment variable.",
        path.display()
    )))
}
