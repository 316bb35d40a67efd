// src/blockchain/token.rs

use crate::error::ToolError;

/// A token reference parsed from user input. A plain identifier
/// (`TICKER-randhex`) names a fungible token; an extended identifier
/// (`TICKER-randhex-noncehex`) names one specific NFT/SFT/MetaESDT unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReference {
    pub identifier: String,
    pub nonce: Option<u64>,
}

impl TokenReference {
    pub fn parse(value: &str) -> Result<Self, ToolError> {
        let invalid = || ToolError::InvalidTokenIdentifier(value.to_string());
        let parts: Vec<&str> = value.split('-').collect();
        match parts.as_slice() {
            [ticker, random] if !ticker.is_empty() && !random.is_empty() => Ok(Self {
                identifier: value.to_string(),
                nonce: None,
            }),
            [ticker, random, nonce_hex] if !ticker.is_empty() && !random.is_empty() => {
                let nonce = u64::from_str_radix(nonce_hex, 16).map_err(|_| invalid())?;
                Ok(Self {
                    identifier: format!("{}-{}", ticker, random),
                    nonce: Some(nonce),
                })
            }
            _ => Err(invalid()),
        }
    }
}
