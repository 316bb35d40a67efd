// src/blockchain/address.rs

use std::fmt;

use bech32::{Bech32, Hrp};
use thiserror::Error;

/// Human-readable part of every MultiversX address.
const HRP: &str = "erd";

pub const PUBKEY_LENGTH: usize = 32;

#[derive(Error, Debug)]
pub enum AddressError {
    #[error("not a valid bech32 string: {0}")]
    Bech32(String),
    #[error("wrong address prefix, expected '{HRP}'")]
    WrongHrp,
    #[error("address payload must be {PUBKEY_LENGTH} bytes")]
    WrongLength,
}

/// A MultiversX account address: the 32-byte ed25519 public key, rendered
/// as bech32 with the `erd` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address([u8; PUBKEY_LENGTH]);

impl Address {
    pub fn from_bech32(value: &str) -> Result<Self, AddressError> {
        let (hrp, data) =
            bech32::decode(value).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if hrp.as_str() != HRP {
            return Err(AddressError::WrongHrp);
        }
        let pubkey: [u8; PUBKEY_LENGTH] =
            data.try_into().map_err(|_| AddressError::WrongLength)?;
        Ok(Self(pubkey))
    }

    pub fn from_pubkey(pubkey: [u8; PUBKEY_LENGTH]) -> Self {
        Self(pubkey)
    }

    pub fn to_bech32(&self) -> String {
        let hrp = Hrp::parse_unchecked(HRP);
        bech32::encode::<Bech32>(hrp, &self.0).expect("32-byte payload always encodes")
    }

    pub fn pubkey(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }

    /// Hex form used inside ESDT call payloads.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}
