// src/network.rs

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// HTTP client name sent with every API request.
pub const CLIENT_NAME: &str = "mvx-mcp";

#[derive(Error, Debug)]
#[error("Invalid network: {given}. Allowed values: devnet, testnet, mainnet")]
pub struct UnknownNetwork {
    pub given: String,
}

/// The three supported MultiversX networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkId {
    Devnet,
    Testnet,
    Mainnet,
}

impl NetworkId {
    pub fn api_url(&self) -> &'static str {
        match self {
            NetworkId::Devnet => "https://devnet-api.multiversx.com",
            NetworkId::Testnet => "https://testnet-api.multiversx.com",
            NetworkId::Mainnet => "https://api.multiversx.com",
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            NetworkId::Devnet => "https://devnet-explorer.multiversx.com",
            NetworkId::Testnet => "https://testnet-explorer.multiversx.com",
            NetworkId::Mainnet => "https://explorer.multiversx.com",
        }
    }

    /// Chain id carried in every signed transaction.
    pub fn chain_id(&self) -> &'static str {
        match self {
            NetworkId::Devnet => "D",
            NetworkId::Testnet => "T",
            NetworkId::Mainnet => "1",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NetworkId::Devnet => "devnet",
            NetworkId::Testnet => "testnet",
            NetworkId::Mainnet => "mainnet",
        }
    }
}

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(NetworkId::Devnet),
            "testnet" => Ok(NetworkId::Testnet),
            "mainnet" => Ok(NetworkId::Mainnet),
            other => Err(UnknownNetwork {
                given: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Environment-specific endpoints plus the long-lived HTTP connector.
/// Constructed once at startup and shared by every handler; tests build one
/// with [`Endpoints::new`] pointing at a fake server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_url: String,
    pub explorer_url: String,
    pub chain_id: String,
    client: reqwest::Client,
}

impl Endpoints {
    pub fn new(
        api_url: impl Into<String>,
        explorer_url: impl Into<String>,
        chain_id: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(CLIENT_NAME)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_url: api_url.into(),
            explorer_url: explorer_url.into(),
            chain_id: chain_id.into(),
            client,
        }
    }

    pub fn for_network(network: NetworkId) -> Self {
        Self::new(network.api_url(), network.explorer_url(), network.chain_id())
    }

    /// A provider bound to this environment's API, reusing the shared connector.
    pub fn provider(&self) -> crate::blockchain::provider::ApiNetworkProvider {
        crate::blockchain::provider::ApiNetworkProvider::new(self.client.clone(), &self.api_url)
    }

    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/transactions/{}", self.explorer_url, tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_networks() {
        assert_eq!("devnet".parse::<NetworkId>().unwrap(), NetworkId::Devnet);
        assert_eq!("testnet".parse::<NetworkId>().unwrap(), NetworkId::Testnet);
        assert_eq!("mainnet".parse::<NetworkId>().unwrap(), NetworkId::Mainnet);
    }

    #[test]
    fn rejects_unknown_network() {
        let err = "localnet".parse::<NetworkId>().unwrap_err();
        assert!(err.to_string().contains("localnet"));
        assert!(err.to_string().contains("devnet, testnet, mainnet"));
    }

    #[test]
    fn endpoints_resolve_per_network() {
        let endpoints = Endpoints::for_network(NetworkId::Devnet);
        assert_eq!(endpoints.api_url, "https://devnet-api.multiversx.com");
        assert_eq!(endpoints.chain_id, "D");
        assert_eq!(
            endpoints.explorer_tx_url("abcd"),
            "https://devnet-explorer.multiversx.com/transactions/abcd"
        );
    }
}
