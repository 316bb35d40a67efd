// src/blockchain/provider.rs
//
// Thin client for the MultiversX HTTP API. Only the endpoints the tools
// need are wrapped; everything else stays out.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::blockchain::transactions::Transaction;

/// How often a pending issuance transaction is re-checked.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);
/// How long to wait for an issuance transaction to settle.
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(90);

/// Log events that carry a freshly issued token identifier in their first
/// topic.
const ISSUE_EVENTS: &[&str] = &[
    "issue",
    "issueSemiFungible",
    "issueNonFungible",
    "registerMetaESDT",
];

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected API response: {0}")]
    Decode(String),
}

/// Outcome of waiting for an issuance transaction.
#[derive(Error, Debug)]
pub enum IssueError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("transaction {0} still pending")]
    Timeout(String),

    #[error("transaction {0} failed")]
    Failed(String),
}

/// Account state as reported by `/accounts/{address}`.
#[derive(Debug, Clone)]
pub struct AccountOnNetwork {
    pub nonce: u64,
    pub balance: BigUint,
}

/// A fungible or NFT-family token held by an account.
#[derive(Debug, Clone)]
pub struct TokenOfAccount {
    pub identifier: String,
    pub balance: BigUint,
    pub decimals: u32,
    pub token_type: String,
}

/// Collection-level definition from `/collections/{identifier}`.
#[derive(Debug, Clone)]
pub struct CollectionDefinition {
    pub collection: String,
    pub token_type: String,
    pub decimals: u32,
}

#[derive(Deserialize)]
struct RawAccount {
    nonce: u64,
    balance: String,
}

#[derive(Deserialize)]
struct RawToken {
    identifier: String,
    #[serde(default)]
    balance: Option<String>,
    #[serde(default)]
    decimals: Option<u32>,
    #[serde(rename = "type", default)]
    token_type: Option<String>,
}

#[derive(Deserialize)]
struct RawCollection {
    collection: String,
    #[serde(rename = "type")]
    token_type: String,
    #[serde(default)]
    decimals: Option<u32>,
}

#[derive(Deserialize)]
struct SendTransactionResponse {
    #[serde(rename = "txHash")]
    tx_hash: String,
}

pub struct ApiNetworkProvider {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ApiNetworkProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Overrides the issuance polling cadence. Tests shrink both values.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    async fn get_json(&self, path: &str) -> Result<Value, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn get_account(&self, address: &str) -> Result<AccountOnNetwork, ProviderError> {
        let value = self.get_json(&format!("/accounts/{}", address)).await?;
        let raw: RawAccount = serde_json::from_value(value).map_err(decode)?;
        Ok(AccountOnNetwork {
            nonce: raw.nonce,
            balance: parse_biguint(&raw.balance)?,
        })
    }

    /// One fungible token of an account, with its balance and decimals.
    pub async fn get_token_of_account(
        &self,
        address: &str,
        identifier: &str,
    ) -> Result<TokenOfAccount, ProviderError> {
        let value = self
            .get_json(&format!("/accounts/{}/tokens/{}", address, identifier))
            .await?;
        token_of_account(value)
    }

    /// One NFT/SFT/MetaESDT unit of an account, addressed by its extended
    /// identifier (`TICKER-randhex-noncehex`).
    pub async fn get_nft_of_account(
        &self,
        address: &str,
        extended_identifier: &str,
    ) -> Result<TokenOfAccount, ProviderError> {
        let value = self
            .get_json(&format!(
                "/accounts/{}/nfts/{}",
                address, extended_identifier
            ))
            .await?;
        token_of_account(value)
    }

    pub async fn get_collection_definition(
        &self,
        identifier: &str,
    ) -> Result<CollectionDefinition, ProviderError> {
        let value = self.get_json(&format!("/collections/{}", identifier)).await?;
        let raw: RawCollection = serde_json::from_value(value).map_err(decode)?;
        Ok(CollectionDefinition {
            collection: raw.collection,
            token_type: raw.token_type,
            decimals: raw.decimals.unwrap_or(0),
        })
    }

    /// Fungible token holdings, as raw API objects.
    pub async fn get_tokens(&self, address: &str, size: u32) -> Result<Vec<Value>, ProviderError> {
        let value = self
            .get_json(&format!("/accounts/{}/tokens?size={}", address, size))
            .await?;
        serde_json::from_value(value).map_err(decode)
    }

    /// NFT-family holdings, as raw API objects.
    pub async fn get_nfts(&self, address: &str, size: u32) -> Result<Vec<Value>, ProviderError> {
        let value = self
            .get_json(&format!("/accounts/{}/nfts?size={}", address, size))
            .await?;
        serde_json::from_value(value).map_err(decode)
    }

    pub async fn send_transaction(&self, tx: &Transaction) -> Result<String, ProviderError> {
        let url = format!("{}/transactions", self.base_url);
        debug!(%url, nonce = tx.nonce, "POST");
        let response = self.client.post(&url).json(tx).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let parsed: SendTransactionResponse = response.json().await.map_err(ProviderError::from)?;
        Ok(parsed.tx_hash)
    }

    /// Polls an issuance transaction until it settles, then returns the
    /// identifier assigned by the network. The first check happens
    /// immediately; later checks wait `poll_interval` between them.
    pub async fn await_completed_issue(&self, tx_hash: &str) -> Result<String, IssueError> {
        let deadline = tokio::time::Instant::now() + self.poll_timeout;
        loop {
            let value = self.get_json(&format!("/transactions/{}", tx_hash)).await?;
            let status = value
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("pending");
            match status {
                "success" => {
                    return extract_issued_token_identifier(&value)
                        .ok_or_else(|| IssueError::Failed(tx_hash.to_string()));
                }
                "fail" | "invalid" => return Err(IssueError::Failed(tx_hash.to_string())),
                _ => {}
            }
            if tokio::time::Instant::now() + self.poll_interval > deadline {
                return Err(IssueError::Timeout(tx_hash.to_string()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn token_of_account(value: Value) -> Result<TokenOfAccount, ProviderError> {
    let raw: RawToken = serde_json::from_value(value).map_err(decode)?;
    let balance = match raw.balance {
        Some(text) => parse_biguint(&text)?,
        None => BigUint::from(0u32),
    };
    Ok(TokenOfAccount {
        identifier: raw.identifier,
        balance,
        decimals: raw.decimals.unwrap_or(0),
        token_type: raw.token_type.unwrap_or_default(),
    })
}

/// First topic of the first issuance event, decoded from base64.
fn extract_issued_token_identifier(tx: &Value) -> Option<String> {
    let events = tx.get("logs")?.get("events")?.as_array()?;
    for event in events {
        let Some(identifier) = event.get("identifier").and_then(Value::as_str) else {
            continue;
        };
        if !ISSUE_EVENTS.contains(&identifier) {
            continue;
        }
        let topic = event.get("topics")?.as_array()?.first()?.as_str()?;
        let decoded = BASE64.decode(topic).ok()?;
        return String::from_utf8(decoded).ok();
    }
    None
}

fn parse_biguint(text: &str) -> Result<BigUint, ProviderError> {
    text.parse()
        .map_err(|_| ProviderError::Decode(format!("malformed balance '{}'", text)))
}

fn decode(err: serde_json::Error) -> ProviderError {
    ProviderError::Decode(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_identifier_from_issue_event() {
        let tx = json!({
            "status": "success",
            "logs": {
                "events": [
                    {
                        "identifier": "issueSemiFungible",
                        "topics": [BASE64.encode("TEST-abcdef"), "AA=="]
                    }
                ]
            }
        });
        assert_eq!(
            extract_issued_token_identifier(&tx).as_deref(),
            Some("TEST-abcdef")
        );
    }

    #[test]
    fn ignores_unrelated_events() {
        let tx = json!({
            "status": "success",
            "logs": {
                "events": [
                    { "identifier": "writeLog", "topics": [BASE64.encode("noise")] }
                ]
            }
        });
        assert_eq!(extract_issued_token_identifier(&tx), None);
    }

    #[test]
    fn missing_logs_yield_none() {
        assert_eq!(extract_issued_token_identifier(&json!({})), None);
    }
}
