//! Block explorer (Etherscan API V2) balance client.
//!
//! Balances come back as base-unit integer strings. The explorer reports
//! errors in-band (`status == "0"` with the message in `result`); a
//! rate-limit message is the only payload-level error worth retrying,
//! everything else degrades to the `"0"` fallback immediately.

use serde::Deserialize;

use crate::monitor::fetch::{fallback_with, with_retries, FetchError, Fetcher};
use crate::types::ZERO_ADDRESS;

const ETHERSCAN_V2_BASE: &str = "https://api.etherscan.io/v2/api";

/// Explorer response envelope: `result` is a decimal-string balance on
/// success or an error message when `status` is `"0"`.
#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    result: serde_json::Value,
}

impl ExplorerEnvelope {
    fn result_text(&self) -> String {
        match &self.result {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "Unknown error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Classify one explorer reply into a raw balance or a typed failure.
fn classify(envelope: &ExplorerEnvelope) -> Result<String, FetchError> {
    if envelope.status == "0" {
        let message = envelope.result_text();
        if message.to_lowercase().contains("rate limit") {
            return Err(FetchError::RateLimited(message));
        }
        return Err(FetchError::Api(message));
    }
    let raw = envelope.result_text();
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        Ok(raw)
    } else {
        Err(FetchError::InvalidBody(format!(
            "non-numeric balance result: {raw}"
        )))
    }
}

/// Chain-scoped Etherscan API V2 client.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    fetcher: Fetcher,
    chain_id: String,
    api_key: String,
}

impl ExplorerClient {
    pub fn new(fetcher: Fetcher, chain_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            chain_id: chain_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Native coin balance for `address`, base units; `"0"` on any failure.
    pub async fn eth_balance(&self, address: &str) -> String {
        let url = format!(
            "{ETHERSCAN_V2_BASE}?chainid={}&module=account&action=balance&address={address}&tag=latest&apikey={}",
            self.chain_id, self.api_key
        );
        self.fetch_balance(&url, "eth balance").await
    }

    /// ERC-20 balance of `token` for `address`, base units; `"0"` on any
    /// failure. A token pinned to the zero address short-circuits without
    /// an API call.
    pub async fn token_balance(&self, address: &str, token: &str, label: &str) -> String {
        if token == ZERO_ADDRESS {
            return "0".to_string();
        }
        let url = format!(
            "{ETHERSCAN_V2_BASE}?chainid={}&module=account&action=tokenbalance&contractaddress={token}&address={address}&tag=latest&apikey={}",
            self.chain_id, self.api_key
        );
        self.fetch_balance(&url, label).await
    }

    async fn fetch_balance(&self, url: &str, what: &str) -> String {
        let result = with_retries(self.fetcher.policy(), || self.balance_attempt(url)).await;
        match result {
            Ok(raw) => raw,
            Err(e) => fallback_with(what, &e, "0".to_string()),
        }
    }

    async fn balance_attempt(&self, url: &str) -> Result<String, FetchError> {
        let envelope: ExplorerEnvelope = self.fetcher.get_typed_once(url).await?;
        classify(&envelope)
    }
}
