//! Per-job configuration, read from the environment once per invocation.
//!
//! Each job owns an explicit config struct built by `from_env()`; nothing
//! is read from the environment after construction. A missing or
//! malformed required value is a fatal, invocation-level error.

use anyhow::{Context, Result};

use crate::types::{WalletEntry, ZERO_ADDRESS};

/// Decimal places of the native coin balance.
pub const ETH_DECIMALS: u32 = 18;
/// Decimal places of the Lumerin token.
pub const LMR_DECIMALS: u32 = 8;
/// Decimal places of USDC.
pub const USDC_DECIMALS: u32 = 6;

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Token contract addresses for one chain, after env overrides.
#[derive(Debug, Clone)]
pub struct TokenAddresses {
    /// Lumerin token contract
    pub lmr: String,
    /// USDC contract
    pub usdc: String,
}

/// Well-known token contracts per chain id; unknown chains fall back to
/// the Arbitrum One table, matching the original deployment behavior.
pub fn default_token_addresses(chain_id: &str) -> TokenAddresses {
    match chain_id {
        // Arbitrum Sepolia (testnet); LMR test token is not deployed
        "421614" => TokenAddresses {
            lmr: ZERO_ADDRESS.to_string(),
            usdc: "0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d".to_string(),
        },
        // Arbitrum One (mainnet) and anything unrecognized
        _ => TokenAddresses {
            lmr: "0xaf5db6e1cc585ca312e8c8f7c499033590cf5c98".to_string(),
            usdc: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string(),
        },
    }
}

fn token_addresses_from_env(chain_id: &str) -> TokenAddresses {
    let defaults = default_token_addresses(chain_id);
    TokenAddresses {
        lmr: optional("LMR_TOKEN_ADDRESS", &defaults.lmr),
        usdc: optional("USDC_TOKEN_ADDRESS", &defaults.usdc),
    }
}

/// Parse the `WALLETS_TO_WATCH` JSON array.
pub fn parse_watch_list(raw: &str) -> Result<Vec<WalletEntry>> {
    serde_json::from_str(raw).context("unparseable WALLETS_TO_WATCH wallet list")
}

/// Metric name assignments for the financials job (`CW_METRIC1..7`).
#[derive(Debug, Clone)]
pub struct FinancialsMetricNames {
    pub btc_price: String,
    pub eth_price: String,
    pub lmr_price_usd: String,
    pub btc_difficulty: String,
    pub earnings_btc: String,
    pub earnings_usd: String,
    pub breakeven: String,
}

/// Configuration of the financials job.
#[derive(Debug, Clone)]
pub struct FinancialsConfig {
    /// CloudWatch namespace
    pub namespace: String,
    /// Outbound metric names
    pub metrics: FinancialsMetricNames,
}

impl FinancialsConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            namespace: required("CW_NAMESPACE")?,
            metrics: FinancialsMetricNames {
                btc_price: required("CW_METRIC1")?,
                eth_price: required("CW_METRIC2")?,
                lmr_price_usd: required("CW_METRIC3")?,
                btc_difficulty: required("CW_METRIC4")?,
                earnings_btc: required("CW_METRIC5")?,
                earnings_usd: required("CW_METRIC6")?,
                breakeven: required("CW_METRIC7")?,
            },
        })
    }
}

/// Metric name assignments for the indexer job (`CW_METRIC1..2`).
#[derive(Debug, Clone)]
pub struct IndexerMetricNames {
    pub uptime_seconds: String,
    pub last_synced_block: String,
}

/// Configuration of the indexer healthcheck job.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Indexer host (no scheme; the healthcheck is served over https)
    pub api_host: String,
    /// CloudWatch namespace
    pub namespace: String,
    /// Outbound metric names
    pub metrics: IndexerMetricNames,
}

impl IndexerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_host: required("API_URL")?,
            namespace: required("CW_NAMESPACE")?,
            metrics: IndexerMetricNames {
                uptime_seconds: required("CW_METRIC1")?,
                last_synced_block: required("CW_METRIC2")?,
            },
        })
    }
}

/// Metric name assignments for the validator job (`CW_METRIC1..13`),
/// in the original deployment's slot order.
#[derive(Debug, Clone)]
pub struct ValidatorMetricNames {
    pub contracts_active: String,
    pub hashrate_purchased: String,
    pub hashrate_actual: String,
    pub unique_buyers: String,
    pub miners_total: String,
    pub eth_balance: String,
    pub lmr_balance: String,
    pub average_difficulty: String,
    pub accepted_shares: String,
    pub accepted_they_rejected: String,
    pub rejected_shares: String,
    pub rejected_they_accepted: String,
    pub usdc_balance: String,
}

/// Configuration of the validator (pool) monitoring job.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Pool API host (no scheme; endpoints are served over http)
    pub api_host: String,
    /// Chain id passed to the block explorer
    pub chain_id: String,
    /// Block explorer API key
    pub api_key: String,
    /// CloudWatch namespace
    pub namespace: String,
    /// Outbound metric names
    pub metrics: ValidatorMetricNames,
}

impl ValidatorConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_host: required("API_URL")?,
            chain_id: required("ETH_CHAIN")?,
            api_key: required("ETH_API_KEY")?,
            namespace: required("CW_NAMESPACE")?,
            metrics: ValidatorMetricNames {
                contracts_active: required("CW_METRIC1")?,
                hashrate_purchased: required("CW_METRIC2")?,
                hashrate_actual: required("CW_METRIC3")?,
                unique_buyers: required("CW_METRIC4")?,
                miners_total: required("CW_METRIC5")?,
                eth_balance: required("CW_METRIC6")?,
                lmr_balance: required("CW_METRIC7")?,
                average_difficulty: required("CW_METRIC8")?,
                accepted_shares: required("CW_METRIC9")?,
                accepted_they_rejected: required("CW_METRIC10")?,
                rejected_shares: required("CW_METRIC11")?,
                rejected_they_accepted: required("CW_METRIC12")?,
                usdc_balance: required("CW_METRIC13")?,
            },
        })
    }
}

/// Configuration of the wallet-monitor job.
#[derive(Debug, Clone)]
pub struct WalletMonitorConfig {
    /// Chain id passed to the block explorer
    pub chain_id: String,
    /// Block explorer API key
    pub api_key: String,
    /// CloudWatch namespace
    pub namespace: String,
    /// AWS region for the sink
    pub region: String,
    /// Parsed wallet watch-list
    pub wallets: Vec<WalletEntry>,
    /// Token contracts to look up per wallet
    pub tokens: TokenAddresses,
}

impl WalletMonitorConfig {
    pub fn from_env() -> Result<Self> {
        let chain_id = optional("ETH_CHAIN", "42161");
        let tokens = token_addresses_from_env(&chain_id);
        let wallets = parse_watch_list(&optional("WALLETS_TO_WATCH", "[]"))?;
        Ok(Self {
            chain_id,
            api_key: optional("ETH_API_KEY", ""),
            namespace: optional("CW_NAMESPACE", "wallet-monitor"),
            region: optional("REGION_NAME", "us-east-1"),
            wallets,
            tokens,
        })
    }
}
