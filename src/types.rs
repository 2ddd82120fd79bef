//! Core types shared across the poolwatch monitoring jobs.

use serde::{Deserialize, Serialize};

/// An EVM account address, kept as a string (checksums are upstream's concern).
pub type Address = String;

/// The all-zero address used by upstream APIs as a "not configured" sentinel.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Unit attached to a published metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    /// Discrete counts (miners, contracts, shares).
    Count,
    /// Dimensionless gauges (prices, balances, difficulty).
    None,
}

/// A single metric datum queued for one batched publish call.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    /// Metric name as configured for the job
    pub name: String,
    /// Numeric value
    pub value: f64,
    /// Unit reported to the sink
    pub unit: MetricUnit,
    /// Optional dimension tags (name, value); insertion order irrelevant
    pub dimensions: Vec<(String, String)>,
}

impl MetricPoint {
    /// A plain metric with no dimensions.
    pub fn new(name: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
            dimensions: Vec::new(),
        }
    }

    /// Attach a dimension tag.
    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }
}

/// Result of one job invocation, reported back to the scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// HTTP-style status code (200 on success, 500 on fatal config errors)
    pub status_code: u16,
    /// Human-readable body
    pub body: String,
}

impl JobOutcome {
    /// Successful invocation.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// Fatal invocation-level failure (configuration errors only).
    pub fn failed(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }
}

/// One entry of the wallet watch-list (`WALLETS_TO_WATCH` JSON array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEntry {
    /// Display name, used as the metric dimension value
    #[serde(rename = "walletName", default = "unknown_wallet_name")]
    pub name: String,
    /// Account address to look up
    #[serde(rename = "walletId", default)]
    pub address: Address,
}

fn unknown_wallet_name() -> String {
    "Unknown".to_string()
}

impl WalletEntry {
    /// Whether this wallet can be monitored at all.
    pub fn is_monitorable(&self) -> bool {
        !self.address.is_empty() && self.address != ZERO_ADDRESS
    }
}

/// Balances fetched for a single watched wallet, already decimal-converted.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletBalances {
    /// Display name of the wallet
    pub name: String,
    /// Account address
    pub address: Address,
    /// Native coin balance
    pub eth: f64,
    /// Lumerin token balance
    pub lmr: f64,
    /// USDC token balance
    pub usdc: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_entry_monitorable() {
        let valid = WalletEntry {
            name: "Seller".to_string(),
            address: "0x344C98E25F981976215669E048ECcb21be16aC8e".to_string(),
        };
        assert!(valid.is_monitorable());

        let zero = WalletEntry {
            name: "Unset".to_string(),
            address: ZERO_ADDRESS.to_string(),
        };
        assert!(!zero.is_monitorable());

        let empty = WalletEntry {
            name: "Empty".to_string(),
            address: String::new(),
        };
        assert!(!empty.is_monitorable());
    }

    #[test]
    fn test_wallet_entry_deserializes_upstream_field_names() {
        let entry: WalletEntry =
            serde_json::from_str(r#"{"walletName":"Seller","walletId":"0xabc"}"#)
                .expect("valid entry");
        assert_eq!(entry.name, "Seller");
        assert_eq!(entry.address, "0xabc");

        let partial: WalletEntry = serde_json::from_str("{}").expect("defaults apply");
        assert_eq!(partial.name, "Unknown");
        assert!(partial.address.is_empty());
    }

    #[test]
    fn test_metric_point_dimensions() {
        let point = MetricPoint::new("eth_balance", 1.25, MetricUnit::None)
            .with_dimension("WalletName", "Seller");
        assert_eq!(
            point.dimensions,
            vec![("WalletName".to_string(), "Seller".to_string())]
        );
    }
}
