//! Typed clients for the pool operator's REST API and the market indexer.
//!
//! Every endpoint maps to a named record (no positional tuples), with
//! serde renames for the upstream PascalCase/camelCase field names.
//! Fetch failures degrade to zeroed records with a fallback warning.

use serde::Deserialize;

use crate::monitor::aggregate::{ContractRecord, MinerRecord};
use crate::monitor::fetch::{fallback_value, Fetcher};

/// `/healthcheck` reply of the pool node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolHealthcheck {
    #[serde(default)]
    pub status: String,
    /// Human-readable uptime ("72h3m0s")
    #[serde(default)]
    pub uptime: String,
    #[serde(default)]
    pub version: String,
}

/// `/config` reply of the pool node, reduced to the consumed fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolNodeConfig {
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Commit", default)]
    pub commit: String,
    #[serde(rename = "DerivedConfig", default)]
    pub derived: DerivedConfig,
    #[serde(rename = "Config", default)]
    pub config: NestedConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DerivedConfig {
    #[serde(rename = "WalletAddress", default)]
    pub wallet_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NestedConfig {
    #[serde(rename = "Marketplace", default)]
    pub marketplace: MarketplaceConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(rename = "CloneFactoryAddress", default)]
    pub clone_factory_address: String,
}

/// `/contracts-v2` reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsReport {
    #[serde(rename = "SellerTotal", default)]
    pub seller_total: SellerTotal,
    #[serde(rename = "ValidatorTotal", default)]
    pub validator_total: ValidatorTotal,
    #[serde(rename = "Contracts", default)]
    pub contracts: Vec<ContractRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SellerTotal {
    /// Number of running seller contracts
    #[serde(rename = "RunningNumber", default)]
    pub running_number: u64,
    /// Actually delivered hashrate across running contracts, GH/s
    #[serde(rename = "RunningActualGHS", default)]
    pub running_actual_ghs: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidatorTotal {
    /// Number of contracts under validation
    #[serde(rename = "Number", default)]
    pub number: u64,
    /// Purchased hashrate, GH/s
    #[serde(rename = "HashrateGHS", default)]
    pub hashrate_ghs: f64,
    /// Measured hashrate, GH/s
    #[serde(rename = "ActualHashrateGHS", default)]
    pub actual_hashrate_ghs: f64,
}

/// `/miners` reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinersReport {
    #[serde(rename = "TotalHashrateGHS", default)]
    pub total_hashrate_ghs: f64,
    #[serde(rename = "UsedHashrateGHS", default)]
    pub used_hashrate_ghs: f64,
    #[serde(rename = "AvailableHashrateGHS", default)]
    pub available_hashrate_ghs: f64,
    #[serde(rename = "TotalMiners", default)]
    pub total_miners: u64,
    #[serde(rename = "BusyMiners", default)]
    pub busy_miners: u64,
    #[serde(rename = "FreeMiners", default)]
    pub free_miners: u64,
    #[serde(rename = "VettingMiners", default)]
    pub vetting_miners: u64,
    #[serde(rename = "PartialBusyMiners", default)]
    pub partial_busy_miners: u64,
    #[serde(rename = "Miners", default)]
    pub miners: Vec<MinerRecord>,
}

/// Indexer `/healthcheck` reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexerHealthcheck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "uptimeSeconds", default)]
    pub uptime_seconds: f64,
    #[serde(rename = "cloneFactoryAddress", default)]
    pub clone_factory_address: String,
    #[serde(rename = "lastSyncedContractBlock", default)]
    pub last_synced_contract_block: f64,
    #[serde(rename = "lastSyncedTime", default)]
    pub last_synced_time: f64,
    #[serde(rename = "lastSyncedTimeISO", default)]
    pub last_synced_time_iso: String,
}

/// Client for the pool node's HTTP API (served over plain http).
#[derive(Debug, Clone)]
pub struct PoolApiClient {
    fetcher: Fetcher,
    base_url: String,
}

impl PoolApiClient {
    pub fn new(fetcher: Fetcher, host: &str) -> Self {
        Self {
            fetcher,
            base_url: format!("http://{host}"),
        }
    }

    /// Node healthcheck; zeroed record on failure.
    pub async fn healthcheck(&self) -> PoolHealthcheck {
        let url = format!("{}/healthcheck", self.base_url);
        self.fetcher
            .get_typed(&url)
            .await
            .unwrap_or_else(|e| fallback_value("pool healthcheck", &e))
    }

    /// Node configuration; zeroed record on failure.
    pub async fn node_config(&self) -> PoolNodeConfig {
        let url = format!("{}/config", self.base_url);
        self.fetcher
            .get_typed(&url)
            .await
            .unwrap_or_else(|e| fallback_value("pool config", &e))
    }

    /// Marketplace contract report; empty report on failure.
    pub async fn contracts(&self) -> ContractsReport {
        let url = format!("{}/contracts-v2", self.base_url);
        self.fetcher
            .get_typed(&url)
            .await
            .unwrap_or_else(|e| fallback_value("pool contracts", &e))
    }

    /// Miner fleet report; empty report on failure.
    pub async fn miners(&self) -> MinersReport {
        let url = format!("{}/miners", self.base_url);
        self.fetcher
            .get_typed(&url)
            .await
            .unwrap_or_else(|e| fallback_value("pool miners", &e))
    }
}

/// Client for the market indexer's healthcheck (served over https).
#[derive(Debug, Clone)]
pub struct IndexerClient {
    fetcher: Fetcher,
    base_url: String,
}

impl IndexerClient {
    pub fn new(fetcher: Fetcher, host: &str) -> Self {
        Self {
            fetcher,
            base_url: format!("https://{host}"),
        }
    }

    /// Indexer healthcheck; zeroed record on failure.
    pub async fn healthcheck(&self) -> IndexerHealthcheck {
        let url = format!("{}/healthcheck", self.base_url);
        self.fetcher
            .get_typed(&url)
            .await
            .unwrap_or_else(|e| fallback_value("indexer healthcheck", &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contracts_report_shape() {
        let body = r#"{
            "SellerTotal": {"RunningNumber": 2, "RunningActualGHS": 1200000},
            "ValidatorTotal": {"Number": 3, "HashrateGHS": 2500000, "ActualHashrateGHS": 2400000},
            "Contracts": [
                {"BuyerAddr": "0xabc", "IsDeleted": false,
                 "ResourceEstimatesTarget": {"hashrate_ghs": 1000000}},
                {"BuyerAddr": "", "IsDeleted": true,
                 "ResourceEstimatesTarget": {"hashrate_ghs": 500000}}
            ]
        }"#;
        let report: ContractsReport = serde_json::from_str(body).expect("contracts shape");
        assert_eq!(report.seller_total.running_number, 2);
        assert_eq!(report.validator_total.hashrate_ghs, 2_500_000.0);
        assert_eq!(report.contracts.len(), 2);
        assert!(report.contracts[1].is_deleted);
    }

    #[test]
    fn test_miners_report_shape() {
        let body = r#"{
            "TotalHashrateGHS": 730000, "UsedHashrateGHS": 500000,
            "AvailableHashrateGHS": 230000,
            "TotalMiners": 3, "BusyMiners": 1, "FreeMiners": 1,
            "VettingMiners": 1, "PartialBusyMiners": 0,
            "Miners": [
                {"CurrentDifficulty": 65536,
                 "Stats": {"we_accepted_shares": 10, "we_rejected_shares": 1}}
            ]
        }"#;
        let report: MinersReport = serde_json::from_str(body).expect("miners shape");
        assert_eq!(report.total_miners, 3);
        assert_eq!(report.miners[0].current_difficulty, 65536.0);
        assert_eq!(report.miners[0].stats.we_accepted_shares, 10);
        // unknown counters default to zero
        assert_eq!(report.miners[0].stats.we_rejected_they_accepted, 0);
    }

    #[test]
    fn test_node_config_nested_fields() {
        let body = r#"{
            "Version": "1.2.3", "Commit": "abc123",
            "DerivedConfig": {"WalletAddress": "0xwallet"},
            "Config": {"Marketplace": {"CloneFactoryAddress": "0xfactory"}}
        }"#;
        let config: PoolNodeConfig = serde_json::from_str(body).expect("config shape");
        assert_eq!(config.derived.wallet_address, "0xwallet");
        assert_eq!(config.config.marketplace.clone_factory_address, "0xfactory");
    }

    #[test]
    fn test_indexer_healthcheck_shape() {
        let body = r#"{
            "status": "healthy", "version": "0.9.0",
            "uptimeSeconds": 86400,
            "cloneFactoryAddress": "0xfactory",
            "lastSyncedContractBlock": 123456789,
            "lastSyncedTime": 1724928000,
            "lastSyncedTimeISO": "2024-08-29T12:00:00Z"
        }"#;
        let health: IndexerHealthcheck = serde_json::from_str(body).expect("indexer shape");
        assert_eq!(health.uptime_seconds, 86_400.0);
        assert_eq!(health.last_synced_contract_block, 123_456_789.0);
    }
}
