//! Validator job: full pool node report plus wallet balances.

use std::time::Duration;

use chrono::Local;
use tokio::time::sleep;
use tracing::info;

use crate::jobs::publish_non_fatal;
use crate::monitor::aggregate::{
    summarize_contracts, summarize_miners, ContractOfferSummary, MinerShareTotals,
};
use crate::monitor::config::{
    ValidatorConfig, ValidatorMetricNames, ETH_DECIMALS, LMR_DECIMALS, USDC_DECIMALS,
};
use crate::monitor::convert::{round_to, scale_hashrate, to_decimal};
use crate::monitor::explorer::ExplorerClient;
use crate::monitor::fetch::Fetcher;
use crate::monitor::pool_api::{
    ContractsReport, MinersReport, PoolApiClient, PoolHealthcheck, PoolNodeConfig,
};
use crate::monitor::sink::MetricsSink;
use crate::types::{JobOutcome, MetricPoint, MetricUnit, ZERO_ADDRESS};

/// Pause between consecutive explorer balance lookups (rate-limit courtesy).
const BALANCE_CALL_DELAY: Duration = Duration::from_millis(300);

/// Everything the job publishes and logs, gathered in one pass.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSnapshot {
    pub health: PoolHealthcheck,
    pub node: PoolNodeConfig,
    pub contracts: ContractsReport,
    pub offer: ContractOfferSummary,
    pub miners: MinersReport,
    pub shares: MinerShareTotals,
    pub eth_balance: f64,
    pub lmr_balance: f64,
    pub usdc_balance: f64,
}

/// Run the validator job end to end.
pub async fn run(fetcher: &Fetcher, sink: &dyn MetricsSink) -> JobOutcome {
    let config = match ValidatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => return JobOutcome::failed(format!("configuration error: {e:#}")),
    };
    run_with(&config, fetcher, sink).await
}

/// Run with an explicit configuration (tests inject their own).
pub async fn run_with(
    config: &ValidatorConfig,
    fetcher: &Fetcher,
    sink: &dyn MetricsSink,
) -> JobOutcome {
    let pool = PoolApiClient::new(fetcher.clone(), &config.api_host);
    let health = pool.healthcheck().await;
    let node = pool.node_config().await;
    let contracts = pool.contracts().await;
    let miners = pool.miners().await;

    let offer = summarize_contracts(&contracts.contracts);
    let shares = summarize_miners(&miners.miners);

    let explorer = ExplorerClient::new(fetcher.clone(), &config.chain_id, &config.api_key);
    let wallet = node.derived.wallet_address.clone();
    let eth_raw = explorer.eth_balance(&wallet).await;
    sleep(BALANCE_CALL_DELAY).await;
    // the node's /config stopped exposing fee/payment token addresses;
    // they stay pinned to the zero address, so the lookups resolve to "0"
    let lmr_raw = explorer.token_balance(&wallet, ZERO_ADDRESS, "lmr balance").await;
    sleep(BALANCE_CALL_DELAY).await;
    let usdc_raw = explorer
        .token_balance(&wallet, ZERO_ADDRESS, "usdc balance")
        .await;

    let snapshot = ValidatorSnapshot {
        eth_balance: to_decimal(Some(&eth_raw), ETH_DECIMALS),
        lmr_balance: round_to(to_decimal(Some(&lmr_raw), LMR_DECIMALS), 4),
        usdc_balance: round_to(to_decimal(Some(&usdc_raw), USDC_DECIMALS), 4),
        health,
        node,
        contracts,
        offer,
        miners,
        shares,
    };

    let points = build_points(&config.metrics, &snapshot);
    publish_non_fatal(sink, &config.namespace, &points).await;
    log_summary(&config.api_host, &snapshot);

    JobOutcome::ok("Metrics sent to CloudWatch")
}

/// Map the snapshot onto the 13 configured metric slots.
pub fn build_points(names: &ValidatorMetricNames, s: &ValidatorSnapshot) -> Vec<MetricPoint> {
    vec![
        MetricPoint::new(
            &names.contracts_active,
            s.contracts.validator_total.number as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.hashrate_purchased,
            scale_hashrate(s.contracts.validator_total.hashrate_ghs),
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.hashrate_actual,
            scale_hashrate(s.contracts.validator_total.actual_hashrate_ghs),
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.unique_buyers,
            s.offer.unique_buyers as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.miners_total,
            s.miners.total_miners as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(&names.eth_balance, s.eth_balance, MetricUnit::None),
        MetricPoint::new(&names.lmr_balance, s.lmr_balance, MetricUnit::None),
        MetricPoint::new(
            &names.average_difficulty,
            s.shares.average_difficulty.trunc(),
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.accepted_shares,
            s.shares.accepted_shares as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.accepted_they_rejected,
            s.shares.accepted_they_rejected as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.rejected_shares,
            s.shares.rejected_shares as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(
            &names.rejected_they_accepted,
            s.shares.rejected_they_accepted as f64,
            MetricUnit::Count,
        ),
        MetricPoint::new(&names.usdc_balance, s.usdc_balance, MetricUnit::None),
    ]
}

fn log_summary(api_host: &str, s: &ValidatorSnapshot) {
    info!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Metrics for {api_host}:");
    info!("Healthcheck:");
    info!("  -Status: {}", s.health.status);
    info!("  -Uptime: {}", s.health.uptime);
    info!("  -Version: {}", s.health.version);
    info!("Config:");
    info!("  -Version: {}", s.node.version);
    info!("  -Commit: {}", s.node.commit);
    info!("  -Wallet: {}", s.node.derived.wallet_address);
    info!(
        "  -CloneFactory: {}",
        s.node.config.marketplace.clone_factory_address
    );
    info!("Contracts: {}", s.contracts.validator_total.number);
    info!(
        "  -Offered: {} ({} PH/s)",
        s.offer.offered_count, s.offer.offered_hashrate_phs
    );
    info!("Hashrate (PH/s):");
    info!(
        "  -Purchased: {}",
        scale_hashrate(s.contracts.validator_total.hashrate_ghs)
    );
    info!(
        "  -Actual: {}",
        scale_hashrate(s.contracts.validator_total.actual_hashrate_ghs)
    );
    info!("Buyers: {}", s.offer.unique_buyers);
    info!("Miners: {}", s.miners.total_miners);
    info!(
        "  -Vetting/Busy/Partial/Free: {}/{}/{}/{}",
        s.miners.vetting_miners, s.miners.busy_miners, s.miners.partial_busy_miners,
        s.miners.free_miners
    );
    info!("Financial:");
    info!("  -ETH Balance: {}", s.eth_balance);
    info!("  -LMR Balance: {}", s.lmr_balance);
    info!("  -USDC Balance: {}", s.usdc_balance);
    info!("Miner Stats:");
    info!("  -Average Difficulty: {}", s.shares.average_difficulty.trunc());
    info!("  -Accepted Shares: {}", s.shares.accepted_shares);
    info!("  -Accepted They Rejected: {}", s.shares.accepted_they_rejected);
    info!("  -Rejected Shares: {}", s.shares.rejected_shares);
    info!("  -Rejected They Accepted: {}", s.shares.rejected_they_accepted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::aggregate::{ContractRecord, MinerRecord, ResourceEstimates, ShareStats};
    use crate::monitor::pool_api::ValidatorTotal;

    fn names() -> ValidatorMetricNames {
        ValidatorMetricNames {
            contracts_active: "contracts_active".to_string(),
            hashrate_purchased: "hashrate_purchased".to_string(),
            hashrate_actual: "hashrate_actual".to_string(),
            unique_buyers: "unique_buyers".to_string(),
            miners_total: "miners_total".to_string(),
            eth_balance: "eth_balance".to_string(),
            lmr_balance: "lmr_balance".to_string(),
            average_difficulty: "average_difficulty".to_string(),
            accepted_shares: "accepted_shares".to_string(),
            accepted_they_rejected: "accepted_they_rejected".to_string(),
            rejected_shares: "rejected_shares".to_string(),
            rejected_they_accepted: "rejected_they_accepted".to_string(),
            usdc_balance: "usdc_balance".to_string(),
        }
    }

    fn snapshot() -> ValidatorSnapshot {
        let contracts = ContractsReport {
            validator_total: ValidatorTotal {
                number: 3,
                hashrate_ghs: 2_500_000.0,
                actual_hashrate_ghs: 2_400_000.0,
            },
            contracts: vec![
                ContractRecord {
                    buyer_addr: "0xbuyer1".to_string(),
                    is_deleted: false,
                    resource_estimates_target: ResourceEstimates {
                        hashrate_ghs: 1_000_000.0,
                    },
                },
                ContractRecord {
                    buyer_addr: "0xbuyer1".to_string(),
                    is_deleted: false,
                    resource_estimates_target: ResourceEstimates {
                        hashrate_ghs: 500_000.0,
                    },
                },
            ],
            ..ContractsReport::default()
        };
        let miners = MinersReport {
            total_miners: 2,
            miners: vec![
                MinerRecord {
                    current_difficulty: 65536.0,
                    stats: ShareStats {
                        we_accepted_shares: 9,
                        ..ShareStats::default()
                    },
                },
                MinerRecord {
                    current_difficulty: 32768.0,
                    stats: ShareStats {
                        we_accepted_shares: 1,
                        ..ShareStats::default()
                    },
                },
            ],
            ..MinersReport::default()
        };
        ValidatorSnapshot {
            offer: summarize_contracts(&contracts.contracts),
            shares: summarize_miners(&miners.miners),
            eth_balance: 1.23456789,
            lmr_balance: 150.5,
            usdc_balance: 42.0,
            contracts,
            miners,
            ..ValidatorSnapshot::default()
        }
    }

    #[test]
    fn test_all_thirteen_slots_present_in_order() {
        let points = build_points(&names(), &snapshot());
        assert_eq!(points.len(), 13);
        assert_eq!(points[0].name, "contracts_active");
        assert_eq!(points[0].value, 3.0);
        assert_eq!(points[1].value, 2.5); // 2.5M GHS in PHS
        assert_eq!(points[2].value, 2.4);
        assert_eq!(points[3].value, 1.0); // one distinct buyer
        assert_eq!(points[4].value, 2.0);
        assert_eq!(points[12].name, "usdc_balance");
    }

    #[test]
    fn test_average_difficulty_is_truncated() {
        let points = build_points(&names(), &snapshot());
        // (65536 + 32768) / 2 = 49152
        assert_eq!(points[7].name, "average_difficulty");
        assert_eq!(points[7].value, 49_152.0);
        assert_eq!(points[7].value.fract(), 0.0);
    }

    #[test]
    fn test_balance_slots_use_dimensionless_unit() {
        let points = build_points(&names(), &snapshot());
        for index in [5, 6, 12] {
            assert_eq!(points[index].unit, MetricUnit::None);
        }
        assert_eq!(points[8].unit, MetricUnit::Count);
    }

    #[test]
    fn test_zeroed_snapshot_builds_zero_points() {
        let points = build_points(&names(), &ValidatorSnapshot::default());
        assert_eq!(points.len(), 13);
        assert!(points.iter().all(|p| p.value == 0.0));
    }
}
