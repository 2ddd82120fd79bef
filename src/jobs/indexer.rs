//! Indexer job: republish the market indexer's healthcheck figures.

use chrono::Local;
use tracing::info;

use crate::jobs::publish_non_fatal;
use crate::monitor::config::{IndexerConfig, IndexerMetricNames};
use crate::monitor::fetch::Fetcher;
use crate::monitor::pool_api::{IndexerClient, IndexerHealthcheck};
use crate::monitor::sink::MetricsSink;
use crate::types::{JobOutcome, MetricPoint, MetricUnit};

/// Run the indexer job end to end.
pub async fn run(fetcher: &Fetcher, sink: &dyn MetricsSink) -> JobOutcome {
    let config = match IndexerConfig::from_env() {
        Ok(config) => config,
        Err(e) => return JobOutcome::failed(format!("configuration error: {e:#}")),
    };
    run_with(&config, fetcher, sink).await
}

/// Run with an explicit configuration (tests inject their own).
pub async fn run_with(
    config: &IndexerConfig,
    fetcher: &Fetcher,
    sink: &dyn MetricsSink,
) -> JobOutcome {
    let client = IndexerClient::new(fetcher.clone(), &config.api_host);
    let health = client.healthcheck().await;

    let points = build_points(&config.metrics, &health);
    publish_non_fatal(sink, &config.namespace, &points).await;

    info!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Metrics for {}:", config.api_host);
    info!("Healthcheck:");
    info!("  -Status: {}", health.status);
    info!("  -Uptime: {}", health.uptime_seconds);
    info!("  -Version: {}", health.version);
    info!("  -Clone Factory Address: {}", health.clone_factory_address);
    info!("  -Last Synced Block: {}", health.last_synced_contract_block);
    info!("  -Last Synced Time: {}", health.last_synced_time);
    info!("  -Last Synced Time: {}", health.last_synced_time_iso);

    JobOutcome::ok("Metrics sent to CloudWatch")
}

/// Map the healthcheck onto the configured metric names.
pub fn build_points(names: &IndexerMetricNames, health: &IndexerHealthcheck) -> Vec<MetricPoint> {
    vec![
        MetricPoint::new(&names.uptime_seconds, health.uptime_seconds, MetricUnit::Count),
        MetricPoint::new(
            &names.last_synced_block,
            health.last_synced_contract_block,
            MetricUnit::Count,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_carry_uptime_and_block() {
        let names = IndexerMetricNames {
            uptime_seconds: "indexer_uptime".to_string(),
            last_synced_block: "indexer_last_block".to_string(),
        };
        let health = IndexerHealthcheck {
            uptime_seconds: 3_600.0,
            last_synced_contract_block: 42.0,
            ..IndexerHealthcheck::default()
        };
        let points = build_points(&names, &health);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "indexer_uptime");
        assert_eq!(points[0].value, 3_600.0);
        assert_eq!(points[1].name, "indexer_last_block");
        assert_eq!(points[1].value, 42.0);
        assert!(points.iter().all(|p| p.unit == MetricUnit::Count));
    }

    #[test]
    fn test_failed_fetch_publishes_zeroes() {
        let names = IndexerMetricNames {
            uptime_seconds: "u".to_string(),
            last_synced_block: "b".to_string(),
        };
        let points = build_points(&names, &IndexerHealthcheck::default());
        assert!(points.iter().all(|p| p.value == 0.0));
    }
}
