//! Metrics sink: batched publishing to CloudWatch.
//!
//! Jobs hand their full point list to [`MetricsSink::publish`] once per
//! invocation. Publish failures are the orchestrator's problem to log;
//! they never fail the invocation itself.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use tracing::debug;

use crate::types::{MetricPoint, MetricUnit};

/// Destination for one invocation's batch of metric points.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Publish all points under the given namespace in a single batch call.
    async fn publish(&self, namespace: &str, points: &[MetricPoint]) -> Result<()>;
}

/// CloudWatch-backed sink.
pub struct CloudWatchSink {
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchSink {
    /// Wrap an already-configured CloudWatch client.
    pub fn new(client: aws_sdk_cloudwatch::Client) -> Self {
        Self { client }
    }

    /// Build a sink from the ambient AWS configuration, optionally pinned
    /// to a region.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(aws_sdk_cloudwatch::Client::new(&config))
    }
}

#[async_trait]
impl MetricsSink for CloudWatchSink {
    async fn publish(&self, namespace: &str, points: &[MetricPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let data: Vec<MetricDatum> = points.iter().map(to_datum).collect();
        self.client
            .put_metric_data()
            .namespace(namespace)
            .set_metric_data(Some(data))
            .send()
            .await
            .with_context(|| format!("put_metric_data to namespace {namespace}"))?;
        debug!(namespace, count = points.len(), "published metric batch");
        Ok(())
    }
}

fn to_datum(point: &MetricPoint) -> MetricDatum {
    let mut builder = MetricDatum::builder()
        .metric_name(&point.name)
        .value(point.value)
        .unit(to_standard_unit(point.unit));
    for (name, value) in &point.dimensions {
        builder = builder.dimensions(Dimension::builder().name(name).value(value).build());
    }
    builder.build()
}

fn to_standard_unit(unit: MetricUnit) -> StandardUnit {
    match unit {
        MetricUnit::Count => StandardUnit::Count,
        MetricUnit::None => StandardUnit::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_carries_name_value_unit() {
        let point = MetricPoint::new("miners_total", 12.0, MetricUnit::Count);
        let datum = to_datum(&point);
        assert_eq!(datum.metric_name(), Some("miners_total"));
        assert_eq!(datum.value(), Some(12.0));
        assert_eq!(datum.unit(), Some(&StandardUnit::Count));
        assert!(datum.dimensions().is_empty());
    }

    #[test]
    fn test_datum_carries_dimensions() {
        let point = MetricPoint::new("eth_balance", 0.5, MetricUnit::None)
            .with_dimension("WalletName", "Seller");
        let datum = to_datum(&point);
        assert_eq!(datum.unit(), Some(&StandardUnit::None));
        let dims = datum.dimensions();
        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].name(), Some("WalletName"));
        assert_eq!(dims[0].value(), Some("Seller"));
    }
}
