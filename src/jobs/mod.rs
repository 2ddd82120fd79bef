//! Job orchestrators, one per scheduled invocation.
//!
//! Each job is an independent unit: read configuration, fetch external
//! data (fallbacks on failure), aggregate, publish one metric batch, log a
//! summary. Only configuration errors produce a non-200 outcome.

pub mod financials;
pub mod indexer;
pub mod validator;
pub mod wallet_monitor;

use std::str::FromStr;

use tracing::{error, info};

use crate::monitor::fetch::Fetcher;
use crate::monitor::sink::MetricsSink;
use crate::types::{JobOutcome, MetricPoint};

/// The jobs this binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Price feeds, network difficulty, earnings estimate
    Financials,
    /// Market indexer healthcheck
    Indexer,
    /// Full pool/validator node report
    Validator,
    /// Watched wallet balances
    WalletMonitor,
}

impl Job {
    /// Names accepted on the command line.
    pub const NAMES: [&'static str; 4] = ["financials", "indexer", "validator", "wallet-monitor"];
}

impl FromStr for Job {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "financials" => Ok(Job::Financials),
            "indexer" => Ok(Job::Indexer),
            "validator" => Ok(Job::Validator),
            "wallet-monitor" => Ok(Job::WalletMonitor),
            other => Err(format!(
                "unknown job {other:?}, expected one of: {}",
                Job::NAMES.join(", ")
            )),
        }
    }
}

/// Run one job to completion.
pub async fn run(job: Job, fetcher: &Fetcher, sink: &dyn MetricsSink) -> JobOutcome {
    match job {
        Job::Financials => financials::run(fetcher, sink).await,
        Job::Indexer => indexer::run(fetcher, sink).await,
        Job::Validator => validator::run(fetcher, sink).await,
        Job::WalletMonitor => wallet_monitor::run(fetcher, sink).await,
    }
}

/// Publish a batch, logging failures without failing the invocation.
///
/// A monitoring outage must never block the scheduler, so publish errors
/// are reported and swallowed here.
pub(crate) async fn publish_non_fatal(
    sink: &dyn MetricsSink,
    namespace: &str,
    points: &[MetricPoint],
) {
    match sink.publish(namespace, points).await {
        Ok(()) => info!(namespace, count = points.len(), "metrics sent to CloudWatch"),
        Err(e) => error!(namespace, error = %e, "failed to send metrics, continuing"),
    }
}
