//! poolwatch - scheduled monitoring jobs for a hashrate marketplace.
//!
//! Each job polls public price feeds, a block-explorer API, or the pool
//! operator's REST endpoints and republishes the collected values as
//! CloudWatch metrics.

pub mod jobs;
pub mod monitor;
pub mod types;

// Re-export main types for convenience
pub use types::{JobOutcome, MetricPoint, MetricUnit, WalletBalances, WalletEntry};
