//! Collection core: fetch, convert, aggregate, publish.

pub mod aggregate;
pub mod config;
pub mod convert;
pub mod explorer;
pub mod fetch;
pub mod pool_api;
pub mod prices;
pub mod rewards;
pub mod sink;

// Re-export key components
pub use explorer::ExplorerClient;
pub use fetch::{FetchError, Fetcher, RetryPolicy};
pub use pool_api::{IndexerClient, PoolApiClient};
pub use prices::PriceFeeds;
pub use sink::{CloudWatchSink, MetricsSink};
