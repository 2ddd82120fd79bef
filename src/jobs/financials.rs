//! Financials job: spot prices, network difficulty, earnings estimate.

use tracing::info;

use crate::jobs::publish_non_fatal;
use crate::monitor::config::{FinancialsConfig, FinancialsMetricNames};
use crate::monitor::fetch::Fetcher;
use crate::monitor::prices::{LumerinPrice, PriceFeeds};
use crate::monitor::rewards::{self, EarningsEstimate, MiningAssumptions};
use crate::monitor::sink::MetricsSink;
use crate::types::{JobOutcome, MetricPoint, MetricUnit};

/// Everything the job publishes and logs, gathered in one pass.
#[derive(Debug, Clone, Default)]
pub struct FinancialsSnapshot {
    pub btc_price: f64,
    pub eth_price: f64,
    pub lumerin: LumerinPrice,
    pub difficulty_t: f64,
    pub estimate: EarningsEstimate,
}

/// Run the financials job end to end.
pub async fn run(fetcher: &Fetcher, sink: &dyn MetricsSink) -> JobOutcome {
    let config = match FinancialsConfig::from_env() {
        Ok(config) => config,
        Err(e) => return JobOutcome::failed(format!("configuration error: {e:#}")),
    };
    run_with(&config, fetcher, sink).await
}

/// Run with an explicit configuration (tests inject their own).
pub async fn run_with(
    config: &FinancialsConfig,
    fetcher: &Fetcher,
    sink: &dyn MetricsSink,
) -> JobOutcome {
    let feeds = PriceFeeds::new(fetcher.clone());

    let btc_price = feeds.spot_price("BTC-USD").await;
    let eth_price = feeds.spot_price("ETH-USD").await;
    let lumerin = feeds.lumerin_price().await;
    let difficulty_t = feeds.btc_difficulty_t().await;

    let estimate = rewards::estimate(
        MiningAssumptions::default(),
        btc_price,
        difficulty_t,
        lumerin.btc,
    );

    let snapshot = FinancialsSnapshot {
        btc_price,
        eth_price,
        lumerin,
        difficulty_t,
        estimate,
    };

    let points = build_points(&config.metrics, &snapshot);
    publish_non_fatal(sink, &config.namespace, &points).await;

    info!("Bitcoin Price: {}", snapshot.btc_price);
    info!("Ethereum Price: {}", snapshot.eth_price);
    info!("Lumerin Price (USD): {}", snapshot.lumerin.usd);
    info!("Bitcoin Difficulty: {}", snapshot.difficulty_t);
    info!("Earnings BTC: {}", snapshot.estimate.earnings_btc);
    info!("Earnings USD: {}", snapshot.estimate.earnings_usd);
    info!("Breakeven BTC: {}", snapshot.estimate.breakeven_btc);

    JobOutcome::ok("Metrics sent to CloudWatch")
}

/// Map the snapshot onto the configured metric names.
pub fn build_points(names: &FinancialsMetricNames, s: &FinancialsSnapshot) -> Vec<MetricPoint> {
    vec![
        MetricPoint::new(&names.btc_price, s.btc_price, MetricUnit::Count),
        MetricPoint::new(&names.eth_price, s.eth_price, MetricUnit::Count),
        MetricPoint::new(&names.lmr_price_usd, s.lumerin.usd, MetricUnit::Count),
        MetricPoint::new(&names.btc_difficulty, s.difficulty_t, MetricUnit::None),
        MetricPoint::new(&names.earnings_btc, s.estimate.earnings_btc, MetricUnit::None),
        MetricPoint::new(&names.earnings_usd, s.estimate.earnings_usd, MetricUnit::None),
        MetricPoint::new(&names.breakeven, s.estimate.breakeven_btc, MetricUnit::Count),
    ]
}
