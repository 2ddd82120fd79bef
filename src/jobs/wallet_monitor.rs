//! Wallet-monitor job: balances for a configured wallet watch-list.

use std::time::Duration;

use chrono::Local;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::jobs::publish_non_fatal;
use crate::monitor::aggregate::{summarize_wallets, WalletTotals};
use crate::monitor::config::{
    TokenAddresses, WalletMonitorConfig, ETH_DECIMALS, LMR_DECIMALS, USDC_DECIMALS,
};
use crate::monitor::convert::to_decimal;
use crate::monitor::explorer::ExplorerClient;
use crate::monitor::fetch::Fetcher;
use crate::monitor::sink::MetricsSink;
use crate::types::{JobOutcome, MetricPoint, MetricUnit, WalletBalances, WalletEntry};

/// Pause between the three balance lookups of one wallet.
const TOKEN_LOOKUP_DELAY: Duration = Duration::from_millis(250);
/// Pause between wallets.
const WALLET_DELAY: Duration = Duration::from_millis(500);

/// Run the wallet-monitor job end to end.
pub async fn run(fetcher: &Fetcher, sink: &dyn MetricsSink) -> JobOutcome {
    let config = match WalletMonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => return JobOutcome::failed(format!("Error parsing wallet configuration: {e:#}")),
    };
    run_with(&config, fetcher, sink).await
}

/// Run with an explicit configuration (tests inject their own).
pub async fn run_with(
    config: &WalletMonitorConfig,
    fetcher: &Fetcher,
    sink: &dyn MetricsSink,
) -> JobOutcome {
    let started = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    info!("{}", "=".repeat(60));
    info!("Wallet Monitor Execution: {started}");
    info!("Chain ID: {}", config.chain_id);
    info!("CloudWatch Namespace: {}", config.namespace);
    info!("{}", "=".repeat(60));

    if config.wallets.is_empty() {
        info!("No wallets configured for monitoring");
        return JobOutcome::ok("No wallets configured");
    }

    info!("Monitoring {} wallet(s):", config.wallets.len());
    for wallet in &config.wallets {
        info!("  - {}: {}...", wallet.name, address_prefix(&wallet.address, 16));
    }

    let explorer = ExplorerClient::new(fetcher.clone(), &config.chain_id, &config.api_key);
    let mut monitored: Vec<WalletBalances> = Vec::new();

    for wallet in &config.wallets {
        if !wallet.is_monitorable() {
            warn!("Skipping invalid wallet: {}", wallet.name);
            continue;
        }
        let balances = fetch_wallet_balances(&explorer, &config.tokens, wallet).await;
        publish_non_fatal(sink, &config.namespace, &wallet_points(&balances)).await;
        monitored.push(balances);
        sleep(WALLET_DELAY).await;
    }

    let totals = summarize_wallets(&monitored);
    if !monitored.is_empty() {
        publish_non_fatal(sink, &config.namespace, &aggregate_points(&totals)).await;
        info!(
            "Published aggregate metrics: ETH={}, LMR={}, USDC={}",
            totals.eth, totals.lmr, totals.usdc
        );
    }

    log_summary(&monitored, &totals);

    JobOutcome::ok(
        serde_json::json!({
            "message": "Wallet metrics published to CloudWatch",
            "wallets_processed": totals.monitored,
            "timestamp": started,
        })
        .to_string(),
    )
}

/// Fetch the three balances of one wallet, with courtesy delays between
/// the explorer calls.
async fn fetch_wallet_balances(
    explorer: &ExplorerClient,
    tokens: &TokenAddresses,
    wallet: &WalletEntry,
) -> WalletBalances {
    info!(
        "--- Fetching balances for {} ({}...) ---",
        wallet.name,
        address_prefix(&wallet.address, 10)
    );

    let eth_raw = explorer.eth_balance(&wallet.address).await;
    sleep(TOKEN_LOOKUP_DELAY).await;
    let lmr_raw = explorer
        .token_balance(&wallet.address, &tokens.lmr, "LMR balance")
        .await;
    sleep(TOKEN_LOOKUP_DELAY).await;
    let usdc_raw = explorer
        .token_balance(&wallet.address, &tokens.usdc, "USDC balance")
        .await;

    WalletBalances {
        name: wallet.name.clone(),
        address: wallet.address.clone(),
        eth: to_decimal(Some(&eth_raw), ETH_DECIMALS),
        lmr: to_decimal(Some(&lmr_raw), LMR_DECIMALS),
        usdc: to_decimal(Some(&usdc_raw), USDC_DECIMALS),
    }
}

/// Per-wallet gauges, tagged with the wallet name dimension.
pub fn wallet_points(balances: &WalletBalances) -> Vec<MetricPoint> {
    [
        ("eth_balance", balances.eth),
        ("lmr_balance", balances.lmr),
        ("usdc_balance", balances.usdc),
    ]
    .into_iter()
    .map(|(name, value)| {
        MetricPoint::new(name, value, MetricUnit::None)
            .with_dimension("WalletName", balances.name.clone())
    })
    .collect()
}

/// Aggregate totals across all monitored wallets.
pub fn aggregate_points(totals: &WalletTotals) -> Vec<MetricPoint> {
    vec![
        MetricPoint::new("total_eth_balance", totals.eth, MetricUnit::None),
        MetricPoint::new("total_lmr_balance", totals.lmr, MetricUnit::None),
        MetricPoint::new("total_usdc_balance", totals.usdc, MetricUnit::None),
        MetricPoint::new(
            "wallets_monitored",
            totals.monitored as f64,
            MetricUnit::Count,
        ),
    ]
}

fn address_prefix(address: &str, len: usize) -> &str {
    address.get(..len).unwrap_or(address)
}

fn log_summary(monitored: &[WalletBalances], totals: &WalletTotals) {
    info!("{}", "=".repeat(60));
    info!("WALLET BALANCE SUMMARY");
    info!("{}", "=".repeat(60));
    info!("{:<20} {:>12} {:>15} {:>12}", "Wallet", "ETH", "LMR", "USDC");
    info!("{}", "-".repeat(60));
    for wallet in monitored {
        info!(
            "{:<20} {:>12.6} {:>15.4} {:>12.4}",
            wallet.name, wallet.eth, wallet.lmr, wallet.usdc
        );
    }
    info!("{}", "-".repeat(60));
    info!(
        "{:<20} {:>12.6} {:>15.4} {:>12.4}",
        "TOTAL", totals.eth, totals.lmr, totals.usdc
    );
    info!("{}", "=".repeat(60));
}
