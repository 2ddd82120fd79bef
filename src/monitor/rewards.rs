//! Theoretical mining earnings and Lumerin breakeven estimation.

/// Average Bitcoin block interval used for the reward estimate.
const AVERAGE_BLOCK_TIME_MINUTES: f64 = 10.0;

/// Fixed assumptions the financials job estimates against.
#[derive(Debug, Clone, Copy)]
pub struct MiningAssumptions {
    /// Hashrate under management, TH/s
    pub hashrate_ths: f64,
    /// Hours of mining covered by the estimate
    pub mining_hours: f64,
    /// Block subsidy in BTC
    pub block_reward_btc: f64,
}

impl Default for MiningAssumptions {
    fn default() -> Self {
        Self {
            hashrate_ths: 100.0,
            mining_hours: 24.0,
            block_reward_btc: 6.25,
        }
    }
}

/// Output of one earnings estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EarningsEstimate {
    /// Expected earnings over the window, BTC
    pub earnings_btc: f64,
    /// Expected earnings over the window, USD
    pub earnings_usd: f64,
    /// BTC-denominated Lumerin breakeven figure
    pub breakeven_btc: f64,
}

/// Estimate expected earnings from network difficulty and spot prices.
///
/// `difficulty_t` is the network difficulty already scaled to terahash
/// terms; `lmr_btc` is the Lumerin token's BTC quote. A zero difficulty or
/// zero quote yields a zero estimate rather than a division fault.
pub fn estimate(
    assumptions: MiningAssumptions,
    btc_price_usd: f64,
    difficulty_t: f64,
    lmr_btc: f64,
) -> EarningsEstimate {
    let blocks_mined = assumptions.mining_hours * (60.0 / AVERAGE_BLOCK_TIME_MINUTES);
    let network_hashrate_ths =
        difficulty_t * 2f64.powi(32) / (AVERAGE_BLOCK_TIME_MINUTES * 60.0);

    let earnings_btc = if network_hashrate_ths > 0.0 {
        (assumptions.hashrate_ths / network_hashrate_ths)
            * assumptions.block_reward_btc
            * blocks_mined
    } else {
        0.0
    };
    let earnings_usd = earnings_btc * btc_price_usd;
    let breakeven_btc = if lmr_btc > 0.0 {
        earnings_btc / lmr_btc
    } else {
        0.0
    };

    EarningsEstimate {
        earnings_btc,
        earnings_usd,
        breakeven_btc,
    }
}
