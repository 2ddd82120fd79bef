//! Single-pass aggregation over upstream record lists.
//!
//! Each summary is a fold over the records returned by one pool API
//! endpoint. Empty inputs always produce the zero summary.

use std::collections::HashSet;

use serde::Deserialize;

use crate::monitor::convert::scale_hashrate;
use crate::types::WalletBalances;

/// Share counters reported per miner by the pool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareStats {
    /// Shares we accepted
    #[serde(default)]
    pub we_accepted_shares: u64,
    /// Shares we accepted that upstream rejected
    #[serde(default)]
    pub we_accepted_they_rejected: u64,
    /// Shares we rejected
    #[serde(default)]
    pub we_rejected_shares: u64,
    /// Shares we rejected that upstream accepted
    #[serde(default)]
    pub we_rejected_they_accepted: u64,
}

/// One miner entry from the pool's `/miners` report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinerRecord {
    /// Difficulty currently assigned to the worker
    #[serde(rename = "CurrentDifficulty", default)]
    pub current_difficulty: f64,
    /// Lifetime share counters
    #[serde(rename = "Stats", default)]
    pub stats: ShareStats,
}

/// Fleet-wide share totals and the average assigned difficulty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinerShareTotals {
    /// Mean of per-miner difficulty; 0 for an empty fleet
    pub average_difficulty: f64,
    /// Sum of `we_accepted_shares`
    pub accepted_shares: u64,
    /// Sum of `we_accepted_they_rejected`
    pub accepted_they_rejected: u64,
    /// Sum of `we_rejected_shares`
    pub rejected_shares: u64,
    /// Sum of `we_rejected_they_accepted`
    pub rejected_they_accepted: u64,
}

/// Fold per-miner records into fleet totals.
pub fn summarize_miners(miners: &[MinerRecord]) -> MinerShareTotals {
    let mut totals = MinerShareTotals::default();
    if miners.is_empty() {
        return totals;
    }

    let mut total_difficulty = 0.0;
    for miner in miners {
        total_difficulty += miner.current_difficulty;
        totals.accepted_shares += miner.stats.we_accepted_shares;
        totals.accepted_they_rejected += miner.stats.we_accepted_they_rejected;
        totals.rejected_shares += miner.stats.we_rejected_shares;
        totals.rejected_they_accepted += miner.stats.we_rejected_they_accepted;
    }
    totals.average_difficulty = total_difficulty / miners.len() as f64;
    totals
}

/// Target resource estimates attached to a marketplace contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceEstimates {
    /// Contracted hashrate in GH/s
    #[serde(default)]
    pub hashrate_ghs: f64,
}

/// One contract entry from the pool's `/contracts-v2` report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractRecord {
    /// Buyer address; empty string when unsold
    #[serde(rename = "BuyerAddr", default)]
    pub buyer_addr: String,
    /// Soft-delete flag
    #[serde(rename = "IsDeleted", default)]
    pub is_deleted: bool,
    /// Offered resource estimates
    #[serde(rename = "ResourceEstimatesTarget", default)]
    pub resource_estimates_target: ResourceEstimates,
}

/// Marketplace offer summary derived from the contract list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractOfferSummary {
    /// Offered hashrate across non-deleted contracts, PH/s
    pub offered_hashrate_phs: f64,
    /// Number of non-deleted contracts
    pub offered_count: usize,
    /// Distinct non-empty buyer addresses
    pub unique_buyers: usize,
}

/// Fold the contract list into the offer summary.
///
/// Hashrate and contract counts skip soft-deleted contracts; the buyer set
/// intentionally scans every record, matching the upstream API's observed
/// semantics (a deleted contract's buyer still counts as a known buyer).
pub fn summarize_contracts(contracts: &[ContractRecord]) -> ContractOfferSummary {
    let mut offered_ghs = 0.0;
    let mut offered_count = 0;
    let mut buyers: HashSet<&str> = HashSet::new();

    for contract in contracts {
        if !contract.is_deleted {
            offered_ghs += contract.resource_estimates_target.hashrate_ghs;
            offered_count += 1;
        }
        if !contract.buyer_addr.is_empty() {
            buyers.insert(contract.buyer_addr.as_str());
        }
    }

    ContractOfferSummary {
        offered_hashrate_phs: scale_hashrate(offered_ghs),
        offered_count,
        unique_buyers: buyers.len(),
    }
}

/// Aggregate balances across the successfully monitored wallets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletTotals {
    /// Sum of native coin balances
    pub eth: f64,
    /// Sum of Lumerin token balances
    pub lmr: f64,
    /// Sum of USDC balances
    pub usdc: f64,
    /// Number of wallets that were actually processed
    pub monitored: usize,
}

/// Fold per-wallet balances into aggregate totals.
pub fn summarize_wallets(wallets: &[WalletBalances]) -> WalletTotals {
    let mut totals = WalletTotals {
        monitored: wallets.len(),
        ..WalletTotals::default()
    };
    for wallet in wallets {
        totals.eth += wallet.eth;
        totals.lmr += wallet.lmr;
        totals.usdc += wallet.usdc;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn miner(difficulty: f64, accepted: u64) -> MinerRecord {
        MinerRecord {
            current_difficulty: difficulty,
            stats: ShareStats {
                we_accepted_shares: accepted,
                ..ShareStats::default()
            },
        }
    }

    fn contract(buyer: &str, deleted: bool, ghs: f64) -> ContractRecord {
        ContractRecord {
            buyer_addr: buyer.to_string(),
            is_deleted: deleted,
            resource_estimates_target: ResourceEstimates { hashrate_ghs: ghs },
        }
    }

    #[test]
    fn test_miner_totals() {
        let miners = vec![miner(10.0, 5), miner(20.0, 3), miner(30.0, 2)];
        let totals = summarize_miners(&miners);
        assert_eq!(totals.average_difficulty, 20.0);
        assert_eq!(totals.accepted_shares, 10);
    }

    #[test]
    fn test_empty_fleet_has_zero_average() {
        let totals = summarize_miners(&[]);
        assert_eq!(totals, MinerShareTotals::default());
        assert_eq!(totals.average_difficulty, 0.0);
    }

    #[test]
    fn test_miner_rejected_counters_sum() {
        let mut a = miner(1.0, 0);
        a.stats.we_rejected_shares = 4;
        a.stats.we_rejected_they_accepted = 1;
        let mut b = miner(3.0, 0);
        b.stats.we_rejected_shares = 6;
        b.stats.we_accepted_they_rejected = 2;

        let totals = summarize_miners(&[a, b]);
        assert_eq!(totals.rejected_shares, 10);
        assert_eq!(totals.rejected_they_accepted, 1);
        assert_eq!(totals.accepted_they_rejected, 2);
        assert_eq!(totals.average_difficulty, 2.0);
    }

    #[test]
    fn test_unique_buyers_excludes_empty_and_dedupes() {
        let contracts = vec![
            contract("A", false, 1_000_000.0),
            contract("B", false, 2_000_000.0),
            contract("A", false, 500_000.0),
            contract("", false, 250_000.0),
            contract("C", true, 4_000_000.0),
        ];
        let summary = summarize_contracts(&contracts);
        // deleted contract is excluded from hashrate and count,
        // but its buyer still lands in the buyer set
        assert_eq!(summary.unique_buyers, 3);
        assert_eq!(summary.offered_count, 4);
        assert_eq!(summary.offered_hashrate_phs, 3.75);
    }

    #[test]
    fn test_empty_contract_list() {
        assert_eq!(summarize_contracts(&[]), ContractOfferSummary::default());
    }

    #[test]
    fn test_wallet_totals() {
        let wallets = vec![
            WalletBalances {
                name: "A".to_string(),
                address: "0xaaa".to_string(),
                eth: 1.5,
                lmr: 100.0,
                usdc: 20.0,
            },
            WalletBalances {
                name: "B".to_string(),
                address: "0xbbb".to_string(),
                eth: 0.5,
                lmr: 50.0,
                usdc: 5.0,
            },
        ];
        let totals = summarize_wallets(&wallets);
        assert_eq!(totals.eth, 2.0);
        assert_eq!(totals.lmr, 150.0);
        assert_eq!(totals.usdc, 25.0);
        assert_eq!(totals.monitored, 2);
    }

    #[test]
    fn test_no_wallets() {
        assert_eq!(summarize_wallets(&[]), WalletTotals::default());
    }
}
