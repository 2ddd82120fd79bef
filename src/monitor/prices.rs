//! Public price feed and network difficulty clients.
//!
//! All lookups degrade to zero on failure (with a fallback warning) so a
//! feed outage costs one data point, not the whole scheduled run.

use serde::Deserialize;

use crate::monitor::convert::scale_difficulty;
use crate::monitor::fetch::{fallback_value, FetchError, Fetcher};

const COINBASE_SPOT_BASE: &str = "https://api.coinbase.com/v2/prices";
const COINGECKO_LUMERIN_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=lumerin&vs_currencies=usd,btc";
const DIFFICULTY_URL: &str = "https://blockchain.info/q/getdifficulty";

/// Dual quote for the Lumerin token.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct LumerinPrice {
    /// USD quote
    #[serde(default)]
    pub usd: f64,
    /// BTC quote
    #[serde(default)]
    pub btc: f64,
}

#[derive(Debug, Deserialize)]
struct LumerinQuoteEnvelope {
    #[serde(default)]
    lumerin: LumerinPrice,
}

#[derive(Debug, Deserialize)]
struct SpotEnvelope {
    data: SpotData,
}

#[derive(Debug, Deserialize)]
struct SpotData {
    amount: String,
}

/// Client for the public price and difficulty feeds.
#[derive(Debug, Clone)]
pub struct PriceFeeds {
    fetcher: Fetcher,
}

impl PriceFeeds {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Coinbase spot quote for a pair such as `BTC-USD`; 0.0 on failure.
    pub async fn spot_price(&self, pair: &str) -> f64 {
        let url = format!("{COINBASE_SPOT_BASE}/{pair}/spot");
        match self.fetch_spot(&url).await {
            Ok(price) => price,
            Err(e) => fallback_value(&format!("{pair} spot price"), &e),
        }
    }

    async fn fetch_spot(&self, url: &str) -> Result<f64, FetchError> {
        let envelope: SpotEnvelope = self.fetcher.get_typed(url).await?;
        envelope
            .data
            .amount
            .parse::<f64>()
            .map_err(|e| FetchError::InvalidBody(format!("non-numeric amount: {e}")))
    }

    /// CoinGecko Lumerin USD/BTC quote; zero quotes on failure.
    pub async fn lumerin_price(&self) -> LumerinPrice {
        match self
            .fetcher
            .get_typed::<LumerinQuoteEnvelope>(COINGECKO_LUMERIN_URL)
            .await
        {
            Ok(envelope) => envelope.lumerin,
            Err(e) => fallback_value("lumerin price", &e),
        }
    }

    /// Bitcoin network difficulty scaled to terahash terms; 0.0 on failure.
    pub async fn btc_difficulty_t(&self) -> f64 {
        match self.fetch_difficulty().await {
            Ok(difficulty) => difficulty,
            Err(e) => fallback_value("btc difficulty", &e),
        }
    }

    async fn fetch_difficulty(&self) -> Result<f64, FetchError> {
        let body = self.fetcher.get_text(DIFFICULTY_URL).await?;
        let raw = body
            .trim()
            .parse::<f64>()
            .map_err(|e| FetchError::InvalidBody(format!("non-numeric difficulty: {e}")))?;
        Ok(scale_difficulty(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_envelope_shape() {
        let envelope: SpotEnvelope =
            serde_json::from_str(r#"{"data":{"base":"BTC","currency":"USD","amount":"67012.34"}}"#)
                .expect("coinbase shape");
        assert_eq!(envelope.data.amount, "67012.34");
    }

    #[test]
    fn test_lumerin_envelope_shape() {
        let envelope: LumerinQuoteEnvelope =
            serde_json::from_str(r#"{"lumerin":{"usd":0.0421,"btc":0.00000065}}"#)
                .expect("coingecko shape");
        assert_eq!(envelope.lumerin.usd, 0.0421);
        assert_eq!(envelope.lumerin.btc, 0.00000065);
    }

    #[test]
    fn test_missing_asset_defaults_to_zero_quotes() {
        let envelope: LumerinQuoteEnvelope = serde_json::from_str("{}").expect("empty body");
        assert_eq!(envelope.lumerin, LumerinPrice::default());
    }
}
