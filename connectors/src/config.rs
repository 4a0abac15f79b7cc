use common::{models::TradingPair, Result};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.coinbase.com/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the upstream spot price API
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Base URL of the quote API
    pub base_url: String,
    /// Pair to quote
    pub pair: TradingPair,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            pair: TradingPair::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectorConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SPOT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let pair = match std::env::var("SPOT_PAIR") {
            Ok(raw) => raw.parse()?,
            Err(_) => TradingPair::default(),
        };
        let timeout = std::env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            pair,
            timeout: Duration::from_secs(timeout),
        })
    }
}
