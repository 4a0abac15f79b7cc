use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a pair of coins being quoted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TradingPair {
    pub base: String,   // Base currency (e.g., BTC)
    pub quote: String,  // Quote currency (e.g., USD)
}

impl TradingPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        }
    }
}

impl Default for TradingPair {
    fn default() -> Self {
        Self::new("BTC", "USD")
    }
}

impl std::fmt::Display for TradingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = Error;

    /// Parses `BASE-QUOTE`, e.g. `BTC-USD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('-') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base, quote))
            }
            _ => Err(Error::ConfigError(format!(
                "Invalid trading pair '{}', expected BASE-QUOTE",
                s
            ))),
        }
    }
}
