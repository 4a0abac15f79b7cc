pub mod coinbase;
pub mod config;
pub mod normalize;

pub use config::ConnectorConfig;
pub use normalize::normalize;

use async_trait::async_trait;
use common::{models::TradingPair, Result};

/// Trait defining the interface for spot price sources
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// The pair this fetcher quotes
    fn pair(&self) -> &TradingPair;

    /// Fetch the raw spot price payload, without interpreting it
    async fn fetch(&self) -> Result<serde_json::Value>;
}
