mod config;
mod error;
mod price_store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use price_store::{effective_limit, PriceStore, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT};

use async_trait::async_trait;
use common::{
    models::{NewPriceRecord, PriceRecord},
    Result,
};

/// Durable storage for collected price records
#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// Persist one record atomically and return it with its assigned id
    async fn save(&self, record: &NewPriceRecord) -> Result<PriceRecord>;

    /// Most recent records, newest first. `None` or a non-positive limit means the default.
    async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<PriceRecord>>;
}
