use common::{models::PriceRecord, Result};
use connectors::{normalize, QuoteFetcher};
use std::sync::Arc;
use store::PriceRepository;
use tracing::debug;

/// The collection pipeline: fetch, normalize, persist
pub struct CollectorService {
    /// Upstream spot price source
    fetcher: Arc<dyn QuoteFetcher>,
    /// Durable storage for collected prices
    repository: Arc<dyn PriceRepository>,
}

impl CollectorService {
    pub fn new(fetcher: Arc<dyn QuoteFetcher>, repository: Arc<dyn PriceRepository>) -> Self {
        Self {
            fetcher,
            repository,
        }
    }

    /// Run one collection cycle and return the stored record
    pub async fn collect_once(&self) -> Result<PriceRecord> {
        debug!("Collecting spot price for {}", self.fetcher.pair());

        let payload = self.fetcher.fetch().await?;
        let record = normalize(&payload)?;
        self.repository.save(&record).await
    }

    /// Most recent stored records, newest first
    pub async fn recent_records(&self, limit: Option<i64>) -> Result<Vec<PriceRecord>> {
        self.repository.list_recent(limit).await
    }
}
