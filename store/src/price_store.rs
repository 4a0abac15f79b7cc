use crate::{PriceRepository, StoreConfig, StoreError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use common::{
    models::{NewPriceRecord, PriceRecord},
    Result,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, error, info, warn};

pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_RECENT_LIMIT: i64 = 1000;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS crypto_prices (
    id SERIAL PRIMARY KEY,
    valor DOUBLE PRECISION NOT NULL,
    cripto VARCHAR(10) NOT NULL,
    moeda VARCHAR(10) NOT NULL,
    "timestamp" TIMESTAMP WITHOUT TIME ZONE NOT NULL
)"#;

const CREATE_TIMESTAMP_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS crypto_prices_timestamp_idx
    ON crypto_prices ("timestamp" DESC)"#;

const INSERT_PRICE: &str = r#"
INSERT INTO crypto_prices (valor, cripto, moeda, "timestamp")
VALUES ($1, $2, $3, $4)
RETURNING id"#;

const SELECT_RECENT: &str = r#"
SELECT id, valor, cripto, moeda, "timestamp"
FROM crypto_prices
ORDER BY "timestamp" DESC, id DESC
LIMIT $1"#;

#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: i32,
    valor: f64,
    cripto: String,
    moeda: String,
    timestamp: NaiveDateTime,
}

impl From<PriceRow> for PriceRecord {
    fn from(row: PriceRow) -> Self {
        PriceRecord {
            id: row.id,
            value: row.valor,
            asset: row.cripto,
            quote_currency: row.moeda,
            captured_at: row.timestamp,
        }
    }
}

/// Resolve the requested row count: missing or non-positive falls back to the default.
pub fn effective_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(n) if n > 0 => n.min(MAX_RECENT_LIMIT),
        _ => DEFAULT_RECENT_LIMIT,
    }
}

/// Postgres-backed store for the `crypto_prices` table
#[derive(Clone)]
pub struct PriceStore {
    pool: PgPool,
}

impl PriceStore {
    /// Build the connection pool. Connections are opened lazily, on first use.
    pub fn new(config: StoreConfig) -> std::result::Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .max_lifetime(config.max_lifetime)
            .test_before_acquire(true)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SET TIME ZONE 'UTC'").execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect_lazy(&config.url)
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create the table and index if they do not exist yet. Safe to call on every start.
    pub async fn init_schema(&self) -> std::result::Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(CREATE_TABLE)
            .execute(&mut *conn)
            .await
            .map_err(|e| StoreError::SchemaError(e.to_string()))?;
        sqlx::query(CREATE_TIMESTAMP_INDEX)
            .execute(&mut *conn)
            .await
            .map_err(|e| StoreError::SchemaError(e.to_string()))?;

        info!("Table crypto_prices is ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn insert(&self, record: &NewPriceRecord) -> std::result::Result<i32, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, i32>(INSERT_PRICE)
            .bind(record.value)
            .bind(&record.asset)
            .bind(&record.quote_currency)
            .bind(record.captured_at)
            .fetch_one(&mut *tx)
            .await;

        match inserted {
            Ok(id) => {
                tx.commit()
                    .await
                    .map_err(|e| StoreError::WriteError(e.to_string()))?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback after failed insert also failed: {}", rollback_err);
                }
                Err(StoreError::WriteError(e.to_string()))
            }
        }
    }

    async fn select_recent(&self, limit: i64) -> std::result::Result<Vec<PriceRecord>, StoreError> {
        debug!("Loading {} most recent prices", limit);

        let rows = sqlx::query_as::<_, PriceRow>(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PriceRecord::from).collect())
    }
}

#[async_trait]
impl PriceRepository for PriceStore {
    async fn save(&self, record: &NewPriceRecord) -> Result<PriceRecord> {
        record.validate()?;

        debug!(
            "Storing price: {} {} at {}",
            record.asset, record.quote_currency, record.value
        );

        let id = self.insert(record).await.map_err(|e| {
            error!("Failed to store price: {}", e);
            e
        })?;

        let stored = record.clone().into_stored(id);
        info!(
            "Stored price #{}: {}={} {} at {}",
            stored.id, stored.asset, stored.value, stored.quote_currency, stored.captured_at
        );
        Ok(stored)
    }

    async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<PriceRecord>> {
        Ok(self.select_recent(effective_limit(limit)).await?)
    }
}
