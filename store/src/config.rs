use std::time::Duration;

/// Configuration for the Postgres store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Postgres connection string
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
    /// Connections older than this are recycled
    pub max_lifetime: Duration,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            max_lifetime: Duration::from_secs(300),
        }
    }

    /// Create a new store configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = std::env::var("DB_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| "DB_URL environment variable not set")?;

        let mut config = Self::new(url);
        if let Some(max) = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|m| m.parse().ok())
            .filter(|m| *m > 0)
        {
            config.max_connections = max;
        }

        Ok(config)
    }
}
