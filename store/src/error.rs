use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Postgres connection error: {0}")]
    ConnectionError(String),

    #[error("Postgres query error: {0}")]
    QueryError(String),

    #[error("Postgres write error: {0}")]
    WriteError(String),

    #[error("Schema initialization error: {0}")]
    SchemaError(String),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        common::Error::DbError(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::ConnectionError(err.to_string())
            }
            other => StoreError::QueryError(other.to_string()),
        }
    }
}
