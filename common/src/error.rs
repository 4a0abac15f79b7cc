use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Quote API error: {0}")]
    FetchError(String),

    #[error("Invalid data: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification used by callers that only care about which stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Validation,
    Storage,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::HttpError(_) | Error::FetchError(_) => ErrorKind::Fetch,
            Error::ValidationError(_) => ErrorKind::Validation,
            Error::DbError(_) => ErrorKind::Storage,
            Error::ConfigError(_) | Error::InternalError(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_pipeline_stage() {
        assert_eq!(Error::FetchError("503".into()).kind(), ErrorKind::Fetch);
        assert_eq!(
            Error::ValidationError("amount".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::DbError("closed".into()).kind(), ErrorKind::Storage);
        assert_eq!(Error::ConfigError("DB_URL".into()).kind(), ErrorKind::Internal);
    }
}
