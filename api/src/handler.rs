use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use common::{models::PriceRecord, Error as CommonError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error};

use crate::service::CollectorService;

type SharedService = Arc<CollectorService>;

/// Envelope shared by every response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn success(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        })
    }
}

// Wrapper so common::Error can become an HTTP response
pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.kind() {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "Invalid data"),
            ErrorKind::Fetch => (StatusCode::BAD_GATEWAY, "Failed to reach the quote API"),
            ErrorKind::Storage | ErrorKind::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };

        let body = ApiResponse {
            status: "error",
            message: format!("{}: {}", message, self.0),
            data: None::<()>,
        };

        (status, Json(body)).into_response()
    }
}

pub fn router(service: SharedService) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/collect-now", post(collect_now))
        .route("/recent-records", get(recent_records))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

pub async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        status: "success",
        message: "Crypto spot price collector".to_string(),
        data: None,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub time: NaiveDateTime,
}

pub async fn health() -> Json<ApiResponse<HealthStatus>> {
    ApiResponse::success(
        "ok",
        HealthStatus {
            time: Utc::now().naive_utc(),
        },
    )
}

// Run one collection cycle now and return what was stored
pub async fn collect_now(
    State(service): State<SharedService>,
) -> Result<Json<ApiResponse<PriceRecord>>, ApiError> {
    let record = service.collect_once().await.map_err(|e| {
        error!("Manual collection failed: {}", e);
        e
    })?;

    Ok(ApiResponse::success("Price collected", record))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecentRecords {
    pub total: usize,
    pub records: Vec<PriceRecord>,
}

// List the most recent stored prices
pub async fn recent_records(
    State(service): State<SharedService>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ApiResponse<RecentRecords>>, ApiError> {
    // Unparsable limits fall back to the default, like a missing one
    let limit = query.limit.as_deref().and_then(|l| l.trim().parse::<i64>().ok());
    debug!("Listing recent records, limit {:?}", limit);

    let records = service.recent_records(limit).await?;

    Ok(ApiResponse::success(
        "Recent records",
        RecentRecords {
            total: records.len(),
            records,
        },
    ))
}
