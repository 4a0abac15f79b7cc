use crate::{ConnectorConfig, QuoteFetcher};
use async_trait::async_trait;
use common::{models::TradingPair, Error, Result};
use tracing::{debug, error};

/// Coinbase public spot price client
pub struct CoinbaseConnector {
    client: reqwest::Client,
    base_url: String,
    pair: TradingPair,
}

impl CoinbaseConnector {
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            pair: config.pair,
        })
    }

    fn spot_url(&self) -> String {
        format!("{}/prices/{}/spot", self.base_url, self.pair)
    }
}

#[async_trait]
impl QuoteFetcher for CoinbaseConnector {
    fn pair(&self) -> &TradingPair {
        &self.pair
    }

    async fn fetch(&self) -> Result<serde_json::Value> {
        let url = self.spot_url();

        debug!("Fetching spot price from Coinbase: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Coinbase API error: {} - {}", status, error_text);
            return Err(Error::FetchError(format!(
                "Coinbase API error: {} - {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                Error::ValidationError(format!("Failed to parse Coinbase response: {}", e))
            } else {
                Error::HttpError(e)
            }
        })?;

        debug!("Coinbase payload: {}", payload);

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use common::ErrorKind;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn serve(app: Router) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });
        format!("http://{}", addr)
    }

    fn connector(base_url: String, timeout: Duration) -> CoinbaseConnector {
        CoinbaseConnector::new(ConnectorConfig {
            base_url,
            timeout,
            ..ConnectorConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn returns_raw_payload_on_success() {
        let app = Router::new().route(
            "/prices/BTC-USD/spot",
            get(|| async {
                Json(serde_json::json!({
                    "data": {"amount": "67321.50", "base": "BTC", "currency": "USD"}
                }))
            }),
        );
        let base_url = serve(app).await;

        let payload = connector(base_url, Duration::from_secs(5))
            .fetch()
            .await
            .unwrap();

        assert_eq!(payload["data"]["amount"], "67321.50");
        assert_eq!(payload["data"]["base"], "BTC");
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let app = Router::new().route(
            "/prices/BTC-USD/spot",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base_url = serve(app).await;

        let err = connector(base_url, Duration::from_secs(5))
            .fetch()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let app = Router::new().route(
            "/prices/BTC-USD/spot",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        );
        let base_url = serve(app).await;

        let err = connector(base_url, Duration::from_millis(200))
            .fetch()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = connector(format!("http://{}", addr), Duration::from_secs(1))
            .fetch()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn connection_dropped_mid_body_is_a_fetch_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 500\r\n\r\n{\"data\":{\"amount\"",
                )
                .await
                .unwrap();
            let _ = socket.shutdown().await;
        });

        let err = connector(format!("http://{}", addr), Duration::from_secs(5))
            .fetch()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_data() {
        let app = Router::new().route("/prices/BTC-USD/spot", get(|| async { "<html>" }));
        let base_url = serve(app).await;

        let err = connector(base_url, Duration::from_secs(5))
            .fetch()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
