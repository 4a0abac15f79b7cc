mod config;
mod handler;
mod scheduler;
mod server;
mod service;
#[cfg(test)]
mod test_support;

use config::{ApiConfig, RunMode};
use connectors::{coinbase::CoinbaseConnector, ConnectorConfig};
use scheduler::Scheduler;
use service::CollectorService;
use std::net::SocketAddr;
use std::sync::Arc;
use store::{PriceStore, StoreConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting spot price collector");

    // Load configuration from environment
    let api_config =
        ApiConfig::from_env().map_err(|e| format!("Failed to load API configuration: {}", e))?;
    let store_config = StoreConfig::from_env()
        .map_err(|e| format!("Failed to load store configuration: {}", e))?;
    let connector_config = ConnectorConfig::from_env()
        .map_err(|e| format!("Failed to load connector configuration: {}", e))?;

    // Create Postgres store and make sure the table exists
    let price_store = Arc::new(
        PriceStore::new(store_config)
            .map_err(|e| format!("Failed to create price store: {}", e))?,
    );
    price_store.init_schema().await.map_err(|e| {
        error!("Failed to initialize schema: {}", e);
        format!("Failed to initialize schema: {}", e)
    })?;

    let coinbase = Arc::new(
        CoinbaseConnector::new(connector_config)
            .map_err(|e| format!("Failed to create Coinbase connector: {}", e))?,
    );

    let service = Arc::new(CollectorService::new(coinbase, price_store.clone()));
    let scheduler = Scheduler::new(service.clone(), api_config.collect_interval);

    match api_config.mode {
        RunMode::Server => {
            let addr: SocketAddr = api_config
                .bind_address()
                .parse()
                .map_err(|e| format!("Invalid listen address: {}", e))?;

            let collector = scheduler.spawn();
            let app = handler::router(service);

            let served = server::run_server(app, addr, collector, shutdown_signal()).await;
            if let Err(e) = served {
                error!("HTTP server failed: {}", e);
                price_store.close().await;
                return Err(e.into());
            }
        }
        RunMode::Local => {
            info!("Running collector in local mode");
            let collector = scheduler.spawn();
            shutdown_signal().await;
            collector.shutdown().await;
        }
    }

    price_store.close().await;
    info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
