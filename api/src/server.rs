use crate::scheduler::SchedulerHandle;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;

/// Serve `app` until `shutdown` resolves or the server fails.
///
/// The collector is stopped on every exit path, including bind errors.
pub async fn run_server<F>(
    app: Router,
    addr: SocketAddr,
    collector: SchedulerHandle,
    shutdown: F,
) -> Result<(), hyper::Error>
where
    F: Future<Output = ()>,
{
    let served = match axum::Server::try_bind(&addr) {
        Ok(builder) => {
            info!("Listening on {}", addr);
            builder
                .serve(app.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await
        }
        Err(e) => Err(e),
    };

    collector.shutdown().await;
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::router;
    use crate::scheduler::Scheduler;
    use crate::service::CollectorService;
    use crate::test_support::{spot_payload, MemoryRepository, ScriptedFetcher};
    use std::sync::Arc;
    use std::time::Duration;

    fn service(fetcher: Arc<ScriptedFetcher>) -> Arc<CollectorService> {
        Arc::new(CollectorService::new(
            fetcher,
            Arc::new(MemoryRepository::default()),
        ))
    }

    #[tokio::test]
    async fn bind_failure_still_stops_the_collector() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let fetcher = Arc::new(ScriptedFetcher::always(spot_payload("100")));
        let service = service(fetcher.clone());
        let collector = Scheduler::new(service.clone(), Duration::from_millis(10)).spawn();

        let result = run_server(router(service), addr, collector, std::future::pending()).await;
        assert!(result.is_err());

        let calls = fetcher.calls();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fetcher.calls(), calls);
    }

    #[tokio::test]
    async fn graceful_shutdown_stops_the_collector() {
        let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = free.local_addr().unwrap();
        drop(free);

        let fetcher = Arc::new(ScriptedFetcher::always(spot_payload("100")));
        let service = service(fetcher.clone());
        let collector = Scheduler::new(service.clone(), Duration::from_millis(10)).spawn();

        let result = run_server(
            router(service),
            addr,
            collector,
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await;
        assert!(result.is_ok());

        let calls = fetcher.calls();
        assert!(calls >= 1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fetcher.calls(), calls);
    }
}
