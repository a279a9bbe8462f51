//! Integration tests for the echo server, health endpoint, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use actual_request_url::echo::EchoResponse;
use actual_request_url::health::HealthResponse;
use actual_request_url::server::{self, AppState};

async fn start_test_server(assume_encrypted: bool) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(AppState::new(addr.port(), assume_encrypted));
    let router = server::build_router(state);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

#[tokio::test]
async fn forwarding_headers_are_honoured() {
    let (addr, shutdown) = start_test_server(false).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/a/b/c?x=y"))
        .header("x-forwarded-proto", "https")
        .header("x-forwarded-host", "example.com")
        .header("forwarded", "port=443")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("x-correlation-id"));

    let body: EchoResponse = resp.json().await.unwrap();
    assert_eq!(body.url.as_deref(), Some("https://example.com/a/b/c?x=y"));
    assert_eq!(body.scheme.as_deref(), Some("https"));
    assert_eq!(body.port, None);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn direct_request_uses_host_header_and_socket() {
    let (addr, shutdown) = start_test_server(false).await;

    let body: EchoResponse = reqwest::get(format!("http://{addr}/plain?q=1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body.url,
        Some(format!("http://127.0.0.1:{}/plain?q=1", addr.port()))
    );

    let _ = shutdown.send(());
}

#[tokio::test]
async fn assume_encrypted_switches_default_scheme() {
    let (addr, shutdown) = start_test_server(true).await;

    let body: EchoResponse = reqwest::Client::new()
        .get(format!("http://{addr}/secure"))
        .header("x-forwarded-host", "example.com")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body.url,
        Some(format!("https://example.com:{}/secure", addr.port()))
    );

    let _ = shutdown.send(());
}

#[tokio::test]
async fn correlation_id_is_echoed() {
    let (addr, shutdown) = start_test_server(false).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .header("x-correlation-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-correlation-id"], "abc-123");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_counts_resolutions() {
    let (addr, shutdown) = start_test_server(false).await;

    reqwest::get(format!("http://{addr}/one")).await.unwrap();

    let health: HealthResponse = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.local_port, addr.port());
    assert_eq!(health.stats.requests_resolved, 1);
    assert_eq!(health.stats.requests_unresolved, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (addr, shutdown) = start_test_server(false).await;

    let url = format!("http://{addr}/health");
    assert!(reqwest::get(&url).await.is_ok());

    let _ = shutdown.send(());

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
