//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the bound port,
//! counters, and uptime), [`build_router`] for constructing the Axum
//! router with its middleware layers, and [`shutdown_signal`] for
//! SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::echo::echo_handler;
use crate::health::health_handler;
use crate::request::Sock;

#[derive(Debug)]
pub struct Stats {
    pub resolved: AtomicU64,
    pub unresolved: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resolved: AtomicU64::new(0),
            unresolved: AtomicU64::new(0),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub start_time: Instant,
    /// Port the listener is actually bound to.
    pub local_port: u16,
    pub assume_encrypted: bool,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(local_port: u16, assume_encrypted: bool) -> Self {
        Self {
            start_time: Instant::now(),
            local_port,
            assume_encrypted,
            stats: Stats::new(),
        }
    }

    /// Connection facts handed to the resolver for every request.
    #[must_use]
    pub const fn sock(&self) -> Sock {
        if self.assume_encrypted {
            Sock::tls(self.local_port)
        } else {
            Sock::plain(self.local_port)
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let sock = state.sock();
    Router::new()
        .route("/health", get(health_handler))
        .fallback(echo_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(sock)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
