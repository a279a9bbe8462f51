//! `actual-url serve` — start the echo server.
//!
//! Binds the listener, records the port it actually got (so `--port 0`
//! works), and serves until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::ServeArgs;
use crate::error::ActualUrlError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: ServeArgs) -> Result<(), ActualUrlError> {
    logging::init(
        &args.log_level,
        logging::resolve_format(args.pretty, args.json),
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;

    let state = Arc::new(AppState::new(bound.port(), args.assume_encrypted));
    let router = server::build_router(state);

    tracing::info!(
        addr = %bound,
        assume_encrypted = args.assume_encrypted,
        "actual-url echo server started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("actual-url echo server stopped");
    Ok(())
}
