//! `actual-url health` — probe a running echo server.
//!
//! Fetches `/health` with a plain hyper client and prints either the raw
//! JSON or a short summary of uptime and resolution counters.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::ActualUrlError;
use crate::health::HealthResponse;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), ActualUrlError> {
    let body = fetch_health(&args.url).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print_summary(&args.url, &health),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }
    Ok(())
}

fn http_error(e: impl std::error::Error + Send + Sync + 'static) -> ActualUrlError {
    ActualUrlError::HttpRequest {
        source: Box::new(e),
    }
}

async fn fetch_health(base: &str) -> Result<Bytes, ActualUrlError> {
    let uri: hyper::Uri = format!("{}/health", base.trim_end_matches('/'))
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| ActualUrlError::UriParse {
            source: Box::new(e),
        })?;

    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let request = hyper::Request::get(uri)
        .body(Full::new(Bytes::new()))
        .map_err(http_error)?;

    let response = tokio::time::timeout(PROBE_TIMEOUT, client.request(request))
        .await
        .map_err(|_| ActualUrlError::HttpRequest {
            source: format!("health check timed out after {}s", PROBE_TIMEOUT.as_secs()).into(),
        })?
        .map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ActualUrlError::HealthCheckFailed(status));
    }

    Ok(response
        .into_body()
        .collect()
        .await
        .map_err(http_error)?
        .to_bytes())
}

fn print_summary(url: &str, health: &HealthResponse) {
    println!("\u{2713} actual-url is healthy ({url})");
    println!("  version:    {} ({})", health.version, health.build.git);
    println!("  uptime:     {}", format_uptime(health.uptime_seconds));
    println!("  local port: {}", health.local_port);
    println!(
        "  requests:   {} resolved, {} unresolved",
        health.stats.requests_resolved, health.stats.requests_unresolved
    );
}

fn format_uptime(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    match (hours, minutes) {
        (0, 0) => format!("{secs}s"),
        (0, _) => format!("{minutes}m {secs}s"),
        _ => format!("{hours}h {minutes}m {secs}s"),
    }
}
