//! Fallback handler that answers every request with its resolved URL.
//!
//! [`echo_handler`] receives every non-`/health` request, reconstructs the
//! URL the client asked for via the [`ActualUrl`] extractor, logs it under
//! a correlation id, and returns it as JSON. A request whose URL cannot be
//! determined gets `"url": null`; it is still a successful response.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::extract::ActualUrl;
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResponse {
    pub url: Option<String>,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
}

impl From<Option<url::Url>> for EchoResponse {
    fn from(url: Option<url::Url>) -> Self {
        match url {
            Some(url) => Self {
                scheme: Some(url.scheme().to_string()),
                host: url.host_str().map(String::from),
                port: url.port(),
                path: Some(url.path().to_string()),
                url: Some(url.into()),
            },
            None => Self {
                url: None,
                scheme: None,
                host: None,
                port: None,
                path: None,
            },
        }
    }
}

pub async fn echo_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    ActualUrl(url): ActualUrl,
) -> Response {
    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    match url {
        Some(ref url) => {
            state.stats.resolved.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                method = %method,
                target = %uri,
                url = %url,
                "request url resolved"
            );
        }
        None => {
            state.stats.unresolved.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                correlation_id = %correlation_id,
                method = %method,
                target = %uri,
                "request url could not be determined"
            );
        }
    }

    (
        [("x-correlation-id", correlation_id)],
        Json(EchoResponse::from(url)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_splits_url_components() {
        let url = url::Url::parse("https://example.com:8443/a/b?c=d").unwrap();
        let resp = EchoResponse::from(Some(url));
        assert_eq!(resp.url.as_deref(), Some("https://example.com:8443/a/b?c=d"));
        assert_eq!(resp.scheme.as_deref(), Some("https"));
        assert_eq!(resp.host.as_deref(), Some("example.com"));
        assert_eq!(resp.port, Some(8443));
        assert_eq!(resp.path.as_deref(), Some("/a/b"));
    }

    #[test]
    fn unresolved_serializes_null_url() {
        let json = serde_json::to_value(EchoResponse::from(None)).unwrap();
        assert!(json["url"].is_null());
    }
}
