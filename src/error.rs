//! Application error type for the `actual-url` binary.
//!
//! URL resolution itself never errors: it answers `None`. [`ActualUrlError`]
//! covers everything around it (loading request descriptions, serving,
//! probing a running instance) and carries hints that point the user at
//! the fix.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ActualUrlError {
    #[error("Request description not found: {}", path.display())]
    RequestFileNotFound { path: PathBuf },

    #[error("Invalid request description in {source_name}:\n  {source}")]
    RequestParse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid header argument '{0}' (expected NAME:VALUE)")]
    HeaderArgument(String),

    #[error("Could not determine the request URL.\n\n  {hint}")]
    Unresolved { hint: String },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}
