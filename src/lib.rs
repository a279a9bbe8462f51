//! Reconstruct the URL a client originally requested when the request has
//! passed through reverse proxies, load balancers, or TLS terminators.
//!
//! Intermediaries replace the scheme, host, and port a backend would see on
//! its socket with their own, and report the originals in forwarding
//! headers. [`actual_request_url`] reads those signals in precedence order:
//!
//! | Field | Sources, first match wins |
//! |-------|---------------------------|
//! | scheme | `Forwarded: proto=`, `X-Forwarded-Proto`, `X-Forwarded-Protocol`, `Front-End-Https`, `X-Forwarded-Ssl`, `X-Url-Scheme`, socket encryption |
//! | host | `Forwarded: host=`, `X-Forwarded-Host`, `Host` |
//! | port | `Forwarded: port=`, `X-Forwarded-Port`, socket local port |
//! | path | request target |
//!
//! Every header is trusted. Put this behind a trusted-proxy gate in
//! deployments where clients can reach the service directly.
//!
//! ```
//! use actual_request_url::{actual_request_url, Headers, Req};
//!
//! let req = Req::new()
//!     .with_url("/some/path?a=b")
//!     .with_headers(Headers::map([
//!         ("host", "example.com"),
//!         ("x-forwarded-proto", "https"),
//!         ("x-forwarded-port", "99"),
//!     ]));
//!
//! let url = actual_request_url(&req).unwrap();
//! assert_eq!(url.as_str(), "https://example.com:99/some/path?a=b");
//! ```
//!
//! # Architecture
//!
//! - [`request`] -- The [`Req`] input shape: target, headers, connection.
//! - [`resolve`] -- Header access, `Forwarded` parsing, per-field resolvers,
//!   and URL composition.
//! - [`extract`] -- Axum extractor wrapping the resolver.
//! - [`cli`], [`cmd`] -- The `actual-url` binary: `resolve`, `serve`, `health`.
//! - [`server`], [`echo`], [`health`] -- The echo server behind `actual-url serve`.
//! - [`error`] -- Application errors using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.

#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod echo;
pub mod error;
pub mod extract;
pub mod health;
pub mod logging;
pub mod request;
pub mod resolve;
pub mod server;

pub use request::{Req, Sock, Target};
pub use resolve::fields::{host, path, port, proto, Scheme};
pub use resolve::forwarded::forward_val;
pub use resolve::headers::{FieldValue, HeaderLookup, Headers};
pub use resolve::{actual_request_url, UrlParts};
