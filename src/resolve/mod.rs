//! Reconstruction of the URL a client actually requested.
//!
//! [`actual_request_url`] resolves the four URL components independently
//! ([`fields`]) from the request's headers ([`headers`], [`forwarded`]) and
//! connection, then renders them into a canonical [`url::Url`]. Every
//! failure, whatever its cause, comes back as `None`.

pub mod fields;
pub mod forwarded;
pub mod headers;

use std::borrow::Cow;

use url::Url;

use crate::request::Req;
use fields::Scheme;

/// The resolved components of a request URL, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'r> {
    pub scheme: Scheme,
    pub host: &'r str,
    pub port: Option<Cow<'r, str>>,
    pub path: Cow<'r, str>,
}

impl<'r> UrlParts<'r> {
    /// Resolve every component, or `None` when the host or path cannot be
    /// determined.
    #[must_use]
    pub fn resolve(req: &'r Req) -> Option<Self> {
        let scheme = fields::proto(req);
        let Some(host) = fields::host(req) else {
            tracing::trace!("no host signal, request url unresolved");
            return None;
        };
        let port = fields::port(req);
        let path = fields::try_path(req)?;
        Some(Self {
            scheme,
            host,
            port,
            path,
        })
    }

    /// Whether the port must be written out. The scheme's default port is
    /// never rendered, nor is a port when the host already names one.
    #[must_use]
    pub fn show_port(&self) -> bool {
        match self.port.as_deref() {
            None | Some("") => false,
            Some(port) => port != self.scheme.default_port() && !host_has_port(self.host),
        }
    }

    /// Render the components as a URL string, without validating them.
    #[must_use]
    pub fn render(&self) -> String {
        match self.port.as_deref() {
            Some(port) if self.show_port() => {
                format!("{}://{}:{port}{}", self.scheme, self.host, self.path)
            }
            _ => format!("{}://{}{}", self.scheme, self.host, self.path),
        }
    }

    #[must_use]
    pub fn into_url(self) -> Option<Url> {
        let rendered = self.render();
        match Url::parse(&rendered) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!(url = %rendered, error = %e, "composed url does not parse");
                None
            }
        }
    }
}

/// `host:port` or `[v6]:port`, as opposed to a bare host or `[v6]`.
fn host_has_port(host: &str) -> bool {
    let after_bracket = host.rfind(']').map_or(host, |i| &host[i + 1..]);
    after_bracket.contains(':')
}

/// The URL the client originally requested, or `None` if it cannot be
/// determined.
#[must_use]
pub fn actual_request_url(req: &Req) -> Option<Url> {
    UrlParts::resolve(req)?.into_url()
}
