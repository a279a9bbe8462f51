//! Per-field fallback chains: scheme, host, port, and path.
//!
//! Each resolver walks its sources in precedence order and stops at the first
//! one that yields a value. `Forwarded` comes first, then the legacy
//! `X-Forwarded-*` family, then whatever the connection itself reveals.
//! Empty strings count as "no value" everywhere.

use std::borrow::Cow;
use std::fmt;

use crate::request::{Req, Target};
use crate::resolve::forwarded::{self, forward_val};
use crate::resolve::headers::header;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Port implied when a URL of this scheme carries none.
    #[must_use]
    pub const fn default_port(self) -> &'static str {
        match self {
            Self::Http => "80",
            Self::Https => "443",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legacy scheme headers, each with the token meaning "https" and the token
/// meaning "http".
const SCHEME_SWITCHES: [(&str, &str, &str); 5] = [
    ("x-forwarded-proto", "https", "http"),
    ("x-forwarded-protocol", "https", "http"),
    ("front-end-https", "on", "off"),
    ("x-forwarded-ssl", "on", "off"),
    ("x-url-scheme", "https", "http"),
];

/// First entry of a comma-joined `X-Forwarded-*` style header.
///
/// Proxies append to these headers, so the first entry is the one set by the
/// proxy closest to the client.
#[must_use]
pub fn x_forwarded<'r>(req: &'r Req, name: &str) -> Option<&'r str> {
    header(req, name).and_then(|value| value.split(',').next())
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Scheme the client used. Never fails: with no signal at all it is `http`.
#[must_use]
pub fn proto(req: &Req) -> Scheme {
    match forward_val(req, forwarded::PROTO) {
        Some("https") => return Scheme::Https,
        Some("http") => return Scheme::Http,
        _ => {}
    }

    for (name, on, off) in SCHEME_SWITCHES {
        match x_forwarded(req, name) {
            Some(v) if v == on => return Scheme::Https,
            Some(v) if v == off => return Scheme::Http,
            _ => {}
        }
    }

    if req.socket.is_some_and(|sock| sock.encrypted) {
        Scheme::Https
    } else {
        Scheme::Http
    }
}

/// Host (possibly with a port) the client addressed. Only headers are
/// consulted; the request target's authority is never used.
#[must_use]
pub fn host(req: &Req) -> Option<&str> {
    forward_val(req, forwarded::HOST)
        .and_then(non_empty)
        .or_else(|| x_forwarded(req, "x-forwarded-host").and_then(non_empty))
        .or_else(|| header(req, "host").and_then(non_empty))
}

/// Port the client connected to, if anything reports one. A local port of
/// zero is not a port.
#[must_use]
pub fn port(req: &Req) -> Option<Cow<'_, str>> {
    forward_val(req, forwarded::PORT)
        .and_then(non_empty)
        .or_else(|| x_forwarded(req, "x-forwarded-port").and_then(non_empty))
        .map(Cow::Borrowed)
        .or_else(|| {
            req.socket
                .and_then(|sock| sock.local_port)
                .filter(|&p| p != 0)
                .map(|p| Cow::Owned(p.to_string()))
        })
}

/// Path plus query string, as the URL composer needs it.
///
/// `None` only when the target looks absolute but does not parse.
pub(crate) fn try_path(req: &Req) -> Option<Cow<'_, str>> {
    match &req.url {
        None => Some(Cow::Borrowed("/")),
        Some(Target::Raw(raw)) if raw.is_empty() => Some(Cow::Borrowed("/")),
        Some(Target::Parsed(url)) => Some(Cow::Owned(path_and_query(url))),
        Some(Target::Raw(raw)) if is_absolute_http(raw) => url::Url::parse(raw)
            .ok()
            .map(|url| Cow::Owned(path_and_query(&url))),
        Some(Target::Raw(raw)) => Some(Cow::Borrowed(raw)),
    }
}

/// Path plus query string of the request target; `/` when there is none.
#[must_use]
pub fn path(req: &Req) -> Cow<'_, str> {
    try_path(req).unwrap_or_else(|| match &req.url {
        Some(Target::Raw(raw)) => Cow::Borrowed(raw.as_str()),
        _ => Cow::Borrowed("/"),
    })
}

fn is_absolute_http(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn path_and_query(url: &url::Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{query}", url.path()),
        _ => url.path().to_string(),
    }
}
