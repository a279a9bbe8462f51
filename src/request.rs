//! The inbound request shape consumed by the resolvers.
//!
//! A [`Req`] is a read-only view of what the HTTP layer knows about a
//! request: the raw target, the header collection (in any of the
//! [`Headers`] representations), and an optional [`Sock`] describing the
//! connection it arrived on. Every field is optional; missing pieces simply
//! mean "no signal" to the resolvers.

use serde::{Deserialize, Deserializer};

use crate::resolve::headers::{self, Headers};

/// Raw request target, either as received or already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Target as sent on the wire: origin-form (`/a?b`) or absolute-form
    /// (`http://host/a?b`).
    Raw(String),
    Parsed(url::Url),
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<url::Url> for Target {
    fn from(value: url::Url) -> Self {
        Self::Parsed(value)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Raw)
    }
}

/// Transport facts about the connection a request arrived on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sock {
    /// TLS was terminated by this process.
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub local_port: Option<u16>,
}

impl Sock {
    #[must_use]
    pub const fn plain(local_port: u16) -> Self {
        Self {
            encrypted: false,
            local_port: Some(local_port),
        }
    }

    #[must_use]
    pub const fn tls(local_port: u16) -> Self {
        Self {
            encrypted: true,
            local_port: Some(local_port),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Req {
    #[serde(default)]
    pub url: Option<Target>,
    #[serde(default, deserialize_with = "headers::deserialize_lenient")]
    pub headers: Option<Headers>,
    #[serde(default)]
    pub socket: Option<Sock>,
}

impl Req {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<Target>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: impl Into<Headers>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    #[must_use]
    pub const fn with_socket(mut self, socket: Sock) -> Self {
        self.socket = Some(socket);
        self
    }

    /// Build a `Req` from the head of a live `http` request.
    ///
    /// The target is the request URI exactly as received, so an
    /// absolute-form target stays absolute and is handled by the path
    /// resolver.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, socket: Option<Sock>) -> Self {
        Self {
            url: Some(Target::Raw(parts.uri.to_string())),
            headers: Some(Headers::from(parts.headers.clone())),
            socket,
        }
    }
}
