//! Lenient reader for the `Forwarded` header (RFC 7239).
//!
//! Only the first comma-separated element is consulted: proxies append
//! elements as the request travels, so the first one was written by the hop
//! nearest the client. Parameter names match case-insensitively, values keep
//! their case, and stray whitespace or newlines around a parameter are
//! ignored. Quoted strings are not unescaped.

use crate::request::Req;
use crate::resolve::headers::header;

pub const PROTO: &str = "proto";
pub const HOST: &str = "host";
pub const PORT: &str = "port";

/// Value of parameter `key` in the first element of a `Forwarded` header
/// value.
#[must_use]
pub fn first_hop_param<'v>(forwarded: &'v str, key: &str) -> Option<&'v str> {
    let first = forwarded.split(',').next()?;
    first.split(';').find_map(|token| {
        let (name, value) = token.trim().split_once('=')?;
        name.eq_ignore_ascii_case(key).then(|| value.trim())
    })
}

/// Read parameter `key` (`proto`, `host`, or `port`) from the request's
/// `Forwarded` header.
#[must_use]
pub fn forward_val<'r>(req: &'r Req, key: &str) -> Option<&'r str> {
    let forwarded = header(req, "forwarded").filter(|v| !v.is_empty())?;
    let value = first_hop_param(forwarded, key);
    tracing::trace!(key, value, "forwarded parameter");
    value
}
