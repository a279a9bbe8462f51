//! Axum extractor for the reconstructed request URL.
//!
//! [`ActualUrl`] runs the resolver over the incoming request head. The
//! connection facts come from a [`Sock`] request extension, which the
//! server installs; without one the resolver sees no socket at all.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use url::Url;

use crate::request::{Req, Sock};
use crate::resolve::actual_request_url;

/// The URL the client requested, or `None` when it cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualUrl(pub Option<Url>);

impl<S> FromRequestParts<S> for ActualUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let sock = parts.extensions.get::<Sock>().copied();
        let req = Req::from_parts(parts, sock);
        Ok(Self(actual_request_url(&req)))
    }
}
