//! Uniform header access over the supported header representations.
//!
//! [`Headers`] is the single place that knows how a caller stored its
//! headers. Everything above it asks [`header`] for a name and gets back a
//! plain string or nothing: missing headers, structured values, and values
//! that are not valid visible ASCII all collapse to `None`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use serde::{Deserialize, Deserializer};

use crate::request::Req;

/// Single-value "get by name" capability of a multi-map header object.
pub trait HeaderLookup: fmt::Debug + Send + Sync {
    fn header(&self, name: &str) -> Option<&str>;
}

/// Case-insensitive; the first value wins when a header repeats.
impl HeaderLookup for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A value stored in [`Headers::Map`] or [`Headers::Pairs`]. Only
/// [`FieldValue::Single`] counts as a header value; anything else is treated
/// as absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::List(_) | Self::Other(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

#[derive(Debug, Clone)]
pub enum Headers {
    /// Lower-cased header name to value. Looked up by exact key.
    Map(BTreeMap<String, FieldValue>),
    /// Ordered `(name, value)` pairs; duplicates allowed, first match wins.
    Pairs(Vec<(String, FieldValue)>),
    Lookup(Arc<dyn HeaderLookup>),
}

impl Headers {
    /// Build the mapping form. Names are lower-cased on insert.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
        )
    }

    pub fn pairs<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::Pairs(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn lookup(lookup: impl HeaderLookup + 'static) -> Self {
        Self::Lookup(Arc::new(lookup))
    }

    /// Read one header as a plain string.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Self::Lookup(lookup) => lookup.header(name),
            Self::Pairs(pairs) => pairs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))?
                .1
                .as_str(),
            // Callers supply lower-cased names, so an exact key match suffices.
            Self::Map(map) => map.get(name)?.as_str(),
        }
    }
}

impl From<HeaderMap> for Headers {
    fn from(value: HeaderMap) -> Self {
        Self::lookup(value)
    }
}

impl From<BTreeMap<String, FieldValue>> for Headers {
    fn from(value: BTreeMap<String, FieldValue>) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<(String, String)>> for Headers {
    fn from(value: Vec<(String, String)>) -> Self {
        Self::pairs(value)
    }
}

/// JSON objects become [`Headers::Map`] (keys lower-cased), arrays of
/// `[name, value]` become [`Headers::Pairs`].
impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(
            untagged,
            expecting = "a header object or a list of [name, value] pairs"
        )]
        enum Wire {
            Map(BTreeMap<String, FieldValue>),
            Pairs(Vec<(String, FieldValue)>),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Map(map) => Self::map(map),
            Wire::Pairs(pairs) => Self::Pairs(pairs),
        })
    }
}

/// Header collection of a request description. A shape that is neither an
/// object nor a pair list carries no signal and loads as `None`.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Headers>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match Headers::deserialize(value) {
        Ok(headers) => Ok(Some(headers)),
        Err(e) => {
            tracing::trace!(error = %e, "unrecognized header collection ignored");
            Ok(None)
        }
    }
}

/// Read header `name` from `req`, or `None` when the request has no headers,
/// the header is missing, or its value is not a plain string.
#[must_use]
pub fn header<'r>(req: &'r Req, name: &str) -> Option<&'r str> {
    req.headers.as_ref()?.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_lookup_is_exact_on_lowercase_keys() {
        let headers = Headers::map([("Host", "example.com")]);
        assert_eq!(headers.get("host"), Some("example.com"));
        assert_eq!(headers.get("Host"), None);
    }

    #[test]
    fn map_non_string_values_are_absent() {
        let headers = Headers::map([(
            "forwarded",
            FieldValue::List(vec!["proto=https".into(), "proto=http".into()]),
        )]);
        assert_eq!(headers.get("forwarded"), None);
    }

    #[test]
    fn pairs_first_match_wins_case_insensitive() {
        let headers = Headers::pairs([
            ("X-Forwarded-Proto", "https"),
            ("x-forwarded-proto", "http"),
        ]);
        assert_eq!(headers.get("x-forwarded-proto"), Some("https"));
    }

    #[test]
    fn header_map_lookup_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.append("forwarded", "proto=https".parse().unwrap());
        map.append("forwarded", "proto=http".parse().unwrap());

        let headers = Headers::from(map);
        assert_eq!(headers.get("forwarded"), Some("proto=https"));
        assert_eq!(headers.get("FORWARDED"), Some("proto=https"));
    }

    #[test]
    fn header_map_opaque_bytes_are_absent() {
        let mut map = HeaderMap::new();
        map.insert(
            "host",
            axum::http::HeaderValue::from_bytes(b"caf\xe9.example").unwrap(),
        );
        assert_eq!(Headers::from(map).get("host"), None);
    }

    #[test]
    fn header_without_collection_is_absent() {
        assert_eq!(header(&Req::new(), "host"), None);
    }

    #[test]
    fn deserializes_both_wire_shapes() {
        let map: Headers = serde_json::from_str(r#"{"Host": "a.com", "n": 3}"#).unwrap();
        assert_eq!(map.get("host"), Some("a.com"));
        assert_eq!(map.get("n"), None);

        let pairs: Headers = serde_json::from_str(r#"[["host", "b.com"]]"#).unwrap();
        assert!(matches!(pairs, Headers::Pairs(_)));
        assert_eq!(pairs.get("Host"), Some("b.com"));
    }

    #[test]
    fn pair_non_string_value_shadows_later_entries() {
        let headers: Headers =
            serde_json::from_str(r#"[["host", 5], ["host", "a.com"], ["x-n", null]]"#).unwrap();
        assert_eq!(headers.get("host"), None);
        assert_eq!(headers.get("x-n"), None);
    }

    #[test]
    fn unknown_shape_error_names_expected_forms() {
        let err = serde_json::from_str::<Headers>("42").unwrap_err();
        assert!(err.to_string().contains("list of [name, value] pairs"));
        assert!(!err.to_string().contains("Wire"));
    }

    #[test]
    fn lenient_loading_drops_unknown_shapes() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_lenient")]
            headers: Option<Headers>,
        }

        let holder: Holder = serde_json::from_str(r#"{"headers": 42}"#).unwrap();
        assert!(holder.headers.is_none());
        let holder: Holder = serde_json::from_str(r#"{"headers": null}"#).unwrap();
        assert!(holder.headers.is_none());
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.headers.is_none());
    }
}
