//! `actual-url resolve` — resolve the URL of a described request.
//!
//! Loads a JSON request description (file or stdin), layers any
//! command-line overrides on top, and prints the reconstructed URL as
//! plain text or JSON.

use std::io::Read;
use std::path::Path;

use crate::cli::{OutputFormat, ResolveArgs};
use crate::error::ActualUrlError;
use crate::logging;
use crate::request::{Req, Target};
use crate::resolve::headers::{FieldValue, Headers};
use crate::resolve::{fields, UrlParts};

pub fn execute(args: &ResolveArgs) -> Result<(), ActualUrlError> {
    logging::init(&args.log_level, logging::resolve_format(false, false));

    let req = build_request(args)?;
    let resolved = UrlParts::resolve(&req).and_then(UrlParts::into_url);

    match args.format {
        OutputFormat::Text => {
            if let Some(ref url) = resolved {
                println!("{url}");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "url": resolved.as_ref().map(url::Url::as_str),
                    "scheme": fields::proto(&req).as_str(),
                    "host": fields::host(&req),
                    "port": fields::port(&req),
                    "path": fields::path(&req),
                })
            );
        }
    }

    if resolved.is_none() {
        let hint = if fields::host(&req).is_none() {
            "No Forwarded host, X-Forwarded-Host, or Host header was supplied."
        } else {
            "The resolved components do not form a valid URL."
        };
        return Err(ActualUrlError::Unresolved { hint: hint.into() });
    }

    Ok(())
}

/// Assemble the request from the optional description plus flag overrides.
pub fn build_request(args: &ResolveArgs) -> Result<Req, ActualUrlError> {
    let mut req = match args.input.as_deref() {
        Some(path) if path == Path::new("-") => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            parse_request_str(&content, "<stdin>")?
        }
        Some(path) => load_request_file(path)?,
        None => Req::new(),
    };

    if let Some(ref url) = args.url {
        req.url = Some(Target::Raw(url.clone()));
    }

    let cli_headers = args
        .headers
        .iter()
        .map(|h| parse_header_arg(h))
        .collect::<Result<Vec<_>, _>>()?;
    req.headers = merge_headers(req.headers.take(), cli_headers);

    if args.encrypted || args.local_port.is_some() {
        let mut sock = req.socket.unwrap_or_default();
        sock.encrypted |= args.encrypted;
        if args.local_port.is_some() {
            sock.local_port = args.local_port;
        }
        req.socket = Some(sock);
    }

    Ok(req)
}

pub fn load_request_file(path: &Path) -> Result<Req, ActualUrlError> {
    if !path.exists() {
        return Err(ActualUrlError::RequestFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_request_str(&content, &path.display().to_string())
}

pub fn parse_request_str(content: &str, source_name: &str) -> Result<Req, ActualUrlError> {
    serde_json::from_str(content).map_err(|source| ActualUrlError::RequestParse {
        source_name: source_name.to_string(),
        source,
    })
}

fn parse_header_arg(arg: &str) -> Result<(String, String), ActualUrlError> {
    match arg.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ActualUrlError::HeaderArgument(arg.to_string())),
    }
}

/// Flag headers go first so they win over the description's headers.
fn merge_headers(existing: Option<Headers>, cli: Vec<(String, String)>) -> Option<Headers> {
    if cli.is_empty() {
        return existing;
    }
    let mut merged: Vec<(String, FieldValue)> = cli
        .into_iter()
        .map(|(name, value)| (name, FieldValue::Single(value)))
        .collect();
    match existing {
        None => {}
        Some(Headers::Pairs(pairs)) => merged.extend(pairs),
        Some(Headers::Map(map)) => merged.extend(map),
        Some(lookup @ Headers::Lookup(_)) => {
            tracing::warn!("header flags ignored for a lookup-backed header collection");
            return Some(lookup);
        }
    }
    Some(Headers::Pairs(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LogLevel;
    use crate::request::Sock;

    fn args() -> ResolveArgs {
        ResolveArgs {
            input: None,
            url: None,
            headers: Vec::new(),
            encrypted: false,
            local_port: None,
            format: OutputFormat::Text,
            log_level: LogLevel::Warn,
        }
    }

    #[test]
    fn header_argument_splits_on_first_colon() {
        assert_eq!(
            parse_header_arg("host: example.com:8080").unwrap(),
            ("host".to_string(), "example.com:8080".to_string())
        );
        assert!(parse_header_arg("no-colon").is_err());
        assert!(parse_header_arg(":value").is_err());
    }

    #[test]
    fn flags_build_a_request() {
        let mut a = args();
        a.url = Some("/a?b=c".into());
        a.headers = vec!["host:example.com".into(), "x-forwarded-port:99".into()];
        a.encrypted = true;

        let req = build_request(&a).unwrap();
        let url = crate::actual_request_url(&req).unwrap();
        assert_eq!(url.as_str(), "https://example.com:99/a?b=c");
    }

    #[test]
    fn flag_headers_win_over_description() {
        let existing = Headers::map([("host", "old.com"), ("x-forwarded-proto", "https")]);
        let merged = merge_headers(
            Some(existing),
            vec![("host".to_string(), "new.com".to_string())],
        )
        .unwrap();

        assert_eq!(merged.get("host"), Some("new.com"));
        assert_eq!(merged.get("x-forwarded-proto"), Some("https"));
    }

    #[test]
    fn local_port_flag_alone_is_plain() {
        let mut a = args();
        a.local_port = Some(8443);
        assert_eq!(build_request(&a).unwrap().socket, Some(Sock::plain(8443)));
    }

    #[test]
    fn no_flags_no_socket() {
        let req = build_request(&args()).unwrap();
        assert!(req.socket.is_none());
        assert!(req.headers.is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_request_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ActualUrlError::RequestFileNotFound { .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_request_str("{", "inline").unwrap_err();
        assert!(err.to_string().contains("inline"));
    }
}
