//! Canonical request construction for AWS Signature Version 4.
//!
//! The canonical request is the exact byte string that gets hashed into the
//! string to sign:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! The signer builds this string for every outbound request. The raw URL path
//! is normalized (dot segments removed, repeated slashes collapsed) and each
//! segment is then encoded exactly once, which is what AWS expects from
//! clients of every service except S3.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left untouched in a canonical URI segment: the RFC 3986
/// unreserved set (`A-Z a-z 0-9 - _ . ~`).
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// `headers` may contain more entries than `signed_headers`; only the signed
/// ones end up in the canonical header block.
///
/// # Examples
///
/// ```
/// use gremlin_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "POST",
///     "/gremlin",
///     "",
///     &[("host", "localhost:8182")],
///     &["host"],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("POST\n/gremlin\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    payload_hash: &str,
) -> String {
    let canonical_uri = build_canonical_uri(path);
    let canonical_query = build_canonical_query_string(query_string);
    let canonical_headers = build_canonical_headers(headers, signed_headers);
    let signed_headers_str = build_signed_headers_string(signed_headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers_str}\n{payload_hash}"
    )
}

/// Build the canonical URI from a raw request path.
///
/// The path is normalized first: `.` and `..` segments are removed
/// (RFC 3986 section 5.2.4) and runs of slashes collapse to one. Each
/// remaining segment is then URI-encoded individually, forward slashes are
/// preserved and empty paths become `/`. Segments are encoded as given, so an
/// already percent-encoded segment is encoded a second time (`%20` becomes
/// `%2520`).
///
/// # Examples
///
/// ```
/// use gremlin_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/gremlin"), "/gremlin");
/// assert_eq!(build_canonical_uri("/x/../gremlin"), "/gremlin");
/// assert_eq!(build_canonical_uri("/"), "/");
/// assert_eq!(build_canonical_uri(""), "/");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    remove_dot_segments(path)
        .split('/')
        .map(|segment| utf8_percent_encode(segment, URI_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Drop `.`, `..` and empty segments from `path`, returning an absolute path.
///
/// A trailing slash is kept, including the one a trailing dot segment leaves
/// behind (`/a/.` becomes `/a/`). `..` never climbs above the root.
fn remove_dot_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut normalized = format!("/{}", segments.join("/"));
    let trailing_slash = ["/", "/.", "/.."].iter().any(|end| path.ends_with(end));
    if trailing_slash && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Build the canonical query string by sorting parameters.
///
/// Parameters are sorted by key, then by value for duplicate keys. Values are
/// kept exactly as they appear in the URL: the server rebuilds the canonical
/// query from the raw request line, so re-encoding here would make the two
/// sides disagree.
///
/// # Examples
///
/// ```
/// use gremlin_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(""), "");
/// assert_eq!(build_canonical_query_string("b=2&a=1"), "a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| param.split_once('=').unwrap_or((param, "")))
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical header block.
///
/// Only headers named in `signed_headers` are included. Names are lowercased,
/// values trimmed with inner whitespace runs collapsed to one space, and
/// repeated names joined with commas. Lines are sorted by name and joined with
/// `\n`, without a trailing newline.
///
/// # Examples
///
/// ```
/// use gremlin_auth::canonical::build_canonical_headers;
///
/// let result = build_canonical_headers(
///     &[("Host", "localhost:8182"), ("X-Amz-Date", "20240101T000000Z")],
///     &["host", "x-amz-date"],
/// );
/// assert_eq!(result, "host:localhost:8182\nx-amz-date:20240101T000000Z");
/// ```
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)], signed_headers: &[&str]) -> String {
    let mut by_name: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = normalize_header_value(value);
        by_name
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let mut wanted: Vec<&str> = signed_headers.to_vec();
    wanted.sort_unstable();

    wanted
        .into_iter()
        .filter_map(|name| by_name.get(name).map(|value| format!("{name}:{value}")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the `SignedHeaders` value: sorted header names joined with `;`.
///
/// # Examples
///
/// ```
/// use gremlin_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(build_signed_headers_string(&["x-amz-date", "host"]), "host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    let mut sorted: Vec<&str> = signed_headers.to_vec();
    sorted.sort_unstable();
    sorted.join(";")
}

/// Trim a header value and collapse inner whitespace runs to a single space.
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
