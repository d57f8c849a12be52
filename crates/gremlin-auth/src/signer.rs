//! AWS Signature Version 4 request signing.
//!
//! The signing flow for one request:
//!
//! 1. Stamp `X-Amz-Date` (and `X-Amz-Security-Token` for temporary
//!    credentials) onto the request.
//! 2. Build the canonical request from the method, URL, signed headers and
//!    the SHA-256 of the body.
//! 3. Build the string to sign from the timestamp, credential scope and
//!    canonical request hash.
//! 4. Derive the signing key with the HMAC-SHA256 chain and sign.
//! 5. Attach the `Authorization` header.
//!
//! [`RequestSigner`] is the seam the authenticators depend on; [`SigV4Signer`]
//! is the standard implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{build_canonical_request, build_signed_headers_string};
use crate::credentials::AwsCredentials;
use crate::error::AuthError;

/// The signing algorithm named in the `Authorization` header.
pub const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Header carrying the signing timestamp.
pub const AMZ_DATE_HEADER: &str = "X-Amz-Date";

/// Header carrying the session token of temporary credentials.
pub const SECURITY_TOKEN_HEADER: &str = "X-Amz-Security-Token";

/// Header carrying the computed signature.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// ISO 8601 basic format used for `X-Amz-Date`.
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Date format used in the credential scope.
const SCOPE_DATE_FORMAT: &str = "%Y%m%d";

/// Headers that proxies and clients are known to rewrite; never signed.
const UNSIGNED_HEADERS: [&str; 3] = ["expect", "user-agent", "x-amzn-trace-id"];

type HmacSha256 = Hmac<Sha256>;

/// Source of the signing timestamp.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Makes signatures reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The request representation handed to a [`RequestSigner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Absolute request URL.
    pub url: String,
    /// Headers the signer adds to or reads from.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: Bytes,
}

impl AwsRequest {
    /// Create a `POST` request with no headers, the shape every Gremlin
    /// HTTP request takes.
    pub fn post(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method: http::Method::POST,
            url: url.into(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Set a header, replacing any existing header with the same name in any
    /// letter case.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.remove_header(name);
        self.headers.insert(name.to_owned(), value.into());
    }

    /// Remove every header whose name matches `name` ignoring case.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    }
}

/// Computes authentication headers for an [`AwsRequest`].
///
/// Implementations write their headers onto `request` and may replace its
/// body. On error the request must not be handed on.
pub trait RequestSigner: Send + Sync + fmt::Debug {
    /// Sign `request` for `service` in `region`.
    fn add_auth(
        &self,
        request: &mut AwsRequest,
        credentials: &AwsCredentials,
        service: &str,
        region: &str,
    ) -> Result<(), AuthError>;
}

/// Standard AWS SigV4 header signer.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    clock: Arc<dyn Clock>,
}

impl Default for SigV4Signer {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl SigV4Signer {
    /// Create a signer that takes its timestamps from `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }
}

impl RequestSigner for SigV4Signer {
    fn add_auth(
        &self,
        request: &mut AwsRequest,
        credentials: &AwsCredentials,
        service: &str,
        region: &str,
    ) -> Result<(), AuthError> {
        let uri = parse_url(&request.url)?;
        let now = self.clock.now();
        let timestamp = now.format(AMZ_DATE_FORMAT).to_string();
        let date = now.format(SCOPE_DATE_FORMAT).to_string();

        request.remove_header(AUTHORIZATION_HEADER);
        request.set_header(AMZ_DATE_HEADER, timestamp.clone());
        match &credentials.session_token {
            Some(token) => request.set_header(SECURITY_TOKEN_HEADER, token.clone()),
            None => request.remove_header(SECURITY_TOKEN_HEADER),
        }

        let host = canonical_host(&uri);
        let mut headers: Vec<(String, &str)> = request
            .headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.as_str()))
            .filter(|(name, _)| !UNSIGNED_HEADERS.contains(&name.as_str()))
            .collect();
        if !headers.iter().any(|(name, _)| name == "host") {
            headers.push(("host".to_owned(), host.as_str()));
        }

        let mut signed: Vec<&str> = headers.iter().map(|(name, _)| name.as_str()).collect();
        signed.sort_unstable();
        signed.dedup();

        let header_pairs: Vec<(&str, &str)> = headers
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();

        let canonical_request = build_canonical_request(
            request.method.as_str(),
            uri.path(),
            uri.query().unwrap_or(""),
            &header_pairs,
            &signed,
            &hash_payload(&request.body),
        );

        debug!(canonical_request, "Built canonical request");

        let credential_scope = format!("{date}/{region}/{service}/aws4_request");
        let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = build_string_to_sign(&timestamp, &credential_scope, &canonical_hash);

        debug!(string_to_sign, "Built string to sign");

        let secret_key = credentials.secret_access_key.as_deref().unwrap_or_default();
        let access_key_id = credentials.access_key_id.as_deref().unwrap_or_default();
        let signing_key = derive_signing_key(secret_key, &date, region, service);
        let signature = compute_signature(&signing_key, &string_to_sign);
        let signed_headers = build_signed_headers_string(&signed);

        debug!(
            access_key_id,
            credential_scope = %credential_scope,
            signed_headers = %signed_headers,
            "Signed request"
        );

        request.headers.insert(
            AUTHORIZATION_HEADER.to_owned(),
            format!(
                "{SIGNING_ALGORITHM} Credential={access_key_id}/{credential_scope}, \
                 SignedHeaders={signed_headers}, Signature={signature}"
            ),
        );

        Ok(())
    }
}

/// Parse an absolute URL, rejecting anything without a scheme and host.
fn parse_url(url: &str) -> Result<http::Uri, AuthError> {
    let invalid = |reason: String| AuthError::InvalidUrl {
        url: url.to_owned(),
        reason,
    };

    let uri: http::Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;
    if uri.scheme().is_none() {
        return Err(invalid("missing scheme".to_owned()));
    }
    if uri.host().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_owned()));
    }
    Ok(uri)
}

/// The `host` header value: the URL host, with the port only when it is not
/// the default for the scheme.
fn canonical_host(uri: &http::Uri) -> String {
    let host = uri.host().unwrap_or_default();
    let default_port = match uri.scheme_str() {
        Some("https") => Some(443),
        Some("http") => Some(80),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => format!("{host}:{port}"),
        _ => host.to_owned(),
    }
}

/// Build the SigV4 string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{SIGNING_ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    [region.as_bytes(), service.as_bytes(), &b"aws4_request"[..]]
        .into_iter()
        .fold(
            hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes()),
            |key, part| hmac_sha256(&key, part),
        )
}

/// Hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex-encoded SHA-256 of a request body.
///
/// # Examples
///
/// ```
/// use gremlin_auth::signer::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
