//! HTTP Basic authentication.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::auth::Authenticator;
use crate::error::AuthError;
use crate::request::GremlinRequest;

/// Header name written by [`BasicAuth`]. Lower-case, as the driver sends it.
pub const BASIC_AUTH_HEADER: &str = "authorization";

/// Encode a username and password as a Basic `authorization` header value.
///
/// # Examples
///
/// ```
/// use gremlin_auth::basic::encode_credentials;
///
/// assert_eq!(encode_credentials("username", "password"), "Basic dXNlcm5hbWU6cGFzc3dvcmQ=");
/// ```
#[must_use]
pub fn encode_credentials(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

/// Decode a Basic `authorization` header value into `(username, password)`.
///
/// Returns `None` for anything that is not a well-formed Basic credential.
/// The password may contain `:`; the username may not.
#[must_use]
pub fn decode_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(BASE64.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

/// Authenticates requests with a static username and password.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Create a Basic authenticator. Empty values are allowed.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The configured username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"** redacted **")
            .finish()
    }
}

impl Authenticator for BasicAuth {
    fn apply<'r>(
        &self,
        request: &'r mut GremlinRequest,
    ) -> Result<&'r mut GremlinRequest, AuthError> {
        request.headers.insert(
            BASIC_AUTH_HEADER.to_owned(),
            encode_credentials(&self.username, &self.password),
        );
        Ok(request)
    }
}
