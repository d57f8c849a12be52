//! Resolved AWS credentials.
//!
//! Environment lookups happen here and only here: [`AwsCredentials::resolve`]
//! merges explicit configuration with a caller-supplied lookup function, and
//! [`AwsCredentials::from_env`] plugs in the process environment. The signing
//! core only ever sees the resolved struct.

use std::fmt;

use crate::config::SigV4Config;

/// Environment variable holding the access key ID.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the session token.
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// A fully resolved set of AWS credentials.
///
/// `Debug` output redacts the secret key and session token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AwsCredentials {
    /// Access key ID, if any.
    pub access_key_id: Option<String>,
    /// Secret access key, if any.
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials, if any.
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Create credentials from an access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Resolve credentials from `config`, consulting `lookup` for every field
    /// the config leaves empty.
    ///
    /// Empty values returned by `lookup` count as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use gremlin_auth::config::SigV4Config;
    /// use gremlin_auth::credentials::AwsCredentials;
    ///
    /// let config = SigV4Config::builder().region_name("us-west-2").aws_access_key_id("AKID").build();
    /// let creds = AwsCredentials::resolve(&config, |name| {
    ///     (name == "AWS_SECRET_ACCESS_KEY").then(|| "from-env".to_owned())
    /// });
    /// assert_eq!(creds.access_key_id.as_deref(), Some("AKID"));
    /// assert_eq!(creds.secret_access_key.as_deref(), Some("from-env"));
    /// assert!(creds.session_token.is_none());
    /// ```
    pub fn resolve<F>(config: &SigV4Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &str, var: &str| {
            if explicit.is_empty() {
                lookup(var).filter(|v| !v.is_empty())
            } else {
                Some(explicit.to_owned())
            }
        };

        Self {
            access_key_id: pick(&config.aws_access_key_id, ACCESS_KEY_ID_VAR),
            secret_access_key: pick(&config.aws_secret_access_key, SECRET_ACCESS_KEY_VAR),
            session_token: pick(&config.session_token, SESSION_TOKEN_VAR),
        }
    }

    /// Resolve credentials from `config`, falling back to the process environment.
    #[must_use]
    pub fn from_env(config: &SigV4Config) -> Self {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Whether these credentials can sign a request: either a complete key
    /// pair or a session token.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        (self.access_key_id.is_some() && self.secret_access_key.is_some())
            || self.session_token.is_some()
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "** redacted **"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}
