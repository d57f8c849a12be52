//! The authenticator abstraction and its constructors.

use std::sync::Arc;

use crate::basic::BasicAuth;
use crate::config::SigV4Config;
use crate::credentials::AwsCredentials;
use crate::error::AuthError;
use crate::request::GremlinRequest;
use crate::signer::RequestSigner;
use crate::sigv4::SigV4Auth;

/// Attaches credentials to an outbound request.
///
/// `apply` mutates `request` in place and hands the same request back so
/// calls can be chained. On error the request carries no new credentials.
pub trait Authenticator: Send + Sync {
    /// Authenticate `request`.
    fn apply<'r>(
        &self,
        request: &'r mut GremlinRequest,
    ) -> Result<&'r mut GremlinRequest, AuthError>;
}

/// Any supported authentication scheme.
///
/// # Examples
///
/// ```
/// use gremlin_auth::{Auth, Authenticator, GremlinRequest};
///
/// let mut request = GremlinRequest::graph_binary("https://localhost:8182/gremlin", Vec::new());
/// Auth::basic("username", "password").apply(&mut request).unwrap();
/// assert!(request.headers.contains_key("authorization"));
/// ```
#[derive(Debug, Clone)]
pub enum Auth {
    /// HTTP Basic authentication.
    Basic(BasicAuth),
    /// AWS Signature Version 4 signing.
    SigV4(SigV4Auth),
}

impl Auth {
    /// HTTP Basic authentication with a username and password.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic(BasicAuth::new(username, password))
    }

    /// AWS SigV4 signing. Credentials missing from `config` are read from
    /// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
    /// now, once.
    #[must_use]
    pub fn sigv4(config: &SigV4Config) -> Self {
        Self::SigV4(
            SigV4Auth::new(config.region_name.clone(), AwsCredentials::from_env(config))
                .with_service_name(config.service_name()),
        )
    }

    /// AWS SigV4 signing with an explicit environment lookup and signer.
    #[must_use]
    pub fn sigv4_with_signer<F>(
        config: &SigV4Config,
        lookup: F,
        signer: Arc<dyn RequestSigner>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::SigV4(SigV4Auth::from_config(config, lookup).with_signer(signer))
    }
}

impl From<BasicAuth> for Auth {
    fn from(auth: BasicAuth) -> Self {
        Self::Basic(auth)
    }
}

impl From<SigV4Auth> for Auth {
    fn from(auth: SigV4Auth) -> Self {
        Self::SigV4(auth)
    }
}

impl Authenticator for Auth {
    fn apply<'r>(
        &self,
        request: &'r mut GremlinRequest,
    ) -> Result<&'r mut GremlinRequest, AuthError> {
        match self {
            Self::Basic(auth) => auth.apply(request),
            Self::SigV4(auth) => auth.apply(request),
        }
    }
}
