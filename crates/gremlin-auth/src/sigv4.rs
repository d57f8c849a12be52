//! AWS Signature Version 4 authentication for Neptune-style endpoints.

use std::sync::Arc;

use tracing::debug;

use crate::auth::Authenticator;
use crate::config::{DEFAULT_SERVICE_NAME, SigV4Config};
use crate::credentials::AwsCredentials;
use crate::error::AuthError;
use crate::request::GremlinRequest;
use crate::signer::{AwsRequest, RequestSigner, SigV4Signer};

/// Signs every request with AWS SigV4.
///
/// Credentials are fixed at construction; nothing is re-read from the
/// environment afterwards.
#[derive(Debug, Clone)]
pub struct SigV4Auth {
    region_name: String,
    service_name: String,
    credentials: AwsCredentials,
    signer: Arc<dyn RequestSigner>,
}

impl SigV4Auth {
    /// Create an authenticator for `region_name` using the standard signer and
    /// the `neptune-db` service name.
    pub fn new(region_name: impl Into<String>, credentials: AwsCredentials) -> Self {
        Self {
            region_name: region_name.into(),
            service_name: DEFAULT_SERVICE_NAME.to_owned(),
            credentials,
            signer: Arc::new(SigV4Signer::default()),
        }
    }

    /// Build an authenticator from `config`, resolving missing credentials
    /// through `lookup`.
    pub fn from_config<F>(config: &SigV4Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            config.region_name.clone(),
            AwsCredentials::resolve(config, lookup),
        )
        .with_service_name(config.service_name())
    }

    /// Override the service name in the credential scope.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Replace the signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// The region in the credential scope.
    #[must_use]
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    /// The service in the credential scope.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The resolved credentials.
    #[must_use]
    pub fn credentials(&self) -> &AwsCredentials {
        &self.credentials
    }
}

impl Authenticator for SigV4Auth {
    fn apply<'r>(
        &self,
        request: &'r mut GremlinRequest,
    ) -> Result<&'r mut GremlinRequest, AuthError> {
        if !self.credentials.is_usable() {
            return Err(AuthError::MissingCredentials);
        }

        let mut aws_request = AwsRequest::post(request.url.clone(), request.payload.clone());
        self.signer.add_auth(
            &mut aws_request,
            &self.credentials,
            &self.service_name,
            &self.region_name,
        )?;

        debug!(
            url = %request.url,
            added = aws_request.headers.len(),
            "Merging SigV4 headers into request"
        );

        request.headers.extend(aws_request.headers);
        request.payload = aws_request.body;
        Ok(request)
    }
}
