//! SigV4 configuration.
//!
//! [`SigV4Config`] is what callers fill in. Empty strings mean "not supplied":
//! credential fields then fall back to the environment when the config is
//! turned into [`AwsCredentials`](crate::credentials::AwsCredentials), and an
//! empty service name falls back to [`DEFAULT_SERVICE_NAME`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Service name used in the credential scope when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "neptune-db";

/// Settings for AWS Signature Version 4 authentication.
///
/// # Examples
///
/// ```
/// use gremlin_auth::config::SigV4Config;
///
/// let config = SigV4Config::builder()
///     .region_name("us-west-2")
///     .aws_access_key_id("MOCK_ID")
///     .aws_secret_access_key("MOCK_KEY")
///     .build();
/// assert_eq!(config.service_name(), "neptune-db");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
#[builder(field_defaults(default, setter(into)))]
pub struct SigV4Config {
    /// AWS region of the target endpoint (e.g. `"us-west-2"`).
    pub region_name: String,
    /// Access key ID. Empty means read `AWS_ACCESS_KEY_ID`.
    pub aws_access_key_id: String,
    /// Secret access key. Empty means read `AWS_SECRET_ACCESS_KEY`.
    pub aws_secret_access_key: String,
    /// Session token for temporary credentials. Empty means read `AWS_SESSION_TOKEN`.
    pub session_token: String,
    /// Service name for the credential scope. Empty means `neptune-db`.
    pub service_name: String,
}

impl SigV4Config {
    /// Load the region from `AWS_REGION`, then `AWS_DEFAULT_REGION`.
    ///
    /// Credential fields are left empty so that they resolve from the
    /// environment at construction time.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("AWS_REGION").or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
        {
            config.region_name = v;
        }

        config
    }

    /// The configured service name, or [`DEFAULT_SERVICE_NAME`] when empty.
    #[must_use]
    pub fn service_name(&self) -> &str {
        if self.service_name.is_empty() {
            DEFAULT_SERVICE_NAME
        } else {
            &self.service_name
        }
    }
}
