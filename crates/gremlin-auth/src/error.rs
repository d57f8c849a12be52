//! Error types for request authentication.
//!
//! Every failure while authenticating an outbound request is an [`AuthError`].
//! Basic authentication never fails; SigV4 fails on missing credentials or
//! when the signer rejects the request.

/// Errors that can occur while authenticating an outbound Gremlin request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither an access key pair nor a session token was supplied or found
    /// in the environment.
    #[error(
        "No credentials or session token found, please ensure access key and secret key or \
         session tokens are provided or set as environment variables"
    )]
    MissingCredentials,

    /// The request URL could not be used as a signing target.
    #[error("Invalid request URL {url:?}: {reason}")]
    InvalidUrl {
        /// The offending URL as supplied by the caller.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// The signer failed for any other reason.
    #[error("Signing failed: {0}")]
    Signing(String),
}
