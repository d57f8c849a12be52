//! Request authentication for Gremlin wire clients.
//!
//! This crate attaches credentials to outbound requests bound for a Gremlin
//! server. Two schemes are supported:
//!
//! - HTTP Basic, which sets a lower-case `authorization` header.
//! - AWS Signature Version 4, as required by Amazon Neptune. The request is
//!   signed as a `POST` and gains `Authorization`, `X-Amz-Date` and, for
//!   temporary credentials, `X-Amz-Security-Token`.
//!
//! Both schemes implement [`Authenticator`], which mutates a
//! [`GremlinRequest`] in place and returns it.
//!
//! # Usage
//!
//! ```rust
//! use gremlin_auth::{Auth, Authenticator, GremlinRequest, SigV4Config};
//!
//! let auth = Auth::sigv4(
//!     &SigV4Config::builder()
//!         .region_name("us-west-2")
//!         .aws_access_key_id("MOCK_ID")
//!         .aws_secret_access_key("MOCK_KEY")
//!         .build(),
//! );
//!
//! let mut request = GremlinRequest::graph_binary("https://localhost:8182/gremlin", Vec::new());
//! auth.apply(&mut request).unwrap();
//! assert!(request.headers["Authorization"].starts_with("AWS4-HMAC-SHA256 Credential=MOCK_ID"));
//! ```
//!
//! # Modules
//!
//! - [`auth`] - The [`Authenticator`] trait and the [`Auth`] enum
//! - [`basic`] - HTTP Basic authentication
//! - [`canonical`] - Canonical request construction for SigV4
//! - [`config`] - SigV4 configuration
//! - [`credentials`] - Credential resolution with environment fallback
//! - [`error`] - Authentication error types
//! - [`request`] - The outbound request record
//! - [`signer`] - The SigV4 signer and its clock
//! - [`sigv4`] - SigV4 authentication

pub mod auth;
pub mod basic;
pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod request;
pub mod signer;
pub mod sigv4;

pub use auth::{Auth, Authenticator};
pub use basic::BasicAuth;
pub use config::SigV4Config;
pub use credentials::AwsCredentials;
pub use error::AuthError;
pub use request::GremlinRequest;
pub use signer::{RequestSigner, SigV4Signer};
pub use sigv4::SigV4Auth;
