//! Integration tests for gremlin-auth.
//!
//! These exercise the public API end to end: building authenticators the way
//! a driver would, applying them to GraphBinary requests, and checking the
//! signatures against an independent SigV4 implementation.
//!
//! Run them with:
//! ```text
//! cargo test -p gremlin-auth-integration
//! ```

use std::sync::{Arc, Once};

use chrono::{DateTime, TimeZone, Utc};
use gremlin_auth::GremlinRequest;
use gremlin_auth::signer::{FixedClock, RequestSigner, SigV4Signer};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint used by every test request.
pub const TEST_URL: &str = "https://test_url:8182/gremlin";

/// The instant every fixed-clock signature is computed at.
#[must_use]
pub fn signing_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 17, 45, 30).unwrap()
}

/// A request shaped like the ones the driver sends.
#[must_use]
pub fn mock_request() -> GremlinRequest {
    init_tracing();
    GremlinRequest::graph_binary(TEST_URL, Vec::new())
}

/// A signer pinned to [`signing_time`].
#[must_use]
pub fn fixed_signer() -> Arc<dyn RequestSigner> {
    Arc::new(SigV4Signer::with_clock(FixedClock(signing_time())))
}

/// An environment with nothing set.
#[must_use]
pub fn empty_env(_name: &str) -> Option<String> {
    None
}

mod test_basic;
mod test_sigv4;
