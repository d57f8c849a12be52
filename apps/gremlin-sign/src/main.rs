//! gremlin-sign - print the headers a Gremlin request would carry.
//!
//! Authenticates a request with HTTP Basic or AWS SigV4 and prints the
//! resulting header map as JSON. Nothing is sent over the network, which makes
//! it handy for checking credentials and signing scope against a Neptune
//! endpoint.
//!
//! # Usage
//!
//! ```text
//! gremlin-sign basic --username alice --password secret https://localhost:8182/gremlin
//! gremlin-sign sigv4 --region us-west-2 --payload 'g.V().count()' https://db:8182/gremlin
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_ACCESS_KEY_ID` | *(unset)* | Access key when `--access-key-id` is absent |
//! | `AWS_SECRET_ACCESS_KEY` | *(unset)* | Secret key when `--secret-access-key` is absent |
//! | `AWS_SESSION_TOKEN` | *(unset)* | Session token when `--session-token` is absent |
//! | `AWS_REGION` / `AWS_DEFAULT_REGION` | *(unset)* | Region when `--region` is absent |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gremlin_auth::{Auth, Authenticator, GremlinRequest, SigV4Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Print the authentication headers for a Gremlin request.
#[derive(Debug, Parser)]
#[command(name = "gremlin-sign", version, about)]
struct Cli {
    #[command(subcommand)]
    scheme: Scheme,
}

#[derive(Debug, Subcommand)]
enum Scheme {
    /// HTTP Basic authentication.
    Basic {
        /// Username.
        #[arg(long)]
        username: String,
        /// Password.
        #[arg(long, default_value = "")]
        password: String,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// AWS Signature Version 4.
    Sigv4 {
        /// AWS region of the endpoint.
        #[arg(long)]
        region: Option<String>,
        /// Access key ID.
        #[arg(long, default_value = "")]
        access_key_id: String,
        /// Secret access key.
        #[arg(long, default_value = "")]
        secret_access_key: String,
        /// Session token for temporary credentials.
        #[arg(long, default_value = "")]
        session_token: String,
        /// Service name in the credential scope (default `neptune-db`).
        #[arg(long, default_value = "")]
        service_name: String,
        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(Debug, Args)]
struct RequestArgs {
    /// Gremlin endpoint URL.
    url: String,
    /// Request body.
    #[arg(long, default_value = "")]
    payload: String,
    /// Do not add the GraphBinary `content-type` and `accept` headers.
    #[arg(long)]
    no_graph_binary: bool,
}

impl RequestArgs {
    fn build(&self) -> GremlinRequest {
        let payload = self.payload.clone().into_bytes();
        if self.no_graph_binary {
            GremlinRequest::new(self.url.clone(), payload)
        } else {
            GremlinRequest::graph_binary(self.url.clone(), payload)
        }
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the authenticator selected on the command line.
fn build_auth(scheme: &Scheme, env_region: impl FnOnce() -> String) -> Result<Auth> {
    match scheme {
        Scheme::Basic {
            username, password, ..
        } => Ok(Auth::basic(username.as_str(), password.as_str())),
        Scheme::Sigv4 {
            region,
            access_key_id,
            secret_access_key,
            session_token,
            service_name,
            ..
        } => {
            let region_name = region.clone().unwrap_or_else(env_region);
            if region_name.is_empty() {
                bail!("no region given; pass --region or set AWS_REGION");
            }

            let config = SigV4Config::builder()
                .region_name(region_name)
                .aws_access_key_id(access_key_id.as_str())
                .aws_secret_access_key(secret_access_key.as_str())
                .session_token(session_token.as_str())
                .service_name(service_name.as_str())
                .build();
            Ok(Auth::sigv4(&config))
        }
    }
}

/// Authenticate the request described by `cli` and return its headers.
fn run(cli: &Cli) -> Result<BTreeMap<String, String>> {
    let request_args = match &cli.scheme {
        Scheme::Basic { request, .. } | Scheme::Sigv4 { request, .. } => request,
    };

    let auth = build_auth(&cli.scheme, || SigV4Config::from_env().region_name)?;
    match &auth {
        Auth::Basic(basic) => info!(username = basic.username(), "using basic authentication"),
        Auth::SigV4(sigv4) => info!(
            region = sigv4.region_name(),
            service = sigv4.service_name(),
            "using sigv4 signing"
        ),
    }
    let mut request = request_args.build();
    auth.apply(&mut request)
        .with_context(|| format!("failed to authenticate request to {}", request_args.url))?;

    info!(url = %request.url, headers = request.headers.len(), "authenticated request");

    Ok(request.headers.into_iter().collect())
}

fn main() -> Result<()> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_owned());
    init_tracing(&log_level)?;

    let cli = Cli::parse();
    let headers = run(&cli)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&headers).context("failed to serialize headers")?
    );

    Ok(())
}
