//! Estimation service entry-point.
//!
//! Runs as its own process with no database access; delegation tokens are
//! verified statelessly against the shared secret.

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::server::{self, EstimationConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = EstimationConfig::parse();
    server::run_estimation(config).await
}
