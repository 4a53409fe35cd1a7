use std::process::ExitCode;

use backend::{build_state, AppConfig};
use tracing::{error, info};

mod telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // APP_ENV, SESSIONS_STORE and, for Postgres, the POSTGRES_*/APP_DB_* family.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let state = match build_state()
        .with_env(config.env)
        .with_store(config.store)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            return ExitCode::FAILURE;
        }
    };
    info!(store = ?config.store, "sessions backend ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }

    match state.shutdown().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "shutdown failed");
            ExitCode::FAILURE
        }
    }
}
