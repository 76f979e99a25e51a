use std::path::PathBuf;
use std::process::ExitCode;

use api::{AppConfig, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the environment may be set by the host.
    let _ = dotenvy::dotenv();

    let log_file = std::env::var("LOG_FILE").ok().map(PathBuf::from);
    if let Err(e) = telemetry::init(log_file.as_deref()) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    info!("starting review bridge");
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match api::start(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server terminated with error");
            ExitCode::FAILURE
        }
    }
}
