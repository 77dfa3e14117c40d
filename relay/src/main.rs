//! Luau Audit Relay Server Entry Point

use clap::Parser;
use luau_audit_relay::{cli::Cli, logging, server, AppState};
use luau_audit_relay_common::config::{RelayConfig, StartupWarning};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init() {
        eprintln!("failed to initialize logging: {}", err);
    }

    info!("Luau Audit Relay v{}", env!("CARGO_PKG_VERSION"));

    let mut config = RelayConfig::from_env();
    cli.apply(&mut config);

    for warning in config.startup_warnings() {
        match warning {
            StartupWarning::MissingApiKey => error!("{}", warning),
            StartupWarning::MissingSharedSecret => warn!("{}", warning),
        }
    }

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to initialize relay: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = server::run(state).await {
        error!("Server error: {}", err);
        std::process::exit(1);
    }
}
