//! Taskwin reference task service.
//!
//! Serves the windowed task resource from an in-memory table.
//!
//! ```bash
//! # Default address 127.0.0.1:8000, mounted at /api/tasks
//! cargo run --bin taskwin-server
//!
//! # Custom address and mount point
//! cargo run --bin taskwin-server -- --bind 0.0.0.0:9100 --base-path /tasks
//! ```

use std::sync::Arc;

use clap::Parser;
use taskwin_server::api::{self, ApiState};
use taskwin_server::config::{ServerCliArgs, ServerConfig};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, base = %config.base_path, "starting task service");

    let state = Arc::new(ApiState::new());
    match api::start_server_with_state(&config.bind_addr, &config.base_path, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task service listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task service task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task service");
            std::process::exit(1);
        }
    }
}
