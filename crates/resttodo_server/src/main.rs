//! Todo service entry point.
//!
//! Runs with fixed defaults: `0.0.0.0:5000`, database `todos.db` in the
//! working directory.

use log::error;
use resttodo_core::init_logging;
use resttodo_server::{Server, ServerConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::default();

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match Server::new(config).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}
