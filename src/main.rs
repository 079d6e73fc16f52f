//! Verity CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use verity::telemetry::init_tracing;
use verity::{ToolError, VerityConfig};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "verity failed");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ToolError> {
    let config = load_config()?;
    let output = cli::run(&config).await?;
    cli::output::write_tool_output(&mut io::stdout().lock(), output.as_deref())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ToolError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<VerityConfig, ToolError> {
    VerityConfig::load().map_err(|error| ToolError::Configuration {
        message: error.to_string(),
    })
}
