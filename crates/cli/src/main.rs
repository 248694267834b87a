//! # Listing Export CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Records ingestion from a JSON file or stdin
//! - Configuration loading, overrides and validation
//! - Persistence through the dispatcher

mod cli;
mod commands;
mod error;
mod input;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use contracts::Observer;
use observability::{ObservabilityConfig, TracingObserver};
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_export, run_info, run_validate};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        "Listing export CLI starting"
    );

    let observer: Arc<dyn Observer> = Arc::new(TracingObserver::new());

    let result = match &cli.command {
        Commands::Export(args) => run_export(args, observer).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Map CLI logging options onto the observability setup
fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        default_log_level: default_log_level.to_string(),
        log_file: cli.log_file.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_from_flags() {
        let cli = Cli::try_parse_from([
            "listing-export",
            "-vv",
            "--metrics-port",
            "9100",
            "--log-file",
            "export.log",
            "info",
        ])
        .unwrap();

        let config = observability_config(&cli);
        assert_eq!(config.default_log_level, "trace");
        assert_eq!(config.metrics_port, Some(9100));
        assert_eq!(config.log_file, Some(std::path::PathBuf::from("export.log")));
    }

    #[test]
    fn test_quiet_and_metrics_disabled_by_default() {
        let cli = Cli::try_parse_from(["listing-export", "-q", "info"]).unwrap();

        let config = observability_config(&cli);
        assert_eq!(config.default_log_level, "warn");
        assert_eq!(config.metrics_port, None);
    }
}
