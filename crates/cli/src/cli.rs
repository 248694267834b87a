//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// Listing Export - persist scraped product listings to a file or an HTTP endpoint
#[derive(Parser, Debug)]
#[command(
    name = "listing-export",
    author,
    version,
    about = "Persist scraped product listings",
    long_about = "Writes a batch of scraped listings to CSV, JSON, XLSX or SQLite \n\
                  (chosen by file suffix), or POSTs it to an HTTP endpoint with \n\
                  fixed-delay retries."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LISTING_EXPORT_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "LISTING_EXPORT_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, env = "LISTING_EXPORT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "LISTING_EXPORT_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Persist a batch of records
    Export(ExportArgs),

    /// Validate configuration file without exporting
    Validate(ValidateArgs),

    /// Display the resolved destination and retry policy
    Info(InfoArgs),
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone, Default)]
pub struct ExportArgs {
    /// JSON array of string-valued objects ("-" reads stdin)
    #[arg(short, long, default_value = "-", env = "LISTING_EXPORT_INPUT")]
    pub input: PathBuf,

    /// Configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "LISTING_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override output file; suffix selects the format
    #[arg(short, long, env = "LISTING_EXPORT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Override remote endpoint; takes precedence over any output file
    #[arg(long, env = "LISTING_EXPORT_URL")]
    pub url: Option<Url>,

    /// Override SQLite table name
    #[arg(long)]
    pub table: Option<String>,

    /// Override delivery attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Override pause between delivery attempts (seconds)
    #[arg(long)]
    pub retry_delay: Option<f64>,

    /// Override per-request timeout (seconds)
    #[arg(long)]
    pub timeout: Option<f64>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "export.toml", env = "LISTING_EXPORT_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "export.toml", env = "LISTING_EXPORT_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_with_overrides() {
        let cli = Cli::try_parse_from([
            "listing-export",
            "-v",
            "export",
            "--input",
            "records.json",
            "--output",
            "keyboard.csv",
            "--url",
            "https://api.example.com/ingest",
            "--max-attempts",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.input, PathBuf::from("records.json"));
        assert_eq!(args.output, Some(PathBuf::from("keyboard.csv")));
        assert_eq!(
            args.url.as_ref().map(Url::as_str),
            Some("https://api.example.com/ingest")
        );
        assert_eq!(args.max_attempts, Some(5));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = Cli::try_parse_from(["listing-export", "export", "--url", "not a url"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["listing-export", "-q", "-v", "info"]);
        assert!(result.is_err());
    }
}
