//! Dispatcher - routes one batch of records to exactly one destination

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use contracts::{
    ContractError, DeliveryOutcome, Destination, ExportBlueprint, Observer, OutputFormat, Record,
    RecordSink,
};
use tracing::{info, instrument};
use url::Url;

use crate::error::DispatcherError;
use crate::retry::{FixedDelayPolicy, RetryPolicy};
use crate::sinks::{CsvSink, HttpSink, HttpSinkConfig, JsonSink, SqliteSink, XlsxSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Table used by the SQLite writer
    pub table_name: String,
    /// Per-request timeout for remote delivery
    pub request_timeout: Duration,
    /// Retry policy for remote delivery
    pub retry_policy: Arc<dyn RetryPolicy>,
}

impl DispatcherConfig {
    pub fn from_blueprint(blueprint: &ExportBlueprint) -> Self {
        Self {
            table_name: blueprint.output.table_name.clone(),
            request_timeout: blueprint.delivery.timeout(),
            retry_policy: Arc::new(FixedDelayPolicy::from_config(&blueprint.delivery)),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from_blueprint(&ExportBlueprint::default())
    }
}

/// Why a call did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    NoDestination,
}

/// What a successful call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// No I/O was performed
    Skipped(SkipReason),
    /// Records written to a local file
    Written {
        format: OutputFormat,
        path: PathBuf,
        rows: usize,
    },
    /// Records accepted by the remote endpoint
    Delivered {
        url: Url,
        attempts: u32,
        status: u16,
    },
}

impl fmt::Display for PersistOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(SkipReason::EmptyInput) => write!(f, "skipped: no records"),
            Self::Skipped(SkipReason::NoDestination) => write!(f, "skipped: no destination"),
            Self::Written { format, path, rows } => {
                write!(f, "wrote {rows} record(s) as {format} to {}", path.display())
            }
            Self::Delivered {
                url,
                attempts,
                status,
            } => write!(f, "delivered to {url} (HTTP {status}, attempt {attempts})"),
        }
    }
}

/// Persistence dispatcher
pub struct Dispatcher {
    config: DispatcherConfig,
    client: reqwest::Client,
    observer: Arc<dyn Observer>,
}

impl Dispatcher {
    /// Create a dispatcher; builds the HTTP client with the configured timeout
    pub fn new(
        config: DispatcherConfig,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, DispatcherError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DispatcherError::sink_creation("http", e.to_string()))?;
        Ok(Self::with_client(config, client, observer))
    }

    /// Create a dispatcher with a custom HTTP client (for testing or proxies)
    pub fn with_client(
        config: DispatcherConfig,
        client: reqwest::Client,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            config,
            client,
            observer,
        }
    }

    /// Persist `records` to `destination`
    ///
    /// Order of checks: empty input, remote URL, file path, no destination.
    /// A remote destination never touches the filesystem. An unrecognised
    /// file suffix fails before any I/O.
    #[instrument(
        name = "dispatcher_persist",
        skip(self, records, destination),
        fields(records = records.len())
    )]
    pub async fn persist(
        &self,
        records: &[Record],
        destination: Option<&Destination>,
    ) -> Result<PersistOutcome, DispatcherError> {
        if records.is_empty() {
            self.observer.warn("No items to save");
            return Ok(PersistOutcome::Skipped(SkipReason::EmptyInput));
        }

        match destination {
            Some(Destination::Remote(url)) => self.deliver(records, url).await,
            Some(Destination::File(path)) => self.write_file(records, path).await,
            None => {
                self.observer
                    .warn("No file name provided and no API endpoint");
                Ok(PersistOutcome::Skipped(SkipReason::NoDestination))
            }
        }
    }

    async fn deliver(
        &self,
        records: &[Record],
        url: &Url,
    ) -> Result<PersistOutcome, DispatcherError> {
        let sink = HttpSink::new(
            "http",
            HttpSinkConfig {
                url: url.clone(),
                policy: Arc::clone(&self.config.retry_policy),
            },
            self.client.clone(),
            Arc::clone(&self.observer),
        );

        match sink.deliver(records).await {
            DeliveryOutcome::Delivered { attempts, status } => {
                info!(url = %url, attempts, status, "Records delivered");
                Ok(PersistOutcome::Delivered {
                    url: url.clone(),
                    attempts,
                    status,
                })
            }
            DeliveryOutcome::NotDelivered {
                attempts,
                last_failure,
            } => Err(ContractError::DeliveryFailed {
                url: url.to_string(),
                attempts,
                message: last_failure,
            }
            .into()),
        }
    }

    async fn write_file(
        &self,
        records: &[Record],
        path: &Path,
    ) -> Result<PersistOutcome, DispatcherError> {
        let format = OutputFormat::from_path(path).inspect_err(|e| {
            self.observer.error(&e.to_string());
        })?;

        let name = format.as_str();
        let result = match format {
            OutputFormat::Csv => run_sink(CsvSink::new(name, path), records).await,
            OutputFormat::Json => run_sink(JsonSink::new(name, path), records).await,
            OutputFormat::Xlsx => run_sink(XlsxSink::new(name, path), records).await,
            OutputFormat::Sqlite => {
                let sink = SqliteSink::new(name, path, self.config.table_name.as_str());
                run_sink(sink, records).await
            }
        };

        match result {
            Ok(()) => {
                self.observer.info(&format!(
                    "Data saved as {}: {}",
                    format.as_str().to_uppercase(),
                    path.display()
                ));
                Ok(PersistOutcome::Written {
                    format,
                    path: path.to_path_buf(),
                    rows: records.len(),
                })
            }
            Err(e) => {
                self.observer.error(&format!("Failed to save data: {e}"));
                Err(e.into())
            }
        }
    }
}

async fn run_sink<S: RecordSink>(mut sink: S, records: &[Record]) -> Result<(), ContractError> {
    sink.write(records).await?;
    sink.close().await
}

/// Convenience function to create a dispatcher from a loaded blueprint
pub fn create_dispatcher(
    blueprint: &ExportBlueprint,
    observer: Arc<dyn Observer>,
) -> Result<Dispatcher, DispatcherError> {
    Dispatcher::new(DispatcherConfig::from_blueprint(blueprint), observer)
}
