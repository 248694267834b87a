//! HttpSink - JSON POST to a remote endpoint with retries

use std::sync::Arc;

use contracts::{ContractError, DeliveryOutcome, Observer, Record, RecordSink};
use tracing::{debug, instrument};
use url::Url;

use crate::retry::{deliver_with_retry, RetryPolicy};

/// Configuration for HttpSink
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Target endpoint
    pub url: Url,
    /// Attempts, pause and success statuses
    pub policy: Arc<dyn RetryPolicy>,
}

/// Sink that delivers a batch as one JSON array
pub struct HttpSink {
    name: String,
    config: HttpSinkConfig,
    client: reqwest::Client,
    observer: Arc<dyn Observer>,
}

impl HttpSink {
    /// Create a new HttpSink around an existing client
    ///
    /// The request timeout is a property of `client`.
    pub fn new(
        name: impl Into<String>,
        config: HttpSinkConfig,
        client: reqwest::Client,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            client,
            observer,
        }
    }

    /// Run the retry loop and return its outcome
    pub async fn deliver(&self, records: &[Record]) -> DeliveryOutcome {
        deliver_with_retry(
            &self.client,
            &self.config.url,
            records,
            self.config.policy.as_ref(),
            self.observer.as_ref(),
        )
        .await
    }
}

impl RecordSink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_sink_write",
        skip(self, records),
        fields(sink = %self.name, url = %self.config.url, records = records.len())
    )]
    async fn write(&mut self, records: &[Record]) -> Result<(), ContractError> {
        match self.deliver(records).await {
            DeliveryOutcome::Delivered { attempts, status } => {
                debug!(sink = %self.name, attempts, status, "Delivered");
                Ok(())
            }
            DeliveryOutcome::NotDelivered {
                attempts,
                last_failure,
            } => Err(ContractError::DeliveryFailed {
                url: self.config.url.to_string(),
                attempts,
                message: last_failure,
            }),
        }
    }

    #[instrument(name = "http_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
