//! Retrying remote delivery
//!
//! [`FixedDelayPolicy`]: a fixed number of attempts with a fixed pause in
//! between and a set of status codes counted as success. Every other status
//! and every transport error is retried the same way.

use std::fmt;
use std::time::Duration;

use contracts::{DeliveryConfig, DeliveryOutcome, Observer, Record};
use tracing::{debug, instrument};
use url::Url;

/// Longest response body echoed into events
const BODY_PREVIEW_CHARS: usize = 200;

/// Strategy consulted by [`deliver_with_retry`]
pub trait RetryPolicy: fmt::Debug + Send + Sync {
    /// Attempts including the first request
    fn max_attempts(&self) -> u32;

    /// Pause after failed attempt number `attempt` (1-based)
    fn delay_after(&self, attempt: u32) -> Duration;

    /// Whether a response status counts as delivered
    fn is_success(&self, status: u16) -> bool;
}

/// Fixed attempts, fixed delay, no backoff, no jitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDelayPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub success_statuses: Vec<u16>,
}

impl FixedDelayPolicy {
    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: config.retry_delay(),
            success_statuses: config.success_statuses.clone(),
        }
    }
}

impl Default for FixedDelayPolicy {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default())
    }
}

impl RetryPolicy for FixedDelayPolicy {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay_after(&self, _attempt: u32) -> Duration {
        self.delay
    }

    fn is_success(&self, status: u16) -> bool {
        self.success_statuses.contains(&status)
    }
}

/// POST `records` as a JSON array to `url` until the policy reports success
/// or the attempts run out.
///
/// Never fails: the result is carried by [`DeliveryOutcome`].
#[instrument(
    name = "deliver_with_retry",
    skip(client, records, policy, observer),
    fields(url = %url, records = records.len())
)]
pub async fn deliver_with_retry<P>(
    client: &reqwest::Client,
    url: &Url,
    records: &[Record],
    policy: &P,
    observer: &dyn Observer,
) -> DeliveryOutcome
where
    P: RetryPolicy + ?Sized,
{
    let max_attempts = policy.max_attempts().max(1);
    let mut last_failure = String::new();

    for attempt in 1..=max_attempts {
        match client.post(url.clone()).json(records).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if policy.is_success(status) {
                    observer.info(&format!(
                        "Data successfully POSTed to {url} on attempt {attempt}"
                    ));
                    return DeliveryOutcome::Delivered {
                        attempts: attempt,
                        status,
                    };
                }

                let body = response.text().await.unwrap_or_default();
                let body = preview(&body);
                observer.warn(&format!(
                    "Attempt {attempt}/{max_attempts}: POST failed ({status}) - {body}"
                ));
                last_failure = format!("HTTP {status}");
            }
            Err(e) => {
                observer.warn(&format!(
                    "Attempt {attempt}/{max_attempts}: exception during POST - {e}"
                ));
                last_failure = e.to_string();
            }
        }

        if attempt < max_attempts {
            let delay = policy.delay_after(attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
            tokio::time::sleep(delay).await;
        }
    }

    observer.error(&format!("All {max_attempts} attempt(s) to POST to {url} failed"));
    DeliveryOutcome::NotDelivered {
        attempts: max_attempts,
        last_failure,
    }
}

fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(BODY_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, StatusServer};
    use contracts::{EventLevel, RecordingObserver};
    use std::time::Instant;

    fn sample_records() -> Vec<Record> {
        vec![[("title", "Keyboard"), ("link", "/dp/1")].into_iter().collect()]
    }

    fn fast_policy(delay_ms: u64) -> FixedDelayPolicy {
        FixedDelayPolicy {
            delay: Duration::from_millis(delay_ms),
            ..FixedDelayPolicy::default()
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = FixedDelayPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert!(policy.is_success(200));
        assert!(policy.is_success(201));
        assert!(!policy.is_success(204));
        assert!(!policy.is_success(400));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let server = StatusServer::start(vec![201]).await;
        let observer = RecordingObserver::new();

        let outcome = deliver_with_retry(
            &client(),
            &server.url(),
            &sample_records(),
            &fast_policy(10),
            &observer,
        )
        .await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered {
                attempts: 1,
                status: 201
            }
        );
        assert_eq!(server.hits(), 1);
        assert_eq!(observer.count(EventLevel::Warn), 0);
    }

    #[tokio::test]
    async fn test_server_error_exhausts_attempts() {
        let server = StatusServer::start(vec![500]).await;
        let observer = RecordingObserver::new();
        let started = Instant::now();

        let outcome = deliver_with_retry(
            &client(),
            &server.url(),
            &sample_records(),
            &fast_policy(50),
            &observer,
        )
        .await;

        assert!(!outcome.is_delivered());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(server.hits(), 3);
        // Two pauses between three attempts
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(observer.count(EventLevel::Warn), 3);
        assert!(observer.contains(EventLevel::Error, "All 3 attempt(s)"));
    }

    #[tokio::test]
    async fn test_client_error_is_retried_like_server_error() {
        let server = StatusServer::start(vec![400, 503, 200]).await;

        let outcome = deliver_with_retry(
            &client(),
            &server.url(),
            &sample_records(),
            &fast_policy(1),
            &contracts::NoopObserver,
        )
        .await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered {
                attempts: 3,
                status: 200
            }
        );
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_transport_error_is_retried() {
        // Bind then drop to obtain a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{addr}/items")).unwrap();
        let observer = RecordingObserver::new();

        let policy = FixedDelayPolicy {
            max_attempts: 2,
            ..fast_policy(1)
        };
        let outcome = deliver_with_retry(
            &client(),
            &url,
            &sample_records(),
            &policy,
            &observer,
        )
        .await;

        assert!(matches!(
            outcome,
            DeliveryOutcome::NotDelivered { attempts: 2, .. }
        ));
        assert!(observer.contains(EventLevel::Warn, "exception during POST"));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let server = StatusServer::start(vec![200]).await;
        let policy = FixedDelayPolicy {
            max_attempts: 0,
            ..fast_policy(1)
        };

        let outcome = deliver_with_retry(
            &client(),
            &server.url(),
            &sample_records(),
            &policy,
            &contracts::NoopObserver,
        )
        .await;

        assert!(outcome.is_delivered());
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_body_is_json_array() {
        let server = StatusServer::start(vec![200]).await;

        deliver_with_retry(
            &client(),
            &server.url(),
            &sample_records(),
            &fast_policy(1),
            &contracts::NoopObserver,
        )
        .await;

        let bodies = server.bodies();
        assert_eq!(bodies.len(), 1);
        let parsed: Vec<Record> = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(parsed, sample_records());
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(BODY_PREVIEW_CHARS + 10);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), BODY_PREVIEW_CHARS + 1);
        assert_eq!(preview("short"), "short");
    }
}
