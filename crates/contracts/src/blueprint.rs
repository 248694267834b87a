//! ExportBlueprint - Config Loader output
//!
//! Describes where scraped listings go and how remote delivery is retried.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::Destination;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ExportBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Output destination
    #[serde(default)]
    #[validate(nested)]
    pub output: OutputConfig,

    /// Remote delivery tuning
    #[serde(default)]
    #[validate(nested)]
    pub delivery: DeliveryConfig,
}

impl ExportBlueprint {
    /// Active destination, URL first
    pub fn destination(&self) -> Option<Destination> {
        Destination::resolve(self.output.path.clone(), self.output.url.clone())
    }
}

/// Output destination configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OutputConfig {
    /// Local file; format inferred from suffix
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Remote endpoint; takes precedence over `path`
    #[serde(default)]
    pub url: Option<Url>,

    /// SQLite table name
    #[serde(default = "default_table_name")]
    #[validate(length(min = 1, max = 128))]
    pub table_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            table_name: default_table_name(),
        }
    }
}

fn default_table_name() -> String {
    "products".to_string()
}

/// Retrying HTTP delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeliveryConfig {
    /// Attempts including the first request
    #[serde(default = "default_max_attempts")]
    #[validate(range(min = 1, max = 100))]
    pub max_attempts: u32,

    /// Fixed pause after a failed attempt (seconds)
    #[serde(default = "default_retry_delay_secs")]
    #[validate(range(min = 0.0, max = 3600.0))]
    pub retry_delay_secs: f64,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    #[validate(range(exclusive_min = 0.0, max = 3600.0))]
    pub timeout_secs: f64,

    /// Status codes counted as delivered
    #[serde(default = "default_success_statuses")]
    #[validate(length(min = 1))]
    pub success_statuses: Vec<u16>,
}

impl DeliveryConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.retry_delay_secs).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or_default()
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
            timeout_secs: default_timeout_secs(),
            success_statuses: default_success_statuses(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> f64 {
    2.0
}

fn default_timeout_secs() -> f64 {
    10.0
}

fn default_success_statuses() -> Vec<u16> {
    vec![200, 201]
}
