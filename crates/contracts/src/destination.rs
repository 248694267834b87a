//! Destination - where a batch of records is persisted

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ContractError;

/// File format selected from the destination path suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Json,
    /// Office Open XML spreadsheet (`.xlsx`, also accepted for `.xls`)
    Xlsx,
    Sqlite,
}

impl OutputFormat {
    /// Map a bare extension (no dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" | "xls" => Some(Self::Xlsx),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Classify a destination path. Pure: touches nothing on disk.
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ContractError::unsupported_format(path))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of one persistence call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Local file; format inferred from suffix
    File(PathBuf),
    /// Remote HTTP endpoint receiving a JSON POST
    Remote(Url),
}

impl Destination {
    /// Pick the active destination. A URL always wins over a path.
    pub fn resolve(path: Option<PathBuf>, url: Option<Url>) -> Option<Self> {
        match (url, path) {
            (Some(url), _) => Some(Self::Remote(url)),
            (None, Some(path)) => Some(Self::File(path)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}
