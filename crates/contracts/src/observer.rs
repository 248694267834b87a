//! Observer - explicitly passed observability handle
//!
//! Components report operational events through an `Observer` they are given,
//! instead of a process-wide logger. The binary wires a tracing-backed
//! implementation; tests inject [`NoopObserver`] or [`RecordingObserver`].

use std::fmt;
use std::sync::Mutex;

/// Severity of an observed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Sink for operational events
pub trait Observer: Send + Sync {
    fn emit(&self, level: EventLevel, message: &str);

    fn debug(&self, message: &str) {
        self.emit(EventLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(EventLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(EventLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(EventLevel::Error, message);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn emit(&self, _level: EventLevel, _message: &str) {}
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(EventLevel, String)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events seen so far
    pub fn events(&self) -> Vec<(EventLevel, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of events at exactly `level`
    pub fn count(&self, level: EventLevel) -> usize {
        self.events().iter().filter(|(l, _)| *l == level).count()
    }

    /// True if any event at `level` contains `needle`
    pub fn contains(&self, level: EventLevel, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }
}

impl Observer for RecordingObserver {
    fn emit(&self, level: EventLevel, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, message.to_string()));
        }
    }
}
