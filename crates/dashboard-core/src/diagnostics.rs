//! Best-effort diagnostic events emitted along the aggregation path.
//!
//! A [`DiagnosticSink`] is an optional capability handed to the aggregation
//! engine.  Its `record` method cannot fail: implementations deal with their
//! own I/O problems, so a broken sink never breaks a request.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One structured diagnostic entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    /// Pipeline stage that emitted the event, e.g. `"aggregate:after_filter"`.
    pub location: String,
    pub message: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl DiagnosticEvent {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            data: Map::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach one key/value pair to the event payload.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// Receiver for diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Forward `event` to `sink` when one is configured.
pub fn emit(sink: Option<&dyn DiagnosticSink>, event: impl FnOnce() -> DiagnosticEvent) {
    if let Some(sink) = sink {
        sink.record(event());
    }
}

/// Sink that keeps events in memory; handy for inspecting a single request.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
