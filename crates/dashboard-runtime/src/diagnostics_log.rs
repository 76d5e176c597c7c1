//! JSON-lines file sink for diagnostic events.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use dashboard_core::diagnostics::{DiagnosticEvent, DiagnosticSink};

/// Appends each event as one JSON object per line.
///
/// Write failures are swallowed; the first one is reported through
/// `tracing` at debug level and later ones are silent.
#[derive(Debug)]
pub struct JsonlDiagnosticSink {
    path: PathBuf,
    lock: Mutex<()>,
    failure_reported: AtomicBool,
}

impl JsonlDiagnosticSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            failure_reported: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &DiagnosticEvent) -> std::io::Result<()> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl DiagnosticSink for JsonlDiagnosticSink {
    fn record(&self, event: DiagnosticEvent) {
        if let Err(e) = self.append(&event) {
            if !self.failure_reported.swap(true, Ordering::Relaxed) {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "diagnostic log write failed; further failures suppressed"
                );
            }
        }
    }
}
