// crates/mock-gate-server/src/audit.rs
// ============================================================================
// Module: Request Log Sinks
// Description: JSON-lines sinks for completed request entries.
// Purpose: Persist one structured entry per request for later review.
// Dependencies: mock-gate-config, mock-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Each completed request produces one [`RequestLogEntry`], serialized as a
//! single JSON line. Sinks are selected from `[logging]`: stdout, an
//! append-only file under `reports_dir`, both, or neither.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use mock_gate_config::LoggingConfig;
use mock_gate_core::LogSink;
use mock_gate_core::NoopLogSink;
use mock_gate_core::RequestLogEntry;

use crate::server::ServerError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Request log file name inside `reports_dir`.
pub const REQUEST_LOG_FILE: &str = "mock-gate-requests.jsonl";

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that writes JSON lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutLogSink;

impl LogSink for StdoutLogSink {
    fn record(&self, entry: &RequestLogEntry) {
        if let Ok(payload) = serde_json::to_string(entry) {
            let _ = writeln!(io::stdout(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileLogSink {
    /// File handle used for append-only logging.
    file: Mutex<fs::File>,
}

impl FileLogSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileLogSink {
    fn record(&self, entry: &RequestLogEntry) {
        if let Ok(payload) = serde_json::to_string(entry)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that forwards every entry to several sinks.
pub struct FanoutLogSink {
    /// Downstream sinks, in order.
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutLogSink {
    /// Creates a fan-out over `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self {
            sinks,
        }
    }
}

impl LogSink for FanoutLogSink {
    fn record(&self, entry: &RequestLogEntry) {
        for sink in &self.sinks {
            sink.record(entry);
        }
    }
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink described by `[logging]`.
///
/// # Errors
///
/// Returns [`ServerError::Init`] when the reports directory or log file
/// cannot be created.
pub fn build_log_sink(config: &LoggingConfig) -> Result<Arc<dyn LogSink>, ServerError> {
    let mut sinks: Vec<Arc<dyn LogSink>> = Vec::new();
    if config.stdout {
        sinks.push(Arc::new(StdoutLogSink));
    }
    if let Some(dir) = &config.reports_dir {
        let dir = Path::new(dir);
        fs::create_dir_all(dir).map_err(|err| {
            ServerError::Init(format!("reports dir {} unavailable: {err}", dir.display()))
        })?;
        let path = dir.join(REQUEST_LOG_FILE);
        let sink = FileLogSink::new(&path).map_err(|err| {
            ServerError::Init(format!("request log {} unavailable: {err}", path.display()))
        })?;
        sinks.push(Arc::new(sink));
    }
    Ok(match sinks.len() {
        0 => Arc::new(NoopLogSink),
        1 => sinks.remove(0),
        _ => Arc::new(FanoutLogSink::new(sinks)),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
