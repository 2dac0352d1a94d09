use std::sync::Mutex;

/// Severity of a diagnostic emitted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// A single recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub event: &'static str,
    pub message: String,
}

/// Log sink handed down explicitly to every pipeline stage.
///
/// Library code never reads environment flags to decide what to log; the
/// caller chooses the sink.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, level: Level, event: &'static str, message: &str);

    fn debug(&self, event: &'static str, message: &str) {
        self.emit(Level::Debug, event, message);
    }

    fn info(&self, event: &'static str, message: &str) {
        self.emit(Level::Info, event, message);
    }

    fn warn(&self, event: &'static str, message: &str) {
        self.emit(Level::Warn, event, message);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, level: Level, event: &'static str, message: &str) {
        match level {
            Level::Debug => tracing::debug!(event = event, "{message}"),
            Level::Info => tracing::info!(event = event, "{message}"),
            Level::Warn => tracing::warn!(event = event, "{message}"),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn emit(&self, _level: Level, _event: &'static str, _message: &str) {}
}

/// Keeps diagnostics in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Records emitted under the given event name.
    pub fn events(&self, event: &str) -> Vec<Diagnostic> {
        self.records()
            .into_iter()
            .filter(|record| record.event == event)
            .collect()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, event: &'static str, message: &str) {
        let record = Diagnostic {
            level,
            event,
            message: message.to_string(),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
