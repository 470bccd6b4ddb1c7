//! Minimal structured logging for the resolution engine.
//!
//! No external logging crate is pulled in here: the engine emits a handful
//! of well-known events (override hit, default-implementation hit, shared
//! publish, shared cache hit, hook fired, resolution error) and a tiny
//! `Sink` trait lets a host forward them to whatever logging stack the
//! surrounding application already uses.

use std::fmt;
use std::time::Instant;

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// A single structured log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Short, stable event name (e.g. `"override_hit"`, `"hook_fired"`).
    pub target: &'static str,
    pub message: String,
    /// Ad hoc key/value context, rendered as `key=value` pairs.
    pub fields: Vec<(&'static str, String)>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.level, self.target, self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Destination for log entries emitted by a [`Container`](crate::Container).
pub trait Sink: Send + Sync {
    fn emit(&self, entry: &LogEntry);
}

/// Writes entries to stderr, one line each. The default sink.
#[derive(Debug, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn emit(&self, entry: &LogEntry) {
        eprintln!("{entry}");
    }
}

/// Discards every entry. Useful in tests that assert on resolution
/// behavior and don't want log noise.
#[derive(Debug, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn emit(&self, _entry: &LogEntry) {}
}

/// Configuration controlling which severities actually reach the sink.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    pub min_level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

/// A named logger bound to a sink and a minimum level.
pub struct Logger {
    sink: Box<dyn Sink>,
    config: LogConfig,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("config", &self.config).finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            sink: Box::new(StderrSink),
            config: LogConfig::default(),
        }
    }
}

impl Logger {
    #[must_use]
    pub fn new(sink: Box<dyn Sink>, config: LogConfig) -> Self {
        Self { sink, config }
    }

    #[must_use]
    pub fn silent() -> Self {
        Self::new(Box::new(NullSink), LogConfig { min_level: LogLevel::Error })
    }

    pub fn log(&self, level: LogLevel, target: &'static str, message: impl Into<String>) {
        self.log_with(level, target, message, &[])
    }

    pub fn log_with(
        &self,
        level: LogLevel,
        target: &'static str,
        message: impl Into<String>,
        fields: &[(&'static str, String)],
    ) {
        if level < self.config.min_level {
            return;
        }
        let entry = LogEntry {
            level,
            target,
            message: message.into(),
            fields: fields.to_vec(),
        };
        self.sink.emit(&entry);
    }
}

/// RAII timer for a single top-level `load`/`resolve` call.
///
/// Starting an `AutoSpan` records the start instant; dropping it emits a
/// `Debug`-level entry with the elapsed time. [`Span`] is the inert,
/// already-finished record an `AutoSpan` produces on drop, kept around so
/// callers can assert on elapsed time in tests without racing a live timer.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub name: &'static str,
    pub elapsed_nanos: u128,
}

pub struct AutoSpan<'a> {
    name: &'static str,
    start: Instant,
    logger: &'a Logger,
}

impl<'a> AutoSpan<'a> {
    pub fn start(name: &'static str, logger: &'a Logger) -> Self {
        Self {
            name,
            start: Instant::now(),
            logger,
        }
    }

    #[must_use]
    pub fn finish(self) -> Span {
        let elapsed_nanos = self.start.elapsed().as_nanos();
        Span {
            name: self.name,
            elapsed_nanos,
        }
    }
}

impl Drop for AutoSpan<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.logger.log_with(
            LogLevel::Debug,
            "span",
            format!("{} finished", self.name),
            &[("elapsed_us", elapsed.as_micros().to_string())],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Default)]
    struct RecordingSink(Arc<StdMutex<Vec<String>>>);

    impl Sink for RecordingSink {
        fn emit(&self, entry: &LogEntry) {
            self.0.lock().unwrap().push(entry.to_string());
        }
    }

    #[test]
    fn respects_min_level() {
        let records = Arc::new(StdMutex::new(Vec::new()));
        let logger = Logger::new(
            Box::new(RecordingSink(records.clone())),
            LogConfig { min_level: LogLevel::Warn },
        );
        logger.log(LogLevel::Debug, "test", "should be dropped");
        logger.log(LogLevel::Error, "test", "should land");
        let entries = records.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("should land"));
    }

    #[test]
    fn entry_display_includes_fields() {
        let entry = LogEntry {
            level: LogLevel::Info,
            target: "override_hit",
            message: "resolved override".to_string(),
            fields: vec![("capability", "Clock".to_string())],
        };
        let rendered = entry.to_string();
        assert!(rendered.contains("capability=Clock"));
        assert!(rendered.contains("[INFO]"));
    }

    #[test]
    fn auto_span_reports_elapsed() {
        let logger = Logger::silent();
        let span = AutoSpan::start("test-span", &logger).finish();
        assert_eq!(span.name, "test-span");
    }
}
