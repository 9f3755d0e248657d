//! Structured JSON logger.
//!
//! Every record is redacted with [`mask`] / [`mask_value`] before it is
//! serialized to a single line and handed to a [`LogSink`].

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::masker::{mask, mask_value};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single redacted log record. Produced and emitted immediately; never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub level: LogLevel,
    /// Redacted message.
    pub message: String,
    /// Redacted structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LogRecord {
    /// Build a record, masking the message and payload.
    pub fn new(level: LogLevel, message: &str, data: Option<&Value>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message: mask(message),
            data: data.map(mask_value),
        }
    }

    /// Serialize to one JSON line (no trailing newline).
    pub fn to_json_line(&self) -> String {
        // A record holds only strings and JSON values, so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Destination for serialized log lines.
pub trait LogSink: Send + Sync {
    /// Write one already-redacted line.
    fn write_line(&self, level: LogLevel, line: &str);
}

/// Writes `info`/`warn` to stdout and `error` to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdStreamSink;

impl LogSink for StdStreamSink {
    fn write_line(&self, level: LogLevel, line: &str) {
        // Broken pipes are the host's concern; logging never fails the caller.
        let _ = match level {
            LogLevel::Error => writeln!(std::io::stderr().lock(), "{}", line),
            LogLevel::Info | LogLevel::Warn => writeln!(std::io::stdout().lock(), "{}", line),
        };
    }
}

/// Collects lines in memory. Useful for tests and for hosts that forward logs.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far, with their level.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Parse every line back into a record.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lines()
            .iter()
            .filter_map(|(_, line)| serde_json::from_str(line).ok())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, level: LogLevel, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, line.to_string()));
    }
}

/// Redacting structured logger.
///
/// Construct once at startup and share the handle (it is cheap to clone).
/// Stateless apart from its sink; needs no shutdown.
#[derive(Clone)]
pub struct SecureLogger {
    sink: Arc<dyn LogSink>,
}

impl SecureLogger {
    /// Logger writing to the process's standard streams.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(StdStreamSink))
    }

    /// Logger writing to a custom sink.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Mask, serialize and emit one record.
    pub fn log(&self, level: LogLevel, message: &str, data: Option<&Value>) {
        let record = LogRecord::new(level, message, data);
        self.sink.write_line(level, &record.to_json_line());
    }

    pub fn info(&self, message: &str, data: Option<&Value>) {
        self.log(LogLevel::Info, message, data);
    }

    pub fn warn(&self, message: &str, data: Option<&Value>) {
        self.log(LogLevel::Warn, message, data);
    }

    pub fn error(&self, message: &str, data: Option<&Value>) {
        self.log(LogLevel::Error, message, data);
    }
}

impl Default for SecureLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecureLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureLogger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masker::REDACTION_MARKER;
    use serde_json::json;

    fn memory_logger() -> (SecureLogger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (SecureLogger::with_sink(sink.clone()), sink)
    }

    #[test]
    fn test_info_record_shape() {
        let (logger, sink) = memory_logger();
        logger.info("Info message", None);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Info);
        assert_eq!(records[0].message, "Info message");
        assert!(records[0].data.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&records[0].timestamp).is_ok());

        // `data` is omitted entirely when absent
        assert!(!sink.lines()[0].1.contains("\"data\""));
    }

    #[test]
    fn test_levels_are_routed() {
        let (logger, sink) = memory_logger();
        logger.info("a", None);
        logger.warn("b", None);
        logger.error("c", None);

        let levels: Vec<LogLevel> = sink.lines().into_iter().map(|(l, _)| l).collect();
        assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn, LogLevel::Error]);
        assert_eq!(sink.records()[2].level, LogLevel::Error);
    }

    #[test]
    fn test_message_is_masked() {
        let (logger, sink) = memory_logger();
        logger.info("Using api_key: sk_test_123456789", None);

        let message = &sink.records()[0].message;
        assert!(!message.contains("sk_test_123456789"));
        assert!(message.contains('*'));
    }

    #[test]
    fn test_data_is_masked() {
        let (logger, sink) = memory_logger();
        logger.info(
            "User data",
            Some(&json!({
                "username": "john",
                "apiKey": "secret123",
                "token": "bearer_token",
                "password": "mypassword"
            })),
        );

        let data = sink.records()[0].data.clone().unwrap();
        assert_eq!(data["username"], "john");
        assert_eq!(data["apiKey"], REDACTION_MARKER);
        assert_eq!(data["token"], REDACTION_MARKER);
        assert_eq!(data["password"], REDACTION_MARKER);
    }

    #[test]
    fn test_clean_data_passes_through() {
        let (logger, sink) = memory_logger();
        logger.warn("Test", Some(&json!({"username": "john", "id": 123})));

        assert_eq!(
            sink.records()[0].data,
            Some(json!({"username": "john", "id": 123}))
        );
    }

    #[test]
    fn test_record_is_single_line() {
        let record = LogRecord::new(LogLevel::Error, "line one\nline two", None);
        assert!(!record.to_json_line().contains('\n'));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
