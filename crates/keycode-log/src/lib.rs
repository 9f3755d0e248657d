//! # keycode-log
//!
//! Credential redaction and structured logging for Keycode.
//!
//! Anything a tool adapter wants to tell an operator goes through
//! [`SecureLogger`], which masks credential-shaped text before emitting one
//! JSON line per record:
//!
//! ```json
//! {"timestamp":"2026-01-01T00:00:00.000Z","level":"info","message":"api_key: ********"}
//! ```
//!
//! Diagnostic `tracing` output can be routed through the same masker with
//! [`RedactingMakeWriter`].
//!
//! ## Example Usage
//!
//! ```rust
//! use keycode_log::{mask, SecureLogger};
//! use serde_json::json;
//!
//! assert_eq!(mask("token=abc"), "token=***");
//!
//! let logger = SecureLogger::new();
//! logger.info("deploying", Some(&json!({"app": "docs", "apiToken": "x"})));
//! ```

pub mod logger;
pub mod masker;
pub mod writer;

pub use logger::{LogLevel, LogRecord, LogSink, MemorySink, SecureLogger, StdStreamSink};
pub use masker::{is_sensitive_key, mask, mask_value, REDACTION_MARKER};
pub use writer::{RedactingMakeWriter, RedactingWriter};
