//! Error handling module for termshot
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns these; the binary wraps them with anyhow context.

use thiserror::Error;

/// Main error type for termshot
#[derive(Error, Debug)]
pub enum TermshotError {
    /// IO errors (reading stdin, writing config files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external tool could not be started at all
    #[error("Failed to start {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran and exited unsuccessfully
    #[error("{tool} failed (exit code {code}): {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// The terminal window never showed up within the polling budget
    #[error("Window with class '{class}' not found after {waited_ms}ms (last search: {last_error})")]
    WindowNotFound {
        class: String,
        waited_ms: u64,
        last_error: String,
    },

    /// The terminal process died before its window was found
    #[error("Terminal exited before its window appeared (status: {status})")]
    TerminalExited { status: String },

    /// An input line could not be turned into injection arguments
    #[error("Input line {line}: {reason}")]
    InputParse { line: usize, reason: String },
}

/// Result type alias for termshot operations
pub type Result<T> = std::result::Result<T, TermshotError>;

impl TermshotError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an input parse error for a 1-based line number
    pub fn input_parse(line: usize, reason: impl Into<String>) -> Self {
        Self::InputParse {
            line,
            reason: reason.into(),
        }
    }
}
