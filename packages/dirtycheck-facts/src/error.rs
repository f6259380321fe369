//! Error types for dirtycheck-facts

use std::fmt;
use thiserror::Error;

/// Fact error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Encoding/decoding a fact value failed
    Codec,
    /// The backing store rejected the operation
    Store,
    /// I/O errors from file-backed stores
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Codec => "codec",
            ErrorKind::Store => "store",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fact error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct FactError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl FactError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn codec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Codec, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store, message)
    }
}

impl From<serde_json::Error> for FactError {
    fn from(err: serde_json::Error) -> Self {
        FactError::codec(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for FactError {
    fn from(err: std::io::Error) -> Self {
        FactError::new(ErrorKind::Io, format!("IO error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FactError>;
