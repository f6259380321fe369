//! Error types for dirtycheck-core
//!
//! Recoverable conditions (malformed annotations, unreadable registries,
//! missing facts) degrade to "no information" at their call sites; the
//! variants here surface only where the pass genuinely cannot continue.

use thiserror::Error;

use crate::features::annotation::domain::EvalError;
use crate::features::annotation::infrastructure::ParseError;

/// Main error type for dirtycheck-core operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Annotation parse error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Effect expression evaluation error
    #[error("eval error: {0}")]
    Eval(#[from] EvalError),

    /// Registry load error
    #[error("registry error: {0}")]
    Registry(String),

    /// Fact store error
    #[error("fact error: {0}")]
    Facts(#[from] dirtycheck_facts::FactError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreError {
    pub fn registry(msg: impl Into<String>) -> Self {
        CoreError::Registry(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CoreError::Config(msg.into())
    }
}

/// Result type alias for dirtycheck-core operations
pub type Result<T> = std::result::Result<T, CoreError>;
