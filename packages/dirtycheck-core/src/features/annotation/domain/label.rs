//! Effect labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// One opaque effect label, canonically printed `op[target]` or `op`
///
/// Labels are compared and ordered by printed form everywhere; two labels
/// are the same effect iff they print the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectLabel {
    /// e.g. `select`, `insert`, `network`
    pub operation: String,
    /// e.g. `users`, `smtp`; absent in the degenerate form
    pub target: Option<String>,
}

impl EffectLabel {
    pub fn new(operation: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            target: Some(target.into()),
        }
    }

    /// A label with no target, e.g. `transform`
    pub fn bare(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            target: None,
        }
    }
}

impl fmt::Display for EffectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}[{}]", self.operation, target),
            None => write!(f, "{}", self.operation),
        }
    }
}
