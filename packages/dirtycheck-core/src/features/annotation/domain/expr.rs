//! Effect expression tree
//!
//! A closed family of three node kinds. Evaluation folds the tree into an
//! `EffectSet`; references resolve through the `EffectResolver` port, and
//! the core always evaluates with no resolver (any reference is an error).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{EffectLabel, EffectSet};

/// Evaluation error for effect expressions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A named reference was used but no resolver can supply its value
    #[error("cannot resolve effect reference '{0}': no resolver provided")]
    UnresolvedReference(String),

    /// The resolver was consulted and failed
    #[error("effect reference '{name}' failed to resolve: {message}")]
    ResolveFailed { name: String, message: String },
}

/// Port for resolving named effect sets
///
/// Reserved for the named-effect-set extension; the analyzer itself always
/// passes `None` where a resolver is accepted.
pub trait EffectResolver {
    fn resolve(&self, name: &str) -> Result<EffectSet, EvalError>;
}

/// An effect expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectExpr {
    /// A single effect label, e.g. `select[users]`
    Label(EffectLabel),
    /// A literal set / union of sub-expressions, e.g. `{ a | b }`
    Union(Vec<EffectExpr>),
    /// A bare identifier naming an effect set defined elsewhere
    Reference(String),
}

impl EffectExpr {
    /// The empty set literal `{ }`
    pub fn empty() -> Self {
        EffectExpr::Union(Vec::new())
    }

    /// Evaluate to a set of printed label forms
    pub fn eval(&self, resolver: Option<&dyn EffectResolver>) -> Result<EffectSet, EvalError> {
        match self {
            EffectExpr::Label(label) => {
                let mut set = EffectSet::new();
                set.add_label(label);
                Ok(set)
            }
            EffectExpr::Union(elements) => {
                let mut result = EffectSet::new();
                for elem in elements {
                    result.add_all(&elem.eval(resolver)?);
                }
                Ok(result)
            }
            EffectExpr::Reference(name) => match resolver {
                Some(resolver) => resolver.resolve(name),
                None => Err(EvalError::UnresolvedReference(name.clone())),
            },
        }
    }
}

impl fmt::Display for EffectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectExpr::Label(label) => write!(f, "{}", label),
            EffectExpr::Union(elements) => {
                if elements.is_empty() {
                    return write!(f, "{{ }}");
                }
                let parts: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "{{ {} }}", parts.join(" | "))
            }
            EffectExpr::Reference(name) => write!(f, "{}", name),
        }
    }
}
