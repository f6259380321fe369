//! dirtycheck-core - declared-effect consistency analyzer
//!
//! Verifies that each function's declared side-effect set (a `// dirty:`
//! annotation on the declaration) covers the union of effects of everything
//! it transitively calls.
//!
//! Feature-first layout:
//! - `shared/`   : driver-facing models (syntax tree, positions, diagnostics)
//! - `features/` : vertical slices (annotation language → effect analysis → registry)
//!
//! One pass analyzes one package, in strict phase order:
//! collect → seed side-channels → build call graph → propagate → check → export.
//! The pass is a pure function of its inputs; the driver owns file parsing,
//! fact persistence, and diagnostic printing.

/// Driver-facing models
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

pub use config::AnalyzerConfig;
pub use errors::{CoreError, Result};

// Primary entry point
pub use features::effect_analysis::application::{AnalysisPass, AnalysisReport};

// Domain re-exports for drivers and tests
pub use features::annotation::domain::{EffectExpr, EffectLabel, EffectResolver, EffectSet};
pub use shared::models::{
    Diagnostic, Expr, FuncDecl, ImportDecl, PackageTree, Position, Severity, SourceFile,
};
