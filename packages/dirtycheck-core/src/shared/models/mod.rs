//! Driver-facing models
//!
//! The host driver parses the source language and hands the analyzer a
//! neutral syntax tree (`PackageTree`); the analyzer hands back
//! `Diagnostic` values. Both sides derive serde so trees and findings can
//! cross a process boundary.

mod diagnostic;
mod span;
mod syntax;

pub use diagnostic::{Diagnostic, Severity};
pub use span::Position;
pub use syntax::{Expr, FuncDecl, ImportDecl, PackageTree, SourceFile};
