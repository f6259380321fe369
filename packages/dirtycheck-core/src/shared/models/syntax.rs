//! Neutral syntax tree for one package
//!
//! Deliberately minimal: the analyzer only needs declarations, doc
//! comments, imports, and call expressions. Anything the source language
//! has beyond that is the driver's problem to flatten away.

use serde::{Deserialize, Serialize};

use super::Position;

/// The parsed syntax of one package, as supplied by the driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageTree {
    /// Resolved package path, e.g. `example.com/service/user`
    pub path: String,
    pub files: Vec<SourceFile>,
}

impl PackageTree {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            files: Vec::new(),
        }
    }

    /// Directory of the package's first source file, used for registry
    /// discovery. `None` for an empty package.
    pub fn package_dir(&self) -> Option<&str> {
        let first = self.files.first()?;
        match first.path.rfind('/') {
            Some(idx) => Some(&first.path[..idx]),
            None => Some(""),
        }
    }

    /// All function declarations across the package's files
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.files.iter().flat_map(|f| f.functions.iter())
    }
}

/// One source file: imports plus top-level function declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub imports: Vec<ImportDecl>,
    pub functions: Vec<FuncDecl>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            imports: Vec::new(),
            functions: Vec::new(),
        }
    }
}

/// An import declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Explicit rename, if the source used one
    pub alias: Option<String>,
    /// Import path, e.g. `example.com/db`
    pub path: String,
}

impl ImportDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    pub fn with_alias(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }

    /// The name this import binds in the file: the explicit rename when
    /// present, otherwise the trailing path component.
    pub fn effective_alias(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// A function or method declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    /// `None` for anonymous functions, which the collector skips
    pub name: Option<String>,
    /// Receiver type name for methods
    pub receiver: Option<String>,
    /// Leading documentation-comment lines, verbatim
    pub doc: Vec<String>,
    /// Statement-level expressions of the body
    pub body: Vec<Expr>,
    pub position: Position,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Record key: base name for functions, `(Receiver).name` for methods
    pub fn key(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        match &self.receiver {
            Some(recv) => Some(format!("({}).{}", recv, name)),
            None => Some(name.to_string()),
        }
    }
}

/// Expressions, reduced to the shapes call extraction needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A bare identifier
    Ident { name: String, position: Position },
    /// Field or method selection: `base.name`
    Selector {
        base: Box<Expr>,
        name: String,
        position: Position,
    },
    /// A call expression
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        position: Position,
    },
}

impl Expr {
    pub fn position(&self) -> &Position {
        match self {
            Expr::Ident { position, .. }
            | Expr::Selector { position, .. }
            | Expr::Call { position, .. } => position,
        }
    }

    /// Visit every call expression in this subtree, preorder
    pub fn walk_calls<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        match self {
            Expr::Call { callee, args, .. } => {
                visit(self);
                callee.walk_calls(visit);
                for arg in args {
                    arg.walk_calls(visit);
                }
            }
            Expr::Selector { base, .. } => base.walk_calls(visit),
            Expr::Ident { .. } => {}
        }
    }
}
