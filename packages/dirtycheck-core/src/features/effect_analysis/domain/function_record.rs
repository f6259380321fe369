//! Function records
//!
//! One record per discovered function, alive for a single pass. Records
//! reference their callees by string key only, so cyclic call graphs need
//! no cyclic ownership.

use crate::features::annotation::domain::EffectSet;
use crate::shared::models::{FuncDecl, Position};

/// One function call observed in a body
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    /// Record key of the callee (base name, method key, or qualified name)
    pub callee: String,
    pub position: Position,
}

impl CallSite {
    pub fn new(callee: impl Into<String>, position: Position) -> Self {
        Self {
            callee: callee.into(),
            position,
        }
    }
}

/// Everything the analysis knows about one function
///
/// `declared` is the floor of `computed`: the annotated set is copied into
/// `computed` up front and propagation only ever grows it, so annotations
/// can widen a function's effects but never narrow them.
#[derive(Debug, Clone)]
pub struct FunctionRecord<'a> {
    /// Record key within the pass (base name or `(Receiver).method` for
    /// local functions, fully qualified name for imported ones)
    pub name: String,
    /// `package-path + "." + key`
    pub qualified_name: String,
    /// Defining package path
    pub package: String,
    /// Effects from the annotation; empty when `has_declaration` is false
    pub declared: EffectSet,
    /// Declared effects plus everything propagated from callees
    pub computed: EffectSet,
    /// Whether an annotation (or side-channel declaration) exists
    pub has_declaration: bool,
    /// Calls observed in this function's body
    pub call_sites: Vec<CallSite>,
    /// The parsed declaration, absent for synthetic records
    pub decl: Option<&'a FuncDecl>,
}

impl<'a> FunctionRecord<'a> {
    /// Record for a declaration found in the package's source
    pub fn from_decl(package: &str, key: String, decl: &'a FuncDecl) -> Self {
        Self {
            qualified_name: format!("{}.{}", package, key),
            name: key,
            package: package.to_string(),
            declared: EffectSet::new(),
            computed: EffectSet::new(),
            has_declaration: false,
            call_sites: Vec::new(),
            decl: Some(decl),
        }
    }

    /// Leaf record for a function known only through facts, the registry,
    /// or the query map
    pub fn synthetic(package: &str, key: String, effects: EffectSet) -> Self {
        Self {
            qualified_name: if key.contains(&format!("{}.", package)) || package.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", package, key)
            },
            name: key,
            package: package.to_string(),
            declared: effects.clone(),
            computed: effects,
            has_declaration: true,
            call_sites: Vec::new(),
            decl: None,
        }
    }

    /// Install a declared effect set, initializing `computed` to match
    pub fn set_declared(&mut self, effects: EffectSet) {
        self.declared = effects.clone();
        self.computed = effects;
        self.has_declaration = true;
    }
}
