//! Call-graph builder
//!
//! Scans function bodies for call sites whose callee is statically
//! nameable:
//!
//! - `Ident(name)` → local function `name`
//! - `Selector(X, m)` where `X` is an import alias → cross-package call,
//!   resolved later against facts and the registry
//! - `Selector(X, m)` for any other `X` → loose local method fallback: the
//!   bare function `m` if one exists, else the unique method named `m` in
//!   the package, else the call is dropped
//!
//! Any other callee shape (computed callees, call results) is ignored.
//! Dropping is silent: absence of information is not a diagnostic.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::features::effect_analysis::domain::{CallGraph, CallSite, FunctionRecord};
use crate::shared::models::{Expr, PackageTree, Position};

/// A call into an imported package, awaiting cross-package resolution
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCrossCall {
    /// Record key of the caller
    pub caller: String,
    /// Import path of the callee's package
    pub package_path: String,
    /// Bare callee name after the selector
    pub name: String,
    pub position: Position,
}

enum CalleeKey {
    Local(String),
    LooseMethod(String),
    CrossPackage { package_path: String, name: String },
}

/// Build intra-package edges and gather cross-package calls
///
/// Local and loose-method calls become call sites and graph edges
/// immediately; calls through import aliases are returned for the
/// cross-package resolver.
pub fn build_call_graph<'a>(
    tree: &'a PackageTree,
    functions: &mut FxHashMap<String, FunctionRecord<'a>>,
    graph: &mut CallGraph,
) -> Vec<PendingCrossCall> {
    let mut pending = Vec::new();

    // Read-only scan first; call sites are applied afterwards so the
    // record table is not borrowed while being extended.
    let mut observed: Vec<(String, CalleeKey, Position)> = Vec::new();

    for file in &tree.files {
        let aliases: FxHashMap<&str, &str> = file
            .imports
            .iter()
            .map(|imp| (imp.effective_alias(), imp.path.as_str()))
            .collect();

        for decl in &file.functions {
            let Some(caller) = decl.key() else { continue };
            // Shadowed duplicate declarations are not scanned: only the
            // body the record actually holds contributes call sites.
            let is_current = functions
                .get(&caller)
                .and_then(|r| r.decl)
                .map(|d| std::ptr::eq(d, decl))
                .unwrap_or(false);
            if !is_current {
                continue;
            }

            for stmt in &decl.body {
                stmt.walk_calls(&mut |call| {
                    if let Expr::Call { callee, position, .. } = call {
                        if let Some(key) = classify_callee(callee, &aliases) {
                            observed.push((caller.clone(), key, position.clone()));
                        }
                    }
                });
            }
        }
    }

    let method_index = index_methods(functions);

    for (caller, key, position) in observed {
        match key {
            CalleeKey::Local(name) => {
                if functions.contains_key(&name) {
                    add_call_site(functions, graph, &caller, &name, position);
                }
            }
            CalleeKey::LooseMethod(name) => {
                if functions.contains_key(&name) {
                    add_call_site(functions, graph, &caller, &name, position);
                } else if let Some(Some(method_key)) = method_index.get(name.as_str()) {
                    let method_key = method_key.clone();
                    add_call_site(functions, graph, &caller, &method_key, position);
                }
                // Ambiguous or unknown method names drop here.
            }
            CalleeKey::CrossPackage { package_path, name } => {
                pending.push(PendingCrossCall {
                    caller,
                    package_path,
                    name,
                    position,
                });
            }
        }
    }

    debug!(
        package = %tree.path,
        edges = graph.edge_count(),
        cross_package = pending.len(),
        "built call graph"
    );
    pending
}

fn classify_callee(callee: &Expr, aliases: &FxHashMap<&str, &str>) -> Option<CalleeKey> {
    match callee {
        Expr::Ident { name, .. } => Some(CalleeKey::Local(name.clone())),
        Expr::Selector { base, name, .. } => {
            if let Expr::Ident { name: base_name, .. } = base.as_ref() {
                if let Some(path) = aliases.get(base_name.as_str()) {
                    return Some(CalleeKey::CrossPackage {
                        package_path: (*path).to_string(),
                        name: name.clone(),
                    });
                }
            }
            Some(CalleeKey::LooseMethod(name.clone()))
        }
        Expr::Call { .. } => None,
    }
}

/// Map each method base name to its unique `(Receiver).name` key, or
/// `None` when several receivers define the name
fn index_methods(
    functions: &FxHashMap<String, FunctionRecord<'_>>,
) -> FxHashMap<String, Option<String>> {
    let mut index: FxHashMap<String, Option<String>> = FxHashMap::default();
    for key in functions.keys() {
        if let Some(base) = method_base_name(key) {
            index
                .entry(base.to_string())
                .and_modify(|existing| *existing = None)
                .or_insert_with(|| Some(key.clone()));
        }
    }
    index
}

fn method_base_name(key: &str) -> Option<&str> {
    if !key.starts_with('(') {
        return None;
    }
    key.split(").").nth(1)
}

fn add_call_site(
    functions: &mut FxHashMap<String, FunctionRecord<'_>>,
    graph: &mut CallGraph,
    caller: &str,
    callee: &str,
    position: Position,
) {
    if let Some(record) = functions.get_mut(caller) {
        record.call_sites.push(CallSite::new(callee, position.clone()));
    }
    graph.add_call(caller, callee, position);
}
