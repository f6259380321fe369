//! Pass orchestration
//!
//! One pass analyzes one package. Phases run strictly in order (collect,
//! seed side-channels, build graph, cross-package resolve, propagate,
//! check, export) and nothing observes intermediate state. The pass is a
//! pure function of the tree, the configuration, the side-channel inputs,
//! and the fact store's contents; cancellation is the driver discarding
//! the result.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use dirtycheck_facts::{FactStore, FunctionEffectsFact, PackageEffectsFact};

use crate::config::AnalyzerConfig;
use crate::errors::Result;
use crate::features::annotation::domain::EffectSet;
use crate::features::effect_analysis::domain::{CallGraph, FunctionRecord};
use crate::features::effect_analysis::infrastructure::{
    build_call_graph, check_effects, collect_functions, propagate_effects,
    resolve_cross_package_calls, CrossPackageResolver,
};
use crate::features::registry::{discover_registry, ParsedEffects, QueryMap};
use crate::shared::models::{Diagnostic, PackageTree};

/// Result of one pass
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Function records that participated, synthetic leaves included
    pub functions_analyzed: usize,
}

/// One analysis pass over one package
pub struct AnalysisPass<'a> {
    tree: &'a PackageTree,
    config: AnalyzerConfig,
    query_map: QueryMap,
}

impl<'a> AnalysisPass<'a> {
    pub fn new(tree: &'a PackageTree, config: AnalyzerConfig) -> Self {
        Self {
            tree,
            config,
            query_map: QueryMap::new(),
        }
    }

    /// Attach generated-query metadata loaded by the driver
    pub fn with_query_map(mut self, query_map: QueryMap) -> Self {
        self.query_map = query_map;
        self
    }

    /// Run the pass; `facts` is the driver's store, if it provides one
    pub fn run(self, mut facts: Option<&mut dyn FactStore>) -> Result<AnalysisReport> {
        debug!(package = %self.tree.path, "analysis pass started");

        let registry = discover_registry(&self.config, self.tree);

        let mut functions = collect_functions(self.tree);
        seed_side_channels(&mut functions, &registry, &self.query_map, &self.tree.path);

        let mut graph = CallGraph::new();
        let pending = build_call_graph(self.tree, &mut functions, &mut graph);

        {
            let store = if self.config.disable_facts {
                None
            } else {
                facts.as_deref()
            };
            let resolver = CrossPackageResolver::new(store, &registry);
            resolve_cross_package_calls(pending, &resolver, &mut functions, &mut graph);
        }

        propagate_effects(&mut functions, &graph);

        let diagnostics = check_effects(&functions, self.config.verbose);

        if !self.config.disable_facts {
            if let Some(store) = facts.as_deref_mut() {
                export_facts(store, &functions, &self.tree.path)?;
            }
        }

        debug!(
            package = %self.tree.path,
            functions = functions.len(),
            diagnostics = diagnostics.len(),
            "analysis pass finished"
        );
        Ok(AnalysisReport {
            diagnostics,
            functions_analyzed: functions.len(),
        })
    }
}

/// Apply registry and query-map declarations to the record table
///
/// An entry becomes a declaration only where no source-level one exists;
/// otherwise it loses silently. Entries naming no collected function
/// materialize synthetic local leaves, unless the key is package-qualified
/// (contains `/`); those stay in the registry for cross-package lookups.
fn seed_side_channels(
    functions: &mut FxHashMap<String, FunctionRecord<'_>>,
    registry: &ParsedEffects,
    query_map: &QueryMap,
    package: &str,
) {
    for (key, expr) in registry {
        match expr.eval(None) {
            Ok(effects) => seed_one(functions, key, effects, package),
            Err(err) => {
                trace!(key = %key, error = %err, "skipping unevaluable registry entry");
            }
        }
    }

    for (key, effects) in query_map.effects() {
        seed_one(functions, key, effects, package);
    }
}

fn seed_one(
    functions: &mut FxHashMap<String, FunctionRecord<'_>>,
    key: &str,
    effects: EffectSet,
    package: &str,
) {
    match functions.get_mut(key) {
        Some(record) if record.has_declaration => {
            trace!(key, "source declaration wins over side-channel entry");
        }
        Some(record) => {
            record.set_declared(effects);
        }
        None if !key.contains('/') => {
            functions.insert(
                key.to_string(),
                FunctionRecord::synthetic(package, key.to_string(), effects),
            );
        }
        None => {} // qualified entry, resolved on demand at call sites
    }
}

/// Publish the package fact plus per-function object facts
fn export_facts(
    store: &mut dyn FactStore,
    functions: &FxHashMap<String, FunctionRecord<'_>>,
    package: &str,
) -> Result<()> {
    let mut package_fact = PackageEffectsFact::new();

    let mut keys: Vec<&String> = functions.keys().collect();
    keys.sort();

    for key in keys {
        let record = &functions[key];
        if record.package != package || record.computed.is_empty() {
            continue;
        }

        package_fact.insert(key.clone(), record.computed.to_sorted_vec());

        // Object facts only for symbols that exist in source
        if record.decl.is_some() {
            store.export_object_fact(
                &record.qualified_name,
                FunctionEffectsFact::new(record.computed.to_sorted_vec()),
            )?;
        }
    }

    if !package_fact.is_empty() {
        let count = package_fact.len();
        store.export_package_fact(package, package_fact)?;
        debug!(package, functions = count, "exported package effects fact");
    }
    Ok(())
}
