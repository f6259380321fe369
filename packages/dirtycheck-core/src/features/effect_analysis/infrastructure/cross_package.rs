//! Cross-package resolver
//!
//! Looks up effects for calls into imported packages. Priority:
//!
//! 1. object fact attached to the fully qualified callee symbol
//! 2. the imported package-level fact, keyed by base or method key
//! 3. the external registry, under `pkg-path.name` then bare `name`
//!
//! A successful lookup materializes a synthetic leaf record keyed by the
//! fully qualified name; the call site then participates in propagation
//! and checking like any local call. A failed lookup drops the call edge,
//! deterministically and silently.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use dirtycheck_facts::FactStore;

use crate::features::annotation::domain::EffectSet;
use crate::features::effect_analysis::domain::{CallGraph, CallSite, FunctionRecord};
use crate::features::registry::ParsedEffects;

use super::PendingCrossCall;

/// Resolver over the fact store and the parsed registry
pub struct CrossPackageResolver<'r> {
    store: Option<&'r dyn FactStore>,
    registry: &'r ParsedEffects,
}

impl<'r> CrossPackageResolver<'r> {
    pub fn new(store: Option<&'r dyn FactStore>, registry: &'r ParsedEffects) -> Self {
        Self { store, registry }
    }

    /// Resolve the effects of `package_path.name`, if any source knows it
    pub fn resolve(&self, package_path: &str, name: &str) -> Option<EffectSet> {
        let qualified = format!("{}.{}", package_path, name);

        if let Some(store) = self.store {
            match store.import_object_fact(&qualified) {
                Ok(Some(fact)) => {
                    trace!(symbol = %qualified, "resolved via object fact");
                    return Some(EffectSet::from_labels(fact.effects));
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(symbol = %qualified, error = %err, "object fact import failed");
                }
            }

            match store.import_package_fact(package_path) {
                Ok(Some(fact)) => {
                    if let Some(effects) = lookup_in_package_fact(&fact, name) {
                        trace!(symbol = %qualified, "resolved via package fact");
                        return Some(effects);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(package = package_path, error = %err, "package fact import failed");
                }
            }
        }

        for key in [qualified.as_str(), name] {
            if let Some(expr) = self.registry.get(key) {
                if let Ok(effects) = expr.eval(None) {
                    trace!(symbol = %qualified, key, "resolved via registry");
                    return Some(effects);
                }
            }
        }

        None
    }
}

/// Package-fact lookup: the bare key first, then the unique method key
/// `(Receiver).name` when no bare entry exists
fn lookup_in_package_fact(
    fact: &dirtycheck_facts::PackageEffectsFact,
    name: &str,
) -> Option<EffectSet> {
    if let Some(effects) = fact.get(name) {
        return Some(EffectSet::from_labels(effects.iter().cloned()));
    }

    let suffix = format!(").{}", name);
    let mut matches = fact
        .function_effects
        .iter()
        .filter(|(key, _)| key.starts_with('(') && key.ends_with(&suffix));
    let (_, effects) = matches.next()?;
    if matches.next().is_some() {
        return None; // ambiguous across receivers
    }
    Some(EffectSet::from_labels(effects.iter().cloned()))
}

/// Materialize records and call sites for resolvable cross-package calls
pub fn resolve_cross_package_calls<'a>(
    pending: Vec<PendingCrossCall>,
    resolver: &CrossPackageResolver<'_>,
    functions: &mut FxHashMap<String, FunctionRecord<'a>>,
    graph: &mut CallGraph,
) {
    let mut resolved_count = 0usize;

    for call in pending {
        let Some(effects) = resolver.resolve(&call.package_path, &call.name) else {
            continue; // callee unknown everywhere: the edge is dropped
        };

        let qualified = format!("{}.{}", call.package_path, call.name);
        functions.entry(qualified.clone()).or_insert_with(|| {
            FunctionRecord::synthetic(&call.package_path, qualified.clone(), effects)
        });

        if let Some(caller) = functions.get_mut(&call.caller) {
            caller
                .call_sites
                .push(CallSite::new(&qualified, call.position.clone()));
        }
        graph.add_call(&call.caller, &qualified, call.position);
        resolved_count += 1;
    }

    debug!(resolved = resolved_count, "resolved cross-package calls");
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirtycheck_facts::{FunctionEffectsFact, MemoryFactStore, PackageEffectsFact};

    use crate::features::annotation::infrastructure::parse_payload;
    use crate::shared::models::Position;

    fn registry_with(entries: &[(&str, &str)]) -> ParsedEffects {
        entries
            .iter()
            .map(|(k, payload)| (k.to_string(), parse_payload(payload).unwrap()))
            .collect()
    }

    #[test]
    fn test_object_fact_takes_priority() {
        let mut store = MemoryFactStore::new();
        store
            .export_object_fact(
                "example.com/db.GetUser",
                FunctionEffectsFact::new(vec!["select[users]".to_string()]),
            )
            .unwrap();

        let registry = registry_with(&[("example.com/db.GetUser", "{ network[wrong] }")]);
        let resolver = CrossPackageResolver::new(Some(&store), &registry);

        let effects = resolver.resolve("example.com/db", "GetUser").unwrap();
        assert_eq!(effects.to_sorted_vec(), vec!["select[users]"]);
    }

    #[test]
    fn test_package_fact_second() {
        let mut store = MemoryFactStore::new();
        let mut fact = PackageEffectsFact::new();
        fact.insert("GetUser", vec!["select[users]".to_string()]);
        store.export_package_fact("example.com/db", fact).unwrap();

        let registry = ParsedEffects::new();
        let resolver = CrossPackageResolver::new(Some(&store), &registry);

        let effects = resolver.resolve("example.com/db", "GetUser").unwrap();
        assert_eq!(effects.to_sorted_vec(), vec!["select[users]"]);
    }

    #[test]
    fn test_package_fact_method_key_fallback() {
        let mut store = MemoryFactStore::new();
        let mut fact = PackageEffectsFact::new();
        fact.insert("(Queries).CreateUser", vec!["insert[users]".to_string()]);
        store.export_package_fact("example.com/db", fact).unwrap();

        let registry = ParsedEffects::new();
        let resolver = CrossPackageResolver::new(Some(&store), &registry);

        let effects = resolver.resolve("example.com/db", "CreateUser").unwrap();
        assert_eq!(effects.to_sorted_vec(), vec!["insert[users]"]);
    }

    #[test]
    fn test_registry_fallback_qualified_then_bare() {
        let registry = registry_with(&[("CallExternalAPI", "{ network[external_api] }")]);
        let resolver = CrossPackageResolver::new(None, &registry);

        let effects = resolver.resolve("example.com/api", "CallExternalAPI").unwrap();
        assert_eq!(effects.to_sorted_vec(), vec!["network[external_api]"]);
    }

    #[test]
    fn test_unresolvable_returns_none() {
        let registry = ParsedEffects::new();
        let resolver = CrossPackageResolver::new(None, &registry);
        assert!(resolver.resolve("example.com/db", "Unknown").is_none());
    }

    #[test]
    fn test_materialization_creates_leaf_and_site() {
        let mut store = MemoryFactStore::new();
        let mut fact = PackageEffectsFact::new();
        fact.insert("GetUser", vec!["select[users]".to_string()]);
        store.export_package_fact("example.com/db", fact).unwrap();

        let registry = ParsedEffects::new();
        let resolver = CrossPackageResolver::new(Some(&store), &registry);

        let mut functions = FxHashMap::default();
        functions.insert(
            "F".to_string(),
            FunctionRecord::synthetic("p", "F".to_string(), EffectSet::new()),
        );
        let mut graph = CallGraph::new();

        let pending = vec![PendingCrossCall {
            caller: "F".to_string(),
            package_path: "example.com/db".to_string(),
            name: "GetUser".to_string(),
            position: Position::new("pkg/lib.src", 3, 1),
        }];
        resolve_cross_package_calls(pending, &resolver, &mut functions, &mut graph);

        let leaf = &functions["example.com/db.GetUser"];
        assert!(leaf.has_declaration);
        assert_eq!(leaf.computed.to_sorted_vec(), vec!["select[users]"]);

        assert_eq!(functions["F"].call_sites[0].callee, "example.com/db.GetUser");
        assert_eq!(graph.callers_of("example.com/db.GetUser"), &["F".to_string()]);
    }

    #[test]
    fn test_unresolvable_call_drops_silently() {
        let registry = ParsedEffects::new();
        let resolver = CrossPackageResolver::new(None, &registry);

        let mut functions = FxHashMap::default();
        functions.insert(
            "F".to_string(),
            FunctionRecord::synthetic("p", "F".to_string(), EffectSet::new()),
        );
        let mut graph = CallGraph::new();

        let pending = vec![PendingCrossCall {
            caller: "F".to_string(),
            package_path: "example.com/db".to_string(),
            name: "Unknown".to_string(),
            position: Position::new("pkg/lib.src", 3, 1),
        }];
        resolve_cross_package_calls(pending, &resolver, &mut functions, &mut graph);

        assert_eq!(functions.len(), 1);
        assert!(functions["F"].call_sites.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
