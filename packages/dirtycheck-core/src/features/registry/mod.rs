/// Side-channel Effect Inputs
///
/// Effects for functions that cannot carry an annotation in source:
/// auto-generated code, vendored code, functions whose package is compiled
/// without analysis.
///
/// - **loader**: the keyed `effect-registry.json` document (version-gated)
/// - **query_map**: generated-query metadata (`name → [{operation, table}]`)
///   converted into `operation[table]` labels
///
/// Both feed the same seeding rule: a side-channel entry becomes a
/// declaration only for functions without a source-level one; source
/// always wins silently.
mod loader;
mod query_map;

pub use loader::{discover_registry, EffectRegistry, ParsedEffects, REGISTRY_VERSION};
pub use query_map::{QueryMap, QueryOperation};
