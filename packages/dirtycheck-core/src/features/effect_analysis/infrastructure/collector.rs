//! Function collector
//!
//! Walks one package's syntax tree and produces the initial record table.
//! Only the first recognizable annotation line in a doc group is consumed;
//! later ones are ignored. Anonymous functions are skipped. A malformed
//! annotation leaves the function with an empty declared set (the lenient
//! parse entry handles the degradation) and never aborts the pass.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::features::annotation::infrastructure::parse_annotation;
use crate::features::effect_analysis::domain::FunctionRecord;
use crate::shared::models::PackageTree;

/// Collect every named function and method declared in the package
pub fn collect_functions(tree: &PackageTree) -> FxHashMap<String, FunctionRecord<'_>> {
    let mut functions = FxHashMap::default();

    for decl in tree.functions() {
        let Some(key) = decl.key() else {
            continue; // anonymous
        };

        let mut record = FunctionRecord::from_decl(&tree.path, key.clone(), decl);

        for line in &decl.doc {
            if let Some(effects) = parse_annotation(line) {
                record.set_declared(effects);
                break;
            }
        }

        functions.insert(key, record);
    }

    debug!(
        package = %tree.path,
        functions = functions.len(),
        "collected function declarations"
    );
    functions
}
