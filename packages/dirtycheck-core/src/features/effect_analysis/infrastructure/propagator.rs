//! Fixpoint effect propagation
//!
//! Standard worklist: when a function's computed set grows, every caller
//! is rescheduled. Sets are bounded by the labels ever introduced and only
//! grow, so the fixpoint is reached in finitely many requeues. Cycles
//! converge with identical sets across each strongly connected component,
//! and the result is independent of processing order.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::features::effect_analysis::domain::{CallGraph, FunctionRecord};

/// Propagate callee effects into callers until nothing changes
pub fn propagate_effects(functions: &mut FxHashMap<String, FunctionRecord<'_>>, graph: &CallGraph) {
    // Seed deterministically; the fixpoint does not depend on it, but a
    // stable schedule keeps traces reproducible.
    let mut worklist: Vec<String> = functions.keys().cloned().collect();
    worklist.sort();
    let mut queued: FxHashSet<String> = worklist.iter().cloned().collect();

    let mut steps = 0usize;

    while let Some(name) = worklist.pop() {
        queued.remove(&name);
        steps += 1;

        let Some(record) = functions.get(&name) else {
            continue;
        };

        let mut merged = record.computed.clone();
        for site in &record.call_sites {
            if let Some(callee) = functions.get(&site.callee) {
                merged.add_all(&callee.computed);
            }
        }

        let record = match functions.get_mut(&name) {
            Some(record) if record.computed != merged => record,
            _ => continue,
        };
        record.computed = merged;

        for caller in graph.callers_of(&name) {
            if queued.insert(caller.clone()) {
                worklist.push(caller.clone());
            }
        }
    }

    debug!(steps, functions = functions.len(), "effect propagation reached fixpoint");
}
