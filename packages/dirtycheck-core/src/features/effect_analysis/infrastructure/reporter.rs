//! Verbose violation reports
//!
//! The compact diagnostic names the callee and its effects; the verbose
//! form adds what the caller declares, what is missing, how the effects
//! reached the callee through un-annotated intermediates, and a ready-made
//! annotation that would fix the caller.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::annotation::domain::EffectSet;
use crate::features::effect_analysis::domain::FunctionRecord;

/// One step in an effect propagation chain
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationStep {
    pub function: String,
    pub effects: Vec<String>,
    /// Where the effects came from: a caller's name, or `computed` for
    /// sets an un-annotated function accumulated itself
    pub source: String,
}

/// A fully described effect violation
#[derive(Debug, Clone)]
pub struct EffectViolation {
    pub caller: String,
    pub callee: String,
    pub caller_effects: Vec<String>,
    pub callee_effects: Vec<String>,
    pub missing: Vec<String>,
    pub propagation_path: Vec<PropagationStep>,
}

impl EffectViolation {
    /// Gather everything worth saying about `caller` calling `callee`
    pub fn describe(
        caller: &FunctionRecord<'_>,
        callee: &FunctionRecord<'_>,
        functions: &FxHashMap<String, FunctionRecord<'_>>,
    ) -> Self {
        let missing = callee.computed.difference(&caller.declared);
        let mut visited = FxHashSet::default();
        let propagation_path = build_propagation_path(&callee.name, functions, &mut visited);

        Self {
            caller: caller.name.clone(),
            callee: callee.name.clone(),
            caller_effects: caller.declared.to_sorted_vec(),
            callee_effects: callee.computed.to_sorted_vec(),
            missing: missing.to_sorted_vec(),
            propagation_path,
        }
    }

    /// Multi-line report, first line identical to the compact diagnostic
    pub fn format(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "function calls {} which has effects [{}] not declared in this function\n",
            self.callee,
            self.callee_effects.join(", ")
        ));

        out.push('\n');
        out.push_str(&format!("  Called function '{}' requires:\n", self.callee));
        for effect in &self.callee_effects {
            out.push_str(&format!("    - {}\n", effect));
        }

        out.push('\n');
        if self.caller_effects.is_empty() {
            out.push_str(&format!("  Function '{}' declares no effects\n", self.caller));
        } else {
            out.push_str(&format!("  Function '{}' declares:\n", self.caller));
            for effect in &self.caller_effects {
                out.push_str(&format!("    - {}\n", effect));
            }
        }

        out.push('\n');
        out.push_str("  Missing effects:\n");
        for effect in &self.missing {
            out.push_str(&format!("    - {}\n", effect));
        }

        if !self.propagation_path.is_empty() {
            out.push('\n');
            out.push_str("  Effect propagation path:\n");
            for (i, step) in self.propagation_path.iter().enumerate() {
                let indent = "  ".repeat(i + 2);
                if i == 0 {
                    out.push_str(&format!("{}{}\n", indent, step.function));
                } else {
                    out.push_str(&format!(
                        "{}└─ {} (from {})\n",
                        indent, step.function, step.source
                    ));
                }
                if !step.effects.is_empty() {
                    out.push_str(&format!(
                        "{}   effects: [{}]\n",
                        indent,
                        step.effects.join(", ")
                    ));
                }
            }
        }

        out.push('\n');
        out.push_str("  To fix, add the missing effects to the function declaration:\n");
        let mut fixed = EffectSet::from_labels(self.caller_effects.iter().cloned());
        fixed.add_all(&EffectSet::from_labels(self.missing.iter().cloned()));
        out.push_str(&format!("    // dirty: {}\n", fixed));

        out
    }
}

/// Trace how effects reach `name` through its callees, depth-first
///
/// Cycles are cut by the visited set, so mutually recursive functions
/// appear once.
pub fn build_propagation_path(
    name: &str,
    functions: &FxHashMap<String, FunctionRecord<'_>>,
    visited: &mut FxHashSet<String>,
) -> Vec<PropagationStep> {
    if !visited.insert(name.to_string()) {
        return Vec::new();
    }

    let Some(record) = functions.get(name) else {
        return Vec::new();
    };

    let mut step = PropagationStep {
        function: name.to_string(),
        effects: record.declared.to_sorted_vec(),
        source: String::new(),
    };
    if !record.has_declaration && !record.computed.is_empty() {
        step.effects = record.computed.to_sorted_vec();
        step.source = "computed".to_string();
    }

    let mut path = vec![step];

    for site in &record.call_sites {
        if !functions.contains_key(&site.callee) {
            continue;
        }
        let mut sub_path = build_propagation_path(&site.callee, functions, visited);
        if let Some(first) = sub_path.first_mut() {
            first.source = name.to_string();
        }
        path.extend(sub_path);
    }

    path
}
