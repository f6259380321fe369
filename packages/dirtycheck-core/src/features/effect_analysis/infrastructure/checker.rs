//! Effect checker
//!
//! For every annotated function, each call site whose callee's computed
//! set escapes the caller's declared set produces exactly one diagnostic.
//! Un-annotated functions are never reported themselves; their computed
//! sets flow upward and surface in annotated callers.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::features::effect_analysis::domain::FunctionRecord;
use crate::shared::models::Diagnostic;

use super::reporter::EffectViolation;

/// Check declared effects against computed callee effects
///
/// Diagnostics come back in deterministic order: callers sorted by record
/// key, call sites in body order.
pub fn check_effects(
    functions: &FxHashMap<String, FunctionRecord<'_>>,
    verbose: bool,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut callers: Vec<&String> = functions.keys().collect();
    callers.sort();

    for caller_key in callers {
        let caller = &functions[caller_key];
        if !caller.has_declaration {
            continue;
        }

        for site in &caller.call_sites {
            let Some(callee) = functions.get(&site.callee) else {
                continue;
            };

            if callee.computed.is_subset_of(&caller.declared) {
                continue;
            }

            let message = if verbose {
                EffectViolation::describe(caller, callee, functions).format()
            } else {
                format!(
                    "function calls {} which has effects [{}] not declared in this function",
                    site.callee,
                    callee.computed.join(", ")
                )
            };
            diagnostics.push(Diagnostic::warning(site.position.clone(), message));
        }
    }

    debug!(diagnostics = diagnostics.len(), "effect check complete");
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::annotation::domain::EffectSet;
    use crate::features::effect_analysis::domain::CallSite;
    use crate::shared::models::Position;

    fn record(name: &str, declared: &[&str], computed: &[&str], annotated: bool) -> FunctionRecord<'static> {
        let mut r = FunctionRecord::synthetic(
            "p",
            name.to_string(),
            EffectSet::from_labels(declared.iter().copied()),
        );
        r.computed = EffectSet::from_labels(computed.iter().copied());
        r.has_declaration = annotated;
        r
    }

    fn with_call(mut r: FunctionRecord<'static>, callee: &str, line: u32) -> FunctionRecord<'static> {
        r.call_sites
            .push(CallSite::new(callee, Position::new("t.src", line, 1)));
        r
    }

    fn table(records: Vec<FunctionRecord<'static>>) -> FxHashMap<String, FunctionRecord<'static>> {
        records.into_iter().map(|r| (r.name.clone(), r)).collect()
    }

    #[test]
    fn test_covered_effects_pass() {
        let functions = table(vec![
            record("GetUser", &["select[user]"], &["select[user]"], true),
            with_call(
                record(
                    "Process",
                    &["insert[log]", "select[user]"],
                    &["insert[log]", "select[user]"],
                    true,
                ),
                "GetUser",
                10,
            ),
        ]);

        assert!(check_effects(&functions, false).is_empty());
    }

    #[test]
    fn test_missing_effect_reports_once_per_site() {
        let functions = table(vec![
            record("GetUser", &["select[user]"], &["select[user]"], true),
            with_call(
                record("Broken", &["insert[log]"], &["insert[log]", "select[user]"], true),
                "GetUser",
                12,
            ),
        ]);

        let diagnostics = check_effects(&functions, false);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position.line, 12);
        assert_eq!(
            diagnostics[0].message,
            "function calls GetUser which has effects [select[user]] not declared in this function"
        );
    }

    #[test]
    fn test_unannotated_caller_never_reported() {
        let functions = table(vec![
            record("GetUser", &["select[user]"], &["select[user]"], true),
            with_call(
                record("Helper", &[], &["select[user]"], false),
                "GetUser",
                3,
            ),
        ]);

        assert!(check_effects(&functions, false).is_empty());
    }

    #[test]
    fn test_unknown_callee_skipped() {
        let functions = table(vec![with_call(
            record("F", &[], &[], true),
            "Vanished",
            4,
        )]);

        assert!(check_effects(&functions, false).is_empty());
    }

    #[test]
    fn test_deterministic_order() {
        let functions = table(vec![
            record("Sink", &["x[y]"], &["x[y]"], true),
            with_call(record("B", &[], &["x[y]"], true), "Sink", 2),
            with_call(record("A", &[], &["x[y]"], true), "Sink", 9),
        ]);

        let diagnostics = check_effects(&functions, false);
        // Sorted by caller key: A's site first despite the later line
        assert_eq!(diagnostics[0].position.line, 9);
        assert_eq!(diagnostics[1].position.line, 2);
    }

    #[test]
    fn test_verbose_message_contains_fix() {
        let functions = table(vec![
            record("GetUser", &["select[user]"], &["select[user]"], true),
            with_call(
                record("Broken", &["insert[log]"], &["insert[log]", "select[user]"], true),
                "GetUser",
                12,
            ),
        ]);

        let diagnostics = check_effects(&functions, true);
        let message = &diagnostics[0].message;
        assert!(message.contains("Missing effects:"));
        assert!(message.contains("// dirty: { insert[log] | select[user] }"));
    }
}
