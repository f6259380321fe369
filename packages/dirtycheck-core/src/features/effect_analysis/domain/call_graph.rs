//! Call graph
//!
//! Forward map (caller → call sites) drives propagation reads; the reverse
//! map (callee → callers) drives worklist re-scheduling when a callee's
//! computed set grows.

use rustc_hash::FxHashMap;

use super::CallSite;
use crate::shared::models::Position;

/// Forward and reverse call relationships, keyed by record key
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    /// `calls[a] = [b, c]` means `a` calls `b` and `c`
    calls: FxHashMap<String, Vec<CallSite>>,
    /// `called_by[b] = [a]` means `b` is called by `a`; deduplicated
    called_by: FxHashMap<String, Vec<String>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `caller` calls `callee` at `position`
    pub fn add_call(&mut self, caller: &str, callee: &str, position: Position) {
        self.calls
            .entry(caller.to_string())
            .or_default()
            .push(CallSite::new(callee, position));

        let callers = self.called_by.entry(callee.to_string()).or_default();
        if !callers.iter().any(|c| c == caller) {
            callers.push(caller.to_string());
        }
    }

    pub fn calls_of(&self, caller: &str) -> &[CallSite] {
        self.calls.get(caller).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn callers_of(&self, callee: &str) -> &[String] {
        self.called_by.get(callee).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of forward edges
    pub fn edge_count(&self) -> usize {
        self.calls.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32) -> Position {
        Position::new("test.src", line, 1)
    }

    #[test]
    fn test_forward_and_reverse() {
        let mut graph = CallGraph::new();
        graph.add_call("A", "B", pos(1));
        graph.add_call("A", "C", pos(2));
        graph.add_call("B", "C", pos(3));

        assert_eq!(graph.calls_of("A").len(), 2);
        assert_eq!(graph.calls_of("B").len(), 1);
        assert!(graph.calls_of("C").is_empty());

        assert_eq!(graph.callers_of("C"), &["A".to_string(), "B".to_string()]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_reverse_map_deduplicates_callers() {
        let mut graph = CallGraph::new();
        graph.add_call("A", "B", pos(1));
        graph.add_call("A", "B", pos(5));

        // Two call sites, one reverse entry
        assert_eq!(graph.calls_of("A").len(), 2);
        assert_eq!(graph.callers_of("B"), &["A".to_string()]);
    }

    #[test]
    fn test_self_recursion_edge() {
        let mut graph = CallGraph::new();
        graph.add_call("A", "A", pos(1));
        assert_eq!(graph.callers_of("A"), &["A".to_string()]);
    }
}
