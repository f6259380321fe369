//! Effect set model
//!
//! An unordered set of effect labels keyed by printed form. Iteration and
//! serialization always use the lexicographic order of printed forms, so
//! every observable listing of a set is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::EffectLabel;

/// A set of effect labels, stored as printed forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectSet {
    labels: BTreeSet<String>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from printed label forms
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, label: impl Into<String>) {
        self.labels.insert(label.into());
    }

    pub fn add_label(&mut self, label: &EffectLabel) {
        self.labels.insert(label.to_string());
    }

    /// Union in place
    pub fn add_all(&mut self, other: &EffectSet) {
        for label in &other.labels {
            self.labels.insert(label.clone());
        }
    }

    /// Union into a new set
    pub fn union(&self, other: &EffectSet) -> EffectSet {
        let mut result = self.clone();
        result.add_all(other);
        result
    }

    /// Labels in `self` that are not in `other`
    pub fn difference(&self, other: &EffectSet) -> EffectSet {
        EffectSet {
            labels: self.labels.difference(&other.labels).cloned().collect(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn is_subset_of(&self, other: &EffectSet) -> bool {
        self.labels.is_subset(&other.labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Canonical listing: sorted printed forms
    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    /// Iterate labels in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Comma-joined sorted listing used inside diagnostic messages
    pub fn join(&self, sep: &str) -> String {
        self.to_sorted_vec().join(sep)
    }
}

impl fmt::Display for EffectSet {
    /// Canonical annotation form: `{ a | b }`, `{ }` when empty
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ {} }}", self.join(" | "))
    }
}

impl FromIterator<String> for EffectSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EffectSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_contains() {
        let mut set = EffectSet::new();
        set.add("select[users]");
        set.add("insert[logs]");
        set.add("select[users]");

        assert_eq!(set.len(), 2);
        assert!(set.contains("select[users]"));
        assert!(!set.contains("delete[users]"));
    }

    #[test]
    fn test_sorted_listing_is_lexicographic() {
        let set = EffectSet::from_labels(["update[users]", "insert[logs]", "select[users]"]);
        assert_eq!(
            set.to_sorted_vec(),
            vec!["insert[logs]", "select[users]", "update[users]"]
        );
    }

    #[test]
    fn test_subset_and_difference() {
        let declared = EffectSet::from_labels(["insert[log]"]);
        let computed = EffectSet::from_labels(["insert[log]", "select[user]"]);

        assert!(declared.is_subset_of(&computed));
        assert!(!computed.is_subset_of(&declared));

        let missing = computed.difference(&declared);
        assert_eq!(missing.to_sorted_vec(), vec!["select[user]"]);
    }

    #[test]
    fn test_union_does_not_mutate_inputs() {
        let a = EffectSet::from_labels(["a"]);
        let b = EffectSet::from_labels(["b"]);
        let u = a.union(&b);

        assert_eq!(u.len(), 2);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(EffectSet::new().to_string(), "{ }");

        let set = EffectSet::from_labels(["select[users]", "insert[logs]"]);
        assert_eq!(set.to_string(), "{ insert[logs] | select[users] }");
    }

    #[test]
    fn test_serde_as_sorted_list() {
        let set = EffectSet::from_labels(["b[y]", "a[x]"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a[x]","b[y]"]"#);

        let back: EffectSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
