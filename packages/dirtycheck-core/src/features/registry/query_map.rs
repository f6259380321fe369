//! Generated-query effect map
//!
//! Query generators emit metadata describing what each generated function
//! touches. The document maps function keys to operation/table pairs:
//!
//! ```json
//! {
//!   "GetUser": [ { "operation": "select", "table": "users" } ],
//!   "CreateUserWithAudit": [
//!     { "operation": "insert", "table": "users" },
//!     { "operation": "insert", "table": "audit_logs" }
//!   ]
//! }
//! ```
//!
//! Each entry converts to the sorted label list `operation[table]` and
//! seeds declarations exactly like registry entries. The driver decides
//! where the document lives and hands the loaded map to the pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::Result;
use crate::features::annotation::domain::EffectSet;

/// One database operation performed by a generated query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOperation {
    pub operation: String,
    pub table: String,
}

/// Generated-query metadata, keyed by function key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryMap {
    entries: BTreeMap<String, Vec<QueryOperation>>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a query-map document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let map: QueryMap = serde_json::from_str(&data)
            .map_err(|err| crate::errors::CoreError::registry(format!("malformed query map: {}", err)))?;
        Ok(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, operations: Vec<QueryOperation>) {
        self.entries.insert(key.into(), operations);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries as (key, effect set), in key order
    pub fn effects(&self) -> impl Iterator<Item = (&str, EffectSet)> {
        self.entries
            .iter()
            .map(|(key, ops)| (key.as_str(), operations_to_effects(ops)))
    }
}

/// Convert operation/table pairs to the canonical label set
fn operations_to_effects(operations: &[QueryOperation]) -> EffectSet {
    let mut set = EffectSet::new();
    for op in operations {
        set.add(format!("{}[{}]", op.operation, op.table));
    }
    set
}
