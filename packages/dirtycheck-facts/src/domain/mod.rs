//! Fact values and the store port
//!
//! Two fact kinds exist, mirroring the two ways a dependent pass looks
//! effects up:
//!
//! - `PackageEffectsFact`: the whole package's function-key → effects
//!   mapping, imported when a pass sees a qualified call into the package.
//! - `FunctionEffectsFact`: one function's effects, attached to the
//!   function's fully qualified symbol so single-symbol queries work even
//!   when the caller does not hold the package fact.
//!
//! Effect lists are stored in canonical form: sorted, deduplicated printed
//! label forms. Keys are base names for plain functions and
//! `(Receiver).method` for methods.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::Result;

/// Effects of every function in one package whose computed set is non-empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEffectsFact {
    /// Function key → sorted effect labels
    pub function_effects: BTreeMap<String, Vec<String>>,
}

impl PackageEffectsFact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a function's effects, normalizing to sorted-deduplicated form
    pub fn insert(&mut self, key: impl Into<String>, mut effects: Vec<String>) {
        effects.sort();
        effects.dedup();
        self.function_effects.insert(key.into(), effects);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.function_effects.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.function_effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.function_effects.is_empty()
    }

    /// Encode through the driver's codec (serde-compatible JSON)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl fmt::Display for PackageEffectsFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageEffectsFact{{{} functions}}", self.len())
    }
}

/// Effects of a single function, attached to its resolved symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEffectsFact {
    /// Sorted effect labels
    pub effects: Vec<String>,
}

impl FunctionEffectsFact {
    pub fn new(mut effects: Vec<String>) -> Self {
        effects.sort();
        effects.dedup();
        Self { effects }
    }
}

impl fmt::Display for FunctionEffectsFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionEffectsFact{:?}", self.effects)
    }
}

/// Store port implemented by the analysis driver
///
/// The analyzer treats the store as opaque: facts go in on successful pass
/// completion and come back out in later passes over dependent packages.
/// Import failures are indistinguishable from absence at the call sites
/// that matter, so implementations should prefer returning `Ok(None)` over
/// errors for missing entries.
pub trait FactStore {
    /// Publish the package-level fact for `package_path`
    fn export_package_fact(&mut self, package_path: &str, fact: PackageEffectsFact) -> Result<()>;

    /// Fetch the package-level fact for `package_path`, if one was published
    fn import_package_fact(&self, package_path: &str) -> Result<Option<PackageEffectsFact>>;

    /// Attach a fact to a fully qualified function symbol
    fn export_object_fact(&mut self, symbol: &str, fact: FunctionEffectsFact) -> Result<()>;

    /// Fetch the fact attached to a fully qualified function symbol
    fn import_object_fact(&self, symbol: &str) -> Result<Option<FunctionEffectsFact>>;
}

/// In-memory fact store
///
/// Backs tests and single-process drivers that analyze a dependency chain
/// of packages in one run.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactStore {
    package_facts: HashMap<String, PackageEffectsFact>,
    object_facts: HashMap<String, FunctionEffectsFact>,
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of package facts held
    pub fn package_fact_count(&self) -> usize {
        self.package_facts.len()
    }
}

impl FactStore for MemoryFactStore {
    fn export_package_fact(&mut self, package_path: &str, fact: PackageEffectsFact) -> Result<()> {
        self.package_facts.insert(package_path.to_string(), fact);
        Ok(())
    }

    fn import_package_fact(&self, package_path: &str) -> Result<Option<PackageEffectsFact>> {
        Ok(self.package_facts.get(package_path).cloned())
    }

    fn export_object_fact(&mut self, symbol: &str, fact: FunctionEffectsFact) -> Result<()> {
        self.object_facts.insert(symbol.to_string(), fact);
        Ok(())
    }

    fn import_object_fact(&self, symbol: &str) -> Result<Option<FunctionEffectsFact>> {
        Ok(self.object_facts.get(symbol).cloned())
    }
}
