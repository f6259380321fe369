//! Pass configuration
//!
//! Read once from the environment at pass start into an immutable value.
//! No other global state exists in the core.

use std::env;
use std::path::PathBuf;

/// Environment variable selecting the verbose diagnostic format
pub const ENV_VERBOSE: &str = "DIRTY_VERBOSE";

/// Environment variable suppressing fact export (tests)
pub const ENV_DISABLE_FACTS: &str = "DIRTY_DISABLE_FACTS";

/// Environment variable overriding registry discovery with an explicit path
pub const ENV_EFFECTS_JSON: &str = "DIRTY_EFFECTS_JSON";

/// Well-known registry filename looked up in the package directory
pub const REGISTRY_FILENAME: &str = "effect-registry.json";

/// Analyzer configuration for one pass
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Emit multi-line diagnostics with propagation traces and fix hints
    pub verbose: bool,

    /// Skip fact export entirely
    pub disable_facts: bool,

    /// Explicit registry path; when `None`, discovery falls back to
    /// `effect-registry.json` next to the package's first source file
    pub registry_path: Option<PathBuf>,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment
    pub fn from_env() -> Self {
        Self {
            verbose: env_flag(ENV_VERBOSE),
            disable_facts: env_flag(ENV_DISABLE_FACTS),
            registry_path: env::var_os(ENV_EFFECTS_JSON).map(PathBuf::from),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_disable_facts(mut self, disable: bool) -> Self {
        self.disable_facts = disable;
        self
    }

    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = Some(path.into());
        self
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| v == "1").unwrap_or(false)
}
