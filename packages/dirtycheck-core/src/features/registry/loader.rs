//! External effect registry
//!
//! A keyed JSON document supplying annotation payloads out-of-band:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "effects": {
//!     "CallExternalAPI": "{ network[external_api] }",
//!     "example.com/db.GetUser": "{ select[users] }"
//!   }
//! }
//! ```
//!
//! Discovery order: the `DIRTY_EFFECTS_JSON` path when set, else
//! `effect-registry.json` in the package directory. Any failure (missing
//! file, unreadable JSON, unsupported version, malformed entry) ignores
//! the registry silently; a broken side channel never fails a pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::config::{AnalyzerConfig, REGISTRY_FILENAME};
use crate::errors::{CoreError, Result};
use crate::features::annotation::domain::EffectExpr;
use crate::features::annotation::infrastructure::parse_payload;
use crate::shared::models::PackageTree;

/// The only accepted registry version
pub const REGISTRY_VERSION: &str = "1.0";

/// Registry entries parsed into expressions, keyed by function key
///
/// Ordered map: seeding and lookups iterate deterministically.
pub type ParsedEffects = BTreeMap<String, EffectExpr>;

/// The registry document as it appears on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRegistry {
    pub version: String,
    pub effects: BTreeMap<String, String>,
}

impl EffectRegistry {
    /// Load and version-check a registry file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let registry: EffectRegistry = serde_json::from_str(&data)
            .map_err(|err| CoreError::registry(format!("malformed registry: {}", err)))?;

        if registry.version != REGISTRY_VERSION {
            return Err(CoreError::registry(format!(
                "unsupported version: {}",
                registry.version
            )));
        }
        Ok(registry)
    }

    /// Parse every payload through the annotation parser
    ///
    /// One malformed entry invalidates the whole registry, mirroring the
    /// all-or-nothing load contract.
    pub fn parse_all(&self) -> Result<ParsedEffects> {
        let mut parsed = ParsedEffects::new();
        for (key, payload) in &self.effects {
            let expr = parse_payload(payload).map_err(|err| {
                CoreError::registry(format!("error parsing effects for {}: {}", key, err))
            })?;
            parsed.insert(key.clone(), expr);
        }
        Ok(parsed)
    }
}

/// Discover, load, and parse the registry for one pass
///
/// Returns an empty mapping when no registry is present or usable.
pub fn discover_registry(config: &AnalyzerConfig, tree: &PackageTree) -> ParsedEffects {
    let path = match &config.registry_path {
        Some(path) => path.clone(),
        None => match tree.package_dir() {
            Some(dir) => Path::new(dir).join(REGISTRY_FILENAME),
            None => return ParsedEffects::new(),
        },
    };

    if !path.exists() {
        return ParsedEffects::new();
    }

    match EffectRegistry::load(&path).and_then(|registry| registry.parse_all()) {
        Ok(parsed) => {
            debug!(path = %path.display(), entries = parsed.len(), "loaded effect registry");
            parsed
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "ignoring unusable effect registry");
            ParsedEffects::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_registry(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_registry() {
        let file = write_registry(
            r#"{
                "version": "1.0",
                "effects": {
                    "CallExternalAPI": "{ network[external_api] }",
                    "LogActivity": "{ insert[activity_logs] }"
                }
            }"#,
        );

        let registry = EffectRegistry::load(file.path()).unwrap();
        assert_eq!(registry.effects.len(), 2);

        let parsed = registry.parse_all().unwrap();
        let set = parsed["CallExternalAPI"].eval(None).unwrap();
        assert_eq!(set.to_sorted_vec(), vec!["network[external_api]"]);
    }

    #[test]
    fn test_legacy_payload_accepted() {
        let file = write_registry(
            r#"{ "version": "1.0", "effects": { "F": "select[user], insert[log]" } }"#,
        );

        let parsed = EffectRegistry::load(file.path()).unwrap().parse_all().unwrap();
        let set = parsed["F"].eval(None).unwrap();
        assert_eq!(set.to_sorted_vec(), vec!["insert[log]", "select[user]"]);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let file = write_registry(r#"{ "version": "2.0", "effects": {} }"#);
        let err = EffectRegistry::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported version"));
    }

    #[test]
    fn test_malformed_document_rejected() {
        let file = write_registry("{ not json");
        assert!(EffectRegistry::load(file.path()).is_err());
    }

    #[test]
    fn test_malformed_entry_invalidates_registry() {
        let file = write_registry(
            r#"{ "version": "1.0", "effects": { "F": "{ select[users" } }"#,
        );
        let registry = EffectRegistry::load(file.path()).unwrap();
        let err = registry.parse_all().unwrap_err();
        assert!(err.to_string().contains("error parsing effects for F"));
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let file = write_registry(
            r#"{ "version": "1.0", "effects": { "F": "{ select[users] }" } }"#,
        );

        let config = AnalyzerConfig::new().with_registry_path(file.path());
        let tree = PackageTree::new("p");
        let parsed = discover_registry(&config, &tree);
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_discover_package_dir_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(REGISTRY_FILENAME),
            r#"{ "version": "1.0", "effects": { "F": "{ select[users] }" } }"#,
        )
        .unwrap();

        let mut tree = PackageTree::new("p");
        tree.files.push(crate::shared::models::SourceFile::new(
            format!("{}/lib.src", dir.path().display()),
        ));

        let parsed = discover_registry(&AnalyzerConfig::new(), &tree);
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_discover_silently_ignores_broken_registry() {
        let file = write_registry(r#"{ "version": "9.9", "effects": {} }"#);
        let config = AnalyzerConfig::new().with_registry_path(file.path());
        let tree = PackageTree::new("p");
        assert!(discover_registry(&config, &tree).is_empty());
    }

    #[test]
    fn test_discover_missing_file_is_empty() {
        let config = AnalyzerConfig::new().with_registry_path("/nonexistent/registry.json");
        let tree = PackageTree::new("p");
        assert!(discover_registry(&config, &tree).is_empty());
    }
}
