//! Configuration types for arch-conventions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["conventions.toml", ".conventions.toml"];

/// Top-level configuration for arch-conventions.
///
/// Declarative `[[rules]]` tables share the file but are read separately by
/// [`crate::declarative::load_rules_from_toml`]; this type skips them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal", "none").
    #[serde(default)]
    pub preset: Option<String>,

    /// Global namespace for rules that do not declare one.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Whether a rule that selects no types fails.
    #[serde(default)]
    pub fail_on_empty: bool,

    /// Severity threshold for test failure (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Type full names excluded from every namespace-resolved model.
    #[serde(default)]
    pub exclude_types: Vec<String>,

    /// Source tree scanning.
    #[serde(default)]
    pub source: SourceConfig,

    /// Per-family toggles, keyed by family name.
    #[serde(default)]
    pub families: HashMap<String, FamilyConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Finds the first config file candidate under `root`.
    #[must_use]
    pub fn find(root: &Path) -> Option<PathBuf> {
        CONFIG_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
    }

    /// Checks if a family is enabled.
    #[must_use]
    pub fn is_family_enabled(&self, family: &str) -> bool {
        self.families.get(family).map_or(true, |c| c.enabled)
    }
}

/// Source tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Crate directory to scan, relative to the project root.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Name prepended to module paths (default: the namespace's first segment).
    #[serde(default)]
    pub crate_name: Option<String>,

    /// Glob patterns to exclude from scanning.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether unparsable files fail the import instead of being skipped.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            crate_name: None,
            exclude: Vec::new(),
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-family configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Whether this family contributes rules.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.source.respect_gitignore);
        assert!(!config.fail_on_empty);
        assert!(config.families.is_empty());
        assert!(config.is_family_enabled("naming"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
namespace = "my_crate"
fail_on_empty = true
exclude_types = ["my_crate::legacy::Old"]

[source]
root = "./crates/my_crate"
crate_name = "my_crate"
exclude = ["**/generated/**"]

[families.naming]
enabled = false

[families.derives]

[[rules]]
name = "ignored-here"
must-not-match = ".*Impl"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.namespace.as_deref(), Some("my_crate"));
        assert!(config.fail_on_empty);
        assert_eq!(config.exclude_types, ["my_crate::legacy::Old"]);
        assert_eq!(config.source.root, PathBuf::from("./crates/my_crate"));
        assert_eq!(config.source.crate_name.as_deref(), Some("my_crate"));
        assert!(!config.is_family_enabled("naming"));
        assert!(config.is_family_enabled("derives"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("fail_on_empty = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_find_prefers_first_candidate() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::find(dir.path()).is_none());

        std::fs::write(dir.path().join(".conventions.toml"), "").unwrap();
        assert_eq!(
            Config::find(dir.path()),
            Some(dir.path().join(".conventions.toml"))
        );

        std::fs::write(dir.path().join("conventions.toml"), "").unwrap();
        assert_eq!(
            Config::find(dir.path()),
            Some(dir.path().join("conventions.toml"))
        );
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/conventions.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
