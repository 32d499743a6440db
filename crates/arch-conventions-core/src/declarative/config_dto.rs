//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of declarative rules.
///
/// Extends the base `Config` with `[[rules]]` tables; other keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Ad-hoc rule tables.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// TOML representation of one `[[rules]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleDto {
    /// Rule name (e.g., "no-impl-suffix").
    pub name: String,

    /// Namespace overriding the global one.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Import scope: exclude-tests, include-tests, tests-only.
    #[serde(default)]
    pub import_scope: Option<String>,
    /// Type full names to skip.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Selector: type kind (struct, enum, union, trait, type-alias).
    #[serde(default)]
    pub kind: Option<String>,
    /// Selector: namespace.
    #[serde(default)]
    pub resides_in: Option<String>,
    /// Selector: full-name regex.
    #[serde(default)]
    pub name_matches: Option<String>,
    /// Selector: derived trait.
    #[serde(default)]
    pub derives: Option<String>,
    /// Selector: `pub` types only.
    #[serde(default)]
    pub public: Option<bool>,

    /// Condition: full name matches.
    #[serde(default)]
    pub must_match: Option<String>,
    /// Condition: full name does not match.
    #[serde(default)]
    pub must_not_match: Option<String>,
    /// Condition: simple name suffix.
    #[serde(default)]
    pub must_end_with: Option<String>,
    /// Condition: simple name prefix.
    #[serde(default)]
    pub must_start_with: Option<String>,
    /// Condition: forbidden simple name prefix.
    #[serde(default)]
    pub must_not_start_with: Option<String>,
    /// Condition: derived trait.
    #[serde(default)]
    pub must_derive: Option<String>,
    /// Condition: forbidden derived trait.
    #[serde(default)]
    pub must_not_derive: Option<String>,
    /// Condition: visibility.
    #[serde(default)]
    pub must_be_public: Option<bool>,
    /// Condition: namespace.
    #[serde(default)]
    pub must_reside_in: Option<String>,
    /// Condition: forbidden namespace.
    #[serde(default)]
    pub must_not_reside_in: Option<String>,

    /// Explanation appended to violations.
    #[serde(default)]
    pub message: Option<String>,
    /// Rule code (default: "AC900").
    #[serde(default)]
    pub code: Option<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

fn default_severity_str() -> String {
    "error".to_string()
}
