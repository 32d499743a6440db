//! Derive conventions, mostly for error types.
//!
//! # Rationale
//!
//! Consistent error types with `thiserror` provide:
//! - Automatic `std::error::Error` implementation
//! - Structured error messages with `#[error("...")]`
//! - `Debug`, which `Result::unwrap` and test output rely on
//!
//! # Good Patterns
//!
//! ```ignore
//! #[derive(Debug, thiserror::Error)]
//! pub enum OrderError {
//!     #[error("order {0} not found")]
//!     NotFound(u64),
//! }
//! ```

use arch_conventions_core::{
    ArchRule, ConfigurerContext, ConventionsError, NamePattern, Namespace, RuleFamily, RuleSet,
    Severity, TypeCondition, TypeInfo, TypeKind, TypeRule, TypeSelector,
};

/// Rule code for errors-use-thiserror.
pub const ERRORS_USE_THISERROR: &str = "AC201";

/// Rule code for errors-derive-debug.
pub const ERRORS_DERIVE_DEBUG: &str = "AC202";

/// Rule code for ad-hoc derive requirements.
pub const DERIVE_REQUIREMENT: &str = "AC203";

/// Requires the `Error` derive on types named like errors.
///
/// Only structs and enums are selected; traits and aliases named `...Error`
/// are left alone.
#[derive(Debug, Clone)]
pub struct RequireErrorDerive {
    /// Severity level.
    pub severity: Severity,
    /// Simple-name suffixes that mark an error type.
    pub suffixes: Vec<String>,
}

impl Default for RequireErrorDerive {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireErrorDerive {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            suffixes: vec!["Error".to_string()],
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a suffix for error type names.
    #[must_use]
    pub fn add_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }
}

impl ArchRule for RequireErrorDerive {
    fn name(&self) -> &str {
        "errors-use-thiserror"
    }

    fn code(&self) -> &str {
        ERRORS_USE_THISERROR
    }

    fn description(&self) -> String {
        format!(
            "structs and enums named `*{}` should derive `thiserror::Error`",
            self.suffixes.join("`, `*")
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn selects(&self, ty: &TypeInfo) -> bool {
        matches!(ty.kind(), TypeKind::Struct | TypeKind::Enum)
            && self.suffixes.iter().any(|s| ty.simple_name().ends_with(s.as_str()))
    }

    fn check(&self, ty: &TypeInfo) -> Option<String> {
        if ty.derives_trait("Error") {
            return None;
        }
        Some(format!(
            "error type `{}` should derive `thiserror::Error`",
            ty.full_name()
        ))
    }
}

/// Rules about what types derive.
#[derive(Debug)]
pub struct DeriveConventions {
    rules: RuleSet,
}

impl RuleFamily for DeriveConventions {
    const NAME: &'static str = "derives";

    fn new(context: ConfigurerContext) -> Self {
        Self {
            rules: RuleSet::new(context),
        }
    }

    fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    fn rule_set_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }
}

impl DeriveConventions {
    /// Scopes rules added from now on to `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if `namespace` is not a valid module path.
    pub fn in_namespace(&mut self, namespace: &str) -> Result<&mut Self, ConventionsError> {
        self.rules.set_namespace(Namespace::new(namespace)?);
        Ok(self)
    }

    /// Error-named structs and enums should derive `thiserror::Error`.
    pub fn errors_use_thiserror(&mut self, severity: Severity) -> &mut Self {
        self.rules.add(RequireErrorDerive::new().severity(severity));
        self
    }

    /// Types deriving `Error` should also derive `Debug`.
    pub fn errors_derive_debug(&mut self) -> &mut Self {
        let rule = TypeRule::new("errors-derive-debug", TypeCondition::Derive("Debug".into()))
            .that(TypeSelector::Derives("Error".into()))
            .with_code(ERRORS_DERIVE_DEBUG);
        self.rules.add(rule);
        self
    }

    /// Types whose full name matches `selection` should derive `trait_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `selection` is not a valid regex.
    pub fn matching_should_derive(
        &mut self,
        selection: &str,
        trait_name: &str,
    ) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            format!("derive-{}", trait_name.to_lowercase()),
            TypeCondition::Derive(trait_name.to_string()),
        )
        .that(TypeSelector::NameMatches(NamePattern::new(selection)?))
        .with_code(DERIVE_REQUIREMENT);
        self.rules.add(rule);
        Ok(self)
    }

    /// Types whose full name matches `selection` should not derive `trait_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `selection` is not a valid regex.
    pub fn matching_should_not_derive(
        &mut self,
        selection: &str,
        trait_name: &str,
    ) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            format!("no-derive-{}", trait_name.to_lowercase()),
            TypeCondition::NotDerive(trait_name.to_string()),
        )
        .that(TypeSelector::NameMatches(NamePattern::new(selection)?))
        .with_code(DERIVE_REQUIREMENT);
        self.rules.add(rule);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_derive_selects_error_named_structs_and_enums() {
        let rule = RequireErrorDerive::new();

        assert!(rule.selects(&TypeInfo::new("pkg::ParseError", TypeKind::Enum)));
        assert!(rule.selects(&TypeInfo::new("pkg::IoError", TypeKind::Struct)));
        assert!(!rule.selects(&TypeInfo::new("pkg::BoxError", TypeKind::TypeAlias)));
        assert!(!rule.selects(&TypeInfo::new("pkg::ErrorKind", TypeKind::Enum)));
    }

    #[test]
    fn error_derive_accepts_thiserror() {
        let rule = RequireErrorDerive::new();
        let derived = TypeInfo::new("pkg::ParseError", TypeKind::Enum)
            .with_derive("Debug")
            .with_derive("Error");
        let manual = TypeInfo::new("pkg::ParseError", TypeKind::Enum).with_derive("Debug");

        assert!(rule.check(&derived).is_none());
        assert_eq!(
            rule.check(&manual).as_deref(),
            Some("error type `pkg::ParseError` should derive `thiserror::Error`")
        );
    }

    #[test]
    fn extra_suffixes_widen_selection() {
        let rule = RequireErrorDerive::new().add_suffix("Failure");
        assert!(rule.selects(&TypeInfo::new("pkg::LoadFailure", TypeKind::Struct)));
        assert_eq!(
            rule.description(),
            "structs and enums named `*Error`, `*Failure` should derive `thiserror::Error`"
        );
    }

    #[test]
    fn family_rules_carry_codes_and_severity() {
        let mut derives = DeriveConventions::new(ConfigurerContext::default());
        derives
            .errors_use_thiserror(Severity::Error)
            .errors_derive_debug()
            .matching_should_not_derive(".*Secret", "Debug")
            .unwrap();

        let rules: Vec<_> = derives
            .rules
            .descriptors()
            .iter()
            .map(|d| (d.rule().code().to_string(), d.rule().default_severity()))
            .collect();
        assert_eq!(
            rules,
            [
                (ERRORS_USE_THISERROR.to_string(), Severity::Error),
                (ERRORS_DERIVE_DEBUG.to_string(), Severity::Error),
                (DERIVE_REQUIREMENT.to_string(), Severity::Error),
            ]
        );

        let secret = TypeInfo::new("pkg::ApiSecret", TypeKind::Struct).with_derive("Debug");
        let rule = derives.rules.descriptors()[2].rule();
        assert!(rule.selects(&secret));
        assert!(rule.check(&secret).is_some());
    }
}
