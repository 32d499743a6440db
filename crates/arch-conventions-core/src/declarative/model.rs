//! Pure domain model for declarative type rules.
//!
//! This module contains no serde, no syn, no I/O dependencies.
//! All invariants are enforced at construction time via validated newtypes.

use crate::model::{Namespace, TypeInfo, TypeKind};
use crate::rule::ArchRule;
use crate::types::Severity;
use regex::Regex;
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated, fully anchored regular expression over type names.
///
/// `.*Impl` matches `pkg::FooImpl` but not `pkg::FooImplTest`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    compiled: Regex,
}

impl NamePattern {
    /// Creates a new name pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        if pattern.is_empty() {
            return Err(ModelError::EmptyNamePattern);
        }
        let compiled =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|e| ModelError::InvalidNamePattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether the whole name matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.compiled.is_match(name)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for NamePattern {}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ────────────────────────────────────────────
// Selection and conditions
// ────────────────────────────────────────────

/// Narrows the types a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelector {
    /// Every type.
    All,
    /// Types in a namespace.
    ResideIn(Namespace),
    /// Types whose full name matches.
    NameMatches(NamePattern),
    /// Types of one kind.
    Kind(TypeKind),
    /// Types deriving a trait.
    Derives(String),
    /// `pub` types.
    Public,
}

impl TypeSelector {
    /// Tests whether `ty` is selected.
    #[must_use]
    pub fn selects(&self, ty: &TypeInfo) -> bool {
        match self {
            Self::All => true,
            Self::ResideIn(ns) => ns.contains(ty.full_name()),
            Self::NameMatches(p) => p.matches(ty.full_name()),
            Self::Kind(kind) => ty.kind() == *kind,
            Self::Derives(name) => ty.derives_trait(name),
            Self::Public => ty.is_public(),
        }
    }
}

impl fmt::Display for TypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "exist"),
            Self::ResideIn(ns) => write!(f, "reside in `{ns}`"),
            Self::NameMatches(p) => write!(f, "have name matching `{p}`"),
            Self::Kind(kind) => write!(f, "are of kind `{kind}`"),
            Self::Derives(name) => write!(f, "derive `{name}`"),
            Self::Public => write!(f, "are public"),
        }
    }
}

/// What every selected type must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCondition {
    /// Full name matches the pattern.
    HaveNameMatching(NamePattern),
    /// Full name does not match the pattern.
    NotHaveNameMatching(NamePattern),
    /// Simple name ends with the suffix.
    HaveSimpleNameEndingWith(String),
    /// Simple name starts with the prefix.
    HaveSimpleNameStartingWith(String),
    /// Simple name does not start with the prefix.
    NotHaveSimpleNameStartingWith(String),
    /// Derives the trait.
    Derive(String),
    /// Does not derive the trait.
    NotDerive(String),
    /// Is `pub`.
    BePublic,
    /// Is not `pub`.
    NotBePublic,
    /// Lives in the namespace.
    ResideIn(Namespace),
    /// Lives outside the namespace.
    NotResideIn(Namespace),
}

impl TypeCondition {
    /// Tests whether `ty` satisfies the condition.
    #[must_use]
    pub fn holds(&self, ty: &TypeInfo) -> bool {
        match self {
            Self::HaveNameMatching(p) => p.matches(ty.full_name()),
            Self::NotHaveNameMatching(p) => !p.matches(ty.full_name()),
            Self::HaveSimpleNameEndingWith(s) => ty.simple_name().ends_with(s.as_str()),
            Self::HaveSimpleNameStartingWith(s) => ty.simple_name().starts_with(s.as_str()),
            Self::NotHaveSimpleNameStartingWith(s) => !ty.simple_name().starts_with(s.as_str()),
            Self::Derive(name) => ty.derives_trait(name),
            Self::NotDerive(name) => !ty.derives_trait(name),
            Self::BePublic => ty.is_public(),
            Self::NotBePublic => !ty.is_public(),
            Self::ResideIn(ns) => ns.contains(ty.full_name()),
            Self::NotResideIn(ns) => !ns.contains(ty.full_name()),
        }
    }
}

impl fmt::Display for TypeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HaveNameMatching(p) => write!(f, "have name matching `{p}`"),
            Self::NotHaveNameMatching(p) => write!(f, "not have name matching `{p}`"),
            Self::HaveSimpleNameEndingWith(s) => write!(f, "have simple name ending with `{s}`"),
            Self::HaveSimpleNameStartingWith(s) => {
                write!(f, "have simple name starting with `{s}`")
            }
            Self::NotHaveSimpleNameStartingWith(s) => {
                write!(f, "not have simple name starting with `{s}`")
            }
            Self::Derive(name) => write!(f, "derive `{name}`"),
            Self::NotDerive(name) => write!(f, "not derive `{name}`"),
            Self::BePublic => write!(f, "be public"),
            Self::NotBePublic => write!(f, "not be public"),
            Self::ResideIn(ns) => write!(f, "reside in `{ns}`"),
            Self::NotResideIn(ns) => write!(f, "not reside in `{ns}`"),
        }
    }
}

// ────────────────────────────────────────────
// Rule
// ────────────────────────────────────────────

/// A declarative rule: selectors that must all hold, and one condition.
#[derive(Debug, Clone)]
pub struct TypeRule {
    name: String,
    code: String,
    selectors: Vec<TypeSelector>,
    condition: TypeCondition,
    message: Option<String>,
    severity: Severity,
}

impl TypeRule {
    /// Default code for declarative rules.
    pub const CODE: &'static str = "AC900";

    /// Creates a rule over every type.
    #[must_use]
    pub fn new(name: impl Into<String>, condition: TypeCondition) -> Self {
        Self {
            name: name.into(),
            code: Self::CODE.to_string(),
            selectors: Vec::new(),
            condition,
            message: None,
            severity: Severity::Error,
        }
    }

    /// Adds a selector; all selectors must hold for a type to be checked.
    #[must_use]
    pub fn that(mut self, selector: TypeSelector) -> Self {
        if selector != TypeSelector::All {
            self.selectors.push(selector);
        }
        self
    }

    /// Sets the explanation appended to each violation.
    #[must_use]
    pub fn because(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the rule code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// The selectors.
    #[must_use]
    pub fn selectors(&self) -> &[TypeSelector] {
        &self.selectors
    }

    /// The condition.
    #[must_use]
    pub fn condition(&self) -> &TypeCondition {
        &self.condition
    }
}

impl ArchRule for TypeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn description(&self) -> String {
        if self.selectors.is_empty() {
            return format!("types should {}", self.condition);
        }
        let selection = self
            .selectors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" and ");
        format!("types that {selection} should {}", self.condition)
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn selects(&self, ty: &TypeInfo) -> bool {
        self.selectors.iter().all(|s| s.selects(ty))
    }

    fn check(&self, ty: &TypeInfo) -> Option<String> {
        if self.condition.holds(ty) {
            return None;
        }
        let mut message = format!("type `{}` should {}", ty.full_name(), self.condition);
        if let Some(reason) = &self.message {
            message.push_str(": ");
            message.push_str(reason);
        }
        Some(message)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Validation errors in the declarative model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Name pattern is empty.
    #[error("name pattern must not be empty")]
    EmptyNamePattern,

    /// Name pattern is not a valid regex.
    #[error("invalid name pattern `{pattern}`: {reason}")]
    InvalidNamePattern {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(path: &str) -> Namespace {
        Namespace::new(path).unwrap()
    }

    // -- NamePattern --

    #[test]
    fn name_pattern_is_anchored() {
        let p = NamePattern::new(".*Impl").unwrap();
        assert!(p.matches("pkg::FooImpl"));
        assert!(!p.matches("pkg::FooImplTest"));
    }

    #[test]
    fn name_pattern_alternation_is_anchored_as_a_whole() {
        let p = NamePattern::new("pkg::a::.*|pkg::b::X").unwrap();
        assert!(p.matches("pkg::a::Foo"));
        assert!(p.matches("pkg::b::X"));
        assert!(!p.matches("pkg::b::XY"));
    }

    #[test]
    fn name_pattern_rejects_empty_and_invalid() {
        assert_eq!(NamePattern::new(""), Err(ModelError::EmptyNamePattern));
        assert!(matches!(
            NamePattern::new("(unclosed"),
            Err(ModelError::InvalidNamePattern { .. })
        ));
    }

    // -- Selectors and conditions --

    #[test]
    fn selectors_combine_with_and() {
        let rule = TypeRule::new("r", TypeCondition::BePublic)
            .that(TypeSelector::ResideIn(ns("pkg::a")))
            .that(TypeSelector::Kind(TypeKind::Enum));

        assert!(rule.selects(&TypeInfo::new("pkg::a::E", TypeKind::Enum)));
        assert!(!rule.selects(&TypeInfo::new("pkg::a::S", TypeKind::Struct)));
        assert!(!rule.selects(&TypeInfo::new("pkg::b::E", TypeKind::Enum)));
    }

    #[test]
    fn conditions_hold() {
        let ty = TypeInfo::new("pkg::a::UserRepository", TypeKind::Trait)
            .public()
            .with_derive("Debug");

        assert!(TypeCondition::HaveSimpleNameEndingWith("Repository".into()).holds(&ty));
        assert!(TypeCondition::HaveSimpleNameStartingWith("User".into()).holds(&ty));
        assert!(!TypeCondition::NotHaveSimpleNameStartingWith("User".into()).holds(&ty));
        assert!(TypeCondition::Derive("Debug".into()).holds(&ty));
        assert!(!TypeCondition::NotDerive("Debug".into()).holds(&ty));
        assert!(TypeCondition::BePublic.holds(&ty));
        assert!(!TypeCondition::NotBePublic.holds(&ty));
        assert!(TypeCondition::ResideIn(ns("pkg")).holds(&ty));
        assert!(TypeCondition::NotResideIn(ns("pkg::b")).holds(&ty));
    }

    // -- TypeRule --

    #[test]
    fn description_reads_as_a_sentence() {
        let rule = TypeRule::new(
            "no-impl",
            TypeCondition::NotHaveNameMatching(NamePattern::new(".*Impl").unwrap()),
        )
        .that(TypeSelector::ResideIn(ns("pkg::a")));
        assert_eq!(
            rule.description(),
            "types that reside in `pkg::a` should not have name matching `.*Impl`"
        );

        let bare = TypeRule::new("pub", TypeCondition::BePublic).that(TypeSelector::All);
        assert!(bare.selectors().is_empty());
        assert_eq!(bare.description(), "types should be public");
    }

    #[test]
    fn check_reports_reason() {
        let rule = TypeRule::new("pub", TypeCondition::BePublic).because("API types are exported");
        let msg = rule
            .check(&TypeInfo::new("pkg::Hidden", TypeKind::Struct))
            .unwrap();
        assert_eq!(
            msg,
            "type `pkg::Hidden` should be public: API types are exported"
        );
    }

    #[test]
    fn severity_and_code_overrides() {
        let rule = TypeRule::new("r", TypeCondition::BePublic)
            .with_severity(Severity::Warning)
            .with_code("AC123");
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert_eq!(rule.code(), "AC123");
        assert_eq!(TypeRule::new("d", TypeCondition::BePublic).code(), TypeRule::CODE);
    }
}
