//! Rule trait for declarative type conventions.

use crate::model::TypeInfo;
use crate::types::Severity;
use std::sync::Arc;

/// A declarative convention: a selection predicate plus a condition.
///
/// The evaluator first narrows a class model to the types this rule
/// [`selects`](ArchRule::selects), then asks [`check`](ArchRule::check) for
/// each of them. A selection that matches nothing is a vacuous match.
///
/// # Example
///
/// ```ignore
/// use arch_conventions_core::{ArchRule, TypeInfo};
///
/// pub struct NoImplSuffix;
///
/// impl ArchRule for NoImplSuffix {
///     fn name(&self) -> &str { "no-impl-suffix" }
///     fn description(&self) -> String { "types should not end with `Impl`".into() }
///
///     fn selects(&self, _ty: &TypeInfo) -> bool { true }
///
///     fn check(&self, ty: &TypeInfo) -> Option<String> {
///         ty.simple_name()
///             .ends_with("Impl")
///             .then(|| format!("type `{}` ends with `Impl`", ty.full_name()))
///     }
/// }
/// ```
pub trait ArchRule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-impl-suffix").
    fn name(&self) -> &str;

    /// Returns the rule code (e.g., "AC101").
    fn code(&self) -> &str {
        "AC000"
    }

    /// Returns a human-readable sentence describing the convention.
    fn description(&self) -> String;

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Selection predicate: whether the rule applies to `ty`.
    fn selects(&self, ty: &TypeInfo) -> bool;

    /// Condition: `Some(reason)` when `ty` breaks the convention.
    fn check(&self, ty: &TypeInfo) -> Option<String>;
}

/// Shared handle to a rule; descriptors are cloned when rule lists are flattened.
pub type SharedRule = Arc<dyn ArchRule>;
