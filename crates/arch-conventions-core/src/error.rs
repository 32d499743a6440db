//! Error taxonomy for configuration, resolution and evaluation.

use crate::config::ConfigError;
use crate::declarative::model::ModelError as PatternError;
use crate::declarative::LoadRulesError;
use crate::model::ModelError;
use crate::provider::ImportError;
use crate::types::Violation;
use miette::Diagnostic;

/// Errors raised while assembling or checking conventions.
#[derive(Debug, thiserror::Error)]
pub enum ConventionsError {
    /// A rule cannot be resolved against any class model.
    #[error("configuration error in rule `{rule}`: {message}")]
    Configuration {
        /// The rule that failed to resolve.
        rule: String,
        /// What is missing.
        message: String,
    },

    /// A builder or family method received an unusable argument.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A rule's condition was not met.
    #[error(transparent)]
    Violation(#[from] ViolationError),

    /// The class model provider failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Declarative rules could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadRulesError),

    /// The configuration file could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConventionsError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Returns the violation, if this error is one.
    #[must_use]
    pub fn as_violation(&self) -> Option<&ViolationError> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<PatternError> for ConventionsError {
    fn from(e: PatternError) -> Self {
        Self::invalid_argument("pattern", e.to_string())
    }
}

impl From<ModelError> for ConventionsError {
    fn from(e: ModelError) -> Self {
        let argument = match &e {
            ModelError::EmptyNamespace | ModelError::InvalidNamespace { .. } => "namespace",
        };
        Self::invalid_argument(argument, e.to_string())
    }
}

/// A rule was not satisfied by its class model.
///
/// Carries every offending element of that single rule. Rendered as a
/// human-readable report through `Display`, and as a miette diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("{}", render_report(.rule, .description, .violations, .vacuous))]
#[diagnostic(
    code(arch_conventions::violation),
    help("fix the offending types or exclude them from the rule")
)]
pub struct ViolationError {
    rule: String,
    description: String,
    violations: Vec<Violation>,
    vacuous: bool,
}

impl ViolationError {
    /// Creates a violation error listing offending elements.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        description: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            rule: rule.into(),
            description: description.into(),
            violations,
            vacuous: false,
        }
    }

    /// Creates a violation for a rule whose selection matched nothing.
    #[must_use]
    pub fn vacuous(rule: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            description: description.into(),
            violations: Vec::new(),
            vacuous: true,
        }
    }

    /// Name of the violated rule.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Description of the violated rule.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Offending elements, in evaluation order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether the failure is an empty selection rather than a broken condition.
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.vacuous
    }
}

fn render_report(
    rule: &str,
    description: &str,
    violations: &[Violation],
    vacuous: &bool,
) -> String {
    use std::fmt::Write;

    if *vacuous {
        return format!(
            "rule `{rule}` ({description}) failed to check any types: the selection matched nothing"
        );
    }

    let mut report = format!(
        "rule `{rule}` ({description}) was violated ({} time(s)):",
        violations.len()
    );
    for v in violations {
        let _ = write!(report, "\n  - {}", v.format());
    }
    report
}
