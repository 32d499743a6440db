//! Rule evaluation backend.

use crate::error::ViolationError;
use crate::model::ClassModel;
use crate::rule::ArchRule;
use crate::types::{Severity, Violation};
use tracing::{debug, warn};

/// Outcome of a rule that did not fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of types the rule selected.
    pub matched: usize,
    /// Findings below the failure threshold.
    pub findings: Vec<Violation>,
}

/// Runs one rule against one class model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    fail_on_empty: bool,
    fail_on: Severity,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            fail_on_empty: false,
            fail_on: Severity::Error,
        }
    }
}

impl Evaluator {
    /// Creates an evaluator.
    ///
    /// With `fail_on_empty`, a rule that selects no types is a violation.
    /// Violations at or above `fail_on` raise; lower ones are findings.
    #[must_use]
    pub fn new(fail_on_empty: bool, fail_on: Severity) -> Self {
        Self {
            fail_on_empty,
            fail_on,
        }
    }

    /// Whether vacuous matches fail.
    #[must_use]
    pub fn fail_on_empty(&self) -> bool {
        self.fail_on_empty
    }

    /// The failure threshold.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on
    }

    /// Evaluates `rule` over `model`.
    ///
    /// # Errors
    ///
    /// Returns a [`ViolationError`] listing every offending type when at
    /// least one violation reaches the threshold, or when the selection is
    /// empty and `fail_on_empty` is set.
    pub fn evaluate(
        &self,
        rule: &dyn ArchRule,
        model: &ClassModel,
    ) -> Result<Evaluation, ViolationError> {
        let severity = rule.default_severity();
        let mut matched = 0;
        let mut violations = Vec::new();

        for ty in model.iter().filter(|ty| rule.selects(ty)) {
            matched += 1;
            if let Some(message) = rule.check(ty) {
                violations.push(
                    Violation::new(rule.code(), rule.name(), severity, ty.full_name(), message)
                        .with_location(ty.location().cloned()),
                );
            }
        }

        debug!(
            "Rule `{}` selected {} of {} types, {} violation(s)",
            rule.name(),
            matched,
            model.len(),
            violations.len()
        );

        if matched == 0 && self.fail_on_empty {
            return Err(ViolationError::vacuous(rule.name(), rule.description()));
        }

        if !violations.is_empty() && severity >= self.fail_on {
            return Err(ViolationError::new(
                rule.name(),
                rule.description(),
                violations,
            ));
        }

        for finding in &violations {
            warn!("{}", finding);
        }

        Ok(Evaluation {
            matched,
            findings: violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeInfo, TypeKind};

    struct SuffixRule {
        severity: Severity,
    }

    impl ArchRule for SuffixRule {
        fn name(&self) -> &str {
            "no-impl-suffix"
        }

        fn description(&self) -> String {
            "structs should not end with `Impl`".to_string()
        }

        fn default_severity(&self) -> Severity {
            self.severity
        }

        fn selects(&self, ty: &TypeInfo) -> bool {
            ty.kind() == TypeKind::Struct
        }

        fn check(&self, ty: &TypeInfo) -> Option<String> {
            ty.simple_name()
                .ends_with("Impl")
                .then(|| format!("`{}` ends with `Impl`", ty.full_name()))
        }
    }

    fn model() -> ClassModel {
        ClassModel::new(vec![
            TypeInfo::new("pkg::FooImpl", TypeKind::Struct),
            TypeInfo::new("pkg::BarImpl", TypeKind::Struct),
            TypeInfo::new("pkg::Baz", TypeKind::Struct),
        ])
    }

    #[test]
    fn reports_all_violations_of_one_rule() {
        let rule = SuffixRule {
            severity: Severity::Error,
        };
        let err = Evaluator::default().evaluate(&rule, &model()).unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.violations()[0].type_name, "pkg::FooImpl");
    }

    #[test]
    fn satisfied_rule_passes() {
        let rule = SuffixRule {
            severity: Severity::Error,
        };
        let model = ClassModel::new(vec![TypeInfo::new("pkg::Baz", TypeKind::Struct)]);
        let eval = Evaluator::default().evaluate(&rule, &model).unwrap();
        assert_eq!(eval.matched, 1);
        assert!(eval.findings.is_empty());
    }

    #[test]
    fn vacuous_match_passes_by_default() {
        let rule = SuffixRule {
            severity: Severity::Error,
        };
        let eval = Evaluator::default()
            .evaluate(&rule, &ClassModel::empty())
            .unwrap();
        assert_eq!(eval.matched, 0);
    }

    #[test]
    fn vacuous_match_fails_when_enabled() {
        let rule = SuffixRule {
            severity: Severity::Error,
        };
        let err = Evaluator::new(true, Severity::Error)
            .evaluate(&rule, &ClassModel::empty())
            .unwrap_err();
        assert!(err.is_vacuous());
    }

    #[test]
    fn below_threshold_violations_are_findings() {
        let rule = SuffixRule {
            severity: Severity::Warning,
        };
        let eval = Evaluator::default().evaluate(&rule, &model()).unwrap();
        assert_eq!(eval.findings.len(), 2);

        let err = Evaluator::new(false, Severity::Warning)
            .evaluate(&rule, &model())
            .unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }
}
