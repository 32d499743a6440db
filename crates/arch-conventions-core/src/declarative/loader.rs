//! DTO → Domain model conversion with validation.

use crate::descriptor::{RuleConfiguration, RuleDescriptor};
use crate::model::{ImportScope, ModelError as NamespaceError, Namespace, TypeKind};
use crate::types::Severity;

use super::config_dto::{DeclarativeConfigDto, RuleDto};
use super::model::{ModelError, NamePattern, TypeCondition, TypeRule, TypeSelector};

use std::sync::Arc;

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A pattern failed validation.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "rules[0].must-not-match").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// A namespace failed validation.
    #[error("{context}: {source}")]
    Namespace {
        /// Where the error occurred (e.g., "rules[0].resides-in").
        context: String,
        /// The underlying namespace error.
        source: NamespaceError,
    },

    /// Zero or several condition keys were set.
    #[error("{context}: exactly one condition (must-*) must be set, found {found}")]
    Condition {
        /// The rule that has the conflict.
        context: String,
        /// Number of condition keys present.
        found: usize,
    },

    /// Unknown enumerated value.
    #[error("{context}: unknown {what} `{value}`, expected: {expected}")]
    UnknownValue {
        /// Where the error occurred.
        context: String,
        /// What was being parsed.
        what: &'static str,
        /// The invalid value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
}

/// Converts a `DeclarativeConfigDto` to rule descriptors, in file order.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: DeclarativeConfigDto) -> Result<Vec<RuleDescriptor>, LoadError> {
    dto.rules
        .into_iter()
        .enumerate()
        .map(|(i, rule)| convert_rule(rule, i))
        .collect()
}

fn convert_rule(dto: RuleDto, index: usize) -> Result<RuleDescriptor, LoadError> {
    let ctx = format!("rules[{index}]");

    let condition = convert_condition(&dto, &ctx)?;
    let mut rule = TypeRule::new(dto.name.clone(), condition)
        .with_severity(parse_severity(&dto.severity, &ctx)?);

    for selector in convert_selectors(&dto, &ctx)? {
        rule = rule.that(selector);
    }
    if let Some(message) = dto.message {
        rule = rule.because(message);
    }
    if let Some(code) = dto.code {
        rule = rule.with_code(code);
    }

    let mut configuration = RuleConfiguration::new().exclude_types(dto.exclude);
    if let Some(ns) = &dto.namespace {
        configuration = configuration.in_namespace(namespace(ns, &format!("{ctx}.namespace"))?);
    }
    if let Some(scope) = &dto.import_scope {
        let scope = ImportScope::parse(scope).ok_or_else(|| LoadError::UnknownValue {
            context: format!("{ctx}.import-scope"),
            what: "import scope",
            value: scope.clone(),
            expected: "exclude-tests, include-tests, tests-only",
        })?;
        configuration = configuration.import_scope(scope);
    }

    Ok(RuleDescriptor::new(Arc::new(rule), configuration))
}

fn convert_selectors(dto: &RuleDto, ctx: &str) -> Result<Vec<TypeSelector>, LoadError> {
    let mut selectors = Vec::new();

    if let Some(kind) = &dto.kind {
        let kind = TypeKind::parse(kind).ok_or_else(|| LoadError::UnknownValue {
            context: format!("{ctx}.kind"),
            what: "type kind",
            value: kind.clone(),
            expected: "struct, enum, union, trait, type-alias",
        })?;
        selectors.push(TypeSelector::Kind(kind));
    }
    if let Some(ns) = &dto.resides_in {
        selectors.push(TypeSelector::ResideIn(namespace(
            ns,
            &format!("{ctx}.resides-in"),
        )?));
    }
    if let Some(p) = &dto.name_matches {
        selectors.push(TypeSelector::NameMatches(pattern(
            p,
            &format!("{ctx}.name-matches"),
        )?));
    }
    if let Some(name) = &dto.derives {
        selectors.push(TypeSelector::Derives(name.clone()));
    }
    if dto.public == Some(true) {
        selectors.push(TypeSelector::Public);
    }

    Ok(selectors)
}

fn convert_condition(dto: &RuleDto, ctx: &str) -> Result<TypeCondition, LoadError> {
    let mut found = Vec::new();

    if let Some(p) = &dto.must_match {
        found.push(TypeCondition::HaveNameMatching(pattern(
            p,
            &format!("{ctx}.must-match"),
        )?));
    }
    if let Some(p) = &dto.must_not_match {
        found.push(TypeCondition::NotHaveNameMatching(pattern(
            p,
            &format!("{ctx}.must-not-match"),
        )?));
    }
    if let Some(s) = &dto.must_end_with {
        found.push(TypeCondition::HaveSimpleNameEndingWith(s.clone()));
    }
    if let Some(s) = &dto.must_start_with {
        found.push(TypeCondition::HaveSimpleNameStartingWith(s.clone()));
    }
    if let Some(s) = &dto.must_not_start_with {
        found.push(TypeCondition::NotHaveSimpleNameStartingWith(s.clone()));
    }
    if let Some(name) = &dto.must_derive {
        found.push(TypeCondition::Derive(name.clone()));
    }
    if let Some(name) = &dto.must_not_derive {
        found.push(TypeCondition::NotDerive(name.clone()));
    }
    match dto.must_be_public {
        Some(true) => found.push(TypeCondition::BePublic),
        Some(false) => found.push(TypeCondition::NotBePublic),
        None => {}
    }
    if let Some(ns) = &dto.must_reside_in {
        found.push(TypeCondition::ResideIn(namespace(
            ns,
            &format!("{ctx}.must-reside-in"),
        )?));
    }
    if let Some(ns) = &dto.must_not_reside_in {
        found.push(TypeCondition::NotResideIn(namespace(
            ns,
            &format!("{ctx}.must-not-reside-in"),
        )?));
    }

    if found.len() != 1 {
        return Err(LoadError::Condition {
            context: format!("{ctx} '{}'", dto.name),
            found: found.len(),
        });
    }
    Ok(found.remove(0))
}

fn pattern(value: &str, context: &str) -> Result<NamePattern, LoadError> {
    NamePattern::new(value).map_err(|e| LoadError::Validation {
        context: context.to_string(),
        source: e,
    })
}

fn namespace(value: &str, context: &str) -> Result<Namespace, LoadError> {
    Namespace::new(value).map_err(|e| LoadError::Namespace {
        context: context.to_string(),
        source: e,
    })
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::parse(value).ok_or_else(|| LoadError::UnknownValue {
        context: format!("{context}.severity"),
        what: "severity",
        value: value.to_string(),
        expected: "error, warning, info",
    })
}
