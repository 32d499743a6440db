//! Per-rule model resolution.
//!
//! A [`RuleDescriptor`] binds one rule to a [`RuleConfiguration`] that says
//! where the rule's class model comes from. Resolution is evaluated in a
//! fixed order:
//!
//! 1. an explicit model carried by the configuration, used verbatim;
//! 2. a model supplied by the caller of `check`, used verbatim;
//! 3. otherwise the rule's namespace, falling back to the global namespace,
//!    fetched from the [`ClassModelCache`] for the rule's import scope and
//!    filtered by the union of rule-level and global excluded type names.
//!
//! Exclusions never apply to the first two branches.

use crate::cache::ClassModelCache;
use crate::error::ConventionsError;
use crate::evaluator::{Evaluation, Evaluator};
use crate::model::{ClassModel, ImportScope, Namespace};
use crate::rule::{ArchRule, SharedRule};

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Where a rule's class model comes from and which types it skips.
///
/// Built once when a rule is declared and not changed afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleConfiguration {
    explicit_model: Option<Arc<ClassModel>>,
    namespace: Option<Namespace>,
    import_scope: ImportScope,
    excluded_types: BTreeSet<String>,
}

impl RuleConfiguration {
    /// Creates a configuration that inherits the global namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the rule against exactly this model.
    #[must_use]
    pub fn with_model(mut self, model: Arc<ClassModel>) -> Self {
        self.explicit_model = Some(model);
        self
    }

    /// Scopes the rule to a namespace, overriding the global one.
    #[must_use]
    pub fn in_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Sets which source artifacts the rule sees.
    #[must_use]
    pub fn import_scope(mut self, scope: ImportScope) -> Self {
        self.import_scope = scope;
        self
    }

    /// Excludes a type by full name.
    #[must_use]
    pub fn exclude_type(mut self, full_name: impl Into<String>) -> Self {
        self.excluded_types.insert(full_name.into());
        self
    }

    /// Excludes several types by full name.
    #[must_use]
    pub fn exclude_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// The explicit model, if any.
    #[must_use]
    pub fn explicit_model(&self) -> Option<&Arc<ClassModel>> {
        self.explicit_model.as_ref()
    }

    /// The rule-level namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    /// The configured import scope.
    #[must_use]
    pub fn scope(&self) -> ImportScope {
        self.import_scope
    }

    /// Rule-level excluded type names.
    #[must_use]
    pub fn excluded_types(&self) -> &BTreeSet<String> {
        &self.excluded_types
    }
}

/// Global inputs to resolution, owned by the engine.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// Namespace used by rules that do not declare one.
    pub global_namespace: Option<&'a Namespace>,
    /// Type names excluded from every namespace-resolved model.
    pub global_excludes: &'a BTreeSet<String>,
    /// Source of namespace-resolved models.
    pub cache: Option<&'a ClassModelCache>,
}

/// One rule bound to its resolution configuration.
#[derive(Clone)]
pub struct RuleDescriptor {
    rule: SharedRule,
    configuration: RuleConfiguration,
}

impl RuleDescriptor {
    /// Binds a rule to a configuration.
    #[must_use]
    pub fn new(rule: SharedRule, configuration: RuleConfiguration) -> Self {
        Self {
            rule,
            configuration,
        }
    }

    /// Binds a rule to the default configuration.
    #[must_use]
    pub fn of(rule: impl ArchRule + 'static) -> Self {
        Self::new(Arc::new(rule), RuleConfiguration::default())
    }

    /// The rule.
    #[must_use]
    pub fn rule(&self) -> &SharedRule {
        &self.rule
    }

    /// The resolution configuration.
    #[must_use]
    pub fn configuration(&self) -> &RuleConfiguration {
        &self.configuration
    }

    /// Resolves the class model this rule is evaluated against.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionsError::Configuration`] when neither a model nor a
    /// namespace is available, or when a namespace is known but no cache was
    /// configured. Provider failures surface as [`ConventionsError::Import`].
    pub fn resolve(
        &self,
        supplied: Option<&Arc<ClassModel>>,
        ctx: &ResolutionContext<'_>,
    ) -> Result<Arc<ClassModel>, ConventionsError> {
        if let Some(model) = &self.configuration.explicit_model {
            debug!("Rule `{}` uses its explicit model", self.rule.name());
            return Ok(Arc::clone(model));
        }

        if let Some(model) = supplied {
            debug!("Rule `{}` uses the supplied model", self.rule.name());
            return Ok(Arc::clone(model));
        }

        let namespace = self
            .configuration
            .namespace
            .as_ref()
            .or(ctx.global_namespace)
            .ok_or_else(|| ConventionsError::Configuration {
                rule: self.rule.name().to_string(),
                message: "no namespace set on the rule or globally, and no class model supplied"
                    .to_string(),
            })?;

        let excluded: BTreeSet<&str> = self
            .configuration
            .excluded_types
            .iter()
            .chain(ctx.global_excludes)
            .map(String::as_str)
            .collect();

        let cache = ctx.cache.ok_or_else(|| ConventionsError::Configuration {
            rule: self.rule.name().to_string(),
            message: format!("namespace `{namespace}` requires a class model cache"),
        })?;

        let model = cache.from(namespace, self.configuration.import_scope)?;
        debug!(
            "Rule `{}` resolved `{}` ({}), {} excluded name(s)",
            self.rule.name(),
            namespace,
            self.configuration.import_scope,
            excluded.len()
        );

        if excluded.is_empty() {
            Ok(model)
        } else {
            Ok(Arc::new(
                model.filter(|ty| !excluded.contains(ty.full_name())),
            ))
        }
    }

    /// Resolves the model and evaluates the rule against it.
    ///
    /// # Errors
    ///
    /// Returns resolution errors, or the evaluator's violation.
    pub fn execute(
        &self,
        supplied: Option<&Arc<ClassModel>>,
        ctx: &ResolutionContext<'_>,
        evaluator: &Evaluator,
    ) -> Result<Evaluation, ConventionsError> {
        let model = self.resolve(supplied, ctx)?;
        Ok(evaluator.evaluate(self.rule.as_ref(), &model)?)
    }
}

impl std::fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("rule", &self.rule.name())
            .field("configuration", &self.configuration)
            .finish()
    }
}
