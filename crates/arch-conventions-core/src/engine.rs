//! Engine assembly and execution.

use crate::cache::ClassModelCache;
use crate::descriptor::{ResolutionContext, RuleConfiguration, RuleDescriptor};
use crate::error::ConventionsError;
use crate::evaluator::Evaluator;
use crate::family::RuleFamily;
use crate::model::{ClassModel, Namespace};
use crate::provider::ClassModelProvider;
use crate::registry::{ConfigurerContext, ConfigurerRegistry, Family, FamilyKey};
use crate::rule::{ArchRule, SharedRule};
use crate::types::{Severity, Violation};

use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

/// Builder for configuring an [`Engine`].
///
/// Families are created lazily on first reference and live in one registry
/// for the whole assembly session.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    global_namespace: Option<Namespace>,
    fail_on_empty: bool,
    fail_on: Severity,
    registry: Rc<ConfigurerRegistry>,
    rules: Vec<RuleDescriptor>,
    excluded_types: BTreeSet<String>,
    cache: Option<Arc<ClassModelCache>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace used by rules that do not declare one.
    #[must_use]
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.global_namespace = Some(namespace);
        self
    }

    /// Treats rules that select no types as violated (default: false).
    #[must_use]
    pub fn fail_on_empty(mut self, fail: bool) -> Self {
        self.fail_on_empty = fail;
        self
    }

    /// Sets the lowest severity that fails a check (default: error).
    #[must_use]
    pub fn fail_on(mut self, severity: Severity) -> Self {
        self.fail_on = severity;
        self
    }

    /// Adds an ad-hoc rule with the default configuration.
    #[must_use]
    pub fn rule<R: ArchRule + 'static>(self, rule: R) -> Self {
        self.rule_descriptor(RuleDescriptor::of(rule))
    }

    /// Adds a shared ad-hoc rule with the default configuration.
    #[must_use]
    pub fn shared_rule(self, rule: SharedRule) -> Self {
        self.rule_descriptor(RuleDescriptor::new(rule, RuleConfiguration::default()))
    }

    /// Adds an ad-hoc rule descriptor.
    #[must_use]
    pub fn rule_descriptor(mut self, descriptor: RuleDescriptor) -> Self {
        self.rules.push(descriptor);
        self
    }

    /// Adds several ad-hoc rule descriptors, in order.
    #[must_use]
    pub fn rules<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = RuleDescriptor>,
    {
        self.rules.extend(descriptors);
        self
    }

    /// Excludes a type by full name from every namespace-resolved model.
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
        self.excluded_types
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Uses a shared class model cache.
    #[must_use]
    pub fn cache(mut self, cache: Arc<ClassModelCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses a private cache in front of `provider`.
    #[must_use]
    pub fn provider(self, provider: Arc<dyn ClassModelProvider>) -> Self {
        self.cache(Arc::new(ClassModelCache::new(provider)))
    }

    /// The registry shared by every family of this builder.
    #[must_use]
    pub fn registry(&self) -> &Rc<ConfigurerRegistry> {
        &self.registry
    }

    /// Returns the canonical instance of family `T`, creating it if needed.
    pub fn family<T: RuleFamily>(&self) -> Family<T> {
        ConfigurerContext::new(Rc::clone(&self.registry)).family::<T>()
    }

    /// Runs `f` on the canonical instance of family `T`.
    ///
    /// # Errors
    ///
    /// Returns the callback's error unchanged.
    pub fn configure<T, F>(self, f: F) -> Result<Self, ConventionsError>
    where
        T: RuleFamily,
        F: FnOnce(&mut T) -> Result<(), ConventionsError>,
    {
        self.family::<T>().configure(f)?;
        Ok(self)
    }

    /// Disables a family and its nested families, if registered.
    #[must_use]
    pub fn disable_family(self, key: &FamilyKey) -> Self {
        self.registry.disable(key);
        self
    }

    /// Builds the engine.
    ///
    /// Rules run in family registration order, each family's rules in
    /// addition order, then ad-hoc rules in addition order.
    #[must_use]
    pub fn build(self) -> Engine {
        let mut rules = self.registry.flatten();
        debug!(
            "Flattened {} family rule(s) from {} families, {} ad-hoc rule(s)",
            rules.len(),
            self.registry.len(),
            self.rules.len()
        );
        rules.extend(self.rules);

        Engine {
            global_namespace: self.global_namespace,
            excluded_types: self.excluded_types,
            rules,
            evaluator: Evaluator::new(self.fail_on_empty, self.fail_on),
            cache: self.cache,
        }
    }
}

/// Summary of a passing check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of rules evaluated.
    pub rules_checked: usize,
    /// Number of selected types across all rules.
    pub types_evaluated: usize,
    /// Violations below the failure threshold.
    pub findings: Vec<Violation>,
}

impl CheckSummary {
    /// Returns true if no finding was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// An immutable set of rules ready to check.
///
/// Use [`Engine::builder()`] to construct an instance.
#[derive(Debug)]
pub struct Engine {
    global_namespace: Option<Namespace>,
    excluded_types: BTreeSet<String>,
    rules: Vec<RuleDescriptor>,
    evaluator: Evaluator,
    cache: Option<Arc<ClassModelCache>>,
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the rules in execution order.
    #[must_use]
    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    /// Returns the global namespace.
    #[must_use]
    pub fn global_namespace(&self) -> Option<&Namespace> {
        self.global_namespace.as_ref()
    }

    /// Returns the globally excluded type names.
    #[must_use]
    pub fn excluded_types(&self) -> &BTreeSet<String> {
        &self.excluded_types
    }

    /// Checks every rule against its resolved model.
    ///
    /// # Errors
    ///
    /// Returns the first error: a configuration or import error while
    /// resolving, or the first rule's violation. Later rules are not run.
    pub fn check(&self) -> Result<CheckSummary, ConventionsError> {
        self.run(None)
    }

    /// Checks every rule against `model` unless it carries its own.
    ///
    /// # Errors
    ///
    /// Same as [`check`](Self::check).
    pub fn check_model(
        &self,
        model: impl Into<Arc<ClassModel>>,
    ) -> Result<CheckSummary, ConventionsError> {
        let model = model.into();
        self.run(Some(&model))
    }

    fn run(&self, supplied: Option<&Arc<ClassModel>>) -> Result<CheckSummary, ConventionsError> {
        info!("Checking {} rule(s)", self.rules.len());

        let ctx = ResolutionContext {
            global_namespace: self.global_namespace.as_ref(),
            global_excludes: &self.excluded_types,
            cache: self.cache.as_deref(),
        };

        let mut summary = CheckSummary::default();
        for descriptor in &self.rules {
            debug!("Checking rule `{}`", descriptor.rule().name());
            let evaluation = descriptor.execute(supplied, &ctx, &self.evaluator)?;
            summary.rules_checked += 1;
            summary.types_evaluated += evaluation.matched;
            summary.findings.extend(evaluation.findings);
        }

        info!(
            "Check complete: {} rule(s), {} type(s), {} finding(s)",
            summary.rules_checked,
            summary.types_evaluated,
            summary.findings.len()
        );

        Ok(summary)
    }
}
