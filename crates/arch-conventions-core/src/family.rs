//! Rule families: named groups of rules sharing one configuration context.

use crate::descriptor::{RuleConfiguration, RuleDescriptor};
use crate::model::{ClassModel, ImportScope, Namespace};
use crate::registry::{ConfigurerContext, Family, FamilyKey};
use crate::rule::ArchRule;

use std::rc::Rc;
use std::sync::Arc;

/// Object-safe view of a family stored in the registry.
pub trait Configurer {
    /// Display name of the family.
    fn family_name(&self) -> &'static str;

    /// The family's rules, in the order they were added.
    fn rules(&self) -> &[RuleDescriptor];

    /// Clears the family's rules and those of its declared nested families.
    fn disable(&mut self);
}

/// A rule family type.
///
/// Implementors own a [`RuleSet`] and expose fluent methods that add rules
/// to it. Nested families are reached through [`RuleSet::nested`] and share
/// the registry, so the same nested family type is one instance no matter
/// which parent resolves it.
///
/// # Example
///
/// ```ignore
/// pub struct NamingConventions {
///     rules: RuleSet,
/// }
///
/// impl RuleFamily for NamingConventions {
///     const NAME: &'static str = "naming";
///
///     fn new(context: ConfigurerContext) -> Self {
///         Self { rules: RuleSet::new(context) }
///     }
///
///     fn rule_set(&self) -> &RuleSet { &self.rules }
///     fn rule_set_mut(&mut self) -> &mut RuleSet { &mut self.rules }
/// }
/// ```
pub trait RuleFamily: Sized + 'static {
    /// Stable kebab-case family name, used in configuration files.
    const NAME: &'static str;

    /// Creates an empty family.
    ///
    /// Must not add rules or touch the registry: it may run for a candidate
    /// that is then discarded.
    fn new(context: ConfigurerContext) -> Self;

    /// The family's rule state.
    fn rule_set(&self) -> &RuleSet;

    /// The family's rule state, mutably.
    fn rule_set_mut(&mut self) -> &mut RuleSet;

    /// Nested family types this family owns; disabled along with it.
    fn nested_families() -> Vec<FamilyKey> {
        Vec::new()
    }
}

impl<T: RuleFamily> Configurer for T {
    fn family_name(&self) -> &'static str {
        T::NAME
    }

    fn rules(&self) -> &[RuleDescriptor] {
        self.rule_set().descriptors()
    }

    fn disable(&mut self) {
        self.rule_set_mut().clear();
        let registry = Rc::clone(self.rule_set().context().registry());
        for key in T::nested_families() {
            registry.disable(&key);
        }
    }
}

/// Rule list plus the defaults applied to rules as they are added.
#[derive(Debug, Clone)]
pub struct RuleSet {
    context: ConfigurerContext,
    descriptors: Vec<RuleDescriptor>,
    defaults: RuleConfiguration,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new(context: ConfigurerContext) -> Self {
        Self {
            context,
            descriptors: Vec::new(),
            defaults: RuleConfiguration::default(),
        }
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &ConfigurerContext {
        &self.context
    }

    /// Rules added so far.
    #[must_use]
    pub fn descriptors(&self) -> &[RuleDescriptor] {
        &self.descriptors
    }

    /// Configuration captured by rules added from now on.
    #[must_use]
    pub fn defaults(&self) -> &RuleConfiguration {
        &self.defaults
    }

    /// Scopes rules added from now on to `namespace`.
    pub fn set_namespace(&mut self, namespace: Namespace) -> &mut Self {
        self.defaults = std::mem::take(&mut self.defaults).in_namespace(namespace);
        self
    }

    /// Sets the import scope for rules added from now on.
    pub fn set_import_scope(&mut self, scope: ImportScope) -> &mut Self {
        self.defaults = std::mem::take(&mut self.defaults).import_scope(scope);
        self
    }

    /// Excludes a type from rules added from now on.
    pub fn exclude_type(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.defaults = std::mem::take(&mut self.defaults).exclude_type(full_name);
        self
    }

    /// Evaluates rules added from now on against `model`.
    pub fn set_model(&mut self, model: Arc<ClassModel>) -> &mut Self {
        self.defaults = std::mem::take(&mut self.defaults).with_model(model);
        self
    }

    /// Adds a rule bound to the current defaults.
    pub fn add(&mut self, rule: impl ArchRule + 'static) -> &mut Self {
        let descriptor = RuleDescriptor::new(Arc::new(rule), self.defaults.clone());
        self.push(descriptor)
    }

    /// Adds a prepared descriptor as is.
    pub fn push(&mut self, descriptor: RuleDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Removes every rule.
    pub fn clear(&mut self) {
        self.descriptors.clear();
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no rule was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Resolves a nested family through the shared registry.
    pub fn nested<N: RuleFamily>(&self) -> Family<N> {
        self.context.family::<N>()
    }

    /// Disables a nested family if it was ever resolved.
    pub fn disable_nested<N: RuleFamily>(&self) {
        self.context.registry().disable(&FamilyKey::of::<N>());
    }
}
