//! Naming conventions for types.
//!
//! # Rationale
//!
//! Type names should describe the concept, not how it is built:
//! - `SqlOrderRepositoryImpl` says nothing `SqlOrderRepository` does not
//! - `IRepository` carries a prefix Rust traits do not need
//!
//! # Examples
//!
//! ```ignore
//! engine_builder.configure::<NamingConventions, _>(|naming| {
//!     naming
//!         .in_namespace("my_crate::domain")?
//!         .no_impl_suffix()?
//!         .types_should_not_match(".*Dto")?;
//!     Ok(())
//! })?;
//! ```

use arch_conventions_core::{
    ConfigurerContext, ConventionsError, NamePattern, Namespace, RuleFamily, RuleSet,
    TypeCondition, TypeKind, TypeRule, TypeSelector,
};

/// Rule code for no-impl-suffix.
pub const NO_IMPL_SUFFIX: &str = "AC101";

/// Rule code for no-interface-prefix.
pub const NO_INTERFACE_PREFIX: &str = "AC102";

/// Rule code for ad-hoc name patterns.
pub const NAME_PATTERN: &str = "AC103";

const INTERFACE_PREFIX: &str = r"(?:.*::)?I[A-Z][A-Za-z0-9_]*";

/// Rules about type names.
#[derive(Debug)]
pub struct NamingConventions {
    rules: RuleSet,
}

impl RuleFamily for NamingConventions {
    const NAME: &'static str = "naming";

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

impl NamingConventions {
    /// Scopes rules added from now on to `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if `namespace` is not a valid module path.
    pub fn in_namespace(&mut self, namespace: &str) -> Result<&mut Self, ConventionsError> {
        self.rules.set_namespace(Namespace::new(namespace)?);
        Ok(self)
    }

    /// Excludes a type from rules added from now on.
    pub fn except(&mut self, full_name: &str) -> &mut Self {
        self.rules.exclude_type(full_name);
        self
    }

    /// Types should not be named `...Impl`.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the pattern is fixed.
    pub fn no_impl_suffix(&mut self) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "no-impl-suffix",
            TypeCondition::NotHaveNameMatching(NamePattern::new(".*Impl")?),
        )
        .with_code(NO_IMPL_SUFFIX)
        .because("name the concept, not the implementation");
        self.rules.add(rule);
        Ok(self)
    }

    /// Traits should not carry an `I` prefix (`IRepository`).
    ///
    /// # Errors
    ///
    /// Never fails in practice; the pattern is fixed.
    pub fn no_interface_prefix(&mut self) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "no-interface-prefix",
            TypeCondition::NotHaveNameMatching(NamePattern::new(INTERFACE_PREFIX)?),
        )
        .that(TypeSelector::Kind(TypeKind::Trait))
        .with_code(NO_INTERFACE_PREFIX);
        self.rules.add(rule);
        Ok(self)
    }

    /// Every type's full name should match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regex.
    pub fn types_should_match(&mut self, pattern: &str) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "types-should-match",
            TypeCondition::HaveNameMatching(NamePattern::new(pattern)?),
        )
        .with_code(NAME_PATTERN);
        self.rules.add(rule);
        Ok(self)
    }

    /// No type's full name should match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regex.
    pub fn types_should_not_match(
        &mut self,
        pattern: &str,
    ) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "types-should-not-match",
            TypeCondition::NotHaveNameMatching(NamePattern::new(pattern)?),
        )
        .with_code(NAME_PATTERN);
        self.rules.add(rule);
        Ok(self)
    }

    /// Types whose full name matches `selection` should end with `suffix`.
    ///
    /// # Errors
    ///
    /// Returns an error if `selection` is not a valid regex.
    pub fn matching_should_end_with(
        &mut self,
        selection: &str,
        suffix: &str,
    ) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "suffix",
            TypeCondition::HaveSimpleNameEndingWith(suffix.to_string()),
        )
        .that(TypeSelector::NameMatches(NamePattern::new(selection)?))
        .with_code(NAME_PATTERN);
        self.rules.add(rule);
        Ok(self)
    }
}
