//! Conventions for types declared in test sources.
//!
//! Every rule of this family imports with [`ImportScope::TestsOnly`], so it
//! sees `#[cfg(test)]` modules and integration test files, and nothing else.

use arch_conventions_core::{
    ConfigurerContext, ConventionsError, ImportScope, NamePattern, Namespace, RuleFamily, RuleSet,
    TypeCondition, TypeRule, TypeSelector,
};

/// Rule code for test-types-not-public.
pub const TEST_TYPES_NOT_PUBLIC: &str = "AC401";

/// Rule code for test type naming.
pub const TEST_TYPE_NAMING: &str = "AC402";

/// Rules about test-only types.
#[derive(Debug)]
pub struct TestConventions {
    rules: RuleSet,
}

impl RuleFamily for TestConventions {
    const NAME: &'static str = "tests";

    fn new(context: ConfigurerContext) -> Self {
        let mut rules = RuleSet::new(context);
        rules.set_import_scope(ImportScope::TestsOnly);
        Self { rules }
    }

    fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    fn rule_set_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }
}

impl TestConventions {
    /// Scopes rules added from now on to `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if `namespace` is not a valid module path.
    pub fn in_namespace(&mut self, namespace: &str) -> Result<&mut Self, ConventionsError> {
        self.rules.set_namespace(Namespace::new(namespace)?);
        Ok(self)
    }

    /// Test fixtures should not be `pub`.
    pub fn types_not_public(&mut self) -> &mut Self {
        let rule = TypeRule::new("test-types-not-public", TypeCondition::NotBePublic)
            .with_code(TEST_TYPES_NOT_PUBLIC)
            .because("test fixtures are not part of any API");
        self.rules.add(rule);
        self
    }

    /// Test types matching `selection` should not start with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if `selection` is not a valid regex.
    pub fn matching_should_not_start_with(
        &mut self,
        selection: &str,
        prefix: &str,
    ) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "test-type-prefix",
            TypeCondition::NotHaveSimpleNameStartingWith(prefix.to_string()),
        )
        .that(TypeSelector::NameMatches(NamePattern::new(selection)?))
        .with_code(TEST_TYPE_NAMING);
        self.rules.add(rule);
        Ok(self)
    }

    /// Test doubles (types matching `selection`) should start with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if `selection` is not a valid regex.
    pub fn matching_should_start_with(
        &mut self,
        selection: &str,
        prefix: &str,
    ) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "test-double-prefix",
            TypeCondition::HaveSimpleNameStartingWith(prefix.to_string()),
        )
        .that(TypeSelector::NameMatches(NamePattern::new(selection)?))
        .with_code(TEST_TYPE_NAMING);
        self.rules.add(rule);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conventions_core::{TypeInfo, TypeKind};

    #[test]
    fn rules_import_test_sources_only() {
        let mut tests = TestConventions::new(ConfigurerContext::default());
        tests.types_not_public();

        let config = tests.rules.descriptors()[0].configuration();
        assert_eq!(config.scope(), ImportScope::TestsOnly);
    }

    #[test]
    fn naming_rules_check_simple_names() {
        let mut tests = TestConventions::new(ConfigurerContext::default());
        tests
            .matching_should_start_with(".*(?:Fake|Stub)", "Fake")
            .unwrap()
            .matching_should_not_start_with(".*", "Test")
            .unwrap();
        let rules = tests.rules.descriptors();

        let stub = TypeInfo::new("pkg::tests::OrdersStub", TypeKind::Struct);
        assert!(rules[0].rule().selects(&stub));
        assert!(rules[0].rule().check(&stub).is_some());
        assert!(rules[0]
            .rule()
            .check(&TypeInfo::new("pkg::tests::FakeOrders", TypeKind::Struct))
            .is_none());

        assert!(rules[1]
            .rule()
            .check(&TypeInfo::new("pkg::tests::TestHarness", TypeKind::Struct))
            .is_some());
    }
}
