//! Visibility conventions: what a crate exposes and what it keeps inside.

use arch_conventions_core::{
    ConfigurerContext, ConventionsError, NamePattern, Namespace, RuleFamily, RuleSet,
    TypeCondition, TypeRule, TypeSelector,
};

/// Rule code for internal-not-public.
pub const INTERNAL_NOT_PUBLIC: &str = "AC301";

/// Rule code for public types outside the API namespace.
pub const PUBLIC_API_NAMESPACE: &str = "AC302";

/// Rule code for namespaces whose types must all be public.
pub const EXPOSED_NAMESPACE: &str = "AC303";

const INTERNAL_MODULE: &str = r"(?:.*::)?internal::.*";

/// Rules about `pub` visibility.
#[derive(Debug)]
pub struct VisibilityConventions {
    rules: RuleSet,
}

impl RuleFamily for VisibilityConventions {
    const NAME: &'static str = "visibility";

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

impl VisibilityConventions {
    /// Scopes rules added from now on to `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if `namespace` is not a valid module path.
    pub fn in_namespace(&mut self, namespace: &str) -> Result<&mut Self, ConventionsError> {
        self.rules.set_namespace(Namespace::new(namespace)?);
        Ok(self)
    }

    /// Types inside any `internal` module should not be `pub`.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the pattern is fixed.
    pub fn internal_not_public(&mut self) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new("internal-not-public", TypeCondition::NotBePublic)
            .that(TypeSelector::NameMatches(NamePattern::new(INTERNAL_MODULE)?))
            .with_code(INTERNAL_NOT_PUBLIC)
            .because("prefer `pub(crate)` for internals");
        self.rules.add(rule);
        Ok(self)
    }

    /// Public types should live in `api`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api` is not a valid module path.
    pub fn public_types_reside_in(&mut self, api: &str) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new(
            "public-api-namespace",
            TypeCondition::ResideIn(Namespace::new(api)?),
        )
        .that(TypeSelector::Public)
        .with_code(PUBLIC_API_NAMESPACE);
        self.rules.add(rule);
        Ok(self)
    }

    /// Every type in `namespace` should be `pub`.
    ///
    /// # Errors
    ///
    /// Returns an error if `namespace` is not a valid module path.
    pub fn exposed(&mut self, namespace: &str) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new("exposed-namespace", TypeCondition::BePublic)
            .that(TypeSelector::ResideIn(Namespace::new(namespace)?))
            .with_code(EXPOSED_NAMESPACE);
        self.rules.add(rule);
        Ok(self)
    }

    /// No type in `namespace` should be `pub`.
    ///
    /// # Errors
    ///
    /// Returns an error if `namespace` is not a valid module path.
    pub fn hidden(&mut self, namespace: &str) -> Result<&mut Self, ConventionsError> {
        let rule = TypeRule::new("hidden-namespace", TypeCondition::NotBePublic)
            .that(TypeSelector::ResideIn(Namespace::new(namespace)?))
            .with_code(INTERNAL_NOT_PUBLIC);
        self.rules.add(rule);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conventions_core::{TypeInfo, TypeKind};

    fn family() -> VisibilityConventions {
        VisibilityConventions::new(ConfigurerContext::default())
    }

    #[test]
    fn internal_modules_at_any_depth_are_selected() {
        let mut visibility = family();
        visibility.internal_not_public().unwrap();
        let rule = visibility.rules.descriptors()[0].rule();

        let nested = TypeInfo::new("pkg::db::internal::Pool", TypeKind::Struct).public();
        assert!(rule.selects(&nested));
        assert_eq!(
            rule.check(&nested).as_deref(),
            Some("type `pkg::db::internal::Pool` should not be public: prefer `pub(crate)` for internals")
        );
        assert!(!rule.selects(&TypeInfo::new("pkg::internals::Pool", TypeKind::Struct)));
    }

    #[test]
    fn public_types_outside_api_are_flagged() {
        let mut visibility = family();
        visibility.public_types_reside_in("pkg::api").unwrap();
        let rule = visibility.rules.descriptors()[0].rule();

        let leaked = TypeInfo::new("pkg::db::Row", TypeKind::Struct).public();
        let private = TypeInfo::new("pkg::db::Cursor", TypeKind::Struct);
        assert!(rule.check(&leaked).is_some());
        assert!(!rule.selects(&private));
        assert!(rule
            .check(&TypeInfo::new("pkg::api::Client", TypeKind::Struct).public())
            .is_none());
    }

    #[test]
    fn exposed_and_hidden_are_opposites() {
        let mut visibility = family();
        visibility
            .exposed("pkg::api")
            .unwrap()
            .hidden("pkg::detail")
            .unwrap();
        let rules = visibility.rules.descriptors();

        let api = TypeInfo::new("pkg::api::Client", TypeKind::Struct);
        let detail = TypeInfo::new("pkg::detail::Client", TypeKind::Struct).public();
        assert!(rules[0].rule().check(&api).is_some());
        assert!(!rules[0].rule().selects(&detail));
        assert!(rules[1].rule().check(&detail).is_some());
    }
}
