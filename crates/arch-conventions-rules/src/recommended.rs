//! Composite family bundling the catalog.

use crate::derives::DeriveConventions;
use crate::naming::NamingConventions;
use crate::test_sources::TestConventions;
use crate::visibility::VisibilityConventions;

use arch_conventions_core::{
    ConfigurerContext, ConventionsError, FamilyKey, RuleFamily, RuleSet, Severity,
};
use tracing::debug;

/// Owns the naming, derive, visibility and test families.
///
/// The nested families are the same instances the engine hands out for
/// their own types, so rules added here and rules added directly to, say,
/// [`NamingConventions`] end up in one list. Disabling this family disables
/// all four.
#[derive(Debug)]
pub struct RecommendedConventions {
    rules: RuleSet,
}

impl RuleFamily for RecommendedConventions {
    const NAME: &'static str = "recommended";

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

    fn nested_families() -> Vec<FamilyKey> {
        vec![
            FamilyKey::of::<NamingConventions>(),
            FamilyKey::of::<DeriveConventions>(),
            FamilyKey::of::<VisibilityConventions>(),
            FamilyKey::of::<TestConventions>(),
        ]
    }
}

impl RecommendedConventions {
    /// Adds only the naming rules.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested families.
    pub fn minimal(&mut self) -> Result<&mut Self, ConventionsError> {
        debug!("Applying minimal conventions");
        self.rules.nested::<NamingConventions>().configure(|naming| {
            naming.no_impl_suffix()?;
            Ok::<_, ConventionsError>(())
        })?;
        Ok(self)
    }

    /// Adds naming, error derive and test fixture rules.
    ///
    /// `thiserror` findings are warnings.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested families.
    pub fn recommended(&mut self) -> Result<&mut Self, ConventionsError> {
        debug!("Applying recommended conventions");
        self.naming_and_errors(Severity::Warning)?;
        self.rules
            .nested::<TestConventions>()
            .configure(|tests| {
                tests.types_not_public();
            });
        Ok(self)
    }

    /// Everything in [`recommended`](Self::recommended) as errors, plus
    /// visibility of `internal` modules.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested families.
    pub fn strict(&mut self) -> Result<&mut Self, ConventionsError> {
        debug!("Applying strict conventions");
        self.naming_and_errors(Severity::Error)?;
        self.rules
            .nested::<VisibilityConventions>()
            .configure(|visibility| {
                visibility.internal_not_public()?;
                Ok::<_, ConventionsError>(())
            })?;
        self.rules
            .nested::<TestConventions>()
            .configure(|tests| {
                tests.types_not_public();
            });
        Ok(self)
    }

    fn naming_and_errors(&mut self, thiserror: Severity) -> Result<(), ConventionsError> {
        self.rules.nested::<NamingConventions>().configure(|naming| {
            naming.no_impl_suffix()?.no_interface_prefix()?;
            Ok::<_, ConventionsError>(())
        })?;
        self.rules
            .nested::<DeriveConventions>()
            .configure(|derives| {
                derives.errors_use_thiserror(thiserror).errors_derive_debug();
            });
        Ok(())
    }
}
