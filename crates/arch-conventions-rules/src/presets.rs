//! Rule presets for common configurations.

use crate::{
    DeriveConventions, NamingConventions, RecommendedConventions, TestConventions,
    VisibilityConventions,
};
use arch_conventions_core::{ConventionsError, EngineBuilder, FamilyKey, RuleFamily};

/// Preset configurations for arch-conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Strict rules for maximum safety.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Parses a preset name.
    ///
    /// `"none"` parses to `Ok(None)`; unknown names are an error.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error for unknown names.
    pub fn parse(name: &str) -> Result<Option<Self>, ConventionsError> {
        match name {
            "recommended" => Ok(Some(Self::Recommended)),
            "strict" => Ok(Some(Self::Strict)),
            "minimal" => Ok(Some(Self::Minimal)),
            "none" => Ok(None),
            other => Err(ConventionsError::invalid_argument(
                "preset",
                format!("unknown preset `{other}`, expected: recommended, strict, minimal, none"),
            )),
        }
    }

    /// The name used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Adds this preset's rules to `builder` through [`RecommendedConventions`].
    ///
    /// # Errors
    ///
    /// Propagates errors from the families.
    pub fn apply(self, builder: EngineBuilder) -> Result<EngineBuilder, ConventionsError> {
        builder.configure::<RecommendedConventions, _>(|conventions| {
            match self {
                Self::Recommended => conventions.recommended()?,
                Self::Strict => conventions.strict()?,
                Self::Minimal => conventions.minimal()?,
            };
            Ok(())
        })
    }
}

/// Names of the catalog families, as used under `[families.*]`.
pub const FAMILY_NAMES: &[&str] = &[
    NamingConventions::NAME,
    DeriveConventions::NAME,
    VisibilityConventions::NAME,
    TestConventions::NAME,
    RecommendedConventions::NAME,
];

/// Looks up a catalog family by its configuration name.
#[must_use]
pub fn family_key(name: &str) -> Option<FamilyKey> {
    match name {
        NamingConventions::NAME => Some(FamilyKey::of::<NamingConventions>()),
        DeriveConventions::NAME => Some(FamilyKey::of::<DeriveConventions>()),
        VisibilityConventions::NAME => Some(FamilyKey::of::<VisibilityConventions>()),
        TestConventions::NAME => Some(FamilyKey::of::<TestConventions>()),
        RecommendedConventions::NAME => Some(FamilyKey::of::<RecommendedConventions>()),
        _ => None,
    }
}
