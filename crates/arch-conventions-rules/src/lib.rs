//! # arch-conventions-rules
//!
//! Built-in rule families for arch-conventions.
//!
//! Each family is a [`RuleFamily`] resolved through the engine's registry,
//! so configuring it twice (directly and through a composite) reaches the
//! same instance.
//!
//! ## Available Rules
//!
//! | Code | Name | Family | Description |
//! |------|------|--------|-------------|
//! | AC101 | `no-impl-suffix` | `naming` | Forbids type names ending in `Impl` |
//! | AC102 | `no-interface-prefix` | `naming` | Forbids `I`-prefixed trait names |
//! | AC103 | (ad hoc) | `naming` | Name patterns and suffixes |
//! | AC201 | `errors-use-thiserror` | `derives` | Error-named types derive `thiserror::Error` |
//! | AC202 | `errors-derive-debug` | `derives` | `Error` types derive `Debug` |
//! | AC203 | (ad hoc) | `derives` | Required or forbidden derives |
//! | AC301 | `internal-not-public` | `visibility` | Nothing in `internal` modules is `pub` |
//! | AC302 | `public-api-namespace` | `visibility` | Public types live in the API namespace |
//! | AC303 | `exposed-namespace` | `visibility` | Every type in a namespace is `pub` |
//! | AC401 | `test-types-not-public` | `tests` | Test fixtures are not `pub` |
//! | AC402 | (ad hoc) | `tests` | Test type naming |
//!
//! ## Usage
//!
//! ```ignore
//! use arch_conventions_core::Engine;
//! use arch_conventions_rules::{NamingConventions, Preset};
//!
//! let engine = Preset::Recommended
//!     .apply(Engine::builder().namespace(ns).provider(provider))?
//!     .configure::<NamingConventions, _>(|naming| {
//!         naming.types_should_not_match(".*Manager")?;
//!         Ok(())
//!     })?
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Derive conventions.
pub mod derives;
/// Naming conventions.
pub mod naming;
mod presets;
mod recommended;
/// Test source conventions.
pub mod test_sources;
/// Visibility conventions.
pub mod visibility;

pub use derives::{DeriveConventions, RequireErrorDerive};
pub use naming::NamingConventions;
pub use presets::{family_key, Preset, FAMILY_NAMES};
pub use recommended::RecommendedConventions;
pub use test_sources::TestConventions;
pub use visibility::VisibilityConventions;

/// Re-export core types for convenience.
pub use arch_conventions_core::{ArchRule, RuleFamily, Severity, Violation};
