//! # arch-conventions
//!
//! Architecture conventions for Rust crates, checked over a model of the
//! crate's types.
//!
//! This is the main facade crate that re-exports the engine and the rule
//! catalog.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! arch-conventions = "0.2"
//! ```
//!
//! ```rust,ignore
//! // tests/architecture.rs
//! arch_conventions::check!();
//! ```
//!
//! This runs the conventions as part of `cargo test`. Configure via
//! `conventions.toml`:
//!
//! ```toml
//! preset = "recommended"
//! namespace = "my_crate"
//!
//! [families.visibility]
//! enabled = false
//!
//! [[rules]]
//! name = "no-manager-suffix"
//! resides-in = "my_crate::domain"
//! must-not-match = ".*Manager"
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use arch_conventions::rules::{NamingConventions, Preset};
//! use arch_conventions::{Engine, Namespace, SourceTreeProvider};
//! use std::sync::Arc;
//!
//! let engine = Preset::Strict
//!     .apply(
//!         Engine::builder()
//!             .namespace(Namespace::new("my_crate")?)
//!             .provider(Arc::new(SourceTreeProvider::new(".", "my_crate"))),
//!     )?
//!     .configure::<NamingConventions, _>(|naming| {
//!         naming.in_namespace("my_crate::domain")?.types_should_not_match(".*Dto")?;
//!         Ok(())
//!     })?
//!     .build();
//!
//! let summary = engine.check()?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use arch_conventions_core::*;

/// Built-in rule families and presets.
pub mod rules {
    pub use arch_conventions_rules::*;
}

mod runner;

pub use runner::{engine_from_toml, Overrides};

#[doc(hidden)]
pub mod __internal {
    pub use crate::runner::{run_check, run_check_args};
}

/// Generates a `#[test]` that checks the crate's conventions.
///
/// Accepts optional `preset = "..."`, `config = "..."` and `fail_on = "..."`
/// arguments in any order; each overrides the config file.
///
/// ```rust,ignore
/// arch_conventions::check!();
/// arch_conventions::check!(preset = "strict", fail_on = "warning");
/// ```
#[macro_export]
macro_rules! check {
    ($($key:ident = $value:literal),* $(,)?) => {
        #[test]
        fn architecture_conventions() {
            $crate::__internal::run_check_args(&[$((stringify!($key), $value)),*]);
        }
    };
}
