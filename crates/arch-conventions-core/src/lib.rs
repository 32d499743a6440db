//! # arch-conventions-core
//!
//! Core engine for checking architectural conventions over a model of a
//! crate's types.
//!
//! This crate provides the building blocks for assembling and running
//! convention rules. It includes:
//!
//! - [`ClassModel`] and [`ClassModelProvider`] for the queryable type model
//! - [`ClassModelCache`] for memoized, shareable model imports
//! - [`ArchRule`] and [`RuleDescriptor`] for rules and their model resolution
//! - [`RuleFamily`] and [`ConfigurerRegistry`] for pluggable rule families
//! - [`Engine`] for assembling and checking everything
//!
//! ## Example
//!
//! ```ignore
//! use arch_conventions_core::{ClassModelCache, Engine, Namespace, SourceTreeProvider};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(SourceTreeProvider::new(".", "my_crate"));
//! let cache = Arc::new(ClassModelCache::new(provider));
//!
//! let engine = Engine::builder()
//!     .namespace(Namespace::new("my_crate")?)
//!     .cache(cache)
//!     .configure::<MyFamily, _>(|family| {
//!         family.types_should_not_match(".*Impl")?;
//!         Ok(())
//!     })?
//!     .build();
//!
//! engine.check()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod context;
mod descriptor;
mod engine;
mod error;
mod evaluator;
mod family;
mod model;
mod provider;
mod registry;
mod rule;
mod types;

/// Declarative rules loaded from TOML.
pub mod declarative;

/// Utility modules for syn-based model extraction.
pub mod utils;

pub use cache::ClassModelCache;
pub use config::{Config, ConfigError, FamilyConfig, SourceConfig, CONFIG_CANDIDATES};
pub use context::SourceFile;
pub use declarative::model::{NamePattern, TypeCondition, TypeRule, TypeSelector};
pub use declarative::{load_rules_from_toml, LoadRulesError};
pub use descriptor::{ResolutionContext, RuleConfiguration, RuleDescriptor};
pub use engine::{CheckSummary, Engine, EngineBuilder};
pub use error::{ConventionsError, ViolationError};
pub use evaluator::{Evaluation, Evaluator};
pub use family::{Configurer, RuleFamily, RuleSet};
pub use model::{ClassModel, ImportScope, ModelError, Namespace, TypeInfo, TypeKind};
pub use provider::{ClassModelProvider, ImportError, InMemoryProvider, SourceTreeProvider};
pub use registry::{ConfigurerContext, ConfigurerRegistry, Family, FamilyKey};
pub use rule::{ArchRule, SharedRule};
pub use types::{Location, Severity, Violation};
