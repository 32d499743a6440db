//! Declarative type rules driven by TOML configuration.
//!
//! This module provides selector/condition rules that can be declared in
//! `conventions.toml` without writing Rust rule code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! TypeRule + RuleConfiguration (pure domain model)
//!   ↓ load_rules_from_toml()
//! Vec<RuleDescriptor>
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;

use crate::descriptor::RuleDescriptor;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and creates all declared rules, in file order.
///
/// Returns `Ok(vec![])` if no `[[rules]]` tables are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<RuleDescriptor>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    Ok(loader::load(dto)?)
}
