//! Config-driven runner for `check!()` integration.
//!
//! [`run_check`] is `#[doc(hidden)]` and called by the test function that
//! `arch_conventions::check!()` generates. [`engine_from_toml`] is the
//! panic-free part, usable on its own.

use arch_conventions_core::{
    load_rules_from_toml, Config, ConventionsError, Engine, Namespace, Severity,
    SourceTreeProvider, CONFIG_CANDIDATES,
};
use arch_conventions_rules::{family_key, Preset};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Explicit arguments that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    /// Preset name (`recommended`, `strict`, `minimal`, `none`).
    pub preset: Option<&'a str>,
    /// Severity threshold (`error`, `warning`, `info`).
    pub fail_on: Option<&'a str>,
}

/// Runs the configured conventions as part of `cargo test`.
///
/// Called by the `check!()` macro-generated test function.
/// Panics with a formatted report if a rule is violated.
///
/// # Panics
///
/// Panics if a rule is violated at or above `fail_on` severity, or if the
/// configuration cannot be read, parsed or resolved.
pub fn run_check(preset: Option<&str>, config_path: Option<&str>, fail_on: Option<&str>) {
    let root = find_project_root();
    let content = read_config_content(&root, config_path);

    let engine = engine_from_toml(&root, &content, Overrides { preset, fail_on })
        .unwrap_or_else(|e| panic!("arch-conventions: invalid configuration: {e}"));

    match engine.check() {
        Ok(summary) => {
            for finding in &summary.findings {
                eprintln!("arch-conventions: {finding}");
            }
        }
        Err(e) => panic!("arch-conventions: {e}"),
    }
}

/// Runs [`run_check`] with `check!()` macro arguments.
///
/// # Panics
///
/// Panics on unknown or repeated argument names, and wherever
/// [`run_check`] panics.
pub fn run_check_args(args: &[(&str, &str)]) {
    let mut preset = None;
    let mut config = None;
    let mut fail_on = None;
    for &(key, value) in args {
        let slot = match key {
            "preset" => &mut preset,
            "config" => &mut config,
            "fail_on" => &mut fail_on,
            other => panic!(
                "arch-conventions: unknown check!() argument `{other}`, expected: preset, config, fail_on"
            ),
        };
        if slot.replace(value).is_some() {
            panic!("arch-conventions: check!() argument `{key}` given twice");
        }
    }
    run_check(preset, config, fail_on);
}

/// Builds an engine from the contents of a config file.
///
/// `root` is the project root; `[source] root` is resolved against it. An
/// empty `content` means no config file. Without `namespace`, the whole
/// crate is the global namespace. Rules are assembled in this order:
/// preset families, `[families.*]` toggles, then `[[rules]]` tables.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, names an unknown
/// preset, severity or family, or the crate name cannot be determined.
pub fn engine_from_toml(
    root: &Path,
    content: &str,
    overrides: Overrides<'_>,
) -> Result<Engine, ConventionsError> {
    let config = if content.is_empty() {
        Config::default()
    } else {
        Config::parse(content)?
    };

    let preset = resolve_preset(overrides.preset, &config)?;
    let fail_on = resolve_fail_on(overrides.fail_on, &config)?;
    let namespace = config
        .namespace
        .as_deref()
        .map(Namespace::new)
        .transpose()?;

    let source_root = root.join(&config.source.root);
    let crate_name = resolve_crate_name(&config, namespace.as_ref(), &source_root)?;
    debug!(
        "Scanning `{}` as crate `{}`",
        source_root.display(),
        crate_name
    );

    let namespace = match namespace {
        Some(namespace) => namespace,
        None => Namespace::new(&crate_name)?,
    };

    let mut provider = SourceTreeProvider::new(&source_root, crate_name)
        .respect_gitignore(config.source.respect_gitignore)
        .fail_on_parse_error(config.source.fail_on_parse_error);
    for pattern in &config.source.exclude {
        provider = provider.exclude(pattern)?;
    }

    let mut builder = Engine::builder()
        .provider(Arc::new(provider))
        .fail_on_empty(config.fail_on_empty)
        .fail_on(fail_on)
        .namespace(namespace)
        .exclude_types(config.exclude_types.iter().cloned());

    if let Some(preset) = preset {
        info!("Applying preset `{}`", preset.name());
        builder = preset.apply(builder)?;
    }

    let mut disabled: Vec<&String> = config
        .families
        .iter()
        .filter(|(_, family)| !family.enabled)
        .map(|(name, _)| name)
        .collect();
    disabled.sort();
    for name in disabled {
        let key = family_key(name).ok_or_else(|| {
            ConventionsError::invalid_argument("families", format!("unknown family `{name}`"))
        })?;
        debug!("Disabling family `{}` from config", name);
        builder = builder.disable_family(&key);
    }

    if !content.is_empty() {
        builder = builder.rules(load_rules_from_toml(content)?);
    }

    Ok(builder.build())
}

/// Reads the raw TOML content from the config file.
///
/// Returns an empty string if no config file is found.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> String {
    let path = match explicit_path {
        Some(path) if Path::new(path).is_absolute() => Some(PathBuf::from(path)),
        Some(path) => Some(root.join(path)),
        None => CONFIG_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.exists()),
    };

    let Some(path) = path else {
        return String::new();
    };
    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "arch-conventions: failed to read config from {}: {e}",
            path.display()
        );
    })
}

/// Resolves the effective preset from macro arg > config > default.
fn resolve_preset(
    macro_arg: Option<&str>,
    config: &Config,
) -> Result<Option<Preset>, ConventionsError> {
    let name = macro_arg
        .or(config.preset.as_deref())
        .unwrap_or("recommended");
    Preset::parse(name)
}

/// Resolves the effective `fail_on` severity from macro arg > config > default.
fn resolve_fail_on(
    macro_arg: Option<&str>,
    config: &Config,
) -> Result<Severity, ConventionsError> {
    let name = macro_arg.or(config.fail_on.as_deref()).unwrap_or("error");
    Severity::parse(name).ok_or_else(|| {
        ConventionsError::invalid_argument(
            "fail_on",
            format!("unknown severity `{name}`, expected: error, warning, info"),
        )
    })
}

/// Crate name: `[source] crate_name` > first namespace segment > package name.
fn resolve_crate_name(
    config: &Config,
    namespace: Option<&Namespace>,
    source_root: &Path,
) -> Result<String, ConventionsError> {
    if let Some(name) = &config.source.crate_name {
        return Ok(name.clone());
    }
    if let Some(namespace) = namespace {
        if let Some(first) = namespace.as_str().split("::").next() {
            return Ok(first.to_string());
        }
    }
    package_name(&source_root.join("Cargo.toml")).ok_or_else(|| {
        ConventionsError::invalid_argument(
            "source.crate_name",
            format!(
                "cannot determine the crate name for {}; set `namespace` or `[source] crate_name`",
                source_root.display()
            ),
        )
    })
}

/// Reads `[package] name` from a manifest, as a Rust identifier.
fn package_name(cargo_toml: &Path) -> Option<String> {
    let content = std::fs::read_to_string(cargo_toml).ok()?;
    let table = content.parse::<toml::Table>().ok()?;
    let name = table.get("package")?.get("name")?.as_str()?;
    Some(name.replace('-', "_"))
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section
/// by parsing as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the project root by looking for `Cargo.toml` from `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    // CARGO_MANIFEST_DIR may point at a workspace member; prefer the workspace root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
