//! Class model providers: turn a namespace into a [`ClassModel`].
//!
//! Importing is the expensive step of a check, so engines always go through
//! a [`ClassModelCache`](crate::cache::ClassModelCache) instead of calling a
//! provider directly.

use crate::context::SourceFile;
use crate::model::{ClassModel, ImportScope, Namespace, TypeInfo, TypeKind};
use crate::types::Location;
use crate::utils::{attribute_names, derive_names, has_cfg_test, qualify};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use syn::visit::Visit;
use tracing::{debug, info, warn};

/// Errors that can occur while importing a class model.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// IO error reading a source file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Error walking the source tree.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing a Rust source file.
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Invalid exclude pattern.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Produces class models for `(namespace, import scope)` pairs.
///
/// Implementations are assumed to be expensive (whole-codebase scans).
pub trait ClassModelProvider: Send + Sync {
    /// Imports every type inside `namespace` admitted by `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying sources cannot be read or parsed.
    fn import_classes(
        &self,
        namespace: &Namespace,
        scope: ImportScope,
    ) -> Result<ClassModel, ImportError>;
}

// ────────────────────────────────────────────
// Source tree provider
// ────────────────────────────────────────────

/// Imports types by parsing a crate's Rust sources with `syn`.
#[derive(Debug, Clone)]
pub struct SourceTreeProvider {
    root: PathBuf,
    crate_name: String,
    exclude_patterns: Vec<glob::Pattern>,
    respect_gitignore: bool,
    fail_on_parse_error: bool,
}

impl SourceTreeProvider {
    /// Creates a provider for the crate rooted at `root`.
    ///
    /// Types are named `crate_name::module::Type`. The default excludes
    /// skip `target/` and `vendor/` directories.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, crate_name: impl Into<String>) -> Self {
        let exclude_patterns = ["**/target/**", "**/vendor/**"]
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        Self {
            root: root.into(),
            crate_name: crate_name.into(),
            exclude_patterns,
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }

    /// Adds an exclude glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn exclude(mut self, pattern: &str) -> Result<Self, ImportError> {
        self.exclude_patterns.push(glob::Pattern::new(pattern)?);
        Ok(self)
    }

    /// Sets whether `.gitignore` files are respected (default: true).
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Sets whether a file that fails to parse aborts the import (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Returns the scanned root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the crate name prefixed to every type.
    #[must_use]
    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    /// Parses the whole tree into one model with every type.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, or cannot be parsed while
    /// `fail_on_parse_error` is set.
    pub fn scan(&self) -> Result<ClassModel, ImportError> {
        let files = self.discover_files()?;
        debug!("Found {} source files under {}", files.len(), self.root.display());

        let mut types = Vec::new();
        for path in &files {
            types.extend(self.import_file(path)?);
        }
        Ok(ClassModel::new(types))
    }

    fn import_file(&self, path: &Path) -> Result<Vec<TypeInfo>, ImportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ImportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let ast = match syn::parse_file(&content) {
            Ok(ast) => ast,
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                if self.fail_on_parse_error {
                    return Err(ImportError::Parse {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    });
                }
                return Ok(Vec::new());
            }
        };

        let file = SourceFile::new(path, &self.root, &self.crate_name);
        let mut collector = TypeCollector {
            file_is_test: file.is_test || has_cfg_test(&ast.attrs),
            relative_path: &file.relative_path,
            modules: file.module_path.clone(),
            test_depth: 0,
            types: Vec::new(),
        };
        collector.visit_file(&ast);
        Ok(collector.types)
    }

    /// Discovers all Rust source files below the root.
    fn discover_files(&self) -> Result<Vec<PathBuf>, ImportError> {
        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file())
                || path.extension().and_then(|e| e.to_str()) != Some("rs")
            {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }
        Ok(files)
    }

    /// Checks if a path should be excluded.
    ///
    /// Patterns match the path relative to the root, so directories above
    /// the crate never exclude it.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative))
    }
}

impl ClassModelProvider for SourceTreeProvider {
    fn import_classes(
        &self,
        namespace: &Namespace,
        scope: ImportScope,
    ) -> Result<ClassModel, ImportError> {
        info!(
            "Importing `{}` ({}) from {}",
            namespace,
            scope,
            self.root.display()
        );
        let model = self.scan()?.slice(namespace, scope);
        info!("Imported {} types for `{}`", model.len(), namespace);
        Ok(model)
    }
}

/// Collects type declarations from one parsed file.
struct TypeCollector<'a> {
    file_is_test: bool,
    relative_path: &'a Path,
    modules: Vec<String>,
    test_depth: usize,
    types: Vec<TypeInfo>,
}

impl TypeCollector<'_> {
    fn record(
        &mut self,
        ident: &syn::Ident,
        kind: TypeKind,
        vis: &syn::Visibility,
        attrs: &[syn::Attribute],
    ) {
        let mut info = TypeInfo::new(qualify(&self.modules, &ident.to_string()), kind).at(
            Location::from_span(self.relative_path.to_path_buf(), ident.span()),
        );
        if matches!(vis, syn::Visibility::Public(_)) {
            info = info.public();
        }
        if self.file_is_test || self.test_depth > 0 || has_cfg_test(attrs) {
            info = info.test_source();
        }
        for name in derive_names(attrs) {
            info = info.with_derive(name);
        }
        for name in attribute_names(attrs) {
            info = info.with_attribute(name);
        }
        self.types.push(info);
    }
}

impl<'ast> Visit<'ast> for TypeCollector<'_> {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        // Out-of-line modules are imported from their own files.
        if node.content.is_none() {
            return;
        }
        let is_test = has_cfg_test(&node.attrs);
        self.modules.push(node.ident.to_string());
        if is_test {
            self.test_depth += 1;
        }
        syn::visit::visit_item_mod(self, node);
        if is_test {
            self.test_depth -= 1;
        }
        self.modules.pop();
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.record(&node.ident, TypeKind::Struct, &node.vis, &node.attrs);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.record(&node.ident, TypeKind::Enum, &node.vis, &node.attrs);
    }

    fn visit_item_union(&mut self, node: &'ast syn::ItemUnion) {
        self.record(&node.ident, TypeKind::Union, &node.vis, &node.attrs);
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        self.record(&node.ident, TypeKind::Trait, &node.vis, &node.attrs);
    }

    fn visit_item_type(&mut self, node: &'ast syn::ItemType) {
        self.record(&node.ident, TypeKind::TypeAlias, &node.vis, &node.attrs);
    }

    // Items declared inside function bodies are not addressable by path.
    fn visit_item_fn(&mut self, _node: &'ast syn::ItemFn) {}

    fn visit_item_impl(&mut self, _node: &'ast syn::ItemImpl) {}
}

// ────────────────────────────────────────────
// In-memory provider
// ────────────────────────────────────────────

/// Serves a fixed set of types, for fixtures assembled in code.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    model: ClassModel,
    imports: AtomicUsize,
}

impl InMemoryProvider {
    /// Creates a provider over the given types.
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = TypeInfo>) -> Self {
        Self {
            model: types.into_iter().collect(),
            imports: AtomicUsize::new(0),
        }
    }

    /// Number of imports performed so far.
    #[must_use]
    pub fn import_count(&self) -> usize {
        self.imports.load(Ordering::SeqCst)
    }
}

impl ClassModelProvider for InMemoryProvider {
    fn import_classes(
        &self,
        namespace: &Namespace,
        scope: ImportScope,
    ) -> Result<ClassModel, ImportError> {
        self.imports.fetch_add(1, Ordering::SeqCst);
        Ok(self.model.slice(namespace, scope))
    }
}
