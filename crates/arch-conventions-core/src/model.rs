//! Immutable class model: the queryable snapshot of a codebase's types.
//!
//! A [`ClassModel`] is produced by a
//! [`ClassModelProvider`](crate::provider::ClassModelProvider) for one
//! `(namespace, import scope)` pair and never mutated afterwards. Filtering
//! always returns a new model.

use crate::types::Location;
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated module path such as `pkg::a` or `crate::domain`.
///
/// Non-empty, `::` separated, every segment made of `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a new namespace.
    ///
    /// # Errors
    ///
    /// Returns error if the path is empty or has a malformed segment.
    pub fn new(path: &str) -> Result<Self, ModelError> {
        if path.is_empty() {
            return Err(ModelError::EmptyNamespace);
        }
        let valid = path.split("::").all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
        if !valid {
            return Err(ModelError::InvalidNamespace {
                path: path.to_string(),
            });
        }
        Ok(Self(path.to_string()))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tests whether a fully qualified name lies inside this namespace.
    ///
    /// `pkg::a` contains `pkg::a` and `pkg::a::Foo`, but not `pkg::ab::Foo`.
    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        full_name == self.0
            || full_name
                .strip_prefix(self.0.as_str())
                .is_some_and(|rest| rest.starts_with("::"))
    }

    /// Appends a child segment, producing `self::segment`.
    ///
    /// # Errors
    ///
    /// Returns error if the segment is not a valid path segment.
    pub fn child(&self, segment: &str) -> Result<Self, ModelError> {
        Self::new(&format!("{}::{segment}", self.0))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Namespace {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Which slice of a namespace's sources a class model represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImportScope {
    /// Production sources only.
    #[default]
    ExcludeTests,
    /// Production and test sources.
    IncludeTests,
    /// Test sources only.
    TestsOnly,
}

impl ImportScope {
    /// Whether a type with the given test flag belongs to this scope.
    #[must_use]
    pub fn admits(self, is_test: bool) -> bool {
        match self {
            Self::ExcludeTests => !is_test,
            Self::IncludeTests => true,
            Self::TestsOnly => is_test,
        }
    }

    /// Parses a kebab-case scope name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exclude-tests" => Some(Self::ExcludeTests),
            "include-tests" => Some(Self::IncludeTests),
            "tests-only" => Some(Self::TestsOnly),
            _ => None,
        }
    }
}

impl fmt::Display for ImportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludeTests => write!(f, "exclude-tests"),
            Self::IncludeTests => write!(f, "include-tests"),
            Self::TestsOnly => write!(f, "tests-only"),
        }
    }
}

// ────────────────────────────────────────────
// Types
// ────────────────────────────────────────────

/// The kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `struct`
    Struct,
    /// `enum`
    Enum,
    /// `union`
    Union,
    /// `trait`
    Trait,
    /// `type` alias
    TypeAlias,
}

impl TypeKind {
    /// Parses a kebab-case kind name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            "union" => Some(Self::Union),
            "trait" => Some(Self::Trait),
            "type" | "type-alias" => Some(Self::TypeAlias),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Trait => "trait",
            Self::TypeAlias => "type alias",
        };
        f.write_str(s)
    }
}

/// One declared type in a class model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    full_name: String,
    kind: TypeKind,
    is_public: bool,
    derives: Vec<String>,
    attributes: Vec<String>,
    is_test: bool,
    location: Option<Location>,
}

impl TypeInfo {
    /// Creates a private, non-test type with no derives.
    #[must_use]
    pub fn new(full_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            full_name: full_name.into(),
            kind,
            is_public: false,
            derives: Vec::new(),
            attributes: Vec::new(),
            is_test: false,
            location: None,
        }
    }

    /// Marks the type as `pub`.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Marks the type as declared in test sources.
    #[must_use]
    pub fn test_source(mut self) -> Self {
        self.is_test = true;
        self
    }

    /// Adds a derived trait (last path segment, e.g. `Debug`).
    #[must_use]
    pub fn with_derive(mut self, name: impl Into<String>) -> Self {
        self.derives.push(name.into());
        self
    }

    /// Adds an attribute name (e.g. `non_exhaustive`).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Fully qualified name (e.g. `pkg::a::FooImpl`).
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Last path segment of the full name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.full_name
            .rsplit_once("::")
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }

    /// Owning module path, empty for a root-level type.
    #[must_use]
    pub fn module_path(&self) -> &str {
        self.full_name
            .rsplit_once("::")
            .map_or("", |(module, _)| module)
    }

    /// The declaration kind.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the type is declared `pub`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Derived trait names.
    #[must_use]
    pub fn derives(&self) -> &[String] {
        &self.derives
    }

    /// Whether the type derives the named trait.
    #[must_use]
    pub fn derives_trait(&self, name: &str) -> bool {
        self.derives.iter().any(|d| d == name)
    }

    /// Attribute names other than `derive`.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Whether the type lives in test sources.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.is_test
    }

    /// Declaration location, when known.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

// ────────────────────────────────────────────
// Class model
// ────────────────────────────────────────────

/// An immutable, ordered collection of types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassModel {
    types: Vec<TypeInfo>,
}

impl ClassModel {
    /// Creates a model from a list of types.
    #[must_use]
    pub fn new(types: Vec<TypeInfo>) -> Self {
        Self { types }
    }

    /// Creates a model containing no types.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// All types, in import order.
    #[must_use]
    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    /// Iterates over the contained types.
    pub fn iter(&self) -> std::slice::Iter<'_, TypeInfo> {
        self.types.iter()
    }

    /// Number of types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the model holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a type by full name.
    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&TypeInfo> {
        self.types.iter().find(|t| t.full_name == full_name)
    }

    /// Returns true if a type with this full name is present.
    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.get(full_name).is_some()
    }

    /// Returns a new model holding the types accepted by `predicate`.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&TypeInfo) -> bool,
    {
        Self {
            types: self.types.iter().filter(|t| predicate(t)).cloned().collect(),
        }
    }

    /// Returns the slice of this model for a namespace and import scope.
    #[must_use]
    pub fn slice(&self, namespace: &Namespace, scope: ImportScope) -> Self {
        self.filter(|t| namespace.contains(t.full_name()) && scope.admits(t.is_test()))
    }
}

impl<'a> IntoIterator for &'a ClassModel {
    type Item = &'a TypeInfo;
    type IntoIter = std::slice::Iter<'a, TypeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

impl FromIterator<TypeInfo> for ClassModel {
    fn from_iter<I: IntoIterator<Item = TypeInfo>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in model value construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Namespace is empty.
    #[error("namespace must not be empty")]
    EmptyNamespace,

    /// Namespace has an empty or malformed segment.
    #[error("invalid namespace `{path}`: expected `::` separated [A-Za-z0-9_] segments")]
    InvalidNamespace {
        /// The invalid path.
        path: String,
    },
}
