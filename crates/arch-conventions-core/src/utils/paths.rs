//! Path utilities for AST analysis.

use syn::Path;

/// Converts a syn Path to a string representation.
///
/// # Example
///
/// ```ignore
/// // For path `thiserror::Error`
/// let s = path_to_string(&path);
/// assert_eq!(s, "thiserror::Error");
/// ```
#[must_use]
pub fn path_to_string(path: &Path) -> String {
    path.segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Extracts the last segment from a path string.
#[must_use]
pub fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Joins a module path and an item name into a full name.
#[must_use]
pub fn qualify(module_path: &[String], name: &str) -> String {
    if module_path.is_empty() {
        name.to_string()
    } else {
        format!("{}::{name}", module_path.join("::"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_path_to_string() {
        let path: Path = parse_quote!(thiserror::Error);
        assert_eq!(path_to_string(&path), "thiserror::Error");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("thiserror::Error"), "Error");
        assert_eq!(last_segment("Debug"), "Debug");
    }

    #[test]
    fn test_qualify() {
        let module = vec!["pkg".to_string(), "a".to_string()];
        assert_eq!(qualify(&module, "Foo"), "pkg::a::Foo");
        assert_eq!(qualify(&[], "Foo"), "Foo");
    }
}
