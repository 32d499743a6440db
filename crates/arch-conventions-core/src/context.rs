//! Per-file context used while importing a source tree.

use std::path::{Component, Path, PathBuf};

/// Metadata about one source file being imported into a class model.
#[derive(Debug, Clone)]
pub struct SourceFile<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Path relative to the scanned root.
    pub relative_path: PathBuf,
    /// Whether this file is a test source by path convention.
    pub is_test: bool,
    /// Module path of the file (e.g. `["pkg", "domain", "order"]`).
    pub module_path: Vec<String>,
}

impl<'a> SourceFile<'a> {
    /// Creates a new file context.
    ///
    /// Test detection only looks at the path below `root`, so a root that
    /// itself sits in a `tests/` directory does not mark every file as test.
    #[must_use]
    pub fn new(path: &'a Path, root: &Path, crate_name: &str) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let is_test = Self::detect_test_file(&relative_path);
        let module_path = Self::compute_module_path(&relative_path, crate_name);

        Self {
            path,
            relative_path,
            is_test,
            module_path,
        }
    }

    /// Detects if a file is a test source based on path conventions.
    fn detect_test_file(path: &Path) -> bool {
        for component in path.components() {
            if let Component::Normal(s) = component {
                let s = s.to_string_lossy();
                if s == "tests" || s == "test" || s == "benches" {
                    return true;
                }
            }
        }

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with("_test.rs")
                || file_name.ends_with("_tests.rs")
                || file_name.starts_with("test_")
                || file_name == "tests.rs"
            {
                return true;
            }
        }

        false
    }

    /// Computes the module path from a relative file path.
    fn compute_module_path(relative_path: &Path, crate_name: &str) -> Vec<String> {
        let mut parts: Vec<String> = relative_path
            .with_extension("")
            .components()
            .filter_map(|c| {
                if let Component::Normal(s) = c {
                    s.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();

        if parts.first().is_some_and(|first| first == "src") {
            parts.remove(0);
        }

        if let Some(last) = parts.last() {
            if last == "mod" || last == "lib" || last == "main" {
                parts.pop();
            }
        }

        parts.insert(0, crate_name.to_string());
        parts
    }

    /// Module path joined with `::`.
    #[must_use]
    pub fn module_name(&self) -> String {
        self.module_path.join("::")
    }
}
