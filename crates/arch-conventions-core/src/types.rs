//! Core types for convention violations.

use std::path::PathBuf;

/// Severity level for convention violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational finding, never fails a check on its own.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl Severity {
    /// Parses a lowercase severity name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path relative to the scanned root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location from span information.
    #[must_use]
    pub fn from_span(file: PathBuf, span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self {
            file,
            line: start.line,
            column: start.column + 1,
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A single offending element reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rule code (e.g., "AC101").
    pub code: String,
    /// Rule name (e.g., "no-impl-suffix").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Full name of the offending type.
    pub type_name: String,
    /// Where the offending type is declared, when known.
    pub location: Option<Location>,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            type_name: type_name.into(),
            location: None,
            message: message.into(),
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Formats the violation as one report line.
    #[must_use]
    pub fn format(&self) -> String {
        match &self.location {
            Some(location) => format!("{} ({location})", self.message),
            None => self.message.clone(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: [{}] {}", self.severity, self.code, self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "AC101",
            "no-impl-suffix",
            severity,
            "pkg::a::FooImpl",
            "type `pkg::a::FooImpl` has name matching `.*Impl`",
        )
    }

    #[test]
    fn severity_parse_round_names() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("info"), Some(Severity::Info));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn severity_orders_info_below_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn violation_format_without_location() {
        let v = make_violation(Severity::Error);
        assert_eq!(v.format(), "type `pkg::a::FooImpl` has name matching `.*Impl`");
    }

    #[test]
    fn violation_format_with_location() {
        let v = make_violation(Severity::Error)
            .with_location(Some(Location::new("src/a.rs", 3, 1)));
        assert!(v.format().ends_with("(src/a.rs:3:1)"));
    }

    #[test]
    fn violation_display_includes_code_and_severity() {
        let v = make_violation(Severity::Warning);
        let display = format!("{v}");
        assert!(display.starts_with("warning: [AC101]"));
    }
}
