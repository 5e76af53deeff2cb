//! Source locations for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A position in a scanned source file.
///
/// Lines and columns are 1-based, the way compilers report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Build a location from a token span. Spans report 0-based columns.
    pub fn from_span(file: impl Into<PathBuf>, span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self {
            file: file.into(),
            line: start.line.max(1),
            column: start.column + 1,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let loc = SourceLocation::new("src/lib.rs", 12, 5);
        assert_eq!(loc.to_string(), "src/lib.rs:12:5");
    }

    #[test]
    fn test_from_span_is_one_based() {
        let file: syn::File = syn::parse_str("struct A;").unwrap();
        let span = syn::spanned::Spanned::span(&file.items[0]);
        let loc = SourceLocation::from_span("lib.rs", span);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);
    }
}
