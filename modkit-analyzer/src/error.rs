//! Error taxonomy for the analysis pipeline.
//!
//! Syntax errors are collected per file and escalated together; every other
//! error kind fails fast at the point of detection, so no partially built
//! `ModuleMetadata` ever reaches the registration pipeline.

use crate::ir::SourceLocation;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Umbrella error for a module analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// A source file failed to parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Syntax error in a source file.
    #[error("syntax error in {file}:{line}:{column}: {message}")]
    Syntax {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Malformed marker or metadata attribute.
    #[error("invalid attribute in {file}:{line}: {message}")]
    Attribute {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error reading a file.
    #[error("failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Several files failed; every file was still attempted.
    #[error("{} file(s) failed to parse:\n{}", .0.len(), format_errors(.0))]
    Multiple(Vec<ParseError>),
}

impl ParseError {
    /// Create a syntax error with location information.
    pub fn syntax(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an attribute error.
    pub fn attribute(file: PathBuf, line: usize, message: impl Into<String>) -> Self {
        Self::Attribute {
            file,
            line,
            message: message.into(),
        }
    }

    /// Collapse collected per-file errors into one aggregate.
    ///
    /// Returns `None` when the collection is empty and unwraps a singleton.
    pub fn aggregate(mut errors: Vec<ParseError>) -> Option<ParseError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ParseError::Multiple(errors)),
        }
    }
}

fn format_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An annotation could not become a `ResolvedType`.
///
/// Always carries the offending annotation text; the location is present
/// whenever the annotation came from a scanned file rather than a bare
/// string.
#[derive(Debug, Error)]
#[error("cannot resolve type annotation `{annotation}`{}: {message}", location_suffix(.location))]
pub struct TypeResolutionError {
    pub annotation: String,
    pub message: String,
    pub location: Option<SourceLocation>,
}

fn location_suffix(location: &Option<SourceLocation>) -> String {
    match location {
        Some(loc) => format!(" at {loc}"),
        None => String::new(),
    }
}

impl TypeResolutionError {
    pub fn new(annotation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// A declared-constraint violation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No main object could be inferred.
    #[error("cannot determine the module's main object; declared types: {}", .candidates.join(", "))]
    MainObjectNotFound { candidates: Vec<String> },

    /// An explicitly named main object is not declared.
    #[error("main object `{name}` is not declared; declared types: {}", .candidates.join(", "))]
    MainObjectMissing {
        name: String,
        candidates: Vec<String>,
    },

    /// The same type name is declared more than once.
    #[error("type `{name}` is declared more than once ({first} and {second})")]
    DuplicateType {
        name: String,
        first: SourceLocation,
        second: SourceLocation,
    },

    /// A declaration carries more than one class marker.
    #[error("type `{name}` carries conflicting markers `{first}` and `{second}`")]
    ConflictingMarkers {
        name: String,
        first: String,
        second: String,
    },

    /// Two `create` constructors were declared for the same type.
    #[error("type `{type_name}` declares more than one constructor")]
    DuplicateConstructor { type_name: String },

    /// A parameter without a default or nullable type cannot be deprecated.
    #[error("parameter `{parameter}` of `{function}` is deprecated but still required")]
    DeprecatedRequiredParameter { function: String, parameter: String },
}

/// Internal inconsistency: analyzed metadata that the pipeline itself can
/// no longer make sense of. Reaching one of these is a bug, not user error.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unsupported type kind combination while lowering `{type_name}`: {message}")]
    UnsupportedLowering { type_name: String, message: String },

    #[error("metadata inconsistency: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty_is_none() {
        assert!(ParseError::aggregate(Vec::new()).is_none());
    }

    #[test]
    fn test_aggregate_singleton_unwraps() {
        let errors = vec![ParseError::syntax("a.rs".into(), 1, 1, "bad")];
        let agg = ParseError::aggregate(errors).unwrap();
        assert!(matches!(agg, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_aggregate_formats_numbered_list() {
        let errors = vec![
            ParseError::syntax("a.rs".into(), 1, 1, "bad token"),
            ParseError::syntax("b.rs".into(), 3, 7, "unexpected eof"),
        ];
        let agg = ParseError::aggregate(errors).unwrap();
        let msg = agg.to_string();
        assert!(msg.contains("2 file(s)"));
        assert!(msg.contains("  1. syntax error in a.rs:1:1"));
        assert!(msg.contains("  2. syntax error in b.rs:3:7"));
    }

    #[test]
    fn test_type_resolution_error_mentions_annotation_and_location() {
        let err = TypeResolutionError::new("int | str", "union has multiple non-null members")
            .at(SourceLocation::new("src/lib.rs", 12, 5));
        let msg = err.to_string();
        assert!(msg.contains("`int | str`"));
        assert!(msg.contains("src/lib.rs:12:5"));
    }

    #[test]
    fn test_main_object_error_lists_candidates() {
        let err = ValidationError::MainObjectNotFound {
            candidates: vec!["Backup".into(), "Severity".into()],
        };
        assert!(err.to_string().contains("Backup, Severity"));
    }
}
