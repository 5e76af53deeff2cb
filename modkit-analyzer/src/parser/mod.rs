//! Static parsing: markers, namespaces, annotations, type resolution,
//! and the per-file declaration scanner.

mod annotations;
mod enum_parser;
mod namespace;
mod scanner;
mod type_resolver;

pub use annotations::{extract_doc_comments, MetadataBag};
pub use namespace::{DeclaredKind, Namespace, NamespaceEntry};
pub use scanner::{collect_declarations, DeclaredType, FileScanner, ImplFragment, ScannedFile};
pub(crate) use scanner::synthesize_constructor;
pub use type_resolver::TypeResolver;

/// The closed set of declaration and member markers.
///
/// Markers are recognized by trailing symbol name, so `#[object_type]`,
/// `#[modkit::object_type]`, and a locally aliased spelling all mean the
/// same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Class marker: plain object type.
    ObjectType,
    /// Class marker: interface type.
    Interface,
    /// Class marker: enum type.
    EnumType,
    /// Member marker: exposed field.
    Field,
    /// Member marker: exposed function.
    Function,
    /// Member marker: exposed check function.
    Check,
}

impl Marker {
    /// Map an accepted spelling to its marker meaning.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "object_type" => Some(Self::ObjectType),
            "interface" => Some(Self::Interface),
            "enum_type" => Some(Self::EnumType),
            "field" => Some(Self::Field),
            "function" => Some(Self::Function),
            "check" => Some(Self::Check),
            _ => None,
        }
    }

    /// The canonical spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ObjectType => "object_type",
            Self::Interface => "interface",
            Self::EnumType => "enum_type",
            Self::Field => "field",
            Self::Function => "function",
            Self::Check => "check",
        }
    }

    /// Whether this marker makes a type declaration visible.
    pub fn is_class_marker(&self) -> bool {
        matches!(self, Self::ObjectType | Self::Interface | Self::EnumType)
    }
}

/// Strip the raw-identifier prefix from a source name.
pub(crate) fn normalize_name(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_spellings() {
        assert_eq!(Marker::from_name("object_type"), Some(Marker::ObjectType));
        assert_eq!(Marker::from_name("check"), Some(Marker::Check));
        assert_eq!(Marker::from_name("derive"), None);
    }

    #[test]
    fn test_class_markers() {
        assert!(Marker::ObjectType.is_class_marker());
        assert!(Marker::Interface.is_class_marker());
        assert!(!Marker::Field.is_class_marker());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("r#type"), "type");
        assert_eq!(normalize_name("name"), "name");
    }
}
