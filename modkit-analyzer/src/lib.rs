//! Static declaration extraction for engine modules.
//!
//! This crate reads a module's source files and determines, without
//! executing them, which types, fields, and functions must be exposed to
//! the orchestration engine. Declarations are recognized by a closed set
//! of markers, every type annotation is resolved to a canonical descriptor
//! from the engine's closed kind set, and the result is one serializable
//! [`ModuleMetadata`] value ready for registration.
//!
//! # Example
//!
//! ```
//! use modkit_analyzer::{ModuleAnalyzer, SourceFile};
//!
//! let source = SourceFile::new(
//!     "lib.rs",
//!     r#"
//!     #[object_type]
//!     struct Greeter {
//!         #[field]
//!         greeting: String,
//!     }
//!
//!     impl Greeter {
//!         #[function]
//!         fn greet(&self, name: String) -> String { unimplemented!() }
//!     }
//!     "#,
//! );
//!
//! let metadata = ModuleAnalyzer::new("greeter").analyze(&[source]).unwrap();
//! assert_eq!(metadata.main_object, "Greeter");
//! ```

mod analyzer;
mod error;
mod ir;
mod parser;
pub mod wellknown;

pub use analyzer::{ModuleAnalyzer, SourceFile};
pub use error::{
    AnalysisError, AnalyzeError, AnalyzeResult, ParseError, TypeResolutionError, ValidationError,
};
pub use ir::{
    CachePolicy, EnumMemberMetadata, EnumTypeMetadata, FieldMetadata, FunctionMetadata,
    ModuleMetadata, ObjectTypeMetadata, ParameterMetadata, ResolvedType, SourceLocation, TypeKind,
};
pub use parser::{
    collect_declarations, extract_doc_comments, DeclaredKind, DeclaredType, FileScanner,
    ImplFragment, Marker, MetadataBag, Namespace, NamespaceEntry, ScannedFile, TypeResolver,
};
