//! Intermediate representation produced by static analysis.
//!
//! The IR is deliberately passive: names, strings, primitives, and one
//! closed type-kind union. It carries everything the registration pipeline
//! needs and nothing about how the source was parsed.

mod location;
mod metadata;
mod types;

pub use location::SourceLocation;
pub use metadata::{
    CachePolicy, EnumMemberMetadata, EnumTypeMetadata, FieldMetadata, FunctionMetadata,
    ModuleMetadata, ObjectTypeMetadata, ParameterMetadata,
};
pub use types::{ResolvedType, TypeKind};
