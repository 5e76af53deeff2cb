//! Engine-facing module registration.
//!
//! This crate turns the analyzer's [`ModuleMetadata`] into engine type
//! definitions and installs them through the [`Engine`] seam. Conversion
//! is pure and synchronous; only the final installation call is async.
//!
//! ```
//! use modkit::{convert, ModuleType};
//! use modkit_analyzer::{ModuleMetadata, ObjectTypeMetadata};
//!
//! let metadata = ModuleMetadata::new("greeter", "Greeter")
//!     .with_object(ObjectTypeMetadata::new("Greeter"));
//! let module = convert(&metadata).unwrap();
//! assert!(matches!(module.types[0], ModuleType::Object(_)));
//! ```

mod engine;
mod error;
mod module;
mod registration;
mod typedef;

pub use engine::{Engine, EngineFuture, RecordingEngine};
pub use error::{EngineError, EngineErrorCode, EngineResult, RegistrationError};
pub use module::{ModuleDef, ModuleId, ModuleType};
pub use registration::{convert, register};
pub use typedef::{
    ArgDef, EnumDef, EnumMemberDef, FieldDef, FunctionCache, FunctionDef, ObjectDef, TypeDef,
    TypeDefKind,
};

pub use modkit_analyzer as analyzer;
