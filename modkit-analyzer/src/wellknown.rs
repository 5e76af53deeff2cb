//! Catalogue of well-known engine types.
//!
//! A fixed, versioned table of the type names the engine's core schema
//! exposes. The type resolver consults it after module-declared names; it
//! must track the target engine release.

use crate::ir::{ResolvedType, TypeKind};

/// Core object types the engine schema exposes.
pub const ENGINE_OBJECT_TYPES: &[&str] = &[
    "CacheVolume",
    "Client",
    "Container",
    "Directory",
    "EnvVariable",
    "File",
    "GitRef",
    "GitRepository",
    "Host",
    "Module",
    "ModuleSource",
    "Port",
    "Secret",
    "Service",
    "Socket",
    "Terminal",
];

/// Opaque scalar types the engine schema exposes.
pub const ENGINE_SCALAR_TYPES: &[&str] = &["Platform", "Json"];

/// Look up a bare name in the catalogue.
///
/// Identifier tokens for a core object (`ContainerId`, `SecretId`, ...)
/// are scalars on the wire, so the `Id`-suffixed spelling of each object
/// name resolves to a scalar.
pub fn lookup(name: &str) -> Option<ResolvedType> {
    if ENGINE_OBJECT_TYPES.contains(&name) {
        return Some(ResolvedType::object(name));
    }
    if ENGINE_SCALAR_TYPES.contains(&name) {
        return Some(ResolvedType::scalar(name));
    }
    if let Some(stem) = name.strip_suffix("Id") {
        if ENGINE_OBJECT_TYPES.contains(&stem) {
            return Some(ResolvedType::scalar(name));
        }
    }
    None
}

/// Whether the name belongs to the catalogue at all.
pub fn is_well_known(name: &str) -> bool {
    lookup(name).is_some()
}
