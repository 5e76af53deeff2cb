//! Module-level definitions.

use crate::typedef::{EnumDef, ObjectDef};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier the engine hands back for an installed module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub Uuid);

impl ModuleId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A type entry in a module, tagged by its declaration kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleType {
    Object(ObjectDef),
    Enum(EnumDef),
}

impl ModuleType {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(obj) => &obj.name,
            Self::Enum(en) => &en.name,
        }
    }
}

/// A complete module definition ready for engine installation.
///
/// Types are kept in insertion order; the registration pipeline relies on
/// this to install objects before enums and to keep declaration order
/// within each group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,

    /// Name of the module's entrypoint object.
    pub main_object: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ModuleType>,
}

impl ModuleDef {
    pub fn new(name: impl Into<String>, main_object: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main_object: main_object.into(),
            doc: None,
            types: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_object(mut self, object: ObjectDef) -> Self {
        self.types.push(ModuleType::Object(object));
        self
    }

    pub fn with_enum(mut self, en: EnumDef) -> Self {
        self.types.push(ModuleType::Enum(en));
        self
    }

    /// Look up a type entry by name.
    pub fn get_type(&self, name: &str) -> Option<&ModuleType> {
        self.types.iter().find(|t| t.name() == name)
    }
}
