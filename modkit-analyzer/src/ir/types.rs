//! Canonical resolved types.
//!
//! `ResolvedType` is the closed type descriptor the engine understands:
//! a kind tag plus kind-gated payload. There is no behavioral polymorphism
//! here, only data and one lowering step performed by the registration
//! pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of type kinds the engine's schema supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// UTF-8 string.
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean.
    Boolean,
    /// Absence of a value (function returns nothing).
    Void,
    /// Homogeneous list; element shape in `element_type`.
    List,
    /// Named object type.
    Object,
    /// Named interface type.
    Interface,
    /// Named enum type.
    Enum,
    /// Named opaque scalar type.
    Scalar,
}

impl TypeKind {
    /// Whether this kind stands alone, without a name or element payload.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Float | Self::Boolean | Self::Void
        )
    }

    /// Whether this kind references a named type.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Self::Object | Self::Interface | Self::Enum | Self::Scalar
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Void => "void",
            Self::List => "list",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Scalar => "scalar",
        };
        f.write_str(s)
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// A fully resolved type annotation.
///
/// Invariants: `name` is present iff the kind is named; `element_type` may
/// be present only when the kind is `List` (a list with no legible element
/// keeps `None` and is lowered to a placeholder element later); `is_self`
/// implies an object kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedType {
    pub kind: TypeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_optional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<Box<ResolvedType>>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_self: bool,
}

impl ResolvedType {
    fn of_kind(kind: TypeKind) -> Self {
        Self {
            kind,
            name: None,
            is_optional: false,
            element_type: None,
            is_self: false,
        }
    }

    fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::of_kind(kind)
        }
    }

    pub fn string() -> Self {
        Self::of_kind(TypeKind::String)
    }

    pub fn integer() -> Self {
        Self::of_kind(TypeKind::Integer)
    }

    pub fn float() -> Self {
        Self::of_kind(TypeKind::Float)
    }

    pub fn boolean() -> Self {
        Self::of_kind(TypeKind::Boolean)
    }

    pub fn void() -> Self {
        Self::of_kind(TypeKind::Void)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::named(TypeKind::Object, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::named(TypeKind::Interface, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::named(TypeKind::Enum, name)
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::named(TypeKind::Scalar, name)
    }

    /// A list type. `element` may be `None` when the element is illegible.
    pub fn list(element: Option<ResolvedType>) -> Self {
        Self {
            element_type: element.map(Box::new),
            ..Self::of_kind(TypeKind::List)
        }
    }

    /// A reference to the class currently being scanned.
    pub fn self_reference(current_class: impl Into<String>) -> Self {
        Self {
            is_self: true,
            ..Self::named(TypeKind::Object, current_class)
        }
    }

    /// Return a copy with the given optionality.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.is_optional = optional;
        self
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void && !self.is_optional
    }

    /// Check the structural invariants of the descriptor.
    pub fn invariants_hold(&self) -> bool {
        let name_ok = self.name.is_some() == self.kind.is_named();
        let element_ok = self.element_type.is_none() || self.kind == TypeKind::List;
        let self_ok = !self.is_self || self.kind == TypeKind::Object;
        name_ok && element_ok && self_ok
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.element_type) {
            (Some(name), _) => write!(f, "{name}")?,
            (None, Some(elem)) => write!(f, "[{elem}]")?,
            (None, None) => write!(f, "{}", self.kind)?,
        }
        if self.is_optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}
