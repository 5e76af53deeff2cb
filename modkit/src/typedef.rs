//! Engine-side type definitions.
//!
//! These are the values the registration pipeline builds out of analyzed
//! metadata. Every builder consumes and returns `self`, so a definition is
//! assembled as one chain and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of an engine type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDefKind {
    /// Built-in string type.
    String,
    /// Built-in integer type.
    Integer,
    /// Built-in float type.
    Float,
    /// Built-in boolean type.
    Boolean,
    /// Absence of a value.
    Void,
    /// Homogeneous list; the element is `Void` when it could not be
    /// determined statically.
    List { element: Box<TypeDef> },
    /// Named object type.
    Object { name: String },
    /// Named interface type.
    Interface { name: String },
    /// Named enum type.
    Enum { name: String },
    /// Named opaque scalar type.
    Scalar { name: String },
}

/// An engine type reference: a kind plus optionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(flatten)]
    pub kind: TypeDefKind,

    /// Whether the engine should accept null for this reference.
    #[serde(default)]
    pub optional: bool,
}

impl TypeDef {
    pub fn new(kind: TypeDefKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn string() -> Self {
        Self::new(TypeDefKind::String)
    }

    pub fn integer() -> Self {
        Self::new(TypeDefKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(TypeDefKind::Float)
    }

    pub fn boolean() -> Self {
        Self::new(TypeDefKind::Boolean)
    }

    pub fn void() -> Self {
        Self::new(TypeDefKind::Void)
    }

    pub fn list(element: TypeDef) -> Self {
        Self::new(TypeDefKind::List {
            element: Box::new(element),
        })
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(TypeDefKind::Object { name: name.into() })
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeDefKind::Interface { name: name.into() })
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(TypeDefKind::Enum { name: name.into() })
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(TypeDefKind::Scalar { name: name.into() })
    }

    /// Set optionality.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeDefKind::Void)
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeDefKind::String => f.write_str("string")?,
            TypeDefKind::Integer => f.write_str("integer")?,
            TypeDefKind::Float => f.write_str("float")?,
            TypeDefKind::Boolean => f.write_str("boolean")?,
            TypeDefKind::Void => f.write_str("void")?,
            TypeDefKind::List { element } => write!(f, "[{element}]")?,
            TypeDefKind::Object { name }
            | TypeDefKind::Interface { name }
            | TypeDefKind::Enum { name }
            | TypeDefKind::Scalar { name } => f.write_str(name)?,
        }
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// A function argument definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgDef {
    pub name: String,

    #[serde(rename = "type")]
    pub arg_type: TypeDef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Wire-serializable default, when the source default could be
    /// serialized. Absent otherwise even when a source default exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Host path the default is loaded from at call time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,

    /// Ignore patterns applied when the argument names a directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl ArgDef {
    pub fn new(name: impl Into<String>, arg_type: TypeDef) -> Self {
        Self {
            name: name.into(),
            arg_type,
            doc: None,
            default: None,
            default_path: None,
            ignore: Vec::new(),
            deprecated: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_default_path(mut self, path: impl Into<String>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    pub fn with_ignore(mut self, patterns: Vec<String>) -> Self {
        self.ignore = patterns;
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// Caching behavior a function requests from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCache {
    /// Never cache results.
    #[default]
    Never,
    /// Cache for the lifetime of the client session.
    Session,
    /// Cache for a fixed number of seconds.
    Seconds(u64),
}

/// A function definition on an object or interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,

    #[serde(rename = "return")]
    pub return_type: TypeDef,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,

    #[serde(default)]
    pub cache: FunctionCache,

    /// Health check functions are invoked by the engine on demand.
    #[serde(default)]
    pub check: bool,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, return_type: TypeDef) -> Self {
        Self {
            name: name.into(),
            return_type,
            args: Vec::new(),
            doc: None,
            deprecated: None,
            cache: FunctionCache::Never,
            check: false,
        }
    }

    pub fn with_arg(mut self, arg: ArgDef) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }

    pub fn with_cache(mut self, cache: FunctionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }
}

/// A field definition on an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: TypeDef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: TypeDef) -> Self {
        Self {
            name: name.into(),
            field_type,
            doc: None,
            default: None,
            deprecated: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// An object or interface type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    pub name: String,

    #[serde(default)]
    pub interface: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<FunctionDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interface: false,
            doc: None,
            fields: Vec::new(),
            functions: Vec::new(),
            constructor: None,
            deprecated: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            interface: true,
            ..Self::new(name)
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_constructor(mut self, constructor: FunctionDef) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// A single enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMemberDef {
    pub name: String,

    /// Wire value; equals `name` unless the source overrode it.
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl EnumMemberDef {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            doc: None,
            deprecated: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// An enum type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EnumMemberDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            members: Vec::new(),
            deprecated: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_member(mut self, member: EnumMemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}
