//! Module metadata: the serializable output of static analysis.
//!
//! Every structure here is built once per run and immutable afterwards.
//! Builders return new values instead of mutating, so partially built
//! metadata can never leak into the registration pipeline, and a finished
//! `ModuleMetadata` is safe to cache as JSON across process invocations.

use crate::ir::types::ResolvedType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_true(v: &bool) -> bool {
    *v
}

// ============================================================================
// Cache policy
// ============================================================================

/// How the engine may cache a function's results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Never cache.
    #[default]
    Never,
    /// Cache for the duration of the client session.
    Session,
    /// Cache for a fixed number of seconds.
    Seconds(u64),
}

// ============================================================================
// Parameters
// ============================================================================

/// One function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    /// Name as written in source (raw-identifier prefix stripped).
    pub name: String,

    /// Name exposed to the engine; defaults to the camelCase form.
    pub api_name: String,

    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,

    /// Whether a source-level default exists. `default` stays `None` when
    /// that default has no wire form; the parameter is still omittable and
    /// the callee receives a null.
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Context path the engine populates the value from when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,

    /// Glob patterns excluded when loading directory-like values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl ParameterMetadata {
    pub fn new(name: impl Into<String>, api_name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            api_name: api_name.into(),
            resolved_type: ty,
            has_default: false,
            default: None,
            doc: None,
            default_path: None,
            ignore: Vec::new(),
            deprecated: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.has_default = true;
        self.default = Some(default);
        self
    }

    /// Record that a source default exists without a wire-serializable
    /// value.
    pub fn with_default_present(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
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

    /// Derived optionality: a default, a context path, or a nullable type
    /// all make the parameter omittable at call time.
    pub fn is_optional(&self) -> bool {
        self.has_default || self.default_path.is_some() || self.resolved_type.is_optional
    }
}

// ============================================================================
// Functions
// ============================================================================

/// One exposed function, including synthesized and explicit constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Name as written in source. Empty for a synthesized constructor.
    pub name: String,

    /// Name exposed to the engine. Empty for any constructor.
    pub api_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterMetadata>,

    pub return_type: ResolvedType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,

    #[serde(default)]
    pub cache_policy: CachePolicy,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_check: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_async: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_constructor: bool,
}

impl FunctionMetadata {
    pub fn new(
        name: impl Into<String>,
        api_name: impl Into<String>,
        return_type: ResolvedType,
    ) -> Self {
        Self {
            name: name.into(),
            api_name: api_name.into(),
            parameters: Vec::new(),
            return_type,
            doc: None,
            deprecated: None,
            cache_policy: CachePolicy::Never,
            is_check: false,
            is_async: false,
            is_constructor: false,
        }
    }

    /// A constructor returning the given object type.
    pub fn constructor(object_name: impl Into<String>) -> Self {
        let mut f = Self::new("", "", ResolvedType::object(object_name));
        f.is_constructor = true;
        f
    }

    pub fn with_parameter(mut self, parameter: ParameterMetadata) -> Self {
        self.parameters.push(parameter);
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

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.is_check = check;
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }
}

// ============================================================================
// Fields
// ============================================================================

/// One exposed field of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,

    pub api_name: String,

    #[serde(rename = "type")]
    pub resolved_type: ResolvedType,

    #[serde(default, skip_serializing_if = "is_false")]
    pub has_default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Whether the field participates in a synthesized constructor.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub init: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, api_name: impl Into<String>, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            api_name: api_name.into(),
            resolved_type: ty,
            has_default: false,
            default: None,
            doc: None,
            init: true,
            deprecated: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.has_default = true;
        self.default = Some(default);
        self
    }

    /// Record that a source default exists without a wire-serializable
    /// value.
    pub fn with_default_present(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }

    /// Mirror of [`ParameterMetadata::is_optional`] for constructor synthesis.
    pub fn is_optional(&self) -> bool {
        self.has_default || self.resolved_type.is_optional
    }
}

// ============================================================================
// Object and enum types
// ============================================================================

/// One declared object or interface type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_interface: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMetadata>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<FunctionMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl ObjectTypeMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            is_interface: false,
            fields: Vec::new(),
            functions: Vec::new(),
            constructor: None,
            deprecated: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        let mut o = Self::new(name);
        o.is_interface = true;
        o
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_field(mut self, field: FieldMetadata) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_function(mut self, function: FunctionMetadata) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_constructor(mut self, constructor: FunctionMetadata) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// One member of an enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMemberMetadata {
    pub name: String,

    /// Wire value the engine sees.
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl EnumMemberMetadata {
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

/// One declared enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumTypeMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EnumMemberMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl EnumTypeMetadata {
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

    pub fn with_member(mut self, member: EnumMemberMetadata) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

// ============================================================================
// Module
// ============================================================================

/// The complete analyzed shape of one module.
///
/// Type order is declaration order across the module's file set and is
/// preserved through serialization; the registration pipeline relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub module_name: String,

    pub main_object: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectTypeMetadata>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumTypeMetadata>,
}

impl ModuleMetadata {
    pub fn new(module_name: impl Into<String>, main_object: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            main_object: main_object.into(),
            doc: None,
            objects: Vec::new(),
            enums: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_object(mut self, object: ObjectTypeMetadata) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_enum(mut self, enum_type: EnumTypeMetadata) -> Self {
        self.enums.push(enum_type);
        self
    }

    pub fn get_object(&self, name: &str) -> Option<&ObjectTypeMetadata> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumTypeMetadata> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// All declared type names, in declaration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.objects
            .iter()
            .map(|o| o.name.as_str())
            .chain(self.enums.iter().map(|e| e.name.as_str()))
    }

    /// The cacheable external form.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild from the cacheable external form.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
