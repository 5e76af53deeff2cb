//! Resolution of type annotations into canonical descriptors.
//!
//! `TypeResolver` is total over syntactically valid annotations: it either
//! returns a `ResolvedType` or raises `TypeResolutionError`, never a
//! partial result. Unknown names are not an error — they resolve to an
//! assumed object type by trailing name, and the engine validates names at
//! registration time.

use crate::error::TypeResolutionError;
use crate::ir::ResolvedType;
use crate::parser::annotations::{peel, split_union};
use crate::parser::namespace::Namespace;
use crate::wellknown;

/// Spellings of the null member inside string annotations.
const NULL_SPELLINGS: &[&str] = &["None", "NoneType", "null", "()"];

/// Resolves annotations against one file's namespace, with an optional
/// current-class context for `Self`.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    namespace: &'a Namespace,
    current_class: Option<&'a str>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(namespace: &'a Namespace) -> Self {
        Self {
            namespace,
            current_class: None,
        }
    }

    /// Set the class whose body is being scanned; enables `Self`.
    pub fn with_current_class(mut self, class: &'a str) -> Self {
        self.current_class = Some(class);
        self
    }

    /// Resolve a parsed type annotation.
    pub fn resolve(&self, ty: &syn::Type) -> Result<ResolvedType, TypeResolutionError> {
        match peel(ty) {
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(ResolvedType::void()),
            syn::Type::Never(_) => Ok(ResolvedType::void()),

            syn::Type::Path(type_path) => self.resolve_path(type_path),

            syn::Type::Slice(slice) => {
                let element = self.resolve(&slice.elem)?;
                Ok(ResolvedType::list(Some(element)))
            }
            syn::Type::Array(array) => {
                let element = self.resolve(&array.elem)?;
                Ok(ResolvedType::list(Some(element)))
            }

            // `dyn Trait` and `impl Trait` resolve by the trailing name of
            // the first type bound, the way any attribute access does.
            syn::Type::TraitObject(obj) => self.resolve_bounds(ty, &obj.bounds),
            syn::Type::ImplTrait(imp) => self.resolve_bounds(ty, &imp.bounds),

            other => Err(TypeResolutionError::new(
                type_text(other),
                "unsupported annotation shape",
            )),
        }
    }

    /// Resolve a raw string annotation.
    ///
    /// The string grammar is the parsed grammar plus top-level unions:
    /// `A | B | None`. The null member collapses into optionality; a union
    /// retaining more than one non-null member is a hard error naming all
    /// of them.
    pub fn resolve_str(&self, annotation: &str) -> Result<ResolvedType, TypeResolutionError> {
        let trimmed = annotation.trim();
        if trimmed.is_empty() {
            return Err(TypeResolutionError::new(annotation, "empty annotation"));
        }

        let members = split_union(trimmed);
        let mut non_null = Vec::new();
        let mut saw_null = false;
        for member in &members {
            if NULL_SPELLINGS.contains(member) {
                saw_null = true;
            } else if member.is_empty() {
                return Err(TypeResolutionError::new(annotation, "empty union member"));
            } else {
                non_null.push(*member);
            }
        }

        match non_null.as_slice() {
            [] => Ok(ResolvedType::void()),
            [single] => {
                let resolved = self.resolve_str_member(single)?;
                if saw_null {
                    Ok(resolved.with_optional(true))
                } else {
                    Ok(resolved)
                }
            }
            many => {
                let names = many
                    .iter()
                    .map(|m| format!("`{m}`"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(TypeResolutionError::new(
                    annotation,
                    format!("union has multiple non-null members: {names}"),
                ))
            }
        }
    }

    fn resolve_str_member(&self, member: &str) -> Result<ResolvedType, TypeResolutionError> {
        // Bare names skip the type grammar so engine spellings like `int`
        // resolve even though they are keywords in the host language.
        if is_bare_name(member) {
            return self.resolve_name(member);
        }
        let ty: syn::Type = syn::parse_str(member).map_err(|e| {
            TypeResolutionError::new(member, format!("not a parseable annotation: {e}"))
        })?;
        self.resolve(&ty)
    }

    fn resolve_path(&self, type_path: &syn::TypePath) -> Result<ResolvedType, TypeResolutionError> {
        if type_path.qself.is_some() {
            return Err(TypeResolutionError::new(
                type_text(&syn::Type::Path(type_path.clone())),
                "qualified-self annotations are not supported",
            ));
        }
        let Some(last) = type_path.path.segments.last() else {
            return Err(TypeResolutionError::new("", "empty annotation path"));
        };
        let name = last.ident.to_string();

        match name.as_str() {
            // One optional level: recurse and force optionality.
            "Option" => match generic_argument(last) {
                Some(inner) => Ok(self.resolve(inner)?.with_optional(true)),
                None => Err(TypeResolutionError::new(
                    type_text(&syn::Type::Path(type_path.clone())),
                    "optional annotation without a type parameter",
                )),
            },

            // One list level. A bare list with no legible element still
            // resolves; lowering substitutes a placeholder element.
            "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => match generic_argument(last) {
                Some(inner) => Ok(ResolvedType::list(Some(self.resolve(inner)?))),
                None => Ok(ResolvedType::list(None)),
            },

            _ => self.resolve_name(&name),
        }
    }

    fn resolve_bounds(
        &self,
        whole: &syn::Type,
        bounds: &syn::punctuated::Punctuated<syn::TypeParamBound, syn::Token![+]>,
    ) -> Result<ResolvedType, TypeResolutionError> {
        let first = bounds.iter().find_map(|b| match b {
            syn::TypeParamBound::Trait(t) => t.path.segments.last(),
            _ => None,
        });
        match first {
            Some(segment) => self.resolve_name(&segment.ident.to_string()),
            None => Err(TypeResolutionError::new(
                type_text(whole),
                "trait annotation without a named bound",
            )),
        }
    }

    /// Resolve a plain name. Order: null spelling, `Self`, built-in
    /// primitives, namespace (declared types, imports, stand-ins), the
    /// well-known engine catalogue, then assume a forward-referenced
    /// object.
    fn resolve_name(&self, name: &str) -> Result<ResolvedType, TypeResolutionError> {
        if NULL_SPELLINGS.contains(&name) {
            return Ok(ResolvedType::void());
        }

        if name == "Self" {
            return match self.current_class {
                Some(class) => Ok(ResolvedType::self_reference(class)),
                None => Err(TypeResolutionError::new(
                    name,
                    "`Self` used outside of a class context",
                )),
            };
        }

        if let Some(primitive) = resolve_primitive(name) {
            return Ok(primitive);
        }

        if let Some(resolved) = self.namespace.resolve_name(name) {
            return Ok(resolved);
        }

        if let Some(known) = wellknown::lookup(name) {
            return Ok(known);
        }

        Ok(ResolvedType::object(name))
    }
}

fn resolve_primitive(name: &str) -> Option<ResolvedType> {
    match name {
        "String" | "str" => Some(ResolvedType::string()),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" | "int" => Some(ResolvedType::integer()),
        "f32" | "f64" | "float" => Some(ResolvedType::float()),
        "bool" => Some(ResolvedType::boolean()),
        // Byte payloads travel as base64 strings.
        "bytes" => Some(ResolvedType::string()),
        _ => None,
    }
}

fn is_bare_name(member: &str) -> bool {
    !member.is_empty()
        && member
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
}

fn generic_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(ty) = arg {
                return Some(ty);
            }
        }
    }
    None
}

fn type_text(ty: &syn::Type) -> String {
    use quote::ToTokens;
    ty.to_token_stream().to_string()
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any identifier resolves; unknown names become objects, never
        /// errors.
        #[test]
        fn prop_bare_identifiers_always_resolve(name in "[A-Z][A-Za-z0-9]{0,12}") {
            let ns = Namespace::new();
            let resolver = TypeResolver::new(&ns);
            prop_assume!(name != "Self");
            let resolved = resolver.resolve_str(&name).unwrap();
            prop_assert!(resolved.invariants_hold());
        }

        /// `T | None` and `Option<T>` are the same annotation.
        #[test]
        fn prop_union_none_equals_option(name in "[A-Z][A-Za-z0-9]{0,12}") {
            let ns = Namespace::new();
            let resolver = TypeResolver::new(&ns);
            prop_assume!(name != "Self" && name != "Option" && name != "Vec");
            prop_assume!(!super::NULL_SPELLINGS.contains(&name.as_str()));
            let union = resolver.resolve_str(&format!("{name} | None")).unwrap();
            let option = resolver.resolve_str(&format!("Option<{name}>")).unwrap();
            prop_assert_eq!(union, option);
        }

        /// Optionality never leaks into the element payload.
        #[test]
        fn prop_optional_wraps_payload(name in "[A-Z][A-Za-z0-9]{0,12}") {
            let ns = Namespace::new();
            let resolver = TypeResolver::new(&ns);
            prop_assume!(name != "Self" && name != "Option" && name != "Vec");
            prop_assume!(!super::NULL_SPELLINGS.contains(&name.as_str()));
            let plain = resolver.resolve_str(&name).unwrap();
            let optional = resolver.resolve_str(&format!("{name} | None")).unwrap();
            prop_assert_eq!(optional.with_optional(false), plain);
        }
    }
}
