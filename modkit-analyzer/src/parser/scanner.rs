//! Per-file declaration scanning.
//!
//! The scanner walks one parsed file's top-level items. Only types carrying
//! a class marker are visible, and within them only members carrying a
//! member marker; everything unmarked is invisible no matter how similar it
//! looks. Functions live in `impl` blocks, which may precede their type or
//! sit in another file, so the scanner emits them as fragments keyed by
//! type name and the module analyzer attaches them.

use crate::error::{AnalyzeError, ParseError, TypeResolutionError, ValidationError};
use crate::ir::{
    FieldMetadata, FunctionMetadata, ObjectTypeMetadata, ParameterMetadata, ResolvedType,
    SourceLocation,
};
use crate::parser::annotations::{expr_to_json, extract_doc_comments, MetadataBag};
use crate::parser::enum_parser::parse_enum;
use crate::parser::namespace::{DeclaredKind, Namespace};
use crate::parser::type_resolver::TypeResolver;
use crate::parser::{normalize_name, Marker};
use convert_case::{Case, Casing};
use std::path::{Path, PathBuf};
use syn::spanned::Spanned;

/// One marked type declaration found during the naming pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredType {
    pub name: String,
    pub kind: DeclaredKind,
    pub location: SourceLocation,
}

/// First pass over one file: the names of every marked declaration.
///
/// Runs before any type resolution so forward references across files and
/// declaration order can resolve during the extraction pass.
pub fn collect_declarations(
    parsed: &syn::File,
    file: &Path,
) -> Result<Vec<DeclaredType>, AnalyzeError> {
    // Marker aliases are file-scoped.
    let mut aliases = Namespace::new();
    aliases.add_imports(parsed);

    let mut declarations = Vec::new();
    for item in &parsed.items {
        match item {
            syn::Item::Struct(item_struct) => {
                if let Some(marker) =
                    class_marker(&item_struct.attrs, &item_struct.ident, &aliases)?
                {
                    let kind = match marker {
                        Marker::ObjectType => DeclaredKind::Object,
                        Marker::Interface => DeclaredKind::Interface,
                        Marker::EnumType => {
                            return Err(marker_mismatch(file, &item_struct.ident, marker).into());
                        }
                        _ => continue,
                    };
                    declarations.push(DeclaredType {
                        name: normalize_name(&item_struct.ident.to_string()).to_string(),
                        kind,
                        location: SourceLocation::from_span(file, item_struct.ident.span()),
                    });
                }
            }
            syn::Item::Enum(item_enum) => {
                if let Some(marker) = class_marker(&item_enum.attrs, &item_enum.ident, &aliases)? {
                    if marker != Marker::EnumType {
                        return Err(marker_mismatch(file, &item_enum.ident, marker).into());
                    }
                    declarations.push(DeclaredType {
                        name: normalize_name(&item_enum.ident.to_string()).to_string(),
                        kind: DeclaredKind::Enum,
                        location: SourceLocation::from_span(file, item_enum.ident.span()),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(declarations)
}

/// The one class marker on a declaration, or an error when several
/// conflict.
fn class_marker(
    attrs: &[syn::Attribute],
    ident: &syn::Ident,
    aliases: &Namespace,
) -> Result<Option<Marker>, ValidationError> {
    let mut found: Option<Marker> = None;
    for attr in attrs {
        let Some(marker) = aliases.marker_for_path(attr.path()) else {
            continue;
        };
        if !marker.is_class_marker() {
            continue;
        }
        match found {
            None => found = Some(marker),
            Some(first) if first != marker => {
                return Err(ValidationError::ConflictingMarkers {
                    name: ident.to_string(),
                    first: first.name().to_string(),
                    second: marker.name().to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(found)
}

fn marker_mismatch(file: &Path, ident: &syn::Ident, marker: Marker) -> ParseError {
    let loc = SourceLocation::from_span(file, ident.span());
    ParseError::attribute(
        file.to_path_buf(),
        loc.line,
        format!(
            "marker `{}` does not fit the declaration of `{ident}`",
            marker.name()
        ),
    )
}

/// Functions extracted from one `impl` block, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct ImplFragment {
    pub type_name: String,
    pub functions: Vec<FunctionMetadata>,
    pub constructor: Option<FunctionMetadata>,
}

/// Everything one file contributes to the module.
#[derive(Debug, Clone, Default)]
pub struct ScannedFile {
    pub objects: Vec<ObjectTypeMetadata>,
    pub enums: Vec<crate::ir::EnumTypeMetadata>,
    pub fragments: Vec<ImplFragment>,
}

/// Second pass over one file: full metadata extraction.
pub struct FileScanner<'a> {
    namespace: &'a Namespace,
    file: &'a Path,
}

impl<'a> FileScanner<'a> {
    /// `namespace` must already contain every module-declared name plus
    /// this file's imports.
    pub fn new(namespace: &'a Namespace, file: &'a Path) -> Self {
        Self { namespace, file }
    }

    pub fn scan(&self, parsed: &syn::File) -> Result<ScannedFile, AnalyzeError> {
        let mut scanned = ScannedFile::default();

        for item in &parsed.items {
            match item {
                syn::Item::Struct(item_struct) => {
                    let Some(marker) =
                        class_marker(&item_struct.attrs, &item_struct.ident, self.namespace)?
                    else {
                        continue;
                    };
                    if marker == Marker::EnumType {
                        return Err(marker_mismatch(self.file, &item_struct.ident, marker).into());
                    }
                    scanned.objects.push(self.scan_struct(item_struct, marker)?);
                }
                syn::Item::Enum(item_enum) => {
                    let Some(marker) =
                        class_marker(&item_enum.attrs, &item_enum.ident, self.namespace)?
                    else {
                        continue;
                    };
                    if marker != Marker::EnumType {
                        return Err(marker_mismatch(self.file, &item_enum.ident, marker).into());
                    }
                    scanned
                        .enums
                        .push(parse_enum(item_enum, self.file, self.namespace)?);
                }
                syn::Item::Impl(item_impl) => {
                    if let Some(fragment) = self.scan_impl(item_impl)? {
                        scanned.fragments.push(fragment);
                    }
                }
                _ => {}
            }
        }

        Ok(scanned)
    }

    fn scan_struct(
        &self,
        item: &syn::ItemStruct,
        marker: Marker,
    ) -> Result<ObjectTypeMetadata, AnalyzeError> {
        let name = normalize_name(&item.ident.to_string()).to_string();
        tracing::debug!(type_name = %name, file = %self.file.display(), "scanning declaration");

        let bag = self.metadata_bag(&item.attrs, marker, item.ident.span())?;

        let mut object = if marker == Marker::Interface {
            ObjectTypeMetadata::interface(&name)
        } else {
            ObjectTypeMetadata::new(&name)
        };
        if let Some(doc) = bag.doc.or_else(|| extract_doc_comments(&item.attrs)) {
            object = object.with_doc(doc);
        }
        if let Some(reason) = bag.deprecated {
            object = object.with_deprecated(reason);
        }

        // Interfaces expose functions only; their fields never register.
        if marker != Marker::Interface {
            if let syn::Fields::Named(fields) = &item.fields {
                for field in &fields.named {
                    if let Some(metadata) = self.scan_field(field, &name)? {
                        object = object.with_field(metadata);
                    }
                }
            }
        }

        Ok(object)
    }

    fn scan_field(
        &self,
        field: &syn::Field,
        current_class: &str,
    ) -> Result<Option<FieldMetadata>, AnalyzeError> {
        let marked = field
            .attrs
            .iter()
            .any(|attr| self.namespace.marker_for_path(attr.path()) == Some(Marker::Field));
        if !marked {
            return Ok(None);
        }

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| self.attribute_error(field.span(), "exposed fields must be named"))?;
        let name = normalize_name(&ident.to_string()).to_string();

        let bag = self.metadata_bag(&field.attrs, Marker::Field, ident.span())?;
        let api_name = bag
            .name
            .clone()
            .unwrap_or_else(|| name.to_case(Case::Camel));

        let location = SourceLocation::from_span(self.file, field.ty.span());
        let resolved = self
            .resolve_annotation(&bag, &field.ty, current_class)
            .map_err(|e| e.at(location))?;

        let mut metadata = FieldMetadata::new(name, api_name, resolved);
        if let Some(doc) = bag.doc.or_else(|| extract_doc_comments(&field.attrs)) {
            metadata = metadata.with_doc(doc);
        }
        if let Some(init) = bag.init {
            metadata = metadata.with_init(init);
        }
        if let Some(reason) = bag.deprecated {
            metadata = metadata.with_deprecated(reason);
        }
        if bag.default_factory {
            metadata = metadata.with_default_present();
        } else if let Some(expr) = &bag.default {
            metadata = match expr_to_json(expr) {
                Some(value) => metadata.with_default(value),
                // No wire form: the default exists but stays engine-side
                // absent, so the constructor parameter is optional with a
                // null fallback.
                None => metadata.with_default_present(),
            };
        }

        Ok(Some(metadata))
    }

    fn scan_impl(&self, item: &syn::ItemImpl) -> Result<Option<ImplFragment>, AnalyzeError> {
        // Trait impls carry no exposed members.
        if item.trait_.is_some() {
            return Ok(None);
        }
        let syn::Type::Path(self_ty) = item.self_ty.as_ref() else {
            return Ok(None);
        };
        let Some(last) = self_ty.path.segments.last() else {
            return Ok(None);
        };
        let type_name = normalize_name(&last.ident.to_string()).to_string();

        // Member markers only have meaning inside a marked class.
        let declared_kind = match self.namespace.lookup(&type_name) {
            Some(crate::parser::namespace::NamespaceEntry::Declared(kind)) => *kind,
            _ => return Ok(None),
        };

        let mut fragment = ImplFragment {
            type_name: type_name.clone(),
            ..Default::default()
        };

        for impl_item in &item.items {
            let syn::ImplItem::Fn(method) = impl_item else {
                continue;
            };
            let marker = method
                .attrs
                .iter()
                .find_map(|attr| self.namespace.marker_for_path(attr.path()))
                .filter(|m| matches!(m, Marker::Function | Marker::Check));

            let has_receiver = method
                .sig
                .inputs
                .first()
                .is_some_and(|arg| matches!(arg, syn::FnArg::Receiver(_)));
            let is_constructor = method.sig.ident == "create" && !has_receiver;

            if marker.is_none() && !is_constructor {
                continue;
            }
            // Interfaces declare no constructors.
            if is_constructor && declared_kind == DeclaredKind::Interface {
                continue;
            }

            let function = self.scan_function(method, &type_name, marker, is_constructor)?;
            if is_constructor {
                fragment.constructor = Some(function);
            } else {
                fragment.functions.push(function);
            }
        }

        if fragment.functions.is_empty() && fragment.constructor.is_none() {
            Ok(None)
        } else {
            Ok(Some(fragment))
        }
    }

    fn scan_function(
        &self,
        method: &syn::ImplItemFn,
        current_class: &str,
        marker: Option<Marker>,
        is_constructor: bool,
    ) -> Result<FunctionMetadata, AnalyzeError> {
        let name = normalize_name(&method.sig.ident.to_string()).to_string();
        let bag = self.metadata_bag(
            &method.attrs,
            marker.unwrap_or(Marker::Function),
            method.sig.ident.span(),
        )?;

        let api_name = if is_constructor {
            String::new()
        } else {
            bag.name
                .clone()
                .unwrap_or_else(|| name.to_case(Case::Camel))
        };

        let return_type = match &method.sig.output {
            syn::ReturnType::Default => ResolvedType::void(),
            syn::ReturnType::Type(_, ty) => {
                let location = SourceLocation::from_span(self.file, ty.span());
                let resolver = TypeResolver::new(self.namespace).with_current_class(current_class);
                resolver.resolve(ty).map_err(|e| e.at(location))?
            }
        };

        let mut function = FunctionMetadata::new(&name, api_name, return_type)
            .with_async(method.sig.asyncness.is_some())
            .with_check(marker == Some(Marker::Check));
        function.is_constructor = is_constructor;

        if let Some(doc) = bag.doc.or_else(|| extract_doc_comments(&method.attrs)) {
            function = function.with_doc(doc);
        }
        if let Some(reason) = bag.deprecated {
            function = function.with_deprecated(reason);
        }
        if let Some(policy) = bag.cache {
            function = function.with_cache_policy(policy);
        }

        for input in &method.sig.inputs {
            let syn::FnArg::Typed(pat_type) = input else {
                continue;
            };
            let parameter = self.scan_parameter(pat_type, current_class, &name)?;
            function = function.with_parameter(parameter);
        }

        Ok(function)
    }

    fn scan_parameter(
        &self,
        pat_type: &syn::PatType,
        current_class: &str,
        function_name: &str,
    ) -> Result<ParameterMetadata, AnalyzeError> {
        let syn::Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(self
                .attribute_error(
                    pat_type.span(),
                    format!("unsupported parameter pattern in `{function_name}`"),
                )
                .into());
        };
        let name = normalize_name(&pat_ident.ident.to_string()).to_string();

        // `arg` is a plain metadata attribute, not an importable marker.
        let bag = MetadataBag::from_attrs(&pat_type.attrs, "arg")
            .map_err(|e| self.attribute_error(pat_ident.ident.span(), e.to_string()))?;
        let api_name = bag
            .name
            .clone()
            .unwrap_or_else(|| name.to_case(Case::Camel));

        let location = SourceLocation::from_span(self.file, pat_type.ty.span());
        let resolved = self
            .resolve_annotation(&bag, &pat_type.ty, current_class)
            .map_err(|e| e.at(location))?;

        let mut parameter = ParameterMetadata::new(&name, api_name, resolved);
        if let Some(doc) = bag.doc {
            parameter = parameter.with_doc(doc);
        }
        if let Some(path) = bag.default_path {
            parameter = parameter.with_default_path(path);
        }
        if !bag.ignore.is_empty() {
            parameter = parameter.with_ignore(bag.ignore);
        }
        if bag.default_factory {
            parameter = parameter.with_default_present();
        } else if let Some(expr) = &bag.default {
            parameter = match expr_to_json(expr) {
                Some(value) => parameter.with_default(value),
                None => parameter.with_default_present(),
            };
        }
        if let Some(reason) = bag.deprecated {
            if !parameter.is_optional() {
                return Err(ValidationError::DeprecatedRequiredParameter {
                    function: function_name.to_string(),
                    parameter: name,
                }
                .into());
            }
            parameter = parameter.with_deprecated(reason);
        }

        Ok(parameter)
    }

    /// Resolve through the string override when present, else the declared
    /// type.
    fn resolve_annotation(
        &self,
        bag: &MetadataBag,
        ty: &syn::Type,
        current_class: &str,
    ) -> Result<ResolvedType, TypeResolutionError> {
        let resolver = TypeResolver::new(self.namespace).with_current_class(current_class);
        match &bag.ty_override {
            Some(annotation) => resolver.resolve_str(annotation),
            None => resolver.resolve(ty),
        }
    }

    /// Metadata attributes resolve through the namespace, so aliased
    /// marker spellings carry their bags the same as canonical ones.
    fn metadata_bag(
        &self,
        attrs: &[syn::Attribute],
        marker: Marker,
        span: proc_macro2::Span,
    ) -> Result<MetadataBag, AnalyzeError> {
        MetadataBag::from_attrs_matching(attrs, |path| {
            self.namespace.marker_for_path(path) == Some(marker)
        })
        .map_err(|e| self.attribute_error(span, e.to_string()).into())
    }

    fn attribute_error(&self, span: proc_macro2::Span, message: impl Into<String>) -> ParseError {
        let loc = SourceLocation::from_span(self.file, span);
        ParseError::attribute(PathBuf::from(self.file), loc.line, message.into())
    }
}

/// Build the implicit constructor for an object with no explicit `create`.
///
/// Parameters come from `init` fields in declaration order, each mirroring
/// its field's optionality and default.
pub(crate) fn synthesize_constructor(object: &ObjectTypeMetadata) -> FunctionMetadata {
    let mut constructor = FunctionMetadata::constructor(&object.name);
    for field in object.fields.iter().filter(|f| f.init) {
        let mut parameter = ParameterMetadata::new(
            &field.name,
            &field.api_name,
            field.resolved_type.clone(),
        );
        if let Some(doc) = &field.doc {
            parameter = parameter.with_doc(doc.clone());
        }
        if field.has_default {
            parameter = match &field.default {
                Some(value) => parameter.with_default(value.clone()),
                None => parameter.with_default_present(),
            };
        }
        constructor = constructor.with_parameter(parameter);
    }
    constructor
}
