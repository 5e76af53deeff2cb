//! Enum declaration extraction.

use crate::error::ParseError;
use crate::ir::{EnumMemberMetadata, EnumTypeMetadata, SourceLocation};
use crate::parser::annotations::{extract_doc_comments, split_deprecated_directive, MetadataBag};
use crate::parser::namespace::Namespace;
use crate::parser::{normalize_name, Marker};
use std::path::Path;

/// Extract one marked enum declaration.
///
/// Every unit variant yields one member: the wire value is the `value`
/// attribute when present, else the variant name; the doc comment becomes
/// the member documentation, with a `deprecated:` directive split into the
/// deprecation note.
pub(crate) fn parse_enum(
    item: &syn::ItemEnum,
    file: &Path,
    namespace: &Namespace,
) -> Result<EnumTypeMetadata, ParseError> {
    let name = normalize_name(&item.ident.to_string()).to_string();

    let bag = MetadataBag::from_attrs_matching(&item.attrs, |path| {
        namespace.marker_for_path(path) == Some(Marker::EnumType)
    })
    .map_err(|e| attribute_error(file, &item.ident, e))?;

    let mut enum_type = EnumTypeMetadata::new(name);
    if let Some(doc) = extract_doc_comments(&item.attrs) {
        enum_type = enum_type.with_doc(doc);
    }
    if let Some(reason) = bag.deprecated {
        enum_type = enum_type.with_deprecated(reason);
    }

    for variant in &item.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            let loc = SourceLocation::from_span(file, variant.ident.span());
            return Err(ParseError::attribute(
                file.to_path_buf(),
                loc.line,
                format!(
                    "enum member `{}` carries a payload; only unit members are exposable",
                    variant.ident
                ),
            ));
        }

        let member_name = normalize_name(&variant.ident.to_string()).to_string();
        let value = wire_value(variant, file)?.unwrap_or_else(|| member_name.clone());

        let mut member = EnumMemberMetadata::new(member_name, value);
        if let Some(doc) = extract_doc_comments(&variant.attrs) {
            let (doc, deprecated) = split_deprecated_directive(&doc);
            if let Some(doc) = doc {
                member = member.with_doc(doc);
            }
            if let Some(reason) = deprecated {
                member = member.with_deprecated(reason);
            }
        }
        enum_type = enum_type.with_member(member);
    }

    Ok(enum_type)
}

/// Read a `#[value("...")]` attribute, matched by trailing path segment.
fn wire_value(variant: &syn::Variant, file: &Path) -> Result<Option<String>, ParseError> {
    for attr in &variant.attrs {
        let Some(last) = attr.path().segments.last() else {
            continue;
        };
        if last.ident != "value" {
            continue;
        }
        let lit: syn::LitStr = attr.parse_args().map_err(|e| {
            let loc = SourceLocation::from_span(file, variant.ident.span());
            ParseError::attribute(
                file.to_path_buf(),
                loc.line,
                format!("invalid `value` attribute on `{}`: {e}", variant.ident),
            )
        })?;
        return Ok(Some(lit.value()));
    }
    Ok(None)
}

fn attribute_error(file: &Path, ident: &syn::Ident, error: darling::Error) -> ParseError {
    let loc = SourceLocation::from_span(file, ident.span());
    ParseError::attribute(file.to_path_buf(), loc.line, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn parse(item: syn::ItemEnum) -> EnumTypeMetadata {
        parse_enum(&item, Path::new("test.rs"), &Namespace::new()).unwrap()
    }

    #[test]
    fn test_members_with_values_and_docs() {
        let enum_type = parse(parse_quote! {
            #[enum_type]
            enum Severity {
                /// first option
                #[value("first")]
                First,
                #[value("second")]
                Second,
            }
        });

        let members: Vec<_> = enum_type
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.value.as_str(), m.doc.as_deref()))
            .collect();
        assert_eq!(
            members,
            [
                ("First", "first", Some("first option")),
                ("Second", "second", None),
            ]
        );
    }

    #[test]
    fn test_value_defaults_to_member_name() {
        let enum_type = parse(parse_quote! {
            #[enum_type]
            enum Mode { Fast, Slow }
        });
        assert_eq!(enum_type.members[0].value, "Fast");
    }

    #[test]
    fn test_enum_doc_and_deprecated_directive() {
        let enum_type = parse(parse_quote! {
            /// Severity levels.
            #[enum_type]
            enum Severity {
                /// old level
                /// deprecated: use First
                Legacy,
            }
        });
        assert_eq!(enum_type.doc.as_deref(), Some("Severity levels."));
        let member = &enum_type.members[0];
        assert_eq!(member.doc.as_deref(), Some("old level"));
        assert_eq!(member.deprecated.as_deref(), Some("use First"));
    }

    #[test]
    fn test_payload_variant_rejected() {
        let item: syn::ItemEnum = parse_quote! {
            #[enum_type]
            enum Bad { Carrying(u32) }
        };
        let err = parse_enum(&item, Path::new("test.rs"), &Namespace::new()).unwrap_err();
        assert!(err.to_string().contains("payload"));
    }

    #[test]
    fn test_member_order_is_declaration_order() {
        let enum_type = parse(parse_quote! {
            #[enum_type]
            enum Ordered { C, A, B }
        });
        let names: Vec<_> = enum_type.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }
}
