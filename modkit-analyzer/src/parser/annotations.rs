//! Annotation metadata extraction.
//!
//! Marker attributes decompose into a metadata bag (doc text, alternate
//! name, default, ignore globs, deprecation note), identical whether the
//! marker was spelled bare, qualified, or through a local alias. Doc
//! comment extraction, string-annotation union splitting, and
//! default-to-JSON conversion live here too.

use crate::ir::CachePolicy;
use darling::util::Override;
use darling::FromMeta;
use serde_json::Value;

/// Accumulated metadata for one parameter or field.
///
/// Repeated metadata attributes accumulate; same-kind conflicts resolve
/// last-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBag {
    /// Documentation text.
    pub doc: Option<String>,

    /// Alternate external name.
    pub name: Option<String>,

    /// Default value expression, when given as metadata.
    pub default: Option<syn::Expr>,

    /// Marker that the default comes from a factory and has no wire form.
    pub default_factory: bool,

    /// Context path the engine populates the value from.
    pub default_path: Option<String>,

    /// Ignore globs for directory-like values.
    pub ignore: Vec<String>,

    /// Deprecation note; empty string when the marker carried no text.
    pub deprecated: Option<String>,

    /// Raw string annotation overriding the declared type.
    pub ty_override: Option<String>,

    /// Constructor participation for fields.
    pub init: Option<bool>,

    /// Cache policy for functions.
    pub cache: Option<CachePolicy>,
}

impl MetadataBag {
    /// Merge `later` over `self`, key by key.
    pub fn merge(mut self, later: MetadataBag) -> MetadataBag {
        if later.doc.is_some() {
            self.doc = later.doc;
        }
        if later.name.is_some() {
            self.name = later.name;
        }
        if later.default.is_some() {
            self.default = later.default;
        }
        if later.default_factory {
            self.default_factory = true;
        }
        if later.default_path.is_some() {
            self.default_path = later.default_path;
        }
        if !later.ignore.is_empty() {
            self.ignore = later.ignore;
        }
        if later.deprecated.is_some() {
            self.deprecated = later.deprecated;
        }
        if later.ty_override.is_some() {
            self.ty_override = later.ty_override;
        }
        if later.init.is_some() {
            self.init = later.init;
        }
        if later.cache.is_some() {
            self.cache = later.cache;
        }
        self
    }

    /// Collect every attribute accepted by `accepts` into one bag, in
    /// attribute order.
    ///
    /// The predicate decides what counts as the marker, so callers with a
    /// namespace resolve aliased spellings to the same bag as canonical
    /// ones.
    pub fn from_attrs_matching(
        attrs: &[syn::Attribute],
        mut accepts: impl FnMut(&syn::Path) -> bool,
    ) -> darling::Result<MetadataBag> {
        let mut bag = MetadataBag::default();
        for attr in attrs {
            if !accepts(attr.path()) {
                continue;
            }
            // A bare marker contributes nothing to the bag.
            if matches!(attr.meta, syn::Meta::Path(_)) {
                continue;
            }
            let raw = RawMeta::from_meta(&attr.meta)?;
            bag = bag.merge(raw.into_bag()?);
        }
        Ok(bag)
    }

    /// Collect every attribute whose trailing path segment spells
    /// `marker` into one bag.
    pub fn from_attrs(attrs: &[syn::Attribute], marker: &str) -> darling::Result<MetadataBag> {
        Self::from_attrs_matching(attrs, |path| {
            path.segments.last().is_some_and(|s| s.ident == marker)
        })
    }
}

/// The attribute grammar, parsed by darling.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct RawMeta {
    name: Option<String>,
    doc: Option<String>,
    default: Option<syn::Expr>,
    default_factory: darling::util::Flag,
    default_path: Option<String>,
    ignore: Option<IgnoreList>,
    deprecated: Option<Override<String>>,
    ty: Option<String>,
    init: Option<bool>,
    cache: Option<syn::Lit>,
}

impl RawMeta {
    fn into_bag(self) -> darling::Result<MetadataBag> {
        let cache = self.cache.map(parse_cache_policy).transpose()?;
        Ok(MetadataBag {
            doc: self.doc,
            name: self.name,
            default: self.default,
            default_factory: self.default_factory.is_present(),
            default_path: self.default_path,
            ignore: self.ignore.map(|l| l.0).unwrap_or_default(),
            deprecated: self.deprecated.map(|o| o.unwrap_or_default()),
            ty_override: self.ty,
            init: self.init,
            cache,
        })
    }
}

/// `cache = "never" | "session" | <ttl seconds>`.
fn parse_cache_policy(lit: syn::Lit) -> darling::Result<CachePolicy> {
    match &lit {
        syn::Lit::Str(s) => match s.value().as_str() {
            "never" => Ok(CachePolicy::Never),
            "session" => Ok(CachePolicy::Session),
            other => Err(darling::Error::custom(format!(
                "unknown cache policy `{other}`; expected \"never\", \"session\", or a ttl"
            ))
            .with_span(&lit)),
        },
        syn::Lit::Int(i) => i
            .base10_parse::<u64>()
            .map(CachePolicy::Seconds)
            .map_err(|e| darling::Error::custom(e).with_span(&lit)),
        _ => Err(darling::Error::custom("expected a string or integer cache policy")
            .with_span(&lit)),
    }
}

/// `ignore("pattern", ...)` — a parenthesized list of glob strings.
#[derive(Debug, Clone, Default, PartialEq)]
struct IgnoreList(Vec<String>);

impl FromMeta for IgnoreList {
    fn from_list(items: &[darling::ast::NestedMeta]) -> darling::Result<Self> {
        items
            .iter()
            .map(|item| match item {
                darling::ast::NestedMeta::Lit(syn::Lit::Str(s)) => Ok(s.value()),
                other => Err(darling::Error::custom("expected a glob string").with_span(other)),
            })
            .collect::<darling::Result<Vec<_>>>()
            .map(IgnoreList)
    }

    fn from_string(value: &str) -> darling::Result<Self> {
        Ok(IgnoreList(vec![value.to_string()]))
    }
}

// ============================================================================
// Documentation extraction
// ============================================================================

/// Extract doc comments (`///` lines, i.e. `#[doc = "..."]`) as one string.
pub fn extract_doc_comments(attrs: &[syn::Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let syn::Meta::NameValue(nv) = &attr.meta {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) = &nv.value
                {
                    return Some(s.value().trim().to_string());
                }
            }
            None
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n").trim().to_string())
    }
}

/// Split a trailing `deprecated:` directive out of member documentation.
///
/// Returns `(doc, deprecation)`. The deprecation note may be empty when the
/// directive carries no text.
pub fn split_deprecated_directive(doc: &str) -> (Option<String>, Option<String>) {
    let mut doc_lines = Vec::new();
    let mut deprecated = None;
    for line in doc.lines() {
        if let Some(rest) = line.trim().strip_prefix("deprecated:") {
            deprecated = Some(rest.trim().to_string());
        } else {
            doc_lines.push(line);
        }
    }
    let doc = doc_lines.join("\n").trim().to_string();
    let doc = if doc.is_empty() { None } else { Some(doc) };
    (doc, deprecated)
}

// ============================================================================
// String annotations and defaults
// ============================================================================

/// Strip references, parentheses, and groups.
pub(crate) fn peel(mut ty: &syn::Type) -> &syn::Type {
    loop {
        ty = match ty {
            syn::Type::Reference(r) => &r.elem,
            syn::Type::Paren(p) => &p.elem,
            syn::Type::Group(g) => &g.elem,
            other => return other,
        };
    }
}

/// Split a string annotation at top-level `|`, respecting bracket nesting.
pub(crate) fn split_union(annotation: &str) -> Vec<&str> {
    let mut members = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in annotation.char_indices() {
        match c {
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => depth -= 1,
            '|' if depth == 0 => {
                members.push(annotation[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    members.push(annotation[start..].trim());
    members
}

/// Convert a default expression to its wire value.
///
/// Only plain literals (and a few obvious compositions) have a wire form;
/// anything else returns `None` and the default is treated as absent.
pub(crate) fn expr_to_json(expr: &syn::Expr) -> Option<Value> {
    match expr {
        syn::Expr::Lit(lit) => lit_to_json(&lit.lit),
        syn::Expr::Unary(unary) => {
            if matches!(unary.op, syn::UnOp::Neg(_)) {
                match expr_to_json(&unary.expr)? {
                    Value::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            Some(Value::from(-i))
                        } else {
                            n.as_f64().map(|f| {
                                serde_json::Number::from_f64(-f)
                                    .map(Value::Number)
                                    .unwrap_or(Value::Null)
                            })
                        }
                    }
                    _ => None,
                }
            } else {
                None
            }
        }
        syn::Expr::Array(array) => array
            .elems
            .iter()
            .map(expr_to_json)
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        syn::Expr::Path(path) if path.path.is_ident("None") => Some(Value::Null),
        syn::Expr::Group(group) => expr_to_json(&group.expr),
        syn::Expr::Paren(paren) => expr_to_json(&paren.expr),
        _ => None,
    }
}

fn lit_to_json(lit: &syn::Lit) -> Option<Value> {
    match lit {
        syn::Lit::Str(s) => Some(Value::String(s.value())),
        syn::Lit::Int(i) => i.base10_parse::<i64>().ok().map(Value::from),
        syn::Lit::Float(f) => f.base10_parse::<f64>().ok().map(Value::from),
        syn::Lit::Bool(b) => Some(Value::Bool(b.value)),
        _ => None,
    }
}
