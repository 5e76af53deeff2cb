//! Namespace construction for annotation evaluation.
//!
//! For every file a namespace is built from the module's declared type
//! names plus that file's `use` declarations. Known identifiers resolve to
//! real descriptors; names from unresolvable imports become inert stand-ins
//! carrying only the trailing symbol, so annotations referencing them still
//! resolve. Lookup never executes anything.

use crate::ir::ResolvedType;
use crate::parser::Marker;
use crate::wellknown;
use std::collections::HashMap;

/// Kind of a module-declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    Object,
    Interface,
    Enum,
}

/// What a name in scope stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEntry {
    /// A type declared somewhere in this module's file set.
    Declared(DeclaredKind),

    /// A type from the engine's core schema.
    WellKnown(ResolvedType),

    /// A local alias for a declaration/member marker.
    MarkerAlias(Marker),

    /// An import that could not be resolved; carries only its own name.
    Standin { name: String },
}

/// Name → entry lookup for one file.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: HashMap<String, NamespaceEntry>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module-declared type, making forward references to it
    /// resolvable regardless of declaration order or file.
    pub fn add_declared(&mut self, name: impl Into<String>, kind: DeclaredKind) {
        self.entries
            .insert(name.into(), NamespaceEntry::Declared(kind));
    }

    /// Register every name imported by the file's `use` declarations.
    pub fn add_imports(&mut self, file: &syn::File) {
        for item in &file.items {
            if let syn::Item::Use(item_use) = item {
                self.add_use_tree(&item_use.tree);
            }
        }
    }

    fn add_use_tree(&mut self, tree: &syn::UseTree) {
        match tree {
            syn::UseTree::Path(path) => self.add_use_tree(&path.tree),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.add_use_tree(item);
                }
            }
            syn::UseTree::Name(name) => {
                let ident = name.ident.to_string();
                self.add_import(ident.clone(), ident);
            }
            syn::UseTree::Rename(rename) => {
                self.add_import(rename.rename.to_string(), rename.ident.to_string());
            }
            // Glob imports bring no individual names; whatever they would
            // have provided falls through to the assume-object fallback.
            syn::UseTree::Glob(_) => {}
        }
    }

    /// Register one imported name under its local spelling.
    ///
    /// `original` is the trailing symbol at the import site; resolution is
    /// by that trailing name. Already-declared module types win over
    /// imports of the same spelling.
    fn add_import(&mut self, local: String, original: String) {
        if matches!(self.entries.get(&local), Some(NamespaceEntry::Declared(_))) {
            return;
        }
        let entry = if let Some(marker) = Marker::from_name(&original) {
            NamespaceEntry::MarkerAlias(marker)
        } else if let Some(known) = wellknown::lookup(&original) {
            NamespaceEntry::WellKnown(known)
        } else {
            NamespaceEntry::Standin { name: original }
        };
        self.entries.insert(local, entry);
    }

    pub fn lookup(&self, name: &str) -> Option<&NamespaceEntry> {
        self.entries.get(name)
    }

    /// Resolve an attribute path to a marker: by trailing spelling first,
    /// then by single-segment local alias.
    pub fn marker_for_path(&self, path: &syn::Path) -> Option<Marker> {
        let last = path.segments.last()?.ident.to_string();
        if let Some(marker) = Marker::from_name(&last) {
            return Some(marker);
        }
        if path.segments.len() == 1 {
            if let Some(NamespaceEntry::MarkerAlias(marker)) = self.entries.get(&last) {
                return Some(*marker);
            }
        }
        None
    }

    /// Resolve a plain name in this namespace to a type descriptor.
    ///
    /// Returns `None` when the name is not in scope at all; the resolver
    /// then applies its own fallback rules.
    pub fn resolve_name(&self, name: &str) -> Option<ResolvedType> {
        match self.entries.get(name)? {
            NamespaceEntry::Declared(DeclaredKind::Object) => Some(ResolvedType::object(name)),
            NamespaceEntry::Declared(DeclaredKind::Interface) => {
                Some(ResolvedType::interface(name))
            }
            NamespaceEntry::Declared(DeclaredKind::Enum) => Some(ResolvedType::enumeration(name)),
            NamespaceEntry::WellKnown(known) => Some(known.clone()),
            NamespaceEntry::Standin { name: trailing } => Some(ResolvedType::object(trailing)),
            NamespaceEntry::MarkerAlias(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeKind;

    fn namespace_for(source: &str) -> Namespace {
        let file = syn::parse_file(source).unwrap();
        let mut ns = Namespace::new();
        ns.add_imports(&file);
        ns
    }

    #[test]
    fn test_well_known_import() {
        let ns = namespace_for("use modkit::engine::Container;");
        let ty = ns.resolve_name("Container").unwrap();
        assert_eq!(ty, ResolvedType::object("Container"));
    }

    #[test]
    fn test_unresolvable_import_becomes_standin() {
        let ns = namespace_for("use some_vendor::widgets::Widget;");
        assert!(matches!(
            ns.lookup("Widget"),
            Some(NamespaceEntry::Standin { .. })
        ));
        let ty = ns.resolve_name("Widget").unwrap();
        assert_eq!(ty.kind, TypeKind::Object);
        assert_eq!(ty.name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_renamed_import_resolves_by_trailing_symbol() {
        let ns = namespace_for("use some_vendor::Widget as W;");
        let ty = ns.resolve_name("W").unwrap();
        // The stand-in carries the original trailing symbol, not the alias.
        assert_eq!(ty.name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_grouped_imports() {
        let ns = namespace_for("use modkit::engine::{Container, Directory as Dir};");
        assert!(ns.resolve_name("Container").is_some());
        assert_eq!(
            ns.resolve_name("Dir").unwrap(),
            ResolvedType::object("Directory")
        );
    }

    #[test]
    fn test_marker_alias() {
        let ns = namespace_for("use modkit::object_type as obj;");
        let path: syn::Path = syn::parse_str("obj").unwrap();
        assert_eq!(ns.marker_for_path(&path), Some(Marker::ObjectType));
    }

    #[test]
    fn test_marker_by_qualified_path() {
        let ns = Namespace::new();
        let path: syn::Path = syn::parse_str("modkit::object_type").unwrap();
        assert_eq!(ns.marker_for_path(&path), Some(Marker::ObjectType));
    }

    #[test]
    fn test_declared_wins_over_import() {
        let mut ns = namespace_for("use some_vendor::Widget;");
        ns.add_declared("Widget", DeclaredKind::Enum);
        // Declared module types shadow imports of the same spelling only
        // when declared first; the reverse order also keeps the declared
        // entry because imports never overwrite declarations.
        let mut ns2 = Namespace::new();
        ns2.add_declared("Widget", DeclaredKind::Enum);
        ns2.add_imports(&syn::parse_file("use some_vendor::Widget;").unwrap());
        assert_eq!(
            ns2.resolve_name("Widget").unwrap(),
            ResolvedType::enumeration("Widget")
        );
        assert_eq!(
            ns.resolve_name("Widget").unwrap(),
            ResolvedType::enumeration("Widget")
        );
    }

    #[test]
    fn test_glob_import_adds_nothing() {
        let ns = namespace_for("use some_vendor::*;");
        assert!(ns.resolve_name("Widget").is_none());
    }

    #[test]
    fn test_forward_reference_via_declared() {
        let mut ns = Namespace::new();
        ns.add_declared("Backup", DeclaredKind::Object);
        assert_eq!(
            ns.resolve_name("Backup").unwrap(),
            ResolvedType::object("Backup")
        );
    }
}
