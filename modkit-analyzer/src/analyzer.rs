//! Module-level analysis orchestration.
//!
//! The analyzer drives the whole static pipeline across one module's file
//! set: parse every file (collecting syntax errors and escalating them
//! together), collect declared names so forward references resolve, scan
//! each file, attach `impl` fragments to their types, synthesize missing
//! constructors, and infer the main object.

use crate::error::{AnalyzeResult, ParseError, ValidationError};
use crate::ir::{ModuleMetadata, ObjectTypeMetadata, SourceLocation};
use crate::parser::{
    collect_declarations, extract_doc_comments, DeclaredType, FileScanner, ImplFragment,
    Namespace, ScannedFile,
};
use convert_case::{Case, Casing};
use std::collections::HashMap;
use std::path::PathBuf;

/// One source file handed to the analyzer.
///
/// The analyzer never touches the filesystem itself; the source locator
/// (or a test) supplies paths and contents.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Analyzes one module's ordered file set into `ModuleMetadata`.
#[derive(Debug, Clone)]
pub struct ModuleAnalyzer {
    module_name: String,
    main_object: Option<String>,
}

impl ModuleAnalyzer {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            main_object: None,
        }
    }

    /// Set an explicit main-object name, overriding inference.
    pub fn with_main_object(mut self, name: impl Into<String>) -> Self {
        self.main_object = Some(name.into());
        self
    }

    /// Run the full static pipeline.
    pub fn analyze(&self, sources: &[SourceFile]) -> AnalyzeResult<ModuleMetadata> {
        tracing::debug!(
            module = %self.module_name,
            files = sources.len(),
            "analyzing module sources"
        );

        let parsed_files = self.parse_all(sources)?;
        let declarations = self.collect_all_declarations(&parsed_files)?;

        let mut base_namespace = Namespace::new();
        for decl in &declarations {
            base_namespace.add_declared(decl.name.clone(), decl.kind);
        }

        let mut objects: Vec<ObjectTypeMetadata> = Vec::new();
        let mut enums = Vec::new();
        let mut fragments: Vec<ImplFragment> = Vec::new();
        for (path, file) in &parsed_files {
            let mut namespace = base_namespace.clone();
            namespace.add_imports(file);
            let scanner = FileScanner::new(&namespace, path);
            let ScannedFile {
                objects: file_objects,
                enums: file_enums,
                fragments: file_fragments,
            } = scanner.scan(file)?;
            objects.extend(file_objects);
            enums.extend(file_enums);
            fragments.extend(file_fragments);
        }

        attach_fragments(&mut objects, fragments)?;

        for object in &mut objects {
            if object.constructor.is_none() && !object.is_interface {
                object.constructor = Some(crate::parser::synthesize_constructor(object));
            }
        }

        let main_object = self.infer_main_object(&objects, &enums)?;

        let mut metadata = ModuleMetadata::new(&self.module_name, main_object);
        if let Some(doc) = module_doc(&parsed_files) {
            metadata = metadata.with_doc(doc);
        }
        for object in objects {
            metadata = metadata.with_object(object);
        }
        for enum_type in enums {
            metadata = metadata.with_enum(enum_type);
        }

        tracing::debug!(
            module = %metadata.module_name,
            main = %metadata.main_object,
            objects = metadata.objects.len(),
            enums = metadata.enums.len(),
            "analysis complete"
        );
        Ok(metadata)
    }

    /// Parse every file; collect per-file syntax errors and escalate them
    /// together so one bad file does not hide the next.
    fn parse_all(&self, sources: &[SourceFile]) -> Result<Vec<(PathBuf, syn::File)>, ParseError> {
        let mut parsed = Vec::new();
        let mut errors = Vec::new();
        for source in sources {
            match syn::parse_file(&source.content) {
                Ok(file) => parsed.push((source.path.clone(), file)),
                Err(e) => {
                    let start = e.span().start();
                    errors.push(ParseError::syntax(
                        source.path.clone(),
                        start.line.max(1),
                        start.column + 1,
                        e.to_string(),
                    ));
                }
            }
        }
        match ParseError::aggregate(errors) {
            Some(aggregate) => Err(aggregate),
            None => Ok(parsed),
        }
    }

    fn collect_all_declarations(
        &self,
        parsed_files: &[(PathBuf, syn::File)],
    ) -> AnalyzeResult<Vec<DeclaredType>> {
        let mut declarations = Vec::new();
        let mut seen: HashMap<String, SourceLocation> = HashMap::new();
        for (path, file) in parsed_files {
            for decl in collect_declarations(file, path)? {
                if let Some(first) = seen.get(&decl.name) {
                    return Err(ValidationError::DuplicateType {
                        name: decl.name,
                        first: first.clone(),
                        second: decl.location,
                    }
                    .into());
                }
                seen.insert(decl.name.clone(), decl.location.clone());
                declarations.push(decl);
            }
        }
        Ok(declarations)
    }

    /// Inference chain: explicit override → module-name-derived guess →
    /// a type literally named `Main` → the sole declared object → failure
    /// listing every discovered name.
    fn infer_main_object(
        &self,
        objects: &[ObjectTypeMetadata],
        enums: &[crate::ir::EnumTypeMetadata],
    ) -> Result<String, ValidationError> {
        let candidates = || {
            objects
                .iter()
                .map(|o| o.name.clone())
                .chain(enums.iter().map(|e| e.name.clone()))
                .collect::<Vec<_>>()
        };

        let has_object = |name: &str| objects.iter().any(|o| o.name == name && !o.is_interface);

        if let Some(explicit) = &self.main_object {
            if has_object(explicit) {
                return Ok(explicit.clone());
            }
            return Err(ValidationError::MainObjectMissing {
                name: explicit.clone(),
                candidates: candidates(),
            });
        }

        let guess = self.module_name.to_case(Case::Pascal);
        if has_object(&guess) {
            return Ok(guess);
        }

        if has_object("Main") {
            return Ok("Main".to_string());
        }

        let mut plain = objects.iter().filter(|o| !o.is_interface);
        if let (Some(sole), None) = (plain.next(), plain.next()) {
            return Ok(sole.name.clone());
        }

        Err(ValidationError::MainObjectNotFound {
            candidates: candidates(),
        })
    }
}

/// Attach `impl` fragments to their objects, in fragment order.
fn attach_fragments(
    objects: &mut [ObjectTypeMetadata],
    fragments: Vec<ImplFragment>,
) -> Result<(), ValidationError> {
    for fragment in fragments {
        let Some(object) = objects.iter_mut().find(|o| o.name == fragment.type_name) else {
            // A fragment for a declared enum carries nothing attachable.
            continue;
        };
        for function in fragment.functions {
            object.functions.push(function);
        }
        if let Some(constructor) = fragment.constructor {
            if object.constructor.is_some() {
                return Err(ValidationError::DuplicateConstructor {
                    type_name: object.name.clone(),
                });
            }
            object.constructor = Some(constructor);
        }
    }
    Ok(())
}

/// Module documentation comes from the first file's inner doc comments.
fn module_doc(parsed_files: &[(PathBuf, syn::File)]) -> Option<String> {
    let (_, first) = parsed_files.first()?;
    extract_doc_comments(&first.attrs)
}
