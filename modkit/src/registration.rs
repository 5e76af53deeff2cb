//! Lowering analyzed metadata into engine definitions.
//!
//! The converter walks a `ModuleMetadata` in declaration order and emits a
//! `ModuleDef` as one builder chain per type: objects before enums, fields
//! before functions within an object, parameters in declaration order.
//! Optionality is applied to a type reference before the reference is
//! attached to its parent.

use crate::engine::Engine;
use crate::error::RegistrationError;
use crate::module::{ModuleDef, ModuleId};
use crate::typedef::{
    ArgDef, EnumDef, EnumMemberDef, FieldDef, FunctionCache, FunctionDef, ObjectDef, TypeDef,
};
use modkit_analyzer::{
    AnalysisError, CachePolicy, EnumTypeMetadata, FieldMetadata, FunctionMetadata, ModuleMetadata,
    ObjectTypeMetadata, ParameterMetadata, ResolvedType, TypeKind,
};

/// Convert analyzed metadata into an engine module definition.
pub fn convert(metadata: &ModuleMetadata) -> Result<ModuleDef, AnalysisError> {
    let mut module = ModuleDef::new(&metadata.module_name, &metadata.main_object);
    if let Some(doc) = &metadata.doc {
        module = module.with_doc(doc);
    }
    for object in &metadata.objects {
        module = module.with_object(lower_object(object)?);
    }
    for enum_type in &metadata.enums {
        module = module.with_enum(lower_enum(enum_type));
    }
    Ok(module)
}

/// Convert and install in one step.
pub async fn register(
    engine: &dyn Engine,
    metadata: &ModuleMetadata,
) -> Result<ModuleId, RegistrationError> {
    let module = convert(metadata)?;
    tracing::debug!(
        module = %module.name,
        types = module.types.len(),
        "installing module definition"
    );
    let id = engine.install(&module).await?;
    Ok(id)
}

fn lower_object(object: &ObjectTypeMetadata) -> Result<ObjectDef, AnalysisError> {
    let mut def = if object.is_interface {
        ObjectDef::interface(&object.name)
    } else {
        ObjectDef::new(&object.name)
    };
    if let Some(doc) = &object.doc {
        def = def.with_doc(doc);
    }
    if let Some(reason) = &object.deprecated {
        def = def.with_deprecated(reason);
    }
    // Interfaces expose functions only; stray fields in cached metadata
    // never reach the engine.
    if !object.is_interface {
        for field in &object.fields {
            def = def.with_field(lower_field(&object.name, field)?);
        }
    }
    for function in &object.functions {
        def = def.with_function(lower_function(&object.name, function)?);
    }
    if let Some(constructor) = &object.constructor {
        if object.is_interface {
            return Err(AnalysisError::UnsupportedLowering {
                type_name: object.name.clone(),
                message: "interfaces cannot carry a constructor".into(),
            });
        }
        def = def.with_constructor(lower_function(&object.name, constructor)?);
    }
    Ok(def)
}

fn lower_field(type_name: &str, field: &FieldMetadata) -> Result<FieldDef, AnalysisError> {
    if field.resolved_type.is_void() {
        return Err(AnalysisError::UnsupportedLowering {
            type_name: type_name.into(),
            message: format!("field `{}` has void type", field.api_name),
        });
    }
    let field_type = lower_type(type_name, &field.resolved_type)?;
    let mut def = FieldDef::new(&field.api_name, field_type);
    if let Some(doc) = &field.doc {
        def = def.with_doc(doc);
    }
    if let Some(default) = &field.default {
        def = def.with_default(default.clone());
    }
    if let Some(reason) = &field.deprecated {
        def = def.with_deprecated(reason);
    }
    Ok(def)
}

fn lower_function(
    type_name: &str,
    function: &FunctionMetadata,
) -> Result<FunctionDef, AnalysisError> {
    let return_type = lower_type(type_name, &function.return_type)?;
    let mut def = FunctionDef::new(&function.api_name, return_type);
    for parameter in &function.parameters {
        def = def.with_arg(lower_parameter(type_name, parameter)?);
    }
    if let Some(doc) = &function.doc {
        def = def.with_doc(doc);
    }
    if let Some(reason) = &function.deprecated {
        def = def.with_deprecated(reason);
    }
    def = def.with_cache(lower_cache(function.cache_policy));
    def = def.with_check(function.is_check);
    Ok(def)
}

fn lower_parameter(
    type_name: &str,
    parameter: &ParameterMetadata,
) -> Result<ArgDef, AnalysisError> {
    // A source default without a wire form still makes the argument
    // omittable, so the optionality moves into the type reference.
    let omittable_without_default = parameter.is_optional() && parameter.default.is_none();
    let arg_type = lower_type(type_name, &parameter.resolved_type)?
        .with_optional(parameter.resolved_type.is_optional || omittable_without_default);
    let mut def = ArgDef::new(&parameter.api_name, arg_type);
    if let Some(doc) = &parameter.doc {
        def = def.with_doc(doc);
    }
    if let Some(default) = &parameter.default {
        def = def.with_default(default.clone());
    }
    if let Some(path) = &parameter.default_path {
        def = def.with_default_path(path);
    }
    if !parameter.ignore.is_empty() {
        def = def.with_ignore(parameter.ignore.clone());
    }
    if let Some(reason) = &parameter.deprecated {
        def = def.with_deprecated(reason);
    }
    Ok(def)
}

fn lower_cache(policy: CachePolicy) -> FunctionCache {
    match policy {
        CachePolicy::Never => FunctionCache::Never,
        CachePolicy::Session => FunctionCache::Session,
        CachePolicy::Seconds(ttl) => FunctionCache::Seconds(ttl),
    }
}

fn lower_type(type_name: &str, resolved: &ResolvedType) -> Result<TypeDef, AnalysisError> {
    let base = match resolved.kind {
        TypeKind::String => TypeDef::string(),
        TypeKind::Integer => TypeDef::integer(),
        TypeKind::Float => TypeDef::float(),
        TypeKind::Boolean => TypeDef::boolean(),
        TypeKind::Void => TypeDef::void(),
        TypeKind::List => {
            // An illegible element lowers to a void placeholder rather
            // than failing the whole module.
            let element = match &resolved.element_type {
                Some(element) => lower_type(type_name, element)?,
                None => TypeDef::void(),
            };
            TypeDef::list(element)
        }
        TypeKind::Object => TypeDef::object(named(type_name, resolved)?),
        TypeKind::Interface => TypeDef::interface(named(type_name, resolved)?),
        TypeKind::Enum => TypeDef::enumeration(named(type_name, resolved)?),
        TypeKind::Scalar => TypeDef::scalar(named(type_name, resolved)?),
    };
    Ok(base.with_optional(resolved.is_optional))
}

fn named(type_name: &str, resolved: &ResolvedType) -> Result<String, AnalysisError> {
    resolved
        .name
        .clone()
        .ok_or_else(|| AnalysisError::UnsupportedLowering {
            type_name: type_name.into(),
            message: format!("{} reference carries no name", resolved.kind),
        })
}

fn lower_enum(enum_type: &EnumTypeMetadata) -> EnumDef {
    let mut def = EnumDef::new(&enum_type.name);
    if let Some(doc) = &enum_type.doc {
        def = def.with_doc(doc);
    }
    if let Some(reason) = &enum_type.deprecated {
        def = def.with_deprecated(reason);
    }
    for member in &enum_type.members {
        let mut m = EnumMemberDef::new(&member.name, &member.value);
        if let Some(doc) = &member.doc {
            m = m.with_doc(doc);
        }
        if let Some(reason) = &member.deprecated {
            m = m.with_deprecated(reason);
        }
        def = def.with_member(m);
    }
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RecordingEngine;
    use crate::module::ModuleType;
    use modkit_analyzer::EnumMemberMetadata;
    use serde_json::json;

    fn sample_metadata() -> ModuleMetadata {
        let backup = ObjectTypeMetadata::new("Backup")
            .with_doc("Runs scheduled backups.")
            .with_field(FieldMetadata::new(
                "name",
                "name",
                ResolvedType::string(),
            ))
            .with_function(
                FunctionMetadata::new("run", "run", ResolvedType::object("Container"))
                    .with_parameter(
                        ParameterMetadata::new("retries", "retries", ResolvedType::integer())
                            .with_default(json!(3)),
                    )
                    .with_parameter(ParameterMetadata::new(
                        "token",
                        "token",
                        ResolvedType::object("Secret").with_optional(true),
                    )),
            )
            .with_constructor(FunctionMetadata::constructor("Backup").with_parameter(
                ParameterMetadata::new("name", "name", ResolvedType::string()),
            ));
        let severity = EnumTypeMetadata::new("Severity")
            .with_member(EnumMemberMetadata::new("Low", "LOW"))
            .with_member(EnumMemberMetadata::new("High", "HIGH"));
        ModuleMetadata::new("backup-tool", "Backup")
            .with_enum(severity)
            .with_object(backup)
    }

    #[test]
    fn test_objects_emitted_before_enums() {
        // Metadata listing the enum first still installs objects first.
        let module = convert(&sample_metadata()).unwrap();
        let kinds: Vec<_> = module
            .types
            .iter()
            .map(|t| match t {
                ModuleType::Object(o) => ("object", o.name.clone()),
                ModuleType::Enum(e) => ("enum", e.name.clone()),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("object", "Backup".to_string()),
                ("enum", "Severity".to_string())
            ]
        );
    }

    #[test]
    fn test_fields_before_functions() {
        let module = convert(&sample_metadata()).unwrap();
        let Some(ModuleType::Object(backup)) = module.get_type("Backup") else {
            panic!("Backup missing");
        };
        assert_eq!(backup.fields[0].name, "name");
        assert_eq!(backup.functions[0].name, "run");
        let args: Vec<_> = backup.functions[0]
            .args
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(args, vec!["retries", "token"]);
    }

    #[test]
    fn test_optionality_applied_to_reference() {
        let module = convert(&sample_metadata()).unwrap();
        let Some(ModuleType::Object(backup)) = module.get_type("Backup") else {
            panic!("Backup missing");
        };
        let token = &backup.functions[0].args[1];
        assert!(token.arg_type.optional);
        assert!(token.default.is_none());
    }

    #[test]
    fn test_serializable_default_carried_verbatim() {
        let module = convert(&sample_metadata()).unwrap();
        let Some(ModuleType::Object(backup)) = module.get_type("Backup") else {
            panic!("Backup missing");
        };
        let retries = &backup.functions[0].args[0];
        assert_eq!(retries.default, Some(json!(3)));
        assert!(!retries.arg_type.optional);
    }

    #[test]
    fn test_unserializable_default_becomes_optional() {
        let metadata = ModuleMetadata::new("m", "A").with_object(
            ObjectTypeMetadata::new("A").with_function(
                FunctionMetadata::new("go", "go", ResolvedType::void()).with_parameter(
                    ParameterMetadata::new("cfg", "cfg", ResolvedType::object("Config"))
                        .with_default_present(),
                ),
            ),
        );
        let module = convert(&metadata).unwrap();
        let Some(ModuleType::Object(a)) = module.get_type("A") else {
            panic!("A missing");
        };
        let cfg = &a.functions[0].args[0];
        assert!(cfg.arg_type.optional);
        assert!(cfg.default.is_none());
    }

    #[test]
    fn test_list_without_element_lowers_to_placeholder() {
        let metadata = ModuleMetadata::new("m", "A").with_object(
            ObjectTypeMetadata::new("A").with_function(FunctionMetadata::new(
                "all",
                "all",
                ResolvedType::list(None),
            )),
        );
        let module = convert(&metadata).unwrap();
        let Some(ModuleType::Object(a)) = module.get_type("A") else {
            panic!("A missing");
        };
        match &a.functions[0].return_type.kind {
            crate::typedef::TypeDefKind::List { element } => assert!(element.is_void()),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_interface_fields_are_not_lowered() {
        let notifier = ObjectTypeMetadata::interface("Notifier")
            .with_field(FieldMetadata::new("label", "label", ResolvedType::string()))
            .with_function(FunctionMetadata::new(
                "notify",
                "notify",
                ResolvedType::boolean(),
            ));
        let metadata = ModuleMetadata::new("m", "Main")
            .with_object(ObjectTypeMetadata::new("Main"))
            .with_object(notifier);
        let module = convert(&metadata).unwrap();
        let Some(ModuleType::Object(iface)) = module.get_type("Notifier") else {
            panic!("Notifier missing");
        };
        assert!(iface.interface);
        assert!(iface.fields.is_empty());
        assert_eq!(iface.functions.len(), 1);
    }

    #[test]
    fn test_named_reference_without_name_fails() {
        let broken = ResolvedType {
            kind: TypeKind::Object,
            name: None,
            is_optional: false,
            element_type: None,
            is_self: false,
        };
        let metadata = ModuleMetadata::new("m", "A").with_object(
            ObjectTypeMetadata::new("A")
                .with_function(FunctionMetadata::new("bad", "bad", broken)),
        );
        let err = convert(&metadata).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedLowering { .. }));
    }

    #[test]
    fn test_void_field_rejected() {
        let metadata = ModuleMetadata::new("m", "A").with_object(
            ObjectTypeMetadata::new("A")
                .with_field(FieldMetadata::new("nope", "nope", ResolvedType::void())),
        );
        let err = convert(&metadata).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedLowering { .. }));
    }

    #[test]
    fn test_cache_policy_lowering() {
        let metadata = ModuleMetadata::new("m", "A").with_object(
            ObjectTypeMetadata::new("A").with_function(
                FunctionMetadata::new("version", "version", ResolvedType::string())
                    .with_cache_policy(CachePolicy::Seconds(60)),
            ),
        );
        let module = convert(&metadata).unwrap();
        let Some(ModuleType::Object(a)) = module.get_type("A") else {
            panic!("A missing");
        };
        assert_eq!(a.functions[0].cache, FunctionCache::Seconds(60));
    }

    #[test]
    fn test_self_reference_lowers_to_own_object() {
        let metadata = ModuleMetadata::new("m", "Pipeline").with_object(
            ObjectTypeMetadata::new("Pipeline").with_function(FunctionMetadata::new(
                "with_step",
                "withStep",
                ResolvedType::self_reference("Pipeline"),
            )),
        );
        let module = convert(&metadata).unwrap();
        let Some(ModuleType::Object(p)) = module.get_type("Pipeline") else {
            panic!("Pipeline missing");
        };
        assert_eq!(
            p.functions[0].return_type,
            TypeDef::object("Pipeline")
        );
    }

    #[tokio::test]
    async fn test_register_installs_converted_module() {
        let engine = RecordingEngine::new();
        let id = register(&engine, &sample_metadata()).await.unwrap();
        assert_eq!(id.to_string().len(), 36);
        let installed = engine.installed();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].name, "backup-tool");
        assert_eq!(installed[0].main_object, "Backup");
    }

    #[tokio::test]
    async fn test_register_propagates_lowering_errors() {
        let engine = RecordingEngine::new();
        let metadata = ModuleMetadata::new("m", "A").with_object(
            ObjectTypeMetadata::new("A")
                .with_field(FieldMetadata::new("nope", "nope", ResolvedType::void())),
        );
        let err = register(&engine, &metadata).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Analysis(_)));
        assert!(engine.is_empty());
    }
}
