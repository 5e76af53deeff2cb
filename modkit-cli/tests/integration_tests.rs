//! Integration tests for modkit-cli.
//!
//! These tests run the pipeline end to end: scanning, analysis,
//! conversion, and metadata output.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use modkit_analyzer::TypeKind;
use modkit_cli::{
    analyze_project,
    config::{Config, ConfigManager},
    scanner::SourceScanner,
    writer::MetadataWriter,
};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Create a temporary directory with test files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn fixture_config() -> Config {
    let mut config = Config::default();
    config.module.name = Some("deployer".to_string());
    config
}

// =============================================================================
// Scanner
// =============================================================================

#[test]
fn test_scanner_finds_fixture_files() {
    let scanner = SourceScanner::new(fixtures_path().join("src"));
    let files = scanner.scan().unwrap();

    let names: Vec<_> = files
        .iter()
        .map(|f| f.relative_path.to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["lib.rs", "severity.rs", "tasks.rs"]);
}

// =============================================================================
// Analysis
// =============================================================================

#[test]
fn test_analyze_fixture_project() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();

    assert_eq!(metadata.module_name, "deployer");
    assert_eq!(metadata.main_object, "Deployer");

    let names: Vec<_> = metadata.type_names().collect();
    assert_eq!(names, vec!["Deployer", "Task", "Notifier", "Severity"]);
}

#[test]
fn test_analyze_extracts_members() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();

    let deployer = metadata.get_object("Deployer").unwrap();
    assert_eq!(deployer.fields.len(), 2);
    assert_eq!(deployer.fields[1].api_name, "replicas");
    assert!(deployer.fields[1].has_default);

    let deploy = &deployer.functions[0];
    assert_eq!(deploy.api_name, "deploy");
    assert!(deploy.is_async);
    assert!(deploy.parameters[1].is_optional());

    let healthy = &deployer.functions[1];
    assert!(healthy.is_check);
}

#[test]
fn test_analyze_resolves_cross_file_references() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();

    let task = metadata.get_object("Task").unwrap();
    let severity_field = &task.fields[1];
    assert_eq!(severity_field.resolved_type.kind, TypeKind::Enum);
    assert_eq!(severity_field.resolved_type.name.as_deref(), Some("Severity"));

    // Explicit `create` constructor.
    let ctor = task.constructor.as_ref().unwrap();
    assert_eq!(ctor.parameters.len(), 2);
    assert!(ctor.parameters[1].resolved_type.is_optional);
}

#[test]
fn test_analyze_interface_and_enum() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();

    let notifier = metadata.get_object("Notifier").unwrap();
    assert!(notifier.is_interface);
    assert!(notifier.constructor.is_none());

    let severity = metadata.get_enum("Severity").unwrap();
    let values: Vec<_> = severity.members.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(values, vec!["Info", "WARN", "Critical"]);
}

#[test]
fn test_unmarked_types_stay_invisible() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();
    assert!(metadata.get_object("Internal").is_none());
}

#[test]
fn test_analyze_temp_project_infers_main() {
    let dir = create_temp_project(&[(
        "src/lib.rs",
        r#"
#[object_type]
pub struct Main {
    #[field]
    pub name: String,
}
"#,
    )]);

    let mut config = Config::default();
    config.module.name = Some("whatever".to_string());
    let metadata = analyze_project(dir.path(), &config).unwrap();
    assert_eq!(metadata.main_object, "Main");
}

#[test]
fn test_analyze_reports_syntax_errors() {
    let dir = create_temp_project(&[
        ("src/good.rs", "#[object_type]\npub struct Good {}\n"),
        ("src/bad.rs", "pub struct Bad { name String }\n"),
    ]);

    let mut config = Config::default();
    config.module.name = Some("m".to_string());
    let err = analyze_project(dir.path(), &config).unwrap_err();
    assert!(err.to_string().contains("bad.rs"));
}

// =============================================================================
// Conversion
// =============================================================================

#[tokio::test]
async fn test_register_fixture_project() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();

    let engine = modkit::RecordingEngine::new();
    modkit::register(&engine, &metadata).await.unwrap();

    let installed = engine.installed();
    assert_eq!(installed.len(), 1);
    let module = &installed[0];
    assert_eq!(module.name, "deployer");

    // Objects first, then enums, regardless of file order.
    let names: Vec<_> = module.types.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Deployer", "Task", "Notifier", "Severity"]);
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_metadata_round_trips_through_writer() {
    let metadata = analyze_project(&fixtures_path(), &fixture_config()).unwrap();
    let content = serde_json::to_string_pretty(&metadata).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("module/metadata.json");
    let writer = MetadataWriter::new(false);
    writer.write(&path, &content).unwrap();

    let loaded: modkit_analyzer::ModuleMetadata =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, metadata);
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_loading_from_file() {
    let dir = create_temp_project(&[(
        "modkit.toml",
        r#"
[module]
name = "backup-tool"

[source]
paths = ["src"]
exclude = ["**/generated/**"]

[output]
dir = "out"
file = "module.json"
"#,
    )]);

    let config = ConfigManager::load(Some(&dir.path().join("modkit.toml"))).unwrap();
    assert_eq!(config.module.name.as_deref(), Some("backup-tool"));
    assert_eq!(config.source.exclude, vec!["**/generated/**"]);
    assert_eq!(config.output.file, "module.json");
}

#[test]
fn test_config_defaults_when_no_file() {
    let dir = TempDir::new().unwrap();
    let config = ConfigManager::load(Some(&dir.path().join("missing.toml"))).unwrap();
    assert_eq!(config.output.file, "metadata.json");
    assert!(config.module.name.is_none());
}

#[test]
fn test_init_content_round_trips() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("modkit.toml");
    fs::write(&config_path, ConfigManager::default_config_content()).unwrap();

    let loaded = ConfigManager::load(Some(&config_path)).unwrap();
    assert_eq!(loaded.source.paths, vec![PathBuf::from("src")]);
    assert_eq!(loaded.output.file, "metadata.json");
}
