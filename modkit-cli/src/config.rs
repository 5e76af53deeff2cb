//! Configuration management for the CLI.
//!
//! Configuration comes from a `modkit.toml` file, merged with command-line
//! arguments; arguments win.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "modkit.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Module identity.
    pub module: ModuleConfig,

    /// Source discovery settings.
    pub source: SourceConfig,

    /// Metadata output settings.
    pub output: OutputConfig,
}

/// Module identity configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Module name. Defaults to the scanned directory's name.
    pub name: Option<String>,

    /// Explicit main-object name, overriding inference.
    pub main_object: Option<String>,
}

/// Source discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directories to scan, relative to the project root.
    pub paths: Vec<PathBuf>,

    /// Glob patterns a file must match to be included. Empty means all.
    pub include: Vec<String>,

    /// Glob patterns that exclude matching files.
    pub exclude: Vec<String>,

    /// Whether to respect `.gitignore` files while walking.
    pub respect_gitignore: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from("src")],
            include: Vec::new(),
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }
}

/// Metadata output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for the metadata file.
    pub dir: PathBuf,

    /// Metadata filename.
    pub file: String,

    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./module"),
            file: "metadata.json".to_string(),
            pretty: true,
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref name) = args.module_name {
            config.module.name = Some(name.clone());
        }

        if let Some(ref main_object) = args.main_object {
            config.module.main_object = Some(main_object.clone());
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.output_file {
            config.output.file = file.clone();
        }

        if let Some(pretty) = args.pretty {
            config.output.pretty = pretty;
        }

        config
    }

    /// Resolve the module name: config value, or the project directory name.
    pub fn module_name(config: &Config, root: &Path) -> CliResult<String> {
        if let Some(name) = &config.module.name {
            return Ok(name.clone());
        }
        root.canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(root)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ConfigError::invalid_value(
                    "module.name",
                    "not set and the project directory has no usable name",
                )
                .into()
            })
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# modkit configuration file

[module]
# Module name. Defaults to the project directory name.
# name = "my-module"

# Entrypoint object. Defaults to the PascalCase form of the module name,
# then a type named `Main`, then the only declared object.
# main_object = "MyModule"

[source]
# Directories to scan for marked declarations
paths = ["src"]

# Glob patterns a file must match to be included (empty = all .rs files)
include = []

# Glob patterns that exclude matching files
exclude = []

# Respect .gitignore files while walking
respect_gitignore = true

[output]
# Output directory for the metadata file
dir = "./module"

# Metadata filename
file = "metadata.json"

# Pretty-print the JSON output
pretty = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Module name override.
    pub module_name: Option<String>,

    /// Main object override.
    pub main_object: Option<String>,

    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub output_file: Option<String>,

    /// Pretty-print override.
    pub pretty: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.module.name.is_none());
        assert!(config.module.main_object.is_none());
        assert_eq!(config.source.paths, vec![PathBuf::from("src")]);
        assert!(config.source.respect_gitignore);
        assert_eq!(config.output.dir, PathBuf::from("./module"));
        assert_eq!(config.output.file, "metadata.json");
        assert!(config.output.pretty);
    }

    #[test]
    fn test_merge_cli_args_overrides() {
        let config = Config::default();
        let args = CliArgs {
            module_name: Some("backup-tool".to_string()),
            main_object: Some("Backup".to_string()),
            output: Some(PathBuf::from("./custom")),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.module.name.as_deref(), Some("backup-tool"));
        assert_eq!(merged.module.main_object.as_deref(), Some("Backup"));
        assert_eq!(merged.output.dir, PathBuf::from("./custom"));
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let config = Config::default();
        let args = CliArgs::default();

        let merged = ConfigManager::merge_cli_args(config.clone(), &args);
        assert_eq!(merged.output.dir, config.output.dir);
        assert_eq!(merged.output.file, config.output.file);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[module]
name = "backup-tool"
main_object = "Backup"

[source]
paths = ["src", "extra"]
exclude = ["**/generated/**"]
respect_gitignore = false

[output]
dir = "./out"
file = "module.json"
pretty = false
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.module.name.as_deref(), Some("backup-tool"));
        assert_eq!(config.module.main_object.as_deref(), Some("Backup"));
        assert_eq!(
            config.source.paths,
            vec![PathBuf::from("src"), PathBuf::from("extra")]
        );
        assert_eq!(config.source.exclude, vec!["**/generated/**"]);
        assert!(!config.source.respect_gitignore);
        assert_eq!(config.output.dir, PathBuf::from("./out"));
        assert_eq!(config.output.file, "module.json");
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_default_config_content_is_valid_toml() {
        let config: Config = toml::from_str(ConfigManager::default_config_content()).unwrap();
        assert_eq!(config.source.paths, vec![PathBuf::from("src")]);
        assert_eq!(config.output.file, "metadata.json");
    }

    #[test]
    fn test_module_name_falls_back_to_directory() {
        let config = Config::default();
        let name = ConfigManager::module_name(&config, Path::new("/tmp")).unwrap();
        assert_eq!(name, "tmp");
    }
}
