//! # modkit-cli
//!
//! Command-line front end for the module analysis pipeline: discovers
//! source files, runs the static analyzer, and emits or installs the
//! resulting registration metadata.

pub mod config;
pub mod error;
pub mod scanner;
pub mod writer;

use config::{Config, ConfigManager};
use error::CliResult;
use scanner::SourceScanner;
use std::path::Path;

/// Scan every configured source path and analyze the combined file set.
pub fn analyze_project(root: &Path, config: &Config) -> CliResult<modkit_analyzer::ModuleMetadata> {
    let mut sources = Vec::new();
    for path in &config.source.paths {
        let dir = root.join(path);
        let scanner = SourceScanner::new(&dir)
            .with_gitignore(config.source.respect_gitignore)
            .with_include(&config.source.include)?
            .with_exclude(&config.source.exclude)?;
        for file in scanner.scan_allow_empty()? {
            sources.push(file.into_source());
        }
    }

    let module_name = ConfigManager::module_name(config, root)?;
    tracing::info!(module = %module_name, files = sources.len(), "analyzing project");
    let mut analyzer = modkit_analyzer::ModuleAnalyzer::new(module_name);
    if let Some(main_object) = &config.module.main_object {
        analyzer = analyzer.with_main_object(main_object);
    }

    Ok(analyzer.analyze(&sources)?)
}
