//! Source file discovery.
//!
//! Walks the configured directories for Rust source files, respecting
//! `.gitignore` patterns plus include and exclude globs. Results are
//! sorted by relative path so a scan is deterministic regardless of the
//! walker's traversal order.

use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

impl DiscoveredFile {
    /// Convert into the analyzer's source form, keyed by relative path.
    pub fn into_source(self) -> modkit_analyzer::SourceFile {
        modkit_analyzer::SourceFile::new(self.relative_path, self.content)
    }
}

/// Scanner for discovering Rust source files.
#[derive(Debug)]
pub struct SourceScanner {
    root: PathBuf,
    respect_gitignore: bool,
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
}

impl SourceScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Require files to match one of the given glob patterns.
    pub fn with_include(mut self, patterns: &[String]) -> Result<Self, ScanError> {
        self.include = compile_patterns(patterns)?;
        Ok(self)
    }

    /// Exclude files matching any of the given glob patterns.
    pub fn with_exclude(mut self, patterns: &[String]) -> Result<Self, ScanError> {
        self.exclude = compile_patterns(patterns)?;
        Ok(self)
    }

    /// Scan the directory and return all discovered Rust files, sorted by
    /// relative path.
    pub fn scan(&self) -> CliResult<Vec<DiscoveredFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }

            let relative = self.relative_path(path);
            if !self.matches(&relative) {
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(DiscoveredFile {
                path: path.to_path_buf(),
                relative_path: relative,
                content,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        if files.is_empty() {
            return Err(ScanError::no_source_files(self.root.clone()).into());
        }

        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<DiscoveredFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoSourceFiles { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn matches(&self, relative: &Path) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches_path(relative)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches_path(relative))
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, ScanError> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| ScanError::invalid_pattern(p.clone(), e.to_string()))
        })
        .collect()
}
