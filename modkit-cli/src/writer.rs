//! Metadata output writer with dry-run support.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf, bytes: usize },
    /// Dry run: content was not written.
    DryRun { content: String, path: PathBuf },
}

impl WriteResult {
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }
}

/// Writes the metadata file, creating parent directories as needed.
#[derive(Debug)]
pub struct MetadataWriter {
    dry_run: bool,
}

impl MetadataWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("module/metadata.json");

        let writer = MetadataWriter::new(false);
        let result = writer.write(&path, "{}").unwrap();

        assert!(result.was_written());
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.json");

        let writer = MetadataWriter::new(true);
        let result = writer.write(&path, "{\"module_name\":\"m\"}").unwrap();

        assert!(!result.was_written());
        assert!(!path.exists());
        let WriteResult::DryRun { content, .. } = result else {
            panic!("expected dry run");
        };
        assert_eq!(content, "{\"module_name\":\"m\"}");
    }
}
