//! Mapping file discovery.

use crate::config::DriverConfig;
use crate::error::MappingError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Finds mapping files in the configured directories.
#[derive(Debug, Clone)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
    file_extension: String,
}

impl FileLocator {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            paths: config.paths.clone(),
            file_extension: config.file_extension.clone(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// File name for a class: namespace separators become dots.
    pub fn file_name(&self, class_name: &str) -> String {
        format!("{}{}", class_name.replace('\\', "."), self.file_extension)
    }

    /// First directory holding the class's mapping file.
    pub fn find_mapping_file(&self, class_name: &str) -> Result<PathBuf, MappingError> {
        let file_name = self.file_name(class_name);
        self.paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| MappingError::MappingFileNotFound {
                class: class_name.to_string(),
                extension: self.file_extension.clone(),
            })
    }

    pub fn file_exists(&self, class_name: &str) -> bool {
        self.find_mapping_file(class_name).is_ok()
    }

    /// Every mapping file under the configured directories, sorted.
    ///
    /// Directories that do not exist are skipped.
    pub fn mapping_files(&self) -> Result<Vec<PathBuf>, MappingError> {
        let mut files = Vec::new();
        for dir in &self.paths {
            if dir.is_dir() {
                self.collect(dir, &mut files)?;
            } else {
                trace!(path = %dir.display(), "mapping directory does not exist");
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn collect(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), MappingError> {
        let io_error = |source| MappingError::Io {
            path: dir.to_path_buf(),
            source,
        };
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_dir() {
                self.collect(&path, files)?;
            } else if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&self.file_extension))
            {
                files.push(path);
            }
        }
        Ok(())
    }
}
