//! Driver configuration.

use std::path::PathBuf;

/// Extension of mapping files when none is configured.
pub const DEFAULT_FILE_EXTENSION: &str = ".dcm.graphqls";

/// Where the driver looks for mapping files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Directories searched in order.
    pub paths: Vec<PathBuf>,

    /// File-name suffix of mapping files, including the leading dot.
    pub file_extension: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

impl DriverConfig {
    /// Create a configuration searching a single directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::default().with_path(path)
    }

    /// Add a search directory.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Set the mapping file extension.
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }
}
