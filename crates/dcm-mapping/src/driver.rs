//! The mapping driver.
//!
//! Locates the mapping file for a class, loads it once, and evaluates the
//! class definition into caller-owned metadata.

use crate::config::DriverConfig;
use crate::directives as d;
use crate::error::MappingError;
use crate::evaluator::MetadataEvaluator;
use crate::loader::{ClassDefinitions, SchemaCompiler, SchemaLoader, SdlCompiler};
use crate::locator::FileLocator;
use crate::metadata::ClassMetadata;
use dcm_sdl::ObjectTypeDefinition;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads class metadata from SDL mapping files.
pub struct MappingDriver<C: SchemaCompiler = SdlCompiler> {
    locator: FileLocator,
    loader: SchemaLoader<C>,
    /// Loaded files, keyed by path.
    files: HashMap<PathBuf, ClassDefinitions>,
}

impl MappingDriver<SdlCompiler> {
    pub fn new(config: DriverConfig) -> Self {
        Self::with_compiler(config, SdlCompiler)
    }
}

impl<C: SchemaCompiler> MappingDriver<C> {
    pub fn with_compiler(config: DriverConfig, compiler: C) -> Self {
        Self {
            locator: FileLocator::new(&config),
            loader: SchemaLoader::new(compiler),
            files: HashMap::new(),
        }
    }

    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }

    /// Populate `metadata` for `class_name` from its mapping file.
    pub fn load_metadata_for_class(
        &mut self,
        class_name: &str,
        metadata: &mut ClassMetadata,
    ) -> Result<(), MappingError> {
        let definition = self.class_definition(class_name)?;
        MetadataEvaluator::evaluate(class_name, definition, metadata)
    }

    /// The SDL type bound to `class_name`.
    pub fn class_definition(
        &mut self,
        class_name: &str,
    ) -> Result<&ObjectTypeDefinition, MappingError> {
        let path = self.locator.find_mapping_file(class_name)?;
        let classes = self.load_file(&path)?;
        classes
            .get(class_name)
            .ok_or_else(|| MappingError::ClassNotFound {
                class: class_name.to_string(),
                path,
            })
    }

    /// Every class declared by any mapping file, sorted.
    pub fn all_class_names(&mut self) -> Result<Vec<String>, MappingError> {
        Ok(self.all_class_definitions()?.into_keys().collect())
    }

    /// Class definitions of every mapping file merged together.
    ///
    /// When two files declare the same class the later file wins.
    pub fn all_class_definitions(&mut self) -> Result<ClassDefinitions, MappingError> {
        let mut merged = ClassDefinitions::new();
        for path in self.locator.mapping_files()? {
            for (name, definition) in self.load_file(&path)? {
                if merged.insert(name.clone(), definition.clone()).is_some() {
                    warn!(class = %name, path = %path.display(), "class declared in several mapping files, last wins");
                }
            }
        }
        Ok(merged)
    }

    /// Whether the class is absent from the mapping files or declared as
    /// neither an entity nor a mapped superclass.
    pub fn is_transient(&mut self, class_name: &str) -> Result<bool, MappingError> {
        let definition = match self.class_definition(class_name) {
            Ok(definition) => definition,
            Err(MappingError::MappingFileNotFound { .. } | MappingError::ClassNotFound { .. }) => {
                return Ok(true)
            }
            Err(err) => return Err(err),
        };
        Ok(definition.directive(d::ENTITY).is_none()
            && definition.directive(d::MAPPED_SUPERCLASS).is_none())
    }

    fn load_file(&mut self, path: &Path) -> Result<&ClassDefinitions, MappingError> {
        match self.files.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => {
                debug!(path = %path.display(), "mapping file already loaded");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let classes = self.loader.load(path)?;
                Ok(entry.insert(classes))
            }
        }
    }
}
