//! Mapping-file loading.
//!
//! A mapping file is compiled into an SDL document; every object type that
//! carries `@Class(name: "...")` becomes a class definition keyed by that
//! name.

use crate::directives as d;
use crate::error::MappingError;
use dcm_sdl::{Document, ObjectTypeDefinition, SchemaError, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Class name to the SDL type declaring it.
pub type ClassDefinitions = BTreeMap<String, ObjectTypeDefinition>;

/// Compiles a mapping file into an SDL document.
pub trait SchemaCompiler {
    fn compile(&self, path: &Path) -> Result<Document, SchemaError>;
}

/// The `dcm-sdl` compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdlCompiler;

impl SchemaCompiler for SdlCompiler {
    fn compile(&self, path: &Path) -> Result<Document, SchemaError> {
        dcm_sdl::compile_file(path)
    }
}

/// Loads class definitions from mapping files.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader<C = SdlCompiler> {
    compiler: C,
}

impl<C: SchemaCompiler> SchemaLoader<C> {
    pub fn new(compiler: C) -> Self {
        Self { compiler }
    }

    /// Compile `path` and collect its class definitions.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<ClassDefinitions, MappingError> {
        let document = self.compiler.compile(path)?;
        let classes = class_definitions(&document);
        debug!(classes = classes.len(), "loaded mapping file");
        Ok(classes)
    }
}

/// Collect the `@Class`-bound object types of a document.
pub fn class_definitions(document: &Document) -> ClassDefinitions {
    let mut classes = ClassDefinitions::new();
    for definition in document.object_types() {
        let Some(binding) = definition.directive(d::CLASS) else {
            continue;
        };
        let name = match binding.argument("name") {
            Some(Value::String(name)) => name.clone(),
            other => {
                let found = other.map(dcm_sdl::Value::kind).unwrap_or("nothing");
                warn!(
                    sdl_type = %definition.name,
                    found,
                    "@Class needs a string 'name' argument, skipping type"
                );
                continue;
            }
        };
        if classes.insert(name.clone(), definition.clone()).is_some() {
            warn!(class = %name, sdl_type = %definition.name, "duplicate class, last definition wins");
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcm_sdl::ParseError;
    use std::path::PathBuf;

    /// Compiles from an in-memory source, ignoring the path.
    struct InlineCompiler(&'static str);

    impl SchemaCompiler for InlineCompiler {
        fn compile(&self, path: &Path) -> Result<Document, SchemaError> {
            dcm_sdl::parse(self.0).map_err(|error| SchemaError::Parse {
                path: path.to_path_buf(),
                rendered: error.to_string(),
                error,
            })
        }
    }

    struct FailingCompiler;

    impl SchemaCompiler for FailingCompiler {
        fn compile(&self, path: &Path) -> Result<Document, SchemaError> {
            Err(SchemaError::Parse {
                path: path.to_path_buf(),
                rendered: "boom".to_string(),
                error: ParseError::new("boom", (0..1).into()),
            })
        }
    }

    fn load(source: &'static str) -> ClassDefinitions {
        SchemaLoader::new(InlineCompiler(source))
            .load(Path::new("inline.dcm.graphqls"))
            .unwrap()
    }

    #[test]
    fn test_only_class_bound_types() {
        let classes = load(
            r#"
            type User @Class(name: "App\\User") @Entity { id: ID }
            type Helper { value: String }
            extend type Post @Class(name: "App\\Post") @Entity { id: ID }
            "#,
        );
        let names: Vec<_> = classes.keys().cloned().collect();
        assert_eq!(names, vec!["App\\Post", "App\\User"]);
        assert_eq!(classes["App\\User"].name, "User");
    }

    #[test]
    fn test_invalid_class_binding_is_skipped() {
        let classes = load(
            r#"
            type A @Class @Entity { id: ID }
            type B @Class(name: 42) @Entity { id: ID }
            type C @Class(name: "C") @Entity { id: ID }
            "#,
        );
        assert_eq!(classes.len(), 1);
        assert!(classes.contains_key("C"));
    }

    #[test]
    fn test_duplicate_class_last_wins() {
        let classes = load(
            r#"
            type First @Class(name: "User") @Entity { id: ID }
            type Second @Class(name: "User") @MappedSuperClass { id: ID }
            "#,
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(classes["User"].name, "Second");
    }

    #[test]
    fn test_empty_document() {
        assert!(load("").is_empty());
    }

    #[test]
    fn test_compiler_error_is_propagated() {
        let err = SchemaLoader::new(FailingCompiler)
            .load(Path::new("broken.dcm.graphqls"))
            .unwrap_err();
        match err {
            MappingError::Schema(schema) => {
                assert_eq!(schema.path(), PathBuf::from("broken.dcm.graphqls").as_path())
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
