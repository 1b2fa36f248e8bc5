//! SDL mapping driver
//!
//! Reads object-relational mapping metadata from GraphQL SDL files. Each
//! class is declared as an object type carrying `@Class(name: "...")`, and
//! its persistence mapping is expressed with directives on the type and its
//! fields.
//!
//! # Example
//!
//! ```rust
//! use dcm_mapping::{ClassMetadata, MetadataEvaluator};
//!
//! let doc = dcm_sdl::parse(r#"
//!     type User @Class(name: "App\\User") @Entity @Table(name: "users") {
//!         id: Int! @Column(type: "integer") @Id @GeneratedValue
//!         posts: [Post!]! @OneToMany(targetEntity: "App\\Post", mappedBy: "author")
//!     }
//! "#).unwrap();
//!
//! let classes = dcm_mapping::class_definitions(&doc);
//! let mut metadata = ClassMetadata::new("App\\User");
//! MetadataEvaluator::evaluate("App\\User", &classes["App\\User"], &mut metadata).unwrap();
//!
//! assert_eq!(metadata.table_name(), Some("users"));
//! assert!(metadata.is_identifier("id"));
//! ```
//!
//! [`MappingDriver`] adds file discovery and per-file caching on top of the
//! evaluator.

pub mod config;
pub mod directives;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod locator;
pub mod metadata;

mod args;

pub use config::{DriverConfig, DEFAULT_FILE_EXTENSION};
pub use driver::MappingDriver;
pub use error::MappingError;
pub use evaluator::MetadataEvaluator;
pub use loader::{class_definitions, ClassDefinitions, SchemaCompiler, SchemaLoader, SdlCompiler};
pub use locator::FileLocator;
pub use metadata::{
    AssociationKind, AssociationMapping, CacheDescriptor, CacheUsage, ChangeTrackingPolicy,
    ClassMetadata, ColumnPrefix, EmbeddedMapping, EntityKind, FetchMode, FieldMapping,
    GeneratorType, InheritanceType, JoinColumn, TableDescriptor,
};
