//! Class metadata produced by the evaluator.
//!
//! The record describes table mapping, associations, caching, inheritance
//! and identifier generation for one class, in the shape a persistence
//! engine consumes.

mod association;
mod class;
mod embedded;
mod field;
mod query;
mod table;
mod types;

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Directive arguments stored verbatim.
pub type Attributes = BTreeMap<String, JsonValue>;

pub use association::{AssociationKind, AssociationMapping, JoinColumn, JoinTable, OrderBy};
pub use class::{ClassMetadata, CustomGeneratorDefinition};
pub use embedded::{ColumnPrefix, EmbeddedMapping};
pub use field::{FieldMapping, DEFAULT_COLUMN_TYPE};
pub use query::{NamedNativeQuery, NamedQuery, SqlResultSetMapping};
pub use table::{
    default_cache_region, CacheDescriptor, DiscriminatorColumn, IndexDescriptor, TableDescriptor,
    DEFAULT_DISCRIMINATOR_LENGTH, DEFAULT_DISCRIMINATOR_TYPE,
};
pub use types::{
    CacheUsage, ChangeTrackingPolicy, EntityKind, FetchMode, GeneratorType, InheritanceType,
    OrderDirection,
};
