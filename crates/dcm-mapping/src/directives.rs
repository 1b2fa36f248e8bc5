//! Directive names recognised in mapping files.

/// Binds an SDL type to a class: `@Class(name: "App\\Entity\\User")`.
pub const CLASS: &str = "Class";

// Entity kind
pub const ENTITY: &str = "Entity";
pub const MAPPED_SUPERCLASS: &str = "MappedSuperClass";
pub const EMBEDDABLE: &str = "Embeddable";

// Class level
pub const TABLE: &str = "Table";
pub const CACHE: &str = "Cache";
pub const NAMED_NATIVE_QUERIES: &str = "NamedNativeQueries";
pub const SQL_RESULT_SET_MAPPINGS: &str = "SqlResultSetMappings";
pub const NAMED_QUERIES: &str = "NamedQueries";
pub const INHERITANCE: &str = "Inheritance";
pub const DISCRIMINATOR: &str = "Discriminator";
pub const CHANGE_TRACKING: &str = "ChangeTracking";

// Field level
pub const COLUMN: &str = "Column";
pub const ID: &str = "Id";
pub const GENERATED_VALUE: &str = "GeneratedValue";
pub const VERSION: &str = "Version";
pub const SEQUENCE_GENERATOR: &str = "SequenceGenerator";
pub const TABLE_GENERATOR: &str = "TableGenerator";
pub const CUSTOM_ID_GENERATOR: &str = "CustomIdGenerator";
pub const JOIN: &str = "Join";
pub const JOIN_TABLE: &str = "JoinTable";
pub const ORDER_BY: &str = "OrderBy";
pub const ONE_TO_ONE: &str = "OneToOne";
pub const ONE_TO_MANY: &str = "OneToMany";
pub const MANY_TO_ONE: &str = "ManyToOne";
pub const MANY_TO_MANY: &str = "ManyToMany";
pub const EMBEDDED: &str = "Embedded";
