//! Table, cache and discriminator descriptors.

use super::types::CacheUsage;
use super::Attributes;
use serde::Serialize;

/// Primary table of an entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableDescriptor {
    /// Table name; `None` lets the persistence engine derive it.
    pub name: Option<String>,
    pub schema: Option<String>,
    pub indexes: Vec<IndexDescriptor>,
    pub unique_constraints: Vec<IndexDescriptor>,
    /// Vendor options passed through verbatim.
    pub options: Attributes,
}

impl TableDescriptor {
    /// Create a descriptor for a named table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add an index.
    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(index);
        self
    }

    /// Add a unique constraint.
    pub fn with_unique_constraint(mut self, constraint: IndexDescriptor) -> Self {
        self.unique_constraints.push(constraint);
        self
    }

    /// Get an index by name.
    pub fn get_index(&self, name: &str) -> Option<&IndexDescriptor> {
        self.indexes
            .iter()
            .find(|i| i.name.as_deref() == Some(name))
    }
}

/// An index or unique constraint.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IndexDescriptor {
    pub name: Option<String>,
    pub columns: Vec<String>,
    /// Field names, resolved to columns by the persistence engine.
    pub fields: Vec<String>,
    pub flags: Vec<String>,
    pub options: Attributes,
}

impl IndexDescriptor {
    /// Create an index over columns.
    pub fn on_columns<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Second-level cache settings for a class or an association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheDescriptor {
    pub usage: CacheUsage,
    pub region: String,
}

impl CacheDescriptor {
    pub fn new(usage: CacheUsage, region: impl Into<String>) -> Self {
        Self {
            usage,
            region: region.into(),
        }
    }
}

/// Default cache region for a class: lowercase, namespace separators
/// replaced by underscores.
pub fn default_cache_region(class_name: &str) -> String {
    class_name.to_lowercase().replace('\\', "_")
}

/// Column holding the discriminator value under inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscriminatorColumn {
    pub name: String,
    pub type_name: String,
    pub length: Option<u32>,
}

/// Default discriminator column type.
pub const DEFAULT_DISCRIMINATOR_TYPE: &str = "string";

/// Default discriminator column length.
pub const DEFAULT_DISCRIMINATOR_LENGTH: u32 = 255;

impl DiscriminatorColumn {
    /// A string discriminator column with the default length.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: DEFAULT_DISCRIMINATOR_TYPE.to_string(),
            length: Some(DEFAULT_DISCRIMINATOR_LENGTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder() {
        let table = TableDescriptor::new("users")
            .with_schema("app")
            .with_index(IndexDescriptor::on_columns("idx_email", ["email"]))
            .with_unique_constraint(IndexDescriptor::on_columns(
                "uniq_name",
                ["first_name", "last_name"],
            ));

        assert_eq!(table.name.as_deref(), Some("users"));
        assert_eq!(table.schema.as_deref(), Some("app"));
        assert_eq!(table.get_index("idx_email").unwrap().columns, vec!["email"]);
        assert!(table.get_index("uniq_name").is_none());
        assert_eq!(table.unique_constraints[0].columns.len(), 2);
    }

    #[test]
    fn test_default_cache_region() {
        assert_eq!(default_cache_region("App\\Entity\\User"), "app_entity_user");
        assert_eq!(default_cache_region("Post"), "post");
    }

    #[test]
    fn test_discriminator_defaults() {
        let column = DiscriminatorColumn::new("dtype");
        assert_eq!(column.type_name, "string");
        assert_eq!(column.length, Some(255));
    }
}
