//! Association mappings between classes.

use super::table::CacheDescriptor;
use super::types::{FetchMode, OrderDirection};
use serde::Serialize;

/// Cardinality of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl AssociationKind {
    /// Whether the association holds a single object.
    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }
}

/// A join column of an owning association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinColumn {
    pub name: String,
    /// Referenced column on the target; the target identifier when `None`.
    pub referenced_column_name: Option<String>,
    pub unique: bool,
    pub nullable: bool,
    pub on_delete: Option<String>,
    pub column_definition: Option<String>,
}

impl JoinColumn {
    /// A nullable, non-unique join column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column_name: None,
            unique: false,
            nullable: true,
            on_delete: None,
            column_definition: None,
        }
    }

    /// Set the referenced column.
    pub fn references(mut self, column: impl Into<String>) -> Self {
        self.referenced_column_name = Some(column.into());
        self
    }
}

/// Link table of a many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct JoinTable {
    pub name: Option<String>,
    pub schema: Option<String>,
    pub join_columns: Vec<JoinColumn>,
    pub inverse_join_columns: Vec<JoinColumn>,
}

/// One ordering term of a collection association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }
}

/// A mapped association.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationMapping {
    pub field_name: String,
    pub kind: AssociationKind,
    pub target_entity: String,
    /// Set on the inverse side; names the owning field on the target.
    pub mapped_by: Option<String>,
    /// Set on the owning side of a bidirectional association.
    pub inversed_by: Option<String>,
    /// Cascaded operations, lowercase.
    pub cascade: Vec<String>,
    pub fetch: FetchMode,
    pub orphan_removal: bool,
    /// Part of the identifier.
    pub id: bool,
    pub join_columns: Vec<JoinColumn>,
    pub join_table: Option<JoinTable>,
    pub index_by: Option<String>,
    pub order_by: Vec<OrderBy>,
    pub cache: Option<CacheDescriptor>,
}

impl AssociationMapping {
    /// Create an association with lazy fetching and no cascades.
    pub fn new(
        field_name: impl Into<String>,
        kind: AssociationKind,
        target_entity: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            kind,
            target_entity: target_entity.into(),
            mapped_by: None,
            inversed_by: None,
            cascade: Vec::new(),
            fetch: FetchMode::default(),
            orphan_removal: false,
            id: false,
            join_columns: Vec::new(),
            join_table: None,
            index_by: None,
            order_by: Vec::new(),
            cache: None,
        }
    }

    /// The owning side carries the foreign key or the join table.
    pub fn is_owning_side(&self) -> bool {
        self.mapped_by.is_none()
    }

    /// Check if an operation is cascaded.
    pub fn cascades(&self, operation: &str) -> bool {
        self.cascade
            .iter()
            .any(|op| op == "all" || op.eq_ignore_ascii_case(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_association_defaults() {
        let assoc = AssociationMapping::new("author", AssociationKind::ManyToOne, "User");
        assert_eq!(assoc.fetch, FetchMode::Lazy);
        assert!(assoc.is_owning_side());
        assert!(assoc.kind.is_to_one());
        assert!(assoc.join_columns.is_empty());
    }

    #[test]
    fn test_inverse_side() {
        let mut assoc = AssociationMapping::new("posts", AssociationKind::OneToMany, "Post");
        assoc.mapped_by = Some("author".to_string());
        assert!(!assoc.is_owning_side());
        assert!(!assoc.kind.is_to_one());
    }

    #[test]
    fn test_cascades() {
        let mut assoc = AssociationMapping::new("tags", AssociationKind::ManyToMany, "Tag");
        assoc.cascade = vec!["persist".to_string()];
        assert!(assoc.cascades("PERSIST"));
        assert!(!assoc.cascades("remove"));

        assoc.cascade = vec!["all".to_string()];
        assert!(assoc.cascades("remove"));
    }

    #[test]
    fn test_join_column_builder() {
        let column = JoinColumn::new("author_id").references("id");
        assert_eq!(column.referenced_column_name.as_deref(), Some("id"));
        assert!(column.nullable);
    }
}
