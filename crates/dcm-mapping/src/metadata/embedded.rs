//! Embedded value mappings.

use serde::Serialize;

/// Column prefix applied to the embeddable's columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPrefix {
    /// `<fieldName>_`, decided by the persistence engine.
    #[default]
    Default,
    /// `columnPrefix: false`
    Disabled,
    Custom(String),
}

/// An embeddable class stored inline in the owning table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedMapping {
    pub field_name: String,
    pub class: String,
    pub column_prefix: ColumnPrefix,
}

impl EmbeddedMapping {
    pub fn new(field_name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            class: class.into(),
            column_prefix: ColumnPrefix::Default,
        }
    }

    /// Resolve the prefix for generated column names.
    pub fn resolved_prefix(&self) -> String {
        match &self.column_prefix {
            ColumnPrefix::Default => format!("{}_", self.field_name),
            ColumnPrefix::Disabled => String::new(),
            ColumnPrefix::Custom(prefix) => prefix.clone(),
        }
    }
}
