//! Column-backed field mappings.

use super::Attributes;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Default column type when `@Column` does not declare one.
pub const DEFAULT_COLUMN_TYPE: &str = "string";

/// Mapping of a field to a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    pub field_name: String,
    /// Column name; defaults to the field name.
    pub column_name: String,
    pub type_name: String,
    /// Part of the identifier.
    pub id: bool,
    /// Every `@Column` argument, verbatim.
    pub attributes: Attributes,
}

impl FieldMapping {
    /// Create a mapping with the default column name and type.
    pub fn new(field_name: impl Into<String>) -> Self {
        let field_name = field_name.into();
        Self {
            column_name: field_name.clone(),
            field_name,
            type_name: DEFAULT_COLUMN_TYPE.to_string(),
            id: false,
            attributes: Attributes::new(),
        }
    }

    /// Set the column type.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Set the column name.
    pub fn with_column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = column_name.into();
        self
    }

    /// Mark as part of the identifier.
    pub fn as_id(mut self) -> Self {
        self.id = true;
        self
    }

    /// Raw `@Column` argument.
    pub fn attribute(&self, name: &str) -> Option<&JsonValue> {
        self.attributes.get(name)
    }

    /// `nullable` argument, false when absent.
    pub fn is_nullable(&self) -> bool {
        self.attribute("nullable")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// `unique` argument, false when absent.
    pub fn is_unique(&self) -> bool {
        self.attribute("unique")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// `length` argument.
    pub fn length(&self) -> Option<u64> {
        self.attribute("length").and_then(JsonValue::as_u64)
    }
}
