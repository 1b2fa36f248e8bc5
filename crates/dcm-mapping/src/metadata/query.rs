//! Named queries and native SQL result mappings.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// A named query in the persistence engine's query language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedQuery {
    pub name: String,
    pub query: String,
}

/// A named native SQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedNativeQuery {
    pub name: String,
    pub query: String,
    pub result_class: Option<String>,
    pub result_set_mapping: Option<String>,
}

/// Maps the columns of a native query result to entities and scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlResultSetMapping {
    pub name: String,
    /// Entity results, verbatim.
    pub entities: Vec<JsonValue>,
    /// Scalar column results, verbatim.
    pub columns: Vec<JsonValue>,
}
