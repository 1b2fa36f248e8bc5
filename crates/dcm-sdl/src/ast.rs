//! Abstract syntax tree for mapping-file SDL.

use crate::span::Span;
use serde_json::Value as JsonValue;

/// A parsed mapping file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Top-level definitions in source order.
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Iterate over object type definitions, including `extend type` blocks.
    pub fn object_types(&self) -> impl Iterator<Item = &ObjectTypeDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Object(def) | Definition::ObjectExtension(def) => Some(def),
            _ => None,
        })
    }

    /// Find an object type by its SDL name.
    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeDefinition> {
        self.object_types().find(|def| def.name == name)
    }
}

/// A top-level definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// `type Name ... { ... }`
    Object(ObjectTypeDefinition),
    /// `extend type Name ... { ... }`
    ObjectExtension(ObjectTypeDefinition),
    /// `interface Name ... { ... }`
    Interface(ObjectTypeDefinition),
    /// `input Name ... { ... }`
    Input(InputObjectTypeDefinition),
    /// `enum Name { ... }`
    Enum(EnumTypeDefinition),
    /// `scalar Name`
    Scalar(ScalarTypeDefinition),
    /// `union Name = A | B`
    Union(UnionTypeDefinition),
    /// `directive @name(...) on LOCATION | ...`
    Directive(DirectiveDefinition),
    /// `schema { query: Query }`
    Schema(SchemaDefinition),
}

impl Definition {
    /// Name of the defined type or directive; `None` for schema definitions.
    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::Object(d) | Definition::ObjectExtension(d) | Definition::Interface(d) => {
                Some(&d.name)
            }
            Definition::Input(d) => Some(&d.name),
            Definition::Enum(d) => Some(&d.name),
            Definition::Scalar(d) => Some(&d.name),
            Definition::Union(d) => Some(&d.name),
            Definition::Directive(d) => Some(&d.name),
            Definition::Schema(_) => None,
        }
    }
}

/// An ordered list of directive invocations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Directives(pub Vec<Directive>);

impl Directives {
    /// First directive with the given name. Undeclared names yield `None`.
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.0.iter().find(|d| d.name == name)
    }

    /// Check if a directive is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A directive invocation such as `@Table(name: "users")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    /// Arguments in source order.
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Directive {
    /// Look up an argument value. An absent argument is `None`; an explicit
    /// `null` is `Some(Value::Null)`.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Check if an argument was passed.
    pub fn has_argument(&self, name: &str) -> bool {
        self.argument(name).is_some()
    }
}

/// A named argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
    pub span: Span,
}

/// A constant input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Bare enum literal, e.g. `EAGER`.
    Enum(String),
    List(Vec<Value>),
    /// Object fields in source order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// String content of string and enum literals.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a field of an object value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    /// Convert to JSON. Enum literals become strings; non-finite floats
    /// become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Int(v) => JsonValue::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) | Value::Enum(s) => JsonValue::String(s.clone()),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// A type reference: `Name`, `[T]` or `T!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// The innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// An object, interface or extension type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    /// Names listed after `implements`.
    pub interfaces: Vec<String>,
    pub directives: Directives,
    pub fields: Vec<FieldDefinition>,
    pub span: Span,
}

impl ObjectTypeDefinition {
    /// Look up a directive on the type.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: TypeRef,
    pub directives: Directives,
    pub span: Span,
}

impl FieldDefinition {
    /// Look up a directive on the field.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }
}

/// An argument definition or input field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub directives: Directives,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Directives,
    pub fields: Vec<InputValueDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Directives,
    pub values: Vec<EnumValueDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Directives,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Directives,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: Directives,
    pub members: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub description: Option<String>,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<String>,
    pub span: Span,
}

/// `schema { query: Query, mutation: Mutation }`
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub directives: Directives,
    /// Operation type to root type name.
    pub operations: Vec<(String, String)>,
    pub span: Span,
}
