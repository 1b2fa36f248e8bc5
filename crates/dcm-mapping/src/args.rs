//! Typed access to directive arguments.
//!
//! An explicit `null` reads the same as an absent argument; a value of the
//! wrong kind is an `InvalidArgument` error naming the class, directive and
//! argument path.

use crate::error::MappingError;
use crate::metadata::Attributes;
use dcm_sdl::{Directive, Value};

/// Arguments of one directive, or of one object nested inside them.
pub(crate) struct Args<'a> {
    class: &'a str,
    directive: &'a str,
    /// Path of the enclosing object, e.g. `queries[1].`.
    prefix: String,
    entries: Vec<(&'a str, &'a Value)>,
}

impl<'a> Args<'a> {
    /// Arguments of a directive invocation.
    pub fn of(class: &'a str, directive: &'a Directive) -> Self {
        Self {
            class,
            directive: &directive.name,
            prefix: String::new(),
            entries: directive
                .arguments
                .iter()
                .map(|a| (a.name.as_str(), &a.value))
                .collect(),
        }
    }

    pub fn class(&self) -> &'a str {
        self.class
    }

    /// Argument names in source order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Raw value; explicit `null` is returned as `None`.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_null())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn opt_str(&self, name: &str) -> Result<Option<String>, MappingError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.invalid(name, "a string", value)),
        }
    }

    pub fn req_str(&self, name: &str) -> Result<String, MappingError> {
        self.opt_str(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn opt_bool(&self, name: &str) -> Result<Option<bool>, MappingError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.invalid(name, "a boolean", value)),
        }
    }

    /// Boolean flag, false when absent.
    pub fn flag(&self, name: &str) -> Result<bool, MappingError> {
        Ok(self.opt_bool(name)?.unwrap_or(false))
    }

    pub fn opt_u32(&self, name: &str) -> Result<Option<u32>, MappingError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .and_then(|v| u32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(name, "a non-negative integer", value)),
        }
    }

    /// A list of strings; a single string is read as a one-element list.
    pub fn str_list(&self, name: &str) -> Result<Vec<String>, MappingError> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) | Some(Value::Enum(s)) => Ok(vec![s.clone()]),
            Some(Value::List(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(name, "a list of strings", item))
                })
                .collect(),
            Some(other) => Err(self.invalid(name, "a list of strings", other)),
        }
    }

    /// A list of objects, each wrapped for nested reads.
    pub fn objects(&self, name: &str) -> Result<Vec<Args<'a>>, MappingError> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| self.nested(&format!("{}[{}]", name, idx), item))
                .collect(),
            Some(other) => Err(self.invalid(name, "a list of objects", other)),
        }
    }

    /// An object value wrapped for nested reads.
    pub fn nested(&self, name: &str, value: &'a Value) -> Result<Args<'a>, MappingError> {
        let fields = value
            .as_object()
            .ok_or_else(|| self.invalid(name, "an object", value))?;
        Ok(Args {
            class: self.class,
            directive: self.directive,
            prefix: format!("{}{}.", self.prefix, name),
            entries: fields.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        })
    }

    /// An object argument stored verbatim; empty when absent.
    pub fn object_attributes(&self, name: &str) -> Result<Attributes, MappingError> {
        Ok(match self.get(name) {
            None => Attributes::new(),
            Some(value) => self.nested(name, value)?.to_attributes(),
        })
    }

    /// Every argument converted to JSON, explicit nulls included.
    pub fn to_attributes(&self) -> Attributes {
        self.entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect()
    }

    pub fn missing(&self, name: &str) -> MappingError {
        MappingError::MissingArgument {
            class: self.class.to_string(),
            directive: self.directive.to_string(),
            argument: format!("{}{}", self.prefix, name),
        }
    }

    pub fn invalid(&self, name: &str, expected: &'static str, found: &Value) -> MappingError {
        MappingError::InvalidArgument {
            class: self.class.to_string(),
            directive: self.directive.to_string(),
            argument: format!("{}{}", self.prefix, name),
            expected,
            found: found.kind(),
        }
    }
}
