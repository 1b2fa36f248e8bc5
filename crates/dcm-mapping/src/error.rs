//! Mapping error types.

use dcm_sdl::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading mapping files or evaluating class metadata.
///
/// Every variant is fatal for the class being evaluated.
#[derive(Debug, Error)]
pub enum MappingError {
    /// None of `@Entity`, `@MappedSuperClass` or `@Embeddable` is present.
    #[error("class '{class}' is not a valid entity or mapped super class")]
    InvalidEntityKind { class: String },

    /// `@Cache` usage outside READ_ONLY, NONSTRICT_READ_WRITE, READ_WRITE.
    #[error("invalid cache usage '{usage}' on class '{class}'")]
    InvalidCacheUsage { class: String, usage: String },

    /// `@Join` without `column` or `columns`. An explicit `null` counts as
    /// absent.
    #[error("@Join on '{class}::{field}' needs a 'column' or 'columns' argument")]
    MissingJoinColumns { class: String, field: String },

    /// A generator kind that the mapping layer does not support.
    #[error("{generator} generator on '{class}::{field}' is not implemented")]
    GeneratorNotImplemented {
        class: String,
        field: String,
        generator: &'static str,
    },

    /// Non-trivial inheritance without a `@Discriminator`.
    #[error("class '{class}' uses {inheritance} inheritance but declares no @Discriminator")]
    MissingDiscriminator { class: String, inheritance: String },

    /// A value that does not resolve against a closed enumeration.
    #[error("invalid {concept} '{value}' on class '{class}'")]
    InvalidEnumValue {
        class: String,
        concept: &'static str,
        value: String,
    },

    /// A required directive argument is absent.
    #[error("@{directive} on '{class}' requires the '{argument}' argument")]
    MissingArgument {
        class: String,
        directive: String,
        argument: String,
    },

    /// A directive argument has the wrong value type.
    #[error("argument '{argument}' of @{directive} on '{class}' must be {expected}, found {found}")]
    InvalidArgument {
        class: String,
        directive: String,
        argument: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An association declares both the owning and the inverse side.
    #[error("association '{class}::{field}' cannot declare both mappedBy and inversedBy")]
    ConflictingAssociationSides { class: String, field: String },

    /// No mapping file exists for the class in any configured path.
    #[error("no mapping file found for class '{class}' (extension '{extension}')")]
    MappingFileNotFound { class: String, extension: String },

    /// The located mapping file does not declare the class.
    #[error("class '{class}' is not declared in {}", path.display())]
    ClassNotFound { class: String, path: PathBuf },

    /// The schema compiler rejected a mapping file.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A mapping directory could not be scanned.
    #[error("failed to scan mapping directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MappingError {
    /// Name of the class the error refers to, when it concerns one class.
    pub fn class(&self) -> Option<&str> {
        match self {
            MappingError::InvalidEntityKind { class }
            | MappingError::InvalidCacheUsage { class, .. }
            | MappingError::MissingJoinColumns { class, .. }
            | MappingError::GeneratorNotImplemented { class, .. }
            | MappingError::MissingDiscriminator { class, .. }
            | MappingError::InvalidEnumValue { class, .. }
            | MappingError::MissingArgument { class, .. }
            | MappingError::InvalidArgument { class, .. }
            | MappingError::ConflictingAssociationSides { class, .. }
            | MappingError::MappingFileNotFound { class, .. }
            | MappingError::ClassNotFound { class, .. } => Some(class.as_str()),
            MappingError::Schema(_) | MappingError::Io { .. } => None,
        }
    }
}
