//! Mapping-file SDL
//!
//! This crate provides the lexer, parser and AST for mapping files: GraphQL
//! SDL documents whose types and fields carry annotation-style directives
//! describing an object-relational mapping.
//!
//! # Syntax
//!
//! ```text
//! type User
//!     @Class(name: "App\\Entity\\User")
//!     @Entity(repositoryClass: "App\\Repository\\UserRepository")
//!     @Table(name: "users")
//! {
//!     id: Int! @Column(type: "integer") @Id @GeneratedValue(strategy: "AUTO")
//!     posts: [Post!]! @OneToMany(targetEntity: "App\\Entity\\Post", mappedBy: "author")
//! }
//! ```
//!
//! Directive arguments are constant values: strings, numbers, booleans,
//! `null`, enum literals, lists and objects.
//!
//! # Usage
//!
//! ```rust
//! use dcm_sdl::parse;
//!
//! let doc = parse(r#"type User @Entity { id: Int @Id }"#).unwrap();
//! let user = doc.object_type("User").unwrap();
//! assert!(user.directive("Entity").is_some());
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

use std::path::Path;

// Re-export main types
pub use ast::{
    Argument, Definition, Directive, Directives, Document, FieldDefinition,
    InputValueDefinition, ObjectTypeDefinition, TypeRef, Value,
};
pub use error::{ParseError, SchemaError};
pub use span::Span;

/// Parse a source string into a document.
///
/// # Example
///
/// ```rust
/// use dcm_sdl::parse;
///
/// let doc = parse("type Tag @Embeddable { label: String }").unwrap();
/// assert_eq!(doc.object_types().count(), 1);
/// ```
pub fn parse(source: &str) -> Result<Document, ParseError> {
    parser::parse(source)
}

/// Read and parse a mapping file.
///
/// Parse errors are rendered against the file contents so the caller can
/// show the offending line.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Document, SchemaError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&source).map_err(|error| SchemaError::Parse {
        path: path.to_path_buf(),
        rendered: error.format_with_source(&source),
        error,
    })
}

/// Tokenize a source string (for debugging/testing).
///
/// # Example
///
/// ```rust
/// use dcm_sdl::tokenize;
///
/// let tokens = tokenize("type User @Entity").unwrap();
/// assert_eq!(tokens.len(), 4);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<lexer::SpannedToken>, ParseError> {
    lexer::tokenize(source)
}
