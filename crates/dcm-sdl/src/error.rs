//! Error types for lexing, parsing and compiling mapping files.

use crate::span::{offset_to_line_col, Span};
use std::path::PathBuf;
use thiserror::Error;

/// A lexing or parsing failure, located in the source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// Suggested fix, shown under the rendered error.
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Render the error with its source line, underlining the span.
    ///
    /// ```text
    /// error: expected a value, found ')'
    ///   --> line 2:25
    ///    |
    ///   2|   id: Int @Column(type: )
    ///    |                         ^
    ///    = hint: directive arguments need a constant value
    /// ```
    pub fn format_with_source(&self, source: &str) -> String {
        let (line, col) = offset_to_line_col(source, self.span.start);
        let mut out = vec![
            format!("error: {}", self.message),
            format!("  --> line {}:{}", line, col),
        ];

        if let Some(text) = source.lines().nth(line - 1) {
            let width = self
                .span
                .len()
                .clamp(1, text.chars().count().saturating_sub(col - 1).max(1));
            out.push("   |".to_string());
            out.push(format!("{:>3}| {}", line, text));
            out.push(format!(
                "   | {}^{}",
                " ".repeat(col - 1),
                "~".repeat(width - 1)
            ));
        }

        if let Some(hint) = &self.hint {
            out.push(format!("   = hint: {}", hint));
        }

        let mut rendered = out.join("\n");
        rendered.push('\n');
        rendered
    }
}

/// Error compiling a mapping file into a document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The mapping file could not be read.
    #[error("failed to read mapping file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mapping file is not valid SDL.
    #[error("{}: {}", path.display(), rendered.trim_end())]
    Parse {
        path: PathBuf,
        /// The error rendered against the file contents.
        rendered: String,
        #[source]
        error: ParseError,
    },
}

impl SchemaError {
    /// The file the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            SchemaError::Io { path, .. } | SchemaError::Parse { path, .. } => path,
        }
    }
}
