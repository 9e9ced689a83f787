//! Error types for editing and format operations

use crate::model::{FormatTag, Position};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during parsing
    ParseError(String),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support the requested direction
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Errors raised by buffer and tag mutations.
///
/// A failed mutation leaves the document untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A position references a line or column outside the buffer.
    #[error("position {position} is outside the buffer ({lines} lines)")]
    InvalidRange { position: Position, lines: usize },

    /// A character-level tag was passed where a line tag is required.
    #[error("{0:?} is not a line-level tag")]
    NotLineLevel(FormatTag),
}
