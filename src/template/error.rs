// ABOUTME: Error types for template expansion operations
// ABOUTME: Defines specific error types for marker scanning and expression evaluation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unterminated '{marker}' marker at offset {offset}")]
    UnterminatedMarker { marker: &'static str, offset: usize },

    #[error("Malformed positional marker at offset {offset}: expected %ARG<n>%")]
    MalformedArgument { offset: usize },

    #[error("Positional argument %ARG{index}% out of range ({count} supplied)")]
    ArgumentOutOfRange { index: usize, count: usize },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Expression syntax error in '{expr}': {message}")]
    SyntaxError { expr: String, message: String },

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
