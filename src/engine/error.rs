// ABOUTME: Error types for script rewriting and execution
// ABOUTME: Every execution error carries the script line that raised it

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("line {line}: no such function '{name}'")]
    UnknownFunction { line: usize, name: String },

    #[error("line {line}: invalid statement '{text}'")]
    InvalidStatement { line: usize, text: String },

    #[error("line {line}: invalid arguments to '{function}': {message}")]
    InvalidArguments {
        line: usize,
        function: String,
        message: String,
    },

    #[error("line {line}: {source}")]
    Template {
        line: usize,
        #[source]
        source: crate::template::TemplateError,
    },

    #[error("Parser error: {0}")]
    ParserError(#[from] crate::parser::ParserError),

    #[error("Output error: {0}")]
    OutputError(#[from] crate::output::OutputError),
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
