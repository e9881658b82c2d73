// ABOUTME: Error types for output writing operations
// ABOUTME: Covers failures while persisting the generated descriptor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
