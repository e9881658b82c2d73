// ABOUTME: Error types for declarative script parsing
// ABOUTME: Only reading a script can fail; malformed lines are kept and rejected at execution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to read script file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ParserError>;
