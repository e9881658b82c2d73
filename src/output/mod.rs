// ABOUTME: Output module for writing the generated build descriptor
// ABOUTME: Exports the writer trait and its file and stdout implementations

pub mod error;
pub mod writer;

pub use error::{OutputError, Result};
pub use writer::{FileWriter, OutputWriter, StdoutWriter};
