// ABOUTME: Parser module for declarative build scripts
// ABOUTME: Exports script parsing and line/statement data structures

pub mod error;
pub mod script;

pub use error::{ParserError, Result};
pub use script::{Call, Line, Script, Statement};
