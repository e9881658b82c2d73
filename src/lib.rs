// ABOUTME: Main library module for pant, the template-driven build descriptor generator
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod engine;
pub mod output;
pub mod parser;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use engine::{Generator, Interpreter, Phase, Registry, Resolution};
pub use output::{FileWriter, OutputWriter, StdoutWriter};
pub use parser::Script;
pub use template::{TemplateContext, TemplateEngine, Value};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
