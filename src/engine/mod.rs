// ABOUTME: Directive interpreter module: name resolution, rewriting and execution
// ABOUTME: Exports the registry, rewriter, interpreter and generation pipeline

pub mod builtins;
pub mod error;
pub mod executor;
pub mod generator;
pub mod registry;
pub mod rewriter;

pub use error::{ExecutionError, Result};
pub use executor::Interpreter;
pub use generator::{GenerationSummary, Generator, Phase};
pub use registry::{Builtin, Registry, Resolution};
pub use rewriter::{rewrite, Directive, RewrittenLine, RewrittenScript};
