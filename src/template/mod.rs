// ABOUTME: Template expander module for pant
// ABOUTME: Provides marker expansion, the restricted expression language and the variable environment

pub mod context;
pub mod engine;
pub mod error;
pub mod expr;
pub mod helpers;

pub use context::{TemplateContext, Value};
pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
