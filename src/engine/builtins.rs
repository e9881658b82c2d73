// ABOUTME: Builder function implementations (project, module, lib, target, pack, set, emit)
// ABOUTME: Each builder records its declaration in the shared context for later templates

use tracing::debug;

use super::error::{ExecutionError, Result};
use super::registry::Builtin;
use crate::template::{TemplateContext, TemplateEngine, TemplateError, Value};

/// State a builder may touch while it runs.
pub struct BuilderScope<'a> {
    pub line: usize,
    pub context: &'a mut TemplateContext,
    pub engine: &'a TemplateEngine,
    pub output: &'a mut String,
}

impl BuilderScope<'_> {
    fn invalid(&self, builtin: Builtin, message: impl Into<String>) -> ExecutionError {
        ExecutionError::InvalidArguments {
            line: self.line,
            function: builtin.name().to_string(),
            message: message.into(),
        }
    }

    fn template_error(&self, source: TemplateError) -> ExecutionError {
        ExecutionError::Template {
            line: self.line,
            source,
        }
    }

    fn set(&mut self, name: &str, value: Value) {
        self.context.set(name.to_string(), value);
    }
}

pub fn apply(builtin: Builtin, args: Vec<Value>, scope: &mut BuilderScope<'_>) -> Result<()> {
    debug!("line {}: {}({} args)", scope.line, builtin, args.len());

    let (first, rest) = match args.split_first() {
        Some((first, rest)) => (first.to_string(), rest.to_vec()),
        None => return Err(scope.invalid(builtin, "expected at least 1 argument, got 0")),
    };

    match builtin {
        Builtin::Project => {
            if rest.len() > 1 {
                return Err(scope.invalid(builtin, "expected (name[, default_target])"));
            }
            scope.set("project", Value::Str(first));
            if let Some(default_target) = rest.into_iter().next() {
                scope.set("defaultTarget", default_target);
            }
        }
        Builtin::Module => {
            if rest.len() > 1 {
                return Err(scope.invalid(builtin, "expected (name[, dir])"));
            }
            let dir = rest
                .into_iter()
                .next()
                .unwrap_or_else(|| Value::Str(first.clone()));
            scope.set("currentModule", Value::Str(first.clone()));
            scope.set("moduleDir", dir);
            scope
                .context
                .push("modules", Value::Str(first))
                .map_err(|e| scope.template_error(e))?;
        }
        Builtin::Lib => {
            if rest.is_empty() {
                return Err(scope.invalid(builtin, "expected (name, path...)"));
            }
            scope.set("currentLib", Value::Str(first.clone()));
            scope
                .context
                .insert_entry("libs", first, Value::List(rest))
                .map_err(|e| scope.template_error(e))?;
        }
        Builtin::Target => {
            scope.set("currentTarget", Value::Str(first.clone()));
            scope.set("targetDepends", Value::List(rest));
            scope
                .context
                .push("targets", Value::Str(first))
                .map_err(|e| scope.template_error(e))?;
        }
        Builtin::Pack => {
            scope.set("currentPack", Value::Str(first.clone()));
            scope.set("packIncludes", Value::List(rest.clone()));
            scope
                .context
                .insert_entry("packs", first, Value::List(rest))
                .map_err(|e| scope.template_error(e))?;
        }
        Builtin::Set => {
            let value = match rest.as_slice() {
                [value] => value.clone(),
                _ => return Err(scope.invalid(builtin, "expected (name, value)")),
            };
            scope.set(&first, value);
        }
        Builtin::Emit => {
            let positional: Vec<String> = rest.iter().map(|v| v.to_string()).collect();
            let text = scope
                .engine
                .expand(&first, &positional, &*scope.context)
                .map_err(|e| scope.template_error(e))?;
            scope.output.push_str(&text);
        }
    }

    Ok(())
}
