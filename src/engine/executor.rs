// ABOUTME: Executes a rewritten script top to bottom against one variable environment
// ABOUTME: Accumulates builder and template output into a single buffer

use tracing::debug;

use super::builtins::{self, BuilderScope};
use super::error::{ExecutionError, Result};
use super::rewriter::{Directive, RewrittenLine, RewrittenScript};
use crate::template::{expr, TemplateContext, TemplateEngine, Value};

pub struct Interpreter {
    engine: TemplateEngine,
    context: TemplateContext,
    output: String,
}

impl Interpreter {
    pub fn new(context: TemplateContext) -> Self {
        Self {
            engine: TemplateEngine::new(),
            context,
            output: String::new(),
        }
    }

    pub fn context(&self) -> &TemplateContext {
        &self.context
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Run every line in order, stopping at the first error.
    pub fn execute(&mut self, script: &RewrittenScript) -> Result<()> {
        for line in &script.lines {
            self.execute_line(line)?;
        }
        debug!(
            "Executed {} lines, {} bytes of output, {} variables",
            script.lines.len(),
            self.output.len(),
            self.context.variable_count()
        );
        Ok(())
    }

    fn execute_line(&mut self, line: &RewrittenLine) -> Result<()> {
        let number = line.number;
        match &line.directive {
            Directive::Blank | Directive::Comment { .. } => Ok(()),
            Directive::Raw { text } => Err(ExecutionError::InvalidStatement {
                line: number,
                text: text.clone(),
            }),
            Directive::Call { name, .. } => Err(ExecutionError::UnknownFunction {
                line: number,
                name: name.clone(),
            }),
            Directive::Assign { name, expr: expression } => {
                let value = expr::eval_str(expression, &self.context).map_err(|source| {
                    ExecutionError::Template {
                        line: number,
                        source,
                    }
                })?;
                self.context.set(name.clone(), value);
                Ok(())
            }
            Directive::Builtin { builtin, args } => {
                let values = self.eval_args(number, args)?;
                let mut scope = BuilderScope {
                    line: number,
                    context: &mut self.context,
                    engine: &self.engine,
                    output: &mut self.output,
                };
                builtins::apply(*builtin, values, &mut scope)
            }
            Directive::TemplateCall { path, args, .. } => {
                let positional: Vec<String> = self
                    .eval_args(number, args)?
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                let text = self
                    .engine
                    .expand_file(path, &positional, &self.context)
                    .map_err(|source| ExecutionError::Template {
                        line: number,
                        source,
                    })?;
                self.output.push_str(&text);
                Ok(())
            }
        }
    }

    fn eval_args(&self, line: usize, args: &[String]) -> Result<Vec<Value>> {
        args.iter()
            .map(|arg| {
                expr::eval_str(arg, &self.context)
                    .map_err(|source| ExecutionError::Template { line, source })
            })
            .collect()
    }
}
