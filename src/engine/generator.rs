// ABOUTME: End-to-end generation pipeline: read script, rewrite, execute, write output
// ABOUTME: Output is handed to the writer only after the whole script has executed

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use super::error::Result;
use super::executor::Interpreter;
use super::registry::Registry;
use super::rewriter::{self, RewrittenScript};
use crate::output::OutputWriter;
use crate::parser::Script;
use crate::template::TemplateContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotRun,
    Rewriting,
    Executing,
    Written,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotRun => "not run",
            Phase::Rewriting => "rewriting",
            Phase::Executing => "executing",
            Phase::Written => "written",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub destination: String,
    pub bytes: usize,
    pub lines: usize,
    pub template_calls: usize,
}

pub struct Generator {
    registry: Registry,
    variables: HashMap<String, String>,
    phase: Phase,
}

impl Generator {
    pub fn new(registry: Registry, variables: HashMap<String, String>) -> Self {
        Self {
            registry,
            variables,
            phase: Phase::NotRun,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Generation phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    pub fn rewrite(&mut self, script: &Script) -> RewrittenScript {
        self.enter(Phase::Rewriting);
        let rewritten = rewriter::rewrite(script, &self.registry);
        let unresolved = rewritten.unresolved();
        if !unresolved.is_empty() {
            debug!("Unresolved calls left for execution: {:?}", unresolved);
        }
        rewritten
    }

    /// Rewrite and execute, returning the accumulated output.
    pub fn render(&mut self, script: &Script) -> Result<String> {
        let rewritten = self.rewrite(script);
        self.execute(&rewritten)
    }

    fn execute(&mut self, rewritten: &RewrittenScript) -> Result<String> {
        self.enter(Phase::Executing);
        let mut context = TemplateContext::with_variables(&self.variables);
        context.add_build_info();
        let mut interpreter = Interpreter::new(context);
        interpreter.execute(rewritten)?;

        Ok(interpreter.into_output())
    }

    pub fn generate(
        &mut self,
        script_path: &Path,
        writer: &dyn OutputWriter,
    ) -> Result<GenerationSummary> {
        info!("Generating from script: {}", script_path.display());
        let script = Script::from_file(script_path)?;
        let rewritten = self.rewrite(&script);
        let template_calls = rewritten.template_calls().count();

        let output = self.execute(&rewritten)?;
        writer.write(&output)?;
        self.enter(Phase::Written);

        let summary = GenerationSummary {
            destination: writer.destination(),
            bytes: output.len(),
            lines: script.lines.len(),
            template_calls,
        };
        info!(
            "Generated {} bytes from {} script lines ({} template calls) to {}",
            summary.bytes, summary.lines, summary.template_calls, summary.destination
        );
        Ok(summary)
    }
}
