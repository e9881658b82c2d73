// ABOUTME: Command implementations for the pant CLI
// ABOUTME: Handles execution of the generate, rewrite, and expand commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::config::Config;
use crate::engine::Generator;
use crate::output::{FileWriter, OutputWriter, StdoutWriter};
use crate::parser::Script;
use crate::template::{TemplateContext, TemplateEngine};

/// Generate the build descriptor from a script
pub fn generate(
    script: PathBuf,
    output: Option<PathBuf>,
    templates: Vec<PathBuf>,
    config: &Config,
) -> Result<()> {
    let output = output.unwrap_or_else(|| config.output.clone());
    let writer: Box<dyn OutputWriter> = if output == Path::new("-") {
        Box::new(StdoutWriter::new())
    } else {
        Box::new(FileWriter::new(output))
    };

    let registry = config.registry(&templates);
    info!("Template search path: {:?}", registry.search_path());

    let mut generator = Generator::new(registry, config.variables.clone());
    let summary = generator
        .generate(&script, writer.as_ref())
        .with_context(|| format!("Generation from '{}' failed", script.display()))?;

    info!(
        "Wrote {} ({} bytes, {} template calls)",
        summary.destination, summary.bytes, summary.template_calls
    );
    Ok(())
}

/// Print the rewritten script, optionally validating referenced templates
pub fn rewrite(
    script: PathBuf,
    templates: Vec<PathBuf>,
    check: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    info!("Rewriting script: {}", script.display());
    let parsed = Script::from_file(&script)?;
    let mut generator = Generator::new(config.registry(&templates), config.variables.clone());
    let rewritten = generator.rewrite(&parsed);

    for name in rewritten.unresolved() {
        warn!("'{}' is neither a builder function nor a template", name);
    }

    if check {
        let engine = TemplateEngine::new();
        for (name, path) in rewritten.template_calls() {
            let template = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template '{}'", path.display()))?;
            engine
                .validate_template(&template)
                .with_context(|| format!("Template '{}' ({}) is invalid", name, path.display()))?;
        }
        info!("All referenced templates are valid");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rewritten)?);
    } else {
        print!("{}", rewritten);
    }

    Ok(())
}

/// Expand a single template file with positional arguments
pub fn expand(template: PathBuf, args: Vec<String>, config: &Config) -> Result<()> {
    let mut context = TemplateContext::with_variables(&config.variables);
    context.add_build_info();

    let engine = TemplateEngine::new();
    let text = engine
        .expand_file(&template, &args, &context)
        .with_context(|| format!("Failed to expand '{}'", template.display()))?;

    StdoutWriter::new().write(&text)?;
    Ok(())
}
