// ABOUTME: Template expander for %ARGn% positional markers and $[expr] property markers
// ABOUTME: Scans left to right, substitutes, and resumes after the substituted text

use std::path::Path;
use tracing::debug;

use super::context::TemplateContext;
use super::error::{Result, TemplateError};
use super::expr::{self, Expr, Segment};
use super::helpers::FILTERS;

pub const PROPERTY_OPEN: &str = "$[";
pub const ARGUMENT_PREFIX: &str = "%ARG";

#[derive(Debug, Clone, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Expand all markers in `template`.
    ///
    /// Positional markers are replaced first over the whole text, then
    /// property markers. An argument whose string form contains `$[...]` is
    /// therefore expanded by the property pass.
    ///
    /// Re-expansion stops there. Each pass resumes after what it inserted,
    /// so an argument containing `%ARGn%` and a property value containing
    /// `$[...]` both come out literally.
    pub fn expand(
        &self,
        template: &str,
        args: &[String],
        context: &TemplateContext,
    ) -> Result<String> {
        let with_args = expand_arguments(template, args)?;
        expand_properties(&with_args, context)
    }

    /// Read a template file and expand it
    pub fn expand_file(
        &self,
        path: &Path,
        args: &[String],
        context: &TemplateContext,
    ) -> Result<String> {
        let template = std::fs::read_to_string(path)?;
        debug!(
            "Expanding template {} ({} bytes, {} args)",
            path.display(),
            template.len(),
            args.len()
        );
        self.expand(&template, args, context)
    }

    /// Check marker syntax without evaluating any expression
    pub fn validate_template(&self, template: &str) -> Result<()> {
        let mut pos = 0;
        while let Some(found) = template[pos..].find(ARGUMENT_PREFIX) {
            let start = pos + found;
            let (_, end) = parse_argument_marker(template, start)?;
            pos = end;
        }

        pos = 0;
        while let Some(found) = template[pos..].find(PROPERTY_OPEN) {
            let start = pos + found;
            let close = find_property_close(template, start)?;
            let parsed = expr::parse(&template[start + PROPERTY_OPEN.len()..close])?;
            check_filters(&parsed)?;
            pos = close + 1;
        }

        Ok(())
    }

    pub fn has_markers(&self, text: &str) -> bool {
        text.contains(PROPERTY_OPEN) || text.contains(ARGUMENT_PREFIX)
    }
}

fn expand_arguments(template: &str, args: &[String]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(found) = template[pos..].find(ARGUMENT_PREFIX) {
        let start = pos + found;
        let (index, end) = parse_argument_marker(template, start)?;
        let value = args.get(index).ok_or(TemplateError::ArgumentOutOfRange {
            index,
            count: args.len(),
        })?;
        out.push_str(&template[pos..start]);
        out.push_str(value);
        pos = end;
    }

    out.push_str(&template[pos..]);
    Ok(out)
}

/// Returns the argument index and the byte offset just past the closing `%`.
fn parse_argument_marker(template: &str, start: usize) -> Result<(usize, usize)> {
    let digits_start = start + ARGUMENT_PREFIX.len();
    let digits_len = template[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let digits_end = digits_start + digits_len;

    if digits_len == 0 || !template[digits_end..].starts_with('%') {
        return Err(TemplateError::MalformedArgument { offset: start });
    }

    let index = template[digits_start..digits_end]
        .parse::<usize>()
        .map_err(|_| TemplateError::MalformedArgument { offset: start })?;
    Ok((index, digits_end + 1))
}

fn expand_properties(template: &str, context: &TemplateContext) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(found) = template[pos..].find(PROPERTY_OPEN) {
        let start = pos + found;
        let close = find_property_close(template, start)?;
        let value = expr::eval_str(&template[start + PROPERTY_OPEN.len()..close], context)?;
        out.push_str(&template[pos..start]);
        out.push_str(&value.to_string());
        pos = close + 1;
    }

    out.push_str(&template[pos..]);
    Ok(out)
}

/// Byte offset of the `]` matching the `$[` at `start`.
fn find_property_close(template: &str, start: usize) -> Result<usize> {
    let body_start = start + PROPERTY_OPEN.len();
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in template[body_start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(body_start + i);
                }
            }
            _ => {}
        }
    }

    Err(TemplateError::UnterminatedMarker {
        marker: PROPERTY_OPEN,
        offset: start,
    })
}

fn check_filters(expr: &Expr) -> Result<()> {
    match expr {
        Expr::Literal(_) => Ok(()),
        Expr::Path(segments) => segments.iter().try_for_each(|segment| match segment {
            Segment::Dynamic(index) => check_filters(index),
            _ => Ok(()),
        }),
        Expr::Concat(parts) => parts.iter().try_for_each(check_filters),
        Expr::Filter { input, name, args } => {
            if !FILTERS.contains(&name.as_str()) {
                return Err(TemplateError::UnknownFilter(name.clone()));
            }
            check_filters(input)?;
            args.iter().try_for_each(check_filters)
        }
    }
}
