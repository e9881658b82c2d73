// ABOUTME: Rewrites parsed script lines into directives using the registry
// ABOUTME: Template calls become template_call(...); everything else passes through unchanged

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use super::registry::{Builtin, Registry, Resolution};
use crate::parser::{Script, Statement};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    Blank,
    Comment {
        text: String,
    },
    Assign {
        name: String,
        expr: String,
    },
    Builtin {
        builtin: Builtin,
        args: Vec<String>,
    },
    TemplateCall {
        name: String,
        path: PathBuf,
        args: Vec<String>,
    },
    /// A call that matched neither a builder nor a template.
    Call {
        name: String,
        args: Vec<String>,
    },
    Raw {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewrittenLine {
    pub number: usize,
    pub depth: usize,
    /// Source text, printed as-is for every line that is not a template call.
    pub text: String,
    pub directive: Directive,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewrittenScript {
    pub lines: Vec<RewrittenLine>,
}

impl RewrittenScript {
    pub fn template_calls(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.lines.iter().filter_map(|line| match &line.directive {
            Directive::TemplateCall { name, path, .. } => Some((name.as_str(), path)),
            _ => None,
        })
    }

    /// Names of calls that will fail when executed
    pub fn unresolved(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match &line.directive {
                Directive::Call { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Resolve every call in `script` once, in order.
pub fn rewrite(script: &Script, registry: &Registry) -> RewrittenScript {
    let lines = script
        .lines
        .iter()
        .map(|line| {
            let directive = match &line.statement {
                Statement::Blank => Directive::Blank,
                Statement::Comment { text } => Directive::Comment { text: text.clone() },
                Statement::Assign { name, expr } => Directive::Assign {
                    name: name.clone(),
                    expr: expr.clone(),
                },
                Statement::Raw { text } => Directive::Raw { text: text.clone() },
                Statement::Call(call) => match registry.resolve(&call.name) {
                    Resolution::Builtin(builtin) => Directive::Builtin {
                        builtin,
                        args: call.args.clone(),
                    },
                    Resolution::Template(path) => {
                        debug!(
                            "line {}: '{}' rewritten to template {}",
                            line.number,
                            call.name,
                            path.display()
                        );
                        Directive::TemplateCall {
                            name: call.name.clone(),
                            path,
                            args: call.args.clone(),
                        }
                    }
                    Resolution::Unknown => Directive::Call {
                        name: call.name.clone(),
                        args: call.args.clone(),
                    },
                },
            };
            RewrittenLine {
                number: line.number,
                depth: line.depth,
                text: line.text.clone(),
                directive,
            }
        })
        .collect();

    RewrittenScript { lines }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Blank => Ok(()),
            Directive::Comment { text } | Directive::Raw { text } => f.write_str(text),
            Directive::Assign { name, expr } => write!(f, "{} = {}", name, expr),
            Directive::Builtin { builtin, args } => write!(f, "{}({})", builtin, args.join(", ")),
            Directive::Call { name, args } => write!(f, "{}({})", name, args.join(", ")),
            Directive::TemplateCall { name, args, .. } => {
                write!(f, "template_call('{}'", name)?;
                for arg in args {
                    write!(f, ", {}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for RewrittenScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line.directive {
                Directive::TemplateCall { .. } => {
                    for _ in 0..line.depth {
                        f.write_str("\t")?;
                    }
                    writeln!(f, "{}", line.directive)?;
                }
                _ => writeln!(f, "{}", line.text)?,
            }
        }
        Ok(())
    }
}
