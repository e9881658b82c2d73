// ABOUTME: Line-oriented parser for declarative build scripts
// ABOUTME: Classifies each line as blank, comment, assignment, call, or raw text

use serde::Serialize;
use std::path::Path;

use super::error::{ParserError, Result};
use crate::template::expr::{is_ident_continue, is_ident_start};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub name: String,
    /// Argument source text, passed through unchanged.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Statement {
    Blank,
    Comment { text: String },
    Assign { name: String, expr: String },
    Call(Call),
    Raw { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// 1-based line number in the source script.
    pub number: usize,
    /// Leading tab count. Cosmetic only.
    pub depth: usize,
    /// The line exactly as written.
    pub text: String,
    pub statement: Statement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Script {
    pub lines: Vec<Line>,
}

impl Script {
    /// Read and parse a script file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ParserError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&source))
    }

    pub fn parse(source: &str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .map(|(i, text)| parse_line(i + 1, text))
            .collect();
        Self { lines }
    }

    pub fn calls(&self) -> impl Iterator<Item = &Call> {
        self.lines.iter().filter_map(|line| match &line.statement {
            Statement::Call(call) => Some(call),
            _ => None,
        })
    }
}

fn parse_line(number: usize, text: &str) -> Line {
    let depth = text.chars().take_while(|c| *c == '\t').count();
    let body = text[depth..].trim();

    let statement = if body.is_empty() {
        Statement::Blank
    } else if body.starts_with('#') {
        Statement::Comment {
            text: body.to_string(),
        }
    } else {
        let code = strip_trailing_comment(body);
        parse_call(code)
            .map(Statement::Call)
            .or_else(|| parse_assign(code))
            .unwrap_or_else(|| Statement::Raw {
                text: body.to_string(),
            })
    };

    Line {
        number,
        depth,
        text: text.to_string(),
        statement,
    }
}

/// Drop a `# ...` suffix that sits outside any quoted string.
fn strip_trailing_comment(body: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
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
            '#' => return body[..i].trim_end(),
            _ => {}
        }
    }
    body
}

fn split_ident(s: &str) -> Option<(&str, &str)> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if is_ident_start(c) => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !is_ident_continue(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn parse_call(code: &str) -> Option<Call> {
    let (name, rest) = split_ident(code)?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    let args = split_args(inner).ok()?;
    Some(Call {
        name: name.to_string(),
        args,
    })
}

fn parse_assign(code: &str) -> Option<Statement> {
    let (name, rest) = split_ident(code)?;
    let rest = rest.trim_start();
    let expr = rest.strip_prefix('=')?;
    if expr.starts_with('=') {
        return None;
    }
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }
    Some(Statement::Assign {
        name: name.to_string(),
        expr: expr.to_string(),
    })
}

/// Split call arguments on top-level commas.
///
/// Fails on unbalanced brackets or an unterminated string, and on empty
/// arguments other than a single trailing comma.
pub fn split_args(inner: &str) -> std::result::Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in inner.chars() {
        if let Some(q) = quote {
            current.push(c);
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
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced '{}'", c))?;
                current.push(c);
            }
            ',' if depth == 0 => {
                let arg = current.trim();
                if arg.is_empty() {
                    return Err("empty argument".to_string());
                }
                args.push(arg.to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string".to_string());
    }
    if depth != 0 {
        return Err("unbalanced brackets".to_string());
    }

    let last = current.trim();
    if !last.is_empty() {
        args.push(last.to_string());
    } else if !args.is_empty() && !inner.trim_end().ends_with(',') {
        return Err("empty argument".to_string());
    }

    Ok(args)
}
