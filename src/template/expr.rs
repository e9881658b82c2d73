// ABOUTME: Restricted expression language evaluated inside $[...] markers
// ABOUTME: Supports literals, property paths, concatenation and filters, nothing more

use super::context::{TemplateContext, Value};
use super::error::{Result, TemplateError};
use super::helpers;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Plus,
    Pipe,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Key(String),
    Index(usize),
    /// `name[expr]`: an integer result indexes a list, anything else keys a map.
    Dynamic(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Path(Vec<Segment>),
    Concat(Vec<Expr>),
    Filter {
        input: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
}

fn tokenize(src: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '\'' | '"' => {
                let quote = ch;
                chars.next();
                let mut s = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => s.push(other),
                            None => break,
                        },
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => s.push(c),
                    }
                }
                if !closed {
                    return Err("unterminated string literal".to_string());
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let n = digits
                    .parse::<i64>()
                    .map_err(|e| format!("invalid integer '{}': {}", digits, e))?;
                tokens.push(Token::Int(n));
            }
            c if is_ident_start(c) => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_ident_continue(c) {
                        break;
                    }
                    ident.push(c);
                    chars.next();
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok(tokens)
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Deepest nesting of parentheses, brackets and filters a marker may use.
pub const MAX_NESTING: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> std::result::Result<(), String> {
        match self.next() {
            Some(ref t) if *t == expected => Ok(()),
            Some(t) => Err(format!("expected {:?}, found {:?}", expected, t)),
            None => Err(format!("expected {:?}, found end of expression", expected)),
        }
    }

    fn descend(&mut self) -> std::result::Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(format!("nested deeper than {} levels", MAX_NESTING));
        }
        Ok(())
    }

    fn pipeline(&mut self) -> std::result::Result<Expr, String> {
        let saved = self.depth;
        let result = self.pipeline_at_depth();
        self.depth = saved;
        result
    }

    // pipeline := concat ('|' ident ('(' args ')')?)*
    // Each filter counts as one nesting level.
    fn pipeline_at_depth(&mut self) -> std::result::Result<Expr, String> {
        self.descend()?;
        let mut expr = self.concat()?;
        while self.peek() == Some(&Token::Pipe) {
            self.next();
            self.descend()?;
            let name = match self.next() {
                Some(Token::Ident(name)) => name,
                other => return Err(format!("expected filter name, found {:?}", other)),
            };
            let mut args = Vec::new();
            if self.peek() == Some(&Token::LParen) {
                self.next();
                if self.peek() != Some(&Token::RParen) {
                    args.push(self.pipeline()?);
                    while self.peek() == Some(&Token::Comma) {
                        self.next();
                        args.push(self.pipeline()?);
                    }
                }
                self.expect(Token::RParen)?;
            }
            expr = Expr::Filter {
                input: Box::new(expr),
                name,
                args,
            };
        }
        Ok(expr)
    }

    fn concat(&mut self) -> std::result::Result<Expr, String> {
        let first = self.term()?;
        if self.peek() != Some(&Token::Plus) {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.peek() == Some(&Token::Plus) {
            self.next();
            parts.push(self.term()?);
        }
        Ok(Expr::Concat(parts))
    }

    fn term(&mut self) -> std::result::Result<Expr, String> {
        match self.next() {
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::Int(n))),
            Some(Token::LParen) => {
                let inner = self.pipeline()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(root)) => {
                let mut segments = vec![Segment::Key(root)];
                loop {
                    match self.peek() {
                        Some(Token::Dot) => {
                            self.next();
                            match self.next() {
                                Some(Token::Ident(key)) => segments.push(Segment::Key(key)),
                                other => {
                                    return Err(format!(
                                        "expected property name after '.', found {:?}",
                                        other
                                    ))
                                }
                            }
                        }
                        Some(Token::LBracket) => {
                            self.next();
                            let index = self.pipeline()?;
                            segments.push(match index {
                                Expr::Literal(Value::Int(n)) => Segment::Index(n as usize),
                                Expr::Literal(Value::Str(key)) => Segment::Key(key),
                                other => Segment::Dynamic(Box::new(other)),
                            });
                            self.expect(Token::RBracket)?;
                        }
                        _ => break,
                    }
                }
                Ok(Expr::Path(segments))
            }
            Some(t) => Err(format!("unexpected token {:?}", t)),
            None => Err("empty expression".to_string()),
        }
    }
}

/// Parse an expression without evaluating it.
pub fn parse(src: &str) -> Result<Expr> {
    let syntax_error = |message: String| TemplateError::SyntaxError {
        expr: src.to_string(),
        message,
    };

    let tokens = tokenize(src).map_err(syntax_error)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.pipeline().map_err(syntax_error)?;
    if let Some(token) = parser.peek() {
        return Err(syntax_error(format!("unexpected trailing {:?}", token)));
    }
    Ok(expr)
}

fn path_to_string(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Key(key) if out.is_empty() => out.push_str(key),
            Segment::Key(key) => {
                out.push('.');
                out.push_str(key);
            }
            Segment::Index(i) => out.push_str(&format!("[{}]", i)),
            Segment::Dynamic(_) => out.push_str("[..]"),
        }
    }
    out
}

fn lookup(segments: &[Segment], context: &TemplateContext) -> Result<Value> {
    let unknown = || TemplateError::UnknownVariable(path_to_string(segments));

    let mut current = match segments.first() {
        Some(Segment::Key(root)) => context.get(root).ok_or_else(unknown)?,
        _ => return Err(unknown()),
    };

    for segment in &segments[1..] {
        let resolved;
        let segment = match segment {
            Segment::Dynamic(index) => {
                resolved = match eval(index, context)? {
                    Value::Int(n) if n >= 0 => Segment::Index(n as usize),
                    other => Segment::Key(other.to_string()),
                };
                &resolved
            }
            static_segment => static_segment,
        };
        current = match (segment, current) {
            (Segment::Key(key), Value::Map(entries)) => entries.get(key).ok_or_else(unknown)?,
            (Segment::Index(i), Value::List(items)) => items.get(*i).ok_or_else(unknown)?,
            (_, other) => {
                return Err(TemplateError::TypeError(format!(
                    "cannot index into {} while resolving '{}'",
                    other.type_name(),
                    path_to_string(segments)
                )))
            }
        };
    }

    Ok(current.clone())
}

pub fn eval(expr: &Expr, context: &TemplateContext) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Path(segments) => lookup(segments, context),
        Expr::Concat(parts) => {
            let mut acc = eval(&parts[0], context)?;
            for part in &parts[1..] {
                let rhs = eval(part, context)?;
                acc = match (acc, rhs) {
                    (Value::Int(a), Value::Int(b)) => Value::Int(a.checked_add(b).ok_or_else(
                        || TemplateError::TypeError("integer overflow in '+'".to_string()),
                    )?),
                    (Value::List(mut a), Value::List(b)) => {
                        a.extend(b);
                        Value::List(a)
                    }
                    (a, b) => Value::Str(format!("{}{}", a, b)),
                };
            }
            Ok(acc)
        }
        Expr::Filter { input, name, args } => {
            let input = match eval(input, context) {
                Ok(value) => Some(value),
                Err(TemplateError::UnknownVariable(_)) if name == "default" => None,
                Err(e) => return Err(e),
            };
            let args = args
                .iter()
                .map(|a| eval(a, context))
                .collect::<Result<Vec<_>>>()?;
            helpers::apply_filter(name, input, &args)
        }
    }
}

/// Parse and evaluate in one step.
pub fn eval_str(src: &str, context: &TemplateContext) -> Result<Value> {
    eval(&parse(src)?, context)
}
