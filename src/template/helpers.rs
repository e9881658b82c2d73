// ABOUTME: Formatting filters available to property expressions
// ABOUTME: Implements upper, lower, join, default and the other pipe filters

use super::context::Value;
use super::error::{Result, TemplateError};

pub const FILTERS: &[&str] = &[
    "upper",
    "lower",
    "capitalize",
    "trim",
    "len",
    "join",
    "default",
    "replace",
    "first",
    "last",
];

/// Apply the filter `name` to `input`.
///
/// `input` is `None` only for `default` when the piped variable is unknown.
pub fn apply_filter(name: &str, input: Option<Value>, args: &[Value]) -> Result<Value> {
    let input = match input {
        Some(value) => value,
        None => return default_filter(None, args),
    };

    match name {
        "upper" => Ok(Value::Str(input.to_string().to_uppercase())),
        "lower" => Ok(Value::Str(input.to_string().to_lowercase())),
        "capitalize" => Ok(Value::Str(capitalize(&input.to_string()))),
        "trim" => Ok(Value::Str(input.to_string().trim().to_string())),
        "len" => {
            let len = match &input {
                Value::List(items) => items.len(),
                Value::Map(entries) => entries.len(),
                other => other.to_string().chars().count(),
            };
            Ok(Value::Int(len as i64))
        }
        "join" => join_filter(input, args),
        "default" => default_filter(Some(input), args),
        "replace" => match args {
            [from, to] => Ok(Value::Str(
                input.to_string().replace(&from.to_string(), &to.to_string()),
            )),
            _ => Err(arity("replace", 2, args.len())),
        },
        "first" | "last" => match input {
            Value::List(items) => {
                let item = if name == "first" {
                    items.into_iter().next()
                } else {
                    items.into_iter().last()
                };
                Ok(item.unwrap_or_else(|| Value::Str(String::new())))
            }
            other => Err(TemplateError::TypeError(format!(
                "'{}' filter expects a list, got {}",
                name,
                other.type_name()
            ))),
        },
        other => Err(TemplateError::UnknownFilter(other.to_string())),
    }
}

fn join_filter(input: Value, args: &[Value]) -> Result<Value> {
    let separator = match args {
        [] => ",".to_string(),
        [sep] => sep.to_string(),
        _ => return Err(arity("join", 1, args.len())),
    };

    match input {
        Value::List(items) => Ok(Value::Str(
            items
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(&separator),
        )),
        other => Ok(Value::Str(other.to_string())),
    }
}

fn default_filter(input: Option<Value>, args: &[Value]) -> Result<Value> {
    let fallback = match args {
        [fallback] => fallback.clone(),
        _ => return Err(arity("default", 1, args.len())),
    };

    match input {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Ok(fallback),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn arity(name: &str, expected: usize, got: usize) -> TemplateError {
    TemplateError::TypeError(format!(
        "'{}' filter takes {} argument(s), got {}",
        name, expected, got
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_filters() {
        let input = Value::from("jodd-core");
        assert_eq!(
            apply_filter("upper", Some(input.clone()), &[]).unwrap(),
            Value::from("JODD-CORE")
        );
        assert_eq!(
            apply_filter("capitalize", Some(input), &[]).unwrap(),
            Value::from("Jodd-core")
        );
        assert_eq!(
            apply_filter("lower", Some(Value::from("ABC")), &[]).unwrap(),
            Value::from("abc")
        );
    }

    #[test]
    fn test_join_filter() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(
            apply_filter("join", Some(list.clone()), &[]).unwrap(),
            Value::from("a,b")
        );
        assert_eq!(
            apply_filter("join", Some(list), &[Value::from(";")]).unwrap(),
            Value::from("a;b")
        );
    }

    #[test]
    fn test_default_filter() {
        let fallback = [Value::from("none")];
        assert_eq!(
            apply_filter("default", None, &fallback).unwrap(),
            Value::from("none")
        );
        assert_eq!(
            apply_filter("default", Some(Value::from("")), &fallback).unwrap(),
            Value::from("none")
        );
        assert_eq!(
            apply_filter("default", Some(Value::from("set")), &fallback).unwrap(),
            Value::from("set")
        );
    }

    #[test]
    fn test_replace_and_first_last() {
        assert_eq!(
            apply_filter(
                "replace",
                Some(Value::from("jodd.util")),
                &[Value::from("."), Value::from("/")]
            )
            .unwrap(),
            Value::from("jodd/util")
        );

        let list = Value::List(vec![Value::from("x"), Value::from("y")]);
        assert_eq!(
            apply_filter("first", Some(list.clone()), &[]).unwrap(),
            Value::from("x")
        );
        assert_eq!(
            apply_filter("last", Some(list), &[]).unwrap(),
            Value::from("y")
        );
    }

    #[test]
    fn test_unknown_filter() {
        let result = apply_filter("shout", Some(Value::from("x")), &[]);
        assert!(matches!(result, Err(TemplateError::UnknownFilter(_))));
    }

    #[test]
    fn test_every_listed_filter_is_known() {
        let list = Value::List(vec![Value::from("x")]);
        for name in FILTERS {
            let args: Vec<Value> = match *name {
                "default" => vec![Value::from("d")],
                "replace" => vec![Value::from("x"), Value::from("y")],
                _ => Vec::new(),
            };
            let result = apply_filter(name, Some(list.clone()), &args);
            assert!(
                !matches!(result, Err(TemplateError::UnknownFilter(_))),
                "filter {} not handled",
                name
            );
        }
    }
}
