// ABOUTME: Variable environment used to resolve property markers during expansion
// ABOUTME: Holds typed values in insertion order plus build information captured per run

use chrono::Utc;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

use super::error::{Result, TemplateError};

/// A value stored in the environment or produced by an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Empty strings, lists and maps count as empty; integers never do.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Int(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// The interpreter's variable environment.
///
/// Populated top to bottom as a script executes; the last write to a name
/// wins. Passed explicitly to every expansion instead of living in a global.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: IndexMap<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with string variables
    pub fn with_variables(vars: &HashMap<String, String>) -> Self {
        let mut context = Self::new();
        let mut keys: Vec<_> = vars.keys().collect();
        keys.sort();
        for key in keys {
            context.set(key.clone(), Value::Str(vars[key].clone()));
        }
        context
    }

    /// Record `build.timestamp`, `build.os`, `build.arch` and `build.version`.
    pub fn add_build_info(&mut self) {
        let mut build = IndexMap::new();
        build.insert("timestamp".to_string(), Value::Str(Utc::now().to_rfc3339()));
        build.insert("os".to_string(), Value::from(std::env::consts::OS));
        build.insert("arch".to_string(), Value::from(std::env::consts::ARCH));
        build.insert("version".to_string(), Value::from(crate::VERSION));
        self.set("build".to_string(), Value::Map(build));
    }

    /// Add or replace a variable
    pub fn set(&mut self, name: String, value: Value) {
        self.variables.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Append to a list variable, creating it if missing.
    pub fn push(&mut self, name: &str, value: Value) -> Result<()> {
        match self
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(TemplateError::TypeError(format!(
                "cannot append to '{}': it is a {}",
                name,
                other.type_name()
            ))),
        }
    }

    /// Insert `key` into a map variable, creating the map if missing.
    pub fn insert_entry(&mut self, name: &str, key: String, value: Value) -> Result<()> {
        match self
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Value::Map(IndexMap::new()))
        {
            Value::Map(entries) => {
                entries.insert(key, value);
                Ok(())
            }
            other => Err(TemplateError::TypeError(format!(
                "cannot add entry to '{}': it is a {}",
                name,
                other.type_name()
            ))),
        }
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut context = TemplateContext::new();
        context.set("currentModule".to_string(), Value::from("core"));
        context.set("currentModule".to_string(), Value::from("web"));

        assert_eq!(context.get("currentModule"), Some(&Value::from("web")));
        assert_eq!(context.variable_count(), 1);
    }

    #[test]
    fn test_value_display() {
        let list = Value::List(vec![Value::from("a.jar"), Value::from("b.jar")]);
        assert_eq!(list.to_string(), "a.jar,b.jar");
        assert_eq!(Value::Int(42).to_string(), "42");

        let mut entries = IndexMap::new();
        entries.insert("src".to_string(), Value::from("java"));
        entries.insert("out".to_string(), Value::from("classes"));
        assert_eq!(Value::Map(entries).to_string(), "src=java,out=classes");
    }

    #[test]
    fn test_push_and_insert_entry() {
        let mut context = TemplateContext::new();
        context.push("modules", Value::from("core")).unwrap();
        context.push("modules", Value::from("db")).unwrap();
        context
            .insert_entry("libs", "junit".to_string(), Value::from("junit.jar"))
            .unwrap();

        assert_eq!(context.get("modules").unwrap().to_string(), "core,db");
        assert_eq!(context.get("libs").unwrap().to_string(), "junit=junit.jar");
    }

    #[test]
    fn test_push_onto_string_fails() {
        let mut context = TemplateContext::new();
        context.set("modules".to_string(), Value::from("core"));

        let result = context.push("modules", Value::from("db"));
        assert!(matches!(result, Err(TemplateError::TypeError(_))));
    }

    #[test]
    fn test_seed_variables_and_build_info() {
        let mut variables = HashMap::new();
        variables.insert("env".to_string(), "test".to_string());

        let mut context = TemplateContext::with_variables(&variables);
        context.add_build_info();

        assert_eq!(context.get("env"), Some(&Value::from("test")));
        match context.get("build") {
            Some(Value::Map(build)) => {
                assert!(matches!(build.get("timestamp"), Some(Value::Str(_))));
                assert_eq!(build.get("version"), Some(&Value::from(crate::VERSION)));
            }
            other => panic!("expected build map, got {:?}", other),
        }
    }
}
