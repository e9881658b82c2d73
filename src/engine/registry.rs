// ABOUTME: Name resolution for script calls: builder function, template file, or unknown
// ABOUTME: Builder functions always win over a same-named template on the search path

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// The fixed set of builder functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    Project,
    Module,
    Lib,
    Target,
    Pack,
    Set,
    Emit,
}

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Project,
        Builtin::Module,
        Builtin::Lib,
        Builtin::Target,
        Builtin::Pack,
        Builtin::Set,
        Builtin::Emit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Project => "project",
            Builtin::Module => "module",
            Builtin::Lib => "lib",
            Builtin::Target => "target",
            Builtin::Pack => "pack",
            Builtin::Set => "set",
            Builtin::Emit => "emit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Builtin(Builtin),
    Template(PathBuf),
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    search_path: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl Registry {
    pub fn new(search_path: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            search_path,
            extensions,
        }
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        if let Some(builtin) = Builtin::from_name(name) {
            return Resolution::Builtin(builtin);
        }
        match self.find_template(name) {
            Some(path) => Resolution::Template(path),
            None => Resolution::Unknown,
        }
    }

    /// Look for `name`, then `name.<ext>`, in each search directory in order.
    pub fn find_template(&self, name: &str) -> Option<PathBuf> {
        for dir in &self.search_path {
            let exact = dir.join(name);
            if exact.is_file() {
                return Some(exact);
            }
            for ext in &self.extensions {
                let candidate = dir.join(format!("{}.{}", name, ext.trim_start_matches('.')));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        debug!("No template named '{}' on the search path", name);
        None
    }
}
