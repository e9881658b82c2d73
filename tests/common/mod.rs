// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp workspaces with template directories and script builders

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct ScriptBuilder {
    lines: Vec<String>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn comment(mut self, text: &str) -> Self {
        self.lines.push(format!("# {}", text));
        self
    }

    pub fn assign(mut self, name: &str, expr: &str) -> Self {
        self.lines.push(format!("{} = {}", name, expr));
        self
    }

    /// Add `name('a', 'b', ...)` with every argument quoted as a string literal
    pub fn call(self, name: &str, args: &[&str]) -> Self {
        self.call_at(0, name, args)
    }

    pub fn call_at(mut self, depth: usize, name: &str, args: &[&str]) -> Self {
        let quoted: Vec<String> = args.iter().map(|a| format!("'{}'", a)).collect();
        self.lines.push(format!(
            "{}{}({})",
            "\t".repeat(depth),
            name,
            quoted.join(", ")
        ));
        self
    }

    pub fn line(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut source = self.lines.join("\n");
        source.push('\n');
        source
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let env = Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        };
        fs::create_dir_all(env.templates_dir()).expect("Failed to create templates directory");
        env
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.path().join("templates")
    }

    pub fn output_file(&self) -> PathBuf {
        self.path().join("build.xml")
    }

    pub fn write_template(&self, name: &str, content: &str) -> PathBuf {
        let path = self.templates_dir().join(name);
        fs::write(&path, content).expect("Failed to write template");
        path
    }

    pub fn write_script(&self, name: &str, builder: &ScriptBuilder) -> PathBuf {
        self.write_script_source(name, &builder.build())
    }

    pub fn write_script_source(&self, name: &str, source: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, source).expect("Failed to write script");
        path
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.output_file()).expect("Failed to read output file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_builder() {
        let source = ScriptBuilder::new()
            .comment("modules")
            .call("module", &["core"])
            .call_at(1, "compile", &[])
            .assign("version", "'3.4'")
            .build();

        assert_eq!(
            source,
            "# modules\nmodule('core')\n\tcompile()\nversion = '3.4'\n"
        );
    }

    #[test]
    fn test_environment_setup() {
        let env = TestEnvironment::new();
        assert!(env.templates_dir().is_dir());

        let template = env.write_template("greet", "Hello");
        assert!(template.ends_with("templates/greet"));
    }
}
