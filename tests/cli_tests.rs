// ABOUTME: Integration tests for the CLI application
// ABOUTME: Drives the built binary through generate, rewrite and expand

use std::process::{Command, Output};

mod common;
use common::{ScriptBuilder, TestEnvironment};

fn pant(env: &TestEnvironment, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pant"))
        .args(args)
        .current_dir(env.path())
        .env_remove("RUST_LOG")
        .env_remove("PANT_OUTPUT")
        .env_remove("PANT_TEMPLATE_PATH")
        .output()
        .expect("Failed to execute pant")
}

#[test]
fn test_cli_help_command() {
    let env = TestEnvironment::new();
    let output = pant(&env, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("rewrite"));
    assert!(stdout.contains("expand"));
}

#[test]
fn test_cli_version_command() {
    let env = TestEnvironment::new();
    let output = pant(&env, &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_uses_default_templates_and_output() {
    let env = TestEnvironment::new();
    env.write_template("greet", "Hello, %ARG0%!\n");
    let script = env.write_script("build.pant", &ScriptBuilder::new().call("greet", &["world"]));

    let output = pant(&env, &["generate", script.to_str().unwrap()]);

    if !output.status.success() {
        println!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success());
    assert_eq!(env.read_output(), "Hello, world!\n");
}

#[test]
fn test_cli_generate_to_stdout_with_variables() {
    let env = TestEnvironment::new();
    let custom = env.path().join("ant");
    std::fs::create_dir(&custom).unwrap();
    std::fs::write(custom.join("banner.xml"), "<!-- $[vendor] %ARG0% -->\n").unwrap();
    let script = env.write_script(
        "build.pant",
        &ScriptBuilder::new().call("banner", &["generated"]),
    );

    let output = pant(
        &env,
        &[
            "generate",
            script.to_str().unwrap(),
            "-t",
            custom.to_str().unwrap(),
            "-o",
            "-",
            "-V",
            "vendor=Jodd Team",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "<!-- Jodd Team generated -->\n");
    assert!(!env.output_file().exists());
}

#[test]
fn test_cli_generate_failure_writes_nothing() {
    let env = TestEnvironment::new();
    let script = env.write_script_source("build.pant", "module('core')\nmissing_template()\n");

    let output = pant(&env, &["generate", script.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no such function 'missing_template'"));
    assert!(!env.output_file().exists());
}

#[test]
fn test_cli_rewrite_prints_rewritten_script() {
    let env = TestEnvironment::new();
    env.write_template("greet", "Hello, %ARG0%!");
    let script = env.write_script(
        "build.pant",
        &ScriptBuilder::new()
            .call("module", &["x"])
            .call_at(1, "greet", &["world"])
            .call("unknown", &[]),
    );

    let output = pant(&env, &["rewrite", script.to_str().unwrap(), "--check"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "module('x')\n\ttemplate_call('greet', 'world')\nunknown()\n"
    );
}

#[test]
fn test_cli_rewrite_check_rejects_bad_template() {
    let env = TestEnvironment::new();
    env.write_template("broken", "<a href=\"$[unterminated\"/>");
    let script = env.write_script("build.pant", &ScriptBuilder::new().call("broken", &[]));

    let output = pant(&env, &["rewrite", script.to_str().unwrap(), "--check"]);

    assert!(!output.status.success());
}

#[test]
fn test_cli_rewrite_json() {
    let env = TestEnvironment::new();
    let script = env.write_script("build.pant", &ScriptBuilder::new().call("lib", &["junit", "a.jar"]));

    let output = pant(&env, &["rewrite", script.to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["lines"][0]["directive"]["kind"], "builtin");
    assert_eq!(parsed["lines"][0]["directive"]["builtin"], "lib");
}

#[test]
fn test_cli_expand_single_template() {
    let env = TestEnvironment::new();
    let template = env.write_template("jar.xml", "<jar destfile=\"%ARG0%-$[version].jar\"/>");

    let output = pant(
        &env,
        &[
            "expand",
            template.to_str().unwrap(),
            "jodd-core",
            "--var",
            "version=3.4.1",
        ],
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<jar destfile=\"jodd-core-3.4.1.jar\"/>"
    );
}

#[test]
fn test_cli_config_file_sets_output() {
    let env = TestEnvironment::new();
    std::fs::write(
        env.path().join("pant.yaml"),
        "output: out/descriptor.xml\nvariables:\n  name: from-config\n",
    )
    .unwrap();
    let script = env.write_script_source("build.pant", "emit('$[name]')\n");

    let output = pant(&env, &["generate", script.to_str().unwrap()]);

    assert!(output.status.success());
    let written = std::fs::read_to_string(env.path().join("out/descriptor.xml")).unwrap();
    assert_eq!(written, "from-config");
}

#[test]
fn test_cli_invalid_variable_format() {
    let env = TestEnvironment::new();
    let script = env.write_script_source("build.pant", "emit('x')\n");

    let output = pant(&env, &["generate", script.to_str().unwrap(), "-V", "novalue"]);

    assert!(!output.status.success());
}
