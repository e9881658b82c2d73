// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and the generate, rewrite and expand subcommands

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pant")]
#[command(about = "Generate a build descriptor from a declarative script and template fragments")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite and execute a script, writing the generated descriptor
    Generate {
        #[arg(help = "Path to the declarative script")]
        script: PathBuf,

        #[arg(short, long, help = "Output file, or '-' for stdout")]
        output: Option<PathBuf>,

        #[arg(
            short = 't',
            long = "templates",
            help = "Template directory (repeatable, searched first)"
        )]
        templates: Vec<PathBuf>,

        #[arg(short = 'V', long = "var", help = "Set a variable (key=value)")]
        vars: Vec<String>,
    },

    /// Print the rewritten script without executing it
    Rewrite {
        #[arg(help = "Path to the declarative script")]
        script: PathBuf,

        #[arg(
            short = 't',
            long = "templates",
            help = "Template directory (repeatable, searched first)"
        )]
        templates: Vec<PathBuf>,

        #[arg(long, help = "Validate marker syntax of every referenced template")]
        check: bool,

        #[arg(long, help = "Print the rewritten script as JSON")]
        json: bool,
    },

    /// Expand a single template file to stdout
    Expand {
        #[arg(help = "Path to the template file")]
        template: PathBuf,

        #[arg(help = "Positional arguments for %ARGn% markers")]
        args: Vec<String>,

        #[arg(short = 'V', long = "var", help = "Set a variable (key=value)")]
        vars: Vec<String>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<HashMap<String, String>> {
        let mut variables = HashMap::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                variables.insert(key.to_string(), value.to_string());
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variables() {
        let vars = vec![
            "version=3.4.0".to_string(),
            "vendor=Jodd Team".to_string(),
            "url=http://jodd.org?a=b".to_string(),
        ];

        let parsed = Args::parse_variables(&vars).unwrap();

        assert_eq!(parsed.get("version"), Some(&"3.4.0".to_string()));
        assert_eq!(parsed.get("vendor"), Some(&"Jodd Team".to_string()));
        assert_eq!(parsed.get("url"), Some(&"http://jodd.org?a=b".to_string()));
    }

    #[test]
    fn test_parse_variables_invalid() {
        let vars = vec!["invalid_format".to_string()];
        let result = Args::parse_variables(&vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_subcommand() {
        let args = Args::try_parse_from([
            "pant",
            "generate",
            "build.pant",
            "-o",
            "build.xml",
            "-t",
            "tpl",
            "-V",
            "a=b",
        ])
        .unwrap();

        match args.command {
            Commands::Generate {
                script,
                output,
                templates,
                vars,
            } => {
                assert_eq!(script, PathBuf::from("build.pant"));
                assert_eq!(output, Some(PathBuf::from("build.xml")));
                assert_eq!(templates, vec![PathBuf::from("tpl")]);
                assert_eq!(vars, vec!["a=b".to_string()]);
            }
            _ => panic!("expected generate"),
        }
    }
}
