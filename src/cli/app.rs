// ABOUTME: Main application orchestration for the pant CLI
// ABOUTME: Coordinates between CLI arguments, configuration, and command execution

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands;
use super::{Args, Commands, Config};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        // stdout carries generated text, so logs go to stderr
        match self.config.logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting pant v{}", env!("CARGO_PKG_VERSION"));
        debug!("Configuration loaded from: {:?}", args.config);

        match &args.command {
            Commands::Generate { vars, .. } | Commands::Expand { vars, .. } => {
                let variables = Args::parse_variables(vars)?;
                self.config.merge_variables(variables);
            }
            Commands::Rewrite { .. } => {}
        }

        match args.command {
            Commands::Generate {
                script,
                output,
                templates,
                ..
            } => commands::generate(script, output, templates, &self.config),

            Commands::Rewrite {
                script,
                templates,
                check,
                json,
            } => commands::rewrite(script, templates, check, json, &self.config),

            Commands::Expand { template, args, .. } => {
                commands::expand(template, args, &self.config)
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_app_creation() {
        let config = Config::default();
        let app = App::new(config);
        assert_eq!(app.config().output, PathBuf::from("build.xml"));
    }

    #[test]
    fn test_app_with_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("pant.yaml");

        let config_content = r#"
template_extensions: [xml, tpl]
logging:
  level: debug
  format: compact
"#;

        fs::write(&config_path, config_content).unwrap();

        let app = App::new(Config::load(Some(config_path)).unwrap());
        assert_eq!(
            app.config().template_extensions,
            vec!["xml".to_string(), "tpl".to_string()]
        );
        assert_eq!(app.config().template_dirs, vec![PathBuf::from("templates")]);
    }
}
