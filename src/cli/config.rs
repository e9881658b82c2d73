// ABOUTME: Configuration management for the pant application
// ABOUTME: Handles loading configuration from YAML files and merging environment overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::engine::Registry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_template_dirs")]
    pub template_dirs: Vec<PathBuf>,

    #[serde(default = "default_template_extensions")]
    pub template_extensions: Vec<String>,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_template_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("templates")]
}

fn default_template_extensions() -> Vec<String> {
    vec!["xml".to_string()]
}

fn default_output() -> PathBuf {
    PathBuf::from("build.xml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dirs: default_template_dirs(),
            template_extensions: default_template_extensions(),
            output: default_output(),
            variables: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("pant.yaml"),
            PathBuf::from("pant.yml"),
            PathBuf::from(".pant.yaml"),
            PathBuf::from(".pant.yml"),
        ];

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".pant").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Default path (may not exist)
        PathBuf::from("pant.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("PANT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PANT_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("PANT_OUTPUT") {
            self.output = PathBuf::from(output);
        }
        if let Some(paths) = std::env::var_os("PANT_TEMPLATE_PATH") {
            let mut dirs: Vec<PathBuf> = std::env::split_paths(&paths).collect();
            dirs.append(&mut self.template_dirs);
            self.template_dirs = dirs;
        }

        Ok(())
    }

    /// Merge additional variables into the seed variables
    pub fn merge_variables(&mut self, vars: HashMap<String, String>) {
        self.variables.extend(vars);
    }

    /// Build a registry whose search path starts with `extra_dirs`
    pub fn registry(&self, extra_dirs: &[PathBuf]) -> Registry {
        let search_path = extra_dirs
            .iter()
            .chain(self.template_dirs.iter())
            .cloned()
            .collect();
        Registry::new(search_path, self.template_extensions.clone())
    }
}
