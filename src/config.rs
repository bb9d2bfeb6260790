//! # Generator Configuration
//!
//! Settings are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file (`--config apigen.yaml`)
//! 3. `APIGEN_*` environment variables
//! 4. command-line flags
//!
//! ## File Format
//!
//! ```yaml
//! runtime_path: crate::rt
//! strict_constraints: true
//! import_parent: false
//! directive_attr: apigen
//! directive_marker: "apigen:api"
//! validator_attr: apivalidator
//! record_marker: Params
//! ```
//!
//! Every key is optional.
//!
//! ## Environment Variables
//!
//! | Variable                     | Key                  |
//! |------------------------------|----------------------|
//! | `APIGEN_RUNTIME_PATH`        | `runtime_path`       |
//! | `APIGEN_STRICT_CONSTRAINTS`  | `strict_constraints` |
//! | `APIGEN_IMPORT_PARENT`       | `import_parent`      |
//! | `APIGEN_DIRECTIVE_ATTR`      | `directive_attr`     |
//! | `APIGEN_DIRECTIVE_MARKER`    | `directive_marker`   |
//! | `APIGEN_VALIDATOR_ATTR`      | `validator_attr`     |
//! | `APIGEN_RECORD_MARKER`       | `record_marker`      |

use crate::constraint::ParseMode;
use crate::generator::{EmitOptions, GenerateOptions, DEFAULT_RUNTIME_PATH};
use crate::schema::ExtractOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value `{value}` for {key}: expected true or false")]
    InvalidBool { key: String, value: String },
}

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Path generated code uses to reach the runtime module
    pub runtime_path: String,
    /// Reject unknown constraint tokens instead of ignoring them
    pub strict_constraints: bool,
    /// Emit `use super::*;` at the top of the generated file
    pub import_parent: bool,
    pub directive_attr: String,
    pub directive_marker: String,
    pub validator_attr: String,
    pub record_marker: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let extract = ExtractOptions::default();
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            strict_constraints: false,
            import_parent: true,
            directive_attr: extract.directive_attr,
            directive_marker: extract.directive_marker,
            validator_attr: extract.validator_attr,
            record_marker: extract.record_marker,
        }
    }
}

impl GeneratorConfig {
    /// Load a YAML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env()?;
        debug!(?config, "loaded generator config");
        Ok(config)
    }

    /// Apply `APIGEN_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `APIGEN_*` overrides from an arbitrary lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strings: [(&str, &mut String); 5] = [
            ("APIGEN_RUNTIME_PATH", &mut self.runtime_path),
            ("APIGEN_DIRECTIVE_ATTR", &mut self.directive_attr),
            ("APIGEN_DIRECTIVE_MARKER", &mut self.directive_marker),
            ("APIGEN_VALIDATOR_ATTR", &mut self.validator_attr),
            ("APIGEN_RECORD_MARKER", &mut self.record_marker),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value.trim().to_string();
            }
        }

        let bools: [(&str, &mut bool); 2] = [
            ("APIGEN_STRICT_CONSTRAINTS", &mut self.strict_constraints),
            ("APIGEN_IMPORT_PARENT", &mut self.import_parent),
        ];
        for (key, slot) in bools {
            if let Some(value) = lookup(key) {
                *slot = parse_bool(key, &value)?;
            }
        }
        Ok(())
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict_constraints {
            ParseMode::Strict
        } else {
            ParseMode::Permissive
        }
    }

    pub fn to_extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            mode: self.parse_mode(),
            directive_attr: self.directive_attr.clone(),
            directive_marker: self.directive_marker.clone(),
            validator_attr: self.validator_attr.clone(),
            record_marker: self.record_marker.clone(),
        }
    }

    pub fn to_generate_options(&self, dry_run: bool) -> GenerateOptions {
        GenerateOptions {
            extract: self.to_extract_options(),
            emit: EmitOptions {
                runtime_path: self.runtime_path.clone(),
                import_parent: self.import_parent,
            },
            dry_run,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
