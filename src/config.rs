use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AssessmentError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "wellbeing.toml";
pub const DEFAULT_MODEL_PATH: &str = "mental_health_model.json";
pub const DEFAULT_ENCODER_PATH: &str = "label_encoder.json";
pub const DEFAULT_LOG_LEVEL: &str = "wellbeing_assess=warn";

/// Main configuration structure loaded from wellbeing.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Locations of the trained predictor and its label decoder
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub encoder_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            encoder_path: PathBuf::from(DEFAULT_ENCODER_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AssessmentError::Config {
                message: format!("unknown output format '{}' (expected text or json)", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_true")]
    pub show_banner: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_banner: true,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Load environment variables from `WELLBEING_ENV_FILE`, or `./.env` if unset.
/// Missing files are ignored.
pub fn load_env_file() {
    if let Ok(env_path) = std::env::var("WELLBEING_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::from_path(".env");
    }
}

/// Values given on the command line. Each one set here shadows the matching
/// `WELLBEING_*` variable.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub model_path: Option<PathBuf>,
    pub encoder_path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub hide_banner: bool,
}

impl CliOverrides {
    fn shadows(&self, key: &str) -> bool {
        match key {
            "WELLBEING_MODEL_PATH" => self.model_path.is_some(),
            "WELLBEING_ENCODER_PATH" => self.encoder_path.is_some(),
            "WELLBEING_OUTPUT_FORMAT" => self.format.is_some(),
            "WELLBEING_SHOW_BANNER" => self.hide_banner,
            _ => false,
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model_path {
            config.artifacts.model_path = model.clone();
        }
        if let Some(encoder) = &self.encoder_path {
            config.artifacts.encoder_path = encoder.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.hide_banner {
            config.output.show_banner = false;
        }
    }
}

impl Config {
    /// Load configuration: TOML file, then environment, then command line,
    /// then [`Config::validate`].
    ///
    /// An explicitly named file must exist. Otherwise `WELLBEING_CONFIG` or
    /// `wellbeing.toml` is tried, falling back to defaults when absent.
    pub fn load(explicit_path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let (config_path, required) = match explicit_path {
            Some(p) => (p.to_path_buf(), true),
            None => (
                std::env::var("WELLBEING_CONFIG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
                false,
            ),
        };

        let config = match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(e) if required => {
                return Err(AssessmentError::Config {
                    message: format!("cannot read {}: {}", config_path.display(), e),
                });
            }
            Err(_) => {
                tracing::warn!(
                    "Config file {} not found, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        };

        config.resolve(|key| std::env::var(key).ok(), cli)
    }

    /// Layer environment lookups and command-line values over a parsed file
    /// and validate the result.
    pub fn resolve<F>(mut self, env: F, cli: &CliOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply_overrides(|key| if cli.shadows(key) { None } else { env(key) })?;
        cli.apply(&mut self);
        self.validate()?;
        Ok(self)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `WELLBEING_*` overrides from `lookup` (the process environment in
    /// [`Config::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("WELLBEING_MODEL_PATH") {
            self.artifacts.model_path = PathBuf::from(model);
            tracing::debug!("WELLBEING_MODEL_PATH env override applied");
        }
        if let Some(encoder) = lookup("WELLBEING_ENCODER_PATH") {
            self.artifacts.encoder_path = PathBuf::from(encoder);
            tracing::debug!("WELLBEING_ENCODER_PATH env override applied");
        }
        if let Some(format) = lookup("WELLBEING_OUTPUT_FORMAT") {
            self.output.format = format.parse()?;
        }
        if let Some(banner) = lookup("WELLBEING_SHOW_BANNER") {
            self.output.show_banner = !(banner == "0" || banner.eq_ignore_ascii_case("false"));
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.artifacts.model_path.as_os_str().is_empty() {
            return Err(AssessmentError::Config {
                message: "artifacts.model_path must not be empty".to_string(),
            });
        }
        if self.artifacts.encoder_path.as_os_str().is_empty() {
            return Err(AssessmentError::Config {
                message: "artifacts.encoder_path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
