//! Configuration System
//!
//! Layered configuration: built-in defaults, then a TOML file (the user config file or
//! an explicit `--config` path), then `SYNTHGEN__*` environment variables.
//! CLI flags are applied on top by the caller.

use crate::backend::BackendConfig;
use crate::error::{ApiError, ValidationError};
use crate::logging::LoggingConfig;
use crate::orchestrator::{RetryPolicy, RunRequest};
use crate::types::{GenerationOptions, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Text generation backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Run defaults
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to every generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-task backend timeout in seconds; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retries for transient backend failures (0 = never retry)
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_concurrency() -> usize {
    RunRequest::DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    RunRequest::DEFAULT_TIMEOUT.as_secs()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.9
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            output_dir: default_output_dir(),
            output_format: OutputFormat::default(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }

    /// Run request for `count` records using these defaults
    pub fn run_request(&self, count: usize) -> RunRequest {
        RunRequest::new(count, self.output_dir.clone())
            .with_format(self.output_format.clone())
            .with_concurrency(self.concurrency)
            .with_timeout(self.timeout())
            .with_retry(self.retry_policy())
    }
}

impl SynthConfig {
    /// Validate the entire configuration, reporting every problem found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.generation.concurrency == 0 {
            errors.push(ValidationError::new(
                "generation.concurrency",
                "must be at least 1",
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            errors.push(ValidationError::new(
                "generation.temperature",
                format!("{} is outside 0.0-2.0", self.generation.temperature),
            ));
        }
        if self.generation.max_tokens == 0 {
            errors.push(ValidationError::new(
                "generation.max_tokens",
                "must be at least 1",
            ));
        }
        if let Some(model) = self.backend.model() {
            if model.trim().is_empty() {
                errors.push(ValidationError::new("backend.model", "must not be empty"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads [`SynthConfig`] from files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    pub const ENV_PREFIX: &'static str = "SYNTHGEN";

    /// Default user config file: `$XDG_CONFIG_HOME/synthgen/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "synthgen")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load using the default config file if it exists
    pub fn load() -> Result<SynthConfig, ApiError> {
        Self::build(Self::default_config_path(), false)
    }

    /// Load from an explicit file, which must exist
    pub fn load_from_file(path: &Path) -> Result<SynthConfig, ApiError> {
        Self::build(Some(path.to_path_buf()), true)
    }

    fn build(path: Option<PathBuf>, required: bool) -> Result<SynthConfig, ApiError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(required));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(Self::ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: SynthConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
