use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{DuplicatePolicy, MatchParams, UnknownGenderPolicy, DEFAULT_MAX_ITERATIONS, DEFAULT_THRESHOLD};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub seed: Option<u64>,
    #[serde(default)]
    pub unknown_gender: UnknownGenderPolicy,
    #[serde(default)]
    pub duplicate_names: DuplicatePolicy,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            threshold: default_threshold(),
            seed: None,
            unknown_gender: UnknownGenderPolicy::default(),
            duplicate_names: DuplicatePolicy::default(),
        }
    }
}

impl MatchingSettings {
    pub fn params(&self) -> MatchParams {
        MatchParams {
            max_iterations: self.max_iterations,
            threshold: self.threshold,
            seed: self.seed,
            unknown_gender: self.unknown_gender,
            duplicate_names: self.duplicate_names,
        }
    }
}

fn default_max_iterations() -> usize { DEFAULT_MAX_ITERATIONS }
fn default_threshold() -> f64 { DEFAULT_THRESHOLD }

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "warn".to_string() }
fn default_log_format() -> String { "compact".to_string() }

const ENV_PREFIX: &str = "MATCHMAKER";

fn environment() -> Environment {
    // e.g., MATCHMAKER__MATCHING__THRESHOLD -> matching.threshold
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCHMAKER__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}
