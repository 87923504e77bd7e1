//! Checker Configuration Module
//!
//! Loads the checker settings from a TOML file with environment overrides.
//! Every section has defaults, so an empty file (or no file) is valid.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable prefix, e.g. `TTC_VALIDATION__SIGNATURE_COUNTER=false`
pub const ENV_PREFIX: &str = "TTC";

/// Settings key read as a list from the environment
const IGNORED_ISSUES_KEY: &str = "validation.ignored_issues";

/// Main checker configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CheckerConfig {
    /// Log output settings
    pub logging: LoggingSettings,

    /// Record parser limits
    pub parser: ParserSettings,

    /// Which validators run and which findings are reported
    pub validation: ValidationSettings,
}

/// Log output settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Record parser limits
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ParserSettings {
    /// Largest accepted encoded log message in bytes
    pub max_message_size: usize,
    /// Upper bound on certified-data elements collected for one record
    pub max_certified_data_elements: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            max_message_size: 1024 * 1024, // 1 MiB, far above any real record
            max_certified_data_elements: 64,
        }
    }
}

/// Validator selection
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ValidationSettings {
    /// Run the transaction counter / open-close consistency validator
    pub transaction_counter: bool,
    /// Run the per-serial signature counter continuity validator
    pub signature_counter: bool,
    /// Issue kinds dropped from results before reporting
    pub ignored_issues: Vec<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            transaction_counter: true,
            signature_counter: true,
            ignored_issues: Vec::new(),
        }
    }
}

impl CheckerConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading checker config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        } else {
            debug!("No config file given, using defaults");
        }

        // Override with environment variables (TTC_ prefix); lists are comma separated
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key(IGNORED_ISSUES_KEY),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

/// Convenience function to load configuration
pub fn load_config(path: Option<&Path>) -> Result<CheckerConfig> {
    CheckerConfig::load(path)
}
