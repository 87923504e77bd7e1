//! # TTC Configuration
//!
//! Settings shared by the parser and the validators, loaded from a TOML file
//! with `TTC_`-prefixed environment overrides, plus the logging setup used by
//! whatever binary embeds the checker.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ttc_config::{init_logging, load_config};
//!
//! let config = load_config(Some(std::path::Path::new("config/ttc.toml")))?;
//! init_logging(&config.logging)?;
//! assert!(config.validation.transaction_counter);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod settings;

pub use logging::init_logging;
pub use settings::{
    load_config, CheckerConfig, LoggingSettings, ParserSettings, ValidationSettings,
};
