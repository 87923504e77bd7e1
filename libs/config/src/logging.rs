//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::LoggingSettings;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless:
/// the second install attempt is ignored.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level directive: {}", settings.level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if settings.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    if installed.is_err() {
        debug!("Tracing subscriber already installed, keeping the existing one");
    }

    Ok(())
}
