//! tracing subscriber setup

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set, otherwise `default_level` from the config file.
/// an unparseable `RUST_LOG` falls back to `default_level` with a warning.
pub fn init(default_level: &str) -> Result<()> {
    let raw = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, rejected) = select_filter(raw.as_deref(), default_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    if let Some(reason) = rejected {
        tracing::warn!("Ignoring RUST_LOG: {}; using level {:?}", reason, default_level);
    }
    Ok(())
}

/// Pick the filter; the second value is why `RUST_LOG` was rejected, if it was.
fn select_filter(raw: Option<&str>, default_level: &str) -> Result<(EnvFilter, Option<String>)> {
    let fallback = || {
        EnvFilter::try_new(default_level)
            .map_err(|e| anyhow!("Invalid log level {:?}: {}", default_level, e))
    };

    match raw.map(str::trim) {
        None | Some("") => Ok((fallback()?, None)),
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => Ok((filter, None)),
            Err(e) => Ok((fallback()?, Some(format!("{:?} is not a valid filter ({})", directives, e)))),
        },
    }
}
