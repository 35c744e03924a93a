//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `relay.toml`.
//!     loads configuration from file or falls back to defaults, then lets the
//!     `PORT` environment variable override the listening port.
//!
//! structure:
//!     - ServerConfig: bind host, port, and the static asset directory.
//!     - LoggingConfig: default log level and whether payloads are logged.
//!
//! ==============================================================================

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// port used when neither the config file nor `PORT` provides one
pub const DEFAULT_PORT: u16 = 3000;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_sensor_data: true,
        }
    }
}

impl RelayConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("Failed to parse config: {}", e))
    }

    /// Load with default fallback
    pub fn load_or_default() -> Self {
        let paths = [
            PathBuf::from("config").join("relay.toml"),
            PathBuf::from("..").join("config").join("relay.toml"),
        ];

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    /// Apply the `PORT` environment variable on top of the loaded file
    pub fn apply_env(&mut self) -> Result<()> {
        let raw = std::env::var("PORT").ok();
        self.server.port = port_override(raw.as_deref(), self.server.port)?;
        Ok(())
    }

    /// Socket address the listener binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.server.host, self.server.port))
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("┌─────────────────────────────────────────┐");
        println!("│          RELAY CONFIGURATION            │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Host: {}                           │", self.server.host);
        println!("│ Port: {}                              │", self.server.port);
        println!("│ Static Dir: {}                    │", self.server.static_dir.display());
        println!("│ Log Level: {}                        │", self.logging.level);
        println!("├─────────────────────────────────────────┤");
    }
}

/// Resolve the port from a raw `PORT` value.
///
/// unset or blank keeps `fallback`, anything else must be a valid port number.
fn port_override(raw: Option<&str>, fallback: u16) -> Result<u16> {
    match raw.map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(value) => value
            .parse::<u16>()
            .with_context(|| format!("PORT must be a number between 0 and 65535, got {:?}", value)),
    }
}
