use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Tunables for the whole system. Every field has a default, so a partial
/// (or absent) config file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Mailbox depth for every actor channel.
    pub channel_capacity: usize,
    /// Simulated payment gateway round-trip, in milliseconds.
    pub payment_latency_ms: u64,
    /// How long a paid order stays redeemable.
    pub pickup_window_minutes: i64,
    /// Characters in a pickup code.
    pub pickup_code_length: usize,
    /// Where the session store keeps its files.
    pub session_dir: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            payment_latency_ms: 150,
            pickup_window_minutes: 30,
            pickup_code_length: 6,
            session_dir: PathBuf::from("./session"),
        }
    }
}

impl SystemConfig {
    /// Loads config from a JSON file. A missing file is not an error; it
    /// means defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
