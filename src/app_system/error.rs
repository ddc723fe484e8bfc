use thiserror::Error;

use crate::config::ConfigError;

/// Failures surfaced while assembling or stopping the system.
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum SystemError {
    #[error("Actor task failed: {0}")]
    ActorJoin(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
