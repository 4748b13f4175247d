use std::path::PathBuf;

use shared::{AcquireError, ConfigError, SessionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
