use std::path::{Path, PathBuf};

use serde::Deserialize;
use shared::ClientConfig;

use crate::error::CliError;

/// Contents of the optional `--config` YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub client: ClientConfig,
    pub output_dir: Option<PathBuf>,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub no_export: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub client: ClientConfig,
    pub output_dir: PathBuf,
    pub export: bool,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Settings {
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self, CliError> {
        let file = match config_path {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                FileConfig::read(path)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(file, overrides)
    }

    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, CliError> {
        let mut client = file.client;
        if let Some(endpoint) = overrides.endpoint {
            client.endpoint = endpoint;
        }
        if let Some(width) = overrides.max_width {
            client.max_width = width;
        }
        if let Some(height) = overrides.max_height {
            client.max_height = height;
        }
        client.validate()?;

        let output_dir = overrides
            .output_dir
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            client,
            output_dir,
            export: !overrides.no_export,
        })
    }
}
