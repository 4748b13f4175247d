use serde::{Deserialize, Serialize};

use crate::codec::Dimensions;
use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";
pub const DEFAULT_MAX_WIDTH: u32 = 320;
pub const DEFAULT_MAX_HEIGHT: u32 = 240;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the classification endpoint.
    pub endpoint: String,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl ClientConfig {
    pub fn limits(&self) -> Dimensions {
        Dimensions::new(self.max_width, self.max_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::ZeroLimits {
                width: self.max_width,
                height: self.max_height,
            });
        }
        Ok(())
    }
}
