//! Main AkashaConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigLoadError;
use super::sections::{CalibrationSection, DisparitySection};
use crate::geometry::CalibrationConfig;
use crate::ingest::DisparityConfig;

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "configs/akasha.yaml";

/// Full pipeline configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AkashaConfig {
    /// Disparity reprojection settings
    #[serde(default)]
    pub disparity: DisparitySection,

    /// Stereo calibration settings
    #[serde(default)]
    pub calibration: CalibrationSection,
}

impl AkashaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from the default config path, falling back to built-in defaults
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Get the disparity reprojection config
    pub fn disparity_config(&self) -> DisparityConfig {
        self.disparity.to_disparity_config()
    }

    /// Get the calibration config
    pub fn calibration_config(&self) -> CalibrationConfig {
        self.calibration.to_calibration_config()
    }
}
