//! Configuration sections.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::geometry::CalibrationConfig;
use crate::ingest::DisparityConfig;

/// Disparity reprojection section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisparitySection {
    /// Disparities at or below this value carry no measurement (negative
    /// values act as 0)
    #[serde(default = "defaults::min_disparity")]
    pub min_disparity: f32,

    /// Smallest |W| accepted before the perspective divide
    #[serde(default = "defaults::homogeneous_epsilon")]
    pub homogeneous_epsilon: f64,

    /// Resolution ratios this close to 1.0 are treated as full resolution
    #[serde(default = "defaults::rescale_tolerance")]
    pub rescale_tolerance: f64,
}

impl Default for DisparitySection {
    fn default() -> Self {
        Self {
            min_disparity: defaults::min_disparity(),
            homogeneous_epsilon: defaults::homogeneous_epsilon(),
            rescale_tolerance: defaults::rescale_tolerance(),
        }
    }
}

impl DisparitySection {
    /// Convert to DisparityConfig
    pub fn to_disparity_config(&self) -> DisparityConfig {
        DisparityConfig {
            min_disparity: self.min_disparity,
            homogeneous_epsilon: self.homogeneous_epsilon,
            rescale_tolerance: self.rescale_tolerance,
        }
    }
}

/// Stereo calibration section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationSection {
    /// Shortest accepted stereo baseline (meters)
    #[serde(default = "defaults::min_baseline")]
    pub min_baseline: f64,

    /// Largest relative camera rotation (radians) accepted as rectified
    #[serde(default = "defaults::max_rectification_angle")]
    pub max_rectification_angle: f64,
}

impl Default for CalibrationSection {
    fn default() -> Self {
        Self {
            min_baseline: defaults::min_baseline(),
            max_rectification_angle: defaults::max_rectification_angle(),
        }
    }
}

impl CalibrationSection {
    /// Convert to CalibrationConfig
    pub fn to_calibration_config(&self) -> CalibrationConfig {
        CalibrationConfig {
            min_baseline: self.min_baseline,
            max_rectification_angle: self.max_rectification_angle,
        }
    }
}
