//! Configuration loading for Akasha.
//!
//! Loads all configuration from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use akasha_map::config::AkashaConfig;
//!
//! // Load from default path (configs/akasha.yaml), or defaults if absent
//! let config = AkashaConfig::load_default()?;
//!
//! // Hand it to a world
//! let world = World::with_config(EmptyWorld, config);
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`DisparitySection`] | Validity thresholds for disparity reprojection |
//! | [`CalibrationSection`] | Baseline and rectification checks for Q |
//!
//! ## Example YAML
//!
//! ```yaml
//! disparity:
//!   min_disparity: 0.0          # d <= this is "no match"
//!   homogeneous_epsilon: 1.0e-9 # |W| <= this is a point at infinity
//!   rescale_tolerance: 1.0e-6
//!
//! calibration:
//!   min_baseline: 1.0e-6        # meters
//!   max_rectification_angle: 0.001
//! ```

mod akasha;
mod defaults;
mod error;
mod sections;

pub use akasha::{AkashaConfig, DEFAULT_CONFIG_PATH};
pub use error::ConfigLoadError;
pub use sections::{CalibrationSection, DisparitySection};
