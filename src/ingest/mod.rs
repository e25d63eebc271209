//! Sensor ingestion: raw observations to canonical point fields.
//!
//! Both modalities go through one routine each, parameterized by an
//! optional weighing function:
//!
//! ```text
//! DisparityImage + Q ──► project_disparity ──┐
//!                                            ├──► Ingested { points, weights?, invalid }
//! PointCloudMessage ──► convert_pointcloud ──┘
//! ```
//!
//! Ingestion is pure: inputs are borrowed, the output is freshly allocated,
//! and validation errors are reported before any output exists.

pub mod disparity;
pub mod pointcloud;

pub use disparity::{DisparityConfig, project_disparity};
pub use pointcloud::convert_pointcloud;

use crate::core::{PointField, WeightField};

/// Output of one ingestion call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ingested {
    /// Sensor-frame points
    pub points: PointField,

    /// Per-point weights, present only when a weighing function was supplied
    pub weights: Option<WeightField>,

    /// Measurements without a valid point.
    ///
    /// For disparity images these remain in `points` as NaN entries; for
    /// point clouds they were dropped.
    pub invalid: usize,
}

impl Ingested {
    /// Number of valid points
    pub fn valid_count(&self) -> usize {
        self.points.valid_count()
    }

    /// Was this produced with a weighing function?
    #[inline]
    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }
}
