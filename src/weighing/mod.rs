//! Per-measurement confidence weighting.
//!
//! A [`WeighingFunction`] maps a raw measurement to a non-negative weight.
//! It is attached to a [`World`](crate::World) as a [`SharedWeighing`]
//! handle; while one is set, every insertion goes through the weighted
//! backend hooks.
//!
//! The ingestion stage calls the function in the same pass that produces
//! the points, so weight `i` always belongs to point `i`.
//!
//! ## Provided functions
//!
//! | Function | Disparity `(u, v, d)` | Point `(x, y, z)` |
//! |----------|-----------------------|-------------------|
//! | [`ConstantWeighing`] | `w` | `w` |
//! | [`InverseSquareDepthWeighing`] | `(d / f·B)²` | `1 / z²` |

use std::sync::Arc;

use crate::core::{DisparityMessage, FieldPoint};

/// Maps a raw measurement to a confidence weight.
///
/// Implementations must be cheap and side-effect free; they are called once
/// per pixel or point. Negative or non-finite results are clamped to zero by
/// the ingestion stage.
pub trait WeighingFunction: Send + Sync {
    /// Weight for disparity `disparity` at pixel `(u, v)`.
    fn weight_from_disparity(&self, u: f32, v: f32, disparity: f32) -> f32;

    /// Weight for a 3D point in the sensor frame.
    fn weight_from_point(&self, point: &FieldPoint) -> f32;
}

/// Weighing function handle shared between whoever configured it and the
/// worlds it is attached to.
pub type SharedWeighing = Arc<dyn WeighingFunction>;

/// Clamp a raw weight into the valid range (finite, non-negative).
#[inline]
pub(crate) fn sanitize_weight(weight: f32) -> f32 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Same weight for every measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantWeighing {
    /// Weight returned for every measurement
    pub weight: f32,
}

impl ConstantWeighing {
    /// Create a constant weighing function
    pub fn new(weight: f32) -> Self {
        Self { weight }
    }
}

impl Default for ConstantWeighing {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

impl WeighingFunction for ConstantWeighing {
    fn weight_from_disparity(&self, _u: f32, _v: f32, _disparity: f32) -> f32 {
        self.weight
    }

    fn weight_from_point(&self, _point: &FieldPoint) -> f32 {
        self.weight
    }
}

/// Inverse squared depth: stereo depth noise grows with `z²`.
///
/// For disparities, depth is `f·B / d`. Both entry points agree for the
/// same physical point as long as `f` is the focal length at the
/// resolution of the disparity image. A weighing built for the full
/// resolution and fed a disparity downsampled by `s` returns `1/s²` of the
/// point weight; use [`InverseSquareDepthWeighing::for_message`] when the
/// message carries its own focal length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseSquareDepthWeighing {
    /// Focal length (pixels) times baseline (meters)
    pub focal_baseline: f32,
}

impl InverseSquareDepthWeighing {
    /// Create from stereo focal length (pixels) and baseline (meters).
    pub fn new(focal_length: f32, baseline: f32) -> Self {
        Self {
            focal_baseline: focal_length * baseline,
        }
    }

    /// Create from the stereo metadata published with a disparity image.
    pub fn for_message(message: &DisparityMessage) -> Self {
        Self::new(message.focal_length, message.baseline)
    }
}

impl WeighingFunction for InverseSquareDepthWeighing {
    fn weight_from_disparity(&self, _u: f32, _v: f32, disparity: f32) -> f32 {
        let ratio = disparity / self.focal_baseline;
        ratio * ratio
    }

    fn weight_from_point(&self, point: &FieldPoint) -> f32 {
        1.0 / (point.z * point.z)
    }
}
