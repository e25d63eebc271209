//! Stereo calibration to reprojection matrix.
//!
//! Two entry points produce the same full-resolution Q:
//!
//! - [`q_for_cameras`]: intrinsic matrices + camera-to-camera transform +
//!   full image size
//! - [`q_for_camera_infos`]: a pair of [`CameraInfo`] records that already
//!   carry projection matrices and image size
//!
//! Downsampled disparity maps are handled at ingestion time by
//! [`rescale_q`](super::rescale_q); Q is always computed for the full
//! resolution here.

use log::debug;
use nalgebra::{Matrix3, Matrix3x4, Vector2};
use serde::{Deserialize, Serialize};

use super::reprojection::{ReprojectionMatrix, generate_q};
use crate::core::{ImageSize, Transformation};
use crate::error::CalibrationError;

/// Calibration validation thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Baselines shorter than this (meters) are treated as degenerate
    pub min_baseline: f64,

    /// Largest relative camera rotation (radians) accepted as rectified
    pub max_rectification_angle: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_baseline: 1e-6,
            max_rectification_angle: 1e-3,
        }
    }
}

/// Calibration record for one camera of a stereo pair.
///
/// Follows the ROS `CameraInfo` convention: `k` holds the intrinsics and
/// `p` the rectified projection matrix, whose `P(0,3)` entry encodes
/// `-fx' * baseline` for the right camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Intrinsic camera matrix
    pub k: Matrix3<f64>,
    /// Projection matrix of the rectified camera
    pub p: Matrix3x4<f64>,
}

impl CameraInfo {
    /// Build a rectified camera record.
    ///
    /// `tx` is the `P(0,3)` translation term (`-fx * baseline` for a right
    /// camera, `0` for the left one).
    pub fn rectified(width: u32, height: u32, fx: f64, fy: f64, cx: f64, cy: f64, tx: f64) -> Self {
        let k = Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0);
        let p = Matrix3x4::new(fx, 0.0, cx, tx, 0.0, fy, cy, 0.0, 0.0, 0.0, 1.0, 0.0);
        Self {
            width,
            height,
            k,
            p,
        }
    }

    /// Image size
    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Intrinsics of the rectified camera (left 3×3 block of `p`)
    pub fn rectified_intrinsics(&self) -> Matrix3<f64> {
        self.p.fixed_view::<3, 3>(0, 0).into_owned()
    }
}

/// Compute Q for a stereo pair.
///
/// # Arguments
/// * `t_c1_c0` - Transform from the left camera (C0) into the right camera (C1)
/// * `left_cam_matrix` - Left intrinsic matrix
/// * `right_cam_matrix` - Right intrinsic matrix
/// * `full_image_size` - Full (uncropped) image size in pixels
/// * `config` - Validation thresholds
///
/// The cameras must be rectified: the relative rotation may not exceed
/// `config.max_rectification_angle`, and the rows of both cameras must line
/// up (same `fy` and `cy`). The horizontal focal lengths and principal
/// points may differ; [`generate_q`] accounts for both. The baseline length is the norm of the translation, signed by its X
/// component so a right camera at `+B` yields `Tx = -B`.
///
/// # Errors
/// - [`CalibrationError::DegenerateBaseline`] if the baseline is shorter
///   than `config.min_baseline`
/// - [`CalibrationError::InvalidIntrinsics`] for non-positive or non-finite
///   focal lengths or principal points
/// - [`CalibrationError::InvalidImageSize`] for a non-positive image size
/// - [`CalibrationError::NotRectified`] if the relative rotation is too large
/// - [`CalibrationError::MisalignedRows`] if `fy` or `cy` differ between the
///   cameras
pub fn q_for_cameras(
    t_c1_c0: &Transformation,
    left_cam_matrix: &Matrix3<f64>,
    right_cam_matrix: &Matrix3<f64>,
    full_image_size: &Vector2<f64>,
    config: &CalibrationConfig,
) -> Result<ReprojectionMatrix, CalibrationError> {
    let (width, height) = (full_image_size.x, full_image_size.y);
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(CalibrationError::InvalidImageSize { width, height });
    }

    validate_intrinsics("left", left_cam_matrix)?;
    validate_intrinsics("right", right_cam_matrix)?;

    let translation = t_c1_c0.translation.vector;
    let baseline = translation.norm();
    if !baseline.is_finite() || baseline < config.min_baseline {
        return Err(CalibrationError::DegenerateBaseline { baseline });
    }

    let angle = t_c1_c0.rotation.angle();
    if angle > config.max_rectification_angle {
        return Err(CalibrationError::NotRectified {
            angle,
            max_angle: config.max_rectification_angle,
        });
    }

    let tx = if translation.x > 0.0 {
        baseline
    } else {
        -baseline
    };

    let q = generate_q(
        tx,
        left_cam_matrix[(0, 2)],
        left_cam_matrix[(1, 2)],
        left_cam_matrix[(0, 0)],
        left_cam_matrix[(1, 1)],
        right_cam_matrix[(0, 2)],
        right_cam_matrix[(1, 2)],
        right_cam_matrix[(0, 0)],
        right_cam_matrix[(1, 1)],
    )?;

    debug!(
        "Computed Q for baseline {:.4} m ({} x {} px)",
        baseline, width, height
    );
    Ok(q)
}

/// Compute Q from two camera records.
///
/// The baseline is recovered from the right projection matrix
/// (`Tx = P(0,3) / P(0,0)`), the rectified intrinsics from the left 3×3
/// block of each `P`, and the call is forwarded to [`q_for_cameras`].
///
/// # Errors
/// [`CalibrationError::MismatchedImageSize`] if the records disagree on
/// size, plus everything [`q_for_cameras`] reports.
pub fn q_for_camera_infos(
    left_camera: &CameraInfo,
    right_camera: &CameraInfo,
    config: &CalibrationConfig,
) -> Result<ReprojectionMatrix, CalibrationError> {
    if left_camera.size() != right_camera.size() {
        return Err(CalibrationError::MismatchedImageSize {
            left: (left_camera.width, left_camera.height),
            right: (right_camera.width, right_camera.height),
        });
    }

    let right_fx = right_camera.p[(0, 0)];
    if !right_fx.is_finite() || right_fx <= 0.0 {
        return Err(CalibrationError::InvalidIntrinsics(format!(
            "right projection fx = {}",
            right_fx
        )));
    }
    let tx = right_camera.p[(0, 3)] / right_fx;

    let t_c1_c0 = Transformation::translation(tx, 0.0, 0.0);

    q_for_cameras(
        &t_c1_c0,
        &left_camera.rectified_intrinsics(),
        &right_camera.rectified_intrinsics(),
        &left_camera.size().as_vector(),
        config,
    )
}

fn validate_intrinsics(which: &str, k: &Matrix3<f64>) -> Result<(), CalibrationError> {
    let (fx, fy, cx, cy) = (k[(0, 0)], k[(1, 1)], k[(0, 2)], k[(1, 2)]);

    if !(fx.is_finite() && fy.is_finite()) || fx <= 0.0 || fy <= 0.0 {
        return Err(CalibrationError::InvalidIntrinsics(format!(
            "{} focal lengths fx = {}, fy = {}",
            which, fx, fy
        )));
    }
    if !(cx.is_finite() && cy.is_finite()) {
        return Err(CalibrationError::InvalidIntrinsics(format!(
            "{} principal point ({}, {})",
            which, cx, cy
        )));
    }
    Ok(())
}
