//! Disparity-to-depth reprojection matrix (Q).
//!
//! Q maps homogeneous pixel coordinates `(u, v, d, 1)` to homogeneous 3D
//! coordinates `(X, Y, Z, W)` in the left rectified camera frame. With
//! `r = fx'/fx` (right over left horizontal focal length) and
//! `k = 1 - r`:
//!
//! ```text
//! ┌   ┐   ┌                                                   ┐ ┌   ┐
//! │ X │   │ r·fy·Tx   0        0      -r·fy·cx·Tx             │ │ u │
//! │ Y │ = │ 0         fx'·Tx   0      -fx'·cy·Tx              │ │ v │
//! │ Z │   │ 0         0        0       fx'·fy·Tx              │ │ d │
//! │ W │   │ k·fy      0       -fy      fy·((cx - cx') - k·cx) │ │ 1 │
//! └   ┘   └                                                   ┘ └   ┘
//!
//! point = (X/W, Y/W, Z/W)   →   Z = fx'·B / (d - (cx - cx') - k·(u - cx))
//! ```
//!
//! where `Tx = -B` is the x-translation of the right camera expressed in the
//! left camera frame (negative for a right camera sitting at +X). When both
//! cameras share `fx` the `k` terms vanish and this is the classic OpenCV Q
//! scaled by `f·Tx`. A differing right `fx'` makes disparity depend on the
//! column, which the `k·fy` entry in the W row accounts for.
//!
//! Rectified rows must line up: the right camera's `fy` and `cy` have to
//! match the left one's, otherwise no Q exists.

use nalgebra::{Matrix4, Vector2, Vector4};

use crate::error::CalibrationError;

/// 4×4 disparity-to-depth reprojection matrix.
pub type ReprojectionMatrix = Matrix4<f64>;

/// Largest difference (pixels) between left and right `fy`/`cy` still
/// considered row-aligned.
pub const ROW_ALIGNMENT_TOLERANCE: f64 = 1e-6;

/// Build Q from rectified stereo parameters.
///
/// # Arguments
/// * `tx` - Right camera x-translation in the left frame (`-baseline`)
/// * `left_cx`, `left_cy`, `left_fx`, `left_fy` - Left rectified intrinsics
/// * `right_cx`, `right_cy`, `right_fx`, `right_fy` - Right rectified intrinsics
///
/// # Errors
/// - [`CalibrationError::InvalidIntrinsics`] for non-positive or
///   non-finite focal lengths
/// - [`CalibrationError::MisalignedRows`] when the right `fy` or `cy`
///   differs from the left by more than [`ROW_ALIGNMENT_TOLERANCE`]
#[allow(clippy::too_many_arguments)]
pub fn generate_q(
    tx: f64,
    left_cx: f64,
    left_cy: f64,
    left_fx: f64,
    left_fy: f64,
    right_cx: f64,
    right_cy: f64,
    right_fx: f64,
    right_fy: f64,
) -> Result<ReprojectionMatrix, CalibrationError> {
    for f in [left_fx, left_fy, right_fx, right_fy] {
        if !f.is_finite() || f <= 0.0 {
            return Err(CalibrationError::InvalidIntrinsics(format!(
                "focal length {}",
                f
            )));
        }
    }

    let row_tolerance = ROW_ALIGNMENT_TOLERANCE * left_fy.max(1.0);
    if (right_fy - left_fy).abs() > row_tolerance
        || (right_cy - left_cy).abs() > ROW_ALIGNMENT_TOLERANCE
    {
        return Err(CalibrationError::MisalignedRows {
            left_fy,
            left_cy,
            right_fy,
            right_cy,
        });
    }

    let ratio = right_fx / left_fx;
    let k = 1.0 - ratio;
    let mut q = Matrix4::zeros();

    q[(0, 0)] = ratio * left_fy * tx;
    q[(0, 3)] = -ratio * left_fy * left_cx * tx;
    q[(1, 1)] = right_fx * tx;
    q[(1, 3)] = -right_fx * left_cy * tx;
    q[(2, 3)] = right_fx * left_fy * tx;
    q[(3, 0)] = k * left_fy;
    q[(3, 2)] = -left_fy;
    q[(3, 3)] = left_fy * ((left_cx - right_cx) - k * left_cx);

    Ok(q)
}

/// Adapt a full-resolution Q to a disparity map of `width` x `height`.
///
/// Downsampling by `s` divides focal lengths, principal points and
/// disparities by `s`. In Q this amounts to dividing the four
/// intrinsic-derived entries of the last column by the horizontal factor
/// `sx`. When the vertical factor `sy` differs, `Q(1,1)` is corrected by
/// `sy / sx`.
///
/// Returns `q_full` unchanged when both factors are within `tolerance` of 1.
pub fn rescale_q(
    q_full: &ReprojectionMatrix,
    full_image_size: &Vector2<f64>,
    width: usize,
    height: usize,
    tolerance: f64,
) -> ReprojectionMatrix {
    let sx = full_image_size.x / width as f64;
    let sy = full_image_size.y / height as f64;

    if (sx - 1.0).abs() <= tolerance && (sy - 1.0).abs() <= tolerance {
        return *q_full;
    }

    let mut q = *q_full;
    q[(0, 3)] /= sx;
    q[(1, 3)] /= sx;
    q[(2, 3)] /= sx;
    q[(3, 3)] /= sx;
    if (sx - sy).abs() > tolerance {
        q[(1, 1)] *= sy / sx;
    }
    q
}

/// Reproject one pixel through Q.
///
/// Returns `None` when `|W| <= epsilon` or the result is not finite; such
/// pixels would otherwise land at (or near) infinity.
#[inline]
pub fn reproject_pixel(
    q: &ReprojectionMatrix,
    u: f64,
    v: f64,
    disparity: f64,
    epsilon: f64,
) -> Option<[f64; 3]> {
    let h = q * Vector4::new(u, v, disparity, 1.0);
    let w = h.w;
    if !w.is_finite() || w.abs() <= epsilon {
        return None;
    }
    let p = [h.x / w, h.y / w, h.z / w];
    p.iter().all(|c| c.is_finite()).then_some(p)
}
