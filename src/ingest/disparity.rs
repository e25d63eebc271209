//! Disparity image to sensor-frame point field.
//!
//! Each pixel `(u, v)` with disparity `d` is pushed through Q and
//! perspective-divided:
//!
//! ```text
//! [X Y Z W]ᵀ = Q · [u v d 1]ᵀ        point = (X/W, Y/W, Z/W)
//! ```
//!
//! The output keeps the image layout. Pixels without a usable measurement
//! stay as NaN entries:
//! - `d <= max(min_disparity, 0)` or `d` not finite (no stereo match)
//! - `|W| <= homogeneous_epsilon` (point at infinity)
//!
//! When a weighing function is supplied, weights are computed in the same
//! traversal; invalid pixels get weight `0.0`.

use log::trace;
use nalgebra::{Point3, Vector2};
use serde::{Deserialize, Serialize};

use super::Ingested;
use crate::core::{DisparityImage, PointField, WeightField};
use crate::error::IngestError;
use crate::geometry::{ReprojectionMatrix, reproject_pixel, rescale_q};
use crate::weighing::{WeighingFunction, sanitize_weight};

/// Disparity reprojection parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisparityConfig {
    /// Disparities at or below this value are treated as "no match".
    /// Negative values are clamped to 0: non-positive disparity never
    /// reprojects.
    pub min_disparity: f32,

    /// Pixels whose homogeneous W is at most this (in magnitude) are invalid
    pub homogeneous_epsilon: f64,

    /// Resolution ratios within this of 1.0 skip Q rescaling
    pub rescale_tolerance: f64,
}

impl Default for DisparityConfig {
    fn default() -> Self {
        Self {
            min_disparity: 0.0,
            homogeneous_epsilon: 1e-9,
            rescale_tolerance: 1e-6,
        }
    }
}

/// Project a disparity image into a sensor-frame point field.
///
/// # Arguments
/// * `disparity` - Disparity image, possibly downsampled
/// * `q_full` - Q computed for the full calibration resolution
/// * `full_image_size` - Full resolution `(width, height)` Q was built for
/// * `weighing` - Optional weighing function; produces a weight field
/// * `config` - Validity thresholds
///
/// # Errors
/// Rejects empty images, non-positive full sizes, non-finite Q entries and
/// disparity maps larger than the full resolution. Nothing is produced on
/// error.
pub fn project_disparity(
    disparity: &DisparityImage,
    q_full: &ReprojectionMatrix,
    full_image_size: &Vector2<f64>,
    weighing: Option<&dyn WeighingFunction>,
    config: &DisparityConfig,
) -> Result<Ingested, IngestError> {
    let (width, height) = (disparity.width(), disparity.height());
    validate(disparity, q_full, full_image_size, config)?;

    let q = rescale_q(
        q_full,
        full_image_size,
        width,
        height,
        config.rescale_tolerance,
    );

    let mut points = PointField::new_invalid(width, height);
    let mut weights = weighing.map(|_| WeightField::zeros(width, height));
    let mut invalid = 0usize;
    let min_disparity = config.min_disparity.max(0.0);

    for (i, (u, v, d)) in disparity.iter().enumerate() {
        if !d.is_finite() || d <= min_disparity {
            invalid += 1;
            continue;
        }

        let Some(p) = reproject_pixel(
            &q,
            u as f64,
            v as f64,
            d as f64,
            config.homogeneous_epsilon,
        ) else {
            invalid += 1;
            continue;
        };

        points.set(i, Point3::new(p[0] as f32, p[1] as f32, p[2] as f32));

        if let (Some(function), Some(field)) = (weighing, weights.as_mut()) {
            let w = function.weight_from_disparity(u as f32, v as f32, d);
            field.set(i, sanitize_weight(w));
        }
    }

    trace!(
        "Projected {}x{} disparity image: {} valid, {} invalid",
        width,
        height,
        disparity.len() - invalid,
        invalid
    );

    Ok(Ingested {
        points,
        weights,
        invalid,
    })
}

fn validate(
    disparity: &DisparityImage,
    q_full: &ReprojectionMatrix,
    full_image_size: &Vector2<f64>,
    config: &DisparityConfig,
) -> Result<(), IngestError> {
    let (width, height) = (disparity.width(), disparity.height());
    if disparity.is_empty() || width == 0 || height == 0 {
        return Err(IngestError::EmptyImage);
    }

    let (full_width, full_height) = (full_image_size.x, full_image_size.y);
    if !(full_width.is_finite() && full_height.is_finite())
        || full_width <= 0.0
        || full_height <= 0.0
    {
        return Err(IngestError::InvalidFullImageSize {
            width: full_width,
            height: full_height,
        });
    }

    if q_full.iter().any(|v| !v.is_finite()) {
        return Err(IngestError::InvalidReprojection);
    }

    // Disparity maps are produced at or below the calibration resolution.
    let sx = full_width / width as f64;
    let sy = full_height / height as f64;
    if sx < 1.0 - config.rescale_tolerance || sy < 1.0 - config.rescale_tolerance {
        return Err(IngestError::ResolutionMismatch {
            width,
            height,
            full_width,
            full_height,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::is_valid_point;
    use crate::geometry::generate_q;
    use crate::weighing::ConstantWeighing;
    use approx::assert_relative_eq;

    fn q_640() -> ReprojectionMatrix {
        generate_q(-0.1, 320.0, 240.0, 500.0, 500.0, 320.0, 240.0, 500.0, 500.0).unwrap()
    }

    fn full() -> Vector2<f64> {
        Vector2::new(640.0, 480.0)
    }

    #[test]
    fn test_principal_point_pixel() {
        let mut image = DisparityImage::filled(640, 480, 0.0).unwrap();
        image.set(320, 240, 10.0);

        let out = project_disparity(&image, &q_640(), &full(), None, &DisparityConfig::default())
            .unwrap();

        assert_eq!(out.points.width(), 640);
        assert_eq!(out.points.height(), 480);
        assert_eq!(out.points.valid_count(), 1);
        assert_eq!(out.invalid, 640 * 480 - 1);
        assert!(out.weights.is_none());

        let p = out.points.get(320, 240).unwrap();
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_positive_disparity_is_invalid() {
        let image = DisparityImage::new(4, 1, vec![0.0, -3.0, f32::NAN, 8.0]).unwrap();
        let full = Vector2::new(4.0, 1.0);
        let q = generate_q(-0.1, 2.0, 0.0, 500.0, 500.0, 2.0, 0.0, 500.0, 500.0).unwrap();

        let out = project_disparity(&image, &q, &full, None, &DisparityConfig::default()).unwrap();

        assert!(!is_valid_point(out.points.get(0, 0).unwrap()));
        assert!(!is_valid_point(out.points.get(1, 0).unwrap()));
        assert!(!is_valid_point(out.points.get(2, 0).unwrap()));
        assert!(is_valid_point(out.points.get(3, 0).unwrap()));
        assert_eq!(out.invalid, 3);
    }

    #[test]
    fn test_min_disparity_threshold() {
        let image = DisparityImage::new(2, 1, vec![1.5, 2.5]).unwrap();
        let config = DisparityConfig {
            min_disparity: 2.0,
            ..Default::default()
        };
        let out = project_disparity(
            &image,
            &generate_q(-0.1, 1.0, 0.0, 500.0, 500.0, 1.0, 0.0, 500.0, 500.0).unwrap(),
            &Vector2::new(2.0, 1.0),
            None,
            &config,
        )
        .unwrap();
        assert_eq!(out.points.valid_count(), 1);
        assert!(is_valid_point(out.points.get(1, 0).unwrap()));
    }

    #[test]
    fn test_negative_min_disparity_keeps_non_positive_invalid() {
        let image = DisparityImage::new(3, 1, vec![-2.0, 0.0, 4.0]).unwrap();
        let config = DisparityConfig {
            min_disparity: -5.0,
            ..Default::default()
        };
        let out = project_disparity(
            &image,
            &generate_q(-0.1, 0.0, 0.0, 500.0, 500.0, 0.0, 0.0, 500.0, 500.0).unwrap(),
            &Vector2::new(3.0, 1.0),
            None,
            &config,
        )
        .unwrap();

        assert!(!is_valid_point(out.points.get(0, 0).unwrap()));
        assert!(!is_valid_point(out.points.get(1, 0).unwrap()));
        assert_eq!(out.invalid, 2);
        assert_relative_eq!(out.points.get(2, 0).unwrap().z, 12.5, epsilon = 1e-5);
    }

    #[test]
    fn test_weights_share_layout() {
        let image = DisparityImage::new(3, 2, vec![0.0, 5.0, 10.0, 20.0, -1.0, 40.0]).unwrap();
        let weighing = ConstantWeighing::new(2.0);
        let out = project_disparity(
            &image,
            &generate_q(-0.1, 1.5, 1.0, 500.0, 500.0, 1.5, 1.0, 500.0, 500.0).unwrap(),
            &Vector2::new(3.0, 2.0),
            Some(&weighing),
            &DisparityConfig::default(),
        )
        .unwrap();

        let weights = out.weights.unwrap();
        assert!(weights.is_aligned_with(&out.points));
        for (i, p) in out.points.points().iter().enumerate() {
            let expected = if is_valid_point(p) { 2.0 } else { 0.0 };
            assert_eq!(weights.weights()[i], expected);
        }
    }

    #[test]
    fn test_downsampled_image_uses_rescaled_q() {
        let mut image = DisparityImage::filled(320, 240, 0.0).unwrap();
        // Full-resolution pixel (400, 300) with d = 16 is (200, 150) with d = 8.
        image.set(200, 150, 8.0);

        let out = project_disparity(&image, &q_640(), &full(), None, &DisparityConfig::default())
            .unwrap();
        let p = out.points.get(200, 150).unwrap();
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.375, epsilon = 1e-5);
        assert_relative_eq!(p.z, 3.125, epsilon = 1e-5);
    }

    #[test]
    fn test_validation_errors() {
        let image = DisparityImage::filled(640, 480, 1.0).unwrap();
        let config = DisparityConfig::default();

        assert!(matches!(
            project_disparity(&image, &q_640(), &Vector2::new(0.0, 480.0), None, &config),
            Err(IngestError::InvalidFullImageSize { .. })
        ));
        assert!(matches!(
            project_disparity(&image, &q_640(), &Vector2::new(320.0, 240.0), None, &config),
            Err(IngestError::ResolutionMismatch { .. })
        ));

        let mut bad_q = q_640();
        bad_q[(2, 3)] = f64::INFINITY;
        assert!(matches!(
            project_disparity(&image, &bad_q, &full(), None, &config),
            Err(IngestError::InvalidReprojection)
        ));
    }
}
