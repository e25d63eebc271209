//! Error types for calibration and ingestion.
//!
//! Both error families are raised before any backend is touched: a failed
//! insertion leaves the map exactly as it was.

use thiserror::Error;

/// Degenerate or inconsistent stereo calibration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("Degenerate stereo baseline: {baseline} m")]
    DegenerateBaseline { baseline: f64 },

    #[error("Invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),

    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },

    #[error("Left and right cameras disagree on image size: {left:?} vs {right:?}")]
    MismatchedImageSize { left: (u32, u32), right: (u32, u32) },

    #[error("Stereo pair is not rectified: relative rotation {angle} rad exceeds {max_angle} rad")]
    NotRectified { angle: f64, max_angle: f64 },

    #[error(
        "Rectified rows do not line up: left fy = {left_fy}, cy = {left_cy}; right fy = {right_fy}, cy = {right_cy}"
    )]
    MisalignedRows {
        left_fy: f64,
        left_cy: f64,
        right_fy: f64,
        right_cy: f64,
    },
}

/// Malformed sensor input rejected before insertion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("Disparity image is empty")]
    EmptyImage,

    #[error("Pixel buffer holds {actual} values, expected {expected}")]
    DataSizeMismatch { expected: usize, actual: usize },

    #[error("Full image size must be positive and finite, got {width}x{height}")]
    InvalidFullImageSize { width: f64, height: f64 },

    #[error(
        "Disparity image {width}x{height} is larger than the calibration resolution {full_width}x{full_height}"
    )]
    ResolutionMismatch {
        width: usize,
        height: usize,
        full_width: f64,
        full_height: f64,
    },

    #[error("Reprojection matrix contains non-finite entries")]
    InvalidReprojection,

    #[error("Point cloud is empty")]
    EmptyCloud,

    #[error("Point cloud is missing field '{0}'")]
    MissingField(String),

    #[error("Point cloud data holds {actual} bytes, layout requires {expected}")]
    TruncatedMessage { expected: usize, actual: usize },

    #[error("Invalid point cloud layout: {0}")]
    InvalidLayout(String),
}
