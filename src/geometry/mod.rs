//! Stereo geometry: calibration to reprojection matrix, and per-pixel
//! reprojection.
//!
//! ## Pipeline
//!
//! ```text
//! CameraInfo ×2 ──► q_for_camera_infos ──┐
//!                                        ├──► Q (full resolution)
//! K_left, K_right, T_C1_C0 ──► q_for_cameras ┘        │
//!                                                     ▼
//!                              rescale_q (disparity map resolution)
//!                                                     │
//!                                                     ▼
//!                              reproject_pixel (u, v, d) → (X, Y, Z)
//! ```
//!
//! All functions are pure; nothing here holds state.

mod calibration;
mod reprojection;

pub use calibration::{CalibrationConfig, CameraInfo, q_for_camera_infos, q_for_cameras};
pub use reprojection::{
    ROW_ALIGNMENT_TOLERANCE, ReprojectionMatrix, generate_q, reproject_pixel, rescale_q,
};
