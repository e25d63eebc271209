//! Core types for the Akasha mapping pipeline.
//!
//! ## Frames
//!
//! Sensor data is expressed in the camera/sensor frame (optical convention
//! for cameras: +X right, +Y down, +Z forward). The [`Transformation`]
//! passed into every insertion maps that frame into the world frame.
//!
//! ## Type Categories
//!
//! ### Geometry
//! - [`Transformation`]: Rigid sensor-to-world pose (rotation + translation)
//! - [`ImageSize`]: Image resolution in pixels
//!
//! ### Sensor inputs
//! - [`DisparityImage`]: Single-channel float disparity map
//! - [`DisparityMessage`]: Disparity image with stereo metadata
//! - [`PointCloudMessage`]: Field-tagged packed point records
//!
//! ### Canonical containers
//! - [`PointField`]: Sensor-frame 3D points, invalid entries marked NaN
//! - [`WeightField`]: Per-point weights aligned with a `PointField`
//!
//! ### Queries
//! - [`CellStatus`]: Free / Occupied / Unknown

mod cell;
mod cloud;
mod field;
mod image;

pub use cell::CellStatus;
pub use cloud::{FieldDatatype, FieldDescriptor, PointCloudBuilder, PointCloudMessage};
pub use field::{FieldPoint, PointField, WeightField, invalid_point, is_valid_point};
pub use image::{DisparityImage, DisparityMessage, ImageSize};

/// Rigid-body transform mapping sensor coordinates into world coordinates.
pub type Transformation = nalgebra::Isometry3<f64>;

/// 3D position or extent in meters.
pub type Vector3 = nalgebra::Vector3<f64>;
