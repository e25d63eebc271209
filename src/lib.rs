//! # Akasha Map
//!
//! Sensor-to-volumetric-map insertion pipeline.
//!
//! ## Overview
//!
//! Akasha turns stereo disparity images and point clouds into sensor-frame
//! 3D points (optionally with per-point weights) and hands them to a
//! pluggable volumetric backend together with the sensor pose:
//!
//! ```text
//!  stereo calibration ──► q_for_cameras ──► Q
//!                                           │
//!  DisparityImage ──────────────────────────┴──► project_disparity ──┐
//!                                                                    ├──► World ──► VolumetricBackend
//!  PointCloudMessage ─────────────────────────► convert_pointcloud ──┘      ▲
//!                                                                           │
//!                                             WeighingFunction (optional) ──┘
//! ```
//!
//! The backend decides how points become occupancy. [`EmptyWorld`] is the
//! null backend: everything is free and the map is unbounded.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use akasha_map::{World, EmptyWorld, Transformation, q_for_cameras};
//! use nalgebra::Vector2;
//!
//! let mut world = World::new(EmptyWorld);
//!
//! let full_size = Vector2::new(640.0, 480.0);
//! let q = world.q_for_cameras(&t_right_left, &k_left, &k_right, &full_size)?;
//!
//! let result = world.insert_disparity_image(&pose, &disparity, &q, &full_size)?;
//! println!("{} points inserted", result.points_inserted);
//! ```
//!
//! ## Coordinate System
//!
//! Camera data uses the optical convention:
//! - X: Right
//! - Y: Down
//! - Z: Forward (depth)

// Core types
pub mod core;

// Stereo reprojection and calibration
pub mod geometry;

// Per-point measurement weights
pub mod weighing;

// Sensor input conversion
pub mod ingest;

// Volumetric backend contract and the null backend
pub mod backend;

// Insertion dispatcher
pub mod world;

// Unified configuration
pub mod config;

// Error types
pub mod error;

// Re-export commonly used types
pub use core::{
    CellStatus, DisparityImage, DisparityMessage, FieldPoint, ImageSize, PointCloudMessage,
    PointField, Transformation, Vector3, WeightField,
};

pub use geometry::{
    CalibrationConfig, CameraInfo, ReprojectionMatrix, generate_q, q_for_camera_infos,
    q_for_cameras,
};

pub use weighing::{SharedWeighing, WeighingFunction};

pub use ingest::{DisparityConfig, Ingested};

pub use backend::{EmptyWorld, VolumetricBackend};

pub use world::{InsertResult, World};

pub use config::{AkashaConfig, ConfigLoadError};

pub use error::{CalibrationError, IngestError};
