//! Test utilities for Akasha integration tests.
//!
//! Provides a backend that records every hook call and a synthetic rectified
//! stereo rig for generating disparity images with known geometry.

#![allow(dead_code)]

use akasha_map::{
    CellStatus, DisparityImage, PointField, ReprojectionMatrix, Transformation, Vector3,
    VolumetricBackend, WeightField, generate_q,
};
use nalgebra::{Matrix3, Vector2};

// ============================================================================
// Recording backend
// ============================================================================

/// Which insertion hook was invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    Disparity,
    DisparityWeighted,
    PointCloud,
    PointCloudWeighted,
}

/// One recorded insertion.
#[derive(Clone, Debug)]
pub struct Insertion {
    pub hook: Hook,
    pub sensor_to_world: Transformation,
    pub points: PointField,
    pub weights: Option<WeightField>,
}

/// Backend that stores every insertion it receives.
///
/// Queries report `Occupied` inside the boxes passed to `set_occupied` and
/// the default `Free` elsewhere.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    pub insertions: Vec<Insertion>,
    pub occupied_boxes: Vec<(Vector3, Vector3)>,
}

impl RecordingBackend {
    pub fn hooks(&self) -> Vec<Hook> {
        self.insertions.iter().map(|i| i.hook).collect()
    }

    pub fn last(&self) -> &Insertion {
        self.insertions.last().expect("no insertion recorded")
    }

    fn record(
        &mut self,
        hook: Hook,
        sensor_to_world: &Transformation,
        points: &PointField,
        weights: Option<&WeightField>,
    ) {
        self.insertions.push(Insertion {
            hook,
            sensor_to_world: *sensor_to_world,
            points: points.clone(),
            weights: weights.cloned(),
        });
    }
}

impl VolumetricBackend for RecordingBackend {
    fn insert_projected_disparity(&mut self, sensor_to_world: &Transformation, points: &PointField) {
        self.record(Hook::Disparity, sensor_to_world, points, None);
    }

    fn insert_projected_disparity_with_weights(
        &mut self,
        sensor_to_world: &Transformation,
        points: &PointField,
        weights: &WeightField,
    ) {
        self.record(
            Hook::DisparityWeighted,
            sensor_to_world,
            points,
            Some(weights),
        );
    }

    fn insert_pointcloud(&mut self, sensor_to_world: &Transformation, points: &PointField) {
        self.record(Hook::PointCloud, sensor_to_world, points, None);
    }

    fn insert_pointcloud_with_weights(
        &mut self,
        sensor_to_world: &Transformation,
        points: &PointField,
        weights: &WeightField,
    ) {
        self.record(
            Hook::PointCloudWeighted,
            sensor_to_world,
            points,
            Some(weights),
        );
    }

    fn set_occupied(&mut self, position: &Vector3, bounding_box_size: &Vector3) {
        self.occupied_boxes.push((*position, *bounding_box_size));
    }

    fn cell_status_point(&self, point: &Vector3) -> CellStatus {
        let inside = self.occupied_boxes.iter().any(|(center, size)| {
            (point - center)
                .iter()
                .zip(size.iter())
                .all(|(d, s)| d.abs() <= s / 2.0)
        });
        if inside {
            CellStatus::Occupied
        } else {
            CellStatus::Free
        }
    }
}

// ============================================================================
// Synthetic stereo rig
// ============================================================================

/// Rectified stereo pair with identical intrinsics.
#[derive(Clone, Copy, Debug)]
pub struct StereoRig {
    pub width: usize,
    pub height: usize,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub baseline: f64,
}

impl Default for StereoRig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fx: 500.0,
            fy: 500.0,
            cx: 320.0,
            cy: 240.0,
            baseline: 0.1,
        }
    }
}

impl StereoRig {
    /// Full calibration resolution
    pub fn full_size(&self) -> Vector2<f64> {
        Vector2::new(self.width as f64, self.height as f64)
    }

    /// Intrinsic matrix shared by both cameras
    pub fn intrinsics(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0,
        )
    }

    /// Left-to-right camera transform (right camera at +baseline along X)
    pub fn t_right_left(&self) -> Transformation {
        Transformation::translation(-self.baseline, 0.0, 0.0)
    }

    /// Q for the full resolution
    pub fn q(&self) -> ReprojectionMatrix {
        generate_q(
            -self.baseline,
            self.cx,
            self.cy,
            self.fx,
            self.fy,
            self.cx,
            self.cy,
            self.fx,
            self.fy,
        )
        .expect("rig calibration is rectified")
    }

    /// Disparity of a point at `depth`
    pub fn disparity_at(&self, depth: f64) -> f32 {
        (self.fx * self.baseline / depth) as f32
    }

    /// Disparity image of a fronto-parallel wall at `depth`, sampled at
    /// `1/downsample` of the full resolution.
    pub fn wall(&self, depth: f64, downsample: usize) -> DisparityImage {
        let width = self.width / downsample;
        let height = self.height / downsample;
        let d = self.disparity_at(depth) / downsample as f32;
        DisparityImage::filled(width, height, d).expect("non-empty wall image")
    }
}
