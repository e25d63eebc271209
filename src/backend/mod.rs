//! Backend contract for volumetric maps.
//!
//! A backend is the concrete spatial structure (octree, voxel grid, signed
//! distance field, ...) that turns sensor-frame points into occupancy. The
//! [`World`](crate::World) dispatcher validates and converts sensor input,
//! then calls exactly one of four insertion hooks:
//!
//! ```text
//!                      unweighted                          weighted
//!              ┌──────────────────────────────┬───────────────────────────────────────────┐
//! disparity    │ insert_projected_disparity   │ insert_projected_disparity_with_weights   │
//! point cloud  │ insert_pointcloud            │ insert_pointcloud_with_weights            │
//!              └──────────────────────────────┴───────────────────────────────────────────┘
//! ```
//!
//! Points arrive in the sensor frame together with the sensor-to-world
//! transform; applying the transform is the backend's job, so it can walk
//! rays from the sensor origin incrementally.
//!
//! ## Defaults
//!
//! Every method has a default, so a backend only implements what it
//! supports:
//! - insertion hooks log an error and do nothing
//! - `set_free` / `set_occupied` do nothing
//! - every status query answers [`CellStatus::Free`]
//! - the map is centered at the origin with `f64::MAX` extent per axis
//!
//! Taken together the defaults describe an empty, unbounded world, which is
//! exactly what [`EmptyWorld`] is.

mod empty;

pub use empty::EmptyWorld;

use log::error;

use crate::core::{CellStatus, PointField, Transformation, Vector3, WeightField};

/// Insertion hooks and queries every volumetric map provides.
///
/// Insertion hooks take `&mut self` and are serialized by the caller.
/// Queries take `&self`, must be free of side effects, and may run
/// concurrently with each other (hence `Send + Sync`).
pub trait VolumetricBackend: Send + Sync {
    // =========================================================================
    // INSERTION HOOKS
    // =========================================================================

    /// Insert a projected disparity image.
    ///
    /// `points` keeps the image layout; entries without a measurement are
    /// NaN.
    fn insert_projected_disparity(
        &mut self,
        _sensor_to_world: &Transformation,
        _points: &PointField,
    ) {
        error!(
            "{}: calling unimplemented disparity insertion",
            std::any::type_name::<Self>()
        );
    }

    /// Insert a projected disparity image with per-pixel weights.
    ///
    /// `weights` has the same layout as `points`.
    fn insert_projected_disparity_with_weights(
        &mut self,
        _sensor_to_world: &Transformation,
        _points: &PointField,
        _weights: &WeightField,
    ) {
        error!(
            "{}: calling unimplemented weighted disparity insertion",
            std::any::type_name::<Self>()
        );
    }

    /// Insert a point cloud (finite points only, record order).
    fn insert_pointcloud(&mut self, _sensor_to_world: &Transformation, _points: &PointField) {
        error!(
            "{}: calling unimplemented pointcloud insertion",
            std::any::type_name::<Self>()
        );
    }

    /// Insert a point cloud with one weight per point.
    fn insert_pointcloud_with_weights(
        &mut self,
        _sensor_to_world: &Transformation,
        _points: &PointField,
        _weights: &WeightField,
    ) {
        error!(
            "{}: calling unimplemented weighted pointcloud insertion",
            std::any::type_name::<Self>()
        );
    }

    // =========================================================================
    // DIRECT EDITS
    // =========================================================================

    /// Mark an axis-aligned box centered at `position` as free.
    fn set_free(&mut self, _position: &Vector3, _bounding_box_size: &Vector3) {}

    /// Mark an axis-aligned box centered at `position` as occupied.
    fn set_occupied(&mut self, _position: &Vector3, _bounding_box_size: &Vector3) {}

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Status of the single cell containing `point`.
    fn cell_status_point(&self, _point: &Vector3) -> CellStatus {
        CellStatus::Free
    }

    /// Aggregate status of the box centered at `point`.
    fn cell_status_bounding_box(&self, _point: &Vector3, _bounding_box_size: &Vector3) -> CellStatus {
        CellStatus::Free
    }

    /// Aggregate status of the straight segment from `start` to `end`.
    fn line_status(&self, _start: &Vector3, _end: &Vector3) -> CellStatus {
        CellStatus::Free
    }

    /// Aggregate status of a box swept along the segment from `start` to `end`.
    fn line_status_bounding_box(
        &self,
        _start: &Vector3,
        _end: &Vector3,
        _bounding_box_size: &Vector3,
    ) -> CellStatus {
        CellStatus::Free
    }

    /// Center of the mapped volume.
    fn map_center(&self) -> Vector3 {
        Vector3::zeros()
    }

    /// Extent of the mapped volume per axis.
    fn map_size(&self) -> Vector3 {
        Vector3::repeat(f64::MAX)
    }
}

impl<B: VolumetricBackend + ?Sized> VolumetricBackend for Box<B> {
    fn insert_projected_disparity(&mut self, sensor_to_world: &Transformation, points: &PointField) {
        (**self).insert_projected_disparity(sensor_to_world, points)
    }

    fn insert_projected_disparity_with_weights(
        &mut self,
        sensor_to_world: &Transformation,
        points: &PointField,
        weights: &WeightField,
    ) {
        (**self).insert_projected_disparity_with_weights(sensor_to_world, points, weights)
    }

    fn insert_pointcloud(&mut self, sensor_to_world: &Transformation, points: &PointField) {
        (**self).insert_pointcloud(sensor_to_world, points)
    }

    fn insert_pointcloud_with_weights(
        &mut self,
        sensor_to_world: &Transformation,
        points: &PointField,
        weights: &WeightField,
    ) {
        (**self).insert_pointcloud_with_weights(sensor_to_world, points, weights)
    }

    fn set_free(&mut self, position: &Vector3, bounding_box_size: &Vector3) {
        (**self).set_free(position, bounding_box_size)
    }

    fn set_occupied(&mut self, position: &Vector3, bounding_box_size: &Vector3) {
        (**self).set_occupied(position, bounding_box_size)
    }

    fn cell_status_point(&self, point: &Vector3) -> CellStatus {
        (**self).cell_status_point(point)
    }

    fn cell_status_bounding_box(&self, point: &Vector3, bounding_box_size: &Vector3) -> CellStatus {
        (**self).cell_status_bounding_box(point, bounding_box_size)
    }

    fn line_status(&self, start: &Vector3, end: &Vector3) -> CellStatus {
        (**self).line_status(start, end)
    }

    fn line_status_bounding_box(
        &self,
        start: &Vector3,
        end: &Vector3,
        bounding_box_size: &Vector3,
    ) -> CellStatus {
        (**self).line_status_bounding_box(start, end, bounding_box_size)
    }

    fn map_center(&self) -> Vector3 {
        (**self).map_center()
    }

    fn map_size(&self) -> Vector3 {
        (**self).map_size()
    }
}
