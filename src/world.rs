//! Insertion dispatcher.
//!
//! [`World`] owns a backend and an optional weighing function. Each
//! insertion call:
//!
//! 1. takes a snapshot of the weighing function
//! 2. validates and converts the sensor input (no backend access yet)
//! 3. forwards the sensor-frame points and the sensor-to-world transform to
//!    exactly one backend hook
//!
//! | Input | No weighing function | Weighing function set |
//! |-------|----------------------|-----------------------|
//! | disparity | `insert_projected_disparity` | `insert_projected_disparity_with_weights` |
//! | point cloud | `insert_pointcloud` | `insert_pointcloud_with_weights` |
//!
//! Queries and direct edits go straight to the backend.

use log::debug;
use nalgebra::{Matrix3, Vector2};

use crate::backend::{EmptyWorld, VolumetricBackend};
use crate::config::AkashaConfig;
use crate::core::{
    CellStatus, DisparityImage, DisparityMessage, PointCloudMessage, Transformation, Vector3,
};
use crate::error::{CalibrationError, IngestError};
use crate::geometry::{
    CalibrationConfig, CameraInfo, ReprojectionMatrix, q_for_camera_infos, q_for_cameras,
};
use crate::ingest::{DisparityConfig, Ingested, convert_pointcloud, project_disparity};
use crate::weighing::SharedWeighing;

/// Summary of one insertion call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertResult {
    /// Points handed to the backend with a valid measurement
    pub points_inserted: usize,
    /// Measurements without a valid point
    pub points_invalid: usize,
    /// Whether the weighted hook was used
    pub weighted: bool,
}

impl InsertResult {
    /// Accumulate another result into this one
    pub fn merge(&mut self, other: &InsertResult) {
        self.points_inserted += other.points_inserted;
        self.points_invalid += other.points_invalid;
        self.weighted |= other.weighted;
    }

    fn from_ingested(ingested: &Ingested) -> Self {
        Self {
            points_inserted: ingested.valid_count(),
            points_invalid: ingested.invalid,
            weighted: ingested.is_weighted(),
        }
    }
}

/// Volumetric world: sensor ingestion in front of a pluggable backend.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use akasha_map::{World, EmptyWorld, Transformation};
/// use akasha_map::weighing::ConstantWeighing;
///
/// let mut world = World::new(EmptyWorld);
/// world.set_weighing_function(Arc::new(ConstantWeighing::new(1.0)));
///
/// let result = world.insert_pointcloud(&Transformation::identity(), &cloud)?;
/// println!("{} points inserted", result.points_inserted);
/// ```
pub struct World<B: VolumetricBackend = EmptyWorld> {
    backend: B,
    weighing_function: Option<SharedWeighing>,
    disparity_config: DisparityConfig,
    calibration_config: CalibrationConfig,
}

impl Default for World<EmptyWorld> {
    fn default() -> Self {
        Self::new(EmptyWorld)
    }
}

impl<B: VolumetricBackend> World<B> {
    /// Create a world around `backend` with default configuration
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, AkashaConfig::default())
    }

    /// Create a world around `backend` with the given configuration
    pub fn with_config(backend: B, config: AkashaConfig) -> Self {
        Self {
            backend,
            weighing_function: None,
            disparity_config: config.disparity_config(),
            calibration_config: config.calibration_config(),
        }
    }

    /// The installed backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the installed backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the world and return its backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Disparity reprojection settings
    pub fn disparity_config(&self) -> &DisparityConfig {
        &self.disparity_config
    }

    /// Calibration validation settings
    pub fn calibration_config(&self) -> &CalibrationConfig {
        &self.calibration_config
    }

    // =========================================================================
    // WEIGHING FUNCTION
    // =========================================================================

    /// Attach a weighing function.
    ///
    /// Takes effect from the next insertion call on; previously inserted
    /// data is not revisited.
    pub fn set_weighing_function(&mut self, weighing_function: SharedWeighing) {
        self.weighing_function = Some(weighing_function);
    }

    /// Detach the weighing function, returning to unweighted insertion.
    pub fn clear_weighing_function(&mut self) -> Option<SharedWeighing> {
        self.weighing_function.take()
    }

    /// Is a weighing function attached?
    pub fn is_weighing_function_set(&self) -> bool {
        self.weighing_function.is_some()
    }

    /// The attached weighing function, if any
    pub fn weighing_function(&self) -> Option<&SharedWeighing> {
        self.weighing_function.as_ref()
    }

    // =========================================================================
    // CALIBRATION HELPERS
    // =========================================================================

    /// Compute Q for a stereo pair using this world's calibration settings.
    ///
    /// See [`q_for_cameras`].
    pub fn q_for_cameras(
        &self,
        t_c1_c0: &Transformation,
        left_cam_matrix: &Matrix3<f64>,
        right_cam_matrix: &Matrix3<f64>,
        full_image_size: &Vector2<f64>,
    ) -> Result<ReprojectionMatrix, CalibrationError> {
        q_for_cameras(
            t_c1_c0,
            left_cam_matrix,
            right_cam_matrix,
            full_image_size,
            &self.calibration_config,
        )
    }

    /// Compute Q from two camera records using this world's calibration
    /// settings.
    ///
    /// See [`q_for_camera_infos`].
    pub fn q_for_camera_infos(
        &self,
        left_camera: &CameraInfo,
        right_camera: &CameraInfo,
    ) -> Result<ReprojectionMatrix, CalibrationError> {
        q_for_camera_infos(left_camera, right_camera, &self.calibration_config)
    }

    // =========================================================================
    // INSERTION
    // =========================================================================

    /// Project a disparity image to 3D and insert it.
    ///
    /// `q_full` is the reprojection matrix for the full-resolution image of
    /// size `full_image_size`; downsampled disparity maps are handled by
    /// rescaling Q.
    ///
    /// # Errors
    /// Returns an [`IngestError`] for malformed input; the backend is not
    /// touched in that case.
    pub fn insert_disparity_image(
        &mut self,
        sensor_to_world: &Transformation,
        disparity: &DisparityImage,
        q_full: &ReprojectionMatrix,
        full_image_size: &Vector2<f64>,
    ) -> Result<InsertResult, IngestError> {
        let weighing = self.weighing_function.clone();
        let ingested = project_disparity(
            disparity,
            q_full,
            full_image_size,
            weighing.as_deref(),
            &self.disparity_config,
        )?;

        let result = InsertResult::from_ingested(&ingested);
        match &ingested.weights {
            Some(weights) => self.backend.insert_projected_disparity_with_weights(
                sensor_to_world,
                &ingested.points,
                weights,
            ),
            None => self
                .backend
                .insert_projected_disparity(sensor_to_world, &ingested.points),
        }

        debug!(
            "Inserted disparity image {}x{}: {} valid, {} invalid, weighted={}",
            disparity.width(),
            disparity.height(),
            result.points_inserted,
            result.points_invalid,
            result.weighted
        );
        Ok(result)
    }

    /// Insert a disparity message.
    ///
    /// Pixels outside the message's disparity range are treated as
    /// unmeasured; the rest follows [`insert_disparity_image`](Self::insert_disparity_image).
    pub fn insert_disparity_message(
        &mut self,
        sensor_to_world: &Transformation,
        message: &DisparityMessage,
        q_full: &ReprojectionMatrix,
        full_image_size: &Vector2<f64>,
    ) -> Result<InsertResult, IngestError> {
        let image = message.masked_image();
        self.insert_disparity_image(sensor_to_world, &image, q_full, full_image_size)
    }

    /// Convert a point cloud message and insert it.
    ///
    /// Non-geometric fields are ignored and non-finite points dropped.
    ///
    /// # Errors
    /// Returns an [`IngestError`] for malformed input; the backend is not
    /// touched in that case.
    pub fn insert_pointcloud(
        &mut self,
        sensor_to_world: &Transformation,
        cloud: &PointCloudMessage,
    ) -> Result<InsertResult, IngestError> {
        let weighing = self.weighing_function.clone();
        let ingested = convert_pointcloud(cloud, weighing.as_deref())?;

        let result = InsertResult::from_ingested(&ingested);
        match &ingested.weights {
            Some(weights) => self.backend.insert_pointcloud_with_weights(
                sensor_to_world,
                &ingested.points,
                weights,
            ),
            None => self
                .backend
                .insert_pointcloud(sensor_to_world, &ingested.points),
        }

        debug!(
            "Inserted point cloud: {} valid, {} excluded, weighted={}",
            result.points_inserted, result.points_invalid, result.weighted
        );
        Ok(result)
    }

    // =========================================================================
    // DIRECT EDITS
    // =========================================================================

    /// Mark a box centered at `position` as free.
    pub fn set_free(&mut self, position: &Vector3, bounding_box_size: &Vector3) {
        self.backend.set_free(position, bounding_box_size);
    }

    /// Mark a box centered at `position` as occupied.
    ///
    /// A no-op on [`EmptyWorld`].
    pub fn set_occupied(&mut self, position: &Vector3, bounding_box_size: &Vector3) {
        self.backend.set_occupied(position, bounding_box_size);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Status of the cell containing `point`
    pub fn cell_status_point(&self, point: &Vector3) -> CellStatus {
        self.backend.cell_status_point(point)
    }

    /// Aggregate status of the box centered at `point`
    pub fn cell_status_bounding_box(
        &self,
        point: &Vector3,
        bounding_box_size: &Vector3,
    ) -> CellStatus {
        self.backend
            .cell_status_bounding_box(point, bounding_box_size)
    }

    /// Aggregate status along the segment `start` → `end`
    pub fn line_status(&self, start: &Vector3, end: &Vector3) -> CellStatus {
        self.backend.line_status(start, end)
    }

    /// Aggregate status of a box swept along `start` → `end`
    pub fn line_status_bounding_box(
        &self,
        start: &Vector3,
        end: &Vector3,
        bounding_box_size: &Vector3,
    ) -> CellStatus {
        self.backend
            .line_status_bounding_box(start, end, bounding_box_size)
    }

    /// Center of the mapped volume
    pub fn map_center(&self) -> Vector3 {
        self.backend.map_center()
    }

    /// Extent of the mapped volume per axis
    pub fn map_size(&self) -> Vector3 {
        self.backend.map_size()
    }
}
