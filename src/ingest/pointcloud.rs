//! Point cloud message to sensor-frame point field.
//!
//! Decodes the `x`, `y`, `z` fields of every record and drops everything
//! else (color, intensity, ring, ...). Records with a non-finite coordinate
//! are excluded from the output; the point field and the optional weight
//! field shrink together so they stay index-aligned.
//!
//! The output is always unorganized (`height == 1`), in record order.

use log::trace;
use nalgebra::Point3;

use super::Ingested;
use crate::core::{FieldDescriptor, PointCloudMessage, PointField, WeightField};
use crate::error::IngestError;
use crate::weighing::{WeighingFunction, sanitize_weight};

/// Convert a point cloud message into a sensor-frame point field.
///
/// # Arguments
/// * `cloud` - Field-tagged point cloud message
/// * `weighing` - Optional weighing function; produces a weight field
///
/// # Returns
/// The finite points in record order, their weights when `weighing` is
/// set, and the number of excluded records in `invalid`.
///
/// # Errors
/// Rejects empty clouds, missing `x`/`y`/`z` fields and buffers that do not
/// match the declared layout.
pub fn convert_pointcloud(
    cloud: &PointCloudMessage,
    weighing: Option<&dyn WeighingFunction>,
) -> Result<Ingested, IngestError> {
    let layout = CloudLayout::from_message(cloud)?;

    let total = cloud.len();
    let mut points = Vec::with_capacity(total);
    let mut weights = weighing.map(|_| Vec::with_capacity(total));
    let mut invalid = 0usize;

    for row in 0..cloud.height {
        for col in 0..cloud.width {
            let base = row * cloud.row_step + col * cloud.point_step;
            let record = &cloud.data[base..base + cloud.point_step];

            let x = read_field(&layout.x, record, cloud.is_bigendian);
            let y = read_field(&layout.y, record, cloud.is_bigendian);
            let z = read_field(&layout.z, record, cloud.is_bigendian);
            if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                invalid += 1;
                continue;
            }

            let point = Point3::new(x, y, z);
            if let (Some(function), Some(out)) = (weighing, weights.as_mut()) {
                out.push(sanitize_weight(function.weight_from_point(&point)));
            }
            points.push(point);
        }
    }

    trace!(
        "Converted point cloud: {} points kept, {} non-finite excluded",
        points.len(),
        invalid
    );

    Ok(Ingested {
        points: PointField::from_points(points),
        weights: weights.map(WeightField::from_weights),
        invalid,
    })
}

/// Resolved geometric fields of a validated message.
struct CloudLayout<'a> {
    x: &'a FieldDescriptor,
    y: &'a FieldDescriptor,
    z: &'a FieldDescriptor,
}

impl<'a> CloudLayout<'a> {
    fn from_message(cloud: &'a PointCloudMessage) -> Result<Self, IngestError> {
        if cloud.is_empty() {
            return Err(IngestError::EmptyCloud);
        }

        let field = move |name: &str| {
            cloud
                .field(name)
                .ok_or_else(|| IngestError::MissingField(name.to_string()))
        };
        let layout = Self {
            x: field("x")?,
            y: field("y")?,
            z: field("z")?,
        };

        for f in [layout.x, layout.y, layout.z] {
            let end = f.end().ok_or_else(|| overflow("field extent"))?;
            if end > cloud.point_step {
                return Err(IngestError::InvalidLayout(format!(
                    "field '{}' ends at byte {} but point_step is {}",
                    f.name, end, cloud.point_step
                )));
            }
        }

        let row_bytes = cloud
            .width
            .checked_mul(cloud.point_step)
            .ok_or_else(|| overflow("width * point_step"))?;
        if cloud.row_step < row_bytes {
            return Err(IngestError::InvalidLayout(format!(
                "row_step {} is smaller than width * point_step = {}",
                cloud.row_step, row_bytes
            )));
        }

        let expected = (cloud.height - 1)
            .checked_mul(cloud.row_step)
            .and_then(|bytes| bytes.checked_add(row_bytes))
            .ok_or_else(|| overflow("height * row_step"))?;
        if cloud.data.len() < expected {
            return Err(IngestError::TruncatedMessage {
                expected,
                actual: cloud.data.len(),
            });
        }

        Ok(layout)
    }
}

fn overflow(what: &str) -> IngestError {
    IngestError::InvalidLayout(format!("{} overflows usize", what))
}

#[inline]
fn read_field(field: &FieldDescriptor, record: &[u8], big_endian: bool) -> f32 {
    field.datatype.read(&record[field.offset..], big_endian) as f32
}
