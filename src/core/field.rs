//! Canonical point and weight containers handed to backends.
//!
//! Both ingestion paths (disparity images and point clouds) produce a
//! [`PointField`] in the sensor frame. When a weighing function is attached
//! they also produce a [`WeightField`] with the same layout.
//!
//! ## Layout
//!
//! Fields are stored row-major with an explicit `width` x `height` shape:
//!
//! ```text
//! organized (disparity):   width = image columns, height = image rows
//! unorganized (cloud):     width = point count,   height = 1
//! ```
//!
//! Unmeasured entries are kept in place as NaN points so a backend can tell
//! "no measurement" apart from "measured free space", and so index `i` in
//! the weight field always belongs to index `i` in the point field.

use nalgebra::Point3;

/// Point type used in canonical fields (sensor frame, meters).
pub type FieldPoint = Point3<f32>;

/// The marker stored for pixels/points without a valid measurement.
#[inline]
pub fn invalid_point() -> FieldPoint {
    Point3::new(f32::NAN, f32::NAN, f32::NAN)
}

/// Is this point a real measurement (all coordinates finite)?
#[inline]
pub fn is_valid_point(point: &FieldPoint) -> bool {
    point.x.is_finite() && point.y.is_finite() && point.z.is_finite()
}

/// Ordered collection of 3D points in the sensor frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointField {
    width: usize,
    height: usize,
    points: Vec<FieldPoint>,
}

impl PointField {
    /// Create an organized field filled with invalid markers.
    pub fn new_invalid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            points: vec![invalid_point(); width * height],
        }
    }

    /// Create an unorganized field (`height == 1`) from points.
    pub fn from_points(points: Vec<FieldPoint>) -> Self {
        Self {
            width: points.len(),
            height: 1,
            points,
        }
    }

    /// Create an organized field from row-major points.
    ///
    /// Returns `None` if `points.len() != width * height`.
    pub fn from_organized(width: usize, height: usize, points: Vec<FieldPoint>) -> Option<Self> {
        (points.len() == width * height).then_some(Self {
            width,
            height,
            points,
        })
    }

    /// Field width (columns, or point count when unorganized)
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height (rows, 1 when unorganized)
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of entries, valid or not
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Is the field empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Does this field keep an image-like 2D layout?
    #[inline]
    pub fn is_organized(&self) -> bool {
        self.height > 1
    }

    /// All entries in row-major order
    #[inline]
    pub fn points(&self) -> &[FieldPoint] {
        &self.points
    }

    /// Entry at pixel (u, v)
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Option<&FieldPoint> {
        if u < self.width && v < self.height {
            self.points.get(v * self.width + u)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, point: FieldPoint) {
        self.points[index] = point;
    }

    /// Number of entries holding a real measurement
    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| is_valid_point(p)).count()
    }

    /// Iterate over valid entries together with their index.
    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, &FieldPoint)> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| is_valid_point(p))
    }
}

/// Per-point confidence weights, parallel to a [`PointField`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightField {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl WeightField {
    /// Create a zero-filled weight field with the given shape.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            weights: vec![0.0; width * height],
        }
    }

    /// Create an unorganized weight field.
    pub fn from_weights(weights: Vec<f32>) -> Self {
        Self {
            width: weights.len(),
            height: 1,
            weights,
        }
    }

    /// Field width
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of weights
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Is the field empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All weights in row-major order
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at pixel (u, v)
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Option<f32> {
        if u < self.width && v < self.height {
            self.weights.get(v * self.width + u).copied()
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, weight: f32) {
        self.weights[index] = weight;
    }

    /// Does this weight field line up entry-for-entry with `points`?
    pub fn is_aligned_with(&self, points: &PointField) -> bool {
        self.width == points.width() && self.height == points.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_marker() {
        assert!(!is_valid_point(&invalid_point()));
        assert!(is_valid_point(&Point3::new(0.0, 0.0, 1.0)));
        assert!(!is_valid_point(&Point3::new(f32::INFINITY, 0.0, 1.0)));
    }

    #[test]
    fn test_organized_field_access() {
        let mut field = PointField::new_invalid(3, 2);
        assert!(field.is_organized());
        assert_eq!(field.len(), 6);
        assert_eq!(field.valid_count(), 0);

        field.set(4, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(field.get(1, 1), Some(&Point3::new(1.0, 2.0, 3.0)));
        assert!(field.get(3, 0).is_none());
        assert_eq!(field.iter_valid().map(|(i, _)| i).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_from_organized_checks_shape() {
        assert!(PointField::from_organized(2, 2, vec![invalid_point(); 3]).is_none());
        assert!(PointField::from_organized(2, 2, vec![invalid_point(); 4]).is_some());
    }

    #[test]
    fn test_weight_alignment() {
        let points = PointField::from_points(vec![Point3::origin(); 5]);
        assert!(!points.is_organized());
        assert!(WeightField::from_weights(vec![1.0; 5]).is_aligned_with(&points));
        assert!(!WeightField::from_weights(vec![1.0; 4]).is_aligned_with(&points));
        assert!(!WeightField::zeros(5, 2).is_aligned_with(&points));
    }
}
