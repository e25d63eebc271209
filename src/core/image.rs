//! Disparity image inputs.
//!
//! A [`DisparityImage`] is a single-channel float image where each pixel is
//! the horizontal offset (in pixels) between corresponding points in the
//! left and right rectified images. Larger disparity means closer.
//!
//! [`DisparityMessage`] wraps an image together with the stereo metadata a
//! camera driver publishes alongside it (focal length, baseline and the
//! range of disparities the matcher searched).

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Image resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImageSize {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
}

impl ImageSize {
    /// Create a new image size
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Is either dimension zero?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size as a floating-point (width, height) vector
    #[inline]
    pub fn as_vector(&self) -> Vector2<f64> {
        Vector2::new(self.width as f64, self.height as f64)
    }
}

/// Single-channel floating-point disparity image, row-major.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisparityImage {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DisparityImage {
    /// Create a disparity image from row-major pixel data.
    ///
    /// Fails if the image is empty or `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, IngestError> {
        if width == 0 || height == 0 {
            return Err(IngestError::EmptyImage);
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(IngestError::DataSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an image with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self, IngestError> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Image size
    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width as u32, self.height as u32)
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Does the image hold no pixels?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel data, row-major
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Disparity at pixel (u, v)
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Option<f32> {
        if u < self.width && v < self.height {
            Some(self.data[v * self.width + u])
        } else {
            None
        }
    }

    /// Set the disparity at pixel (u, v). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, u: usize, v: usize, disparity: f32) {
        if u < self.width && v < self.height {
            self.data[v * self.width + u] = disparity;
        }
    }

    /// Iterate over pixels as `(u, v, disparity)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &d)| (i % width, i / width, d))
    }
}

/// Disparity image with the stereo metadata published alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct DisparityMessage {
    /// The disparity image
    pub image: DisparityImage,
    /// Focal length of the rectified cameras (pixels) at the resolution of
    /// `image`
    pub focal_length: f32,
    /// Stereo baseline (meters)
    pub baseline: f32,
    /// Smallest disparity the matcher searched
    pub min_disparity: f32,
    /// Largest disparity the matcher searched
    pub max_disparity: f32,
}

impl DisparityMessage {
    /// Wrap an image with its stereo metadata.
    pub fn new(image: DisparityImage, focal_length: f32, baseline: f32) -> Self {
        Self {
            image,
            focal_length,
            baseline,
            min_disparity: 0.0,
            max_disparity: f32::INFINITY,
        }
    }

    /// Restrict the disparity range considered valid.
    pub fn with_disparity_range(mut self, min_disparity: f32, max_disparity: f32) -> Self {
        self.min_disparity = min_disparity;
        self.max_disparity = max_disparity;
        self
    }

    /// Is `disparity` inside the searched range?
    #[inline]
    pub fn in_range(&self, disparity: f32) -> bool {
        disparity >= self.min_disparity && disparity <= self.max_disparity
    }

    /// Depth (meters) of a disparity in this image, `f·B / d`.
    ///
    /// `None` for non-positive or non-finite disparities.
    pub fn depth(&self, disparity: f32) -> Option<f32> {
        if disparity.is_finite() && disparity > 0.0 {
            Some(self.focal_length * self.baseline / disparity)
        } else {
            None
        }
    }

    /// Copy of the image with out-of-range pixels replaced by `0.0`,
    /// which the reprojection treats as "no measurement".
    pub fn masked_image(&self) -> DisparityImage {
        let mut image = self.image.clone();
        for d in image.data.iter_mut() {
            if !self.in_range(*d) {
                *d = 0.0;
            }
        }
        image
    }
}
