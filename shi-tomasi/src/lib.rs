//! A Shi-Tomasi "good features to track" corner detector.
//!
//! A pixel is a corner when the image varies strongly in every direction around it. The
//! detector measures this with the smaller eigenvalue of the structure tensor summed over a
//! small window, keeps the local maxima of that response which exceed a fraction of the
//! strongest one, and thins them out so no two corners are closer than a minimum distance.
//!
//! The corners are returned strongest first, which makes truncating the list to a bounded
//! count keep the best ones.

mod derivatives;
mod image;
mod response;

pub use crate::image::GrayFloatImage;

use ::image::{DynamicImage, ImageResult};
use float_ord::FloatOrd;
use homolog_core::{nalgebra::Point2, ImagePoint, KeyPoint, PointSet};
use log::*;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A corner found by the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Corner {
    /// The pixel of the corner. The horizontal coordinate grows to the right and the vertical
    /// coordinate grows towards the bottom of the image.
    pub point: (f32, f32),
    /// The minimum eigenvalue of the structure tensor at the corner.
    pub response: f32,
}

impl ImagePoint for Corner {
    fn image_point(&self) -> Point2<f64> {
        Point2::new(self.point.0 as f64, self.point.1 as f64)
    }
}

/// Contains the configuration parameters of the detector.
///
/// The most important parameter is `quality_level`. [`ShiTomasi::new`] sets it and leaves all
/// other parameters at their default. You can also use the helpers [`ShiTomasi::sparse`] and
/// [`ShiTomasi::dense`]. The default value of `quality_level` is `0.01`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiTomasi {
    /// Corners with a response below `quality_level` times the strongest response are dropped
    pub quality_level: f32,

    /// Minimum euclidean distance in pixels between two returned corners
    pub min_distance: f32,

    /// Side of the window over which the structure tensor is summed
    pub block_size: usize,
}

impl ShiTomasi {
    /// This convenience constructor is provided for the very common case
    /// that the quality level needs to be modified.
    pub fn new(quality_level: f32) -> Self {
        Self {
            quality_level,
            ..Default::default()
        }
    }

    /// Create a detector that sparsely detects corners.
    ///
    /// Uses a quality level of `0.05` (default is `0.01`).
    pub fn sparse() -> Self {
        Self::new(0.05)
    }

    /// Create a detector that densely detects corners.
    ///
    /// Uses a quality level of `0.001` (default is `0.01`).
    pub fn dense() -> Self {
        Self::new(0.001)
    }
}

impl Default for ShiTomasi {
    fn default() -> Self {
        Self {
            quality_level: 0.01,
            min_distance: 10.0,
            block_size: 3,
        }
    }
}

impl ShiTomasi {
    /// Detects every corner of a grayscale image, strongest first.
    pub fn detect(&self, image: &GrayFloatImage) -> Vec<Corner> {
        let eigenvalues = response::min_eigenvalue(image, self.block_size.max(1) | 1);
        trace!("Computing the minimum eigenvalue response finished.");
        let max_response = eigenvalues.as_raw().iter().copied().fold(0.0f32, f32::max);
        if max_response <= 0.0 {
            debug!("Image has no corner response.");
            return vec![];
        }
        let threshold = max_response * self.quality_level;
        debug!(
            "Strongest response={}, quality threshold={}",
            max_response, threshold
        );

        let mut candidates = response::local_maxima(&eigenvalues, threshold);
        trace!("Found {} local maxima.", candidates.len());
        // Stable, so equal responses stay in raster order.
        candidates.sort_by_key(|corner| std::cmp::Reverse(FloatOrd(corner.response)));
        let corners = response::enforce_min_distance(
            candidates,
            self.min_distance,
            image.width(),
            image.height(),
        );
        trace!("Minimum distance suppression kept {} corners.", corners.len());
        corners
    }

    /// Extracts at most `max_corners` corners from an image as a [`PointSet`].
    ///
    /// A `max_corners` of `0` means no bound.
    ///
    /// # Example
    /// ```
    /// use image::{DynamicImage, GrayImage, Luma};
    /// use shi_tomasi::ShiTomasi;
    /// let square = GrayImage::from_fn(64, 64, |x, y| {
    ///     if (20..44).contains(&x) && (20..44).contains(&y) { Luma([255]) } else { Luma([0]) }
    /// });
    /// let points = ShiTomasi::default().extract(&DynamicImage::ImageLuma8(square), 100);
    /// assert_eq!(points.len(), 4);
    /// ```
    pub fn extract(&self, image: &DynamicImage, max_corners: usize) -> PointSet {
        let float_image = GrayFloatImage::from_dynamic(image);
        let mut corners = self.detect(&float_image);
        if max_corners != 0 {
            corners.truncate(max_corners);
        }
        info!("Extracted {} corners", corners.len());
        corners
            .iter()
            .map(|corner| KeyPoint(corner.image_point()))
            .collect()
    }

    /// Extracts at most `max_corners` corners from an image on disk.
    ///
    /// Returns an `ImageResult` of the points.
    pub fn extract_path(
        &self,
        path: impl AsRef<Path>,
        max_corners: usize,
    ) -> ImageResult<PointSet> {
        Ok(self.extract(&::image::open(path)?, max_corners))
    }
}
