use crate::MatcherSettings;
use homolog_core::{CameraCalibration, Error, PointMatch, PointSet, Result};
use homolog_geom::{compute_distances, DistanceMatrix};
use homolog_match::Correspondences;
use homolog_pinhole::FundamentalMatrix;
use log::*;

/// Something which finds the points of interest of an image.
///
/// The points must be ranked by decreasing confidence, so that the first `max_points` are the
/// best ones.
pub trait PointExtractor {
    type Image: ?Sized;

    /// Extracts at most `max_points` points, or every point if `max_points` is `0`.
    fn extract_points(&self, image: &Self::Image, max_points: usize) -> PointSet;
}

#[cfg(feature = "shi-tomasi")]
impl PointExtractor for shi_tomasi::ShiTomasi {
    type Image = image::DynamicImage;

    fn extract_points(&self, image: &Self::Image, max_points: usize) -> PointSet {
        self.extract(image, max_points)
    }
}

/// Everything produced while matching a stereo pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    pub left: PointSet,
    pub right: PointSet,
    pub fundamental: FundamentalMatrix,
    pub distances: DistanceMatrix,
    pub correspondences: Correspondences,
}

impl MatchReport {
    /// The pairs of homologous points, sorted by left index.
    pub fn matched_points(&self) -> Vec<PointMatch> {
        self.correspondences
            .iter()
            .map(|c| PointMatch(self.left[c.left], self.right[c.right]))
            .collect()
    }
}

/// Runs the whole chain: fundamental matrix, epipolar distances, then correspondences.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HomologousMatcher {
    settings: MatcherSettings,
}

impl HomologousMatcher {
    pub fn new(settings: MatcherSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    /// Derives the fundamental matrix of the pair, projected to rank 2 if the settings ask so.
    pub fn fundamental(
        &self,
        left: &CameraCalibration,
        right: &CameraCalibration,
    ) -> Result<FundamentalMatrix> {
        let fundamental = FundamentalMatrix::from_calibrations_with(
            left,
            right,
            self.settings.svd_epsilon,
            self.settings.svd_max_iterations,
        )?;
        if self.settings.enforce_rank2 {
            debug!("projecting the fundamental matrix to rank 2");
            fundamental
                .recondition(self.settings.svd_epsilon, self.settings.svd_max_iterations)
                .ok_or(Error::SvdDidNotConverge)
        } else {
            Ok(fundamental)
        }
    }

    /// Matches two point sets that were already extracted.
    ///
    /// ```
    /// use homolog::{HomologousMatcher, MatcherSettings};
    /// use homolog::types::{CameraCalibration, KeyPoint, PointSet};
    /// use homolog::types::nalgebra::{IsometryMatrix3, Matrix3};
    /// let left = CameraCalibration::from_pose(Matrix3::identity(), IsometryMatrix3::identity());
    /// let right = CameraCalibration::from_pose(
    ///     Matrix3::identity(),
    ///     IsometryMatrix3::translation(-1.0, 0.0, 0.0),
    /// );
    /// // A pure horizontal baseline keeps homologous points on the same row.
    /// let left_points: PointSet = vec![KeyPoint::new(0.1, 0.2), KeyPoint::new(-0.3, 0.5)].into();
    /// let right_points: PointSet = vec![KeyPoint::new(-0.4, 0.5), KeyPoint::new(-0.1, 0.2)].into();
    /// let settings = MatcherSettings { maximum_distance: 0.01, ..Default::default() };
    /// let report = HomologousMatcher::new(settings)
    ///     .match_points(&left, &right, left_points, right_points)
    ///     .unwrap();
    /// assert_eq!(report.correspondences.right_homologous(), &[Some(1), Some(0)]);
    /// ```
    pub fn match_points(
        &self,
        left_calibration: &CameraCalibration,
        right_calibration: &CameraCalibration,
        left: PointSet,
        right: PointSet,
    ) -> Result<MatchReport> {
        let fundamental = self.fundamental(left_calibration, right_calibration)?;
        let distances = compute_distances(&left, &right, &fundamental);
        let correspondences = self
            .settings
            .policy
            .resolve(&distances, self.settings.maximum_distance);
        if let Some(mean) = correspondences.mean_distance() {
            info!(
                "matched {} of {} left and {} right points with a mean distance of {}",
                correspondences.len(),
                left.len(),
                right.len(),
                mean
            );
        } else {
            info!(
                "no match between {} left and {} right points",
                left.len(),
                right.len()
            );
        }
        Ok(MatchReport {
            left,
            right,
            fundamental,
            distances,
            correspondences,
        })
    }

    /// Extracts points from both images with `extractor` and matches them.
    pub fn match_images<E: PointExtractor>(
        &self,
        extractor: &E,
        left_calibration: &CameraCalibration,
        right_calibration: &CameraCalibration,
        left_image: &E::Image,
        right_image: &E::Image,
    ) -> Result<MatchReport> {
        // Validate the calibration before spending time on the images.
        left_calibration.validate()?;
        right_calibration.validate()?;
        let left = extractor.extract_points(left_image, self.settings.maximum_corners);
        let right = extractor.extract_points(right_image, self.settings.maximum_corners);
        debug!(
            "extracted {} left and {} right points",
            left.len(),
            right.len()
        );
        self.match_points(left_calibration, right_calibration, left, right)
    }
}
