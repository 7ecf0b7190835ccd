use crate::{cross_product_matrix, optical_center, ProjectionMatrix};
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use homolog_core::{
    nalgebra::{Matrix3, Matrix4, Vector3},
    CameraCalibration, Result,
};
use log::*;

/// Default threshold by which the singular value decomposition is considered complete.
pub const DEFAULT_SVD_EPSILON: f64 = 1e-12;
/// Default cap on the iterations of the singular value decomposition.
pub const DEFAULT_SVD_MAX_ITERATIONS: usize = 1000;

/// This stores a fundamental matrix, which is satisfied by the following constraint:
///
/// transpose(x') * F * x = 0
///
/// Where `x` is a homogeneous pixel `(x, y, 1)` in the left image and `x'` the homogeneous
/// pixel of the same scene point in the right image.
///
/// The fundamental matrix embodies the epipolar constraint between two images in pixel units.
/// All the scene points which project onto the pixel `x` of the left camera lie on the ray
/// leaving the left optical center through `x`. Seen from the right camera, that ray projects
/// to a line, the epipolar line of `x`, which passes through the epipole (the image of the
/// left optical center in the right camera). The homologous point `x'` must be on that line.
///
/// `F * x` gives the coefficients `(a, b, c)` of the epipolar line `a u + b v + c = 0` in the
/// right image, and `transpose(F) * x'` gives the epipolar line of `x'` in the left image.
/// Swapping the roles of the two images transposes the matrix.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
pub struct FundamentalMatrix(pub Matrix3<f64>);

/// Derives the fundamental matrix of a calibrated stereo pair.
///
/// This computes `F = [P_right · o_left]× · P_right · P_left⁺` where `P_left` and `P_right` are
/// the projection matrices of the two cameras, `P_left⁺` the pseudo-inverse of `P_left`, and
/// `o_left` the optical center of the left camera. `P_right · o_left` is the epipole in the
/// right image.
///
/// No rank-2 enforcement is performed; see [`FundamentalMatrix::recondition`] for that.
///
/// Fails with [`Error::SingularExtrinsic`](homolog_core::Error::SingularExtrinsic) if either
/// extrinsic matrix is not invertible.
///
/// ```
/// use homolog_core::nalgebra::{IsometryMatrix3, Point3, Rotation3, Vector3};
/// use homolog_pinhole::{compute_fundamental, CameraIntrinsics, ProjectionMatrix};
/// let intrinsic = CameraIntrinsics::identity().focal(800.0).matrix();
/// let left = IsometryMatrix3::identity().to_homogeneous();
/// let right = IsometryMatrix3::from_parts(
///     Vector3::new(-0.5, 0.0, 0.0).into(),
///     Rotation3::from_euler_angles(0.0, 0.1, 0.0),
/// )
/// .to_homogeneous();
/// let fundamental = compute_fundamental(&intrinsic, &left, &intrinsic, &right, 1e-12, 1000).unwrap();
///
/// // The projections of a scene point satisfy the epipolar constraint.
/// let point = Point3::new(0.3, -0.2, 4.0);
/// let a = ProjectionMatrix::derive(&intrinsic, &left).project_point(&point).unwrap();
/// let b = ProjectionMatrix::derive(&intrinsic, &right).project_point(&point).unwrap();
/// let line = fundamental.right_line(&a.to_homogeneous());
/// let distance = line.dot(&b.to_homogeneous()).abs() / line.xy().norm();
/// assert!(distance < 1e-6);
/// ```
pub fn compute_fundamental(
    left_intrinsic: &Matrix3<f64>,
    left_extrinsic: &Matrix4<f64>,
    right_intrinsic: &Matrix3<f64>,
    right_extrinsic: &Matrix4<f64>,
    epsilon: f64,
    max_iterations: usize,
) -> Result<FundamentalMatrix> {
    let left = ProjectionMatrix::derive(left_intrinsic, left_extrinsic);
    let right = ProjectionMatrix::derive(right_intrinsic, right_extrinsic);

    let left_center = optical_center(left_extrinsic)?;
    // Both extrinsics must be invertible even though only the left center is used.
    optical_center(right_extrinsic)?;
    let left_inverse = left.pseudo_inverse(epsilon, max_iterations)?;

    let epipole = right.project(&left_center);
    trace!("right epipole: {:?}", epipole);

    let fundamental = cross_product_matrix(&epipole) * right.0 * left_inverse;
    debug!("fundamental matrix: {:?}", fundamental);
    Ok(FundamentalMatrix(fundamental))
}

impl FundamentalMatrix {
    /// Derives the fundamental matrix from the calibration of both cameras.
    ///
    /// See [`compute_fundamental`].
    pub fn from_calibrations(left: &CameraCalibration, right: &CameraCalibration) -> Result<Self> {
        Self::from_calibrations_with(left, right, DEFAULT_SVD_EPSILON, DEFAULT_SVD_MAX_ITERATIONS)
    }

    /// Same as [`FundamentalMatrix::from_calibrations`] with explicit decomposition settings.
    ///
    /// `epsilon` is the threshold by which the singular value decomposition is considered
    /// complete and below which singular values are treated as zero by the pseudo-inverse.
    /// `max_iterations` caps the iterations of the decomposition.
    pub fn from_calibrations_with(
        left: &CameraCalibration,
        right: &CameraCalibration,
        epsilon: f64,
        max_iterations: usize,
    ) -> Result<Self> {
        left.validate()?;
        right.validate()?;
        compute_fundamental(
            &left.intrinsic,
            &left.extrinsic,
            &right.intrinsic,
            &right.extrinsic,
            epsilon,
            max_iterations,
        )
    }

    /// The epipolar line in the right image induced by a homogeneous left pixel.
    pub fn right_line(&self, left: &Vector3<f64>) -> Vector3<f64> {
        self.0 * left
    }

    /// The epipolar line in the left image induced by a homogeneous right pixel.
    pub fn left_line(&self, right: &Vector3<f64>) -> Vector3<f64> {
        self.0.transpose() * right
    }

    /// The algebraic epipolar residual `transpose(right) * F * left`.
    pub fn residual(&self, left: &Vector3<f64>, right: &Vector3<f64>) -> f64 {
        right.dot(&self.right_line(left))
    }

    /// The fundamental matrix with the roles of the left and right images swapped.
    #[must_use]
    pub fn transpose(self) -> Self {
        Self(self.0.transpose())
    }

    /// Projects the matrix onto the closest rank-2 matrix in Frobenius norm.
    ///
    /// The derivation from calibration produces a rank-2 matrix only up to floating point
    /// error. This zeros the smallest singular value.
    pub fn recondition(self, epsilon: f64, max_iterations: usize) -> Option<Self> {
        let mut svd = self.0.try_svd(true, true, epsilon, max_iterations)?;
        // The singular values are sorted, so the last one is the smallest.
        svd.singular_values[2] = 0.0;
        // Cannot fail because we asked for both U and V* on decomp.
        svd.recompose().ok().map(Self)
    }

    /// Returns the epipoles `(left, right)` as homogeneous pixels.
    ///
    /// The left epipole is the null vector of `F` and the right epipole the null vector of
    /// `transpose(F)`. Either may lie at infinity (last component zero) when the image planes
    /// are parallel to the baseline.
    pub fn epipoles(
        &self,
        epsilon: f64,
        max_iterations: usize,
    ) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let svd = self.0.try_svd(true, true, epsilon, max_iterations)?;
        let left = svd.v_t?.row(2).transpose();
        let right = svd.u?.column(2).into_owned();
        Some((left, right))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::CameraIntrinsics;
    use approx::assert_relative_eq;
    use homolog_core::nalgebra::{IsometryMatrix3, Point2, Rotation3};

    fn stereo_pair() -> (CameraCalibration, CameraCalibration) {
        let intrinsic = CameraIntrinsics::identity()
            .focals([820.0, 810.0].into())
            .principal_point(Point2::new(330.0, 250.0))
            .matrix();
        let left = CameraCalibration::from_pose(
            intrinsic,
            IsometryMatrix3::from_parts(
                Vector3::new(0.1, 0.05, 0.0).into(),
                Rotation3::from_euler_angles(0.02, -0.03, 0.01),
            ),
        );
        let right = CameraCalibration::from_pose(
            intrinsic,
            IsometryMatrix3::from_parts(
                Vector3::new(-0.4, 0.02, 0.05).into(),
                Rotation3::from_euler_angles(-0.01, 0.15, 0.02),
            ),
        );
        (left, right)
    }

    fn singular_value_ratio(matrix: &Matrix3<f64>) -> f64 {
        let singular = matrix.singular_values();
        let largest = singular.iter().copied().fold(0.0, f64::max);
        let smallest = singular.iter().copied().fold(f64::INFINITY, f64::min);
        smallest / largest
    }

    #[test]
    fn near_rank_two() {
        let (left, right) = stereo_pair();
        let fundamental = FundamentalMatrix::from_calibrations(&left, &right).unwrap();
        assert!(singular_value_ratio(&fundamental) < 1e-8);
    }

    #[test]
    fn recondition_zeros_smallest_singular_value() {
        let (left, right) = stereo_pair();
        let fundamental = FundamentalMatrix::from_calibrations(&left, &right).unwrap();
        let reconditioned = fundamental.recondition(1e-12, 1000).unwrap();
        assert!(singular_value_ratio(&reconditioned) < 1e-12);
        assert_relative_eq!(
            reconditioned.0,
            fundamental.0,
            epsilon = 1e-7 * fundamental.norm()
        );
    }

    #[test]
    fn right_epipole_is_left_center_image() {
        let (left, right) = stereo_pair();
        let fundamental = FundamentalMatrix::from_calibrations(&left, &right).unwrap();
        let (_, epipole) = fundamental.epipoles(1e-12, 1000).unwrap();
        let expected = ProjectionMatrix::from_calibration(&right)
            .project(&optical_center(&left.extrinsic).unwrap());
        // Both are homogeneous, so compare them after normalization.
        assert_relative_eq!(
            epipole.xy() / epipole.z,
            expected.xy() / expected.z,
            max_relative = 1e-6
        );
    }

    #[test]
    fn transpose_swaps_lines() {
        let (left, right) = stereo_pair();
        let fundamental = FundamentalMatrix::from_calibrations(&left, &right).unwrap();
        let swapped = fundamental.transpose();
        let a = Vector3::new(100.0, 200.0, 1.0);
        let b = Vector3::new(150.0, 210.0, 1.0);
        assert_eq!(fundamental.right_line(&a), swapped.left_line(&a));
        assert_eq!(fundamental.left_line(&b), swapped.right_line(&b));
    }

    #[test]
    fn singular_extrinsic_is_rejected() {
        let (left, right) = stereo_pair();
        let broken = CameraCalibration::new(left.intrinsic, Matrix4::zeros());
        assert_eq!(
            FundamentalMatrix::from_calibrations(&broken, &right),
            Err(homolog_core::Error::SingularExtrinsic)
        );
        assert_eq!(
            compute_fundamental(
                &left.intrinsic,
                &left.extrinsic,
                &right.intrinsic,
                &Matrix4::zeros(),
                DEFAULT_SVD_EPSILON,
                DEFAULT_SVD_MAX_ITERATIONS,
            ),
            Err(homolog_core::Error::SingularExtrinsic)
        );
    }
}
