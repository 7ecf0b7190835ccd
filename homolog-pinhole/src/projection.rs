use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use homolog_core::{
    nalgebra::{Matrix3, Matrix3x4, Matrix4, Matrix4x3, Point3, Vector3, Vector4, SVD},
    CameraCalibration, Error, KeyPoint, Result,
};

/// The `3×4` matrix which projects homogeneous world points to homogeneous pixels.
///
/// It is composed as `P = K · [I|0] · E` from the intrinsic matrix `K` and the world-to-camera
/// extrinsic matrix `E`.
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, Deref, DerefMut, From, Into)]
pub struct ProjectionMatrix(pub Matrix3x4<f64>);

impl ProjectionMatrix {
    /// Builds `P = intrinsic · [I|0] · extrinsic`.
    ///
    /// ```
    /// use homolog_core::nalgebra::{Matrix3, Matrix4, Vector4};
    /// use homolog_pinhole::ProjectionMatrix;
    /// let projection = ProjectionMatrix::derive(&Matrix3::identity(), &Matrix4::identity());
    /// assert_eq!(projection.project(&Vector4::new(1.0, 2.0, 3.0, 1.0)).z, 3.0);
    /// ```
    pub fn derive(intrinsic: &Matrix3<f64>, extrinsic: &Matrix4<f64>) -> Self {
        Self(intrinsic * canonical_projection() * extrinsic)
    }

    pub fn from_calibration(calibration: &CameraCalibration) -> Self {
        Self::derive(&calibration.intrinsic, &calibration.extrinsic)
    }

    /// Projects a homogeneous world point to a homogeneous pixel.
    pub fn project(&self, world: &Vector4<f64>) -> Vector3<f64> {
        self.0 * world
    }

    /// Projects a euclidean world point to a pixel.
    ///
    /// Returns `None` when the point projects to infinity (it lies on the principal plane).
    pub fn project_point(&self, world: &Point3<f64>) -> Option<KeyPoint> {
        KeyPoint::from_homogeneous(self.project(&world.to_homogeneous())).ok()
    }

    /// Computes the Moore–Penrose pseudo-inverse of the projection with a singular value
    /// decomposition.
    ///
    /// A projection matrix is not square and thus has no ordinary inverse. Singular values
    /// below `epsilon` are treated as zero, so a rank deficient projection still yields a
    /// result.
    pub fn pseudo_inverse(&self, epsilon: f64, max_iterations: usize) -> Result<Matrix4x3<f64>> {
        let svd = SVD::try_new(self.0, true, true, epsilon, max_iterations)
            .ok_or(Error::SvdDidNotConverge)?;
        svd.pseudo_inverse(epsilon).map_err(Error::PseudoInverse)
    }
}

/// The `[I|0]` matrix which drops the homogeneous component of a camera point.
#[rustfmt::skip]
fn canonical_projection() -> Matrix3x4<f64> {
    Matrix3x4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
    )
}

/// See [`ProjectionMatrix::derive`].
pub fn derive_projection(intrinsic: &Matrix3<f64>, extrinsic: &Matrix4<f64>) -> ProjectionMatrix {
    ProjectionMatrix::derive(intrinsic, extrinsic)
}

/// The optical center of a camera in homogeneous world coordinates.
///
/// This is the last column of the inverted extrinsic matrix, the position the camera-to-world
/// transform sends the camera origin to.
pub fn optical_center(extrinsic: &Matrix4<f64>) -> Result<Vector4<f64>> {
    extrinsic
        .try_inverse()
        .filter(|inverse| inverse.iter().all(|n| n.is_finite()))
        .map(|inverse| inverse.column(3).into_owned())
        .ok_or(Error::SingularExtrinsic)
}
