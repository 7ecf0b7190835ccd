use crate::{Error, Result};
use nalgebra::{DMatrix, IsometryMatrix3, Matrix3, Matrix4};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The calibration of one camera of the stereo pair.
///
/// * `intrinsic` maps camera-frame rays to pixel coordinates (focal lengths, skew, principal point)
/// * `extrinsic` is the homogeneous world-to-camera transform and must be invertible
///
/// The calibration is read-only input, supplied once per run for each of the left and the right
/// camera.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraCalibration {
    pub intrinsic: Matrix3<f64>,
    pub extrinsic: Matrix4<f64>,
}

impl CameraCalibration {
    pub fn new(intrinsic: Matrix3<f64>, extrinsic: Matrix4<f64>) -> Self {
        Self {
            intrinsic,
            extrinsic,
        }
    }

    /// Creates the calibration from a rigid world-to-camera pose.
    pub fn from_pose(intrinsic: Matrix3<f64>, pose: IsometryMatrix3<f64>) -> Self {
        Self::new(intrinsic, pose.to_homogeneous())
    }

    /// Creates the calibration from dynamically sized matrices, as they come out of a
    /// calibration file reader.
    ///
    /// The intrinsic matrix must be `3×3`. The extrinsic matrix must be `4×4`, or `3×4` in which
    /// case it is extended with the row `[0 0 0 1]`.
    ///
    /// ```
    /// use homolog_core::{CameraCalibration, Error};
    /// use homolog_core::nalgebra::{DMatrix, Matrix4};
    /// let intrinsic = DMatrix::identity(3, 3);
    /// let extrinsic = DMatrix::identity(3, 4);
    /// let calibration = CameraCalibration::from_dynamic(&intrinsic, &extrinsic).unwrap();
    /// assert_eq!(calibration.extrinsic, Matrix4::identity());
    ///
    /// let bad = DMatrix::identity(2, 3);
    /// assert!(matches!(
    ///     CameraCalibration::from_dynamic(&bad, &extrinsic),
    ///     Err(Error::Dimension { name: "intrinsic", .. }),
    /// ));
    /// ```
    pub fn from_dynamic(intrinsic: &DMatrix<f64>, extrinsic: &DMatrix<f64>) -> Result<Self> {
        if intrinsic.shape() != (3, 3) {
            return Err(Error::Dimension {
                name: "intrinsic",
                expected: (3, 3),
                actual: intrinsic.shape(),
            });
        }
        let intrinsic = Matrix3::from_fn(|row, column| intrinsic[(row, column)]);
        let extrinsic = match extrinsic.shape() {
            (4, 4) => Matrix4::from_fn(|row, column| extrinsic[(row, column)]),
            (3, 4) => Matrix4::from_fn(|row, column| match row {
                3 if column == 3 => 1.0,
                3 => 0.0,
                _ => extrinsic[(row, column)],
            }),
            actual => {
                return Err(Error::Dimension {
                    name: "extrinsic",
                    expected: (4, 4),
                    actual,
                })
            }
        };
        let calibration = Self::new(intrinsic, extrinsic);
        calibration.validate()?;
        Ok(calibration)
    }

    /// Checks that both matrices only hold finite values and that the extrinsic matrix is
    /// invertible.
    pub fn validate(&self) -> Result<()> {
        if self.intrinsic.iter().any(|n| !n.is_finite()) {
            return Err(Error::NonFinite { name: "intrinsic" });
        }
        if self.extrinsic.iter().any(|n| !n.is_finite()) {
            return Err(Error::NonFinite { name: "extrinsic" });
        }
        self.inverse_extrinsic().map(|_| ())
    }

    /// The camera-to-world transform.
    pub fn inverse_extrinsic(&self) -> Result<Matrix4<f64>> {
        self.extrinsic
            .try_inverse()
            .filter(|inverse| inverse.iter().all(|n| n.is_finite()))
            .ok_or(Error::SingularExtrinsic)
    }
}
