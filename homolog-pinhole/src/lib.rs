//! This crate plugs into `homolog-core` and provides the projective geometry of a calibrated
//! stereo pair of pinhole cameras. It builds the `3×4` projection matrix of each camera from its
//! intrinsic and extrinsic calibration and derives the [`FundamentalMatrix`] that relates pixels
//! in the left image to epipolar lines in the right image (and back).

mod fundamental;
mod projection;
mod skew;

pub use fundamental::*;
pub use projection::*;
pub use skew::*;

use homolog_core::nalgebra::{Matrix3, Point2, Vector2};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This contains intrinsic camera parameters as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters).
///
/// It is a convenience to build the `3×3` intrinsic matrix of a
/// [`CameraCalibration`](homolog_core::CameraCalibration) from named parameters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    pub focals: Vector2<f64>,
    pub principal_point: Point2<f64>,
    pub skew: f64,
}

impl CameraIntrinsics {
    /// Creates camera intrinsics that would create an identity intrinsic matrix.
    /// This would imply that the pixel positions have an origin at `0,0`,
    /// the pixel distance unit is the focal length, pixels are square,
    /// and there is no skew.
    pub fn identity() -> Self {
        Self {
            focals: Vector2::new(1.0, 1.0),
            skew: 0.0,
            principal_point: Point2::new(0.0, 0.0),
        }
    }

    pub fn focals(self, focals: Vector2<f64>) -> Self {
        Self { focals, ..self }
    }

    pub fn focal(self, focal: f64) -> Self {
        Self {
            focals: Vector2::new(focal, focal),
            ..self
        }
    }

    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    pub fn skew(self, skew: f64) -> Self {
        Self { skew, ..self }
    }

    /// Reads the parameters back out of an upper triangular intrinsic matrix.
    ///
    /// The matrix is normalized by its bottom-right entry first. Returns `None` if that entry
    /// is zero.
    pub fn from_matrix(matrix: &Matrix3<f64>) -> Option<Self> {
        let scale = matrix[(2, 2)];
        if scale == 0.0 {
            return None;
        }
        let matrix = matrix / scale;
        Some(Self {
            focals: Vector2::new(matrix[(0, 0)], matrix[(1, 1)]),
            principal_point: Point2::new(matrix[(0, 2)], matrix[(1, 2)]),
            skew: matrix[(0, 1)],
        })
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focals.x,  self.skew,      self.principal_point.x,
            0.0,            self.focals.y,  self.principal_point.y,
            0.0,            0.0,            1.0,
        )
    }
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self::identity()
    }
}
