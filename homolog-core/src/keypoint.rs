use crate::{Error, Result};
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::{Point2, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Allows the retrieval of the point on the image the feature came from.
pub trait ImagePoint {
    /// Retrieves the point on the image
    fn image_point(&self) -> Point2<f64>;

    /// Retrieves the point as the homogeneous vector `(x, y, 1)`.
    fn homogeneous(&self) -> Vector3<f64> {
        self.image_point().to_homogeneous()
    }
}

/// A point on an image frame in pixel coordinates.
///
/// This is the homogeneous 2d point produced by a detector. It is immutable once created and
/// always normalized so that its homogeneous form is `(x, y, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KeyPoint(pub Point2<f64>);

impl KeyPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Point2::new(x, y))
    }

    /// Builds a keypoint from any homogeneous vector by dividing through by its last component.
    ///
    /// ```
    /// use homolog_core::{Error, KeyPoint};
    /// use homolog_core::nalgebra::Vector3;
    /// let kp = KeyPoint::from_homogeneous(Vector3::new(20.0, 10.0, 2.0)).unwrap();
    /// assert_eq!(kp, KeyPoint::new(10.0, 5.0));
    /// assert_eq!(
    ///     KeyPoint::from_homogeneous(Vector3::new(1.0, 1.0, 0.0)),
    ///     Err(Error::PointAtInfinity),
    /// );
    /// ```
    pub fn from_homogeneous(homogeneous: Vector3<f64>) -> Result<Self> {
        if homogeneous.iter().any(|n| !n.is_finite()) {
            return Err(Error::NonFinite { name: "keypoint" });
        }
        Point2::from_homogeneous(homogeneous)
            .filter(|point| point.coords.iter().all(|n| n.is_finite()))
            .map(Self)
            .ok_or(Error::PointAtInfinity)
    }
}

impl ImagePoint for KeyPoint {
    fn image_point(&self) -> Point2<f64> {
        self.0
    }
}

impl ImagePoint for Point2<f64> {
    fn image_point(&self) -> Point2<f64> {
        *self
    }
}
