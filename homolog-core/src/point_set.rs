use crate::{ImagePoint, KeyPoint, Result};
use derive_more::{AsRef, Deref, From, Into};
use nalgebra::{Matrix3xX, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The ordered points detected in one image.
///
/// The position of a point in the set is its index for every later stage: row `i` of a distance
/// matrix refers to the `i`-th left point and column `j` to the `j`-th right point. Detectors
/// return their points ranked by confidence, so truncating the set keeps the best ones.
#[derive(Debug, Clone, Default, PartialEq, AsRef, Deref, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointSet(Vec<KeyPoint>);

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, point: KeyPoint) {
        self.0.push(point);
    }

    /// Keeps at most `max_points` points, dropping the tail of the ranking.
    #[must_use]
    pub fn truncated(mut self, max_points: usize) -> Self {
        self.0.truncate(max_points);
        self
    }

    /// Reads a `3×N` matrix whose columns are homogeneous points.
    ///
    /// Every column is normalized by its last component. A column at infinity or with a
    /// non-finite entry is rejected and no set is produced.
    ///
    /// ```
    /// use homolog_core::{KeyPoint, PointSet};
    /// use homolog_core::nalgebra::{Matrix3xX, Vector3};
    /// let columns = Matrix3xX::from_columns(&[
    ///     Vector3::new(10.0, 10.0, 1.0),
    ///     Vector3::new(100.0, 50.0, 2.0),
    /// ]);
    /// let points = PointSet::from_homogeneous_columns(&columns).unwrap();
    /// assert_eq!(points[1], KeyPoint::new(50.0, 25.0));
    /// ```
    pub fn from_homogeneous_columns(columns: &Matrix3xX<f64>) -> Result<Self> {
        columns
            .column_iter()
            .map(|column| KeyPoint::from_homogeneous(Vector3::new(column[0], column[1], column[2])))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Writes the set as a `3×N` matrix of `(x, y, 1)` columns.
    pub fn to_homogeneous_columns(&self) -> Matrix3xX<f64> {
        Matrix3xX::from_fn(self.0.len(), |row, column| self.0[column].homogeneous()[row])
    }

    /// The homogeneous vector of every point, in order.
    pub fn homogeneous_points(&self) -> Vec<Vector3<f64>> {
        self.0.iter().map(ImagePoint::homogeneous).collect()
    }
}

impl FromIterator<KeyPoint> for PointSet {
    fn from_iter<I: IntoIterator<Item = KeyPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a KeyPoint;
    type IntoIter = core::slice::Iter<'a, KeyPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for PointSet {
    type Item = KeyPoint;
    type IntoIter = std::vec::IntoIter<KeyPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
