use derive_more::{AsRef, Deref, From, Into};
use homolog_core::nalgebra::DMatrix;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The symmetric epipolar distance of every pairing of a left and a right point.
///
/// Entry `(i, j)` is the distance between the `i`-th left point and the `j`-th right point.
/// Entries are non-negative or `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, AsRef, Deref, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DistanceMatrix(pub DMatrix<f64>);

impl DistanceMatrix {
    /// Builds the matrix from its entries in row-major order.
    pub fn from_row_slice(left_len: usize, right_len: usize, entries: &[f64]) -> Self {
        Self(DMatrix::from_row_slice(left_len, right_len, entries))
    }

    pub fn from_fn(left_len: usize, right_len: usize, f: impl FnMut(usize, usize) -> f64) -> Self {
        Self(DMatrix::from_fn(left_len, right_len, f))
    }

    /// The number of left points (rows).
    pub fn left_len(&self) -> usize {
        self.0.nrows()
    }

    /// The number of right points (columns).
    pub fn right_len(&self) -> usize {
        self.0.ncols()
    }

    /// The distance between left point `left` and right point `right`, if both are in range.
    pub fn distance(&self, left: usize, right: usize) -> Option<f64> {
        self.0.get((left, right)).copied()
    }

    /// The matrix with the roles of the images swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Iterates over `(left, right, distance)` for every entry, row by row.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.left_len()).flat_map(move |left| {
            (0..self.right_len()).map(move |right| (left, right, self.0[(left, right)]))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entries_are_row_major() {
        let matrix = DistanceMatrix::from_row_slice(2, 3, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(matrix.left_len(), 2);
        assert_eq!(matrix.right_len(), 3);
        assert_eq!(matrix.distance(1, 0), Some(3.0));
        assert_eq!(matrix.distance(2, 0), None);
        let entries: Vec<_> = matrix.entries().collect();
        assert_eq!(entries[4], (1, 1, 4.0));
        assert_eq!(matrix.transpose().distance(2, 1), Some(5.0));
    }
}
