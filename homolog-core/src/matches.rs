use crate::KeyPoint;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A left point and the right point associated with it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointMatch<P = KeyPoint>(pub P, pub P);

/// An accepted pair of homologous points, given by their indices in the left and right
/// [`PointSet`](crate::PointSet) and the epipolar distance that backs the association.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Correspondence {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

impl Correspondence {
    pub fn new(left: usize, right: usize, distance: f64) -> Self {
        Self {
            left,
            right,
            distance,
        }
    }
}
