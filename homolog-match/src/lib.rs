//! This crate turns a [`DistanceMatrix`] into a set of homologous point [`Correspondences`].
//!
//! Only pairs with a finite distance no greater than the threshold are eligible. Two policies
//! are available and both produce an injective matching, so every left point and every right
//! point is used at most once:
//!
//! * [`MatchPolicy::Greedy`] repeatedly accepts the eligible pair with the smallest distance
//!   whose endpoints are both still free
//! * [`MatchPolicy::MutualBest`] only accepts a pair when each point is the other's closest
//!   eligible partner
//!
//! Both are pure functions of the matrix and the threshold. Ties are broken by the lowest left
//! index, then the lowest right index, so the output is fully deterministic.

mod correspondences;

pub use correspondences::*;

use float_ord::FloatOrd;
use homolog_core::Correspondence;
use homolog_geom::DistanceMatrix;
use log::*;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// How eligible pairs are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum MatchPolicy {
    /// Accept pairs in ascending order of distance while both endpoints are free.
    #[default]
    Greedy,
    /// Accept a pair only when both points are each other's best eligible partner.
    MutualBest,
}

impl MatchPolicy {
    /// Resolves the matrix with this policy. See [`resolve`] and [`resolve_mutual`].
    pub fn resolve(self, distances: &DistanceMatrix, max_distance: f64) -> Correspondences {
        match self {
            Self::Greedy => resolve(distances, max_distance),
            Self::MutualBest => resolve_mutual(distances, max_distance),
        }
    }
}

fn is_eligible(distance: f64, max_distance: f64) -> bool {
    // A NaN threshold makes this false for every distance.
    distance.is_finite() && distance <= max_distance
}

/// Greedily resolves the matrix into an injective set of correspondences.
///
/// All pairs `(i, j)` with a finite `distances[(i, j)] <= max_distance` are sorted by distance,
/// then by `i`, then by `j`. Each pair is accepted when neither `i` nor `j` has been accepted
/// yet. A point with no eligible partner stays unmatched.
///
/// ```
/// use homolog_geom::DistanceMatrix;
/// use homolog_match::resolve;
/// let distances = DistanceMatrix::from_row_slice(2, 2, &[
///     0.5, 40.0,
///     41.0, 0.7,
/// ]);
/// let correspondences = resolve(&distances, 5.0);
/// assert_eq!(correspondences.right_homologous(), &[Some(0), Some(1)]);
/// assert_eq!(correspondences.left_homologous(), &[Some(0), Some(1)]);
/// ```
pub fn resolve(distances: &DistanceMatrix, max_distance: f64) -> Correspondences {
    let mut candidates: Vec<(usize, usize, f64)> = distances
        .entries()
        .filter(|&(_, _, distance)| is_eligible(distance, max_distance))
        .collect();
    debug!(
        "{} eligible pairs under the threshold {}",
        candidates.len(),
        max_distance
    );
    candidates.sort_unstable_by_key(|&(left, right, distance)| (FloatOrd(distance), left, right));

    let mut correspondences = Correspondences::new(distances.left_len(), distances.right_len());
    for (left, right, distance) in candidates {
        correspondences.try_insert(Correspondence::new(left, right, distance));
    }
    let correspondences = correspondences.finish();
    info!(
        "resolved {} correspondences between {} left and {} right points",
        correspondences.len(),
        distances.left_len(),
        distances.right_len()
    );
    correspondences
}

/// Resolves the matrix by cross-checking.
///
/// The pair `(i, j)` is accepted when `j` is the closest eligible partner of `i` and `i` is the
/// closest eligible partner of `j`. Among equally close partners the lowest index wins. This
/// never accepts more pairs than [`resolve`] but rejects ambiguous points.
pub fn resolve_mutual(distances: &DistanceMatrix, max_distance: f64) -> Correspondences {
    let best_left: Vec<Option<usize>> = (0..distances.right_len())
        .map(|right| {
            let column = (0..distances.left_len()).map(|left| (left, distances[(left, right)]));
            best_partner(column, max_distance).map(|(left, _)| left)
        })
        .collect();

    let mut correspondences = Correspondences::new(distances.left_len(), distances.right_len());
    for left in 0..distances.left_len() {
        let row = (0..distances.right_len()).map(|right| (right, distances[(left, right)]));
        if let Some((right, distance)) = best_partner(row, max_distance) {
            if best_left[right] == Some(left) {
                correspondences.try_insert(Correspondence::new(left, right, distance));
            }
        }
    }
    info!(
        "cross-checked {} correspondences between {} left and {} right points",
        correspondences.len(),
        distances.left_len(),
        distances.right_len()
    );
    correspondences.finish()
}

fn best_partner(
    candidates: impl Iterator<Item = (usize, f64)>,
    max_distance: f64,
) -> Option<(usize, f64)> {
    candidates
        .filter(|&(_, distance)| is_eligible(distance, max_distance))
        .min_by_key(|&(index, distance)| (FloatOrd(distance), index))
}

#[cfg(test)]
mod test {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn pairs(correspondences: &Correspondences) -> Vec<(usize, usize)> {
        correspondences.iter().map(|c| (c.left, c.right)).collect()
    }

    #[test]
    fn no_cross_assignment() {
        let distances = DistanceMatrix::from_row_slice(2, 2, &[0.5, 40.0, 41.0, 0.7]);
        for policy in [MatchPolicy::Greedy, MatchPolicy::MutualBest] {
            let correspondences = policy.resolve(&distances, 5.0);
            assert_eq!(pairs(&correspondences), vec![(0, 0), (1, 1)]);
            assert_eq!(correspondences.total_distance(), 0.5 + 0.7);
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let distances = DistanceMatrix::from_row_slice(1, 2, &[5.0, 5.000001]);
        assert_eq!(pairs(&resolve(&distances, 5.0)), vec![(0, 0)]);
        assert!(resolve(&distances, 4.999).is_empty());
    }

    #[test]
    fn greedy_takes_smallest_first() {
        // The optimal assignment would be (0, 1) and (1, 0) with a total of 2.0, but greedy
        // commits to the 0.1 pair.
        let distances = DistanceMatrix::from_row_slice(2, 2, &[0.1, 1.0, 1.0, 4.0]);
        let correspondences = resolve(&distances, 3.0);
        assert_eq!(pairs(&correspondences), vec![(0, 0)]);
        assert_eq!(correspondences.right_homologous(), &[Some(0), None]);
        assert_eq!(correspondences.left_homologous(), &[Some(0), None]);
    }

    #[test]
    fn ties_prefer_lowest_indices() {
        let distances = DistanceMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(pairs(&resolve(&distances, 5.0)), vec![(0, 0), (1, 1)]);
        let distances = DistanceMatrix::from_row_slice(2, 3, &[2.0, 1.0, 1.0, 1.0, 3.0, 3.0]);
        assert_eq!(pairs(&resolve(&distances, 5.0)), vec![(0, 1), (1, 0)]);
        assert_eq!(
            pairs(&resolve_mutual(&distances, 5.0)),
            vec![(0, 1), (1, 0)]
        );
    }

    #[test]
    fn non_finite_entries_are_never_matched() {
        let distances = DistanceMatrix::from_row_slice(2, 2, &[INF, f64::NAN, 2.0, INF]);
        assert_eq!(pairs(&resolve(&distances, INF)), vec![(1, 0)]);
        assert_eq!(pairs(&resolve_mutual(&distances, INF)), vec![(1, 0)]);
        assert!(resolve(&distances, f64::NAN).is_empty());
    }

    #[test]
    fn empty_matrix() {
        for (rows, columns) in [(0, 0), (3, 0), (0, 4)] {
            let distances = DistanceMatrix::from_row_slice(rows, columns, &[]);
            let correspondences = resolve(&distances, 5.0);
            assert!(correspondences.is_empty());
            assert_eq!(correspondences.right_homologous().len(), rows);
            assert_eq!(correspondences.left_homologous().len(), columns);
            assert!(resolve_mutual(&distances, 5.0).is_empty());
        }
    }

    #[test]
    fn mutual_rejects_one_sided_preference() {
        // Left 1 prefers right 0, but right 0 prefers left 0.
        let distances = DistanceMatrix::from_row_slice(2, 2, &[0.5, 3.0, 1.0, 2.0]);
        assert_eq!(pairs(&resolve_mutual(&distances, 5.0)), vec![(0, 0)]);
        assert_eq!(pairs(&resolve(&distances, 5.0)), vec![(0, 0), (1, 1)]);
    }
}
