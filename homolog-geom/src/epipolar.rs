//! Scoring of candidate pairs against the epipolar constraint.

use crate::DistanceMatrix;
use homolog_core::{nalgebra::Vector3, PointSet};
use homolog_pinhole::FundamentalMatrix;
use log::*;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The euclidean distance in pixels from a homogeneous point to a line `a u + b v + c = 0`.
///
/// The point must be normalized so that its last component is `1`. A line whose direction
/// `(a, b)` is zero (or not finite) has no meaningful distance and gives `f64::INFINITY`, as does
/// any computation that produces `NaN`.
///
/// ```
/// use homolog_core::nalgebra::Vector3;
/// use homolog_geom::epipolar::point_line_distance;
/// // The line `v = 2`.
/// let line = Vector3::new(0.0, 1.0, -2.0);
/// assert_eq!(point_line_distance(&Vector3::new(5.0, 7.0, 1.0), &line), 5.0);
/// assert_eq!(
///     point_line_distance(&Vector3::new(5.0, 7.0, 1.0), &Vector3::new(0.0, 0.0, 1.0)),
///     f64::INFINITY,
/// );
/// ```
pub fn point_line_distance(point: &Vector3<f64>, line: &Vector3<f64>) -> f64 {
    let norm = line.xy().norm();
    if norm == 0.0 || !norm.is_finite() {
        return f64::INFINITY;
    }
    let distance = point.dot(line).abs() / norm;
    if distance.is_nan() {
        f64::INFINITY
    } else {
        distance
    }
}

/// The symmetric epipolar distance of a single pair of homogeneous points.
///
/// This is the distance from `right` to the epipolar line of `left` in the right image plus the
/// distance from `left` to the epipolar line of `right` in the left image.
pub fn symmetric_epipolar_distance(
    fundamental: &FundamentalMatrix,
    left: &Vector3<f64>,
    right: &Vector3<f64>,
) -> f64 {
    pair_distance(
        left,
        right,
        &fundamental.right_line(left),
        &fundamental.left_line(right),
    )
}

fn pair_distance(
    left: &Vector3<f64>,
    right: &Vector3<f64>,
    right_line: &Vector3<f64>,
    left_line: &Vector3<f64>,
) -> f64 {
    point_line_distance(right, right_line) + point_line_distance(left, left_line)
}

/// Computes the symmetric epipolar distance of every pair of a left and a right point.
///
/// The result has one row per left point and one column per right point. If either set is
/// empty the matrix is empty.
///
/// Computing with the sets swapped and the transposed fundamental matrix gives exactly the
/// transposed matrix.
///
/// ```
/// use homolog_core::{KeyPoint, PointSet};
/// use homolog_core::nalgebra::Matrix3;
/// use homolog_geom::compute_distances;
/// use homolog_pinhole::FundamentalMatrix;
/// // A rectified pair: homologous points share the same row.
/// let fundamental = FundamentalMatrix(Matrix3::new(
///     0.0, 0.0, 0.0,
///     0.0, 0.0, -1.0,
///     0.0, 1.0, 0.0,
/// ));
/// let left: PointSet = vec![KeyPoint::new(10.0, 10.0), KeyPoint::new(50.0, 50.0)].into();
/// let right: PointSet = vec![KeyPoint::new(4.0, 10.0), KeyPoint::new(40.0, 48.0)].into();
/// let distances = compute_distances(&left, &right, &fundamental);
/// assert_eq!(distances.distance(0, 0), Some(0.0));
/// assert_eq!(distances.distance(1, 1), Some(4.0));
/// assert_eq!(distances.distance(0, 1), Some(76.0));
/// ```
pub fn compute_distances(
    left: &PointSet,
    right: &PointSet,
    fundamental: &FundamentalMatrix,
) -> DistanceMatrix {
    info!(
        "computing epipolar distances between {} left and {} right points",
        left.len(),
        right.len()
    );
    let left_points = left.homogeneous_points();
    let right_points = right.homogeneous_points();

    // Each line only depends on one point, so compute them once rather than per pair.
    let right_lines: Vec<Vector3<f64>> =
        left_points.iter().map(|p| fundamental.right_line(p)).collect();
    let left_lines: Vec<Vector3<f64>> =
        right_points.iter().map(|p| fundamental.left_line(p)).collect();

    let row = |i: usize| {
        let left_point = &left_points[i];
        let right_line = &right_lines[i];
        right_points
            .iter()
            .zip(&left_lines)
            .map(move |(right_point, left_line)| {
                pair_distance(left_point, right_point, right_line, left_line)
            })
    };

    #[cfg(not(feature = "rayon"))]
    let entries: Vec<f64> = (0..left_points.len()).flat_map(row).collect();
    #[cfg(feature = "rayon")]
    let entries: Vec<f64> = (0..left_points.len())
        .into_par_iter()
        .flat_map_iter(row)
        .collect();

    let distances = DistanceMatrix::from_row_slice(left_points.len(), right_points.len(), &entries);
    debug!(
        "{} of {} pairs have a finite epipolar distance",
        entries.iter().filter(|d| d.is_finite()).count(),
        entries.len()
    );
    distances
}

#[cfg(test)]
mod test {
    use super::*;
    use homolog_core::{nalgebra::Matrix3, ImagePoint, KeyPoint};

    #[rustfmt::skip]
    fn rectified() -> FundamentalMatrix {
        FundamentalMatrix(Matrix3::new(
            0.0, 0.0,  0.0,
            0.0, 0.0, -1.0,
            0.0, 1.0,  0.0,
        ))
    }

    #[rustfmt::skip]
    fn skewed() -> FundamentalMatrix {
        FundamentalMatrix(Matrix3::new(
             1e-6, -3e-5,  2e-3,
             4e-5,  2e-6, -0.01,
            -1e-3, 0.012,  0.3,
        ))
    }

    fn points(coords: &[(f64, f64)]) -> PointSet {
        coords.iter().map(|&(x, y)| KeyPoint::new(x, y)).collect()
    }

    #[test]
    fn degenerate_line_is_infinite() {
        let point = Vector3::new(3.0, 4.0, 1.0);
        assert_eq!(point_line_distance(&point, &Vector3::new(0.0, 0.0, 2.5)), f64::INFINITY);
        assert_eq!(point_line_distance(&point, &Vector3::zeros()), f64::INFINITY);
        assert_eq!(
            point_line_distance(&point, &Vector3::new(f64::NAN, 1.0, 0.0)),
            f64::INFINITY
        );
    }

    #[test]
    fn zero_matrix_never_faults() {
        let left = points(&[(1.0, 2.0), (3.0, 4.0)]);
        let right = points(&[(5.0, 6.0)]);
        let distances = compute_distances(&left, &right, &FundamentalMatrix(Matrix3::zeros()));
        assert_eq!(distances.left_len(), 2);
        assert_eq!(distances.right_len(), 1);
        assert!(distances.iter().all(|&d| d == f64::INFINITY));
    }

    #[test]
    fn empty_sets() {
        let some = points(&[(1.0, 2.0), (3.0, 4.0)]);
        let none = PointSet::new();
        let distances = compute_distances(&some, &none, &rectified());
        assert_eq!((distances.left_len(), distances.right_len()), (2, 0));
        let distances = compute_distances(&none, &some, &rectified());
        assert_eq!((distances.left_len(), distances.right_len()), (0, 2));
        let distances = compute_distances(&none, &none, &rectified());
        assert!(distances.is_empty());
    }

    #[test]
    fn rectified_distances_are_twice_the_row_offset() {
        let left = points(&[(10.0, 10.0), (50.0, 50.0)]);
        let right = points(&[(12.0, 10.25), (48.0, 49.5)]);
        let distances = compute_distances(&left, &right, &rectified());
        assert_eq!(distances.distance(0, 0), Some(0.5));
        assert_eq!(distances.distance(1, 1), Some(1.0));
        assert_eq!(distances.distance(0, 1), Some(79.0));
        assert_eq!(distances.distance(1, 0), Some(79.5));
    }

    #[test]
    fn single_pair_agrees_with_matrix() {
        let fundamental = skewed();
        let left = points(&[(120.0, 80.0), (300.5, 220.25)]);
        let right = points(&[(110.0, 95.0), (280.0, 210.0), (5.0, 400.0)]);
        let distances = compute_distances(&left, &right, &fundamental);
        for (i, l) in left.iter().enumerate() {
            for (j, r) in right.iter().enumerate() {
                assert_eq!(
                    distances.distance(i, j),
                    Some(symmetric_epipolar_distance(
                        &fundamental,
                        &l.homogeneous(),
                        &r.homogeneous()
                    ))
                );
            }
        }
    }

    #[test]
    fn role_swap_transposes() {
        let fundamental = skewed();
        let left = points(&[(120.0, 80.0), (300.5, 220.25), (17.0, 3.0)]);
        let right = points(&[(110.0, 95.0), (280.0, 210.0)]);
        let forward = compute_distances(&left, &right, &fundamental);
        let backward = compute_distances(&right, &left, &fundamental.transpose());
        assert_eq!(backward, forward.transpose());
    }
}
