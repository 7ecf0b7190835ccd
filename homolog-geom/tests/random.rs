use homolog_core::{
    nalgebra::{IsometryMatrix3, Matrix3, Point2, Point3, Rotation3, Vector3},
    CameraCalibration, PointSet,
};
use homolog_geom::compute_distances;
use homolog_pinhole::{CameraIntrinsics, FundamentalMatrix, ProjectionMatrix};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const SAMPLE_POINTS: usize = 32;
const ROUNDS: usize = 200;
const TRUE_PAIR_THRESHOLD: f64 = 1e-6;
const FALSE_PAIR_THRESHOLD: f64 = 1e-3;

const ROT_MAGNITUDE: f64 = 0.2;
const POINT_BOX_SIZE: f64 = 2.0;
const POINT_DISTANCE: f64 = 5.0;

#[test]
fn homologous_pairs_have_zero_distance() {
    let mut rng = Pcg64::seed_from_u64(0);
    let mut separated = 0;
    let mut off_diagonal = 0;
    for _ in 0..ROUNDS {
        let (left, right, fundamental) = some_test_data(&mut rng);
        let distances = compute_distances(&left, &right, &fundamental);
        for i in 0..SAMPLE_POINTS {
            for j in 0..SAMPLE_POINTS {
                let distance = distances[(i, j)];
                if i == j {
                    assert!(
                        distance < TRUE_PAIR_THRESHOLD,
                        "homologous pair {} has distance {}",
                        i,
                        distance
                    );
                } else {
                    off_diagonal += 1;
                    if distance > FALSE_PAIR_THRESHOLD {
                        separated += 1;
                    }
                }
            }
        }
    }
    eprintln!("separated: {} of {}", separated, off_diagonal);
    assert!(separated as f64 > 0.95 * off_diagonal as f64);
}

#[test]
fn role_swap_transposes() {
    let mut rng = Pcg64::seed_from_u64(1);
    for _ in 0..ROUNDS {
        let (left, right, fundamental) = some_test_data(&mut rng);
        let forward = compute_distances(&left, &right, &fundamental);
        let backward = compute_distances(&right, &left, &fundamental.transpose());
        assert_eq!(backward, forward.transpose());
    }
}

#[test]
fn fundamental_is_near_rank_two() {
    let mut rng = Pcg64::seed_from_u64(2);
    for _ in 0..ROUNDS {
        let (_, _, fundamental) = some_test_data(&mut rng);
        let singular = fundamental.singular_values();
        let largest = singular.max();
        let smallest = singular.min();
        assert!(
            smallest < 1e-8 * largest,
            "singular values {:?} are not rank 2",
            singular
        );
    }
}

fn random_vector(rng: &mut Pcg64, magnitude: f64) -> Vector3<f64> {
    Vector3::from_fn(|_, _| rng.gen_range(-magnitude..magnitude))
}

fn random_intrinsic(rng: &mut Pcg64) -> Matrix3<f64> {
    CameraIntrinsics::identity()
        .focals([rng.gen_range(400.0..1200.0), rng.gen_range(400.0..1200.0)].into())
        .principal_point(Point2::new(
            rng.gen_range(300.0..340.0),
            rng.gen_range(220.0..260.0),
        ))
        .skew(rng.gen_range(-1.0..1.0))
        .matrix()
}

/// Gets the projections of random scene points in a random stereo pair and the fundamental
/// matrix of the pair. The `i`-th left point and the `i`-th right point are homologous.
fn some_test_data(rng: &mut Pcg64) -> (PointSet, PointSet, FundamentalMatrix) {
    let intrinsic = random_intrinsic(rng);
    // The left camera sits at the world origin and the right camera is offset by a random
    // baseline with a random orientation.
    let left = CameraCalibration::from_pose(intrinsic, IsometryMatrix3::identity());
    let mut baseline = random_vector(rng, 1.0);
    baseline.x += 1.5 * baseline.x.signum();
    let right = CameraCalibration::from_pose(
        intrinsic,
        IsometryMatrix3::from_parts(
            baseline.into(),
            Rotation3::new(random_vector(rng, ROT_MAGNITUDE)),
        ),
    );

    let scene: Vec<Point3<f64>> = (0..SAMPLE_POINTS)
        .map(|_| {
            let mut point = Point3::from(random_vector(rng, 0.5 * POINT_BOX_SIZE));
            point.z += POINT_DISTANCE;
            point
        })
        .collect();

    let project = |calibration: &CameraCalibration| -> PointSet {
        let projection = ProjectionMatrix::from_calibration(calibration);
        scene
            .iter()
            .map(|point| {
                projection
                    .project_point(point)
                    .expect("scene point on the principal plane")
            })
            .collect()
    };

    let fundamental = FundamentalMatrix::from_calibrations(&left, &right).unwrap();
    (project(&left), project(&right), fundamental)
}
