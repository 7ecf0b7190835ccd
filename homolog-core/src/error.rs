/// Precondition violations reported by the matching pipeline.
///
/// Numerical degeneracies (a rank deficient projection, an epipolar line at infinity) are not
/// errors; they are absorbed by the stage that meets them.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{name} matrix must be {expected:?} but it is {actual:?}")]
    Dimension {
        name: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("extrinsic matrix is not invertible")]
    SingularExtrinsic,
    #[error("homogeneous point lies at infinity")]
    PointAtInfinity,
    #[error("{name} contains a non-finite value")]
    NonFinite { name: &'static str },
    #[error("singular value decomposition did not converge")]
    SvdDidNotConverge,
    #[error("pseudo-inverse failed: {0}")]
    PseudoInverse(&'static str),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
