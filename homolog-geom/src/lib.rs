//! This crate scores every pairing of a left and a right image point by how well the pair agrees
//! with the epipolar geometry of a calibrated stereo pair.
//!
//! ## Symmetric epipolar distance
//!
//! - `x` a point in the left image
//! - `x'` a point in the right image
//! - `F` the fundamental matrix of the pair
//! - `l' = F x` the epipolar line of `x` in the right image
//! - `l = transpose(F) x'` the epipolar line of `x'` in the left image
//!
//! ```text
//!   left image                 right image
//!   +---------------+          +---------------+
//!   |   l           |          |           l'  |
//!   |  /            |          |          /    |
//!   | /  d(x, l)    |          |  x' ---/      |
//!   |/   x          |          |  d(x', l')    |
//!   +---------------+          +---------------+
//! ```
//!
//! The distance of the pair is `d(x', l') + d(x, l)`, the sum of the euclidean distances in
//! pixels from each point to the epipolar line induced by the other. A pair of homologous points
//! has a distance of zero up to noise. An epipolar line with no direction (its first two
//! coefficients are zero) cannot be measured against, and any pair involving it is scored
//! `f64::INFINITY` so that it is never selected.

mod distance;
pub mod epipolar;

pub use distance::*;
pub use epipolar::compute_distances;
