use homolog_match::MatchPolicy;
use homolog_pinhole::{DEFAULT_SVD_EPSILON, DEFAULT_SVD_MAX_ITERATIONS};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings of the matching process.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MatcherSettings {
    /// The maximum symmetric epipolar distance in pixels of an accepted correspondence
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_maximum_distance")
    )]
    pub maximum_distance: f64,
    /// The maximum number of points extracted from each image, or `0` for no bound
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_maximum_corners")
    )]
    pub maximum_corners: usize,
    /// Project the fundamental matrix onto the closest rank-2 matrix before scoring
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_enforce_rank2"))]
    pub enforce_rank2: bool,
    /// How eligible pairs are turned into correspondences
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_policy"))]
    pub policy: MatchPolicy,
    /// The threshold by which singular value decompositions are considered complete
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_svd_epsilon"))]
    pub svd_epsilon: f64,
    /// The maximum iterations of singular value decompositions
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_svd_max_iterations")
    )]
    pub svd_max_iterations: usize,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            maximum_distance: default_maximum_distance(),
            maximum_corners: default_maximum_corners(),
            enforce_rank2: default_enforce_rank2(),
            policy: default_policy(),
            svd_epsilon: default_svd_epsilon(),
            svd_max_iterations: default_svd_max_iterations(),
        }
    }
}

fn default_maximum_distance() -> f64 {
    5.0
}

fn default_maximum_corners() -> usize {
    100
}

fn default_enforce_rank2() -> bool {
    false
}

fn default_policy() -> MatchPolicy {
    MatchPolicy::Greedy
}

fn default_svd_epsilon() -> f64 {
    DEFAULT_SVD_EPSILON
}

fn default_svd_max_iterations() -> usize {
    DEFAULT_SVD_MAX_ITERATIONS
}
