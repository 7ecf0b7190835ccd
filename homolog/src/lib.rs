//! # `homolog`
//!
//! Matching of homologous points between two calibrated views.
//!
//! Two points are homologous when they are the projections of the same scene point in the left
//! and the right image. Given the calibration of both cameras, the epipolar constraint says
//! where the homologous point of a left point can be: somewhere on one line of the right image.
//! This crate extracts points from both images, scores every pairing by its symmetric distance
//! to the epipolar lines and keeps an injective set of pairs under a distance threshold.
//!
//! The pipeline is split across small crates which are re-exported here:
//!
//! ## Modules
//! * [`types`] - the point, point set, calibration and correspondence types
//! * [`camera`] - pinhole projection matrices and the fundamental matrix of a stereo pair
//! * [`geom`] - symmetric epipolar distance scoring
//! * [`matching`] - resolution of a distance matrix into correspondences
//! * [`feature`] - the reference corner detector
//!
//! ```no_run
//! use homolog::{HomologousMatcher, MatcherSettings};
//! use homolog::types::CameraCalibration;
//! use homolog::types::nalgebra::DMatrix;
//! use homolog::feature::shi_tomasi::ShiTomasi;
//!
//! let intrinsic = DMatrix::from_row_slice(3, 3, &[
//!     800.0, 0.0, 320.0,
//!     0.0, 800.0, 240.0,
//!     0.0, 0.0, 1.0,
//! ]);
//! // The right camera sits half a unit to the right of the left camera.
//! let baseline = DMatrix::from_row_slice(3, 4, &[
//!     1.0, 0.0, 0.0, -0.5,
//!     0.0, 1.0, 0.0, 0.0,
//!     0.0, 0.0, 1.0, 0.0,
//! ]);
//! let left = CameraCalibration::from_dynamic(&intrinsic, &DMatrix::identity(4, 4)).unwrap();
//! let right = CameraCalibration::from_dynamic(&intrinsic, &baseline).unwrap();
//! let matcher = HomologousMatcher::new(MatcherSettings::default());
//! let report = matcher
//!     .match_images(
//!         &ShiTomasi::default(),
//!         &left,
//!         &right,
//!         &homolog::image::open("left.png").unwrap(),
//!         &homolog::image::open("right.png").unwrap(),
//!     )
//!     .unwrap();
//! for pair in report.matched_points() {
//!     println!("{:?} <-> {:?}", pair.0, pair.1);
//! }
//! ```

mod pipeline;
mod settings;

pub use pipeline::*;
pub use settings::*;

pub use homolog_core as types;

/// Camera models and two-view geometry
pub mod camera {
    pub use homolog_pinhole::*;
}

/// Epipolar distance scoring
pub mod geom {
    pub use homolog_geom::*;
}

/// Resolution of distances into correspondences
pub mod matching {
    pub use homolog_match::*;
}

/// Feature detection
pub mod feature {
    /// The Shi-Tomasi corner detector
    #[cfg(feature = "shi-tomasi")]
    pub mod shi_tomasi {
        pub use shi_tomasi::*;
    }
}

/// The `image` crate the detector reads images with
#[cfg(feature = "shi-tomasi")]
pub use image;
