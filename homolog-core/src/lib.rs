//! # Homolog Core
//!
//! This library provides the common types shared by the crates that match homologous points
//! between two calibrated views. Homologous points are the pair of pixel locations in two images
//! which are projections of the same 3d scene point. All the crates of the workspace
//! (`homolog-pinhole`, `homolog-geom`, `homolog-match` and the `homolog` facade) exchange data
//! through the types defined here, so that a detector, a calibration loader and a downstream
//! reconstruction stage can be plugged together without conversions.
//!
//! The crate is deliberately small. It holds:
//!
//! * [`KeyPoint`] and the [`ImagePoint`] trait, a pixel location seen as the homogeneous
//!   vector `(x, y, 1)`
//! * [`PointSet`], the ordered points detected in one image, whose order defines the index
//!   used by every later stage
//! * [`CameraCalibration`], the intrinsic and extrinsic matrices of one camera
//! * [`Correspondence`] and [`PointMatch`], the result of associating two points
//! * [`Error`], the precondition violations reported by the pipeline
//!
//! ## Coordinates
//!
//! Image points use the usual raster frame: the X axis points right and the Y axis points down,
//! with the origin at the top-left pixel. Extrinsic matrices map world coordinates into the
//! camera frame (X right, Y down, Z forwards).
//!
//! ```text
//!   left image                 right image
//!   +---------------+          +---------------+
//!   |      i        |          |        j      |
//!   |      *  ------+--- l' ---+----*          |
//!   |               |          |               |
//!   +---------------+          +---------------+
//! ```
//!
//! A left point `i` induces the epipolar line `l'` in the right image on which its homologous
//! point `j` must lie.

mod camera;
mod error;
mod keypoint;
mod matches;
mod point_set;

pub use camera::*;
pub use error::*;
pub use keypoint::*;
pub use matches::*;
pub use nalgebra;
pub use point_set::*;
