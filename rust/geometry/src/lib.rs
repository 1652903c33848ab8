// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cylfit Geometry
//!
//! Cylinder reconstruction for scanned point clouds: principal-axis
//! estimation, plane projection, Levenberg–Marquardt refinement of the
//! cross-section, radial deviation and radial correction onto the fitted
//! surface. Built on nalgebra, with rayon for the per-point passes.
//!
//! ```rust,ignore
//! use cylfit_geometry::{reconstruct, ReconstructOptions};
//!
//! let result = reconstruct(&cloud, &ReconstructOptions::default())?;
//! println!("radius {:.4}", result.fit.model.radius);
//! ```

pub mod correction;
pub mod cylinder;
pub mod deviation;
pub mod error;
pub mod fit;
pub mod orientation;
pub mod pipeline;
pub mod projection;
pub mod solver;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Unit, Vector3};

pub use correction::{correct_points, CorrectionMode};
pub use cylinder::CylinderModel;
pub use deviation::{compute_deviations, DeviationRange};
pub use error::{Error, Result};
pub use fit::{fit_cylinder, fit_cylinder_auto, CylinderFit, FitOptions, MIN_FIT_POINTS};
pub use orientation::{estimate_orientation, Orientation};
pub use pipeline::{reconstruct, ReconstructOptions, Reconstruction};
pub use projection::{perpendicular_distances, plane_basis, project_onto_plane, project_point};
pub use solver::{LeastSquaresProblem, LevenbergMarquardt, LmOptions, LmReport, Termination};

/// Axis direction shared by every stage of the reconstruction
pub type AxisDirection = Unit<Vector3<f64>>;
