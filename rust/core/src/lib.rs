// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cylfit Core
//!
//! Point cloud data model and archive I/O shared by the cylinder
//! reconstruction crates.
//!
//! ## Overview
//!
//! - **Point clouds**: an ordered, immutable list of `f64` points with
//!   centroid and bounding-box helpers
//! - **NumPy archives**: loading and saving `(N, 3)` arrays stored in
//!   `.npz` files, the format scans are exchanged in
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cylfit_core::{npz, PointCloud};
//!
//! let cloud = npz::load_points("scan.npz", npz::DEFAULT_ARRAY_KEY)?;
//! println!("{} points, centroid {:?}", cloud.len(), cloud.centroid());
//! npz::save_points("copy.npz", npz::DEFAULT_ARRAY_KEY, &cloud)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for point clouds and bounds

pub mod error;
pub mod npz;
pub mod point_cloud;

pub use error::{Error, Result};
pub use point_cloud::{Bounds, PointCloud};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
