// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during cylinder fitting and correction
#[derive(Error, Debug)]
pub enum Error {
    #[error("Too few points: need at least {required}, found {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("Point {index} lies on the cylinder axis (distance {distance:e})")]
    PointOnAxis { index: usize, distance: f64 },

    #[error("Invalid cylinder model: {0}")]
    InvalidModel(String),

    #[error("Cylinder fit failed: {0}")]
    FitFailed(String),

    #[error("Core error: {0}")]
    CoreError(#[from] cylfit_core::Error),
}
