// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end reconstruction
//!
//! Runs the stages in strict sequence:
//! 1. Orientation (centroid and principal axes)
//! 2. Cylinder fit along the principal axis, or a caller-supplied axis
//! 3. Signed radial deviations against the fitted model
//! 4. Radial correction onto the fitted surface

use crate::correction::{correct_points, CorrectionMode};
use crate::deviation::compute_deviations;
use crate::error::Result;
use crate::fit::{fit_cylinder, CylinderFit, FitOptions};
use crate::orientation::{estimate_orientation, Orientation};
use crate::AxisDirection;
use cylfit_core::PointCloud;

/// Options for [`reconstruct`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReconstructOptions {
    pub fit: FitOptions,
    pub correction: CorrectionMode,
    /// Fit along this axis instead of the principal axis
    pub axis: Option<AxisDirection>,
}

/// Everything produced by one reconstruction pass
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub orientation: Orientation,
    pub fit: CylinderFit,
    /// Signed radial deviation of each input point, in input order
    pub deviations: Vec<f64>,
    /// Input points moved radially onto the fitted surface
    pub corrected: PointCloud,
}

/// Fit a cylinder to `cloud` and project the points onto it
pub fn reconstruct(cloud: &PointCloud, options: &ReconstructOptions) -> Result<Reconstruction> {
    let span = tracing::info_span!("reconstruct", points = cloud.len());
    let _enter = span.enter();

    let orientation = estimate_orientation(cloud)?;
    tracing::info!(
        centroid = ?orientation.centroid,
        principal_axis = ?orientation.axis(),
        variances = ?orientation.variances,
        "Estimated orientation"
    );

    let axis = match options.axis {
        Some(axis) => {
            tracing::info!(axis = ?axis, "Using caller-supplied axis");
            axis
        }
        None => orientation.axis(),
    };

    let fit = fit_cylinder(cloud, axis, &options.fit)?;
    let deviations = compute_deviations(cloud, &fit.model);
    let corrected = correct_points(cloud, &fit.model, options.correction)?;

    tracing::info!(
        radius = fit.model.radius,
        iterations = fit.report.iterations,
        correction = %options.correction,
        "Reconstruction complete"
    );

    Ok(Reconstruction {
        orientation,
        fit,
        deviations,
        corrected,
    })
}
