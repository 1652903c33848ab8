// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cylinder fitting with a fixed axis
//!
//! The axis direction is held fixed; the solver refines three parameters
//! `(a, b, r)`. The candidate axis passes through `centroid + a·u + b·v`,
//! where `(u, v)` is the in-plane basis of the axis, and `r` is the radius.
//! For an axis along +Z these are exactly the world X/Y offsets of the
//! center from the centroid. The axial coordinate of the center is always
//! inherited from the centroid.
//!
//! Residual per point: `|perp(p)| - r`. The starting radius is the median
//! perpendicular distance from the axis through the centroid, which keeps
//! a few stray points from dragging the initial guess.

use crate::cylinder::CylinderModel;
use crate::error::{Error, Result};
use crate::orientation::{ensure_finite, estimate_orientation};
use crate::projection::{perpendicular_distances, plane_basis, project_point};
use crate::solver::{LeastSquaresProblem, LevenbergMarquardt, LmOptions, LmReport};
use crate::AxisDirection;
use cylfit_core::PointCloud;
use nalgebra::{DMatrix, DVector, Point3, Vector3};

/// Fewest points for a well-posed fit: more residuals than the 3 parameters
pub const MIN_FIT_POINTS: usize = 6;

/// Perpendicular distances below this are treated as "on the axis"
const AXIS_DISTANCE_EPSILON: f64 = 1e-12;

/// Options for [`fit_cylinder`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitOptions {
    /// Least-squares solver settings
    pub solver: LmOptions,
}

/// A fitted cylinder together with how the solver got there
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderFit {
    /// Refined model
    pub model: CylinderModel,
    /// Model at the starting point (centroid, median radius)
    pub initial: CylinderModel,
    /// Solver outcome
    pub report: LmReport,
}

/// Residuals `|perp(p)| - r` for a candidate center in the axis plane
struct CylinderProblem<'a> {
    points: &'a [Point3<f64>],
    axis: AxisDirection,
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
}

impl CylinderProblem<'_> {
    #[inline]
    fn center(&self, params: &DVector<f64>) -> Point3<f64> {
        self.origin + self.u * params[0] + self.v * params[1]
    }
}

impl LeastSquaresProblem for CylinderProblem<'_> {
    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        let center = self.center(params);
        let radius = params[2];
        DVector::from_iterator(
            self.points.len(),
            self.points
                .iter()
                .map(|p| project_point(p, &self.axis, &center).norm() - radius),
        )
    }

    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64> {
        let center = self.center(params);
        let mut jac = DMatrix::zeros(self.points.len(), 3);

        for (i, p) in self.points.iter().enumerate() {
            let perp = project_point(p, &self.axis, &center);
            let dist = perp.norm();
            // u and v are already perpendicular to the axis, so moving the
            // center by u shifts perp by exactly -u
            if dist > AXIS_DISTANCE_EPSILON {
                jac[(i, 0)] = -perp.dot(&self.u) / dist;
                jac[(i, 1)] = -perp.dot(&self.v) / dist;
            }
            jac[(i, 2)] = -1.0;
        }
        jac
    }
}

/// Fit a cylinder with the given fixed `axis` to `cloud`.
///
/// # Errors
///
/// - [`Error::TooFewPoints`] for fewer than [`MIN_FIT_POINTS`] points
/// - [`Error::NonFiniteCoordinate`] for a NaN or infinite coordinate
/// - [`Error::DegenerateGeometry`] when all points coincide or all lie on
///   a single line parallel to the axis
/// - [`Error::FitFailed`] when the solver returns non-finite parameters or
///   a non-positive radius
///
/// A solve that stops at the iteration limit is accepted and logged.
pub fn fit_cylinder(
    cloud: &PointCloud,
    axis: AxisDirection,
    options: &FitOptions,
) -> Result<CylinderFit> {
    if cloud.len() < MIN_FIT_POINTS {
        return Err(Error::TooFewPoints {
            required: MIN_FIT_POINTS,
            found: cloud.len(),
        });
    }
    ensure_finite(cloud)?;
    if !axis.iter().all(|c| c.is_finite()) {
        return Err(Error::DegenerateGeometry(format!(
            "axis direction is not finite: {:?}",
            axis.as_ref()
        )));
    }

    let centroid = cloud.centroid().ok_or(Error::TooFewPoints {
        required: MIN_FIT_POINTS,
        found: 0,
    })?;

    let distances = perpendicular_distances(cloud.points(), &axis, &centroid);
    let spread = distances.iter().fold(0.0_f64, |acc, &d| acc.max(d));
    if !(spread > AXIS_DISTANCE_EPSILON) {
        return Err(Error::DegenerateGeometry(
            "points have no extent perpendicular to the axis".to_string(),
        ));
    }

    let initial_radius = median(&distances);
    let initial = CylinderModel::new(centroid, initial_radius, axis);

    let (u, v) = plane_basis(&axis);
    let problem = CylinderProblem {
        points: cloud.points(),
        axis,
        origin: centroid,
        u,
        v,
    };

    let solver = LevenbergMarquardt::new(options.solver);
    let report = solver.minimize(&problem, DVector::from_vec(vec![0.0, 0.0, initial_radius]));

    if !report.params.iter().all(|p| p.is_finite()) {
        return Err(Error::FitFailed(format!(
            "solver produced non-finite parameters after {} iterations ({:?})",
            report.iterations, report.termination
        )));
    }

    let radius = report.params[2];
    if !(radius > 0.0) {
        return Err(Error::FitFailed(format!(
            "solver produced a non-positive radius {}",
            radius
        )));
    }

    let model = CylinderModel::new(problem.center(&report.params), radius, axis);

    if report.termination.converged() {
        tracing::debug!(
            iterations = report.iterations,
            termination = ?report.termination,
            cost = report.cost,
            "Cylinder fit converged"
        );
    } else {
        tracing::warn!(
            iterations = report.iterations,
            termination = ?report.termination,
            cost = report.cost,
            "Cylinder fit did not converge, accepting last iterate"
        );
    }

    tracing::info!(
        initial_radius,
        radius = model.radius,
        center = ?model.center,
        "Fitted cylinder"
    );

    Ok(CylinderFit {
        model,
        initial,
        report,
    })
}

/// Estimate the principal axis of `cloud`, then fit a cylinder along it
pub fn fit_cylinder_auto(cloud: &PointCloud, options: &FitOptions) -> Result<CylinderFit> {
    let orientation = estimate_orientation(cloud)?;
    fit_cylinder(cloud, orientation.axis(), options)
}

/// Median with the mean of the two middle values for even lengths
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}
