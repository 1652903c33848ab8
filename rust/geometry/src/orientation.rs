// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Principal-axis orientation of a point cloud
//!
//! The centered covariance matrix is decomposed with a symmetric
//! eigen-solver; eigenvectors sorted by descending eigenvalue give the
//! directions of decreasing spread. For a dense sampling of a cylinder's
//! lateral surface that is long compared to its radius, the first axis
//! approximates the cylinder axis. That shape assumption is not checked.

use crate::error::{Error, Result};
use crate::AxisDirection;
use cylfit_core::PointCloud;
use nalgebra::{Matrix3, Point3, SymmetricEigen, Unit, Vector3};

/// Minimum number of points for a meaningful covariance
pub const MIN_ORIENTATION_POINTS: usize = 3;

/// Centroid and principal directions of a point cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Mean of all points
    pub centroid: Point3<f64>,
    /// Orthonormal principal directions, ordered by descending variance
    pub axes: [AxisDirection; 3],
    /// Variance of the points along each principal direction
    pub variances: [f64; 3],
}

impl Orientation {
    /// Direction of maximum spread
    #[inline]
    pub fn axis(&self) -> AxisDirection {
        self.axes[0]
    }
}

/// Reject clouds holding NaN or infinite coordinates
pub(crate) fn ensure_finite(cloud: &PointCloud) -> Result<()> {
    match cloud
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        Some(index) => Err(Error::NonFiniteCoordinate { index }),
        None => Ok(()),
    }
}

/// Estimate the centroid and principal axes of `cloud`.
///
/// Fails on fewer than [`MIN_ORIENTATION_POINTS`] points, on non-finite
/// coordinates, or when all points coincide. Coplanar or collinear clouds still produce an
/// orientation with vanishing trailing variances.
pub fn estimate_orientation(cloud: &PointCloud) -> Result<Orientation> {
    if cloud.len() < MIN_ORIENTATION_POINTS {
        return Err(Error::TooFewPoints {
            required: MIN_ORIENTATION_POINTS,
            found: cloud.len(),
        });
    }
    ensure_finite(cloud)?;

    let centroid = cloud.centroid().ok_or(Error::TooFewPoints {
        required: MIN_ORIENTATION_POINTS,
        found: 0,
    })?;

    let mut cov = Matrix3::zeros();
    for p in cloud.iter() {
        let diff = p - centroid;
        cov += diff * diff.transpose();
    }
    cov /= cloud.len() as f64;

    let eigen = SymmetricEigen::new(cov);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let variances = order.map(|i| eigen.eigenvalues[i].max(0.0));

    // Coincident points leave no spread to orient by
    let scale = centroid.coords.norm_squared().max(1.0);
    if !(variances[0] > f64::EPSILON * f64::EPSILON * scale) {
        return Err(Error::DegenerateGeometry(
            "all points coincide; principal axes are undefined".to_string(),
        ));
    }

    let axes = order.map(|i| canonical_direction(eigen.eigenvectors.column(i).into_owned()));

    tracing::debug!(
        points = cloud.len(),
        variances = ?variances,
        axis = ?axes[0],
        "Estimated principal axes"
    );

    Ok(Orientation {
        centroid,
        axes,
        variances,
    })
}

/// Normalize and flip `v` so its largest-magnitude component is positive
fn canonical_direction(v: Vector3<f64>) -> AxisDirection {
    let v = if v[v.iamax()] < 0.0 { -v } else { v };
    Unit::new_normalize(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cylinder_grid(axis: Vector3<f64>, radius: f64, length: f64) -> PointCloud {
        let axis = Unit::new_normalize(axis);
        let (u, v) = crate::projection::plane_basis(&axis);
        let mut points = Vec::new();
        for i in 0..36 {
            let theta = i as f64 * std::f64::consts::TAU / 36.0;
            for k in 0..21 {
                let h = (k as f64 / 20.0 - 0.5) * length;
                let p = (u * theta.cos() + v * theta.sin()) * radius + axis.as_ref() * h;
                points.push(Point3::from(p + Vector3::new(1.0, -2.0, 0.5)));
            }
        }
        PointCloud::new(points)
    }

    #[test]
    fn test_principal_axis_of_long_cylinder() {
        let true_axis = Vector3::new(1.0, 2.0, 3.0).normalize();
        let cloud = cylinder_grid(true_axis, 2.0, 30.0);

        let orientation = estimate_orientation(&cloud).unwrap();
        assert_relative_eq!(orientation.axis().dot(&true_axis).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(orientation.centroid, Point3::new(1.0, -2.0, 0.5), epsilon = 1e-9);
        assert!(orientation.variances[0] >= orientation.variances[1]);
        assert!(orientation.variances[1] >= orientation.variances[2]);
    }

    #[test]
    fn test_axes_are_orthonormal() {
        let cloud = cylinder_grid(Vector3::z(), 1.0, 10.0);
        let orientation = estimate_orientation(&cloud).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(
                    orientation.axes[i].dot(orientation.axes[j].as_ref()),
                    expected,
                    epsilon = 1e-9
                );
            }
        }
        // Sign is canonical: the z axis comes back as +Z
        assert_relative_eq!(orientation.axis().into_inner(), Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn test_too_few_points() {
        let cloud = PointCloud::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]);
        assert!(matches!(
            estimate_orientation(&cloud),
            Err(Error::TooFewPoints { required: 3, found: 2 })
        ));
    }

    #[test]
    fn test_nan_coordinate_is_reported_by_index() {
        let mut points = cylinder_grid(Vector3::z(), 1.0, 10.0).into_points();
        points[17].y = f64::NAN;

        assert!(matches!(
            estimate_orientation(&PointCloud::new(points)),
            Err(Error::NonFiniteCoordinate { index: 17 })
        ));
    }

    #[test]
    fn test_identical_points_are_degenerate() {
        let cloud = PointCloud::new(vec![Point3::new(4.0, 5.0, 6.0); 10]);
        assert!(matches!(
            estimate_orientation(&cloud),
            Err(Error::DegenerateGeometry(_))
        ));
    }
}
