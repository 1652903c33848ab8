// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection onto the plane perpendicular to an axis
//!
//! Every stage of the reconstruction works with the component of
//! `p - reference` orthogonal to the axis:
//!
//! ```text
//! perp = (p - ref) - ((p - ref) · axis) * axis
//! ```
//!
//! The result stays a 3D vector lying in the perpendicular plane; it is not
//! reduced to 2D coordinates.

use crate::AxisDirection;
use nalgebra::{Point3, Vector3};

/// Component of `point - reference` orthogonal to `axis`
#[inline]
pub fn project_point(
    point: &Point3<f64>,
    axis: &AxisDirection,
    reference: &Point3<f64>,
) -> Vector3<f64> {
    let n = axis.as_ref();
    let v = point - reference;
    v - n * v.dot(n)
}

/// Project every point onto the plane through `reference` perpendicular to `axis`
pub fn project_onto_plane(
    points: &[Point3<f64>],
    axis: &AxisDirection,
    reference: &Point3<f64>,
) -> Vec<Vector3<f64>> {
    points
        .iter()
        .map(|p| project_point(p, axis, reference))
        .collect()
}

/// Distance of every point from the line through `reference` along `axis`
pub fn perpendicular_distances(
    points: &[Point3<f64>],
    axis: &AxisDirection,
    reference: &Point3<f64>,
) -> Vec<f64> {
    points
        .iter()
        .map(|p| project_point(p, axis, reference).norm())
        .collect()
}

/// Two unit vectors `(u, v)` spanning the plane perpendicular to `axis`.
///
/// `(u, v, axis)` is right-handed. For `axis = +Z` the basis is exactly
/// `(+X, +Y)`, so in-plane coordinates coincide with world X/Y.
pub fn plane_basis(axis: &AxisDirection) -> (Vector3<f64>, Vector3<f64>) {
    let n = axis.as_ref();

    // Helper must not be parallel to the axis
    let helper = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };

    let u = (helper - n * helper.dot(n)).normalize();
    let v = n.cross(&u);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Unit;

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-4.5, 0.25, 7.0),
            Point3::new(10.0, -3.0, -2.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.3, 0.3, 100.0),
        ]
    }

    #[test]
    fn test_projection_is_orthogonal_to_axis() {
        let axes = [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.3, -0.7, 2.0),
            Vector3::new(-1.0, 0.0, 0.0),
        ];
        let reference = Point3::new(0.5, -1.0, 2.0);

        for axis in axes {
            let axis = Unit::new_normalize(axis);
            for perp in project_onto_plane(&sample_points(), &axis, &reference) {
                assert_relative_eq!(perp.dot(axis.as_ref()), 0.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_projection_along_z_drops_z() {
        let axis = Vector3::z_axis();
        let perp = project_point(&Point3::new(3.0, 4.0, 12.0), &axis, &Point3::new(1.0, 1.0, 5.0));
        assert_relative_eq!(perp, Vector3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn test_perpendicular_distances() {
        let axis = Vector3::z_axis();
        let points = [Point3::new(3.0, 4.0, -1.0), Point3::new(0.0, 0.0, 8.0)];
        let distances = perpendicular_distances(&points, &axis, &Point3::origin());
        assert_relative_eq!(distances[0], 5.0);
        assert_relative_eq!(distances[1], 0.0);
    }

    #[test]
    fn test_plane_basis_for_z_is_xy() {
        let (u, v) = plane_basis(&Vector3::z_axis());
        assert_relative_eq!(u, Vector3::x());
        assert_relative_eq!(v, Vector3::y());
    }

    #[test]
    fn test_plane_basis_is_orthonormal() {
        for axis in [Vector3::x(), Vector3::new(0.95, 0.1, 0.0), Vector3::new(1.0, 2.0, 3.0)] {
            let axis = Unit::new_normalize(axis);
            let (u, v) = plane_basis(&axis);
            assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
            assert_relative_eq!(u.dot(axis.as_ref()), 0.0, epsilon = 1e-12);
            assert_relative_eq!(u.cross(&v), axis.into_inner(), epsilon = 1e-12);
        }
    }
}
