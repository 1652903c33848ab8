// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Radial shape correction onto a fitted cylinder
//!
//! Each point's perpendicular vector from the axis is rescaled to the
//! model radius:
//!
//! ```text
//! corrected = center + (radius / |perp|) · perp + axial part
//! ```
//!
//! The axial part is reconstructed according to [`CorrectionMode`].

use crate::cylinder::CylinderModel;
use crate::error::{Error, Result};
use cylfit_core::PointCloud;
use nalgebra::Point3;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Points closer to the axis than this cannot be pushed out radially
pub const AXIS_EPSILON: f64 = 1e-12;

/// How the axial component of a corrected point is restored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorrectionMode {
    /// Add back `((p - center) · axis) · axis`. Valid for any axis orientation.
    #[default]
    Projected,
    /// Overwrite the third coordinate with the input's.
    ///
    /// Only exact when the axis is parallel to the third coordinate axis;
    /// for tilted axes it shifts points off the fitted surface.
    AxisAligned,
}

impl fmt::Display for CorrectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionMode::Projected => write!(f, "projected"),
            CorrectionMode::AxisAligned => write!(f, "axis-aligned"),
        }
    }
}

impl FromStr for CorrectionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projected" => Ok(CorrectionMode::Projected),
            "axis-aligned" | "axis_aligned" | "z" => Ok(CorrectionMode::AxisAligned),
            other => Err(format!(
                "unknown correction mode '{}', expected 'projected' or 'axis-aligned'",
                other
            )),
        }
    }
}

/// Move one point radially onto the cylinder surface
fn correct_point(
    index: usize,
    point: &Point3<f64>,
    model: &CylinderModel,
    mode: CorrectionMode,
) -> Result<Point3<f64>> {
    let perp = model.perpendicular(point);
    let distance = perp.norm();
    if !(distance > AXIS_EPSILON) {
        return Err(Error::PointOnAxis { index, distance });
    }

    let on_surface = model.center + perp * (model.radius / distance);

    Ok(match mode {
        CorrectionMode::Projected => {
            on_surface + model.axis.as_ref() * model.axial_coordinate(point)
        }
        CorrectionMode::AxisAligned => Point3::new(on_surface.x, on_surface.y, point.z),
    })
}

/// Project every point of `cloud` radially onto `model`'s surface.
///
/// Returns a new cloud with the same length and ordering.
///
/// # Errors
///
/// - [`Error::InvalidModel`] for a non-positive or non-finite radius
/// - [`Error::PointOnAxis`] when a point lies on the axis, where the radial
///   direction is undefined (if several do, one of them is reported)
pub fn correct_points(
    cloud: &PointCloud,
    model: &CylinderModel,
    mode: CorrectionMode,
) -> Result<PointCloud> {
    model.validate()?;

    let points = cloud
        .points()
        .par_iter()
        .enumerate()
        .map(|(i, p)| correct_point(i, p, model, mode))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(points = points.len(), mode = %mode, "Corrected points onto cylinder");
    Ok(PointCloud::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviation::compute_deviations;
    use approx::assert_relative_eq;
    use nalgebra::{Unit, Vector3};

    fn deformed_cloud(model: &CylinderModel) -> PointCloud {
        (0..200)
            .map(|i| {
                let angle = i as f64 * 0.173;
                let height = (i % 17) as f64 - 8.0;
                let on_surface = model.surface_point(angle, height);
                let bump = 0.3 * (3.0 * angle).sin();
                on_surface + model.perpendicular(&on_surface).normalize() * bump
            })
            .collect()
    }

    #[test]
    fn test_round_trip_deviation_is_zero() {
        let axis = Unit::new_normalize(Vector3::new(0.4, -0.2, 1.0));
        let model = CylinderModel::new(Point3::new(1.0, 1.0, 0.0), 3.0, axis);
        let cloud = deformed_cloud(&model);

        let corrected = correct_points(&cloud, &model, CorrectionMode::Projected).unwrap();
        assert_eq!(corrected.len(), cloud.len());
        for d in compute_deviations(&corrected, &model) {
            assert_relative_eq!(d, 0.0, epsilon = 1e-10);
        }
        // Axial position is untouched
        for (p, q) in cloud.iter().zip(corrected.iter()) {
            assert_relative_eq!(
                model.axial_coordinate(p),
                model.axial_coordinate(q),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_correction_is_idempotent_on_surface_points() {
        let model = CylinderModel::new(Point3::new(-2.0, 0.5, 4.0), 1.25, Vector3::z_axis());
        let cloud: PointCloud = (0..50)
            .map(|i| model.surface_point(i as f64 * 0.5, i as f64 * 0.2))
            .collect();

        for mode in [CorrectionMode::Projected, CorrectionMode::AxisAligned] {
            let corrected = correct_points(&cloud, &model, mode).unwrap();
            for (p, q) in cloud.iter().zip(corrected.iter()) {
                assert_relative_eq!(p, q, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_modes_agree_for_z_axis() {
        let model = CylinderModel::new(Point3::new(0.5, -0.5, 2.0), 2.0, Vector3::z_axis());
        let cloud = deformed_cloud(&model);

        let projected = correct_points(&cloud, &model, CorrectionMode::Projected).unwrap();
        let aligned = correct_points(&cloud, &model, CorrectionMode::AxisAligned).unwrap();
        for (p, q) in projected.iter().zip(aligned.iter()) {
            assert_relative_eq!(p, q, epsilon = 1e-10);
        }
        for (p, q) in cloud.iter().zip(aligned.iter()) {
            assert_eq!(p.z, q.z);
        }
    }

    #[test]
    fn test_axis_aligned_mode_is_inexact_for_tilted_axis() {
        let axis = Unit::new_normalize(Vector3::new(1.0, 0.0, 1.0));
        let model = CylinderModel::new(Point3::origin(), 2.0, axis);
        let cloud = deformed_cloud(&model);

        let aligned = correct_points(&cloud, &model, CorrectionMode::AxisAligned).unwrap();
        let worst = compute_deviations(&aligned, &model)
            .into_iter()
            .fold(0.0_f64, |acc, d| acc.max(d.abs()));
        assert!(worst > 1e-3);
    }

    #[test]
    fn test_point_on_axis_is_rejected() {
        let model = CylinderModel::new(Point3::origin(), 1.0, Vector3::z_axis());
        let cloud = PointCloud::new(vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 2.0, 1.0),
        ]);

        match correct_points(&cloud, &model, CorrectionMode::Projected) {
            Err(Error::PointOnAxis { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected PointOnAxis, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let model = CylinderModel::new(Point3::origin(), 0.0, Vector3::z_axis());
        let cloud = PointCloud::new(vec![Point3::new(1.0, 0.0, 0.0)]);
        assert!(matches!(
            correct_points(&cloud, &model, CorrectionMode::Projected),
            Err(Error::InvalidModel(_))
        ));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("projected".parse::<CorrectionMode>(), Ok(CorrectionMode::Projected));
        assert_eq!("Axis-Aligned".parse::<CorrectionMode>(), Ok(CorrectionMode::AxisAligned));
        assert!("spherical".parse::<CorrectionMode>().is_err());
        assert_eq!(CorrectionMode::AxisAligned.to_string(), "axis-aligned");
    }
}
