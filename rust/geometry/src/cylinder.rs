// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Circular cylinder model

use crate::error::{Error, Result};
use crate::projection::{plane_basis, project_point};
use crate::AxisDirection;
use nalgebra::{Point3, Vector3};

/// Infinite circular cylinder: a line through `center` along `axis` and a radius.
///
/// Only the two coordinates of `center` perpendicular to the axis carry
/// meaning for the surface; the axial coordinate is kept from the scan
/// centroid so corrected points stay in the scan's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderModel {
    /// Point on the cylinder axis
    pub center: Point3<f64>,
    /// Cylinder radius (always positive for a fitted model)
    pub radius: f64,
    /// Unit axis direction
    pub axis: AxisDirection,
}

impl CylinderModel {
    pub fn new(center: Point3<f64>, radius: f64, axis: AxisDirection) -> Self {
        Self {
            center,
            radius,
            axis,
        }
    }

    /// Check the model can be used for correction
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidModel(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if !self.center.coords.iter().all(|c| c.is_finite())
            || !self.axis.iter().all(|c| c.is_finite())
        {
            return Err(Error::InvalidModel(
                "center and axis must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Vector from the axis to `point`, perpendicular to the axis
    #[inline]
    pub fn perpendicular(&self, point: &Point3<f64>) -> Vector3<f64> {
        project_point(point, &self.axis, &self.center)
    }

    /// Distance from `point` to the axis line
    #[inline]
    pub fn distance_to_axis(&self, point: &Point3<f64>) -> f64 {
        self.perpendicular(point).norm()
    }

    /// Signed radial distance to the surface (positive outside, negative inside)
    #[inline]
    pub fn radial_deviation(&self, point: &Point3<f64>) -> f64 {
        self.distance_to_axis(point) - self.radius
    }

    /// Signed position of `point` along the axis, measured from `center`
    #[inline]
    pub fn axial_coordinate(&self, point: &Point3<f64>) -> f64 {
        (point - self.center).dot(self.axis.as_ref())
    }

    /// Point on the surface at `angle` (radians, from the first in-plane
    /// basis vector) and `height` along the axis from `center`
    pub fn surface_point(&self, angle: f64, height: f64) -> Point3<f64> {
        let (u, v) = plane_basis(&self.axis);
        self.center
            + (u * angle.cos() + v * angle.sin()) * self.radius
            + self.axis.as_ref() * height
    }
}
