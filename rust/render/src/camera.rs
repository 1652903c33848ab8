// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orthographic view camera

use nalgebra::{Point3, Vector3};

/// Orthographic camera looking at the scene from a fixed direction.
///
/// Azimuth rotates around +Z, elevation tilts up from the XY plane.
/// The defaults (30°, -60°) match the usual 3D axes view of plotting tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    /// Unit vector from the scene toward the viewer
    eye: Vector3<f64>,
    /// Screen-right direction in world space
    right: Vector3<f64>,
    /// Screen-up direction in world space
    up: Vector3<f64>,
}

impl ViewCamera {
    pub fn new(elevation_deg: f64, azimuth_deg: f64) -> Self {
        let el = elevation_deg.to_radians();
        let az = azimuth_deg.to_radians();

        let eye = Vector3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin());
        let right = Vector3::new(-az.sin(), az.cos(), 0.0);
        let up = eye.cross(&right);

        Self { eye, right, up }
    }

    /// Screen coordinates `(x, y)` (y up) and depth toward the viewer
    #[inline]
    pub fn project(&self, point: &Point3<f64>) -> (f64, f64, f64) {
        let p = point.coords;
        (p.dot(&self.right), p.dot(&self.up), p.dot(&self.eye))
    }
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self::new(30.0, -60.0)
    }
}
