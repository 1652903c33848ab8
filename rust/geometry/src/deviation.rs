// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Signed radial deviation from a fitted cylinder

use crate::cylinder::CylinderModel;
use cylfit_core::PointCloud;
use rayon::prelude::*;

/// Signed radial deviation of every point from `model`'s surface.
///
/// Positive values lie outside the cylinder, negative values inside.
/// Output order matches `cloud`.
pub fn compute_deviations(cloud: &PointCloud, model: &CylinderModel) -> Vec<f64> {
    cloud
        .points()
        .par_iter()
        .map(|p| model.radial_deviation(p))
        .collect()
}

/// Value range of a deviation array, used for color scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationRange {
    pub min: f64,
    pub max: f64,
}

impl DeviationRange {
    /// Range over the finite values, `None` when there are none
    pub fn from_deviations(deviations: &[f64]) -> Option<Self> {
        deviations
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(None, |range, d| match range {
                None => Some(Self { min: d, max: d }),
                Some(r) => Some(Self {
                    min: r.min.min(d),
                    max: r.max.max(d),
                }),
            })
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map `value` into `[0, 1]` across the range (0.5 for a flat range)
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}
