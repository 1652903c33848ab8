// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colormaps for scalar point attributes

use image::Rgb;

/// Classic "jet" colormap: blue → cyan → yellow → red over `t ∈ [0, 1]`.
///
/// Values outside the unit interval are clamped; NaN maps to the low end.
pub fn jet(t: f64) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let channel = |center: f64| {
        let v = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };

    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(jet(0.0), Rgb([0, 0, 128]));
        assert_eq!(jet(0.5), Rgb([128, 255, 128]));
        assert_eq!(jet(1.0), Rgb([128, 0, 0]));
    }

    #[test]
    fn test_jet_clamps() {
        assert_eq!(jet(-3.0), jet(0.0));
        assert_eq!(jet(7.0), jet(1.0));
        assert_eq!(jet(f64::NAN), jet(0.0));
    }
}
