// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D scatter plots rendered to RGB images

use crate::camera::ViewCamera;
use crate::colormap::jet;
use crate::error::{Error, Result};
use cylfit_core::PointCloud;
use cylfit_geometry::DeviationRange;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use nalgebra::{Point3, Vector3};
use std::path::Path;

/// Colors used by the standard figures
pub mod palette {
    use image::Rgb;

    /// Raw scan points
    pub const SCAN: Rgb<u8> = Rgb([31, 119, 180]);
    /// Corrected points
    pub const CORRECTED: Rgb<u8> = Rgb([44, 160, 44]);
    pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
    pub const FRAME: Rgb<u8> = Rgb([90, 90, 90]);
    pub const AXIS_X: Rgb<u8> = Rgb([200, 70, 70]);
    pub const AXIS_Y: Rgb<u8> = Rgb([70, 170, 70]);
    pub const AXIS_Z: Rgb<u8> = Rgb([70, 70, 200]);
}

/// Figure layout and style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Radius of each plotted point in pixels (0 draws single pixels)
    pub point_radius: i32,
    /// Blank border around the plot in pixels
    pub margin: u32,
    pub camera: ViewCamera,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            point_radius: 1,
            margin: 40,
            camera: ViewCamera::default(),
        }
    }
}

/// Width of the colorbar strip, including its gap to the plot
const COLORBAR_WIDTH: u32 = 40;

/// Maps projected screen coordinates into a pixel rectangle
struct Viewport {
    min_x: f64,
    max_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    /// Fit the projected extent of `corners` into `width × height` pixels,
    /// preserving aspect ratio
    fn fit(corners: &[(f64, f64, f64)], left: u32, top: u32, width: u32, height: u32) -> Self {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y, _) in corners {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let scale = (width as f64 / span_x).min(height as f64 / span_y);

        Self {
            min_x,
            max_y,
            scale,
            offset_x: left as f64 + 0.5 * (width as f64 - span_x * scale),
            offset_y: top as f64 + 0.5 * (height as f64 - span_y * scale),
        }
    }

    #[inline]
    fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (self.offset_x + (x - self.min_x) * self.scale) as f32,
            (self.offset_y + (self.max_y - y) * self.scale) as f32,
        )
    }
}

/// Render `cloud` in a single color
pub fn render_points(cloud: &PointCloud, color: Rgb<u8>, options: &RenderOptions) -> Result<RgbImage> {
    draw_scatter(cloud, |_| color, options, false)
}

/// Render `cloud` colored by `deviations` (one value per point) with a
/// jet colormap spanning the deviation range
pub fn render_deviations(
    cloud: &PointCloud,
    deviations: &[f64],
    options: &RenderOptions,
) -> Result<RgbImage> {
    if deviations.len() != cloud.len() {
        return Err(Error::LengthMismatch {
            points: cloud.len(),
            values: deviations.len(),
        });
    }

    let range = DeviationRange::from_deviations(deviations)
        .unwrap_or(DeviationRange { min: 0.0, max: 0.0 });
    tracing::debug!(min = range.min, max = range.max, "Deviation color range");

    draw_scatter(
        cloud,
        |i| jet(range.normalize(deviations[i])),
        options,
        true,
    )
}

/// Write a rendered figure as PNG
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image.save(path)?;
    tracing::info!(path = %path.display(), "Saved figure");
    Ok(())
}

fn draw_scatter<F>(
    cloud: &PointCloud,
    color_of: F,
    options: &RenderOptions,
    with_colorbar: bool,
) -> Result<RgbImage>
where
    F: Fn(usize) -> Rgb<u8>,
{
    let bounds = cloud.bounds().ok_or(Error::EmptyCloud)?;

    let reserved = 2 * options.margin + if with_colorbar { COLORBAR_WIDTH } else { 0 };
    if options.width <= reserved || options.height <= 2 * options.margin {
        return Err(Error::InvalidSize {
            width: options.width,
            height: options.height,
        });
    }
    let plot_width = options.width - reserved;
    let plot_height = options.height - 2 * options.margin;

    let camera = &options.camera;
    let corners: Vec<_> = box_corners(&bounds.min, &bounds.max)
        .iter()
        .map(|c| camera.project(c))
        .collect();
    let viewport = Viewport::fit(&corners, options.margin, options.margin, plot_width, plot_height);

    let mut image = RgbImage::from_pixel(options.width, options.height, palette::BACKGROUND);

    draw_axes(&mut image, &bounds.min, &bounds.max, camera, &viewport);

    // Far points first so nearer ones paint over them
    let mut order: Vec<(usize, f64, f64, f64)> = cloud
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let (x, y, depth) = camera.project(p);
            (i, x, y, depth)
        })
        .filter(|&(_, x, y, depth)| x.is_finite() && y.is_finite() && depth.is_finite())
        .collect();
    order.sort_by(|a, b| a.3.total_cmp(&b.3));

    for (i, x, y, _) in order {
        let (px, py) = viewport.to_pixel(x, y);
        let center = (px.round() as i32, py.round() as i32);
        draw_filled_circle_mut(&mut image, center, options.point_radius, color_of(i));
    }

    if with_colorbar {
        draw_colorbar(&mut image, options);
    }

    Ok(image)
}

fn box_corners(min: &Point3<f64>, max: &Point3<f64>) -> [Point3<f64>; 8] {
    [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(min.x, max.y, max.z),
        Point3::new(max.x, max.y, max.z),
    ]
}

/// Axis triad from the minimum corner of the bounding box
fn draw_axes(
    image: &mut RgbImage,
    min: &Point3<f64>,
    max: &Point3<f64>,
    camera: &ViewCamera,
    viewport: &Viewport,
) {
    let extent = max - min;
    let (ox, oy, _) = camera.project(min);
    let origin = viewport.to_pixel(ox, oy);

    let axes = [
        (Vector3::new(extent.x, 0.0, 0.0), palette::AXIS_X),
        (Vector3::new(0.0, extent.y, 0.0), palette::AXIS_Y),
        (Vector3::new(0.0, 0.0, extent.z), palette::AXIS_Z),
    ];
    for (dir, color) in axes {
        let (x, y, _) = camera.project(&(min + dir));
        draw_line_segment_mut(image, origin, viewport.to_pixel(x, y), color);
    }
}

/// Vertical jet gradient on the right edge, high values at the top
fn draw_colorbar(image: &mut RgbImage, options: &RenderOptions) {
    let bar_width = COLORBAR_WIDTH / 2;
    let left = options.width - options.margin - bar_width;
    let top = options.margin;
    let height = options.height - 2 * options.margin;

    for row in 0..height {
        let t = 1.0 - row as f64 / (height.max(2) - 1) as f64;
        let rect = Rect::at(left as i32, (top + row) as i32).of_size(bar_width, 1);
        draw_filled_rect_mut(image, rect, jet(t));
    }

    let frame = [
        ((left, top), (left + bar_width, top)),
        ((left, top + height), (left + bar_width, top + height)),
        ((left, top), (left, top + height)),
        ((left + bar_width, top), (left + bar_width, top + height)),
    ];
    for ((x0, y0), (x1, y1)) in frame {
        draw_line_segment_mut(
            image,
            (x0 as f32, y0 as f32),
            (x1 as f32, y1 as f32),
            palette::FRAME,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> PointCloud {
        (0..64)
            .map(|i| {
                let t = i as f64 * std::f64::consts::TAU / 64.0;
                Point3::new(2.0 * t.cos(), 2.0 * t.sin(), i as f64 * 0.1)
            })
            .collect()
    }

    #[test]
    fn test_render_points_size_and_content() {
        let options = RenderOptions {
            width: 200,
            height: 150,
            ..Default::default()
        };
        let image = render_points(&ring(), palette::CORRECTED, &options).unwrap();

        assert_eq!(image.dimensions(), (200, 150));
        assert!(image.pixels().any(|p| *p == palette::CORRECTED));
    }

    #[test]
    fn test_render_deviations_uses_colormap() {
        let cloud = ring();
        let deviations: Vec<f64> = (0..cloud.len()).map(|i| i as f64).collect();
        let image = render_deviations(&cloud, &deviations, &RenderOptions::default()).unwrap();

        // Both ends of the colormap appear (points and colorbar)
        assert!(image.pixels().any(|p| *p == jet(0.0)));
        assert!(image.pixels().any(|p| *p == jet(1.0)));
    }

    #[test]
    fn test_length_mismatch() {
        let result = render_deviations(&ring(), &[0.0, 1.0], &RenderOptions::default());
        assert!(matches!(
            result,
            Err(Error::LengthMismatch { points: 64, values: 2 })
        ));
    }

    #[test]
    fn test_empty_cloud() {
        let result = render_points(&PointCloud::default(), palette::SCAN, &RenderOptions::default());
        assert!(matches!(result, Err(Error::EmptyCloud)));
    }

    #[test]
    fn test_image_smaller_than_margins() {
        let options = RenderOptions {
            width: 50,
            height: 50,
            ..Default::default()
        };
        assert!(matches!(
            render_points(&ring(), palette::SCAN, &options),
            Err(Error::InvalidSize { .. })
        ));
    }
}
