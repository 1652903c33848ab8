// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point cloud figures
//!
//! Renders point clouds as static 3D scatter plots to PNG:
//! 1. The raw scan in a single color
//! 2. The scan colored by signed radial deviation (jet colormap + colorbar)
//! 3. The corrected cloud in a single color
//!
//! All figures share a fixed oblique orthographic view.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cylfit_render::{render_deviations, render_points, RenderOptions, palette};
//!
//! let options = RenderOptions::default();
//! render_points(&cloud, palette::SCAN, &options)?.save("scan.png")?;
//! render_deviations(&cloud, &deviations, &options)?.save("deviation.png")?;
//! ```

pub mod camera;
pub mod colormap;
pub mod error;
pub mod scatter;

pub use camera::ViewCamera;
pub use colormap::jet;
pub use error::{Error, Result};
pub use scatter::{palette, render_deviations, render_points, save_png, RenderOptions};
