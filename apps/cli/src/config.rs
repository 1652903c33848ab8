// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration loaded from environment variables, overridden by
//! command line flags.

use clap::Parser;
use cylfit_geometry::{AxisDirection, CorrectionMode, Unit, Vector3};
use std::path::PathBuf;

/// Command line flags. Anything left unset falls back to [`Config::from_env`].
#[derive(Parser, Debug, Default)]
#[command(name = "cylinder-reconstruct")]
#[command(about = "Fit a cylinder to a scanned point cloud and project the points onto it", long_about = None)]
#[command(version)]
pub struct Args {
    /// Input .npz archive holding an N×3 point array
    pub input: Option<PathBuf>,

    /// Output .npz archive for the corrected points
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Array name inside the input and output archives
    #[arg(short, long)]
    pub key: Option<String>,

    /// Directory the PNG figures are written to
    #[arg(long)]
    pub render_dir: Option<PathBuf>,

    /// Skip writing figures
    #[arg(long)]
    pub no_render: bool,

    /// Point radius in pixels
    #[arg(long)]
    pub point_size: Option<u32>,

    /// Width and height of each figure in pixels
    #[arg(long)]
    pub image_size: Option<u32>,

    /// Iteration cap for the cylinder fit
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// How corrected points keep their axial position: projected or axis-aligned
    #[arg(long)]
    pub correction: Option<CorrectionMode>,

    /// Fit along this direction (e.g. "0,0,1") instead of the principal axis
    #[arg(long, value_parser = parse_axis, allow_hyphen_values = true)]
    pub axis: Option<AxisDirection>,
}

/// Run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Input point archive.
    pub input: PathBuf,
    /// Output point archive.
    pub output: PathBuf,
    /// Array name used for reading and writing.
    pub array_key: String,
    /// Directory for PNG figures.
    pub render_dir: PathBuf,
    /// Whether figures are written at all.
    pub render: bool,
    /// Point radius in pixels.
    pub point_size: u32,
    /// Figure width and height in pixels.
    pub image_size: u32,
    /// Maximum Levenberg–Marquardt iterations.
    pub max_iterations: usize,
    pub correction: CorrectionMode,
    /// Forced cylinder axis; `None` uses the principal axis.
    pub axis: Option<AxisDirection>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or unparsable values use defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            input: lookup("CYLFIT_INPUT")
                .unwrap_or_else(|| "3d_shape_points_data.npz".into())
                .into(),
            output: lookup("CYLFIT_OUTPUT")
                .unwrap_or_else(|| "reconstructed_shape.npz".into())
                .into(),
            array_key: lookup("CYLFIT_ARRAY_KEY")
                .unwrap_or_else(|| cylfit_core::npz::DEFAULT_ARRAY_KEY.into()),
            render_dir: lookup("CYLFIT_RENDER_DIR").unwrap_or_else(|| ".".into()).into(),
            render: lookup("CYLFIT_RENDER")
                .map(|value| parse_switch(&value))
                .unwrap_or(true),
            point_size: lookup("CYLFIT_POINT_SIZE")
                .unwrap_or_else(|| "1".into())
                .parse()
                .unwrap_or(1),
            image_size: lookup("CYLFIT_IMAGE_SIZE")
                .unwrap_or_else(|| "800".into())
                .parse()
                .unwrap_or(800),
            max_iterations: lookup("CYLFIT_MAX_ITERATIONS")
                .unwrap_or_else(|| "200".into())
                .parse()
                .unwrap_or(200),
            correction: lookup("CYLFIT_CORRECTION")
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
            axis: None,
        }
    }

    /// Apply command line flags on top of this configuration.
    pub fn with_args(mut self, args: Args) -> Self {
        if let Some(input) = args.input {
            self.input = input;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if let Some(key) = args.key {
            self.array_key = key;
        }
        if let Some(dir) = args.render_dir {
            self.render_dir = dir;
        }
        if args.no_render {
            self.render = false;
        }
        if let Some(size) = args.point_size {
            self.point_size = size;
        }
        if let Some(size) = args.image_size {
            self.image_size = size;
        }
        if let Some(iterations) = args.max_iterations {
            self.max_iterations = iterations;
        }
        if let Some(mode) = args.correction {
            self.correction = mode;
        }
        if args.axis.is_some() {
            self.axis = args.axis;
        }
        self
    }
}

/// "0", "false", "off" and "no" disable; anything else enables
fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}

/// Parse a direction given as three comma-separated components
pub fn parse_axis(value: &str) -> Result<AxisDirection, String> {
    let components = value
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid axis component in '{}': {}", value, e))?;

    let [x, y, z] = components[..] else {
        return Err(format!("axis needs 3 components, got {}", components.len()));
    };

    let direction = Vector3::new(x, y, z);
    let norm = direction.norm();
    if !norm.is_finite() || norm < 1e-12 {
        return Err(format!("axis '{}' has no usable direction", value));
    }
    Ok(Unit::new_normalize(direction))
}
