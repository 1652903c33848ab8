// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! cylinder-reconstruct - fit a cylinder to a scanned shape and correct it
//!
//! Reads an N×3 point array from an .npz archive, fits a cylinder along the
//! principal axis (or a forced one), writes the scan, deviation and
//! corrected figures as PNG, and saves the corrected points.
//!
//! Usage:
//!   cylinder-reconstruct [INPUT] [--output FILE] [--axis x,y,z] [--no-render]

use anyhow::{Context, Result};
use clap::Parser;
use cylfit_core::{npz, PointCloud};
use cylfit_geometry::{reconstruct, FitOptions, LmOptions, ReconstructOptions, Reconstruction};
use cylfit_render::{palette, render_deviations, render_points, save_png, RenderOptions};
use std::fs;

mod config;

use config::{Args, Config};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cylfit=debug".into()))
        .init();

    let config = Config::from_env().with_args(Args::parse());

    tracing::info!(
        input = %config.input.display(),
        output = %config.output.display(),
        key = %config.array_key,
        correction = %config.correction,
        render = config.render,
        "Starting cylinder reconstruction"
    );

    run(&config)
}

fn run(config: &Config) -> Result<()> {
    let cloud = npz::load_points(&config.input, &config.array_key)
        .with_context(|| format!("Failed to load points from {}", config.input.display()))?;

    let options = ReconstructOptions {
        fit: FitOptions {
            solver: LmOptions {
                max_iterations: config.max_iterations,
                ..Default::default()
            },
        },
        correction: config.correction,
        axis: config.axis,
    };
    let result = reconstruct(&cloud, &options).context("Failed to reconstruct cylinder")?;

    let model = &result.fit.model;
    println!(
        "Fitted cylinder: center = ({:.6}, {:.6}, {:.6}), radius = {:.6}",
        model.center.x, model.center.y, model.center.z, model.radius
    );
    println!(
        "Axis: ({:.6}, {:.6}, {:.6}), {} iterations ({:?})",
        model.axis.x,
        model.axis.y,
        model.axis.z,
        result.fit.report.iterations,
        result.fit.report.termination
    );

    if config.render {
        write_figures(config, &cloud, &result).context("Failed to write figures")?;
    }

    npz::save_points(&config.output, &config.array_key, &result.corrected)
        .with_context(|| format!("Failed to save points to {}", config.output.display()))?;
    println!("Saved {} corrected points to {}", result.corrected.len(), config.output.display());

    Ok(())
}

fn write_figures(config: &Config, cloud: &PointCloud, result: &Reconstruction) -> Result<()> {
    fs::create_dir_all(&config.render_dir)
        .with_context(|| format!("Failed to create {}", config.render_dir.display()))?;

    let point_radius = i32::try_from(config.point_size)
        .with_context(|| format!("Point size {} is too large", config.point_size))?;
    let options = RenderOptions {
        width: config.image_size,
        height: config.image_size,
        point_radius,
        ..Default::default()
    };

    let figures = [
        ("point_cloud.png", render_points(cloud, palette::SCAN, &options)?),
        ("deviation.png", render_deviations(cloud, &result.deviations, &options)?),
        ("reconstructed.png", render_points(&result.corrected, palette::CORRECTED, &options)?),
    ];

    for (name, image) in &figures {
        save_png(image, config.render_dir.join(name))?;
    }

    Ok(())
}
