// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for rendering
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering figures
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot render an empty point cloud")]
    EmptyCloud,

    #[error("Got {values} values for {points} points")]
    LengthMismatch { points: usize, values: usize },

    #[error("Image too small: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
