// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building point clouds or moving them through archives
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read archive: {0}")]
    ReadArchive(#[from] ndarray_npy::ReadNpzError),

    #[error("Failed to write archive: {0}")]
    WriteArchive(#[from] ndarray_npy::WriteNpzError),

    #[error("Array '{key}' not found in archive (available: {available:?})")]
    MissingArray { key: String, available: Vec<String> },

    #[error("Expected an (N, 3) point array, found shape {shape:?}")]
    InvalidShape { shape: Vec<usize> },

    #[error("Unsupported array dtype: {0}")]
    UnsupportedDtype(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
