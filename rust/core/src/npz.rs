// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NumPy `.npz` archive I/O
//!
//! Scans arrive as `.npz` archives holding a single `(N, 3)` floating-point
//! array (by convention named `points`). Both `float64` and `float32`
//! arrays are accepted on load; saves always write `float64`.

use crate::error::{Error, Result};
use crate::point_cloud::PointCloud;
use ndarray::{ArrayD, Ix2, IxDyn};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpyError, ReadNpzError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;

/// Array name used by scan archives
pub const DEFAULT_ARRAY_KEY: &str = "points";

/// Load the point array `key` from the archive at `path`
pub fn load_points(path: impl AsRef<Path>, key: &str) -> Result<PointCloud> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let cloud = read_points(BufReader::new(file), key)?;

    tracing::debug!(
        path = %path.display(),
        key,
        points = cloud.len(),
        "Loaded point archive"
    );
    Ok(cloud)
}

/// Read the point array `key` from an in-memory or on-disk archive
pub fn read_points<R: Read + Seek>(reader: R, key: &str) -> Result<PointCloud> {
    let mut npz = NpzReader::new(reader)?;

    let available = npz.names()?;
    if !available.iter().any(|name| name == key) {
        return Err(Error::MissingArray {
            key: key.to_string(),
            available,
        });
    }

    let array = read_float_array(&mut npz, key)?;
    let shape = array.shape().to_vec();
    let array = array
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::InvalidShape { shape })?;

    PointCloud::from_array(array.view())
}

/// Read `key` as `float64`, widening `float32` data
fn read_float_array<R: Read + Seek>(npz: &mut NpzReader<R>, key: &str) -> Result<ArrayD<f64>> {
    match npz.by_name::<ndarray::OwnedRepr<f64>, IxDyn>(key) {
        Ok(array) => return Ok(array),
        Err(ReadNpzError::Npy(ReadNpyError::WrongDescriptor(_))) => {}
        Err(e) => return Err(e.into()),
    }

    match npz.by_name::<ndarray::OwnedRepr<f32>, IxDyn>(key) {
        Ok(array) => {
            tracing::debug!(key, "Widening float32 point array to float64");
            Ok(array.mapv(f64::from))
        }
        Err(ReadNpzError::Npy(ReadNpyError::WrongDescriptor(descr))) => {
            Err(Error::UnsupportedDtype(format!("{:?}", descr)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Save `cloud` as a single `float64` array named `key`
pub fn save_points(path: impl AsRef<Path>, key: &str, cloud: &PointCloud) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;

    let mut npz = NpzWriter::new(BufWriter::new(file));
    npz.add_array(key, &cloud.to_array())?;
    npz.finish()?;

    tracing::debug!(
        path = %path.display(),
        key,
        points = cloud.len(),
        "Saved point archive"
    );
    Ok(())
}
