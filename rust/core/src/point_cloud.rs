// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point cloud data structures

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use ndarray::{Array2, ArrayView2};

/// Axis-aligned bounding box in f64 precision
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Minimum corner
    pub min: Point3<f64>,
    /// Maximum corner
    pub max: Point3<f64>,
}

impl Bounds {
    /// Bounds containing a single point
    #[inline]
    pub fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Edge lengths along each coordinate
    #[inline]
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center of the box
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Ordered set of 3D points from a scan.
///
/// The cloud never changes after construction; every transformation in the
/// reconstruction pipeline returns a new cloud with the same ordering.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
}

impl PointCloud {
    /// Create a cloud from owned points
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Build a cloud from an `(N, 3)` array view, one row per point
    pub fn from_array(array: ArrayView2<'_, f64>) -> Result<Self> {
        if array.ncols() != 3 {
            return Err(Error::InvalidShape {
                shape: array.shape().to_vec(),
            });
        }

        let points = array
            .rows()
            .into_iter()
            .map(|row| Point3::new(row[0], row[1], row[2]))
            .collect();

        Ok(Self { points })
    }

    /// Copy the points into an `(N, 3)` array
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.points.len(), 3), |(i, j)| self.points[i][j])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point3<f64>> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }

    /// Mean of all points, `None` for an empty cloud
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.points.len() as f64))
    }

    /// Axis-aligned bounding box, `None` for an empty cloud
    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.points.split_first()?;
        let mut bounds = Bounds::from_point(*first);
        for p in rest {
            bounds.expand(p);
        }
        Some(bounds)
    }
}

impl From<Vec<Point3<f64>>> for PointCloud {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3<f64>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3<f64>;
    type IntoIter = std::slice::Iter<'a, Point3<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_centroid_and_bounds() {
        let cloud = PointCloud::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 4.0, -1.0),
            Point3::new(1.0, -2.0, 4.0),
        ]);

        let centroid = cloud.centroid().unwrap();
        assert_relative_eq!(centroid, Point3::new(1.0, 2.0 / 3.0, 1.0), epsilon = 1e-12);

        let bounds = cloud.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, -2.0, -1.0));
        assert_eq!(bounds.max, Point3::new(2.0, 4.0, 4.0));
        assert_relative_eq!(bounds.extent(), Vector3::new(2.0, 6.0, 5.0));
        assert_relative_eq!(bounds.center(), Point3::new(1.0, 1.0, 1.5));
    }

    #[test]
    fn test_empty_cloud() {
        let cloud = PointCloud::default();
        assert!(cloud.is_empty());
        assert!(cloud.centroid().is_none());
        assert!(cloud.bounds().is_none());
        assert_eq!(cloud.to_array().shape(), &[0, 3]);
    }

    #[test]
    fn test_array_conversion_preserves_order() {
        let array = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [-1.0, -2.0, -3.0]];
        let cloud = PointCloud::from_array(array.view()).unwrap();

        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.points()[1], Point3::new(4.0, 5.0, 6.0));
        assert_eq!(cloud.to_array(), array);
    }

    #[test]
    fn test_array_with_wrong_width_is_rejected() {
        let array = array![[1.0, 2.0], [3.0, 4.0]];
        match PointCloud::from_array(array.view()) {
            Err(Error::InvalidShape { shape }) => assert_eq!(shape, vec![2, 2]),
            other => panic!("expected InvalidShape, got {:?}", other),
        }
    }
}
