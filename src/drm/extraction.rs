//! Extraction points and the depths they imply.
//!
//! Mesh storage and querying live outside the engine; this module defines
//! the seam ([`ExtractionSource`]) plus the coordinate juggling that turns
//! returned points into depths and `data_location` indices.

use super::ResampleError;

/// Clipping shape handed to an extraction source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    /// Axis-aligned box between two corners.
    Box {
        /// Corner with the smallest coordinates.
        min: [f64; 3],
        /// Corner with the largest coordinates.
        max: [f64; 3],
    },
}

impl ClipShape {
    /// Whether `point` lies inside the shape, boundary included.
    pub fn contains(&self, point: [f64; 3]) -> bool {
        match self {
            ClipShape::Box { min, max } => {
                (0..3).all(|i| point[i] >= min[i] && point[i] <= max[i])
            }
        }
    }
}

/// Supplier of mesh extraction points.
///
/// Implementors own the mesh; the engine only consumes the returned
/// coordinates.
pub trait ExtractionSource {
    /// Coordinates of mesh points inside `shape`, one `[x, y, z]` each.
    fn extraction_points(&self, shape: &ClipShape) -> Vec<[f64; 3]>;
}

/// Tensor-product grid of candidate points.
///
/// Stands in for a real mesh in tests and examples; `z` holds elevations,
/// highest at the ground surface.
#[derive(Clone, Debug)]
pub struct SyntheticGrid {
    /// Grid x coordinates.
    pub x: Vec<f64>,
    /// Grid y coordinates.
    pub y: Vec<f64>,
    /// Grid z coordinates (elevations).
    pub z: Vec<f64>,
}

impl ExtractionSource for SyntheticGrid {
    fn extraction_points(&self, shape: &ClipShape) -> Vec<[f64; 3]> {
        let mut points = Vec::new();
        for &x in &self.x {
            for &y in &self.y {
                for &z in &self.z {
                    let point = [x, y, z];
                    if shape.contains(point) {
                        points.push(point);
                    }
                }
            }
        }
        points
    }
}

/// Unique z coordinates of `points`, highest first; values within `tol` of
/// each other collapse onto one.
pub fn unique_descending_z(points: &[[f64; 3]], tol: f64) -> Vec<f64> {
    let mut z: Vec<f64> = points.iter().map(|p| p[2]).collect();
    z.sort_by(|a, b| b.total_cmp(a));
    z.dedup_by(|a, b| (*a - *b).abs() <= tol);
    z
}

/// Depths from the surface implied by descending z coordinates.
///
/// The first (highest) entry is taken as the ground surface, so the result
/// starts at zero and ascends.
pub fn depths_from_z(z: &[f64]) -> Vec<f64> {
    if z.is_empty() {
        return Vec::new();
    }
    let surface = z[0];
    z.iter().map(|zi| surface - zi).collect()
}

/// Map each extraction point to the index of its depth in `start_depths`.
///
/// This is the `data_location` array a DRM writer stores next to the
/// per-depth motions: point `p` reads its time series from entry
/// `indices[p]`.
///
/// # Errors
/// [`ResampleError::PointOffDepthGrid`] when a point's depth is not within
/// `tol` of any entry; the error names the offending point.
pub fn point_depth_indices(
    points: &[[f64; 3]],
    surface_z: f64,
    start_depths: &[f64],
    tol: f64,
) -> Result<Vec<usize>, ResampleError> {
    let mut indices = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let depth = surface_z - point[2];
        match start_depths.iter().position(|&d| (d - depth).abs() <= tol) {
            Some(i) => indices.push(i),
            None => return Err(ResampleError::PointOffDepthGrid { index }),
        }
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drm::DEPTH_TOLERANCE;

    fn grid() -> SyntheticGrid {
        SyntheticGrid {
            x: vec![0.0, 5.0, 10.0],
            y: vec![0.0, 5.0],
            z: vec![0.0, -4.5, -9.0, -13.5, -18.0],
        }
    }

    #[test]
    fn test_box_containment() {
        let shape = ClipShape::Box {
            min: [0.0, 0.0, -18.0],
            max: [10.0, 10.0, 0.0],
        };
        assert!(shape.contains([5.0, 5.0, -9.0]));
        assert!(shape.contains([0.0, 0.0, -18.0]));
        assert!(!shape.contains([5.0, 5.0, 0.1]));
        assert!(!shape.contains([-0.1, 5.0, -9.0]));
    }

    #[test]
    fn test_grid_extraction_filters_by_shape() {
        let shape = ClipShape::Box {
            min: [0.0, 0.0, -10.0],
            max: [5.0, 5.0, 0.0],
        };
        let points = grid().extraction_points(&shape);
        // x in {0,5}, y in {0,5}, z in {0,-4.5,-9}: 2*2*3 points.
        assert_eq!(points.len(), 12);
        assert!(points.iter().all(|p| shape.contains(*p)));
    }

    #[test]
    fn test_unique_descending_z() {
        let points = [
            [0.0, 0.0, -9.0],
            [5.0, 0.0, 0.0],
            [0.0, 5.0, -9.0],
            [0.0, 5.0, -9.004],
            [0.0, 0.0, -18.0],
        ];
        let z = unique_descending_z(&points, DEPTH_TOLERANCE);
        assert_eq!(z.len(), 3);
        assert!((z[0] - 0.0).abs() < 1e-12);
        assert!((z[1] + 9.0).abs() < 1e-12);
        assert!((z[2] + 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_depths_from_z() {
        let depths = depths_from_z(&[100.0, 95.5, 91.0, 82.0]);
        let expected = [0.0, 4.5, 9.0, 18.0];
        for (got, want) in depths.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!(depths_from_z(&[]).is_empty());
    }

    #[test]
    fn test_point_depth_indices() {
        let start_depths = [0.0, 4.5, 9.0, 13.5];
        let points = [
            [0.0, 0.0, 0.0],
            [5.0, 0.0, -13.5],
            [5.0, 5.0, -4.5],
            [0.0, 5.0, -4.498],
        ];
        let indices = point_depth_indices(&points, 0.0, &start_depths, DEPTH_TOLERANCE).unwrap();
        assert_eq!(indices, vec![0, 3, 1, 1]);
    }

    #[test]
    fn test_point_off_depth_grid() {
        let start_depths = [0.0, 4.5, 9.0];
        let points = [[0.0, 0.0, 0.0], [0.0, 0.0, -2.0]];
        let err = point_depth_indices(&points, 0.0, &start_depths, DEPTH_TOLERANCE).unwrap_err();
        assert_eq!(err, ResampleError::PointOffDepthGrid { index: 1 });
    }
}
