use glam::DVec3;

use crate::error::{ChartError, Result};
use crate::math::grid::Grid;

/// Sampled height field laid out row-major (rows follow y).
pub struct SurfaceMesh {
    pub rows: usize,
    pub cols: usize,
    pub vertices: Vec<DVec3>,
    pub z_min: f64,
    pub z_max: f64,
}

/// One grid cell, corners in winding order.
pub struct Quad {
    pub corners: [DVec3; 4],
    pub mean_z: f64,
}

impl SurfaceMesh {
    pub fn sample(grid: &Grid, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
        let mut vertices = Vec::with_capacity(grid.rows() * grid.cols());
        let mut z_min = f64::MAX;
        let mut z_max = f64::MIN;

        for (_, _, x, y) in grid.points() {
            let z = f(x, y);
            if !z.is_finite() {
                return Err(ChartError::NonFinite { x, y });
            }
            z_min = z_min.min(z);
            z_max = z_max.max(z);
            vertices.push(DVec3::new(x, y, z));
        }

        Ok(Self {
            rows: grid.rows(),
            cols: grid.cols(),
            vertices,
            z_min,
            z_max,
        })
    }

    /// Builds a mesh from explicit corner rows, e.g. a hand-authored patch.
    pub fn from_rows(rows: &[Vec<DVec3>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return Err(ChartError::EmptyGrid);
        }

        let vertices: Vec<DVec3> = rows.iter().flatten().copied().collect();
        let (z_min, z_max) = vertices
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v.z), hi.max(v.z)));

        Ok(Self {
            rows: rows.len(),
            cols,
            vertices,
            z_min,
            z_max,
        })
    }

    pub fn vertex(&self, row: usize, col: usize) -> DVec3 {
        self.vertices[row * self.cols + col]
    }

    pub fn quads(&self) -> impl Iterator<Item = Quad> + '_ {
        let rows = self.rows.saturating_sub(1);
        let cols = self.cols.saturating_sub(1);
        (0..rows).flat_map(move |i| {
            (0..cols).map(move |j| {
                let corners = [
                    self.vertex(i, j),
                    self.vertex(i, j + 1),
                    self.vertex(i + 1, j + 1),
                    self.vertex(i + 1, j),
                ];
                let mean_z = corners.iter().map(|c| c.z).sum::<f64>() / 4.0;
                Quad { corners, mean_z }
            })
        })
    }

    /// Range of the per-cell mean heights; this is what face colouring normalises over.
    pub fn face_range(&self) -> (f64, f64) {
        self.quads()
            .fold((f64::MAX, f64::MIN), |(lo, hi), q| (lo.min(q.mean_z), hi.max(q.mean_z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_every_grid_point() {
        let grid = Grid::new((0.0, 10.0), (0.0, 10.0), 50, 50).unwrap();
        let mesh = SurfaceMesh::sample(&grid, |x, y| x + 2.0 * y).unwrap();
        assert_eq!(mesh.vertices.len(), 2500);
        assert_eq!(mesh.z_min, 0.0);
        assert_eq!(mesh.z_max, 30.0);
        assert_eq!(mesh.vertex(49, 0), DVec3::new(0.0, 10.0, 20.0));
        assert_eq!(mesh.quads().count(), 49 * 49);
    }

    #[test]
    fn rejects_non_finite_heights() {
        let grid = Grid::new((0.0, 1.0), (0.0, 1.0), 2, 2).unwrap();
        let err = SurfaceMesh::sample(&grid, |x, _| 1.0 / x).err();
        assert!(matches!(err, Some(ChartError::NonFinite { .. })));
    }

    #[test]
    fn face_range_uses_cell_means() {
        let grid = Grid::new((0.0, 2.0), (0.0, 1.0), 3, 2).unwrap();
        let mesh = SurfaceMesh::sample(&grid, |x, _| x).unwrap();
        let (lo, hi) = mesh.face_range();
        assert_eq!(lo, 0.5);
        assert_eq!(hi, 1.5);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![DVec3::ZERO, DVec3::X], vec![DVec3::Y]];
        assert!(SurfaceMesh::from_rows(&rows).is_err());
    }
}
