use glam::DVec3;

use crate::error::{ChartError, Result};
use crate::math::mesh::SurfaceMesh;

/// A single quadrilateral given as 2x2 coordinate arrays, indexed `[row][col]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub name: &'static str,
    pub x: [[f64; 2]; 2],
    pub y: [[f64; 2]; 2],
    pub z: [[f64; 2]; 2],
}

/// Axis-aligned bounds, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    pub fn cube(lo: f64, hi: f64) -> Self {
        Self {
            min: DVec3::splat(lo),
            max: DVec3::splat(hi),
        }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl Patch {
    pub fn corner(&self, row: usize, col: usize) -> DVec3 {
        DVec3::new(self.x[row][col], self.y[row][col], self.z[row][col])
    }

    pub fn corners(&self) -> [DVec3; 4] {
        [
            self.corner(0, 0),
            self.corner(0, 1),
            self.corner(1, 1),
            self.corner(1, 0),
        ]
    }

    pub fn within(&self, bounds: &Bounds) -> Result<()> {
        match self.corners().into_iter().find(|c| !bounds.contains(*c)) {
            Some(c) => Err(ChartError::OutOfBounds {
                what: self.name,
                x: c.x,
                y: c.y,
                z: c.z,
            }),
            None => Ok(()),
        }
    }

    pub fn to_mesh(&self) -> Result<SurfaceMesh> {
        SurfaceMesh::from_rows(&[
            vec![self.corner(0, 0), self.corner(0, 1)],
            vec![self.corner(1, 0), self.corner(1, 1)],
        ])
    }
}

pub const CHINA_ADVANTAGE: Patch = Patch {
    name: "china advantage region",
    x: [[0.0, 1.0], [0.0, 1.0]],
    y: [[0.0, 0.0], [0.3, 0.3]],
    z: [[0.0, 0.0], [0.3, 0.3]],
};

pub const WESTERN_BARRIER: Patch = Patch {
    name: "western barrier region",
    x: [[0.0, 0.6], [0.0, 0.6]],
    y: [[0.0, 0.0], [1.0, 1.0]],
    z: [[0.0, 0.0], [1.0, 1.0]],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_regions_fit_the_axis_cube() {
        let bounds = Bounds::cube(0.0, 1.2);
        for patch in [&CHINA_ADVANTAGE, &WESTERN_BARRIER] {
            patch.within(&bounds).unwrap();
            assert!(patch.corners().iter().all(|c| bounds.contains(*c)));
        }
    }

    #[test]
    fn out_of_bounds_corner_is_reported() {
        let mut patch = CHINA_ADVANTAGE.clone();
        patch.z[1][1] = 1.5;
        match patch.within(&Bounds::cube(0.0, 1.2)) {
            Err(ChartError::OutOfBounds { z, .. }) => assert_eq!(z, 1.5),
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn patch_mesh_has_one_quad() {
        let mesh = WESTERN_BARRIER.to_mesh().unwrap();
        assert_eq!(mesh.quads().count(), 1);
        assert_eq!(mesh.z_min, 0.0);
        assert_eq!(mesh.z_max, 1.0);
    }
}
