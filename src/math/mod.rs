pub mod grid;
pub mod mesh;
pub mod regions;
pub mod surface;

pub use grid::{Grid, linspace};
pub use mesh::{Quad, SurfaceMesh};
pub use regions::{Bounds, CHINA_ADVANTAGE, Patch, WESTERN_BARRIER};
pub use surface::{CHINA_POSITION, ReferencePoint, SurfaceParams, WESTERN_GIANTS};
