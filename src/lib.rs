//! Headless rendering of two 3-D strategy charts to PNG.

pub mod charts;
pub mod error;
pub mod locale;
pub mod math;
pub mod output;
pub mod renderer;

pub use error::{ChartError, Result};
