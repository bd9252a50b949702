use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("grid axis needs at least one sample")]
    EmptyGrid,

    #[error("surface produced a non-finite value at ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("{what} corner ({x}, {y}, {z}) lies outside the axis bounds")]
    OutOfBounds {
        what: &'static str,
        x: f64,
        y: f64,
        z: f64,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
