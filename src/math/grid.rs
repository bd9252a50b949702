use crate::error::{ChartError, Result};

/// Evenly spaced samples over `[start, end]`, both endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Result<Vec<f64>> {
    match n {
        0 => Err(ChartError::EmptyGrid),
        1 => Ok(vec![start]),
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = end;
            Ok(values)
        }
    }
}

/// Rectangular sample mesh. Rows follow y, columns follow x.
#[derive(Clone, Debug)]
pub struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), cols: usize, rows: usize) -> Result<Self> {
        Ok(Self {
            xs: linspace(x_range.0, x_range.1, cols)?,
            ys: linspace(y_range.0, y_range.1, rows)?,
        })
    }

    pub fn cols(&self) -> usize {
        self.xs.len()
    }

    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn point(&self, row: usize, col: usize) -> (f64, f64) {
        (self.xs[col], self.ys[row])
    }

    pub fn points(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.ys.iter().enumerate().flat_map(move |(row, &y)| {
            self.xs
                .iter()
                .enumerate()
                .map(move |(col, &x)| (row, col, x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_endpoints() {
        let v = linspace(0.0, 10.0, 50).unwrap();
        assert_eq!(v.len(), 50);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[49], 10.0);
        assert!((v[1] - 10.0 / 49.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(matches!(linspace(0.0, 1.0, 0), Err(ChartError::EmptyGrid)));
        assert_eq!(linspace(3.0, 7.0, 1).unwrap(), vec![3.0]);
    }

    #[test]
    fn grid_rows_follow_y() {
        let grid = Grid::new((0.0, 1.0), (10.0, 20.0), 3, 2).unwrap();
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.point(1, 2), (1.0, 20.0));
        assert_eq!(grid.points().count(), 6);
    }
}
