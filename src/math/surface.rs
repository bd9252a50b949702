//! Compliance surface: a mostly-linear plane in (hardware, agronomy) whose
//! height is tapered along the agronomy axis by a logistic factor.

/// Coefficients of the compliance surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    pub hardware_coeff: f64,
    pub agronomy_coeff: f64,
    pub interaction_coeff: f64,
    pub sigmoid_steepness: f64,
    pub sigmoid_midpoint: f64,
    pub sigmoid_baseline: f64,
    pub sigmoid_amplitude: f64,
    /// Extent of the y axis; y is divided by this before entering the sigmoid.
    pub y_span: f64,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            hardware_coeff: 0.1,
            agronomy_coeff: 0.8,
            interaction_coeff: 0.05,
            sigmoid_steepness: 5.0,
            sigmoid_midpoint: 0.5,
            sigmoid_baseline: 0.7,
            sigmoid_amplitude: 0.3,
            y_span: 10.0,
        }
    }
}

impl SurfaceParams {
    pub fn sigmoid_factor(&self, y: f64) -> f64 {
        let y_norm = y / self.y_span;
        1.0 / (1.0 + (-self.sigmoid_steepness * (y_norm - self.sigmoid_midpoint)).exp())
    }

    pub fn linear_part(&self, x: f64, y: f64) -> f64 {
        self.hardware_coeff * x
            + self.agronomy_coeff * y
            + self.interaction_coeff * x * y / 10.0
    }

    pub fn scale(&self, y: f64) -> f64 {
        self.sigmoid_baseline + self.sigmoid_amplitude * self.sigmoid_factor(y)
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.linear_part(x, y) * self.scale(y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferencePoint {
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
}

impl ReferencePoint {
    pub const fn new(name: &'static str, x: f64, y: f64) -> Self {
        Self { name, x, y }
    }

    pub fn elevation(&self, params: &SurfaceParams) -> f64 {
        params.evaluate(self.x, self.y)
    }

    pub fn position(&self, params: &SurfaceParams) -> [f64; 3] {
        [self.x, self.y, self.elevation(params)]
    }
}

pub const CHINA_POSITION: ReferencePoint = ReferencePoint::new("China Position", 8.5, 2.5);
pub const WESTERN_GIANTS: ReferencePoint = ReferencePoint::new("Western Giants", 6.5, 8.5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_is_deterministic() {
        let params = SurfaceParams::default();
        for &(x, y) in &[(0.0, 0.0), (3.3, 7.1), (8.5, 2.5), (10.0, 10.0)] {
            assert_eq!(params.evaluate(x, y), params.evaluate(x, y));
        }
    }

    #[test]
    fn sigmoid_floor_at_zero_agronomy() {
        let params = SurfaceParams::default();
        let s0 = params.sigmoid_factor(0.0);
        assert!((s0 - 1.0 / (1.0 + 2.5f64.exp())).abs() < 1e-15);
        assert!((s0 - 0.0759).abs() < 1e-4);

        let x = 6.0;
        let expected = 0.1 * x * (0.7 + 0.3 * s0);
        assert!((params.evaluate(x, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn sigmoid_saturates_at_full_agronomy() {
        let params = SurfaceParams::default();
        let s1 = params.sigmoid_factor(10.0);
        assert!(s1 > 0.92 && s1 < 1.0);
        assert!(params.scale(10.0) > 0.97);

        let x = 4.0;
        let expected = (0.1 * x + 0.8 * 10.0 + 0.05 * x) * (0.7 + 0.3 * s1);
        assert!((params.evaluate(x, 10.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn agronomy_dominates_hardware() {
        let params = SurfaceParams::default();
        let china = CHINA_POSITION.elevation(&params);
        let west = WESTERN_GIANTS.elevation(&params);
        assert!(west > china);
        assert!((china - 2.27).abs() < 0.005, "china z = {china}");
        assert!((west - 7.38).abs() < 0.005, "west z = {west}");
    }

    #[test]
    fn surface_stays_inside_plot_box() {
        let params = SurfaceParams::default();
        let top = params.evaluate(10.0, 10.0);
        assert!(top > 0.0 && top < 10.0);
    }
}
