use egui::{Pos2, Vec2, vec2};
use glam::DVec3;

use crate::renderer::camera::Projector;
use crate::renderer::canvas::Canvas;
use crate::renderer::text::{FontBook, HAlign, TextStyle, VAlign};
use crate::renderer::theme::{
    AXIS_LINE, BG_PANE, FigureStyle, GRID_ALPHA, GRID_LINE, PANE_ALPHA, PANE_EDGE, TEXT_PRIMARY,
};

const MAX_TICKS: usize = 7;
const TICK_LENGTH_PT: f32 = 3.5;
const TICK_PAD_PT: f32 = 7.0;

/// Tick step from {1, 2, 2.5, 5} x 10^k giving at most `max_ticks` ticks.
pub fn nice_step(lo: f64, hi: f64, max_ticks: usize) -> f64 {
    let span = (hi - lo).abs();
    if span <= f64::EPSILON || max_ticks < 2 {
        return 1.0;
    }
    let raw = span / (max_ticks - 1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&step| span / step <= (max_ticks - 1) as f64 + 1e-9)
        .unwrap_or(10.0 * magnitude)
}

pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    let step = nice_step(lo, hi, max_ticks);
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            if v.abs() < step * 1e-9 { 0.0 } else { v }
        })
        .collect()
}

/// Shortest decimal form that still distinguishes ticks `step` apart.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = (0..6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6);
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    pub label: String,
    pub limits: (f64, f64),
    pub ticks: Vec<f64>,
    pub show_tick_labels: bool,
}

impl AxisSpec {
    pub fn new(label: &str, limits: (f64, f64)) -> Self {
        Self {
            label: label.to_owned(),
            limits,
            ticks: nice_ticks(limits.0, limits.1, MAX_TICKS),
            show_tick_labels: true,
        }
    }

    fn step(&self) -> f64 {
        match self.ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => 1.0,
        }
    }
}

/// Box, panes, grid, ticks and labels of a 3-D plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Axes3D {
    pub axes: [AxisSpec; 3],
    pub grid: bool,
    pub grid_alpha: f32,
    /// Axis label distance from the tick labels, in points.
    pub label_pad: f32,
}

impl Axes3D {
    pub fn new(limits: [(f64, f64); 3], labels: [&str; 3]) -> Self {
        Self {
            axes: std::array::from_fn(|i| AxisSpec::new(labels[i], limits[i])),
            grid: true,
            grid_alpha: GRID_ALPHA,
            label_pad: 10.0,
        }
    }

    pub fn limits(&self) -> [(f64, f64); 3] {
        std::array::from_fn(|i| self.axes[i].limits)
    }

    pub fn hide_tick_labels(mut self) -> Self {
        for axis in &mut self.axes {
            axis.show_tick_labels = false;
        }
        self
    }

    fn point(axis: usize, along: f64, other: [(usize, f64); 2]) -> DVec3 {
        let mut p = DVec3::ZERO;
        p[axis] = along;
        for (i, v) in other {
            p[i] = v;
        }
        p
    }

    /// For each axis, the limit whose pane lies further from the viewer.
    fn far_side(&self, projector: &Projector) -> [f64; 3] {
        let center = DVec3::from_array(std::array::from_fn(|i| {
            (self.axes[i].limits.0 + self.axes[i].limits.1) * 0.5
        }));
        std::array::from_fn(|k| {
            let (lo, hi) = self.axes[k].limits;
            let mut at_lo = center;
            let mut at_hi = center;
            at_lo[k] = lo;
            at_hi[k] = hi;
            if projector.depth(at_lo) >= projector.depth(at_hi) { lo } else { hi }
        })
    }

    fn near_side(&self, k: usize, far: f64) -> f64 {
        let (lo, hi) = self.axes[k].limits;
        if far == lo { hi } else { lo }
    }

    pub fn draw_panes(&self, canvas: &mut Canvas, projector: &Projector, style: &FigureStyle) {
        let far = self.far_side(projector);
        let grid_width = style.px(style.grid_line_pt);

        for k in 0..3 {
            let (u, v) = ((k + 1) % 3, (k + 2) % 3);
            let (ulo, uhi) = self.axes[u].limits;
            let (vlo, vhi) = self.axes[v].limits;
            let corners: Vec<Pos2> = [(ulo, vlo), (uhi, vlo), (uhi, vhi), (ulo, vhi)]
                .iter()
                .map(|&(a, b)| projector.project(Self::point(k, far[k], [(u, a), (v, b)])).pos)
                .collect();
            canvas.fill_convex(&corners, BG_PANE, PANE_ALPHA);
            let mut outline = corners.clone();
            outline.push(corners[0]);
            canvas.stroke_polyline(&outline, grid_width, PANE_EDGE, 1.0, None);

            if !self.grid {
                continue;
            }
            for (axis, other, (olo, ohi)) in [(u, v, (vlo, vhi)), (v, u, (ulo, uhi))] {
                for &t in &self.axes[axis].ticks {
                    let a = Self::point(k, far[k], [(axis, t), (other, olo)]);
                    let b = Self::point(k, far[k], [(axis, t), (other, ohi)]);
                    let line = [projector.project(a).pos, projector.project(b).pos];
                    canvas.stroke_polyline(&line, grid_width, GRID_LINE, self.grid_alpha, None);
                }
            }
        }
    }

    /// Edge endpoints carrying each axis's ticks.
    fn axis_edges(&self, projector: &Projector) -> [(DVec3, DVec3); 3] {
        let far = self.far_side(projector);
        let near: [f64; 3] = std::array::from_fn(|k| self.near_side(k, far[k]));
        let (xlo, xhi) = self.axes[0].limits;
        let (ylo, yhi) = self.axes[1].limits;
        let (zl, zh) = self.axes[2].limits;

        let x_edge = (DVec3::new(xlo, near[1], zl), DVec3::new(xhi, near[1], zl));
        let y_edge = (DVec3::new(near[0], ylo, zl), DVec3::new(near[0], yhi, zl));

        // z ticks go on whichever silhouette edge sits further left on screen
        let candidates = [(near[0], far[1]), (far[0], near[1])];
        let (zx, zy) = candidates
            .into_iter()
            .min_by(|a, b| {
                let pa = projector.project(DVec3::new(a.0, a.1, zl)).pos.x;
                let pb = projector.project(DVec3::new(b.0, b.1, zl)).pos.x;
                pa.total_cmp(&pb)
            })
            .unwrap_or((xlo, ylo));
        let z_edge = (DVec3::new(zx, zy, zl), DVec3::new(zx, zy, zh));
        [x_edge, y_edge, z_edge]
    }

    pub fn draw_axes(
        &self,
        canvas: &mut Canvas,
        projector: &Projector,
        fonts: &FontBook,
        style: &FigureStyle,
    ) {
        let box_center = projector.camera.box_corners().iter().fold(Vec2::ZERO, |acc, &c| {
            acc + projector.project(c).pos.to_vec2() / 8.0
        });
        let line_width = style.px(style.axis_line_pt);
        let tick_len = style.px(TICK_LENGTH_PT);

        for (k, (a, b)) in self.axis_edges(projector).into_iter().enumerate() {
            let spec = &self.axes[k];
            let (pa, pb) = (projector.project(a).pos, projector.project(b).pos);
            canvas.stroke_segment(pa, pb, line_width, AXIS_LINE, 1.0);

            let dir = (pb - pa).normalized();
            let mut outward = vec2(-dir.y, dir.x);
            let mid = pa + (pb - pa) * 0.5;
            if outward.dot(mid.to_vec2() - box_center) < 0.0 {
                outward = -outward;
            }
            if k == 2 {
                outward = vec2(-1.0, 0.0);
            }

            let tick_style = TextStyle::new(style.px(style.tick_font_pt), TEXT_PRIMARY)
                .align(HAlign::Center, VAlign::Center);
            let step = spec.step();
            let mut label_reach: f32 = tick_len;
            for &t in &spec.ticks {
                let mut p = a;
                p[k] = t;
                let at = projector.project(p).pos;
                canvas.stroke_segment(at, at + outward * tick_len, line_width, AXIS_LINE, 1.0);
                if spec.show_tick_labels {
                    let text = format_tick(t, step);
                    let layout = fonts.layout(&text, &tick_style);
                    let reach = tick_len + style.px(TICK_PAD_PT) * 0.5 + layout.size().length() * 0.5;
                    layout.draw(canvas, at + outward * reach, &tick_style);
                    label_reach = label_reach.max(reach + layout.size().length() * 0.5);
                }
            }

            let angle = if k == 2 {
                std::f32::consts::FRAC_PI_2
            } else {
                let a = (-dir.y).atan2(dir.x);
                if a.abs() > std::f32::consts::FRAC_PI_2 { a - a.signum() * std::f32::consts::PI } else { a }
            };
            let label_style = TextStyle::new(style.px(style.axis_label_pt), TEXT_PRIMARY)
                .align(HAlign::Center, VAlign::Center)
                .rotated(angle);
            let layout = fonts.layout(&spec.label, &label_style);
            let reach = label_reach + style.px(self.label_pad) + layout.height * 0.5;
            layout.draw(canvas, mid + outward * reach, &label_style);
        }
    }
}
