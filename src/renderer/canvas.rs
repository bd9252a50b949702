use bytemuck::{Pod, Zeroable};
use egui::{Color32, Pos2, Rect, pos2, vec2};

use crate::renderer::theme::unit_rgb;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Opaque float framebuffer drawn at a supersampled resolution.
pub struct Canvas {
    width: u32,
    height: u32,
    supersample: u32,
    pixels: Vec<[f32; 3]>,
}

#[inline(always)]
fn edge(a: Pos2, b: Pos2, p: Pos2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Shared triangle edges are owned by exactly one side.
#[inline(always)]
fn owns_edge(a: Pos2, b: Pos2) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    dy > 0.0 || (dy == 0.0 && dx < 0.0)
}

#[inline(always)]
fn covers(w: f32, owner: bool) -> bool {
    w > 0.0 || (w == 0.0 && owner)
}

impl Canvas {
    pub fn new(width: u32, height: u32, supersample: u32, background: Color32) -> Self {
        let supersample = supersample.max(1);
        let (w, h) = (width * supersample, height * supersample);
        Self {
            width: w,
            height: h,
            supersample,
            pixels: vec![unit_rgb(background); (w * h) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(self.width as f32, self.height as f32))
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline(always)]
    fn blend(&mut self, x: u32, y: u32, rgb: [f32; 3], alpha: f32) {
        let dst = &mut self.pixels[(y * self.width + x) as usize];
        for c in 0..3 {
            dst[c] = rgb[c] * alpha + dst[c] * (1.0 - alpha);
        }
    }

    /// Pixel index range overlapping `rect`, clipped to the canvas.
    fn span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let clipped = rect.intersect(self.rect());
        if !clipped.is_positive() {
            return None;
        }
        let x0 = clipped.min.x.floor().max(0.0) as u32;
        let y0 = clipped.min.y.floor().max(0.0) as u32;
        let x1 = (clipped.max.x.ceil() as u32).min(self.width);
        let y1 = (clipped.max.y.ceil() as u32).min(self.height);
        Some((x0, y0, x1, y1))
    }

    /// Blends `color` wherever `inside` holds for the pixel centre.
    pub fn fill_where(
        &mut self,
        bounds: Rect,
        color: Color32,
        alpha: f32,
        inside: impl Fn(Pos2) -> bool,
    ) {
        let Some((x0, y0, x1, y1)) = self.span(bounds) else {
            return;
        };
        let rgb = unit_rgb(color);
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(pos2(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, rgb, alpha);
                }
            }
        }
    }

    pub fn fill_triangle(&mut self, v: [Pos2; 3], colors: [Color32; 3], alpha: f32) {
        let (mut v, mut colors) = (v, colors);
        let mut area = edge(v[0], v[1], v[2]);
        if area < 0.0 {
            v.swap(1, 2);
            colors.swap(1, 2);
            area = -area;
        }
        if area <= f32::EPSILON || !v.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            return;
        }

        let mut bounds = Rect::NOTHING;
        for p in v {
            bounds.extend_with(p);
        }
        let Some((x0, y0, x1, y1)) = self.span(bounds) else {
            return;
        };

        let owners = [
            owns_edge(v[1], v[2]),
            owns_edge(v[2], v[0]),
            owns_edge(v[0], v[1]),
        ];
        let rgb = colors.map(unit_rgb);
        let flat = colors[0] == colors[1] && colors[1] == colors[2];

        for y in y0..y1 {
            for x in x0..x1 {
                let p = pos2(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(v[1], v[2], p);
                let w1 = edge(v[2], v[0], p);
                let w2 = edge(v[0], v[1], p);
                if !(covers(w0, owners[0]) && covers(w1, owners[1]) && covers(w2, owners[2])) {
                    continue;
                }
                let shade = if flat {
                    rgb[0]
                } else {
                    let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                    std::array::from_fn(|c| rgb[0][c] * l0 + rgb[1][c] * l1 + rgb[2][c] * l2)
                };
                self.blend(x, y, shade, alpha);
            }
        }
    }

    /// Fan-triangulates a convex polygon.
    pub fn fill_convex(&mut self, points: &[Pos2], color: Color32, alpha: f32) {
        for i in 1..points.len().saturating_sub(1) {
            self.fill_triangle([points[0], points[i], points[i + 1]], [color; 3], alpha);
        }
    }

    pub fn stroke_segment(&mut self, a: Pos2, b: Pos2, width: f32, color: Color32, alpha: f32) {
        let d = b - a;
        let len = d.length();
        if len <= f32::EPSILON {
            return;
        }
        let n = vec2(-d.y, d.x) / len * (width * 0.5);
        self.fill_convex(&[a + n, b + n, b - n, a - n], color, alpha);
    }

    /// Strokes a polyline, optionally with an on/off dash pattern in pixels.
    pub fn stroke_polyline(
        &mut self,
        points: &[Pos2],
        width: f32,
        color: Color32,
        alpha: f32,
        dash: Option<&[f32]>,
    ) {
        let Some(pattern) = dash.filter(|p| !p.is_empty() && p.iter().all(|&l| l > 0.0)) else {
            for w in points.windows(2) {
                self.stroke_segment(w[0], w[1], width, color, alpha);
            }
            return;
        };

        let mut slot = 0;
        let mut left = pattern[0];
        for w in points.windows(2) {
            let (mut a, b) = (w[0], w[1]);
            let mut remaining = (b - a).length();
            while remaining > f32::EPSILON {
                let step = left.min(remaining);
                let next = a + (b - a) * (step / remaining);
                if slot % 2 == 0 {
                    self.stroke_segment(a, next, width, color, alpha);
                }
                a = next;
                remaining -= step;
                left -= step;
                if left <= f32::EPSILON {
                    slot = (slot + 1) % pattern.len();
                    left = pattern[slot];
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32, alpha: f32) {
        let r2 = radius * radius;
        let bounds = Rect::from_center_size(center, vec2(radius, radius) * 2.0);
        self.fill_where(bounds, color, alpha, |p| (p - center).length_sq() <= r2);
    }

    /// Disk with an outline of `edge_width` drawn inside the radius.
    pub fn draw_disk_marker(
        &mut self,
        center: Pos2,
        radius: f32,
        face: Color32,
        edge_color: Option<(Color32, f32)>,
        alpha: f32,
    ) {
        let r2 = radius * radius;
        let bounds = Rect::from_center_size(center, vec2(radius, radius) * 2.0);
        let inner = edge_color.map_or(radius, |(_, w)| (radius - w).max(0.0));
        let inner2 = inner * inner;
        self.fill_where(bounds, face, alpha, |p| (p - center).length_sq() <= inner2);
        if let Some((edge_color, _)) = edge_color {
            self.fill_where(bounds, edge_color, alpha, |p| {
                let d = (p - center).length_sq();
                d > inner2 && d <= r2
            });
        }
    }

    pub fn draw_square_marker(
        &mut self,
        center: Pos2,
        half: f32,
        face: Color32,
        edge_color: Option<(Color32, f32)>,
        alpha: f32,
    ) {
        let outer = Rect::from_center_size(center, vec2(half, half) * 2.0);
        let inner = edge_color.map_or(outer, |(_, w)| outer.shrink(w.min(half)));
        self.fill_where(outer, face, alpha, |p| inner.contains(p));
        if let Some((edge_color, _)) = edge_color {
            self.fill_where(outer, edge_color, alpha, |p| outer.contains(p) && !inner.contains(p));
        }
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color32, alpha: f32) {
        self.fill_where(rect, color, alpha, |p| inside_rounded(rect, radius, p));
    }

    pub fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        width: f32,
        color: Color32,
        alpha: f32,
    ) {
        let inner = rect.shrink(width);
        let inner_radius = (radius - width).max(0.0);
        self.fill_where(rect, color, alpha, |p| {
            inside_rounded(rect, radius, p) && !inside_rounded(inner, inner_radius, p)
        });
    }

    /// Box-filters the supersampled buffer down to output resolution.
    pub fn resolve(&self) -> (u32, u32, Vec<Rgba8>) {
        let s = self.supersample;
        let (w, h) = (self.width / s, self.height / s);
        let norm = 1.0 / (s * s) as f32;
        let mut out = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let mut acc = [0.0f32; 3];
                for sy in 0..s {
                    for sx in 0..s {
                        let px = self.pixel(x * s + sx, y * s + sy);
                        for c in 0..3 {
                            acc[c] += px[c];
                        }
                    }
                }
                let to_u8 = |v: f32| (v * norm * 255.0).round().clamp(0.0, 255.0) as u8;
                out.push(Rgba8 {
                    r: to_u8(acc[0]),
                    g: to_u8(acc[1]),
                    b: to_u8(acc[2]),
                    a: 255,
                });
            }
        }
        (w, h, out)
    }
}

pub fn inside_rounded(rect: Rect, radius: f32, p: Pos2) -> bool {
    if !rect.contains(p) {
        return false;
    }
    let r = radius.min(rect.width() * 0.5).min(rect.height() * 0.5).max(0.0);
    let core = rect.shrink(r);
    let nearest = pos2(
        p.x.clamp(core.min.x, core.max.x),
        p.y.clamp(core.min.y, core.max.y),
    );
    (p - nearest).length_sq() <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::theme::{BLUE, RED, WHITE};

    fn blank() -> Canvas {
        Canvas::new(20, 20, 1, WHITE)
    }

    #[test]
    fn opaque_triangle_replaces_background() {
        let mut canvas = blank();
        canvas.fill_triangle([pos2(0.0, 0.0), pos2(20.0, 0.0), pos2(0.0, 20.0)], [RED; 3], 1.0);
        assert_eq!(canvas.pixel(2, 2), [1.0, 0.0, 0.0]);
        assert_eq!(canvas.pixel(18, 18), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn shared_edges_are_not_blended_twice() {
        let mut canvas = blank();
        let quad = [pos2(2.0, 2.0), pos2(18.0, 2.0), pos2(18.0, 18.0), pos2(2.0, 18.0)];
        canvas.fill_convex(&quad, BLUE, 0.5);
        for y in 2..18 {
            for x in 2..18 {
                assert_eq!(canvas.pixel(x, y), [0.5, 0.5, 1.0], "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn dashed_line_leaves_gaps() {
        let mut canvas = blank();
        canvas.stroke_polyline(
            &[pos2(0.0, 10.0), pos2(20.0, 10.0)],
            2.0,
            RED,
            1.0,
            Some(&[4.0, 4.0]),
        );
        assert_eq!(canvas.pixel(1, 10), [1.0, 0.0, 0.0]);
        assert_eq!(canvas.pixel(5, 10), [1.0, 1.0, 1.0]);
        assert_eq!(canvas.pixel(9, 10), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn resolve_averages_supersamples() {
        let mut canvas = Canvas::new(1, 1, 2, WHITE);
        canvas.fill_where(Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 2.0)), BLUE, 1.0, |_| true);
        let (w, h, px) = canvas.resolve();
        assert_eq!((w, h), (1, 1));
        assert_eq!(px[0], Rgba8 { r: 128, g: 128, b: 255, a: 255 });
    }

    #[test]
    fn rounded_corner_is_cut() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert!(inside_rounded(rect, 4.0, pos2(5.0, 5.0)));
        assert!(!inside_rounded(rect, 4.0, pos2(0.2, 0.2)));
    }
}
