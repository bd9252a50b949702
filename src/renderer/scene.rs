use egui::{Color32, Pos2};
use glam::DVec3;
use log::debug;

use crate::renderer::camera::Projector;
use crate::renderer::canvas::Canvas;
use crate::renderer::text::{FontBook, HAlign, TextStyle, VAlign};
use crate::renderer::theme::FigureStyle;

/// On/off dash lengths, in multiples of the line width.
pub const DASHED: [f32; 2] = [3.7, 1.6];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub at: DVec3,
    pub shape: MarkerShape,
    /// Marker area in square points.
    pub area: f32,
    pub face: Color32,
    /// Edge colour and width in points.
    pub edge: Option<(Color32, f32)>,
    pub alpha: f32,
    pub label: Option<String>,
}

impl Marker {
    pub fn new(at: DVec3, shape: MarkerShape, area: f32, face: Color32) -> Self {
        Self {
            at,
            shape,
            area,
            face,
            edge: None,
            alpha: 1.0,
            label: None,
        }
    }

    pub fn edge(mut self, color: Color32, width: f32) -> Self {
        self.edge = Some((color, width));
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    /// Draws the marker centred on a screen position; `scale` converts points to pixels.
    pub fn draw_at(&self, canvas: &mut Canvas, center: Pos2, scale: f32) {
        let half = self.area.sqrt() * 0.5 * scale;
        let edge = self.edge.map(|(c, w)| (c, w * scale));
        match self.shape {
            MarkerShape::Circle => canvas.draw_disk_marker(center, half, self.face, edge, self.alpha),
            MarkerShape::Square => canvas.draw_square_marker(center, half, self.face, edge, self.alpha),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line3 {
    pub points: Vec<DVec3>,
    pub color: Color32,
    /// Points.
    pub width: f32,
    pub alpha: f32,
    pub dashed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon3 {
    pub points: Vec<DVec3>,
    /// One colour per point; equal colours give a flat face.
    pub colors: Vec<Color32>,
    pub alpha: f32,
}

/// Rounded box drawn behind a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBox {
    pub face: Color32,
    pub edge: Color32,
    pub alpha: f32,
    /// Padding as a fraction of the font size.
    pub pad: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    /// Points.
    pub size: f32,
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
    pub boxed: Option<LabelBox>,
}

impl Label {
    pub fn new(text: &str, size: f32, color: Color32) -> Self {
        Self {
            text: text.to_owned(),
            size,
            color,
            bold: false,
            italic: false,
            boxed: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn boxed(mut self, boxed: LabelBox) -> Self {
        self.boxed = Some(boxed);
        self
    }

    pub fn text_style(&self, style: &FigureStyle) -> TextStyle {
        let mut text = TextStyle::new(style.px(self.size), self.color);
        text.bold = self.bold;
        text.italic = self.italic;
        text
    }

    /// Draws the label anchored at a screen position, box first.
    pub fn draw_at(
        &self,
        canvas: &mut Canvas,
        fonts: &FontBook,
        anchor: Pos2,
        text_style: &TextStyle,
    ) {
        let layout = fonts.layout(&self.text, text_style);
        if let Some(b) = self.boxed {
            let pad = b.pad * text_style.size;
            let rect = layout.block_rect(anchor, text_style).expand(pad);
            canvas.fill_rounded_rect(rect, pad, b.face, b.alpha);
            canvas.stroke_rounded_rect(rect, pad, (text_style.size / 14.0).max(1.0), b.edge, b.alpha);
        }
        layout.draw(canvas, anchor, text_style);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text3 {
    pub at: DVec3,
    pub label: Label,
}

/// Everything plotted inside the 3-D axes, in data coordinates.
#[derive(Default)]
pub struct Scene {
    pub polygons: Vec<Polygon3>,
    pub lines: Vec<Line3>,
    pub markers: Vec<Marker>,
    pub texts: Vec<Text3>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_polygon(&mut self, points: Vec<DVec3>, colors: Vec<Color32>, alpha: f32) {
        self.polygons.push(Polygon3 {
            points,
            colors,
            alpha,
        });
    }

    pub fn add_line(&mut self, line: Line3) {
        self.lines.push(line);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn add_text(&mut self, at: DVec3, label: Label) {
        self.texts.push(Text3 { at, label });
    }

    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, &Marker)> {
        self.markers
            .iter()
            .filter_map(|m| m.label.as_deref().map(|l| (l, m)))
    }

    /// Polygons back-to-front, then lines, markers back-to-front, then text on top.
    pub fn render(
        &self,
        canvas: &mut Canvas,
        projector: &Projector,
        fonts: &FontBook,
        style: &FigureStyle,
    ) {
        let mut faces: Vec<(f32, &Polygon3)> = self
            .polygons
            .iter()
            .map(|p| {
                let centroid = p.points.iter().copied().sum::<DVec3>() / p.points.len().max(1) as f64;
                (projector.depth(centroid), p)
            })
            .collect();
        faces.sort_by(|a, b| b.0.total_cmp(&a.0));
        debug!("painting {} faces", faces.len());

        for (_, polygon) in faces {
            let pts: Vec<Pos2> = polygon.points.iter().map(|&p| projector.project(p).pos).collect();
            let color_at = |i: usize| polygon.colors.get(i).or(polygon.colors.first()).copied();
            for i in 1..pts.len().saturating_sub(1) {
                let (Some(c0), Some(c1), Some(c2)) = (color_at(0), color_at(i), color_at(i + 1)) else {
                    continue;
                };
                canvas.fill_triangle([pts[0], pts[i], pts[i + 1]], [c0, c1, c2], polygon.alpha);
            }
        }

        for line in &self.lines {
            let pts: Vec<Pos2> = line.points.iter().map(|&p| projector.project(p).pos).collect();
            let width = style.px(line.width);
            let dash: Option<Vec<f32>> = line
                .dashed
                .then(|| DASHED.iter().map(|d| d * width).collect());
            canvas.stroke_polyline(&pts, width, line.color, line.alpha, dash.as_deref());
        }

        let mut markers: Vec<&Marker> = self.markers.iter().collect();
        markers.sort_by(|a, b| projector.depth(b.at).total_cmp(&projector.depth(a.at)));
        for marker in markers {
            marker.draw_at(canvas, projector.project(marker.at).pos, style.px(1.0));
        }

        for text in &self.texts {
            let anchor = projector.project(text.at).pos;
            let text_style = text
                .label
                .text_style(style)
                .align(HAlign::Left, VAlign::Baseline);
            text.label.draw_at(canvas, fonts, anchor, &text_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::ViewCamera;
    use crate::renderer::theme::{BLUE, RED, WHITE};
    use egui::{Rect, pos2};

    fn projector() -> Projector {
        let camera = ViewCamera::new(25.0, 45.0, [(0.0, 10.0); 3]);
        Projector::fit(camera, Rect::from_min_max(pos2(10.0, 10.0), pos2(190.0, 190.0)))
    }

    #[test]
    fn nearer_face_paints_last() {
        let proj = projector();
        let mut scene = Scene::new();
        // vertical walls x + y = c facing the eye; larger c is nearer
        let wall = |c: f64| {
            vec![
                DVec3::new(c, 0.0, 0.0),
                DVec3::new(0.0, c, 0.0),
                DVec3::new(0.0, c, 10.0),
                DVec3::new(c, 0.0, 10.0),
            ]
        };
        scene.add_polygon(wall(15.0), vec![BLUE], 1.0);
        scene.add_polygon(wall(5.0), vec![RED], 1.0);

        let mut canvas = Canvas::new(200, 200, 1, WHITE);
        let style = FigureStyle::default();
        scene.render(&mut canvas, &proj, &FontBook::bundled(), &style);

        let centre = proj.project(DVec3::new(7.5, 7.5, 5.0)).pos;
        let px = canvas.pixel(centre.x as u32, centre.y as u32);
        assert_eq!(px, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn legend_lists_labelled_markers_only() {
        let mut scene = Scene::new();
        scene.add_marker(Marker::new(DVec3::ZERO, MarkerShape::Circle, 200.0, RED).label("China Position"));
        scene.add_marker(Marker::new(DVec3::ONE, MarkerShape::Circle, 50.0, RED).alpha(0.3));
        let labels: Vec<&str> = scene.legend_entries().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["China Position"]);
    }
}
