//! Agriculture structure chart: the compliance surface over hardware and
//! agronomy, with the two reference positions marked and annotated.

use std::path::Path;

use anyhow::Context;
use glam::DVec3;
use log::info;

use crate::error::Result;
use crate::locale::Language;
use crate::math::{CHINA_POSITION, Grid, ReferencePoint, SurfaceMesh, SurfaceParams, WESTERN_GIANTS};
use crate::output::write_image;
use crate::renderer::theme::{BLACK, BLUE, DARK_BLUE, DARK_RED, RED, TEXT_PRIMARY, WHITE};
use crate::renderer::{
    Axes3D, Colorbar, Colormap, Figure, FigureStyle, FontBook, Label, LabelBox, Line3, Marker,
    MarkerShape, Normalize, RenderedImage,
};

pub const OUTPUT_FILE: &str = "3d_ag_structure.png";

const MARKER_AREA: f32 = 200.0;
const PROJECTION_AREA: f32 = 50.0;
const NOTE_FONT_PT: f32 = 9.0;
const TITLE_FONT_PT: f32 = 13.0;

#[derive(Clone, Debug, PartialEq)]
pub struct StructureChart {
    pub params: SurfaceParams,
    pub domain: (f64, f64),
    pub samples: usize,
    pub z_limits: (f64, f64),
    pub elevation: f32,
    pub azimuth: f32,
    pub surface_alpha: f32,
    pub china: ReferencePoint,
    pub western: ReferencePoint,
    pub style: FigureStyle,
}

impl Default for StructureChart {
    fn default() -> Self {
        Self {
            params: SurfaceParams::default(),
            domain: (0.0, 10.0),
            samples: 50,
            z_limits: (0.0, 10.0),
            elevation: 25.0,
            azimuth: 45.0,
            surface_alpha: 0.8,
            china: CHINA_POSITION,
            western: WESTERN_GIANTS,
            style: FigureStyle::sized(12.0, 9.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StructureSummary {
    pub china: [f64; 3],
    pub western: [f64; 3],
}

impl StructureSummary {
    pub fn report(&self, file: &str) -> String {
        let [cx, cy, cz] = self.china;
        let [wx, wy, wz] = self.western;
        format!(
            "✓ 3D Agriculture Structure plot generated: {file}\n  \
             - China Position: X={cx}, Y={cy}, Z={cz:.2}\n  \
             - Western Giants: X={wx}, Y={wy}, Z={wz:.2}\n  \
             - Z is primarily driven by Y (agronomy), not X (hardware)"
        )
    }
}

fn note_box() -> LabelBox {
    LabelBox {
        face: WHITE,
        edge: BLACK,
        alpha: 0.8,
        pad: 0.5,
    }
}

impl StructureChart {
    pub fn summary(&self) -> StructureSummary {
        StructureSummary {
            china: self.china.position(&self.params),
            western: self.western.position(&self.params),
        }
    }

    pub fn surface(&self) -> Result<SurfaceMesh> {
        let grid = Grid::new(self.domain, self.domain, self.samples, self.samples)?;
        SurfaceMesh::sample(&grid, |x, y| self.params.evaluate(x, y))
    }

    pub fn build(&self, language: Language) -> Result<Figure> {
        let labels = language.structure();
        let mesh = self.surface()?;
        let (face_lo, face_hi) = mesh.face_range();
        let norm = Normalize::new(face_lo, face_hi);
        let cmap = Colormap::viridis();

        let axes = Axes3D::new(
            [self.domain, self.domain, self.z_limits],
            [labels.x_axis, labels.y_axis, labels.z_axis],
        );
        let mut figure = Figure::new(self.style, axes, self.elevation, self.azimuth);

        for quad in mesh.quads() {
            let color = cmap.sample(norm.apply(quad.mean_z));
            figure
                .scene
                .add_polygon(quad.corners.to_vec(), vec![color], self.surface_alpha);
        }

        let summary = self.summary();
        let china = DVec3::from_array(summary.china);
        let western = DVec3::from_array(summary.western);

        figure.scene.add_marker(
            Marker::new(china, MarkerShape::Circle, MARKER_AREA, RED)
                .edge(DARK_RED, 2.0)
                .label(self.china.name),
        );
        figure.scene.add_marker(
            Marker::new(western, MarkerShape::Square, MARKER_AREA, BLUE)
                .edge(DARK_BLUE, 2.0)
                .label(self.western.name),
        );

        for (top, color) in [(china, RED), (western, BLUE)] {
            let base = DVec3::new(top.x, top.y, 0.0);
            figure.scene.add_line(Line3 {
                points: vec![base, top],
                color,
                width: 1.5,
                alpha: 0.6,
                dashed: true,
            });
            figure.scene.add_marker(
                Marker::new(base, MarkerShape::Circle, PROJECTION_AREA, color).alpha(0.3),
            );
        }

        figure.scene.add_text(
            china + DVec3::new(0.5, -0.5, 1.5),
            Label::new(labels.china_note, NOTE_FONT_PT, RED).bold().boxed(note_box()),
        );
        figure.scene.add_text(
            western + DVec3::new(-1.5, 0.5, 1.0),
            Label::new(labels.western_note, NOTE_FONT_PT, BLUE).bold().boxed(note_box()),
        );

        figure.title = Some(Label::new(labels.title, TITLE_FONT_PT, TEXT_PRIMARY).bold());
        figure.legend = true;
        figure.colorbar = Some(Colorbar {
            cmap,
            norm,
            label: labels.colorbar.to_owned(),
        });
        Ok(figure)
    }

    pub fn render(&self, fonts: &FontBook) -> Result<(RenderedImage, StructureSummary)> {
        let language = Language::detect(fonts);
        let figure = self.build(language)?;
        info!(
            "structure chart: {} faces, {:?} labels",
            figure.scene.polygons.len(),
            language
        );
        Ok((figure.render(fonts), self.summary()))
    }
}

/// Renders the default chart to `output` and returns the reference heights.
pub fn run(output: &Path) -> anyhow::Result<StructureSummary> {
    let fonts = FontBook::load();
    let chart = StructureChart::default();
    let (image, summary) = chart.render(&fonts).context("failed to build structure chart")?;
    write_image(output, &image)?;
    info!("wrote {}", output.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_reference_heights() {
        let summary = StructureChart::default().summary();
        assert_eq!(summary.china[..2], [8.5, 2.5]);
        assert_eq!(summary.western[..2], [6.5, 8.5]);
        assert!(summary.western[2] > summary.china[2]);

        let report = summary.report(OUTPUT_FILE);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "✓ 3D Agriculture Structure plot generated: 3d_ag_structure.png");
        assert_eq!(lines[1], "  - China Position: X=8.5, Y=2.5, Z=2.27");
        assert_eq!(lines[2], "  - Western Giants: X=6.5, Y=8.5, Z=7.38");
    }

    #[test]
    fn figure_holds_the_full_surface() {
        let chart = StructureChart::default();
        let figure = chart.build(Language::English).unwrap();
        assert_eq!(figure.scene.polygons.len(), 49 * 49);
        assert_eq!(figure.scene.lines.len(), 2);
        assert!(figure.scene.lines.iter().all(|l| l.dashed));
        assert_eq!(figure.scene.markers.len(), 4);
        assert_eq!(figure.scene.texts.len(), 2);
        assert_eq!(figure.scene.legend_entries().count(), 2);
        assert!(figure.colorbar.is_some());
        assert_eq!((figure.elevation, figure.azimuth), (25.0, 45.0));
    }

    #[test]
    fn annotations_sit_above_their_points() {
        let chart = StructureChart::default();
        let summary = chart.summary();
        let figure = chart.build(Language::English).unwrap();
        let china_note = &figure.scene.texts[0];
        assert_eq!(china_note.at.x, 9.0);
        assert_eq!(china_note.at.y, 2.0);
        assert!((china_note.at.z - (summary.china[2] + 1.5)).abs() < 1e-12);
    }

    #[test]
    fn chinese_labels_keep_the_layout() {
        let chart = StructureChart::default();
        let english = chart.build(Language::English).unwrap();
        let chinese = chart.build(Language::Chinese).unwrap();
        assert_eq!(chinese.scene.polygons.len(), english.scene.polygons.len());
        assert_eq!(chinese.scene.markers.len(), english.scene.markers.len());
        assert_eq!(chinese.scene.texts.len(), english.scene.texts.len());

        let zh = Language::Chinese.structure();
        assert_eq!(chinese.scene.texts[0].label.text, "中国位置\n(技术优势\n农艺不足)");
        assert_eq!(chinese.scene.texts[1].label.text, zh.western_note);
        assert_eq!(chinese.title.as_ref().map(|t| t.text.as_str()), Some(zh.title));
        assert_eq!(chinese.colorbar.as_ref().map(|c| c.label.as_str()), Some("合规信任度"));
        assert_eq!(chinese.axes.axes[2].label, zh.z_axis);
    }

    #[test]
    fn surface_is_sampled_on_a_fifty_grid() {
        let mesh = StructureChart::default().surface().unwrap();
        assert_eq!((mesh.rows, mesh.cols), (50, 50));
        assert!(mesh.z_min >= 0.0 && mesh.z_max < 10.0);
    }
}
