//! Competition chart: two hand-placed capability regions inside a unit box.

use std::path::Path;

use anyhow::Context;
use glam::DVec3;
use log::info;

use crate::error::Result;
use crate::locale::{CompetitionLabels, Language};
use crate::math::{Bounds, CHINA_ADVANTAGE, Patch, WESTERN_BARRIER};
use crate::output::write_image;
use crate::renderer::theme::{BLACK, BLUE, CYAN, ORANGE, RED};
use crate::renderer::{Axes3D, Colormap, Figure, FigureStyle, FontBook, Label, Normalize, RenderedImage};

pub const OUTPUT_FILE: &str = "competition_3d.png";

const ANNOTATION_FONT_PT: f32 = 10.0;

/// A patch with the gradient and opacity it is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub patch: Patch,
    pub cmap: Colormap,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompetitionChart {
    pub regions: Vec<Region>,
    pub limit: f64,
    pub elevation: f32,
    pub azimuth: f32,
    pub style: FigureStyle,
}

impl Default for CompetitionChart {
    fn default() -> Self {
        Self {
            regions: vec![
                Region {
                    patch: CHINA_ADVANTAGE,
                    cmap: Colormap::from_list("cn", &[RED, ORANGE]),
                    alpha: 0.7,
                },
                Region {
                    patch: WESTERN_BARRIER,
                    cmap: Colormap::from_list("us", &[BLUE, CYAN]),
                    alpha: 0.6,
                },
            ],
            limit: 1.2,
            elevation: 30.0,
            azimuth: 120.0,
            style: FigureStyle::sized(10.0, 8.0),
        }
    }
}

impl CompetitionChart {
    pub fn bounds(&self) -> Bounds {
        Bounds::cube(0.0, self.limit)
    }

    fn annotations(labels: &CompetitionLabels) -> [(DVec3, Label); 3] {
        [
            (
                DVec3::new(1.1, 0.1, 0.1),
                Label::new(labels.china_zone, ANNOTATION_FONT_PT, RED).bold(),
            ),
            (
                DVec3::new(0.1, 1.1, 1.1),
                Label::new(labels.western_zone, ANNOTATION_FONT_PT, BLUE).bold(),
            ),
            (
                DVec3::new(0.5, 0.5, 0.5),
                Label::new(labels.contest_belt, ANNOTATION_FONT_PT, BLACK).italic(),
            ),
        ]
    }

    pub fn build(&self, language: Language) -> Result<Figure> {
        let labels = language.competition();
        let bounds = self.bounds();
        let limits = [(0.0, self.limit); 3];
        let axes = Axes3D::new(limits, [labels.x_axis, labels.y_axis, labels.z_axis])
            .hide_tick_labels();
        let mut figure = Figure::new(self.style, axes, self.elevation, self.azimuth);

        for region in &self.regions {
            region.patch.within(&bounds)?;
            let mesh = region.patch.to_mesh()?;
            let norm = Normalize::new(mesh.z_min, mesh.z_max);
            for quad in mesh.quads() {
                let colors = quad
                    .corners
                    .iter()
                    .map(|c| region.cmap.sample(norm.apply(c.z)))
                    .collect();
                figure
                    .scene
                    .add_polygon(quad.corners.to_vec(), colors, region.alpha);
            }
        }

        for (at, label) in Self::annotations(labels) {
            figure.scene.add_text(at, label);
        }
        Ok(figure)
    }

    pub fn render(&self, fonts: &FontBook) -> Result<(RenderedImage, Language)> {
        let language = Language::detect(fonts);
        let figure = self.build(language)?;
        info!("competition chart: {} regions, {:?} labels", self.regions.len(), language);
        Ok((figure.render(fonts), language))
    }
}

/// Line printed once the image is on disk.
pub fn status_line(language: Language, file: &str) -> String {
    format!("{}{}", language.competition().saved, file)
}

/// Renders the default chart to `output`; returns the status line to print.
pub fn run(output: &Path) -> anyhow::Result<String> {
    let fonts = FontBook::load();
    let chart = CompetitionChart::default();
    let (image, language) = chart.render(&fonts).context("failed to build competition chart")?;
    write_image(output, &image)?;
    info!("wrote {}", output.display());
    let file = output
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string());
    Ok(status_line(language, &file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;

    #[test]
    fn regions_stay_inside_the_axis_cube() {
        let chart = CompetitionChart::default();
        let bounds = chart.bounds();
        for region in &chart.regions {
            for corner in region.patch.corners() {
                assert!(bounds.contains(corner), "{corner:?}");
            }
        }
    }

    #[test]
    fn each_region_is_one_gradient_face() {
        let figure = CompetitionChart::default().build(Language::English).unwrap();
        assert_eq!(figure.scene.polygons.len(), 2);

        let china = &figure.scene.polygons[0];
        assert_eq!(china.alpha, 0.7);
        // bottom corners take the first colour, top corners the second
        assert_eq!(china.colors[0], RED);
        assert_eq!(china.colors[2], ORANGE);

        let western = &figure.scene.polygons[1];
        assert_eq!(western.colors[0], BLUE);
        assert_eq!(western.colors[2], CYAN);
    }

    #[test]
    fn tick_labels_are_hidden() {
        let figure = CompetitionChart::default().build(Language::English).unwrap();
        assert!(figure.axes.axes.iter().all(|a| !a.show_tick_labels));
        assert_eq!(figure.axes.limits(), [(0.0, 1.2); 3]);
        assert_eq!((figure.elevation, figure.azimuth), (30.0, 120.0));
        assert!(figure.title.is_none());
    }

    #[test]
    fn three_annotations_with_styles() {
        let figure = CompetitionChart::default().build(Language::English).unwrap();
        let texts = &figure.scene.texts;
        assert_eq!(texts.len(), 3);
        assert!(texts[0].label.bold && texts[1].label.bold);
        assert!(texts[2].label.italic && !texts[2].label.bold);
        assert_eq!(texts[2].at, DVec3::splat(0.5));
    }

    #[test]
    fn chinese_labels_keep_the_layout() {
        let chart = CompetitionChart::default();
        let english = chart.build(Language::English).unwrap();
        let chinese = chart.build(Language::Chinese).unwrap();
        assert_eq!(chinese.scene.polygons.len(), english.scene.polygons.len());
        assert_eq!(chinese.scene.texts.len(), english.scene.texts.len());

        let texts: Vec<&str> = chinese.scene.texts.iter().map(|t| t.label.text.as_str()).collect();
        assert_eq!(texts, ["中国优势区\n(极致性价比)", "欧美壁垒区\n(农艺/合规)", "激烈竞争带"]);
        assert_eq!(chinese.axes.axes[0].label, "X: 硬件工程化能力");
        for (zh, en) in chinese.scene.texts.iter().zip(&english.scene.texts) {
            assert_eq!(zh.at, en.at);
        }
    }

    #[test]
    fn status_line_per_language() {
        assert_eq!(status_line(Language::Chinese, OUTPUT_FILE), "图片已生成：competition_3d.png");
        assert_eq!(
            status_line(Language::English, OUTPUT_FILE),
            "Image generated: competition_3d.png"
        );
    }

    #[test]
    fn escaping_region_is_rejected() {
        let mut chart = CompetitionChart::default();
        chart.regions[1].patch.z[1][0] = 2.0;
        let err = chart.build(Language::English).err();
        assert!(matches!(err, Some(ChartError::OutOfBounds { .. })));
    }
}
