//! Text rendering straight from glyph outlines.
//!
//! Glyph outlines come from `ttf-parser`, are collected into lyon paths and
//! triangulated with the nonzero fill rule; the triangles go straight to the
//! canvas. Faces are egui's bundled fonts, optionally followed by a CJK face
//! found on the system.

use std::borrow::Cow;
use std::path::Path;

use egui::{Color32, FontFamily, FontDefinitions, Pos2, Rect, pos2, vec2};
use glam::Vec2;
use log::{debug, info};
use lyon_path::math::{Point, point};
use lyon_path::Path as GlyphPath;
use lyon_path::path::Builder as GlyphPathBuilder;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, FillVertexConstructor,
    LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor,
    VertexBuffers,
};
use ttf_parser::{Face, OutlineBuilder};

use crate::error::{ChartError, Result};
use crate::renderer::canvas::Canvas;

const FLATTEN_TOLERANCE_PX: f32 = 0.1;
const ITALIC_SHEAR: f32 = 0.21;
const BOLD_WEIGHT: f32 = 0.035;

/// Well-known locations of fonts with CJK coverage.
pub const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/truetype/arphic/uming.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    /// Baseline of the last line.
    Baseline,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color32,
    pub alpha: f32,
    pub bold: bool,
    pub italic: bool,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Counter-clockwise, radians.
    pub rotation: f32,
    pub line_spacing: f32,
}

impl TextStyle {
    pub fn new(size: f32, color: Color32) -> Self {
        Self {
            size,
            color,
            alpha: 1.0,
            bold: false,
            italic: false,
            halign: HAlign::Left,
            valign: VAlign::Baseline,
            rotation: 0.0,
            line_spacing: 1.2,
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

    pub fn align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn rotated(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }
}

struct FontSource {
    name: String,
    data: Cow<'static, [u8]>,
    index: u32,
}

/// Ordered list of font faces; later faces fill glyphs missing from earlier ones.
pub struct FontBook {
    sources: Vec<FontSource>,
}

impl FontBook {
    /// egui's bundled proportional faces, then its monospace faces.
    pub fn bundled() -> Self {
        let defs = FontDefinitions::default();
        let mut names: Vec<String> = Vec::new();
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            for name in defs.families.get(&family).into_iter().flatten() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }

        let sources = names
            .into_iter()
            .filter_map(|name| {
                let data = defs.font_data.get(&name)?;
                Some(FontSource {
                    data: data.font.clone(),
                    index: data.index,
                    name,
                })
            })
            .collect();
        Self { sources }
    }

    /// Bundled faces plus the first usable CJK face from [`CJK_FONT_CANDIDATES`].
    pub fn load() -> Self {
        let mut book = Self::bundled();
        for candidate in CJK_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match book.add_font_file(path) {
                Ok(()) => {
                    info!("registered CJK font {}", path.display());
                    break;
                }
                Err(e) => debug!("skipping {}: {e}", path.display()),
            }
        }
        book
    }

    pub fn add_font_file(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read(path)?;
        self.add_font(&path.display().to_string(), data)
    }

    pub fn add_font(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        Face::parse(&data, 0).map_err(|e| ChartError::Font(format!("{name}: {e}")))?;
        self.sources.push(FontSource {
            name: name.to_owned(),
            data: Cow::Owned(data),
            index: 0,
        });
        Ok(())
    }

    pub fn face_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    fn faces(&self) -> Vec<Face<'_>> {
        self.sources
            .iter()
            .filter_map(|s| Face::parse(&s.data, s.index).ok())
            .collect()
    }

    /// True when every visible character has a glyph in some face.
    pub fn covers(&self, text: &str) -> bool {
        let faces = self.faces();
        text.chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| faces.iter().any(|f| has_glyph(f, c)))
    }

    pub fn layout(&self, text: &str, style: &TextStyle) -> TextLayout {
        let faces = self.faces();
        let size = style.size;
        let (ascent, descent) = faces
            .first()
            .map(|f| {
                let em = f.units_per_em() as f32;
                (f.ascender() as f32 / em * size, -(f.descender() as f32) / em * size)
            })
            .unwrap_or((0.8 * size, 0.2 * size));
        let line_height = size * style.line_spacing;
        let shear = if style.italic { ITALIC_SHEAR } else { 0.0 };

        let tolerance = flatten_tolerance(size);
        let bold_width = if style.bold { 2.0 * size * BOLD_WEIGHT } else { 0.0 };

        let mut lines: Vec<(f32, Vec<Vec<[Vec2; 3]>>)> = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            let baseline = ascent + i as f32 * line_height;
            let mut pen = 0.0f32;
            let mut glyphs = Vec::new();
            for ch in line.chars() {
                let Some(face) = faces.iter().find(|f| has_glyph(f, ch)) else {
                    pen += 0.5 * size;
                    continue;
                };
                let Some(id) = face.glyph_index(ch) else {
                    continue;
                };
                let scale = size / face.units_per_em() as f32;
                let mut sink = PathSink::new(GlyphMap {
                    origin: Vec2::new(pen, baseline),
                    scale,
                    shear,
                });
                if face.outline_glyph(id, &mut sink).is_some() {
                    match tessellate(&sink.finish(), tolerance, bold_width) {
                        Ok(triangles) => glyphs.push(triangles),
                        Err(e) => debug!("skipping {ch:?}: {e}"),
                    }
                }
                pen += face.glyph_hor_advance(id).unwrap_or(0) as f32 * scale;
            }
            lines.push((pen, glyphs));
        }

        let width = lines.iter().map(|(w, _)| *w).fold(0.0, f32::max);
        let mut triangles: Vec<[Vec2; 3]> = Vec::new();
        let mut glyph_total = 0;
        for (line_width, line_glyphs) in lines {
            let shift = match style.halign {
                HAlign::Left => 0.0,
                HAlign::Center => (width - line_width) * 0.5,
                HAlign::Right => width - line_width,
            };
            glyph_total += line_glyphs.len();
            for tri in line_glyphs.into_iter().flatten() {
                triangles.push(tri.map(|p| p + Vec2::new(shift, 0.0)));
            }
        }

        let line_count = text.split('\n').count().max(1);
        let last_baseline = ascent + (line_count - 1) as f32 * line_height;
        TextLayout {
            triangles,
            glyphs: glyph_total,
            width,
            height: last_baseline + descent,
            last_baseline,
        }
    }
}

fn has_glyph(face: &Face<'_>, ch: char) -> bool {
    face.glyph_index(ch).is_some_and(|id| id.0 != 0)
}

#[derive(Clone, Copy)]
struct GlyphMap {
    origin: Vec2,
    scale: f32,
    shear: f32,
}

impl GlyphMap {
    fn apply(&self, x: f32, y: f32) -> Point {
        point(
            self.origin.x + (x + self.shear * y) * self.scale,
            self.origin.y - y * self.scale,
        )
    }
}

/// Feeds glyph outlines into a lyon path, in layout pixels.
struct PathSink {
    map: GlyphMap,
    builder: GlyphPathBuilder,
    open: bool,
}

impl PathSink {
    fn new(map: GlyphMap) -> Self {
        Self {
            map,
            builder: GlyphPath::builder(),
            open: false,
        }
    }

    fn finish(mut self) -> GlyphPath {
        if self.open {
            self.builder.end(true);
        }
        self.builder.build()
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.end(true);
        }
        self.builder.begin(self.map.apply(x, y));
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.map.apply(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quadratic_bezier_to(self.map.apply(x1, y1), self.map.apply(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_bezier_to(
            self.map.apply(x1, y1),
            self.map.apply(x2, y2),
            self.map.apply(x, y),
        );
    }

    fn close(&mut self) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
    }
}

#[derive(Clone, Copy)]
struct CornerCtor;

impl FillVertexConstructor<Point> for CornerCtor {
    fn new_vertex(&mut self, v: FillVertex) -> Point {
        v.position()
    }
}

impl StrokeVertexConstructor<Point> for CornerCtor {
    fn new_vertex(&mut self, v: StrokeVertex) -> Point {
        v.position()
    }
}

/// Flattening tolerance in pixels; small text gets a finer one.
fn flatten_tolerance(size: f32) -> f32 {
    (size * 0.01).clamp(0.01, FLATTEN_TOLERANCE_PX)
}

/// Triangulates a glyph path with the nonzero rule; a positive `bold_width`
/// also strokes the outline at that width.
fn tessellate(path: &GlyphPath, tolerance: f32, bold_width: f32) -> Result<Vec<[Vec2; 3]>> {
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            path,
            &FillOptions::tolerance(tolerance).with_fill_rule(FillRule::NonZero),
            &mut BuffersBuilder::new(&mut buffers, CornerCtor),
        )
        .map_err(|e| ChartError::Font(format!("glyph tessellation failed: {e:?}")))?;

    if bold_width > 0.0 {
        StrokeTessellator::new()
            .tessellate_path(
                path,
                &StrokeOptions::tolerance(tolerance)
                    .with_line_width(bold_width)
                    .with_line_join(LineJoin::Round),
                &mut BuffersBuilder::new(&mut buffers, CornerCtor),
            )
            .map_err(|e| ChartError::Font(format!("glyph stroke failed: {e:?}")))?;
    }

    let at = |i: u32| {
        let p = buffers.vertices[i as usize];
        Vec2::new(p.x, p.y)
    };
    Ok(buffers
        .indices
        .chunks_exact(3)
        .map(|t| [at(t[0]), at(t[1]), at(t[2])])
        .collect())
}

/// Triangulated glyphs of a laid-out text block, in a y-down frame whose
/// origin is the block's top-left corner.
pub struct TextLayout {
    triangles: Vec<[Vec2; 3]>,
    glyphs: usize,
    pub width: f32,
    pub height: f32,
    pub last_baseline: f32,
}

impl TextLayout {
    pub fn size(&self) -> egui::Vec2 {
        vec2(self.width, self.height)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs
    }

    fn anchor_offset(&self, style: &TextStyle) -> Vec2 {
        let x = match style.halign {
            HAlign::Left => 0.0,
            HAlign::Center => self.width * 0.5,
            HAlign::Right => self.width,
        };
        let y = match style.valign {
            VAlign::Top => 0.0,
            VAlign::Center => self.height * 0.5,
            VAlign::Bottom => self.height,
            VAlign::Baseline => self.last_baseline,
        };
        Vec2::new(x, y)
    }

    /// Screen rectangle of the unrotated block placed at `anchor`.
    pub fn block_rect(&self, anchor: Pos2, style: &TextStyle) -> Rect {
        let offset = self.anchor_offset(style);
        let min = pos2(anchor.x - offset.x, anchor.y - offset.y);
        Rect::from_min_size(min, self.size())
    }

    pub fn draw(&self, canvas: &mut Canvas, anchor: Pos2, style: &TextStyle) {
        let offset = self.anchor_offset(style);
        let (sin, cos) = style.rotation.sin_cos();
        let place = |p: Vec2| {
            let q = p - offset;
            pos2(
                anchor.x + q.x * cos + q.y * sin,
                anchor.y - q.x * sin + q.y * cos,
            )
        };
        for tri in &self.triangles {
            canvas.fill_triangle(tri.map(&place), [style.color; 3], style.alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::theme::{BLACK, WHITE};

    #[test]
    fn bundled_faces_cover_latin() {
        let book = FontBook::bundled();
        assert!(book.face_names().count() >= 1);
        assert!(book.covers("Western Giants (Bio-Data Wall)"));
    }

    #[test]
    fn lines_stack_and_widen() {
        let book = FontBook::bundled();
        let style = TextStyle::new(20.0, BLACK);
        let one = book.layout("China Position", &style);
        let two = book.layout("China Position\nAg", &style);
        assert!(one.width > 0.0);
        assert_eq!(one.width, two.width);
        assert!(two.height > one.height + 20.0);
        assert!(two.last_baseline > one.last_baseline);
    }

    #[test]
    fn whitespace_has_no_glyphs() {
        let book = FontBook::bundled();
        let layout = book.layout("a b", &TextStyle::new(16.0, BLACK));
        assert_eq!(layout.glyph_count(), 2);
    }

    #[test]
    fn anchoring_moves_the_block() {
        let book = FontBook::bundled();
        let style = TextStyle::new(16.0, BLACK).align(HAlign::Right, VAlign::Top);
        let layout = book.layout("X", &style);
        let rect = layout.block_rect(pos2(100.0, 50.0), &style);
        assert!((rect.max.x - 100.0).abs() < 1e-3);
        assert!((rect.min.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn drawing_marks_pixels() {
        let book = FontBook::bundled();
        let style = TextStyle::new(24.0, BLACK).bold();
        let layout = book.layout("H", &style);
        let mut canvas = Canvas::new(40, 40, 1, WHITE);
        layout.draw(&mut canvas, pos2(5.0, 32.0), &style);
        let inked = (0..40)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y)[0] < 0.5)
            .count();
        assert!(inked > 20, "only {inked} pixels inked");
    }

    fn square(builder: &mut GlyphPathBuilder, min: f32, side: f32) {
        builder.begin(point(min, min));
        builder.line_to(point(min + side, min));
        builder.line_to(point(min + side, min + side));
        builder.line_to(point(min, min + side));
        builder.end(true);
    }

    fn area(triangles: &[[Vec2; 3]]) -> f32 {
        triangles
            .iter()
            .map(|[a, b, c]| ((*b - *a).perp_dot(*c - *a) * 0.5).abs())
            .sum()
    }

    #[test]
    fn overlapping_contours_fill_their_union() {
        let mut builder = GlyphPath::builder();
        square(&mut builder, 0.0, 10.0);
        square(&mut builder, 5.0, 10.0);
        let triangles = tessellate(&builder.build(), 0.1, 0.0).unwrap();
        // nonzero keeps the shared 5x5 overlap filled
        assert!((area(&triangles) - 175.0).abs() < 1e-2, "{}", area(&triangles));
    }

    #[test]
    fn bold_stroke_widens_the_glyph() {
        let mut builder = GlyphPath::builder();
        square(&mut builder, 0.0, 10.0);
        let path = builder.build();
        let plain = area(&tessellate(&path, 0.1, 0.0).unwrap());
        let bold = area(&tessellate(&path, 0.1, 1.0).unwrap());
        assert!((plain - 100.0).abs() < 1e-2);
        assert!(bold > plain + 30.0, "bold area {bold}");
    }

    #[test]
    fn larger_text_flattens_finer() {
        let book = FontBook::bundled();
        let small = book.layout("O", &TextStyle::new(12.0, BLACK));
        let large = book.layout("O", &TextStyle::new(96.0, BLACK));
        assert!(large.triangles.len() > small.triangles.len());
    }

    #[test]
    fn broken_font_data_is_rejected() {
        let mut book = FontBook::bundled();
        let before = book.face_names().count();
        let err = book.add_font("junk", vec![0; 16]).unwrap_err();
        assert!(matches!(err, ChartError::Font(ref msg) if msg.starts_with("junk")));
        assert_eq!(book.face_names().count(), before);
    }
}
