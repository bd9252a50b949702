use egui::{Pos2, Rect, pos2, vec2};
use log::{debug, info};

use crate::renderer::axes::{Axes3D, format_tick, nice_step, nice_ticks};
use crate::renderer::camera::{Projector, ViewCamera};
use crate::renderer::canvas::{Canvas, Rgba8};
use crate::renderer::colormap::{Colormap, Normalize};
use crate::renderer::scene::{Label, Scene};
use crate::renderer::text::{FontBook, HAlign, TextStyle, VAlign};
use crate::renderer::theme::{AXIS_LINE, BG_FIGURE, FigureStyle, LEGEND_EDGE, TEXT_PRIMARY, WHITE};

const COLORBAR_SHRINK: f32 = 0.5;
const COLORBAR_ASPECT: f32 = 10.0;
const LEGEND_FONT_PT: f32 = 9.0;
const COLORBAR_LABEL_PT: f32 = 10.0;

pub struct Colorbar {
    pub cmap: Colormap,
    pub norm: Normalize,
    pub label: String,
}

pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba8>,
}

impl RenderedImage {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// A single 3-D axes with optional title, legend and colorbar.
pub struct Figure {
    pub style: FigureStyle,
    pub title: Option<Label>,
    pub axes: Axes3D,
    pub elevation: f32,
    pub azimuth: f32,
    pub scene: Scene,
    pub legend: bool,
    pub colorbar: Option<Colorbar>,
}

impl Figure {
    pub fn new(style: FigureStyle, axes: Axes3D, elevation: f32, azimuth: f32) -> Self {
        Self {
            style,
            title: None,
            axes,
            elevation,
            azimuth,
            scene: Scene::new(),
            legend: false,
            colorbar: None,
        }
    }

    pub fn camera(&self) -> ViewCamera {
        ViewCamera::new(self.elevation, self.azimuth, self.axes.limits())
    }

    fn axes_rect(&self, canvas: Rect, title_height: f32) -> Rect {
        let mut area = canvas;
        area.min.y += title_height;
        if self.colorbar.is_some() {
            area.max.x -= canvas.width() * 0.14;
        }
        area.shrink2(vec2(area.width() * 0.12, area.height() * 0.1))
    }

    pub fn render(&self, fonts: &FontBook) -> RenderedImage {
        let (width, height) = self.style.output_size();
        info!("rendering {width}x{height} figure");
        let mut canvas = Canvas::new(width, height, self.style.supersample, BG_FIGURE);
        let bounds = canvas.rect();

        let title = self.title.as_ref().map(|label| {
            let style = label.text_style(&self.style).align(HAlign::Center, VAlign::Top);
            let layout_height = fonts.layout(&label.text, &style).height;
            (label, style, layout_height + self.style.px(20.0))
        });
        let title_height = title.as_ref().map_or(self.style.px(10.0), |t| t.2);

        let rect = self.axes_rect(bounds, title_height);
        let projector = Projector::fit(self.camera(), rect);
        debug!("axes rect {rect:?}");

        self.axes.draw_panes(&mut canvas, &projector, &self.style);
        self.axes.draw_axes(&mut canvas, &projector, fonts, &self.style);
        self.scene.render(&mut canvas, &projector, fonts, &self.style);

        if self.legend {
            self.draw_legend(&mut canvas, fonts, rect);
        }
        if let Some(colorbar) = &self.colorbar {
            self.draw_colorbar(&mut canvas, fonts, colorbar, rect);
        }
        if let Some((label, style, _)) = title {
            let anchor = pos2(bounds.center().x, self.style.px(10.0));
            label.draw_at(&mut canvas, fonts, anchor, &style);
        }

        let (width, height, pixels) = canvas.resolve();
        RenderedImage {
            width,
            height,
            pixels,
        }
    }

    fn draw_legend(&self, canvas: &mut Canvas, fonts: &FontBook, axes: Rect) {
        let entries: Vec<_> = self.scene.legend_entries().collect();
        if entries.is_empty() {
            return;
        }
        let style = TextStyle::new(self.style.px(LEGEND_FONT_PT), TEXT_PRIMARY)
            .align(HAlign::Left, VAlign::Center);
        let row = style.size * 1.6;
        let handle = style.size * 2.0;
        let pad = style.size * 0.5;

        let layouts: Vec<_> = entries.iter().map(|(text, _)| fonts.layout(text, &style)).collect();
        let text_width = layouts.iter().map(|l| l.width).fold(0.0, f32::max);
        let frame = Rect::from_min_size(
            axes.min,
            vec2(pad * 3.0 + handle + text_width, pad * 2.0 + row * entries.len() as f32),
        );
        canvas.fill_rounded_rect(frame, pad * 0.6, WHITE, 0.8);
        canvas.stroke_rounded_rect(frame, pad * 0.6, self.style.px(0.8), LEGEND_EDGE, 0.8);

        for (i, ((_, marker), layout)) in entries.iter().zip(&layouts).enumerate() {
            let cy = frame.min.y + pad + row * (i as f32 + 0.5);
            let handle_center = pos2(frame.min.x + pad + handle * 0.5, cy);
            // legend handles are drawn at a fixed scale so big markers stay inside the frame
            let scale = (style.size * 0.8 / marker.area.sqrt()).min(self.style.px(1.0));
            marker.draw_at(canvas, handle_center, scale);
            layout.draw(canvas, pos2(frame.min.x + pad * 2.0 + handle, cy), &style);
        }
    }

    fn draw_colorbar(&self, canvas: &mut Canvas, fonts: &FontBook, colorbar: &Colorbar, axes: Rect) {
        let height = axes.height() * COLORBAR_SHRINK;
        let width = height / COLORBAR_ASPECT;
        let bar = Rect::from_min_size(
            pos2(axes.max.x + axes.width() * 0.08, axes.center().y - height * 0.5),
            vec2(width, height),
        );

        let rows = bar.height().ceil() as usize;
        for i in 0..rows {
            let t = 1.0 - (i as f32 + 0.5) / rows as f32;
            let y = bar.min.y + i as f32;
            let strip = Rect::from_min_max(pos2(bar.min.x, y), pos2(bar.max.x, (y + 1.0).min(bar.max.y)));
            canvas.fill_where(strip, colorbar.cmap.sample(t), 1.0, |_| true);
        }
        let line = self.style.px(0.8);
        let outline = [bar.left_top(), bar.right_top(), bar.right_bottom(), bar.left_bottom(), bar.left_top()];
        canvas.stroke_polyline(&outline, line, AXIS_LINE, 1.0, None);

        let tick_style = TextStyle::new(self.style.px(self.style.tick_font_pt), TEXT_PRIMARY)
            .align(HAlign::Left, VAlign::Center);
        let (vmin, vmax) = (colorbar.norm.vmin, colorbar.norm.vmax);
        let step = nice_step(vmin, vmax, 6);
        let tick_len = self.style.px(3.5);
        let mut reach: f32 = 0.0;
        for t in nice_ticks(vmin, vmax, 6) {
            let y = bar.max.y - colorbar.norm.apply(t) * bar.height();
            let at = pos2(bar.max.x, y);
            canvas.stroke_segment(at, at + vec2(tick_len, 0.0), line, AXIS_LINE, 1.0);
            let layout = fonts.layout(&format_tick(t, step), &tick_style);
            layout.draw(canvas, at + vec2(tick_len * 2.0, 0.0), &tick_style);
            reach = reach.max(layout.width);
        }

        let label_style = TextStyle::new(self.style.px(COLORBAR_LABEL_PT), TEXT_PRIMARY)
            .align(HAlign::Center, VAlign::Center)
            .rotated(std::f32::consts::FRAC_PI_2);
        let layout = fonts.layout(&colorbar.label, &label_style);
        let anchor = Pos2::new(
            bar.max.x + tick_len * 3.0 + reach + layout.height * 0.5,
            bar.center().y,
        );
        layout.draw(canvas, anchor, &label_style);
    }
}
