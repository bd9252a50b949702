use egui::Color32;

pub const BG_FIGURE: Color32 = Color32::from_rgb(255, 255, 255);
pub const BG_PANE: Color32 = Color32::from_rgb(242, 242, 242);
pub const PANE_EDGE: Color32 = Color32::from_rgb(204, 204, 204);
pub const GRID_LINE: Color32 = Color32::from_rgb(176, 176, 176);
pub const AXIS_LINE: Color32 = Color32::from_rgb(0, 0, 0);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0, 0, 0);
pub const LEGEND_EDGE: Color32 = Color32::from_rgb(204, 204, 204);

pub const RED: Color32 = Color32::from_rgb(255, 0, 0);
pub const DARK_RED: Color32 = Color32::from_rgb(139, 0, 0);
pub const ORANGE: Color32 = Color32::from_rgb(255, 165, 0);
pub const BLUE: Color32 = Color32::from_rgb(0, 0, 255);
pub const DARK_BLUE: Color32 = Color32::from_rgb(0, 0, 139);
pub const CYAN: Color32 = Color32::from_rgb(0, 255, 255);
pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
pub const BLACK: Color32 = Color32::from_rgb(0, 0, 0);

pub const PANE_ALPHA: f32 = 0.5;
pub const GRID_ALPHA: f32 = 1.0;

/// Figure-wide sizing, in inches and points like a print layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureStyle {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    /// Samples per output pixel along each axis.
    pub supersample: u32,
    pub tick_font_pt: f32,
    pub axis_label_pt: f32,
    pub axis_line_pt: f32,
    pub grid_line_pt: f32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width_in: 12.0,
            height_in: 9.0,
            dpi: 100.0,
            supersample: 2,
            tick_font_pt: 8.0,
            axis_label_pt: 11.0,
            axis_line_pt: 0.8,
            grid_line_pt: 0.8,
        }
    }
}

impl FigureStyle {
    pub fn sized(width_in: f32, height_in: f32) -> Self {
        Self {
            width_in,
            height_in,
            ..Self::default()
        }
    }

    pub fn output_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round() as u32,
            (self.height_in * self.dpi).round() as u32,
        )
    }

    /// Points to canvas pixels, supersampling included.
    pub fn px(&self, points: f32) -> f32 {
        points * self.dpi / 72.0 * self.supersample as f32
    }
}

#[inline(always)]
pub fn unit_rgb(color: Color32) -> [f32; 3] {
    [
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    ]
}

pub fn mix(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}
