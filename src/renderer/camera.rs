use egui::{Pos2, Rect, pos2};
use glam::{DVec3, Mat4, Vec2, Vec3};

/// Orbit camera looking at the centre of the plot box.
///
/// Data coordinates are first normalised by the axis limits into a box whose
/// proportions follow `box_aspect`, centred on the origin with +Z up.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewCamera {
    /// Degrees above the XY plane.
    pub elevation: f32,
    /// Degrees counter-clockwise from +X, seen from above.
    pub azimuth: f32,
    pub distance: f32,
    pub fov: f32,
    pub box_aspect: Vec3,
    pub limits: [(f64, f64); 3],
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            elevation: 30.0,
            azimuth: -60.0,
            distance: 10.0,
            fov: 12.0_f32.to_radians(),
            box_aspect: Vec3::new(1.0, 1.0, 0.75),
            limits: [(0.0, 1.0); 3],
        }
    }
}

impl ViewCamera {
    pub fn new(elevation: f32, azimuth: f32, limits: [(f64, f64); 3]) -> Self {
        Self {
            elevation,
            azimuth,
            limits,
            ..Self::default()
        }
    }

    pub fn front(&self) -> Vec3 {
        let (el, az) = (self.elevation.to_radians(), self.azimuth.to_radians());
        Vec3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin()).normalize()
    }

    pub fn eye(&self) -> Vec3 {
        self.front() * self.distance
    }

    pub fn to_world(&self, p: DVec3) -> Vec3 {
        let axis = |v: f64, (lo, hi): (f64, f64)| {
            let span = (hi - lo).abs().max(f64::EPSILON);
            ((v - lo) / span - 0.5) as f32
        };
        Vec3::new(
            axis(p.x, self.limits[0]),
            axis(p.y, self.limits[1]),
            axis(p.z, self.limits[2]),
        ) * self.box_aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, 1.0, 0.1, self.distance * 4.0)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Eight corners of the plot box in data coordinates.
    pub fn box_corners(&self) -> [DVec3; 8] {
        let [x, y, z] = self.limits;
        std::array::from_fn(|i| {
            DVec3::new(
                if i & 1 == 0 { x.0 } else { x.1 },
                if i & 2 == 0 { y.0 } else { y.1 },
                if i & 4 == 0 { z.0 } else { z.1 },
            )
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub pos: Pos2,
    /// Distance along the view axis; larger is further away.
    pub depth: f32,
}

/// Camera plus the screen-space fit that places the plot box inside a pixel rectangle.
#[derive(Clone, Debug)]
pub struct Projector {
    pub camera: ViewCamera,
    view: Mat4,
    view_proj: Mat4,
    ndc_center: Vec2,
    scale: f32,
    screen_center: Pos2,
}

impl Projector {
    pub fn fit(camera: ViewCamera, rect: Rect) -> Self {
        let view = camera.view_matrix();
        let view_proj = camera.view_projection_matrix();

        let (lo, hi) = camera
            .box_corners()
            .iter()
            .map(|&c| view_proj.project_point3(camera.to_world(c)).truncate())
            .fold((Vec2::MAX, Vec2::MIN), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let extent = (hi - lo).max(Vec2::splat(1e-6));
        let scale = (rect.width() / extent.x).min(rect.height() / extent.y);

        Self {
            camera,
            view,
            view_proj,
            ndc_center: (lo + hi) * 0.5,
            scale,
            screen_center: rect.center(),
        }
    }

    pub fn project(&self, p: DVec3) -> Projected {
        self.project_world(self.camera.to_world(p))
    }

    pub fn project_world(&self, world: Vec3) -> Projected {
        let ndc = self.view_proj.project_point3(world).truncate();
        let offset = (ndc - self.ndc_center) * self.scale;
        Projected {
            pos: pos2(self.screen_center.x + offset.x, self.screen_center.y - offset.y),
            depth: -self.view.transform_point3(world).z,
        }
    }

    pub fn depth(&self, p: DVec3) -> f32 {
        -self.view.transform_point3(self.camera.to_world(p)).z
    }

    pub fn screen_bounds(&self) -> Rect {
        let mut rect = Rect::NOTHING;
        for c in self.camera.box_corners() {
            rect.extend_with(self.project(c).pos);
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector(elevation: f32, azimuth: f32) -> Projector {
        let camera = ViewCamera::new(elevation, azimuth, [(0.0, 10.0); 3]);
        Projector::fit(camera, Rect::from_min_max(pos2(100.0, 50.0), pos2(700.0, 550.0)))
    }

    #[test]
    fn plot_box_fits_the_viewport() {
        let proj = projector(25.0, 45.0);
        let bounds = proj.screen_bounds();
        assert!(bounds.min.x >= 99.0 && bounds.max.x <= 701.0);
        assert!(bounds.min.y >= 49.0 && bounds.max.y <= 551.0);
        let touches_x = (bounds.width() - 600.0).abs() < 1.0;
        let touches_y = (bounds.height() - 500.0).abs() < 1.0;
        assert!(touches_x || touches_y);
    }

    #[test]
    fn up_is_up_on_screen() {
        let proj = projector(25.0, 45.0);
        let bottom = proj.project(DVec3::new(5.0, 5.0, 0.0));
        let top = proj.project(DVec3::new(5.0, 5.0, 10.0));
        assert!(top.pos.y < bottom.pos.y);
    }

    #[test]
    fn corner_facing_the_eye_is_nearest() {
        // azimuth 45 puts the eye over the (+x, +y) quadrant
        let proj = projector(25.0, 45.0);
        let near = proj.depth(DVec3::new(10.0, 10.0, 5.0));
        let far = proj.depth(DVec3::new(0.0, 0.0, 5.0));
        assert!(near < far);
    }
}
