use glam::{Mat4, Vec3};
use glyphtrail::config::CameraSettings;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 100.0;

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Distance from the camera to the target.
    pub radius: f32,
    /// Angle around the world Y axis; `PI` puts the camera on -Z.
    pub azimuth_rad: f32,
    /// Angle above the XZ plane.
    pub elevation_rad: f32,
    pub fov_rad: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl OrbitCamera {
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            radius: settings.distance,
            azimuth_rad: std::f32::consts::PI,
            elevation_rad: 0.0,
            fov_rad: settings.fov_deg.to_radians(),
            near: settings.near,
            far: settings.far,
            aspect,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth_rad.sin_cos();
        let (sin_el, cos_el) = self.elevation_rad.sin_cos();
        self.target
            + Vec3::new(
                self.radius * cos_el * sin_az,
                self.radius * sin_el,
                self.radius * cos_el * cos_az,
            )
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// wgpu clip space, depth in [0, 1].
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_rad, self.aspect, self.near, self.far)
    }
}

/// Left-drag orbits, the wheel zooms.
#[derive(Default)]
pub struct CameraController {
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left {
                    self.mouse_down = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_orbit((position.x, position.y), camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.handle_scroll(scroll, camera);
            }
            _ => {}
        }
    }

    fn handle_scroll(&mut self, delta: f32, camera: &mut OrbitCamera) {
        // Scrolling up moves closer.
        camera.radius = (camera.radius * 1.1f32.powf(-delta)).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    fn handle_cursor_orbit(&mut self, xy: (f64, f64), camera: &mut OrbitCamera) {
        if let Some(last) = self.last_mouse {
            if self.mouse_down {
                let dx = ((xy.0 - last.0) * 0.005) as f32;
                let dy = ((last.1 - xy.1) * 0.005) as f32;

                camera.azimuth_rad -= dx;
                camera.elevation_rad = (camera.elevation_rad - dy)
                    .clamp(-89f32.to_radians(), 89f32.to_radians());
            }
        }
        self.last_mouse = Some(xy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraSettings::default(), 16.0 / 9.0)
    }

    #[test]
    fn default_camera_sits_on_negative_z() {
        let cam = camera();
        let pos = cam.position();
        assert!(pos.x.abs() < 1e-5 && pos.y.abs() < 1e-5);
        assert!((pos.z + 10.0).abs() < 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_centre_inside_depth_range() {
        let cam = camera();
        let clip = cam.proj() * cam.view() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn scroll_zooms_within_limits() {
        let mut cam = camera();
        let mut ctl = CameraController::new();
        ctl.handle_scroll(1.0, &mut cam);
        assert!(cam.radius < 10.0);
        for _ in 0..200 {
            ctl.handle_scroll(-1.0, &mut cam);
        }
        assert_eq!(cam.radius, MAX_RADIUS);
        for _ in 0..200 {
            ctl.handle_scroll(1.0, &mut cam);
        }
        assert_eq!(cam.radius, MIN_RADIUS);
    }

    #[test]
    fn orbit_requires_a_held_button() {
        let mut cam = camera();
        let mut ctl = CameraController::new();
        ctl.handle_cursor_orbit((0.0, 0.0), &mut cam);
        ctl.handle_cursor_orbit((100.0, 0.0), &mut cam);
        assert_eq!(cam.azimuth_rad, std::f32::consts::PI);

        ctl.mouse_down = true;
        ctl.handle_cursor_orbit((200.0, 0.0), &mut cam);
        assert!((cam.azimuth_rad - (std::f32::consts::PI - 0.5)).abs() < 1e-5);

        ctl.handle_cursor_orbit((200.0, -100_000.0), &mut cam);
        assert!(cam.elevation_rad <= 89f32.to_radians() + 1e-6);
    }
}
