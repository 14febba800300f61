use glam::Vec3;

use pinview_gui_lib::viewer::Camera;

/// Orbit camera driven by mouse input in the demo viewport
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 30.0,
            target: Vec3::new(0.0, 4.0, 0.0),
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(1.0, 400.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let camera = self.snapshot();
        self.target += camera.right() * dx + camera.true_up() * dy;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(self.distance * cp * sy, self.distance * sp, self.distance * cp * cy)
    }

    /// Camera state as seen by the overlay
    pub fn snapshot(&self) -> Camera {
        let mut camera = Camera::looking_at(self.eye_position(), self.target, Vec3::Y);
        camera.fov = self.fov;
        camera
    }
}
