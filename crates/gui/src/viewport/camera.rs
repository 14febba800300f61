use glam::{Mat4, Vec3};

/// Snapshot of the host viewer's perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub position: Vec3,
    /// View direction (need not be normalized)
    pub direction: Vec3,
    /// Camera up vector as reported by the host
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, direction: Vec3, up: Vec3) -> Self {
        Self {
            position,
            direction,
            up,
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self::new(position, target - position, up)
    }

    /// Normalized view direction
    pub fn forward(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }

    /// Right vector (`forward × up`). Falls back to an arbitrary
    /// perpendicular when the view direction is parallel to `up`.
    pub fn right(&self) -> Vec3 {
        let fwd = self.forward();
        fwd.cross(self.up)
            .try_normalize()
            .unwrap_or_else(|| fwd.any_orthonormal_vector())
    }

    /// Up vector re-orthogonalized against the view direction
    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    /// Normalized host up vector, used for the issue ring plane.
    /// Falls back to [`Camera::true_up`] when `up` is zero or parallel to
    /// the view direction, so the ring always faces the camera.
    pub fn up_axis(&self) -> Vec3 {
        match self.up.try_normalize() {
            Some(up) if up.dot(self.forward()).abs() <= 1.0 - 1e-4 => up,
            _ => self.true_up(),
        }
    }

    /// Distance from the eye to a world point
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.true_up())
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}
