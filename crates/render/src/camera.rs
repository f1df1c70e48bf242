use glam::{Mat4, Quat, Vec3};
use walksim_common::{CameraConfig, MovementMode};

/// First-person free-look camera.
///
/// Yaw and pitch are in radians. At zero yaw and pitch the camera looks down
/// -Z with +Y up. Mouse motion to the right decreases yaw (turns right),
/// motion upward increases pitch (looks up).
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub max_pitch: f32,
    pub mode: MovementMode,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

impl FirstPersonCamera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            yaw: 0.0,
            pitch: 0.0,
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            speed: config.move_speed,
            sensitivity: config.mouse_sensitivity,
            max_pitch: config.max_pitch_degrees.to_radians(),
            mode: config.mode,
        }
    }

    /// Update the aspect ratio from a framebuffer size. Zero heights are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unit view direction, pitch included.
    pub fn look(&self) -> Vec3 {
        (Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)) * Vec3::NEG_Z
    }

    /// Direction of forward movement for the current [`MovementMode`].
    pub fn forward(&self) -> Vec3 {
        match self.mode {
            MovementMode::Fly => self.look(),
            MovementMode::Walk => Quat::from_rotation_y(self.yaw) * Vec3::NEG_Z,
        }
    }

    /// Horizontal unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw - 90.0_f32.to_radians()) * Vec3::NEG_Z
    }

    /// Apply relative mouse motion in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-self.max_pitch, self.max_pitch);
    }

    /// Move along the forward and right axes. `forward` and `strafe` are
    /// normally in `[-1, 1]`; `dt` is in seconds.
    pub fn apply_movement(&mut self, forward: f32, strafe: f32, dt: f32) {
        let step = self.speed * dt;
        self.position += self.forward() * (forward * step) + self.right() * (strafe * step);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.look(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Full model-view-projection for an object with the given model matrix.
    pub fn model_view_projection(&self, model: Mat4) -> Mat4 {
        self.view_projection() * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera() {
        let cam = FirstPersonCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        assert!(close(cam.look(), Vec3::NEG_Z));
        assert!(close(cam.right(), Vec3::X));
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn mouse_right_turns_right() {
        let mut cam = FirstPersonCamera::default();
        cam.rotate(100.0, 0.0);
        assert!(cam.yaw < 0.0);
        assert!(cam.look().x > 0.0);
    }

    #[test]
    fn mouse_up_looks_up() {
        let mut cam = FirstPersonCamera::default();
        cam.rotate(0.0, -50.0);
        assert!(cam.pitch > 0.0);
        assert!(cam.look().y > 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FirstPersonCamera::default();
        cam.rotate(0.0, -1.0e6);
        assert!((cam.pitch - 89.0_f32.to_radians()).abs() < 1e-6);
        cam.rotate(0.0, 1.0e6);
        assert!((cam.pitch + 89.0_f32.to_radians()).abs() < 1e-6);
        assert!(!cam.view_matrix().is_nan());
    }

    #[test]
    fn right_stays_horizontal_and_perpendicular() {
        let mut cam = FirstPersonCamera::default();
        cam.rotate(123.0, -80.0);
        let right = cam.right();
        assert!(right.y.abs() < 1e-6);
        assert!(right.dot(cam.look()).abs() < 1e-5);
    }

    #[test]
    fn fly_mode_moves_along_look() {
        let mut cam = FirstPersonCamera::default();
        cam.rotate(0.0, -100.0);
        let start = cam.position;
        cam.apply_movement(1.0, 0.0, 1.0);
        let moved = cam.position - start;
        assert!(close(moved, cam.look() * cam.speed));
        assert!(moved.y > 0.0);
    }

    #[test]
    fn walk_mode_stays_on_plane() {
        let mut cam = FirstPersonCamera::default();
        cam.mode = MovementMode::Walk;
        cam.rotate(40.0, -100.0);
        let start = cam.position;
        cam.apply_movement(1.0, 1.0, 0.5);
        assert!((cam.position.y - start.y).abs() < 1e-6);
        assert_ne!(cam.position, start);
    }

    #[test]
    fn strafe_moves_right() {
        let mut cam = FirstPersonCamera::default();
        cam.apply_movement(0.0, 1.0, 1.0);
        assert!(close(cam.position, Vec3::new(cam.speed, 0.0, 5.0)));
        cam.apply_movement(0.0, -1.0, 1.0);
        assert!(close(cam.position, Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let cam = FirstPersonCamera::default();
        let clip = cam.model_view_projection(Mat4::IDENTITY) * glam::Vec4::W;
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = FirstPersonCamera::default();
        cam.set_viewport(1280, 720);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
        cam.set_viewport(100, 0);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
