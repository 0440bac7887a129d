use glam::{Mat4, Vec3};
use thiserror::Error;

/// Maximum pitch in degrees before the camera's forward vector becomes nearly
/// parallel with the world up axis and the view matrix flips.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// A first person camera in a right handed coordinate system with +Y up and
/// +Z out of the screen.
///
/// The camera stores a world position plus yaw and pitch angles, and derives
/// an orthonormal forward/right/up basis from them:
///
///   forward = (cos(yaw) * cos(pitch), sin(pitch), sin(yaw) * cos(pitch))
///   right   = normalize(cross(forward, world_up))
///   up      = normalize(cross(right, forward))
///
/// Pitch is clamped to [-89, 89] degrees so the basis never degenerates.
pub struct Camera {
    /// The position of the camera in world space.
    position: Vec3,
    /// A world space direction vector indicating which direction is considered
    /// straight up.
    world_up: Vec3,
    /// Heading in degrees around the world up axis. Zero looks down +X.
    yaw_deg: f32,
    /// Elevation in degrees. Positive looks upward.
    pitch_deg: f32,
    /// Derived facing direction, unit length.
    forward: Vec3,
    /// Derived right direction, unit length.
    right: Vec3,
    /// Derived up direction, unit length.
    up: Vec3,
    /// The vertical field of view in radians.
    fov_y: f32,
    /// The minimum camera view distance.
    z_near: f32,
    /// The maximum camera view distance.
    z_far: f32,
    /// The ratio of the viewport width to its height.
    aspect: f32,
}

impl Camera {
    /// Create a new camera at `position` facing along the direction described
    /// by `yaw_deg` and `pitch_deg`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        yaw_deg: f32,
        pitch_deg: f32,
        fov_y: f32,
        z_near: f32,
        z_far: f32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        assert!(fov_y > 0.0);
        assert!(z_near >= 0.0);
        assert!(z_far > z_near);

        let mut camera = Self {
            position,
            world_up: world_up.normalize(),
            yaw_deg,
            pitch_deg: pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: world_up,
            fov_y,
            z_near,
            z_far,
            aspect: if viewport_width > 0 && viewport_height > 0 {
                viewport_width as f32 / viewport_height as f32
            } else {
                0.0
            },
        };

        camera.update_basis();
        camera
    }

    /// Move the camera to a new world space position. The orientation is left
    /// unchanged.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Apply yaw and pitch deltas in degrees and rebuild the orientation
    /// basis. Pitch is clamped to `[-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG]`.
    pub fn rotate(&mut self, yaw_delta_deg: f32, pitch_delta_deg: f32) {
        self.yaw_deg += yaw_delta_deg;
        self.pitch_deg =
            (self.pitch_deg + pitch_delta_deg).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        self.update_basis();
    }

    /// Get the camera's view matrix, which transforms coordinates from world
    /// space to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// Get the camera's perspective projection matrix, which transforms
    /// coordinates from view space to clip space.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    /// Get the combined view projection matrix mapping world space to clip
    /// space.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Resize the camera's viewport.
    pub fn set_viewport_size(
        &mut self,
        new_width: u32,
        new_height: u32,
    ) -> Result<(), InvalidCameraSize> {
        if new_width > 0 && new_height > 0 {
            self.aspect = new_width as f32 / new_height as f32;
            Ok(())
        } else {
            Err(InvalidCameraSize(new_width, new_height))
        }
    }

    /// Get the position of the camera in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Get the camera's facing direction (unit length).
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Get the camera's right direction (unit length).
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Get the camera's up direction (unit length).
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Get the world up axis (not the camera's up axis).
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Get the camera heading in degrees.
    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    /// Get the camera elevation in degrees.
    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Rebuild the forward/right/up basis from yaw and pitch.
    fn update_basis(&mut self) {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();

        self.forward = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();

        self.right = Vec3::cross(self.forward, self.world_up).normalize();
        self.up = Vec3::cross(self.right, self.forward).normalize();
    }
}

#[derive(Debug, Error)]
#[error("camera viewport width and height must be larger than zero but width was {} and height was {}", .0, .1)]
pub struct InvalidCameraSize(pub u32, pub u32);

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn test_camera() -> Camera {
        Camera::new(
            Vec3::new(5.0, 2.0, -5.0),
            Vec3::new(0.0, 1.0, 0.0),
            135.0,
            0.0,
            f32::to_radians(45.0),
            0.1,
            100.0,
            800,
            600,
        )
    }

    #[test]
    fn initial_forward_matches_spherical_conversion() {
        let camera = test_camera();

        // yaw 135, pitch 0: forward = (cos 135, 0, sin 135).
        assert_relative_eq!(camera.forward().x, -0.70710678, epsilon = 1e-6);
        assert_relative_eq!(camera.forward().y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(camera.forward().z, 0.70710678, epsilon = 1e-6);
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut camera = test_camera();
        camera.rotate(30.0, 45.0);

        assert_relative_eq!(camera.forward().length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.right().length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.up().length(), 1.0, epsilon = 1e-6);

        assert_relative_eq!(camera.forward().dot(camera.right()), 0.0, epsilon = 1e-6);
        assert_relative_eq!(camera.forward().dot(camera.up()), 0.0, epsilon = 1e-6);
        assert_relative_eq!(camera.right().dot(camera.up()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn pitch_stays_clamped_under_cumulative_input() {
        let mut camera = test_camera();

        for _ in 0..1000 {
            camera.rotate(3.0, 17.0);
            assert!(camera.pitch_deg() <= PITCH_LIMIT_DEG);
        }
        assert_eq!(camera.pitch_deg(), PITCH_LIMIT_DEG);

        for _ in 0..1000 {
            camera.rotate(-3.0, -17.0);
            assert!(camera.pitch_deg() >= -PITCH_LIMIT_DEG);
        }
        assert_eq!(camera.pitch_deg(), -PITCH_LIMIT_DEG);
    }

    #[test]
    fn set_valid_viewport_size() {
        let mut camera = test_camera();

        assert!(camera.set_viewport_size(600, 300).is_ok());
        assert_relative_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn set_invalid_viewport_size() {
        let mut camera = test_camera();

        let err = camera.set_viewport_size(0, 100).unwrap_err();
        assert_eq!(0, err.0);
        assert_eq!(100, err.1);

        assert!(camera.set_viewport_size(600, 0).is_err());
        assert!(camera.set_viewport_size(0, 0).is_err());
    }
}
