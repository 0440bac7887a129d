use std::time::Duration;

use glam::Vec2;
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::camera::Camera;

pub trait CameraController {
    /// Updates the camera controller state with the given input event. This
    /// method returns `true` if `event` was used by this update method,
    /// otherwise false is returned.
    fn process_input(&mut self, event: &WindowEvent) -> bool;

    /// Accumulates mouse motion deltas until camera updates are applied in
    /// `update_camera`.
    fn process_mouse_motion(&mut self, delta: Vec2);

    /// Applies updates to the camera that reflect the current state of this
    /// controller.
    fn update_camera(&mut self, camera: &mut Camera, delta: Duration);
}

/// A first person fly camera. WASD moves along the camera's forward and right
/// axes, Q/E moves straight down/up along the world up axis, and mouse motion
/// turns the camera. There is no smoothing or damping.
pub struct FlyCameraController {
    /// World units moved per second while a movement key is held.
    move_speed: f32,
    /// Degrees turned per unit of mouse movement.
    turn_speed: f32,
    move_forward: bool,
    move_backward: bool,
    move_left: bool,
    move_right: bool,
    move_down: bool,
    move_up: bool,
    mouse_delta: Option<Vec2>,
}

impl FlyCameraController {
    pub fn new(move_speed: f32, turn_speed: f32) -> Self {
        Self {
            move_speed,
            turn_speed,
            move_forward: false,
            move_backward: false,
            move_left: false,
            move_right: false,
            move_down: false,
            move_up: false,
            mouse_delta: None,
        }
    }
}

impl CameraController for FlyCameraController {
    fn process_input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event: keyboard_input_event,
                ..
            } => {
                // Is the button pushed down or no longer down?
                let is_pressed = keyboard_input_event.state == ElementState::Pressed;

                match keyboard_input_event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyW) => {
                        self.move_forward = is_pressed;
                        true
                    }
                    PhysicalKey::Code(KeyCode::KeyS) => {
                        self.move_backward = is_pressed;
                        true
                    }
                    PhysicalKey::Code(KeyCode::KeyA) => {
                        self.move_left = is_pressed;
                        true
                    }
                    PhysicalKey::Code(KeyCode::KeyD) => {
                        self.move_right = is_pressed;
                        true
                    }
                    PhysicalKey::Code(KeyCode::KeyQ) => {
                        self.move_down = is_pressed;
                        true
                    }
                    PhysicalKey::Code(KeyCode::KeyE) => {
                        self.move_up = is_pressed;
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn process_mouse_motion(&mut self, delta: Vec2) {
        self.mouse_delta = Some(self.mouse_delta.unwrap_or_default() + delta);
    }

    fn update_camera(&mut self, camera: &mut Camera, delta: Duration) {
        let mut position = camera.position();
        let move_amount = self.move_speed * delta.as_secs_f32();

        // Respond to keyboard movement scaled by elapsed time.
        if self.move_forward {
            position += move_amount * camera.forward();
        }

        if self.move_backward {
            position -= move_amount * camera.forward();
        }

        if self.move_left {
            position -= move_amount * camera.right();
        }

        if self.move_right {
            position += move_amount * camera.right();
        }

        if self.move_down {
            position -= move_amount * camera.world_up();
        }

        if self.move_up {
            position += move_amount * camera.world_up();
        }

        camera.set_position(position);

        // Turn the camera by the accumulated mouse motion. The camera clamps
        // pitch so the view never flips over.
        let mouse_delta = self.mouse_delta.take().unwrap_or_default();
        camera.rotate(
            mouse_delta.x * self.turn_speed,
            -mouse_delta.y * self.turn_speed,
        );
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    fn test_camera() -> Camera {
        Camera::new(
            Vec3::ZERO,
            Vec3::Y,
            -90.0,
            0.0,
            f32::to_radians(45.0),
            0.1,
            100.0,
            800,
            600,
        )
    }

    #[test]
    fn movement_is_scaled_by_speed_and_elapsed_time() {
        let mut camera = test_camera();
        let mut controller = FlyCameraController::new(5.0, 0.4);

        controller.move_forward = true;
        controller.update_camera(&mut camera, Duration::from_millis(500));

        // yaw -90 faces -Z, so half a second at 5 units/sec moves -2.5 on Z.
        assert_relative_eq!(camera.position().z, -2.5, epsilon = 1e-5);
        assert_relative_eq!(camera.position().x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn vertical_movement_follows_world_up_not_camera_up() {
        let mut camera = test_camera();
        camera.rotate(0.0, 45.0);

        let mut controller = FlyCameraController::new(1.0, 0.4);
        controller.move_up = true;
        controller.update_camera(&mut camera, Duration::from_secs(1));

        assert_relative_eq!(camera.position().x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position().y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position().z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn mouse_motion_accumulates_and_is_consumed_on_update() {
        let mut camera = test_camera();
        let mut controller = FlyCameraController::new(5.0, 0.5);

        controller.process_mouse_motion(Vec2::new(10.0, 0.0));
        controller.process_mouse_motion(Vec2::new(10.0, 0.0));
        controller.update_camera(&mut camera, Duration::from_millis(16));

        assert_relative_eq!(camera.yaw_deg(), -80.0, epsilon = 1e-5);

        // The accumulated delta was consumed, a second update has no effect.
        controller.update_camera(&mut camera, Duration::from_millis(16));
        assert_relative_eq!(camera.yaw_deg(), -80.0, epsilon = 1e-5);
    }
}
