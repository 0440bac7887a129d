pub mod lit_scene_demo;

use std::time::Duration;

use tracing::{debug, error, warn};

use crate::renderer::{scene::Scene, Renderer};

/// Dispatches events coming from the underlying platform to the game for
/// execution.
pub struct GameAppHost<'a> {
    renderer: Renderer<'a>,
    game: Box<dyn GameApp>,
    mouse_captured: bool,
}

impl<'a> GameAppHost<'a> {
    pub fn new(renderer: Renderer<'a>, game: Box<dyn GameApp>) -> Self {
        Self {
            renderer,
            game,
            mouse_captured: false,
        }
    }

    pub fn load_content(&mut self) -> anyhow::Result<()> {
        self.game.load_content(&mut self.renderer)
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn input(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.game.input(event)
    }

    pub fn update_sim(&mut self, delta: Duration) {
        self.game.update_sim(delta)
    }

    pub fn render(&mut self, delta: Duration) {
        self.game.prepare_render(&mut self.renderer, delta);

        match self.renderer.render(self.game.render_scene()) {
            Ok(_) => {}
            // A lost or outdated surface must be reconfigured before it can
            // be drawn to again.
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated, reconfiguring at the current window size");
                let window_size = self.renderer.window_size();
                self.renderer.resize(window_size);
            }
            // No sensible way to keep rendering without GPU memory.
            Err(wgpu::SurfaceError::OutOfMemory) => {
                panic!("GPU reported out of memory while rendering")
            }
            // Remaining errors (eg timeouts) are transient, drop the frame.
            Err(e) => {
                error!("skipping frame after surface error: {e:?}");
            }
        }
    }

    /// Resizes the renderer surfaces to match the new window size.
    pub fn window_resized(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size)
    }

    /// Re-applies the window size after an OS DPI scaling change.
    pub fn scale_factor_changed(&mut self) {
        let new_size = self.renderer.window().inner_size();
        self.renderer.resize(new_size)
    }

    /// Forwards relative mouse movement to the game.
    pub fn mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.game.mouse_motion(delta_x, delta_y)
    }

    pub fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    pub fn set_mouse_captured(&mut self, is_captured: bool) {
        let window = self.renderer.window();

        // Pin the cursor to the window while captured, and hide it so mouse
        // motion only steers the camera.
        if let Err(_e) = window.set_cursor_grab(if is_captured {
            winit::window::CursorGrabMode::Locked
        } else {
            winit::window::CursorGrabMode::None
        }) {
            warn!("failed to change cursor grab mode")
        };

        window.set_cursor_visible(!is_captured);

        debug!("mouse_captured = {is_captured}");
        self.mouse_captured = is_captured;
    }
}

/// A specific game or demo scene implementation.
pub trait GameApp {
    /// Loads the meshes, textures and lights the game needs before the first
    /// frame is drawn.
    fn load_content(&mut self, renderer: &mut Renderer) -> anyhow::Result<()>;

    /// Advances the game's simulation state by the given `delta`.
    fn update_sim(&mut self, delta: Duration);

    /// Prepares GPU resources for rendering in the upcoming frame.
    fn prepare_render(&mut self, renderer: &mut Renderer, delta: Duration);

    /// Called anytime there is a new input event from the host.
    fn input(&mut self, event: &winit::event::WindowEvent) -> bool;

    /// Called by the host when the user's mouse moves.
    fn mouse_motion(&mut self, _delta_x: f64, _delta_y: f64) {}

    /// Returns the scene that should be drawn this frame.
    fn render_scene(&self) -> &Scene;
}
