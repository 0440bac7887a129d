pub mod animation;
pub mod camera;
pub mod content;
pub mod game_app;
pub mod gameplay;
pub mod platform;
pub mod renderer;

use std::time::Instant;

use tracing::info;
use winit::{
    event::{DeviceEvent, ElementState, Event, MouseButton, WindowEvent},
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use game_app::{lit_scene_demo::LitSceneDemo, GameAppHost};
use renderer::Renderer;

/// Creates the main window and runs the demo until it is closed.
pub fn run() -> anyhow::Result<()> {
    // Create main window for rendering.
    info!("creating main window for rendering");

    let event_loop = EventLoop::new()?;
    let main_window = WindowBuilder::new()
        .with_title("Lantern Render Window")
        .build(&event_loop)?;

    let renderer = pollster::block_on(Renderer::new(&main_window))?;
    let mut host = GameAppHost::new(renderer, Box::new(LitSceneDemo::new()));

    host.load_content()?;

    // Main window event loop.
    info!("starting main window event loop");

    let mut last_frame_time = Instant::now();
    let main_window_id = main_window.id();

    event_loop.run(move |event, control_flow| match event {
        Event::WindowEvent { event, window_id } if window_id == main_window_id => {
            if host.input(&event) {
                return;
            }

            match event {
                WindowEvent::CloseRequested => control_flow.exit(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed {
                        if let Key::Named(NamedKey::Escape) = event.logical_key {
                            if host.is_mouse_captured() {
                                // First escape releases the mouse, second
                                // closes the window.
                                host.set_mouse_captured(false);
                            } else {
                                control_flow.exit()
                            }
                        }
                    }
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if !host.is_mouse_captured() {
                        host.set_mouse_captured(true);
                    }
                }
                WindowEvent::Resized(new_size) => {
                    host.window_resized(new_size);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    host.scale_factor_changed();
                }
                WindowEvent::RedrawRequested => {
                    let delta = last_frame_time.elapsed();
                    last_frame_time = Instant::now();

                    host.update_sim(delta);
                    host.render(delta);

                    // Continuously animate by requesting another frame as
                    // soon as this one finishes.
                    host.renderer().window().request_redraw();
                }
                _ => {}
            }
        }
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => {
            // Camera look only responds while the mouse is captured.
            if host.is_mouse_captured() {
                host.mouse_motion(delta.0, delta.1);
            }
        }
        _ => {}
    })?;

    Ok(())
}
