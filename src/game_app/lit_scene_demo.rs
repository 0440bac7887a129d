use std::{rc::Rc, time::Duration};

use glam::{Quat, Vec2, Vec3};

use crate::{
    animation::{PingPong, SpinAngle},
    content::{self, obj_model},
    game_app::GameApp,
    gameplay::{CameraController, FlyCameraController},
    renderer::{
        lighting::{DirectionalLight, LightAttenuation, PointLight, SpotLight},
        materials::MaterialBuilder,
        meshes,
        scene::Scene,
        Renderer,
    },
};

// Indices of the animated models in `Scene::models`, fixed by the push order
// in `load_content`.
const SLIDING_TETRA: usize = 0;
const GROWING_TETRA: usize = 1;
const SPINNING_SPIRE: usize = 4;

/// A small demo scene with a few lit and shadowed objects, some of them
/// animated. The first spot light acts as a flashlight attached to the
/// camera.
pub struct LitSceneDemo {
    scene: Scene,
    camera_controller: FlyCameraController,
    /// Oscillates the sliding tetrahedron along the x axis.
    slide: PingPong,
    /// Grows and shrinks the second tetrahedron.
    grow: PingPong,
    /// Spins the growing tetrahedron and the spire model around the y axis.
    spin: SpinAngle,
}

/// Transform of the growing tetrahedron, which rotates around the y axis
/// while its x and y scale oscillate.
fn growing_tetra_transform(angle_deg: f32, size: f32) -> (Vec3, Quat, Vec3) {
    (
        Vec3::new(size, size, 1.0),
        Quat::from_rotation_y(angle_deg.to_radians()),
        Vec3::new(0.0, 4.0, -2.5),
    )
}

impl LitSceneDemo {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            camera_controller: FlyCameraController::new(5.0, 0.4),
            slide: PingPong::new(0.0, -3.0, 3.0, 0.01),
            grow: PingPong::new(0.4, 0.1, 0.8, 0.001),
            spin: SpinAngle::new(1.0),
        }
    }
}

impl Default for LitSceneDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl GameApp for LitSceneDemo {
    fn load_content(&mut self, renderer: &mut Renderer) -> anyhow::Result<()> {
        let brick = Rc::new(content::load_texture_file(
            renderer.device(),
            renderer.queue(),
            "textures/brick.png",
        )?);
        let stone = Rc::new(content::load_texture_file(
            renderer.device(),
            renderer.queue(),
            "textures/stone.png",
        )?);

        let shiny_brick = MaterialBuilder::new()
            .diffuse_map(brick)
            .specular_color(Vec3::ONE)
            .specular_power(32.0)
            .build(renderer.default_textures());
        let dull_stone = MaterialBuilder::new()
            .diffuse_map(stone)
            .specular_color(Vec3::splat(0.3))
            .specular_power(4.0)
            .build(renderer.default_textures());

        let (tetra_verts, tetra_indices) = meshes::tetrahedron();
        let tetra_mesh = Rc::new(renderer.create_mesh(&tetra_verts, &tetra_indices, &shiny_brick));

        let (floor_verts, floor_indices) = meshes::floor_plane(10.0, 10.0);
        let floor_mesh = Rc::new(renderer.create_mesh(&floor_verts, &floor_indices, &dull_stone));

        let cube_mesh = Rc::new(obj_model::load_obj_mesh(
            renderer.device(),
            renderer.queue(),
            renderer.bind_group_layouts(),
            renderer.default_textures(),
            "models/cube.obj",
        )?);
        let spire_mesh = Rc::new(obj_model::load_obj_mesh(
            renderer.device(),
            renderer.queue(),
            renderer.bind_group_layouts(),
            renderer.default_textures(),
            "models/spire.obj",
        )?);

        let (terrain_heights, terrain_columns) = content::load_heightmap_file("textures/height4.png")?;
        let (terrain_verts, terrain_indices) =
            meshes::heightmap_terrain(&terrain_heights, terrain_columns, 0.25, 0.5);
        let terrain_mesh =
            Rc::new(renderer.create_mesh(&terrain_verts, &terrain_indices, &shiny_brick));

        // Push order must match the animated model index constants.
        self.scene.models.push(renderer.create_model(
            tetra_mesh.clone(),
            Vec3::new(0.0, 0.0, -2.5),
            Quat::IDENTITY,
            Vec3::splat(0.4),
        ));
        self.scene.models.push(renderer.create_model(
            tetra_mesh,
            Vec3::new(0.0, 4.0, -2.5),
            Quat::IDENTITY,
            Vec3::new(0.4, 0.4, 1.0),
        ));
        self.scene.models.push(renderer.create_model(
            floor_mesh,
            Vec3::new(0.0, -2.0, 0.0),
            Quat::IDENTITY,
            Vec3::ONE,
        ));
        self.scene.models.push(renderer.create_model(
            cube_mesh,
            Vec3::new(-7.0, 0.0, 10.0),
            Quat::IDENTITY,
            Vec3::splat(0.4),
        ));
        self.scene.models.push(renderer.create_model(
            spire_mesh,
            Vec3::new(-8.0, 2.0, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.4),
        ));
        self.scene.models.push(renderer.create_model(
            terrain_mesh,
            Vec3::new(0.0, -2.0, 0.0),
            Quat::IDENTITY,
            Vec3::splat(4.0),
        ));

        self.scene.directional_light = Some(DirectionalLight {
            direction: Vec3::new(-10.0, -15.0, -10.0),
            color: Vec3::ONE,
            ambient: 0.2,
            diffuse: 0.3,
        });

        self.scene.add_point_light(PointLight {
            position: Vec3::new(1.0, 2.0, 0.0),
            color: Vec3::new(0.0, 0.0, 1.0),
            ambient: 0.0,
            diffuse: 0.4,
            attenuation: LightAttenuation {
                constant: 0.3,
                linear: 0.2,
                quadratic: 0.1,
            },
        })?;
        self.scene.add_point_light(PointLight {
            position: Vec3::new(-4.0, 3.0, 0.0),
            color: Vec3::new(0.0, 1.0, 0.0),
            ambient: 0.0,
            diffuse: 0.4,
            attenuation: LightAttenuation {
                constant: 0.3,
                linear: 0.1,
                quadratic: 0.1,
            },
        })?;

        // The first spot light is repositioned every frame to follow the
        // camera.
        self.scene.add_spot_light(SpotLight {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            color: Vec3::ONE,
            ambient: 0.0,
            diffuse: 2.0,
            attenuation: LightAttenuation {
                constant: 1.0,
                linear: 0.0,
                quadratic: 0.0,
            },
            cutoff_radians: f32::to_radians(20.0),
        })?;
        self.scene.add_spot_light(SpotLight {
            position: Vec3::new(0.0, -1.5, 0.0),
            direction: Vec3::new(-100.0, -1.0, 0.0),
            color: Vec3::ONE,
            ambient: 0.0,
            diffuse: 1.0,
            attenuation: LightAttenuation {
                constant: 1.0,
                linear: 0.0,
                quadratic: 0.0,
            },
            cutoff_radians: f32::to_radians(20.0),
        })?;

        Ok(())
    }

    fn update_sim(&mut self, _delta: Duration) {
        // Object animation is stepped once per frame.
        self.slide.advance();
        self.grow.advance();
        self.spin.advance();
    }

    fn prepare_render(&mut self, renderer: &mut Renderer, delta: Duration) {
        self.camera_controller
            .update_camera(&mut renderer.camera, delta);

        self.scene.models[SLIDING_TETRA].set_translation(Vec3::new(
            self.slide.value(),
            0.0,
            -2.5,
        ));

        let (scale, rotation, translation) =
            growing_tetra_transform(self.spin.degrees(), self.grow.value());
        self.scene.models[GROWING_TETRA].set_scale_rotation_translation(
            scale, rotation, translation,
        );

        let spire = &mut self.scene.models[SPINNING_SPIRE];
        spire.set_scale_rotation_translation(
            Vec3::splat(0.4),
            Quat::from_rotation_y(self.spin.degrees().to_radians()),
            spire.translation(),
        );

        // Keep the flashlight on the camera, slightly below eye level.
        if let Some(flashlight) = self.scene.spot_lights_mut().first_mut() {
            flashlight.position = renderer.camera.position() - Vec3::new(0.0, 0.3, 0.0);
            flashlight.direction = renderer.camera.forward();
        }
    }

    fn input(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.camera_controller.process_input(event)
    }

    fn mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.camera_controller
            .process_mouse_motion(Vec2::new(delta_x as f32, delta_y as f32));
    }

    fn render_scene(&self) -> &Scene {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn growing_tetra_rotates_and_scales_at_the_same_time() {
        let (scale, rotation, translation) = growing_tetra_transform(90.0, 0.6);

        assert_eq!(scale, Vec3::new(0.6, 0.6, 1.0));
        assert_eq!(translation, Vec3::new(0.0, 4.0, -2.5));

        // The rotation must turn the model around the y axis by the spin
        // angle, not stay at identity while only the scale animates.
        let (axis, angle) = rotation.to_axis_angle();
        assert_relative_eq!(axis.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(angle, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
    }
}
