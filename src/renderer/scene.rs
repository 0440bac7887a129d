use thiserror::Error;

use super::{
    lighting::{DirectionalLight, PointLight, SpotLight, MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS},
    models::Model,
};

#[derive(Debug, Error)]
pub enum LightCapacityError {
    #[error("scene already holds the maximum of {0} point lights")]
    TooManyPointLights(usize),
    #[error("scene already holds the maximum of {0} spot lights")]
    TooManySpotLights(usize),
}

/// A scene is a collection of models and lights that should be drawn each
/// frame. Light lists are bounded so the whole set fits into a single per
/// frame uniform buffer.
#[derive(Default)]
pub struct Scene {
    /// The sun light for the scene, which also casts the shadow map.
    pub directional_light: Option<DirectionalLight>,
    /// Point lights in the scene, at most `MAX_POINT_LIGHTS`.
    point_lights: Vec<PointLight>,
    /// Spot lights in the scene, at most `MAX_SPOT_LIGHTS`.
    spot_lights: Vec<SpotLight>,
    /// Models that should be drawn.
    pub models: Vec<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a point light, failing if the scene is already at capacity.
    pub fn add_point_light(&mut self, light: PointLight) -> Result<(), LightCapacityError> {
        if self.point_lights.len() >= MAX_POINT_LIGHTS {
            return Err(LightCapacityError::TooManyPointLights(MAX_POINT_LIGHTS));
        }

        self.point_lights.push(light);
        Ok(())
    }

    /// Add a spot light, failing if the scene is already at capacity.
    pub fn add_spot_light(&mut self, light: SpotLight) -> Result<(), LightCapacityError> {
        if self.spot_lights.len() >= MAX_SPOT_LIGHTS {
            return Err(LightCapacityError::TooManySpotLights(MAX_SPOT_LIGHTS));
        }

        self.spot_lights.push(light);
        Ok(())
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn spot_lights(&self) -> &[SpotLight] {
        &self.spot_lights
    }

    /// Mutable access to lights already in the scene, for effects like a
    /// flashlight that tracks the camera.
    pub fn spot_lights_mut(&mut self) -> &mut [SpotLight] {
        &mut self.spot_lights
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::renderer::lighting::LightAttenuation;

    use super::*;

    fn test_point_light() -> PointLight {
        PointLight {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            ambient: 0.1,
            diffuse: 0.5,
            attenuation: LightAttenuation::default(),
        }
    }

    fn test_spot_light() -> SpotLight {
        SpotLight {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            ambient: 0.0,
            diffuse: 1.0,
            attenuation: LightAttenuation::default(),
            cutoff_radians: 20.0_f32.to_radians(),
        }
    }

    #[test]
    fn point_lights_rejected_once_full() {
        let mut scene = Scene::new();

        for _ in 0..MAX_POINT_LIGHTS {
            scene.add_point_light(test_point_light()).unwrap();
        }

        assert!(matches!(
            scene.add_point_light(test_point_light()),
            Err(LightCapacityError::TooManyPointLights(MAX_POINT_LIGHTS))
        ));
        assert_eq!(scene.point_lights().len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn spot_lights_rejected_once_full() {
        let mut scene = Scene::new();

        for _ in 0..MAX_SPOT_LIGHTS {
            scene.add_spot_light(test_spot_light()).unwrap();
        }

        assert!(matches!(
            scene.add_spot_light(test_spot_light()),
            Err(LightCapacityError::TooManySpotLights(MAX_SPOT_LIGHTS))
        ));
        assert_eq!(scene.spot_lights().len(), MAX_SPOT_LIGHTS);
    }

    #[test]
    fn rejected_lights_are_not_stored() {
        let mut scene = Scene::new();

        for _ in 0..MAX_POINT_LIGHTS + 5 {
            let _ = scene.add_point_light(test_point_light());
        }

        assert_eq!(scene.point_lights().len(), MAX_POINT_LIGHTS);
    }
}
