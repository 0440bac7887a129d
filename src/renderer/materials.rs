use std::rc::Rc;

use glam::Vec3;

use super::textures::Texture;

/// A render material compatible with the forward lighting shader's phong
/// shading model.
///
/// A material combines constant ambient/diffuse/specular colors with a
/// diffuse texture map; the shader multiplies the sampled texel with the
/// constant diffuse color.
#[derive(Clone, Debug)]
pub struct Material {
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub specular_power: f32,
    pub diffuse_map: Rc<Texture>,
}

/// The single-colored fallback textures used by materials that do not provide
/// their own texture maps.
#[derive(Debug)]
pub struct DefaultTextures {
    pub diffuse_map: Rc<Texture>,
}

impl DefaultTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            diffuse_map: Rc::new(super::textures::new_1x1(
                device,
                queue,
                [255, 255, 255],
                Some("default diffuse texture"),
            )),
        }
    }
}

/// A fluent builder for creating materials without having to specify every
/// optional property.
#[derive(Debug)]
pub struct MaterialBuilder {
    ambient_color: Option<Vec3>,
    diffuse_color: Option<Vec3>,
    specular_color: Option<Vec3>,
    specular_power: Option<f32>,
    diffuse_map: Option<Rc<Texture>>,
}

impl MaterialBuilder {
    pub const DEFAULT_AMBIENT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const DEFAULT_DIFFUSE_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const DEFAULT_SPECULAR_COLOR: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const DEFAULT_SPECULAR_POWER: f32 = 0.0;

    /// Create a new material builder.
    pub fn new() -> Self {
        Self {
            ambient_color: None,
            diffuse_color: None,
            specular_color: None,
            specular_power: None,
            diffuse_map: None,
        }
    }

    /// Set the material's ambient color to a constant value.
    #[allow(dead_code)]
    pub fn ambient_color(mut self, color: Vec3) -> Self {
        self.ambient_color = Some(color);
        self
    }

    /// Set the material's diffuse color to a constant value.
    #[allow(dead_code)]
    pub fn diffuse_color(mut self, color: Vec3) -> Self {
        self.diffuse_color = Some(color);
        self
    }

    /// Set the material's specular color to a constant value.
    pub fn specular_color(mut self, color: Vec3) -> Self {
        self.specular_color = Some(color);
        self
    }

    /// Set the material's specular power (shininess).
    pub fn specular_power(mut self, power: f32) -> Self {
        self.specular_power = Some(power);
        self
    }

    /// Set the material's diffuse texture map.
    pub fn diffuse_map(mut self, texture: Rc<Texture>) -> Self {
        self.diffuse_map = Some(texture);
        self
    }

    /// Use the properties of this material builder to construct a new
    /// material. The default diffuse texture is used when no texture map was
    /// specified.
    pub fn build(self, default_textures: &DefaultTextures) -> Material {
        Material {
            ambient_color: self.ambient_color.unwrap_or(Self::DEFAULT_AMBIENT_COLOR),
            diffuse_color: self.diffuse_color.unwrap_or(Self::DEFAULT_DIFFUSE_COLOR),
            specular_color: self.specular_color.unwrap_or(Self::DEFAULT_SPECULAR_COLOR),
            specular_power: self.specular_power.unwrap_or(Self::DEFAULT_SPECULAR_POWER),
            diffuse_map: self
                .diffuse_map
                .unwrap_or_else(|| default_textures.diffuse_map.clone()),
        }
    }
}

impl Default for MaterialBuilder {
    fn default() -> Self {
        Self::new()
    }
}
