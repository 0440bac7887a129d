//! Rust structs with memory layouts that match their same named counterparts
//! in shader code.
//!
//! Gaps forced by WebGPU's 16 byte alignment rules are exploited to carry
//! extra scalars. The packed lighting structs encode intensities into the
//! unused `w` lanes:
//!
//!   light.direction.w = ambient modifier
//!   light.color.w     = diffuse modifier
//!
//! These structs must exactly match the layout of the uniform structs in
//! `forward.wgsl` whenever either side changes.
use glam::{Vec3, Vec4};

use crate::renderer::lighting::{DirectionalLight, PointLight, SpotLight};
use crate::renderer::materials::Material;

/// Rust struct with the same memory layout as the `MaterialConstants`
/// uniform used by the forward shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedMaterialConstants {
    pub ambient_color: Vec4,  // .w is unused.
    pub diffuse_color: Vec4,  // .w is unused.
    pub specular_color: Vec4, // .w is specular power.
}

impl From<&Material> for PackedMaterialConstants {
    fn from(val: &Material) -> Self {
        Self {
            ambient_color: vec3_w(val.ambient_color, 0.0),
            diffuse_color: vec3_w(val.diffuse_color, 0.0),
            specular_color: vec3_w(val.specular_color, val.specular_power),
        }
    }
}

/// Rust struct with the same memory layout as the `DirectionalLight` uniform
/// used by the forward shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedDirectionalLight {
    pub direction: Vec4, // .xyz is normalized, .w is ambient amount.
    pub color: Vec4,     // .w is diffuse amount.
}

impl From<&DirectionalLight> for PackedDirectionalLight {
    fn from(val: &DirectionalLight) -> Self {
        Self {
            direction: vec3_w(val.direction.normalize(), val.ambient),
            color: vec3_w(val.color, val.diffuse),
        }
    }
}

/// Rust struct with the same memory layout as the `PointLight` uniform used
/// by the forward shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedPointLight {
    pub position: Vec4,    // .w is ambient amount.
    pub color: Vec4,       // .w is diffuse amount.
    pub attenuation: Vec4, // xyzw: (constant, linear, quadratic, unused).
}

impl From<&PointLight> for PackedPointLight {
    fn from(val: &PointLight) -> Self {
        Self {
            position: vec3_w(val.position, val.ambient),
            color: vec3_w(val.color, val.diffuse),
            attenuation: Vec4::new(
                val.attenuation.constant,
                val.attenuation.linear,
                val.attenuation.quadratic,
                0.0,
            ),
        }
    }
}

/// Rust struct with the same memory layout as the `SpotLight` uniform used
/// by the forward shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedSpotLight {
    pub position: Vec4,    // .w is the precomputed cos of the cutoff angle.
    pub direction: Vec4,   // .w is ambient amount.
    pub color: Vec4,       // .w is diffuse amount.
    pub attenuation: Vec4, // xyzw: (constant, linear, quadratic, unused).
}

impl From<&SpotLight> for PackedSpotLight {
    fn from(val: &SpotLight) -> Self {
        Self {
            position: vec3_w(val.position, f32::cos(val.cutoff_radians)),
            direction: vec3_w(val.direction.normalize(), val.ambient),
            color: vec3_w(val.color, val.diffuse),
            attenuation: Vec4::new(
                val.attenuation.constant,
                val.attenuation.linear,
                val.attenuation.quadratic,
                0.0,
            ),
        }
    }
}

/// Returns a new `Vec4` combining a `Vec3` x, y and z with an additional `w`
/// value.
pub fn vec3_w(xyz: Vec3, w: f32) -> Vec4 {
    Vec4::new(xyz.x, xyz.y, xyz.z, w)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::renderer::lighting::LightAttenuation;

    use super::*;

    #[test]
    fn packed_directional_light_normalizes_direction() {
        let packed = PackedDirectionalLight::from(&DirectionalLight {
            direction: Vec3::new(0.0, -10.0, 0.0),
            color: Vec3::new(1.0, 0.5, 0.25),
            ambient: 0.2,
            diffuse: 0.3,
        });

        assert_relative_eq!(packed.direction.y, -1.0);
        assert_relative_eq!(packed.direction.w, 0.2);
        assert_relative_eq!(packed.color.w, 0.3);
    }

    #[test]
    fn packed_spot_light_stores_cos_cutoff() {
        let packed = PackedSpotLight::from(&SpotLight {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            ambient: 0.0,
            diffuse: 5.0,
            attenuation: LightAttenuation {
                constant: 0.5,
                linear: 0.0,
                quadratic: 0.0,
            },
            cutoff_radians: f32::to_radians(45.0),
        });

        assert_relative_eq!(packed.position.w, f32::to_radians(45.0).cos());
        assert_relative_eq!(packed.attenuation.x, 0.5);
    }

    #[test]
    fn packed_struct_sizes_match_wgsl_layout() {
        // The WGSL uniform structs are built from vec4 lanes only, so the
        // packed sizes must be exact multiples of 16 bytes.
        assert_eq!(std::mem::size_of::<PackedMaterialConstants>(), 48);
        assert_eq!(std::mem::size_of::<PackedDirectionalLight>(), 32);
        assert_eq!(std::mem::size_of::<PackedPointLight>(), 48);
        assert_eq!(std::mem::size_of::<PackedSpotLight>(), 64);
    }
}
