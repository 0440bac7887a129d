use glam::{Mat4, Vec3};

/// The most point lights a scene may contain. Must match the fixed array
/// length in the forward shader's per-frame uniform block.
pub const MAX_POINT_LIGHTS: usize = 3;

/// The most spot lights a scene may contain. Must match the fixed array
/// length in the forward shader's per-frame uniform block.
pub const MAX_SPOT_LIGHTS: usize = 3;

/// Distance falloff terms for point and spot lights evaluated as
/// `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Clone, Copy, Debug)]
pub struct LightAttenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for LightAttenuation {
    /// No falloff with distance.
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// A light infinitely far away that shines uniformly in one direction, like
/// the sun. The directional light is the one light in the scene that casts a
/// shadow map.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    /// The direction the light shines in. Does not need to be normalized.
    pub direction: Vec3,
    /// The color of the light.
    pub color: Vec3,
    /// Modifies the amount of color that is applied to the ambient term when
    /// shading.
    pub ambient: f32,
    /// Modifies the amount of color that is applied to the diffuse and
    /// specular terms when shading.
    pub diffuse: f32,
}

impl DirectionalLight {
    /// Half the width and height of the orthographic shadow volume in world
    /// units.
    const SHADOW_EXTENT: f32 = 20.0;
    /// Distance from the scene origin to the virtual light position used to
    /// build the shadow view matrix.
    const SHADOW_DISTANCE: f32 = 25.0;

    /// The transform from world space into the light's clip space. Used by
    /// the shadow pass to write depth from the light's point of view, and by
    /// the color pass to sample that depth back.
    pub fn light_space_matrix(&self) -> Mat4 {
        let direction = self.direction.normalize();

        // Pick an up axis that is not parallel with the light direction.
        let up = if direction.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        let projection = Mat4::orthographic_rh(
            -Self::SHADOW_EXTENT,
            Self::SHADOW_EXTENT,
            -Self::SHADOW_EXTENT,
            Self::SHADOW_EXTENT,
            0.1,
            Self::SHADOW_DISTANCE * 2.0,
        );
        let view = Mat4::look_at_rh(-direction * Self::SHADOW_DISTANCE, Vec3::ZERO, up);

        projection * view
    }
}

/// A light at a world position that shines in every direction and fades with
/// distance.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    /// The world position of the light.
    pub position: Vec3,
    /// The color of the light.
    pub color: Vec3,
    /// Ambient contribution modifier.
    pub ambient: f32,
    /// Diffuse/specular contribution modifier.
    pub diffuse: f32,
    /// Distance falloff.
    pub attenuation: LightAttenuation,
}

/// A point light restricted to a cone around `direction`. Fragments outside
/// the cone (cos of angle to the light axis below `cos(cutoff)`) receive no
/// contribution.
#[derive(Clone, Copy, Debug)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
    pub attenuation: LightAttenuation,
    /// Half angle of the cone in radians. The shader compares against the
    /// cosine of this value.
    pub cutoff_radians: f32,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec4;

    use super::*;

    fn test_light(direction: Vec3) -> DirectionalLight {
        DirectionalLight {
            direction,
            color: Vec3::ONE,
            ambient: 0.2,
            diffuse: 0.3,
        }
    }

    #[test]
    fn light_space_matrix_maps_origin_into_clip_volume() {
        let light = test_light(Vec3::new(-10.0, -15.0, -10.0));
        let clip = light.light_space_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        // Orthographic projection, so w stays 1 and the origin lands in the
        // center of the XY clip plane at mid depth.
        assert_relative_eq!(clip.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn light_space_matrix_depth_orders_along_light_direction() {
        let light = test_light(Vec3::new(0.0, -1.0, -1.0));
        let direction = light.direction.normalize();
        let matrix = light.light_space_matrix();

        // A point closer to the light must get a smaller depth value.
        let near = matrix * (-direction * 5.0).extend(1.0);
        let far = matrix * (direction * 5.0).extend(1.0);
        assert!(near.z < far.z);
    }

    #[test]
    fn light_space_matrix_handles_straight_down_light() {
        // Direction parallel to the world up axis must not produce NaNs from
        // a degenerate look-at basis.
        let light = test_light(Vec3::new(0.0, -1.0, 0.0));
        let clip = light.light_space_matrix() * Vec4::new(1.0, 0.0, 1.0, 1.0);

        assert!(clip.is_finite());
    }
}
