pub mod packed_structs;

use glam::Vec4;

use super::{
    lighting::{DirectionalLight, PointLight, SpotLight, MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS},
    materials::Material,
    uniforms::{GenericUniformBuffer, UniformBuffer},
};

use packed_structs::{
    vec3_w, PackedDirectionalLight, PackedMaterialConstants, PackedPointLight, PackedSpotLight,
};

/// Per-frame uniform values used by both render passes.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerFrameBufferData {
    pub view_projection: glam::Mat4,
    /// World to light clip space, shared by the shadow pass (as its camera)
    /// and the color pass (for shadow sampling).
    pub light_space: glam::Mat4,
    pub view_pos: Vec4,
    pub directional_light: PackedDirectionalLight,
    pub point_lights: [PackedPointLight; MAX_POINT_LIGHTS],
    pub spot_lights: [PackedSpotLight; MAX_SPOT_LIGHTS],
    /// x = active point lights, y = active spot lights, zw unused.
    pub light_counts: [u32; 4],
}

/// Responsible for storing per-frame shader uniform values and copying them
/// to a GPU backed buffer accessible to shaders.
pub struct PerFrameUniforms {
    buffer: GenericUniformBuffer<PerFrameBufferData>,
}

impl PerFrameUniforms {
    /// Create a new per frame uniform buffer. Only one instance is needed per
    /// renderer.
    pub fn new(device: &wgpu::Device, layouts: &BindGroupLayouts) -> Self {
        Self {
            buffer: GenericUniformBuffer::<PerFrameBufferData>::new(
                device,
                Some("per-frame uniforms"),
                Default::default(),
                &layouts.per_frame_layout,
            ),
        }
    }

    /// Set the camera view projection matrix.
    pub fn set_view_projection(&mut self, view_projection: glam::Mat4) {
        self.buffer.values_mut().view_projection = view_projection;
    }

    /// Set the world to light clip space matrix.
    pub fn set_light_space(&mut self, light_space: glam::Mat4) {
        self.buffer.values_mut().light_space = light_space;
    }

    /// Set the world space position of the camera.
    pub fn set_view_pos(&mut self, view_pos: glam::Vec3) {
        self.buffer.values_mut().view_pos = vec3_w(view_pos, 1.0);
    }

    /// Set the scene's directional light.
    pub fn set_directional_light(&mut self, light: &DirectionalLight) {
        self.buffer.values_mut().directional_light = light.into();
    }

    /// Set the scene's active point lights. `lights` must not exceed
    /// `MAX_POINT_LIGHTS`, which the scene enforces on insertion.
    pub fn set_point_lights(&mut self, lights: &[PointLight]) {
        debug_assert!(lights.len() <= MAX_POINT_LIGHTS);

        let values = self.buffer.values_mut();
        for (slot, light) in values.point_lights.iter_mut().zip(lights.iter()) {
            *slot = light.into();
        }
        values.light_counts[0] = lights.len() as u32;
    }

    /// Set the scene's active spot lights. `lights` must not exceed
    /// `MAX_SPOT_LIGHTS`, which the scene enforces on insertion.
    pub fn set_spot_lights(&mut self, lights: &[SpotLight]) {
        debug_assert!(lights.len() <= MAX_SPOT_LIGHTS);

        let values = self.buffer.values_mut();
        for (slot, light) in values.spot_lights.iter_mut().zip(lights.iter()) {
            *slot = light.into();
        }
        values.light_counts[1] = lights.len() as u32;
    }
}

impl UniformBuffer for PerFrameUniforms {
    fn update_gpu(&self, queue: &wgpu::Queue) {
        self.buffer.update_gpu(queue)
    }

    fn bind_group(&self) -> &wgpu::BindGroup {
        self.buffer.bind_group()
    }

    fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }
}

/// Per-model uniform values used by both render passes.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerModelBufferData {
    pub local_to_world: glam::Mat4,
}

/// Responsible for storing per-model shader uniform values and copying them
/// to a GPU backed buffer accessible to shaders. One instance per model.
#[derive(Debug)]
pub struct PerModelUniforms {
    buffer: GenericUniformBuffer<PerModelBufferData>,
}

impl PerModelUniforms {
    pub fn new(device: &wgpu::Device, layouts: &BindGroupLayouts) -> Self {
        Self {
            buffer: GenericUniformBuffer::<PerModelBufferData>::new(
                device,
                Some("per-model uniforms"),
                Default::default(),
                &layouts.per_model_layout,
            ),
        }
    }

    /// Set local to world transform matrix.
    pub fn set_local_to_world(&mut self, local_to_world: glam::Mat4) {
        self.buffer.values_mut().local_to_world = local_to_world;
    }
}

impl UniformBuffer for PerModelUniforms {
    fn update_gpu(&self, queue: &wgpu::Queue) {
        self.buffer.update_gpu(queue)
    }

    fn bind_group(&self) -> &wgpu::BindGroup {
        self.buffer.bind_group()
    }

    fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }
}

/// Shader values bound once per submesh: the phong material constants plus
/// the diffuse texture map. Material values never change after creation so
/// the backing buffer is written once.
pub struct PerSubmeshUniforms {
    bind_group: wgpu::BindGroup,
}

impl PerSubmeshUniforms {
    pub fn new(device: &wgpu::Device, layouts: &BindGroupLayouts, material: &Material) -> Self {
        let constants = PackedMaterialConstants::from(material);
        let constants_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("material constants"),
                contents: bytemuck::bytes_of(&constants),
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("per-submesh bind group"),
            layout: &layouts.per_submesh_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    // 0: Material constants.
                    binding: 0,
                    resource: constants_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    // 1: Diffuse texture 2d.
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&material.diffuse_map.view),
                },
                wgpu::BindGroupEntry {
                    // 2: Diffuse texture sampler.
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&material.diffuse_map.sampler),
                },
            ],
        });

        Self { bind_group }
    }

    /// Get this object's WGPU bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// A registry of bind group layouts used by this renderer.
pub struct BindGroupLayouts {
    pub per_frame_layout: wgpu::BindGroupLayout,
    pub per_model_layout: wgpu::BindGroupLayout,
    pub per_submesh_layout: wgpu::BindGroupLayout,
    pub shadow_map_layout: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    /// Create a new bind group layout registry.
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            per_frame_layout: device.create_bind_group_layout(&Self::per_frame_desc()),
            per_model_layout: device.create_bind_group_layout(&Self::per_model_desc()),
            per_submesh_layout: device.create_bind_group_layout(&Self::per_submesh_desc()),
            shadow_map_layout: device.create_bind_group_layout(&Self::shadow_map_desc()),
        }
    }

    /// Gets the bind group layout describing any instance of `PerFrameUniforms`.
    pub fn per_frame_desc() -> wgpu::BindGroupLayoutDescriptor<'static> {
        wgpu::BindGroupLayoutDescriptor {
            label: Some("per-frame bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        }
    }

    /// Gets the bind group layout describing any instance of `PerModelUniforms`.
    pub fn per_model_desc() -> wgpu::BindGroupLayoutDescriptor<'static> {
        wgpu::BindGroupLayoutDescriptor {
            label: Some("per-model bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        }
    }

    /// Gets the bind group layout describing any instance of
    /// `PerSubmeshUniforms`.
    ///
    /// Expected bind group inputs:
    ///  0 - material constants
    ///  1 - diffuse texture
    ///  2 - diffuse sampler
    pub fn per_submesh_desc() -> wgpu::BindGroupLayoutDescriptor<'static> {
        wgpu::BindGroupLayoutDescriptor {
            label: Some("per-submesh bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    // 0: Material constants.
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    // 1: Diffuse texture 2d.
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    // 2: Diffuse texture sampler.
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    // This needs to match the filterable field for the texture
                    // from above.
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        }
    }

    /// Gets the bind group layout for reading the shadow map in the color
    /// pass.
    ///
    /// Expected bind group inputs:
    ///  0 - shadow depth texture
    ///  1 - comparison sampler
    pub fn shadow_map_desc() -> wgpu::BindGroupLayoutDescriptor<'static> {
        wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow map bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    // 0: Shadow map depth texture.
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    // 1: Shadow map comparison sampler.
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        }
    }
}

/// Mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
