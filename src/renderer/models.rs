use std::{ops::Range, rc::Rc};

use glam::{Mat4, Quat, Vec3};

use super::{
    materials::Material,
    shaders::{BindGroupLayouts, PerModelUniforms, PerSubmeshUniforms},
    uniforms::UniformBuffer,
};

/// A model is an instance of a mesh with its own transform. Models can be
/// drawn by the renderer in either pass.
pub struct Model {
    /// The world position of this model.
    translation: Vec3,
    /// The rotation of this model.
    rotation: Quat,
    /// The scale of this model.
    scale: Vec3,
    /// Shader uniform values associated with this model. The uniforms must be
    /// uploaded to the GPU after transform changes and prior to drawing.
    uniforms: PerModelUniforms,
    /// Reference to the shared mesh that this model will draw.
    mesh: Rc<Mesh>,
}

impl Model {
    /// Create a new model.
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        mesh: Rc<Mesh>,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Self {
        let mut model = Self {
            translation: Default::default(),
            rotation: Default::default(),
            scale: Vec3::ONE,
            uniforms: PerModelUniforms::new(device, layouts),
            mesh,
        };

        model.set_scale_rotation_translation(scale, rotation, translation);
        model
    }

    /// Set position, rotation and scale of this model and rebuild its local
    /// to world matrix.
    pub fn set_scale_rotation_translation(
        &mut self,
        scale: Vec3,
        rotation: Quat,
        translation: Vec3,
    ) {
        self.scale = scale;
        self.rotation = rotation;
        self.translation = translation;

        self.uniforms
            .set_local_to_world(Mat4::from_scale_rotation_translation(
                scale,
                rotation,
                translation,
            ));
    }

    /// Set the position of this model.
    pub fn set_translation(&mut self, translation: Vec3) {
        self.set_scale_rotation_translation(self.scale, self.rotation, translation)
    }

    /// Set the rotation of the model.
    #[allow(dead_code)]
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.set_scale_rotation_translation(self.scale, rotation, self.translation)
    }

    /// Set the scale of the model.
    #[allow(dead_code)]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.set_scale_rotation_translation(scale, self.rotation, self.translation)
    }

    /// The world position of this model.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Push pending uniform changes to the GPU prior to rendering.
    pub fn prepare(&self, queue: &wgpu::Queue) {
        if self.uniforms.is_dirty() {
            self.uniforms.update_gpu(queue);
        }
    }
}

/// Mesh definition that is shared among one or more instances of model.
pub struct Mesh {
    /// A buffer storing this mesh's vertices.
    vertex_buffer: wgpu::Buffer,
    /// A buffer storing this mesh's indices.
    index_buffer: wgpu::Buffer,
    /// The data type of the values in `index_buffer`.
    index_format: wgpu::IndexFormat,
    /// Submeshes that draw a portion of the total mesh.
    submeshes: Vec<Submesh>,
}

impl Mesh {
    pub fn new(
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
        index_format: wgpu::IndexFormat,
        submeshes: Vec<Submesh>,
    ) -> Self {
        assert!(
            index_count
                >= submeshes
                    .iter()
                    .map(|m| m.indices.end)
                    .max()
                    .unwrap_or_default(),
            "at least one submesh has index offsets larger than the associated index buffer"
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_format,
            submeshes,
        }
    }
}

/// A subpart of a larger mesh with its own material.
pub struct Submesh {
    /// Uniform values associated with this submesh.
    uniforms: PerSubmeshUniforms,
    /// The indices used when rendering this submesh.
    indices: Range<u32>,
    /// Base vertex used when rendering this submesh.
    base_vertex: i32,
}

impl Submesh {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        indices: Range<u32>,
        base_vertex: i32,
        material: &Material,
    ) -> Self {
        Self {
            uniforms: PerSubmeshUniforms::new(device, layouts, material),
            indices,
            base_vertex,
        }
    }
}

/// A trait for types that are capable of rendering models and meshes.
pub trait DrawModel<'a> {
    fn draw_model(&mut self, model: &'a Model);
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'rpass, 'a> DrawModel<'a> for wgpu::RenderPass<'rpass>
where
    'a: 'rpass,
{
    fn draw_model(&mut self, model: &'a Model) {
        // Bind the per-model uniforms for this model before drawing the mesh.
        debug_assert!(!model.uniforms.is_dirty());

        self.set_bind_group(1, model.uniforms.bind_group(), &[]);
        self.draw_mesh(&model.mesh);
    }

    fn draw_mesh(&mut self, mesh: &'a Mesh) {
        // Bind the mesh's vertex and index buffers.
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), mesh.index_format);

        // Draw each sub-mesh in the mesh. The submesh material bind group is
        // also set during the shadow pass where it is simply ignored, keeping
        // both passes on the identical draw path.
        for submesh in &mesh.submeshes {
            self.set_bind_group(2, submesh.uniforms.bind_group(), &[]);
            self.draw_indexed(submesh.indices.clone(), submesh.base_vertex, 0..1);
        }
    }
}
