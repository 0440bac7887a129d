pub mod lighting;
pub mod materials;
pub mod meshes;
pub mod models;
pub mod passes;
pub mod scene;
pub mod shaders;
pub mod textures;
mod uniforms;

use anyhow::Context;
use glam::{Quat, Vec3};
use tracing::{info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;

use materials::{DefaultTextures, Material};
use models::{DrawModel, Mesh, Model, Submesh};
use passes::shadow_pass::ShadowMapPass;
use scene::Scene;
use shaders::{BindGroupLayouts, PerFrameUniforms, Vertex};
use textures::Texture;
use uniforms::UniformBuffer;

/// The passes rendered each frame, in submission order. The shadow map must
/// be written before the forward pass samples it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    /// Depth only pass from the directional light's point of view.
    Shadow,
    /// Forward lit pass to the backbuffer.
    Color,
}

impl PassKind {
    pub const SEQUENCE: [PassKind; 2] = [PassKind::Shadow, PassKind::Color];
}

/// Invokes `encode` once per pass in `PassKind::SEQUENCE`, in order. The
/// render loop encodes its command buffer through this so the pass ordering
/// lives in one place.
fn encode_frame_passes<F>(mut encode: F)
where
    F: FnMut(PassKind),
{
    for pass in PassKind::SEQUENCE {
        encode(pass);
    }
}

/// Owns the GPU device along with the pipelines and per-frame resources used
/// to draw a scene.
pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    window_size: winit::dpi::PhysicalSize<u32>,
    /// Depth buffer for the forward pass, recreated on resize.
    depth_texture: Texture,
    bind_group_layouts: BindGroupLayouts,
    forward_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    shadow_map: ShadowMapPass,
    per_frame_uniforms: PerFrameUniforms,
    default_textures: DefaultTextures,
    pub camera: Camera,
    /// XXX: `window` must be the last field in the struct because it needs
    /// to be dropped after `surface`, because the surface contains unsafe
    /// references to `window`.
    window: &'a Window,
}

impl<'a> Renderer<'a> {
    pub async fn new(window: &'a Window) -> anyhow::Result<Self> {
        let window_size = window.inner_size();

        // Create a WGPU instance that can use any supported graphics API.
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create the main rendering surface and then get an adapter that acts
        // as the handle to one of the machine's physical GPU(s).
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter found")?;

        // Get a communication channel to the graphics card and a queue for
        // submitting commands to.
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;

        // Set the main rendering surface to use an sRGB texture, and then
        // allow all shaders to assume they are writing to an sRGB back buffer.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        if surface_format.is_srgb() {
            info!("rendering surface supports sRGB");
        } else {
            info!("no sRGB support found for the main rendering surface, defaulting to first available");
        }

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.width,
            height: window_size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        let bind_group_layouts = BindGroupLayouts::new(&device);

        // Initialize the camera a few units up and back from the world
        // origin, looking in towards it.
        let camera = Camera::new(
            Vec3::new(5.0, 2.0, -5.0),
            Vec3::Y,
            135.0,
            0.0,
            f32::to_radians(60.0),
            0.1,
            100.0,
            surface_config.width,
            surface_config.height,
        );

        let per_frame_uniforms = PerFrameUniforms::new(&device, &bind_group_layouts);

        // Create a depth buffer to ensure fragments are correctly rendered
        // back to front.
        let depth_texture =
            textures::create_depth_texture(&device, &surface_config, Some("depth buffer"));

        let shadow_map = ShadowMapPass::new(&device, &bind_group_layouts);

        // The forward pipeline sees all four bind groups. The shadow pipeline
        // layout stops after the per-model group, so the submesh and shadow
        // map groups bound during the shadow pass are ignored.
        let forward_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("forward shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("assets/forward.wgsl").into()),
        });

        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("assets/shadow.wgsl").into()),
        });

        let forward_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("forward pipeline layout"),
                bind_group_layouts: &[
                    &bind_group_layouts.per_frame_layout,
                    &bind_group_layouts.per_model_layout,
                    &bind_group_layouts.per_submesh_layout,
                    &bind_group_layouts.shadow_map_layout,
                ],
                push_constant_ranges: &[],
            });

        let forward_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("forward pipeline"),
            layout: Some(&forward_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &forward_shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &forward_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: textures::DEPTH_TEXTURE_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shadow pipeline layout"),
                bind_group_layouts: &[
                    &bind_group_layouts.per_frame_layout,
                    &bind_group_layouts.per_model_layout,
                ],
                push_constant_ranges: &[],
            });

        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            // Depth only, no color targets.
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: textures::DEPTH_TEXTURE_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                // Constant and slope scaled bias to push shadow casters back,
                // hiding acne on lit surfaces.
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let default_textures = DefaultTextures::new(&device, &queue);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            window_size,
            depth_texture,
            bind_group_layouts,
            forward_pipeline,
            shadow_pipeline,
            shadow_map,
            per_frame_uniforms,
            default_textures,
            camera,
            window,
        })
    }

    pub fn window(&self) -> &Window {
        self.window
    }

    pub fn window_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.window_size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn bind_group_layouts(&self) -> &BindGroupLayouts {
        &self.bind_group_layouts
    }

    pub fn default_textures(&self) -> &DefaultTextures {
        &self.default_textures
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            warn!(
                "invalid width of {} or height {} when resizing",
                new_size.width, new_size.height
            );
        } else {
            self.window_size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);

            // Recreate the depth buffer to match the new window size.
            self.depth_texture = textures::create_depth_texture(
                &self.device,
                &self.surface_config,
                Some("depth buffer"),
            );

            // Recreate the camera viewport to match the new window size.
            self.camera
                .set_viewport_size(new_size.width, new_size.height)
                .unwrap_or_else(|e| warn!("{e}"))
        }
    }

    /// Create a mesh from vertex and index slices with a single submesh
    /// spanning all of it.
    pub fn create_mesh(&self, vertices: &[Vertex], indices: &[u16], material: &Material) -> Mesh {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh vertex buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh index buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Mesh::new(
            vertex_buffer,
            index_buffer,
            indices.len() as u32,
            wgpu::IndexFormat::Uint16,
            vec![Submesh::new(
                &self.device,
                &self.bind_group_layouts,
                0..indices.len() as u32,
                0,
                material,
            )],
        )
    }

    /// Create a model instancing the given mesh.
    pub fn create_model(
        &self,
        mesh: std::rc::Rc<Mesh>,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Model {
        Model::new(
            &self.device,
            &self.bind_group_layouts,
            mesh,
            translation,
            rotation,
            scale,
        )
    }

    /// Draw one frame of `scene` through each pass in `PassKind::SEQUENCE`.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        // Refresh the per-frame uniforms before encoding any passes.
        self.per_frame_uniforms
            .set_view_projection(self.camera.view_projection_matrix());
        self.per_frame_uniforms.set_view_pos(self.camera.position());

        if let Some(sun) = &scene.directional_light {
            self.per_frame_uniforms.set_directional_light(sun);
            self.per_frame_uniforms
                .set_light_space(sun.light_space_matrix());
        }

        self.per_frame_uniforms.set_point_lights(scene.point_lights());
        self.per_frame_uniforms.set_spot_lights(scene.spot_lights());
        self.per_frame_uniforms.update_gpu(&self.queue);

        for model in &scene.models {
            model.prepare(&self.queue);
        }

        let backbuffer = self.surface.get_current_texture()?;
        let backbuffer_view = backbuffer
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut command_encoder =
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render loop encoder"),
                });

        encode_frame_passes(|pass| {
            // Each pass is scoped so its encoder borrow ends before the next
            // pass begins.
            match pass {
                PassKind::Shadow => {
                    let mut render_pass = self.shadow_map.begin(&mut command_encoder);

                    render_pass.set_pipeline(&self.shadow_pipeline);
                    render_pass.set_bind_group(0, self.per_frame_uniforms.bind_group(), &[]);

                    for model in &scene.models {
                        render_pass.draw_model(model);
                    }
                }
                PassKind::Color => {
                    let mut render_pass =
                        command_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("forward pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &backbuffer_view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Clear(wgpu::Color {
                                        r: 0.1,
                                        g: 0.2,
                                        b: 0.3,
                                        a: 1.0,
                                    }),
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: Some(
                                wgpu::RenderPassDepthStencilAttachment {
                                    view: &self.depth_texture.view,
                                    depth_ops: Some(wgpu::Operations {
                                        load: wgpu::LoadOp::Clear(1.0),
                                        store: wgpu::StoreOp::Store,
                                    }),
                                    stencil_ops: None,
                                },
                            ),
                            occlusion_query_set: None,
                            timestamp_writes: None,
                        });

                    render_pass.set_pipeline(&self.forward_pipeline);
                    render_pass.set_bind_group(0, self.per_frame_uniforms.bind_group(), &[]);
                    render_pass.set_bind_group(3, self.shadow_map.bind_group(), &[]);

                    for model in &scene.models {
                        render_pass.draw_model(model);
                    }
                }
            }
        });

        // All done - submit commands for execution.
        self.queue.submit(std::iter::once(command_encoder.finish()));
        backbuffer.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_encoding_visits_shadow_pass_before_color_pass() {
        let mut visited = Vec::new();
        encode_frame_passes(|pass| visited.push(pass));

        let shadow = visited
            .iter()
            .position(|pass| *pass == PassKind::Shadow)
            .unwrap();
        let color = visited
            .iter()
            .position(|pass| *pass == PassKind::Color)
            .unwrap();

        assert!(shadow < color);
    }

    #[test]
    fn frame_encoding_visits_each_pass_exactly_once() {
        let mut visited = Vec::new();
        encode_frame_passes(|pass| visited.push(pass));

        assert_eq!(visited.len(), 2);
        assert_eq!(
            visited.iter().filter(|pass| **pass == PassKind::Shadow).count(),
            1
        );
    }
}
