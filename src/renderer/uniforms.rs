use std::cell::Cell;

/// A trait for shader uniform buffers with CPU side storage that can be
/// copied back to the GPU.
pub trait UniformBuffer {
    /// Copy the values stored in this uniform buffer to the GPU and clear the
    /// dirty flag.
    fn update_gpu(&self, queue: &wgpu::Queue);

    /// Get the bind group representing this uniform buffer.
    fn bind_group(&self) -> &wgpu::BindGroup;

    /// Check if the uniform buffer values are out of sync with the GPU.
    fn is_dirty(&self) -> bool;
}

/// Maps a plain `bytemuck::Pod` struct onto a GPU uniform buffer.
///
/// Mutate the CPU side copy through `values_mut()` and call `update_gpu()`
/// during the frame's update phase to push the new contents to the GPU.
#[derive(Debug)]
pub struct GenericUniformBuffer<T>
where
    T: Clone + Copy + std::fmt::Debug + bytemuck::Pod + bytemuck::Zeroable,
{
    /// The values stored in this uniform buffer.
    values: T,
    /// The GPU buffer storing a copy of this uniform buffer's values.
    gpu_buffer: wgpu::Buffer,
    /// The WGPU bind group representing this uniform buffer instance.
    bind_group: wgpu::BindGroup,
    /// True if `values` is potentially out of sync with the GPU buffer.
    is_dirty: Cell<bool>,
}

impl<T> GenericUniformBuffer<T>
where
    T: Clone + Copy + std::fmt::Debug + bytemuck::Pod + bytemuck::Zeroable,
{
    /// Create a new uniform buffer initialized with `values` and laid out
    /// according to `bind_group_layout` (a single buffer at binding 0).
    pub fn new(
        device: &wgpu::Device,
        label: Option<&str>,
        values: T,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let gpu_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::bytes_of(&values),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout: bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: gpu_buffer.as_entire_binding(),
            }],
        });

        Self {
            values,
            gpu_buffer,
            bind_group,
            is_dirty: Cell::new(false),
        }
    }

    /// Access the values stored in this uniform buffer with a mutable ref.
    ///
    /// Calling this method marks the buffer dirty even if no values change.
    pub fn values_mut(&mut self) -> &mut T {
        self.is_dirty.set(true);
        &mut self.values
    }
}

impl<T> UniformBuffer for GenericUniformBuffer<T>
where
    T: Clone + Copy + std::fmt::Debug + bytemuck::Pod + bytemuck::Zeroable,
{
    fn update_gpu(&self, queue: &wgpu::Queue) {
        self.is_dirty.set(false);
        queue.write_buffer(&self.gpu_buffer, 0, bytemuck::bytes_of(&self.values));
    }

    fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    fn is_dirty(&self) -> bool {
        self.is_dirty.get()
    }
}
