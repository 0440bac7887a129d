use anyhow::Result;
use image::GenericImageView;

/// Texture format used for every depth attachment in the renderer, including
/// the shadow map.
pub const DEPTH_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// How the bytes of an image should be interpreted when sampled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorSpace {
    /// Color data authored for display, converted to linear when sampled.
    Srgb,
    /// Raw data such as masks or lookup tables, sampled as-is.
    Linear,
}

impl ColorSpace {
    fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Stores a WGPU texture along with its associated view and sampler.
#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Construct a texture from `image_bytes`, which must be an image in a format
/// supported by this crate's `image` features (PNG or JPEG).
pub fn from_image_bytes(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image_bytes: &[u8],
    color_space: ColorSpace,
    label: Option<&str>,
) -> Result<Texture> {
    let image = image::load_from_memory(image_bytes)?;
    Ok(from_image(device, queue, &image, color_space, label))
}

/// Construct a texture from a decoded image.
pub fn from_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &image::DynamicImage,
    color_space: ColorSpace,
    label: Option<&str>,
) -> Texture {
    let rgba = image.to_rgba8();
    let (width, height) = image.dimensions();
    from_rgba8(device, queue, &rgba, width, height, color_space, label)
}

/// Construct a 1x1 texture of a single color. Used as a stand-in when a
/// material does not provide a texture map.
pub fn new_1x1(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    color: [u8; 3],
    label: Option<&str>,
) -> Texture {
    let rgba = [color[0], color[1], color[2], 255];
    from_rgba8(device, queue, &rgba, 1, 1, ColorSpace::Linear, label)
}

/// Upload tightly packed RGBA8 pixel data as a filterable 2d texture.
fn from_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    rgba: &[u8],
    width: u32,
    height: u32,
    color_space: ColorSpace,
    label: Option<&str>,
) -> Texture {
    debug_assert_eq!(rgba.len() as u32, width * height * 4);

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label,
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: color_space.texture_format(),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    Texture {
        texture,
        view,
        sampler,
    }
}

/// Create the depth buffer texture backing the color pass. Must be recreated
/// whenever the window surface is resized.
pub fn create_depth_texture(
    device: &wgpu::Device,
    surface_config: &wgpu::SurfaceConfiguration,
    label: Option<&str>,
) -> Texture {
    // `TextureUsages::RENDER_ATTACHMENT` in the usage flags ensures depth
    // information can be written to this texture.
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label,
        size: wgpu::Extent3d {
            width: surface_config.width.max(1),
            height: surface_config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        compare: Some(wgpu::CompareFunction::LessEqual),
        lod_min_clamp: 0.0,
        lod_max_clamp: 100.0,
        ..Default::default()
    });

    Texture {
        texture,
        view,
        sampler,
    }
}
