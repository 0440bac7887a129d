use std::path::Path;

use crate::{
    platform::fileio::load_as_binary,
    renderer::textures::{self, ColorSpace, Texture},
};

pub mod obj_model;

/// Loads an image from the content directory as a GPU texture. Color textures
/// are decoded as sRGB.
#[tracing::instrument(level = "info", skip(device, queue))]
pub fn load_texture_file<P>(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    file_path: P,
) -> anyhow::Result<Texture>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    let file_bytes = load_as_binary(file_path.as_ref())?;
    textures::from_image_bytes(
        device,
        queue,
        &file_bytes,
        ColorSpace::Srgb,
        Some(
            file_path
                .as_ref()
                .to_str()
                .unwrap_or("invalid utf8 chars in texture filename"),
        ),
    )
}

/// Loads an image from the content directory as a grid of height samples for
/// terrain generation. Pixels are converted to luminance and normalized to
/// `[0, 1]`. Returns the samples in row-major order along with the number of
/// samples per row.
#[tracing::instrument(level = "info")]
pub fn load_heightmap_file<P>(file_path: P) -> anyhow::Result<(Vec<f32>, usize)>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    let file_bytes = load_as_binary(file_path.as_ref())?;
    let image = image::load_from_memory(&file_bytes)?.to_luma8();

    let columns = image.width() as usize;
    let heights = image
        .pixels()
        .map(|pixel| pixel.0[0] as f32 / 255.0)
        .collect();

    Ok((heights, columns))
}
