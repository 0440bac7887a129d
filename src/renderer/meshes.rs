//! Procedurally generated mesh data.
//!
//! Vertex winding order is CCW. Generated meshes are unit-ish sized and meant
//! to be scaled by their model transform.
use glam::Vec3;

use super::shaders::Vertex;

/// Vertex and index data for a tetrahedron with smoothed (averaged) vertex
/// normals.
pub fn tetrahedron() -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = vec![
        Vertex {
            position: [-1.0, -1.0, 0.0],
            normal: [0.0, 0.0, 0.0],
            tex_coords: [0.0, 0.0],
        },
        Vertex {
            position: [0.0, -1.0, 1.0],
            normal: [0.0, 0.0, 0.0],
            tex_coords: [0.5, 0.0],
        },
        Vertex {
            position: [1.0, -1.0, 0.0],
            normal: [0.0, 0.0, 0.0],
            tex_coords: [1.0, 0.0],
        },
        Vertex {
            position: [0.0, 1.0, 0.0],
            normal: [0.0, 0.0, 0.0],
            tex_coords: [0.5, 1.0],
        },
    ];

    let indices: Vec<u16> = vec![
        0, 1, 3, // Front side face.
        1, 2, 3, // Right side face.
        2, 0, 3, // Back face.
        0, 2, 1, // Bottom face.
    ];

    average_normals(&mut vertices, &indices);
    (vertices, indices)
}

/// Vertex and index data for a flat floor quad on the XZ plane centered at
/// the origin. The texture repeats `uv_tiles` times across the surface.
pub fn floor_plane(half_extent: f32, uv_tiles: f32) -> (Vec<Vertex>, Vec<u16>) {
    let vertices = vec![
        Vertex {
            position: [-half_extent, 0.0, -half_extent],
            normal: [0.0, 1.0, 0.0],
            tex_coords: [0.0, 0.0],
        },
        Vertex {
            position: [half_extent, 0.0, -half_extent],
            normal: [0.0, 1.0, 0.0],
            tex_coords: [uv_tiles, 0.0],
        },
        Vertex {
            position: [-half_extent, 0.0, half_extent],
            normal: [0.0, 1.0, 0.0],
            tex_coords: [0.0, uv_tiles],
        },
        Vertex {
            position: [half_extent, 0.0, half_extent],
            normal: [0.0, 1.0, 0.0],
            tex_coords: [uv_tiles, uv_tiles],
        },
    ];

    let indices: Vec<u16> = vec![0, 2, 1, 1, 2, 3];

    (vertices, indices)
}

/// Vertex and index data for a terrain patch generated from a grid of height
/// samples, usually decoded from a grayscale heightmap image.
///
/// `heights` holds one sample per vertex in row-major order with `columns`
/// samples per row. Vertices are spaced `tile_size` apart on the XZ plane,
/// centered on the origin, with the sample value times `height_scale` as the
/// vertex height. Texture coordinates advance one unit per grid cell so a
/// repeat-addressed texture tiles across the patch. Normals are smoothed with
/// `average_normals`.
pub fn heightmap_terrain(
    heights: &[f32],
    columns: usize,
    tile_size: f32,
    height_scale: f32,
) -> (Vec<Vertex>, Vec<u16>) {
    assert!(columns >= 2, "terrain needs at least two columns");
    assert!(
        heights.len() % columns == 0,
        "height samples must fill whole rows"
    );
    assert!(
        heights.len() <= u16::MAX as usize + 1,
        "too many height samples for 16 bit indices"
    );

    let rows = heights.len() / columns;
    assert!(rows >= 2, "terrain needs at least two rows");

    let half_width = (columns - 1) as f32 * tile_size * 0.5;
    let half_depth = (rows - 1) as f32 * tile_size * 0.5;

    let mut vertices = Vec::with_capacity(heights.len());

    for z in 0..rows {
        for x in 0..columns {
            vertices.push(Vertex {
                position: [
                    x as f32 * tile_size - half_width,
                    heights[z * columns + x] * height_scale,
                    z as f32 * tile_size - half_depth,
                ],
                normal: [0.0, 0.0, 0.0],
                tex_coords: [x as f32, z as f32],
            });
        }
    }

    // Two CCW triangles per grid cell, matching the floor plane's winding.
    let mut indices = Vec::with_capacity((rows - 1) * (columns - 1) * 6);

    for z in 0..rows - 1 {
        for x in 0..columns - 1 {
            let a = (z * columns + x) as u16;
            let b = a + 1;
            let c = a + columns as u16;
            let d = c + 1;

            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    average_normals(&mut vertices, &indices);
    (vertices, indices)
}

/// Replace each vertex normal with the normalized average of the face normals
/// of every triangle the vertex participates in (smooth phong normals).
pub fn average_normals(vertices: &mut [Vertex], indices: &[u16]) {
    assert!(indices.len() % 3 == 0, "indices must form whole triangles");

    for vertex in vertices.iter_mut() {
        vertex.normal = [0.0, 0.0, 0.0];
    }

    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );

        let p0 = Vec3::from_array(vertices[i0].position);
        let p1 = Vec3::from_array(vertices[i1].position);
        let p2 = Vec3::from_array(vertices[i2].position);

        let face_normal = (p1 - p0).cross(p2 - p0).normalize();

        for i in [i0, i1, i2] {
            let accumulated = Vec3::from_array(vertices[i].normal) + face_normal;
            vertices[i].normal = accumulated.to_array();
        }
    }

    for vertex in vertices.iter_mut() {
        vertex.normal = Vec3::from_array(vertex.normal).normalize().to_array();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn averaged_normals_are_unit_length() {
        let (vertices, _) = tetrahedron();

        for vertex in &vertices {
            assert_relative_eq!(
                Vec3::from_array(vertex.normal).length(),
                1.0,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn flat_quad_average_normal_equals_face_normal() {
        // A quad in the XY plane wound CCW toward +Z: every averaged vertex
        // normal must be exactly the shared face normal.
        let mut vertices = vec![
            Vertex {
                position: [0.0, 0.0, 0.0],
                normal: [0.0, 0.0, 0.0],
                tex_coords: [0.0, 0.0],
            },
            Vertex {
                position: [1.0, 0.0, 0.0],
                normal: [0.0, 0.0, 0.0],
                tex_coords: [1.0, 0.0],
            },
            Vertex {
                position: [1.0, 1.0, 0.0],
                normal: [0.0, 0.0, 0.0],
                tex_coords: [1.0, 1.0],
            },
            Vertex {
                position: [0.0, 1.0, 0.0],
                normal: [0.0, 0.0, 0.0],
                tex_coords: [0.0, 1.0],
            },
        ];

        average_normals(&mut vertices, &[0, 1, 2, 0, 2, 3]);

        for vertex in &vertices {
            assert_relative_eq!(vertex.normal[0], 0.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal[1], 0.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn tetrahedron_apex_normal_points_up() {
        let (vertices, _) = tetrahedron();

        // The apex is shared by the three side faces only, so its averaged
        // normal must point away from the bottom face.
        assert!(vertices[3].normal[1] > 0.0);
    }

    #[test]
    fn terrain_has_one_vertex_per_height_sample() {
        let heights = vec![0.0; 12];
        let (vertices, indices) = heightmap_terrain(&heights, 4, 1.0, 1.0);

        assert_eq!(vertices.len(), 12);
        // Two triangles per cell in a 3 x 2 cell grid.
        assert_eq!(indices.len(), 6 * 6);
    }

    #[test]
    fn terrain_heights_are_scaled_sample_values() {
        let heights = [0.0, 0.25, 0.5, 1.0];
        let (vertices, _) = heightmap_terrain(&heights, 2, 1.0, 8.0);

        for (vertex, height) in vertices.iter().zip(heights) {
            assert_relative_eq!(vertex.position[1], height * 8.0);
        }
    }

    #[test]
    fn terrain_grid_is_centered_on_the_origin() {
        let heights = vec![0.5; 9];
        let (vertices, _) = heightmap_terrain(&heights, 3, 2.0, 1.0);

        assert_relative_eq!(vertices[0].position[0], -2.0);
        assert_relative_eq!(vertices[0].position[2], -2.0);
        assert_relative_eq!(vertices[8].position[0], 2.0);
        assert_relative_eq!(vertices[8].position[2], 2.0);
    }

    #[test]
    fn flat_terrain_normals_point_up() {
        let heights = vec![0.25; 16];
        let (vertices, _) = heightmap_terrain(&heights, 4, 1.0, 1.0);

        for vertex in &vertices {
            assert_relative_eq!(vertex.normal[0], 0.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal[1], 1.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal[2], 0.0, epsilon = 1e-6);
        }
    }
}
