use std::{path::Path, rc::Rc};

use wgpu::util::DeviceExt;

use crate::{
    content::load_texture_file,
    platform::fileio::load_as_string,
    renderer::{
        materials::{DefaultTextures, Material, MaterialBuilder},
        models::{Mesh, Submesh},
        shaders::{BindGroupLayouts, Vertex},
        textures::Texture,
    },
};

/// Creates a new `Mesh` from an obj model.
#[tracing::instrument(level = "info", skip(device, queue, layouts, default_textures))]
pub fn load_obj_mesh<P>(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &BindGroupLayouts,
    default_textures: &DefaultTextures,
    obj_file_path: P,
) -> anyhow::Result<Mesh>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    let obj_text = load_as_string(obj_file_path.as_ref())?;
    let mut obj_buf_reader = std::io::BufReader::new(std::io::Cursor::new(obj_text));

    // Parse the .obj file to get a list of models (actually meshes) and
    // material definitions.
    let (obj_models, obj_materials) = tobj::load_obj_buf(
        &mut obj_buf_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |mtl_file_path| {
            let mtl_text =
                load_as_string(mtl_file_path).map_err(|_| tobj::LoadError::OpenFileFailed)?;
            tobj::load_mtl_buf(&mut std::io::BufReader::new(std::io::Cursor::new(mtl_text)))
        },
    )?;

    // Create materials for each of the MTL material definitions.
    let obj_materials = obj_materials?;
    let mut materials = Vec::with_capacity(obj_materials.len());

    for obj_mtl in obj_materials.into_iter() {
        materials.push(create_material(device, queue, obj_mtl, default_textures)?);
    }

    // Creates meshes for each of the obj models.
    create_mesh(
        device,
        layouts,
        &obj_models,
        &materials,
        default_textures,
        obj_file_path
            .as_ref()
            .to_str()
            .unwrap_or("invalid utf8 chars in obj file path"),
    )
}

/// Creates a `Material` from a given obj model's .mtl material.
pub fn create_material(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    mat: tobj::Material,
    default_textures: &DefaultTextures,
) -> anyhow::Result<Material> {
    fn create_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        maybe_file_path: Option<String>,
        default_texture: &Rc<Texture>,
    ) -> anyhow::Result<Rc<Texture>> {
        match maybe_file_path {
            Some(file_path) => Ok(Rc::new(load_texture_file(device, queue, &file_path)?)),
            None => Ok(default_texture.clone()),
        }
    }

    Ok(Material {
        ambient_color: mat
            .ambient
            .map(|v| v.into())
            .unwrap_or(MaterialBuilder::DEFAULT_AMBIENT_COLOR),
        diffuse_color: mat
            .diffuse
            .map(|v| v.into())
            .unwrap_or(MaterialBuilder::DEFAULT_DIFFUSE_COLOR),
        specular_color: mat
            .specular
            .map(|v| v.into())
            .unwrap_or(MaterialBuilder::DEFAULT_SPECULAR_COLOR),
        specular_power: mat
            .shininess
            .unwrap_or(MaterialBuilder::DEFAULT_SPECULAR_POWER),
        diffuse_map: create_texture(
            device,
            queue,
            mat.diffuse_texture,
            &default_textures.diffuse_map,
        )?,
    })
}

/// Create a mesh out of the models in an obj model file.
///
/// `obj_meshes`: A list of all the obj models defined by the .obj file.
/// `materials`: A list of all the materials referenced in the .obj file.
/// `name`: Caller provided name for the mesh.
fn create_mesh(
    device: &wgpu::Device,
    layouts: &BindGroupLayouts,
    obj_meshes: &[tobj::Model],
    materials: &[Material],
    default_textures: &DefaultTextures,
    name: &str,
) -> anyhow::Result<Mesh> {
    // Allocate a single vertex and index buffer for the entire obj mesh.
    let vertex_count: usize = obj_meshes.iter().map(|m| m.mesh.positions.len()).sum();
    let index_count: usize = obj_meshes.iter().map(|m| m.mesh.indices.len()).sum();

    let mut vertices: Vec<Vertex> = Vec::with_capacity(vertex_count);
    let mut indices: Vec<u32> = Vec::with_capacity(index_count);

    // Concatenate the vertex and index buffer of each obj mesh into a single
    // mesh with a single vertex and index buffer. Each obj "mesh" is converted
    // into a matching submesh.
    let mut submeshes: Vec<Submesh> = Vec::with_capacity(obj_meshes.len());

    for obj_mesh in obj_meshes {
        submeshes.push(process_obj_mesh(
            device,
            layouts,
            obj_mesh,
            &mut vertices,
            &mut indices,
            materials,
            default_textures,
        ));
    }

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} vertex buffer")),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} index buffer")),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Ok(Mesh::new(
        vertex_buffer,
        index_buffer,
        indices.len() as u32,
        wgpu::IndexFormat::Uint32,
        submeshes,
    ))
}

/// Append the vertices and indices of an obj model into a shared vertex and
/// index buffer for the entire mesh, returning a `Submesh` that references the
/// appended data.
fn process_obj_mesh(
    device: &wgpu::Device,
    layouts: &BindGroupLayouts,
    model: &tobj::Model,
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    materials: &[Material],
    default_textures: &DefaultTextures,
) -> Submesh {
    // This method assumes that `obj_model` was loaded with `triangulate = true`
    // and `single_index = true`.
    assert!(
        model.mesh.face_arities.is_empty(),
        "expected triangulate = true"
    );
    assert!(
        model.mesh.normal_indices.is_empty(),
        "expected single_index = true"
    );
    assert!(
        model.mesh.texcoord_indices.is_empty(),
        "expected single_index = true"
    );
    assert!(
        model.mesh.positions.len() % 3 == 0,
        "expected triangulate = true"
    );

    // With `single_index` forced, the position, texture and normal buffers
    // store each vertex sequentially (position[0] = texcoord[0] = normal[0]).
    // The obj file may still omit normals or texture coordinates entirely.
    let has_normals = !model.mesh.normals.is_empty();
    let has_texcoords = !model.mesh.texcoords.is_empty();

    // The obj mesh's indices do not account for vertex buffer sharing. Record
    // the size of the shared buffer prior to copying and use this as the
    // submesh's vertex offset.
    let base_vertex = vertices.len() as i32;
    let base_index = indices.len() as u32;

    (0..model.mesh.positions.len() / 3)
        .map(|vp_i| Vertex {
            position: [
                model.mesh.positions[vp_i * 3],
                model.mesh.positions[vp_i * 3 + 1],
                model.mesh.positions[vp_i * 3 + 2],
            ],
            normal: if has_normals {
                [
                    model.mesh.normals[vp_i * 3],
                    model.mesh.normals[vp_i * 3 + 1],
                    model.mesh.normals[vp_i * 3 + 2],
                ]
            } else {
                [0.0, 0.0, 0.0]
            },
            tex_coords: if has_texcoords {
                [
                    model.mesh.texcoords[vp_i * 2],
                    model.mesh.texcoords[vp_i * 2 + 1],
                ]
            } else {
                [0.0, 0.0]
            },
        })
        .for_each(|v| vertices.push(v));

    model.mesh.indices.iter().for_each(|i| indices.push(*i));

    // Fall back to a plain white material when the obj model does not name
    // one.
    let fallback;
    let material = match model.mesh.material_id {
        Some(id) => &materials[id],
        None => {
            fallback = MaterialBuilder::new().build(default_textures);
            &fallback
        }
    };

    Submesh::new(
        device,
        layouts,
        base_index..(base_index + model.mesh.indices.len() as u32),
        base_vertex,
        material,
    )
}
