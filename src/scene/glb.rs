//! Binary glTF import.

use glam::{Mat4, Vec4};

use super::{AuthoredMaterial, MeshData, MeshNode, Scene};
use crate::error::VisualiserError;
use crate::loading::DecodedImage;

const DRACO: &str = "KHR_draco_mesh_compression";

/// Parse a GLB (or self-contained glTF) payload into a flattened scene.
///
/// Draco-compressed primitives are rejected: the geometry has to be
/// exported uncompressed.
pub fn load_glb(bytes: &[u8]) -> Result<Scene, VisualiserError> {
    let (document, buffers, images) = gltf::import_slice(bytes)
        .map_err(|e| VisualiserError::Decode(format!("glTF: {e}")))?;

    if document.extensions_required().any(|ext| ext == DRACO) {
        return Err(VisualiserError::Decode(
            "Draco-compressed meshes are not supported".to_owned(),
        ));
    }

    let mut scene = Scene {
        images: images.into_iter().map(convert_image).collect(),
        ..Scene::default()
    };

    let roots: Vec<gltf::Node<'_>> = match document
        .default_scene()
        .or_else(|| document.scenes().next())
    {
        Some(s) => s.nodes().collect(),
        None => document.nodes().collect(),
    };

    let mut stack: Vec<(gltf::Node<'_>, Mat4)> =
        roots.into_iter().map(|n| (n, Mat4::IDENTITY)).collect();
    while let Some((node, parent)) = stack.pop() {
        let world =
            parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        if let Some(mesh) = node.mesh() {
            let name = node
                .name()
                .or_else(|| mesh.name())
                .unwrap_or_default()
                .to_owned();
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::debug!("skipping non-triangle primitive in `{name}`");
                    continue;
                }
                let Some(data) = read_primitive(&primitive, &buffers) else {
                    log::warn!("primitive in `{name}` has no positions");
                    continue;
                };
                scene.nodes.push(MeshNode {
                    name: name.clone(),
                    world,
                    data,
                    authored: authored(&primitive.material()),
                    material: None,
                    gpu: None,
                    visible: true,
                });
            }
        }
        stack.extend(node.children().map(|c| (c, world)));
    }

    log::debug!(
        "glTF: {} primitives, {} images",
        scene.nodes.len(),
        scene.images.len()
    );
    Ok(scene)
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader = primitive
        .reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let normals = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None => flat_normals(&positions, &indices),
    };
    let uvs = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().collect::<Vec<_>>());
    Some(MeshData {
        positions,
        normals,
        uvs,
        indices,
    })
}

fn flat_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![glam::Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let (Some(pa), Some(pb), Some(pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let (pa, pb, pc) = (
            glam::Vec3::from(*pa),
            glam::Vec3::from(*pb),
            glam::Vec3::from(*pc),
        );
        let n = (pb - pa).cross(pc - pa);
        for i in [a, b, c] {
            normals[i] += n;
        }
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(glam::Vec3::Y).to_array())
        .collect()
}

fn authored(material: &gltf::Material<'_>) -> AuthoredMaterial {
    let pbr = material.pbr_metallic_roughness();
    AuthoredMaterial {
        color: Vec4::from(pbr.base_color_factor()),
        roughness: pbr.roughness_factor(),
        metalness: pbr.metallic_factor(),
        texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index()),
    }
}

fn convert_image(data: gltf::image::Data) -> DecodedImage {
    use gltf::image::Format;
    let (width, height) = (data.width, data.height);
    let pixels = match data.format {
        Format::R8G8B8A8 => data.pixels,
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => data
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            log::warn!("unsupported embedded image format {other:?}, using white");
            vec![255; (width * height * 4) as usize]
        }
    };
    DecodedImage {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::GlbBuilder;

    #[test]
    fn names_positions_and_uvs_survive_import() {
        let bytes = GlbBuilder::new()
            .mesh("Floor_Main", true)
            .mesh("static_wall_left", false)
            .build();
        let scene = load_glb(&bytes).unwrap();
        assert_eq!(scene.nodes.len(), 2);
        let floor = scene.find("Floor_Main").next().unwrap();
        assert!(floor.data.has_uvs());
        assert_eq!(floor.data.positions.len(), 3);
        assert_eq!(floor.data.normals.len(), 3);
        let wall = scene.find("static_wall_left").next().unwrap();
        assert!(!wall.data.has_uvs());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = load_glb(b"definitely not a model").unwrap_err();
        assert!(matches!(err, VisualiserError::Decode(_)));
    }
}
