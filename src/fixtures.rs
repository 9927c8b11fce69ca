//! Test fixtures: tiny GLB rooms and solid-color PNGs.

use std::io::Cursor;

use serde_json::{json, Value};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// Encode a solid `rgba` image as PNG.
pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}

struct FixtureMesh {
    name: String,
    uvs: bool,
    translation: [f32; 3],
}

/// Builds a GLB with one triangle per named mesh.
///
/// Each triangle spans `(0,0,0)`, `(2,0,0)` and `(0,1,1)` in local space,
/// offset by the node translation set with [`at`](Self::at).
#[derive(Default)]
pub struct GlbBuilder {
    meshes: Vec<FixtureMesh>,
}

impl GlbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh node named `name`, with or without texture coordinates.
    pub fn mesh(mut self, name: &str, uvs: bool) -> Self {
        self.meshes.push(FixtureMesh {
            name: name.to_owned(),
            uvs,
            translation: [0.0; 3],
        });
        self
    }

    /// Translate the most recently added mesh.
    pub fn at(mut self, translation: [f32; 3]) -> Self {
        if let Some(mesh) = self.meshes.last_mut() {
            mesh.translation = translation;
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let positions: [[f32; 3]; 3] =
            [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 1.0]];
        let normals: [[f32; 3]; 3] = [[0.0, 0.0, 1.0]; 3];
        let uvs: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let indices: [u32; 3] = [0, 1, 2];

        let mut bin: Vec<u8> = Vec::new();
        let mut views: Vec<Value> = Vec::new();
        let mut accessors: Vec<Value> = Vec::new();
        let mut push = |bytes: &[u8], accessor: Value| -> usize {
            let offset = bin.len();
            bin.extend_from_slice(bytes);
            views.push(json!({
                "buffer": 0,
                "byteOffset": offset,
                "byteLength": bytes.len(),
            }));
            let mut accessor = accessor;
            accessor["bufferView"] = json!(views.len() - 1);
            accessors.push(accessor);
            accessors.len() - 1
        };

        let mut meshes = Vec::new();
        let mut nodes = Vec::new();
        for (i, mesh) in self.meshes.iter().enumerate() {
            let position = push(
                bytemuck::cast_slice(&positions),
                json!({
                    "componentType": FLOAT,
                    "count": 3,
                    "type": "VEC3",
                    "min": [0.0, 0.0, 0.0],
                    "max": [2.0, 1.0, 1.0],
                }),
            );
            let normal = push(
                bytemuck::cast_slice(&normals),
                json!({"componentType": FLOAT, "count": 3, "type": "VEC3"}),
            );
            let mut attributes = json!({"POSITION": position, "NORMAL": normal});
            if mesh.uvs {
                let uv = push(
                    bytemuck::cast_slice(&uvs),
                    json!({"componentType": FLOAT, "count": 3, "type": "VEC2"}),
                );
                attributes["TEXCOORD_0"] = json!(uv);
            }
            let index = push(
                bytemuck::cast_slice(&indices),
                json!({"componentType": UNSIGNED_INT, "count": 3, "type": "SCALAR"}),
            );
            meshes.push(json!({
                "name": mesh.name,
                "primitives": [{"attributes": attributes, "indices": index}],
            }));
            nodes.push(json!({
                "name": mesh.name,
                "mesh": i,
                "translation": mesh.translation,
            }));
        }

        let document = json!({
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": (0..nodes.len()).collect::<Vec<_>>()}],
            "nodes": nodes,
            "meshes": meshes,
            "accessors": accessors,
            "bufferViews": views,
            "buffers": [{"byteLength": bin.len().max(4)}],
        });

        let mut json_chunk = serde_json::to_vec(&document).expect("glTF json");
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        let mut bin_chunk = bin;
        while bin_chunk.len() % 4 != 0 || bin_chunk.is_empty() {
            bin_chunk.push(0);
        }

        let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(GLB_MAGIC);
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json_chunk);
        out.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin_chunk);
        out
    }
}
