//! Loaded room geometry.
//!
//! A [`Scene`] is the flattened node list of one room model: every
//! primitive becomes a [`MeshNode`] with its world transform baked from the
//! node hierarchy. Geometry never changes after load apart from the
//! one-time [`Scene::normalize`] placement.

mod glb;

use glam::{Mat4, Vec3, Vec4};

pub use glb::load_glb;

use crate::gpu::backend::{MeshId, TextureId};
use crate::loading::DecodedImage;
use crate::material::MaterialId;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any point will expand.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box from two corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |b, p| b.expand(p))
    }

    /// Grow to include `p`.
    #[must_use]
    pub fn expand(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Smallest box holding both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether no point has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Midpoint.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Bounds of this box after `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        });
        Self::from_points(corners.map(|c| transform.transform_point3(c)))
    }
}

/// Vertex and index data for one primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (same length as positions).
    pub normals: Vec<[f32; 3]>,
    /// First UV set, if the primitive has one.
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Whether the mesh carries texture coordinates.
    #[must_use]
    pub fn has_uvs(&self) -> bool {
        self.uvs.as_ref().is_some_and(|uv| !uv.is_empty())
    }

    /// Local-space bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied().map(Vec3::from))
    }
}

/// Material parameters authored in the model file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthoredMaterial {
    /// Base color factor (linear RGBA).
    pub color: Vec4,
    /// Roughness factor.
    pub roughness: f32,
    /// Metalness factor.
    pub metalness: f32,
    /// Index into [`Scene::images`] for the base color texture.
    pub texture: Option<usize>,
}

impl Default for AuthoredMaterial {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            roughness: 1.0,
            metalness: 1.0,
            texture: None,
        }
    }
}

/// One drawable primitive.
#[derive(Debug, Clone)]
pub struct MeshNode {
    /// Node name (falls back to the mesh name).
    pub name: String,
    /// Local-to-world transform.
    pub world: Mat4,
    /// Geometry.
    pub data: MeshData,
    /// Material as authored in the file.
    pub authored: AuthoredMaterial,
    /// Bound material, assigned by the binding layer.
    pub material: Option<MaterialId>,
    /// GPU mesh handle once uploaded.
    pub gpu: Option<MeshId>,
    /// Whether the node is drawn.
    pub visible: bool,
}

/// The loaded room.
#[derive(Debug, Default)]
pub struct Scene {
    /// Flattened primitives.
    pub nodes: Vec<MeshNode>,
    /// Images embedded in the model.
    pub images: Vec<DecodedImage>,
    /// Translation applied by [`Scene::normalize`].
    pub model_offset: Vec3,
    /// Environment panorama once loaded.
    pub environment: Option<TextureId>,
}

impl Scene {
    /// World-space bounds of every node.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.nodes.iter().fold(Aabb::EMPTY, |acc, node| {
            acc.union(node.data.bounds().transformed(&node.world))
        })
    }

    /// Center the model on X/Z and rest it on Y = 0. Returns the new
    /// bounds.
    pub fn normalize(&mut self) -> Aabb {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return bounds;
        }
        let center = bounds.center();
        let offset = Vec3::new(-center.x, -bounds.min.y, -center.z);
        let shift = Mat4::from_translation(offset);
        for node in &mut self.nodes {
            node.world = shift * node.world;
        }
        self.model_offset += offset;
        log::debug!("model normalized by {offset:?}, size {:?}", bounds.size());
        Aabb::new(bounds.min + offset, bounds.max + offset)
    }

    /// Find nodes by exact name.
    pub fn find<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MeshNode> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// Drop every node and image.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.images.clear();
        self.environment = None;
        self.model_offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, points: &[[f32; 3]], world: Mat4) -> MeshNode {
        MeshNode {
            name: name.to_owned(),
            world,
            data: MeshData {
                positions: points.to_vec(),
                normals: vec![[0.0, 1.0, 0.0]; points.len()],
                uvs: None,
                indices: (0..points.len() as u32).collect(),
            },
            authored: AuthoredMaterial::default(),
            material: None,
            gpu: None,
            visible: true,
        }
    }

    #[test]
    fn normalize_rests_on_floor_and_centers_xz() {
        let mut scene = Scene::default();
        scene.nodes.push(node(
            "a",
            &[[1.0, 2.0, 3.0], [3.0, 4.0, 5.0], [2.0, 3.0, 9.0]],
            Mat4::IDENTITY,
        ));
        scene.nodes.push(node(
            "b",
            &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
            Mat4::from_translation(Vec3::new(10.0, 1.5, -2.0)),
        ));
        let bounds = scene.normalize();
        assert!(bounds.min.y.abs() < 1e-5);
        assert!(bounds.center().x.abs() < 1e-5);
        assert!(bounds.center().z.abs() < 1e-5);

        let again = scene.bounds();
        assert!(again.min.y.abs() < 1e-5);
        assert!(again.center().x.abs() < 1e-5);
        assert!(again.center().z.abs() < 1e-5);
    }

    #[test]
    fn transformed_bounds_follow_rotation() {
        let b = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let r = b.transformed(&Mat4::from_rotation_y(
            std::f32::consts::FRAC_PI_2,
        ));
        assert!((r.size().z - 2.0).abs() < 1e-5);
        assert!((r.size().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_scene_normalizes_to_empty() {
        let mut scene = Scene::default();
        assert!(scene.normalize().is_empty());
        assert_eq!(scene.model_offset, Vec3::ZERO);
    }
}
