//! Backend-agnostic material model.
//!
//! Materials live in a [`MaterialStore`] and are addressed by
//! [`MaterialId`]. Meshes hold ids, so swapping a surface's look means
//! replacing or mutating the stored material, never touching geometry.
//! Every mutable access bumps the material's revision, which the GPU
//! backend uses to decide when to re-upload uniforms.

pub mod binding;
pub mod classify;

use glam::{Vec2, Vec3};

use crate::gpu::backend::TextureId;
use crate::options::SurfaceStyle;

/// Handle to a material in a [`MaterialStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    /// Raw index, stable for the lifetime of the material.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Lighting model used to shade a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Texture or color only, unaffected by lights (baked surfaces).
    Unlit,
    /// Metal/rough PBR.
    #[default]
    Standard,
    /// PBR with transmission, clearcoat and specular controls (glass).
    Physical,
}

/// Surface appearance parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Lighting model.
    pub shading: Shading,
    /// Base color, multiplied with `map` when present.
    pub color: Vec3,
    /// Base color texture.
    pub map: Option<TextureId>,
    /// PBR roughness.
    pub roughness: f32,
    /// PBR metalness.
    pub metalness: f32,
    /// Environment reflection strength.
    pub env_map_intensity: f32,
    /// Emissive color.
    pub emissive: Vec3,
    /// Emissive strength.
    pub emissive_intensity: f32,
    /// Opacity, honoured only when `transparent` is set.
    pub opacity: f32,
    /// Whether the material is alpha-blended.
    pub transparent: bool,
    /// Physical transmission.
    pub transmission: f32,
    /// Index of refraction.
    pub ior: f32,
    /// Transmission thickness.
    pub thickness: f32,
    /// Clearcoat layer strength.
    pub clearcoat: f32,
    /// Specular strength.
    pub specular_intensity: f32,
    /// Texture repeat along U and V.
    pub uv_scale: Vec2,
    /// Draw order among transparent meshes (lower draws first).
    pub render_order: i32,
    revision: u64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shading: Shading::Standard,
            color: Vec3::ONE,
            map: None,
            roughness: 1.0,
            metalness: 0.0,
            env_map_intensity: 1.0,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            opacity: 1.0,
            transparent: false,
            transmission: 0.0,
            ior: 1.5,
            thickness: 0.0,
            clearcoat: 0.0,
            specular_intensity: 1.0,
            uv_scale: Vec2::ONE,
            render_order: 0,
            revision: 0,
        }
    }
}

impl Material {
    /// Unlit material showing a baked texture.
    #[must_use]
    pub fn unlit(map: Option<TextureId>) -> Self {
        Self {
            shading: Shading::Unlit,
            map,
            ..Self::default()
        }
    }

    /// Standard PBR material with the given color, roughness and metalness.
    #[must_use]
    pub fn standard(color: Vec3, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            roughness,
            metalness,
            ..Self::default()
        }
    }

    /// White PBR material showing `map` with a surface's settled style.
    #[must_use]
    pub fn surface(style: &SurfaceStyle, map: Option<TextureId>) -> Self {
        Self {
            map,
            roughness: style.roughness,
            metalness: style.metalness,
            env_map_intensity: style.env_map_intensity,
            uv_scale: Vec2::from(style.uv_scale),
            ..Self::default()
        }
    }

    /// Monotonic change counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Slot storage for materials with id reuse.
#[derive(Debug, Default)]
pub struct MaterialStore {
    slots: Vec<Option<Material>>,
    free: Vec<u32>,
}

impl MaterialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its id.
    pub fn insert(&mut self, material: Material) -> MaterialId {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(material);
            MaterialId(index)
        } else {
            self.slots.push(Some(material));
            MaterialId((self.slots.len() - 1) as u32)
        }
    }

    /// Borrow a material.
    #[must_use]
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutably borrow a material, marking it changed.
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        let material =
            self.slots.get_mut(id.index()).and_then(Option::as_mut)?;
        material.revision += 1;
        Some(material)
    }

    /// Replace the material behind `id`, keeping the id valid.
    pub fn replace(&mut self, id: MaterialId, material: Material) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            let revision =
                slot.as_ref().map_or(0, |m| m.revision).wrapping_add(1);
            *slot = Some(Material {
                revision,
                ..material
            });
        }
    }

    /// Remove a material, freeing its id for reuse.
    pub fn remove(&mut self, id: MaterialId) -> Option<Material> {
        let material = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        Some(material)
    }

    /// Number of live materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the store holds no materials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live materials with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.slots.iter().enumerate().filter_map(|(i, m)| {
            m.as_ref().map(|m| (MaterialId(i as u32), m))
        })
    }

    /// Remove every material.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_bumps_revision() {
        let mut store = MaterialStore::new();
        let id = store.insert(Material::default());
        assert_eq!(store.get(id).unwrap().revision(), 0);
        store.get_mut(id).unwrap().roughness = 0.3;
        assert_eq!(store.get(id).unwrap().revision(), 1);
        store.replace(id, Material::unlit(None));
        assert_eq!(store.get(id).unwrap().revision(), 2);
        assert_eq!(store.get(id).unwrap().shading, Shading::Unlit);
    }

    #[test]
    fn removed_ids_are_reused() {
        let mut store = MaterialStore::new();
        let a = store.insert(Material::default());
        let _b = store.insert(Material::default());
        assert!(store.remove(a).is_some());
        assert_eq!(store.len(), 1);
        let c = store.insert(Material::default());
        assert_eq!(a, c);
        assert_eq!(store.len(), 2);
    }
}
