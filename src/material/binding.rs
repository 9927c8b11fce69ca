//! Assigns materials to classified meshes and keeps one binding per
//! customisable category.
//!
//! Every mesh of a category shares the category's single material, so a
//! texture swap touches exactly one [`MaterialId`]. Bindings remember which
//! variant they are waiting for: a texture that arrives for a selection the
//! user has since moved away from is cached but never shown.

use std::collections::BTreeMap;

use glam::Vec3;

use super::classify::{classify, default_material, MeshClass};
use super::{Material, MaterialId, MaterialStore};
use crate::animation::{FadeStrategy, TransitionEngine};
use crate::catalog::{BakedSlot, Category};
use crate::gpu::backend::TextureId;
use crate::options::SurfaceStyle;
use crate::scene::Scene;
use crate::texture::TextureSlot;

/// What a category's material currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingState {
    /// Waiting for the texture of variant `index`.
    Pending {
        /// Selected variant.
        index: usize,
    },
    /// Showing variant `index`.
    Variant {
        /// Selected variant.
        index: usize,
        /// Its texture.
        texture: TextureId,
    },
    /// Variant `index` failed to load; the neutral material is shown.
    Fallback {
        /// Selected variant.
        index: usize,
    },
    /// Tinted baked material (cupboards).
    Color(Vec3),
}

/// Runtime association between a category's meshes and its selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBinding {
    /// Shared material of every mesh in the category.
    pub material: MaterialId,
    /// Indices into [`Scene::nodes`].
    pub nodes: Vec<usize>,
    /// Current state.
    pub state: BindingState,
    /// Whether every mesh carries texture coordinates.
    pub has_uvs: bool,
}

/// Material assignments for one loaded scene.
#[derive(Debug)]
pub struct MaterialBindings {
    surfaces: BTreeMap<Category, SurfaceBinding>,
    baked: Vec<(BakedSlot, MaterialId)>,
    cupboard_color: Vec3,
}

impl MaterialBindings {
    /// No bindings yet.
    #[must_use]
    pub fn new(cupboard_color: Vec3) -> Self {
        Self {
            surfaces: BTreeMap::new(),
            baked: Vec::new(),
            cupboard_color,
        }
    }

    /// Classify every node of `scene` and assign its material.
    ///
    /// `baked` resolves already-loaded baked textures; `authored` maps
    /// embedded image indices to uploaded textures. Returns the
    /// customisable categories present in the scene.
    pub fn bind_scene(
        &mut self,
        scene: &mut Scene,
        store: &mut MaterialStore,
        baked: impl Fn(BakedSlot) -> Option<TextureId>,
        authored: &[Option<TextureId>],
        styles: impl Fn(Category) -> SurfaceStyle,
    ) -> Vec<Category> {
        let mut fixed: BTreeMap<BakedSlot, MaterialId> = BTreeMap::new();
        let mut fallback: Option<MaterialId> = None;

        for (i, node) in scene.nodes.iter_mut().enumerate() {
            let class = classify(&node.name);
            log::debug!("mesh `{}` -> {class:?}", node.name);
            let id = match class {
                MeshClass::Glass(kind) => store.insert(kind.material()),
                MeshClass::Fixed(kind) => match kind.baked_slot() {
                    Some(slot) => *fixed.entry(slot).or_insert_with(|| {
                        let mut m = kind.material(&node.authored);
                        m.map = baked(slot);
                        let id = store.insert(m);
                        self.baked.push((slot, id));
                        id
                    }),
                    None => {
                        let mut m = kind.material(&node.authored);
                        m.map = node
                            .authored
                            .texture
                            .and_then(|t| authored.get(t).copied().flatten());
                        store.insert(m)
                    }
                },
                MeshClass::Surface(category) => {
                    let has_uvs = node.data.has_uvs();
                    let binding =
                        self.surfaces.entry(category).or_insert_with(|| {
                            let (material, state) =
                                if category == Category::Cupboards {
                                    let mut m =
                                        Material::unlit(baked(BakedSlot::Cupboards));
                                    m.color = self.cupboard_color;
                                    let id = store.insert(m);
                                    self.baked.push((BakedSlot::Cupboards, id));
                                    (id, BindingState::Color(self.cupboard_color))
                                } else {
                                    let m = Material::surface(&styles(category), None);
                                    (store.insert(m), BindingState::Pending { index: 0 })
                                };
                            SurfaceBinding {
                                material,
                                nodes: Vec::new(),
                                state,
                                has_uvs: true,
                            }
                        });
                    binding.nodes.push(i);
                    binding.has_uvs &= has_uvs;
                    binding.material
                }
                MeshClass::Default => *fallback
                    .get_or_insert_with(|| store.insert(default_material())),
            };
            node.material = Some(id);
        }

        for (category, binding) in &self.surfaces {
            if !binding.has_uvs && *category != Category::Cupboards {
                log::warn!("{category} mesh has no UVs; texture will render flat");
            }
        }
        self.surfaces.keys().copied().collect()
    }

    /// Show variant `index` of `category` given its registry slot.
    pub fn show_variant(
        &mut self,
        category: Category,
        index: usize,
        slot: TextureSlot,
        style: &SurfaceStyle,
        transitions: &mut TransitionEngine,
        store: &mut MaterialStore,
    ) {
        let Some(binding) = self.surfaces.get_mut(&category) else {
            return;
        };
        match slot {
            TextureSlot::Ready(texture) => {
                let strategy = if binding.has_uvs {
                    style.fade
                } else {
                    FadeStrategy::Instant
                };
                transitions.reveal(
                    category,
                    binding.material,
                    texture,
                    style,
                    strategy,
                    store,
                );
                binding.state = BindingState::Variant { index, texture };
            }
            TextureSlot::Failed => {
                let _ = transitions.cancel(category);
                store.replace(binding.material, default_material());
                binding.state = BindingState::Fallback { index };
                log::warn!("{category} variant {index} unavailable, using fallback material");
            }
            TextureSlot::Loading(_) | TextureSlot::Unrequested => {
                binding.state = BindingState::Pending { index };
            }
        }
    }

    /// A variant texture resolved. Applies it only if `category` is still
    /// waiting for that variant; returns whether it was applied.
    pub fn variant_loaded(
        &mut self,
        category: Category,
        index: usize,
        texture: Option<TextureId>,
        style: &SurfaceStyle,
        transitions: &mut TransitionEngine,
        store: &mut MaterialStore,
    ) -> bool {
        let waiting = self.surfaces.get(&category).is_some_and(|b| {
            matches!(b.state, BindingState::Pending { index: i } if i == index)
        });
        if !waiting {
            return false;
        }
        let slot = texture.map_or(TextureSlot::Failed, TextureSlot::Ready);
        self.show_variant(category, index, slot, style, transitions, store);
        true
    }

    /// A baked texture resolved; attach it to every material using it.
    pub fn baked_loaded(
        &mut self,
        slot: BakedSlot,
        texture: Option<TextureId>,
        store: &mut MaterialStore,
    ) {
        let Some(texture) = texture else {
            log::warn!("baked {slot:?} texture unavailable, keeping plain material");
            return;
        };
        for &(s, id) in &self.baked {
            if s == slot {
                if let Some(m) = store.get_mut(id) {
                    m.map = Some(texture);
                }
            }
        }
    }

    /// Tint the cupboard material.
    pub fn set_cupboard_color(&mut self, color: Vec3, store: &mut MaterialStore) {
        self.cupboard_color = color;
        if let Some(binding) = self.surfaces.get_mut(&Category::Cupboards) {
            if let Some(m) = store.get_mut(binding.material) {
                m.color = color;
            }
            binding.state = BindingState::Color(color);
        }
    }

    /// Current cupboard tint.
    #[must_use]
    pub fn cupboard_color(&self) -> Vec3 {
        self.cupboard_color
    }

    /// Binding for a category, once the scene is bound.
    #[must_use]
    pub fn binding(&self, category: Category) -> Option<&SurfaceBinding> {
        self.surfaces.get(&category)
    }

    /// Whether a scene has been bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self.surfaces.is_empty() || !self.baked.is_empty()
    }

    /// Forget every binding.
    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.baked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::scene::{AuthoredMaterial, MeshData, MeshNode};
    use glam::Mat4;

    fn node(name: &str, uvs: bool) -> MeshNode {
        MeshNode {
            name: name.to_owned(),
            world: Mat4::IDENTITY,
            data: MeshData {
                positions: vec![[0.0; 3]; 3],
                normals: vec![[0.0, 1.0, 0.0]; 3],
                uvs: uvs.then(|| vec![[0.0; 2]; 3]),
                indices: vec![0, 1, 2],
            },
            authored: AuthoredMaterial::default(),
            material: None,
            gpu: None,
            visible: true,
        }
    }

    fn bound(
        names: &[(&str, bool)],
    ) -> (MaterialBindings, MaterialStore, Scene, TransitionEngine, Options) {
        let opts = Options::default();
        let mut scene = Scene::default();
        scene.nodes = names.iter().map(|(n, uv)| node(n, *uv)).collect();
        let mut store = MaterialStore::new();
        let mut bindings = MaterialBindings::new(Vec3::ONE);
        let styles = opts.clone();
        let _ = bindings.bind_scene(
            &mut scene,
            &mut store,
            |_| None,
            &[],
            move |c| styles.surface(c).copied().unwrap_or_default(),
        );
        let transitions = TransitionEngine::new(&opts.transitions);
        (bindings, store, scene, transitions, opts)
    }

    #[test]
    fn category_meshes_share_one_material() {
        let (bindings, _store, scene, _t, _o) = bound(&[
            ("Floor_A", true),
            ("Floor_B", true),
            ("Ceiling", true),
            ("Plant", true),
        ]);
        let floor = bindings.binding(Category::Floor).unwrap();
        assert_eq!(floor.nodes, vec![0, 1]);
        assert_eq!(scene.nodes[0].material, scene.nodes[1].material);
        assert_eq!(scene.nodes[2].material, scene.nodes[3].material);
        assert_ne!(scene.nodes[0].material, scene.nodes[2].material);
    }

    #[test]
    fn stale_texture_is_not_applied() {
        let (mut bindings, mut store, _scene, mut t, opts) =
            bound(&[("Floor", true)]);
        let style = opts.surfaces.floor;
        for index in [4, 7] {
            bindings.show_variant(
                Category::Floor,
                index,
                TextureSlot::Unrequested,
                &style,
                &mut t,
                &mut store,
            );
        }
        assert!(!bindings.variant_loaded(
            Category::Floor,
            4,
            Some(TextureId::from_raw(4)),
            &style,
            &mut t,
            &mut store,
        ));
        assert!(bindings.variant_loaded(
            Category::Floor,
            7,
            Some(TextureId::from_raw(7)),
            &style,
            &mut t,
            &mut store,
        ));
        let b = bindings.binding(Category::Floor).unwrap();
        assert_eq!(
            b.state,
            BindingState::Variant {
                index: 7,
                texture: TextureId::from_raw(7)
            }
        );
        assert_eq!(store.get(b.material).unwrap().map, Some(TextureId::from_raw(7)));
    }

    #[test]
    fn failed_surface_falls_back_to_default() {
        let (mut bindings, mut store, _scene, mut t, opts) =
            bound(&[("Worktop", true)]);
        let style = opts.surfaces.worktop;
        bindings.show_variant(
            Category::Worktop,
            0,
            TextureSlot::Unrequested,
            &style,
            &mut t,
            &mut store,
        );
        assert!(bindings.variant_loaded(Category::Worktop, 0, None, &style, &mut t, &mut store));
        let b = bindings.binding(Category::Worktop).unwrap();
        assert_eq!(b.state, BindingState::Fallback { index: 0 });
        assert!((store.get(b.material).unwrap().roughness - 0.6).abs() < 1e-6);
        assert!(store.get(b.material).unwrap().map.is_none());
    }

    #[test]
    fn missing_uvs_swap_without_fade() {
        let (mut bindings, mut store, _scene, mut t, opts) =
            bound(&[("Wall_Feature", false)]);
        bindings.show_variant(
            Category::Walls,
            2,
            TextureSlot::Ready(TextureId::from_raw(2)),
            &opts.surfaces.walls,
            &mut t,
            &mut store,
        );
        assert!(!t.is_active());
        let b = bindings.binding(Category::Walls).unwrap();
        let m = store.get(b.material).unwrap();
        assert_eq!(m.map, Some(TextureId::from_raw(2)));
        assert_eq!(m.opacity, 1.0);
    }

    #[test]
    fn cupboard_tint_and_baked_map() {
        let (mut bindings, mut store, _scene, _t, _opts) =
            bound(&[("Cupboard_Base", true), ("Sink", true)]);
        bindings.set_cupboard_color(Vec3::new(1.0, 0.0, 0.0), &mut store);
        bindings.baked_loaded(BakedSlot::Cupboards, Some(TextureId::from_raw(11)), &mut store);
        let b = bindings.binding(Category::Cupboards).unwrap();
        let m = store.get(b.material).unwrap();
        assert_eq!(m.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.map, Some(TextureId::from_raw(11)));
        assert_eq!(b.state, BindingState::Color(Vec3::new(1.0, 0.0, 0.0)));
    }
}
