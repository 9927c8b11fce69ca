//! Texture swap transitions.
//!
//! Two reveal styles exist. An emissive flash paints the surface pure white
//! through its emissive channel, swaps the texture underneath and then
//! drains the emissive intensity so the lit texture emerges. An opacity
//! fade installs a fresh transparent material and raises its opacity to 1,
//! then switches transparency off again.

use glam::{Vec2, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Rate, Tween, TweenRunner};
use crate::catalog::Category;
use crate::gpu::backend::TextureId;
use crate::material::{Material, MaterialId, MaterialStore};
use crate::options::{SurfaceStyle, TransitionOptions};

/// How a newly selected texture is revealed on its surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FadeStrategy {
    /// White emissive flash draining to the lit texture.
    EmissiveFlash,
    /// Transparent material fading in to full opacity.
    OpacityFade,
    /// Swap immediately.
    #[default]
    Instant,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    material: MaterialId,
    strategy: FadeStrategy,
    settle_env: f32,
}

/// Runs at most one reveal per category.
pub struct TransitionEngine {
    runner: TweenRunner<Category, Fade>,
    options: TransitionOptions,
}

impl TransitionEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new(options: &TransitionOptions) -> Self {
        Self {
            runner: TweenRunner::new(),
            options: options.clone(),
        }
    }

    /// Replace the step sizes used by future reveals.
    pub fn set_options(&mut self, options: &TransitionOptions) {
        self.options = options.clone();
    }

    /// Show `texture` on `material` using `strategy`. A reveal already
    /// running for `category` is abandoned in favour of this one.
    pub fn reveal(
        &mut self,
        category: Category,
        material: MaterialId,
        texture: TextureId,
        style: &SurfaceStyle,
        strategy: FadeStrategy,
        store: &mut MaterialStore,
    ) {
        if self.runner.cancel(category).is_some() {
            log::debug!("{category:?} transition superseded");
        }
        let fade = Fade {
            material,
            strategy,
            settle_env: style.env_map_intensity,
        };
        match strategy {
            FadeStrategy::EmissiveFlash => {
                let Some(m) = store.get_mut(material) else {
                    return;
                };
                m.map = Some(texture);
                m.color = Vec3::ONE;
                m.roughness = style.roughness;
                m.metalness = style.metalness;
                m.uv_scale = Vec2::from(style.uv_scale);
                m.emissive = Vec3::ONE;
                m.emissive_intensity = 1.0;
                m.env_map_intensity = 0.0;
                let tween =
                    Tween::new(1.0, 0.0, Rate::Linear(self.options.flash_step));
                let _ = self.runner.animate(category, tween, fade);
            }
            FadeStrategy::OpacityFade => {
                let mut fresh = Material::surface(style, Some(texture));
                fresh.transparent = true;
                fresh.opacity = 0.0;
                store.replace(material, fresh);
                let tween =
                    Tween::new(0.0, 1.0, Rate::Linear(self.options.fade_step));
                let _ = self.runner.animate(category, tween, fade);
            }
            FadeStrategy::Instant => {
                store.replace(material, Material::surface(style, Some(texture)));
            }
        }
    }

    /// Advance every running reveal by one frame.
    pub fn tick(&mut self, store: &mut MaterialStore) {
        let easing = self.options.easing;
        self.runner.tick(|frame| {
            let fade = frame.payload;
            let Some(m) = store.get_mut(fade.material) else {
                return;
            };
            match fade.strategy {
                FadeStrategy::EmissiveFlash => {
                    if frame.done {
                        m.emissive = Vec3::ZERO;
                        m.emissive_intensity = 0.0;
                        m.env_map_intensity = fade.settle_env;
                    } else {
                        m.emissive_intensity = easing.evaluate(frame.value);
                    }
                }
                FadeStrategy::OpacityFade => {
                    if frame.done {
                        m.opacity = 1.0;
                        m.transparent = false;
                    } else {
                        m.opacity = easing.evaluate(frame.value);
                    }
                }
                FadeStrategy::Instant => {}
            }
        });
    }

    /// Abandon the reveal for `category`, leaving its material as it is.
    /// Returns whether one was running.
    pub fn cancel(&mut self, category: Category) -> bool {
        self.runner.cancel(category).is_some()
    }

    /// Whether `category` has a reveal in flight.
    #[must_use]
    pub fn is_animating(&self, category: Category) -> bool {
        self.runner.is_animating(category)
    }

    /// Whether any reveal is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.runner.is_active()
    }

    /// Abandon every reveal, leaving materials as they are.
    pub fn clear(&mut self) {
        self.runner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn setup() -> (TransitionEngine, MaterialStore, MaterialId, Options) {
        let opts = Options::default();
        let engine = TransitionEngine::new(&opts.transitions);
        let mut store = MaterialStore::new();
        let id = store.insert(Material::default());
        (engine, store, id, opts)
    }

    #[test]
    fn emissive_flash_starts_white_and_restores_env() {
        let (mut engine, mut store, id, opts) = setup();
        let style = opts.surfaces.worktop;
        engine.reveal(
            Category::Worktop,
            id,
            TextureId::from_raw(7),
            &style,
            FadeStrategy::EmissiveFlash,
            &mut store,
        );
        let m = store.get(id).unwrap();
        assert_eq!(m.map, Some(TextureId::from_raw(7)));
        assert_eq!(m.emissive, Vec3::ONE);
        assert_eq!(m.emissive_intensity, 1.0);
        assert_eq!(m.env_map_intensity, 0.0);

        let mut last = 1.0;
        let mut frames = 0;
        while engine.is_animating(Category::Worktop) {
            engine.tick(&mut store);
            let now = store.get(id).unwrap().emissive_intensity;
            assert!(now <= last);
            last = now;
            frames += 1;
        }
        assert_eq!(frames, 13);
        let m = store.get(id).unwrap();
        assert_eq!(m.emissive, Vec3::ZERO);
        assert_eq!(m.emissive_intensity, 0.0);
        assert_eq!(m.env_map_intensity, 0.2);
    }

    #[test]
    fn opacity_fade_ends_opaque() {
        let (mut engine, mut store, id, opts) = setup();
        engine.reveal(
            Category::Walls,
            id,
            TextureId::from_raw(1),
            &opts.surfaces.walls,
            FadeStrategy::OpacityFade,
            &mut store,
        );
        assert!(store.get(id).unwrap().transparent);
        assert_eq!(store.get(id).unwrap().opacity, 0.0);
        for _ in 0..100 {
            engine.tick(&mut store);
            assert!(store.get(id).unwrap().opacity <= 1.0);
        }
        let m = store.get(id).unwrap();
        assert!(!m.transparent);
        assert_eq!(m.opacity, 1.0);
        assert_eq!(m.roughness, 0.5);
    }

    #[test]
    fn later_reveal_wins() {
        let (mut engine, mut store, id, opts) = setup();
        let style = opts.surfaces.floor;
        for raw in [1, 2] {
            engine.reveal(
                Category::Floor,
                id,
                TextureId::from_raw(raw),
                &style,
                FadeStrategy::EmissiveFlash,
                &mut store,
            );
            engine.tick(&mut store);
        }
        while engine.is_active() {
            engine.tick(&mut store);
        }
        let m = store.get(id).unwrap();
        assert_eq!(m.map, Some(TextureId::from_raw(2)));
        assert_eq!(m.emissive_intensity, 0.0);
        assert_eq!(m.env_map_intensity, 0.05);
    }

    #[test]
    fn instant_swap_needs_no_frames() {
        let (mut engine, mut store, id, opts) = setup();
        engine.reveal(
            Category::Walls,
            id,
            TextureId::from_raw(3),
            &opts.surfaces.walls,
            FadeStrategy::Instant,
            &mut store,
        );
        assert!(!engine.is_active());
        assert_eq!(store.get(id).unwrap().map, Some(TextureId::from_raw(3)));
        assert_eq!(store.get(id).unwrap().opacity, 1.0);
    }
}
