//! Applying finished loads to the session.

use glam::Vec3;

use super::Session;
use crate::catalog::Category;
use crate::error::LoadError;
use crate::gpu::backend::{EnvironmentDesc, RenderBackend, TextureDesc, TextureId};
use crate::loading::{
    decode_environment, decode_texture, AssetKind, Completion, DecodedImage,
};
use crate::scene::load_glb;
use crate::texture::TextureSlot;

impl<B: RenderBackend> Session<B> {
    /// Apply every completion the source has delivered, then release it to
    /// the progress tracker.
    pub(super) fn process_completions(&mut self) {
        for completion in self.loader.poll() {
            let Completion {
                id,
                kind,
                path,
                result,
            } = completion;
            match kind {
                AssetKind::Model => self.model_ready(&path, result),
                AssetKind::Environment => self.environment_ready(&path, result),
                AssetKind::Baked(slot) => {
                    let texture = self.upload_texture(&path, result);
                    self.registry.resolve_baked(slot, texture);
                    self.bindings.baked_loaded(slot, texture, &mut self.store);
                }
                AssetKind::Variant { category, index } => {
                    let texture = self.upload_texture(&path, result);
                    self.registry.resolve(category, index, texture);
                    let style = self.variant_style(category, index);
                    let applied = self.bindings.variant_loaded(
                        category,
                        index,
                        texture,
                        &style,
                        &mut self.transitions,
                        &mut self.store,
                    );
                    if !applied {
                        log::debug!("{category} variant {index} cached for later");
                    }
                }
            }
            self.loader.finish(id);
        }
    }

    fn upload_texture(
        &mut self,
        path: &str,
        result: Result<Vec<u8>, LoadError>,
    ) -> Option<TextureId> {
        // fetch errors were logged when polled
        let bytes = result.ok()?;
        match decode_texture(path, &bytes) {
            Ok(image) => Some(self.upload_image(path, &image)),
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    fn upload_image(&mut self, label: &str, image: &DecodedImage) -> TextureId {
        self.backend.create_texture(&TextureDesc {
            label,
            width: image.width,
            height: image.height,
            pixels: &image.pixels,
            srgb: true,
        })
    }

    fn environment_ready(
        &mut self,
        path: &str,
        result: Result<Vec<u8>, LoadError>,
    ) {
        let Ok(bytes) = result else {
            log::warn!("no environment map; using the clear color");
            return;
        };
        match decode_environment(path, &bytes) {
            Ok(env) => {
                let id = self.backend.create_environment(&EnvironmentDesc {
                    label: path,
                    width: env.width,
                    height: env.height,
                    pixels: &env.pixels,
                });
                self.scene.environment = Some(id);
            }
            Err(e) => log::error!("{e}"),
        }
    }

    fn model_ready(&mut self, path: &str, result: Result<Vec<u8>, LoadError>) {
        let Ok(bytes) = result else {
            log::warn!("room model unavailable; continuing without geometry");
            return;
        };
        let mut scene = match load_glb(&bytes) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("failed to load `{path}`: {e}");
                return;
            }
        };
        let bounds = scene.normalize();

        let images = std::mem::take(&mut scene.images);
        let authored: Vec<Option<TextureId>> = images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                Some(self.upload_image(&format!("{path}#image{i}"), image))
            })
            .collect();
        scene.images = images;
        for node in &mut scene.nodes {
            node.gpu = Some(self.backend.upload_mesh(&node.data));
        }
        scene.environment = self.scene.environment;

        let present = self.bindings.bind_scene(
            &mut scene,
            &mut self.store,
            |slot| self.registry.baked(slot),
            &authored,
            |category| {
                self.options.surface(category).copied().unwrap_or_default()
            },
        );
        self.scene = scene;

        for category in present {
            if category != Category::Cupboards {
                self.show_active(category);
            }
        }

        let size = bounds.size();
        let camera = &self.options.camera;
        let target = self
            .catalog
            .room
            .default_camera
            .and_then(|pose| pose.target)
            .map_or_else(
                || {
                    Vec3::new(
                        0.0,
                        size.y * camera.target_height_ratio,
                        camera.target_depth,
                    )
                },
                Vec3::from,
            );
        self.controls.set_target(target);
        self.controls.update(&mut self.camera);
        self.model_loaded = true;
        log::info!(
            "room `{}` bound: {} meshes, {} materials",
            self.catalog.room.slug,
            self.scene.nodes.len(),
            self.store.len()
        );
    }

    /// Bind the registry's current selection for `category`, fetching it
    /// only if it was never requested.
    fn show_active(&mut self, category: Category) {
        let Some(index) = self.registry.active_index(category) else {
            return;
        };
        let slot = match self.registry.peek(category, index) {
            Some(TextureSlot::Unrequested) => self.registry.get(
                category,
                index,
                &self.catalog,
                &mut self.loader,
            ),
            other => other,
        };
        let Some(slot) = slot else {
            return;
        };
        let style = self.variant_style(category, index);
        self.bindings.show_variant(
            category,
            index,
            slot,
            &style,
            &mut self.transitions,
            &mut self.store,
        );
    }
}
