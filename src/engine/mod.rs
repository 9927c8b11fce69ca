//! The live visualiser session.
//!
//! A [`Session`] owns everything for one canvas: the backend, the loading
//! pipeline, texture cache, materials, transitions, scene and camera. The
//! host calls [`Session::frame`] once per animation frame; asset
//! completions are polled and applied inside the frame, so nothing here
//! needs locks.

mod assets;
/// The session's interactive vocabulary.
pub mod command;
/// Events published to the host.
pub mod event;
/// Single-session guard and host seams.
pub mod lifecycle;
/// Picker contents per category.
pub mod picker;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc;

use glam::Vec3;
use web_time::Instant;

pub use self::command::VisualiserCommand;
pub use self::event::{EngineEvent, EventSender};
use self::lifecycle::{
    CanvasHost, CanvasTarget, FrameRequest, FrameScheduler, SessionConfig,
};
pub use self::lifecycle::LifecycleGuard;
pub use self::picker::{PickerCard, PickerContent};
use crate::animation::TransitionEngine;
use crate::camera::core::Camera;
use crate::camera::orbit::OrbitControls;
use crate::catalog::{Catalog, Category};
use crate::gpu::backend::{DrawItem, FrameLighting, FrameView, RenderBackend};
use crate::loading::{AssetKind, LoadingManager, StageLabel};
use crate::material::binding::MaterialBindings;
use crate::material::MaterialStore;
use crate::options::{Options, SurfaceStyle};
use crate::scene::Scene;
use crate::texture::TextureRegistry;
use crate::util::color::{from_hex_u32, parse_hex};
use crate::util::frame_timing::FrameTiming;

/// One visualiser instance bound to one canvas.
pub struct Session<B: RenderBackend> {
    options: Options,
    catalog: Catalog,
    backend: B,
    loader: LoadingManager,
    registry: TextureRegistry,
    store: MaterialStore,
    bindings: MaterialBindings,
    transitions: TransitionEngine,
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    stage: StageLabel,
    events: EventSender,
    receiver: mpsc::Receiver<EngineEvent>,
    scheduler: Box<dyn FrameScheduler>,
    frame_request: Option<FrameRequest>,
    host: Rc<dyn CanvasHost>,
    canvas: CanvasTarget,
    live: Rc<Cell<bool>>,
    viewport: (u32, u32),
    active_category: Category,
    model_loaded: bool,
    frame_timing: FrameTiming,
    destroyed: bool,
}

impl<B: RenderBackend> Session<B> {
    pub(crate) fn start(
        host: Rc<dyn CanvasHost>,
        canvas: CanvasTarget,
        live: Rc<Cell<bool>>,
        config: SessionConfig,
        backend: B,
    ) -> Self {
        let SessionConfig {
            catalog,
            options,
            source,
            scheduler,
        } = config;
        let (events, receiver) = EventSender::channel();
        let cupboard_color = parse_hex(&options.surfaces.cupboard_color)
            .unwrap_or(Vec3::ONE);
        let active_category = catalog
            .room
            .allowed_categories
            .first()
            .copied()
            .unwrap_or(Category::Floor);

        let mut camera = Camera::new(&options.camera, 1.0);
        if let Some(pose) = catalog.room.default_camera {
            camera.eye = Vec3::from(pose.position);
        }

        let mut session = Self {
            loader: LoadingManager::new(source, &options.loading),
            registry: TextureRegistry::new(&catalog),
            store: MaterialStore::new(),
            bindings: MaterialBindings::new(cupboard_color),
            transitions: TransitionEngine::new(&options.transitions),
            scene: Scene::default(),
            controls: OrbitControls::new(&options.camera),
            camera,
            stage: StageLabel::new(&options.loading),
            events,
            receiver,
            scheduler,
            frame_request: None,
            host,
            live,
            viewport: (1, 1),
            active_category,
            model_loaded: false,
            frame_timing: FrameTiming::new(),
            destroyed: false,
            options,
            catalog,
            backend,
            canvas: canvas.clone(),
        };
        session.resize(canvas.width, canvas.height, canvas.pixel_ratio);
        session.request_assets();
        session.frame_request = Some(session.scheduler.request_frame());
        session
    }

    fn request_assets(&mut self) {
        if let Some(path) = self.catalog.room.environment_path.clone() {
            let _ = self.loader.request(AssetKind::Environment, &path);
        }
        let model = self.catalog.room.model_path.clone();
        let _ = self.loader.request(AssetKind::Model, &model);
        for (slot, path) in &self.catalog.room.baked {
            self.registry.request_baked(*slot, path, &mut self.loader);
        }
        for category in Category::TEXTURED {
            if let Some(index) = self.registry.active_index(category) {
                let _ = self.registry.get(
                    category,
                    index,
                    &self.catalog,
                    &mut self.loader,
                );
            }
        }
    }

    /// Advance one animation frame at `now`: apply finished loads, step
    /// transitions and progress, update the camera, draw, and schedule
    /// the next frame.
    pub fn frame(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.frame_request = None;

        self.process_completions();
        self.transitions.tick(&mut self.store);
        self.publish_progress(now);
        self.controls.update(&mut self.camera);
        self.render();

        self.frame_timing.end_frame(now);
        self.frame_request = Some(self.scheduler.request_frame());
    }

    fn publish_progress(&mut self, now: Instant) {
        let update = self.loader.progress_mut().tick();
        if let Some(value) = update.value {
            self.events.send(EngineEvent::Progress { value });
        }
        let shown = self.loader.progress().displayed().floor() as u32;
        if let Some(label) = self.stage.update(shown, now) {
            self.events.send(EngineEvent::Stage {
                label: label.to_owned(),
            });
        }
        if update.loaded {
            log::info!("scene ready");
            self.events.send(EngineEvent::Loaded);
        }
    }

    fn render(&mut self) {
        let draws: Vec<DrawItem<'_>> = {
            let mut opaque = Vec::new();
            let mut transparent = Vec::new();
            for node in self.scene.nodes.iter().filter(|n| n.visible) {
                let (Some(mesh), Some(material_id)) = (node.gpu, node.material)
                else {
                    continue;
                };
                let Some(material) = self.store.get(material_id) else {
                    continue;
                };
                let item = DrawItem {
                    mesh,
                    world: node.world,
                    material_id,
                    material,
                };
                if material.transparent {
                    transparent.push(item);
                } else {
                    opaque.push(item);
                }
            }
            let eye = self.camera.eye;
            transparent.sort_by(|a, b| {
                a.material.render_order.cmp(&b.material.render_order).then_with(
                    || {
                        let da = a.world.w_axis.truncate().distance_squared(eye);
                        let db = b.world.w_axis.truncate().distance_squared(eye);
                        db.total_cmp(&da)
                    },
                )
            });
            opaque.extend(transparent);
            opaque
        };

        let l = &self.options.lighting;
        let lighting = FrameLighting {
            ambient: from_hex_u32(l.ambient_color) * l.ambient_intensity,
            key_color: from_hex_u32(l.key_color) * l.key_intensity,
            key_direction: Vec3::from(l.key_position).normalize_or(Vec3::Y),
            exposure: l.exposure,
            tone_mapping: true,
            clear_color: from_hex_u32(l.clear_color),
        };
        let frame = FrameView {
            view: self.camera.build_view(),
            proj: self.camera.build_projection(),
            eye: self.camera.eye,
            lighting,
            environment: self.scene.environment,
            draws: &draws,
        };
        self.backend.render(&frame);
    }

    /// Run a command.
    pub fn execute(&mut self, command: VisualiserCommand) {
        if self.destroyed {
            log::debug!("command after destroy ignored: {command:?}");
            return;
        }
        match command {
            VisualiserCommand::CategoryChange { category } => {
                self.change_category(category);
            }
            VisualiserCommand::SelectVariant { category, index } => {
                self.select_variant(category, index);
            }
            VisualiserCommand::SetCupboardColor { hex } => {
                match parse_hex(&hex) {
                    Some(color) => {
                        self.bindings.set_cupboard_color(color, &mut self.store);
                    }
                    None => log::warn!("invalid cupboard color `{hex}`"),
                }
            }
            VisualiserCommand::RotateCamera { delta } => {
                self.controls.rotate(
                    delta.x,
                    delta.y,
                    self.canvas.height.max(1) as f32,
                );
            }
            VisualiserCommand::Zoom { factor } => self.controls.zoom(factor),
            VisualiserCommand::Resize {
                width,
                height,
                pixel_ratio,
            } => self.resize(width, height, pixel_ratio),
        }
    }

    fn change_category(&mut self, category: Category) {
        if !self.catalog.is_allowed(category) {
            log::warn!("{category} is not offered by this room");
            return;
        }
        if self.active_category != category {
            self.active_category = category;
            self.events.send(EngineEvent::CategoryChanged { category });
        }
    }

    fn select_variant(&mut self, category: Category, index: usize) {
        if !self.catalog.is_allowed(category) {
            log::warn!("{category} is not offered by this room");
            return;
        }
        let Some(slot) = self.registry.select(
            category,
            index,
            &self.catalog,
            &mut self.loader,
        ) else {
            log::warn!("{category} has no variant {index}");
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
        self.events
            .send(EngineEvent::SelectionChanged { category, index });
    }

    fn variant_style(&self, category: Category, index: usize) -> SurfaceStyle {
        let base = self.options.surface(category).copied().unwrap_or_default();
        self.catalog
            .variant(category, index)
            .map_or(base, |v| v.style(&base))
    }

    /// Resize the viewport. `width`/`height` are CSS pixels; the backend
    /// gets physical pixels at the pixel ratio, capped by the options.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        if width == 0 || height == 0 {
            return;
        }
        let ratio = pixel_ratio.clamp(0.1, self.options.camera.max_pixel_ratio);
        let physical = (
            ((width as f32) * ratio).round().max(1.0) as u32,
            ((height as f32) * ratio).round().max(1.0) as u32,
        );
        self.canvas.width = width;
        self.canvas.height = height;
        self.canvas.pixel_ratio = ratio;
        self.camera.set_viewport(width, height);
        self.viewport = physical;
        self.backend.resize(physical.0, physical.1);
    }

    /// Picker contents for `category`.
    #[must_use]
    pub fn picker(&self, category: Category) -> PickerContent {
        PickerContent::build(
            category,
            &self.catalog,
            self.registry.active_index(category),
            self.bindings.cupboard_color(),
        )
    }

    /// Picker contents for the current category.
    #[must_use]
    pub fn current_picker(&self) -> PickerContent {
        self.picker(self.active_category)
    }

    /// Category the picker currently shows.
    #[must_use]
    pub fn active_category(&self) -> Category {
        self.active_category
    }

    /// Published events.
    #[must_use]
    pub fn events(&self) -> &mpsc::Receiver<EngineEvent> {
        &self.receiver
    }

    /// Drain published events.
    pub fn drain_events(&self) -> Vec<EngineEvent> {
        self.receiver.try_iter().collect()
    }

    /// Whether loading has reached 100.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.loader.progress().is_finished()
    }

    /// Displayed loading percentage.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.loader.progress().displayed()
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Orbit controls.
    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// The loaded scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Material store.
    #[must_use]
    pub fn materials(&self) -> &MaterialStore {
        &self.store
    }

    /// Surface bindings.
    #[must_use]
    pub fn bindings(&self) -> &MaterialBindings {
        &self.bindings
    }

    /// Texture cache.
    #[must_use]
    pub fn textures(&self) -> &TextureRegistry {
        &self.registry
    }

    /// The catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Physical viewport size.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frame_timing.frames()
    }

    /// Whether the room model has been bound.
    #[must_use]
    pub fn is_model_loaded(&self) -> bool {
        self.model_loaded
    }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Cancel the pending frame, release GPU resources, drop the scene and
    /// free the canvas for a later init. Idempotent; also runs on drop.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(request) = self.frame_request.take() {
            self.scheduler.cancel_frame(request);
        }
        self.loader.cancel_all();
        self.transitions.clear();
        self.backend.dispose();
        self.bindings.clear();
        self.store.clear();
        self.registry.clear();
        self.scene.clear();
        self.model_loaded = false;
        self.host.set_bound(&self.canvas.id, false);
        self.live.set(false);
        self.destroyed = true;
        log::info!("visualiser session on `{}` destroyed", self.canvas.id);
    }
}

impl<B: RenderBackend> Drop for Session<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
