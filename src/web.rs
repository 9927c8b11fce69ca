//! Browser bindings (`web` feature).
//!
//! Canvases are looked up by element id and marked with
//! [`BOUND_ATTRIBUTE`] while a session owns them. Frames are driven by
//! `requestAnimationFrame`, assets come from `fetch`, and session events
//! are re-dispatched on `window` as `CustomEvent`s.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::{wasm_bindgen, Closure, JsValue};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, HtmlCanvasElement, Response};
use web_time::Instant;

use crate::catalog::{kitchen, Catalog, Category, RoomManifest};
use crate::engine::lifecycle::{
    CanvasHost, CanvasTarget, FrameRequest, FrameScheduler, SessionConfig,
};
use crate::engine::{EngineEvent, LifecycleGuard, Session, VisualiserCommand};
use crate::error::LoadError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::renderer::WgpuBackend;
use crate::loading::{AssetSource, RequestId};
use crate::options::Options;

/// Attribute set on a canvas while a session is bound to it.
pub const BOUND_ATTRIBUTE: &str = "data-visualiser-bound";
/// Fired with `detail` = displayed percentage.
pub const PROGRESS_EVENT: &str = "visualiser-progress";
/// Fired once when progress reaches 100.
pub const LOADED_EVENT: &str = "visualiser-loaded";
/// Fired with `detail` = stage label.
pub const STAGE_EVENT: &str = "visualiser-stage";

thread_local! {
    static GUARD: LifecycleGuard = LifecycleGuard::new();
}

type SharedSession = Rc<RefCell<Option<Session<WgpuBackend>>>>;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn canvas_element(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

// ── Page ────────────────────────────────────────────────────────────────

/// The current document as a canvas host.
struct DomHost;

impl CanvasHost for DomHost {
    fn canvas(&self, id: &str) -> Option<CanvasTarget> {
        let canvas = canvas_element(id)?;
        let pixel_ratio =
            web_sys::window().map_or(1.0, |w| web_sys::Window::device_pixel_ratio(&w)) as f32;
        Some(CanvasTarget {
            id: id.to_owned(),
            width: canvas.client_width().max(1) as u32,
            height: canvas.client_height().max(1) as u32,
            pixel_ratio,
        })
    }

    fn is_bound(&self, id: &str) -> bool {
        canvas_element(id).is_some_and(|c| c.has_attribute(BOUND_ATTRIBUTE))
    }

    fn set_bound(&self, id: &str, bound: bool) {
        let Some(canvas) = canvas_element(id) else {
            return;
        };
        let result = if bound {
            canvas.set_attribute(BOUND_ATTRIBUTE, "true")
        } else {
            canvas.remove_attribute(BOUND_ATTRIBUTE)
        };
        if let Err(e) = result {
            log::warn!("cannot update bound marker on `{id}`: {e:?}");
        }
    }
}

// ── Scheduler ───────────────────────────────────────────────────────────

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` scheduler. The callback is installed once the
/// session exists.
struct RafScheduler {
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let handle = web_sys::window().and_then(|w| {
            let callback = self.callback.borrow();
            let f = callback.as_ref()?;
            w.request_animation_frame(f.as_ref().unchecked_ref()).ok()
        });
        FrameRequest(handle.map_or(0, |h| h as u64))
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if request.0 == 0 {
            return;
        }
        if let Some(w) = web_sys::window() {
            let _ = w.cancel_animation_frame(request.0 as i32);
        }
    }
}

// ── Fetch ───────────────────────────────────────────────────────────────

type Finished = Vec<(RequestId, Result<Vec<u8>, LoadError>)>;

/// Asset source backed by `fetch`. Paths are resolved against the page.
#[derive(Default)]
struct FetchSource {
    done: Rc<RefCell<Finished>>,
    generation: Rc<RefCell<u64>>,
}

async fn fetch_bytes(path: &str) -> Result<Vec<u8>, String> {
    let window = web_sys::window().ok_or("no window")?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| format!("{e:?}"))?;
    let response: Response =
        response.dyn_into().map_err(|e| format!("{e:?}"))?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    let buffer = response.array_buffer().map_err(|e| format!("{e:?}"))?;
    let buffer = JsFuture::from(buffer).await.map_err(|e| format!("{e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

impl AssetSource for FetchSource {
    fn start(&mut self, id: RequestId, path: &str) {
        let done = Rc::clone(&self.done);
        let generation = Rc::clone(&self.generation);
        let started = *generation.borrow();
        let path = path.to_owned();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_bytes(&path)
                .await
                .map_err(|reason| LoadError::Fetch { path, reason });
            if *generation.borrow() == started {
                done.borrow_mut().push((id, result));
            }
        });
    }

    fn poll(&mut self) -> Finished {
        std::mem::take(&mut *self.done.borrow_mut())
    }

    fn cancel_all(&mut self) {
        *self.generation.borrow_mut() += 1;
        self.done.borrow_mut().clear();
    }
}

// ── Events ──────────────────────────────────────────────────────────────

fn dispatch(name: &str, detail: &JsValue) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let init = CustomEventInit::new();
    init.set_detail(detail);
    match CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(e) => log::error!("cannot create `{name}` event: {e:?}"),
    }
}

fn publish(events: Vec<EngineEvent>) {
    for event in events {
        match event {
            EngineEvent::Progress { value } => {
                dispatch(PROGRESS_EVENT, &JsValue::from(value));
            }
            EngineEvent::Stage { label } => {
                dispatch(STAGE_EVENT, &JsValue::from_str(&label));
            }
            EngineEvent::Loaded => dispatch(LOADED_EVENT, &JsValue::NULL),
            EngineEvent::CategoryChanged { .. }
            | EngineEvent::SelectionChanged { .. } => {}
        }
    }
}

fn frame_callback(
    session: Weak<RefCell<Option<Session<WgpuBackend>>>>,
) -> Closure<dyn FnMut(f64)> {
    Closure::new(move |_timestamp: f64| {
        let Some(session) = session.upgrade() else {
            return;
        };
        let mut slot = session.borrow_mut();
        if let Some(session) = slot.as_mut() {
            session.frame(Instant::now());
            publish(session.drain_events());
        }
    })
}

// ── Exports ─────────────────────────────────────────────────────────────

impl WebVisualiser {
    fn execute(&self, command: VisualiserCommand) {
        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.execute(command);
            publish(session.drain_events());
        }
    }
}

/// Handle to the page's visualiser.
#[wasm_bindgen]
pub struct WebVisualiser {
    session: SharedSession,
    callback: FrameCallback,
}

#[wasm_bindgen]
impl WebVisualiser {
    /// Bind canvas `canvas_id` and start loading. `manifest` is a room
    /// manifest in JSON; the built-in kitchen is used when absent.
    ///
    /// Resolves to `undefined` when a visualiser is already running.
    pub async fn start(
        canvas_id: String,
        manifest: Option<String>,
        options_toml: Option<String>,
    ) -> Result<Option<WebVisualiser>, JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(_reservation) = GUARD.with(LifecycleGuard::reserve) else {
            log::warn!("visualiser already initialised; ignoring start");
            return Ok(None);
        };
        let host: Rc<dyn CanvasHost> = Rc::new(DomHost);
        let catalog: Catalog = match manifest {
            Some(json) => {
                RoomManifest::from_json(&json).map_err(js_err)?.into_catalog()
            }
            None => kitchen::catalog(),
        };
        let options = match options_toml {
            Some(toml) => Options::from_toml(&toml).map_err(js_err)?,
            None => Options::default(),
        };
        let Some(element) = canvas_element(&canvas_id) else {
            log::error!("canvas `{canvas_id}` not found");
            return Err(js_err(format!("canvas `{canvas_id}` not found")));
        };
        let size = (element.width().max(1), element.height().max(1));
        let context =
            RenderContext::new(wgpu::SurfaceTarget::Canvas(element), size)
                .await
                .map_err(js_err)?;

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let config = SessionConfig {
            catalog,
            options,
            source: Box::new(FetchSource::default()),
            scheduler: Box::new(RafScheduler {
                callback: Rc::clone(&callback),
            }),
        };
        let started = GUARD.with(|guard| {
            guard.init(&host, &canvas_id, config, move |_| {
                Ok(WgpuBackend::new(context))
            })
        });
        let session = match started {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(None),
            Err(e) => {
                log::error!("{e}");
                return Err(js_err(e));
            }
        };

        let shared: SharedSession = Rc::new(RefCell::new(Some(session)));
        *callback.borrow_mut() = Some(frame_callback(Rc::downgrade(&shared)));
        if let Some(session) = shared.borrow_mut().as_mut() {
            // the request made during start had no callback to run yet
            session.frame(Instant::now());
        }
        Ok(Some(Self {
            session: shared,
            callback,
        }))
    }

    /// Show the picker for `category` ("floor", "worktop", "walls",
    /// "cupboards").
    #[wasm_bindgen(js_name = changeCategory)]
    pub fn change_category(&self, category: &str) {
        match Category::parse(category) {
            Some(category) => {
                self.execute(VisualiserCommand::CategoryChange { category });
            }
            None => log::warn!("unknown category `{category}`"),
        }
    }

    /// Select variant `index` of `category`.
    #[wasm_bindgen(js_name = selectVariant)]
    pub fn select_variant(&self, category: &str, index: usize) {
        match Category::parse(category) {
            Some(category) => {
                self.execute(VisualiserCommand::select(category, index));
            }
            None => log::warn!("unknown category `{category}`"),
        }
    }

    /// Tint the cupboards with a `#rrggbb` color.
    #[wasm_bindgen(js_name = setCupboardColor)]
    pub fn set_cupboard_color(&self, hex: String) {
        self.execute(VisualiserCommand::SetCupboardColor { hex });
    }

    /// Orbit by a pointer drag in CSS pixels.
    pub fn rotate(&self, dx: f32, dy: f32) {
        self.execute(VisualiserCommand::RotateCamera {
            delta: glam::Vec2::new(dx, dy),
        });
    }

    /// Follow a canvas resize.
    pub fn resize(&self, width: u32, height: u32, pixel_ratio: f32) {
        self.execute(VisualiserCommand::Resize {
            width,
            height,
            pixel_ratio,
        });
    }

    /// Displayed loading percentage.
    pub fn progress(&self) -> f32 {
        self.session
            .borrow()
            .as_ref()
            .map_or(0.0, Session::progress)
    }

    /// Stop rendering and release the canvas.
    pub fn destroy(&self) {
        if let Some(mut session) = self.session.borrow_mut().take() {
            session.destroy();
        }
        let _ = self.callback.borrow_mut().take();
    }
}
