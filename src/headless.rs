//! In-memory stand-ins for the GPU, the network, the page and the
//! animation-frame clock.
//!
//! These let a full [`Session`](crate::engine::Session) run without a
//! window: every handle is a cheap clone sharing state with the copy the
//! session owns, so a test can keep one and inspect or steer it.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::lifecycle::{
    CanvasHost, CanvasTarget, FrameRequest, FrameScheduler,
};
use crate::error::{LoadError, VisualiserError};
use crate::gpu::backend::{
    EnvironmentDesc, FrameView, MeshId, RenderBackend, TextureDesc, TextureId,
};
use crate::loading::{AssetSource, RequestId};
use crate::material::{Material, MaterialId};
use crate::scene::MeshData;

// ── Backend ─────────────────────────────────────────────────────────────

/// One recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    /// Mesh handle.
    pub mesh: MeshId,
    /// Material handle.
    pub material_id: MaterialId,
    /// Material parameters at draw time.
    pub material: Material,
}

/// What a [`HeadlessBackend`] has seen.
#[derive(Debug, Default)]
pub struct BackendLog {
    /// Labels of uploaded textures, indexed by [`TextureId`].
    pub textures: Vec<String>,
    /// Number of environment uploads.
    pub environments: usize,
    /// Vertex counts of uploaded meshes, indexed by [`MeshId`].
    pub meshes: Vec<usize>,
    /// Draw lists of every rendered frame.
    pub frames: Vec<Vec<RecordedDraw>>,
    /// Last size passed to `resize`.
    pub size: Option<(u32, u32)>,
    /// Whether `dispose` ran.
    pub disposed: bool,
}

/// Backend that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    log: Rc<RefCell<BackendLog>>,
}

impl HeadlessBackend {
    /// Fresh backend with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the log.
    pub fn inspect<R>(&self, f: impl FnOnce(&BackendLog) -> R) -> R {
        f(&self.log.borrow())
    }

    /// Draws of the most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Vec<RecordedDraw> {
        self.log.borrow().frames.last().cloned().unwrap_or_default()
    }

    /// Whether `dispose` ran.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.log.borrow().disposed
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> TextureId {
        let mut log = self.log.borrow_mut();
        let id = TextureId::from_raw(log.textures.len() as u32);
        log.textures.push(desc.label.to_owned());
        id
    }

    fn create_environment(&mut self, desc: &EnvironmentDesc<'_>) -> TextureId {
        let mut log = self.log.borrow_mut();
        log.environments += 1;
        let id = TextureId::from_raw(log.textures.len() as u32);
        log.textures.push(desc.label.to_owned());
        id
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId {
        let mut log = self.log.borrow_mut();
        let id = MeshId::from_raw(log.meshes.len() as u32);
        log.meshes.push(mesh.positions.len());
        id
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().size = Some((width, height));
    }

    fn render(&mut self, frame: &FrameView<'_>) {
        let draws = frame
            .draws
            .iter()
            .map(|d| RecordedDraw {
                mesh: d.mesh,
                material_id: d.material_id,
                material: d.material.clone(),
            })
            .collect();
        self.log.borrow_mut().frames.push(draws);
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposed = true;
    }
}

// ── Asset source ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SourceState {
    files: FxHashMap<String, Vec<u8>>,
    failures: FxHashMap<String, String>,
    held: FxHashSet<String>,
    queued: VecDeque<(RequestId, String)>,
    fetched: Vec<String>,
    per_poll: Option<usize>,
}

/// Asset source serving bytes from memory. Requests complete on the next
/// poll unless held.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    state: Rc<RefCell<SourceState>>,
}

impl MemorySource {
    /// Empty source; every path is missing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `path`.
    pub fn insert(&self, path: &str, bytes: Vec<u8>) {
        let _ = self.state.borrow_mut().files.insert(path.to_owned(), bytes);
    }

    /// Make every fetch of `path` fail with `reason`.
    pub fn fail(&self, path: &str, reason: &str) {
        let _ = self
            .state
            .borrow_mut()
            .failures
            .insert(path.to_owned(), reason.to_owned());
    }

    /// Keep requests for `path` in flight until released.
    pub fn hold(&self, path: &str) {
        let _ = self.state.borrow_mut().held.insert(path.to_owned());
    }

    /// Let held requests for `path` complete on the next poll.
    pub fn release(&self, path: &str) {
        let _ = self.state.borrow_mut().held.remove(path);
    }

    /// Complete at most `limit` requests per poll (`None` for no limit).
    pub fn set_per_poll(&self, limit: Option<usize>) {
        self.state.borrow_mut().per_poll = limit;
    }

    /// Every path requested so far, in order.
    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        self.state.borrow().fetched.clone()
    }

    /// How many times `path` was requested.
    #[must_use]
    pub fn fetch_count(&self, path: &str) -> usize {
        self.state
            .borrow()
            .fetched
            .iter()
            .filter(|p| *p == path)
            .count()
    }

    /// Requests still in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.borrow().queued.len()
    }
}

impl AssetSource for MemorySource {
    fn start(&mut self, id: RequestId, path: &str) {
        let mut state = self.state.borrow_mut();
        state.fetched.push(path.to_owned());
        state.queued.push_back((id, path.to_owned()));
    }

    fn poll(&mut self) -> Vec<(RequestId, Result<Vec<u8>, LoadError>)> {
        let mut state = self.state.borrow_mut();
        let limit = state.per_poll.unwrap_or(usize::MAX);
        let mut waiting = VecDeque::new();
        let mut done = Vec::new();
        while let Some((id, path)) = state.queued.pop_front() {
            if done.len() >= limit || state.held.contains(&path) {
                waiting.push_back((id, path));
                continue;
            }
            let result = if let Some(reason) = state.failures.get(&path) {
                Err(LoadError::Fetch {
                    path,
                    reason: reason.clone(),
                })
            } else if let Some(bytes) = state.files.get(&path) {
                Ok(bytes.clone())
            } else {
                Err(LoadError::Fetch {
                    path,
                    reason: "not found".to_owned(),
                })
            };
            done.push((id, result));
        }
        state.queued = waiting;
        done
    }

    fn cancel_all(&mut self) {
        self.state.borrow_mut().queued.clear();
    }
}

// ── Page ────────────────────────────────────────────────────────────────

/// A page with named canvases and their bound markers.
#[derive(Debug, Default)]
pub struct HeadlessPage {
    canvases: RefCell<BTreeMap<String, (CanvasTarget, bool)>>,
}

impl HeadlessPage {
    /// Page with no canvases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canvas of `width` x `height` CSS pixels.
    #[must_use]
    pub fn with_canvas(
        self,
        id: &str,
        width: u32,
        height: u32,
        pixel_ratio: f32,
    ) -> Self {
        let target = CanvasTarget {
            id: id.to_owned(),
            width,
            height,
            pixel_ratio,
        };
        let _ = self
            .canvases
            .borrow_mut()
            .insert(id.to_owned(), (target, false));
        self
    }

    /// Share as a host handle.
    #[must_use]
    pub fn into_host(self) -> Rc<dyn CanvasHost> {
        Rc::new(self)
    }
}

impl CanvasHost for HeadlessPage {
    fn canvas(&self, id: &str) -> Option<CanvasTarget> {
        self.canvases.borrow().get(id).map(|(c, _)| c.clone())
    }

    fn is_bound(&self, id: &str) -> bool {
        self.canvases.borrow().get(id).is_some_and(|(_, bound)| *bound)
    }

    fn set_bound(&self, id: &str, bound: bool) {
        if let Some(entry) = self.canvases.borrow_mut().get_mut(id) {
            entry.1 = bound;
        }
    }
}

// ── Scheduler ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SchedulerState {
    next: u64,
    pending: Option<FrameRequest>,
    cancelled: usize,
}

/// Frame scheduler driven by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    /// Scheduler with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame has been requested and not yet taken or cancelled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Consume the pending request, as the host's frame callback would.
    pub fn take(&self) -> Option<FrameRequest> {
        self.state.borrow_mut().pending.take()
    }

    /// Requests withdrawn so far.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next += 1;
        let request = FrameRequest(state.next);
        state.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(request) {
            state.pending = None;
            state.cancelled += 1;
        }
    }
}

/// Backend factory counting how many rendering contexts it creates.
#[derive(Debug, Clone, Default)]
pub struct ContextCounter {
    created: Rc<RefCell<Vec<HeadlessBackend>>>,
}

impl ContextCounter {
    /// Counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend for `canvas`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the lifecycle guard's factory.
    pub fn create(
        &self,
        canvas: &CanvasTarget,
    ) -> Result<HeadlessBackend, VisualiserError> {
        log::debug!("headless context for `{}`", canvas.id);
        let backend = HeadlessBackend::new();
        self.created.borrow_mut().push(backend.clone());
        Ok(backend)
    }

    /// Contexts created so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.created.borrow().len()
    }

    /// The most recent context.
    #[must_use]
    pub fn latest(&self) -> Option<HeadlessBackend> {
        self.created.borrow().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_paths_wait_for_release() {
        let mut source = MemorySource::new();
        source.insert("/a", vec![1]);
        source.hold("/a");
        source.start(RequestId::from_raw(0), "/a");
        assert!(source.poll().is_empty());
        source.release("/a");
        let done = source.poll();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].1.as_deref().ok(), Some(&[1u8][..]));
    }

    #[test]
    fn per_poll_limit_spreads_completions() {
        let mut source = MemorySource::new();
        source.set_per_poll(Some(2));
        for i in 0..5 {
            source.start(RequestId::from_raw(i), "/x");
        }
        assert_eq!(source.poll().len(), 2);
        assert_eq!(source.poll().len(), 2);
        assert_eq!(source.poll().len(), 1);
        assert_eq!(source.fetch_count("/x"), 5);
    }

    #[test]
    fn bound_marker_lives_on_the_page() {
        let page = HeadlessPage::new().with_canvas("c", 10, 10, 1.0);
        assert!(!page.is_bound("c"));
        page.set_bound("c", true);
        assert!(page.is_bound("c"));
        assert!(page.canvas("missing").is_none());
    }

    #[test]
    fn cancel_only_withdraws_the_pending_request() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.request_frame();
        let _ = scheduler.take();
        scheduler.cancel_frame(first);
        assert_eq!(scheduler.cancelled(), 0);
        let second = scheduler.request_frame();
        scheduler.cancel_frame(second);
        assert_eq!(scheduler.cancelled(), 1);
        assert!(!scheduler.is_pending());
    }
}
