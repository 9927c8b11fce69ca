//! One live session per page.
//!
//! [`LifecycleGuard::init`] hands out an owned [`Session`]. While that
//! session is alive further `init` calls on the same guard are no-ops, and
//! the canvas itself carries a bound marker so a second guard cannot
//! attach to it either. Dropping or destroying the session releases both.

use std::cell::Cell;
use std::rc::Rc;

use super::Session;
use crate::catalog::Catalog;
use crate::error::VisualiserError;
use crate::gpu::backend::RenderBackend;
use crate::loading::AssetSource;
use crate::options::Options;

/// A render target as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTarget {
    /// Host identifier.
    pub id: String,
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
    /// Device pixel ratio.
    pub pixel_ratio: f32,
}

/// The page hosting render targets.
///
/// Methods take `&self`; hosts keep the bound marker on the element
/// itself (a DOM attribute on the web).
pub trait CanvasHost {
    /// Look up a render target.
    fn canvas(&self, id: &str) -> Option<CanvasTarget>;

    /// Whether any session has bound `id`.
    fn is_bound(&self, id: &str) -> bool;

    /// Set or clear the bound marker on `id`.
    fn set_bound(&self, id: &str, bound: bool);
}

/// Handle for a scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Schedules the next call to [`Session::frame`].
pub trait FrameScheduler {
    /// Ask for one more frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a pending request.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Everything a session needs besides its canvas and backend.
pub struct SessionConfig {
    /// Room and variants.
    pub catalog: Catalog,
    /// Engine options.
    pub options: Options,
    /// Where asset bytes come from.
    pub source: Box<dyn AssetSource>,
    /// Frame scheduling.
    pub scheduler: Box<dyn FrameScheduler>,
}

/// Ensures at most one live session per guard and per canvas.
#[derive(Debug, Default)]
pub struct LifecycleGuard {
    live: Rc<Cell<bool>>,
    starting: Rc<Cell<bool>>,
}

/// A start in progress. Held across asynchronous backend setup so that
/// overlapping starts back off; released on drop.
#[derive(Debug)]
#[must_use]
pub struct StartReservation {
    starting: Rc<Cell<bool>>,
}

impl Drop for StartReservation {
    fn drop(&mut self) {
        self.starting.set(false);
    }
}

impl LifecycleGuard {
    /// Idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session from this guard is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.live.get()
    }

    /// Claim the right to start a session before doing slow setup.
    ///
    /// `None` when a session is alive or another start holds the claim.
    pub fn reserve(&self) -> Option<StartReservation> {
        if self.live.get() || self.starting.get() {
            return None;
        }
        self.starting.set(true);
        Some(StartReservation {
            starting: Rc::clone(&self.starting),
        })
    }

    /// Whether a reservation is outstanding.
    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.starting.get()
    }

    /// Start a session on canvas `canvas_id`.
    ///
    /// Returns `Ok(None)` without touching the host when this guard
    /// already has a live session. `create_backend` runs only once every
    /// check has passed.
    ///
    /// # Errors
    ///
    /// [`VisualiserError::CanvasNotFound`] when the host has no such
    /// canvas, [`VisualiserError::CanvasAlreadyBound`] when another session
    /// owns it, or whatever `create_backend` fails with. The guard stays
    /// idle on error.
    pub fn init<B, F>(
        &self,
        host: &Rc<dyn CanvasHost>,
        canvas_id: &str,
        config: SessionConfig,
        create_backend: F,
    ) -> Result<Option<Session<B>>, VisualiserError>
    where
        B: RenderBackend,
        F: FnOnce(&CanvasTarget) -> Result<B, VisualiserError>,
    {
        if self.live.get() {
            log::warn!("visualiser already initialised; ignoring init");
            return Ok(None);
        }
        let Some(canvas) = host.canvas(canvas_id) else {
            log::error!("render target `{canvas_id}` not found");
            return Err(VisualiserError::CanvasNotFound(canvas_id.to_owned()));
        };
        if host.is_bound(canvas_id) {
            log::error!("render target `{canvas_id}` is already bound");
            return Err(VisualiserError::CanvasAlreadyBound(
                canvas_id.to_owned(),
            ));
        }

        self.live.set(true);
        host.set_bound(canvas_id, true);
        let backend = match create_backend(&canvas) {
            Ok(backend) => backend,
            Err(e) => {
                log::error!("backend creation failed: {e}");
                host.set_bound(canvas_id, false);
                self.live.set(false);
                return Err(e);
            }
        };
        log::info!("visualiser session started on `{canvas_id}`");
        Ok(Some(Session::start(
            Rc::clone(host),
            canvas,
            Rc::clone(&self.live),
            config,
            backend,
        )))
    }
}
