use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use visualiser::catalog::{kitchen, Catalog, Category, RoomManifest};
use visualiser::engine::lifecycle::{
    CanvasHost, CanvasTarget, FrameRequest, FrameScheduler, SessionConfig,
};
use visualiser::engine::{EngineEvent, LifecycleGuard, Session, VisualiserCommand};
use visualiser::gpu::render_context::RenderContext;
use visualiser::gpu::renderer::WgpuBackend;
use visualiser::loading::FsSource;
use visualiser::options::Options;
use visualiser::VisualiserError;
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const CANVAS: &str = "window";
const CUPBOARD_COLORS: [&str; 4] = ["#ffffff", "#2f3e46", "#a3b18a", "#bc6c25"];

/// The window as the session's only canvas.
struct WindowHost {
    window: Arc<Window>,
    bound: Cell<bool>,
}

impl CanvasHost for WindowHost {
    fn canvas(&self, id: &str) -> Option<CanvasTarget> {
        if id != CANVAS {
            return None;
        }
        let scale = self.window.scale_factor();
        let size = self.window.inner_size().to_logical::<f64>(scale);
        Some(CanvasTarget {
            id: id.to_owned(),
            width: size.width as u32,
            height: size.height as u32,
            pixel_ratio: scale as f32,
        })
    }

    fn is_bound(&self, id: &str) -> bool {
        id == CANVAS && self.bound.get()
    }

    fn set_bound(&self, id: &str, bound: bool) {
        if id == CANVAS {
            self.bound.set(bound);
        }
    }
}

/// Turns frame requests into redraw requests.
struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        self.window.request_redraw();
        FrameRequest(self.next)
    }

    // winit has no way to withdraw a redraw; a destroyed session ignores it
    fn cancel_frame(&mut self, _request: FrameRequest) {}
}

struct ViewerApp {
    assets: PathBuf,
    catalog: Catalog,
    options: Options,
    guard: LifecycleGuard,
    window: Option<Arc<Window>>,
    session: Option<Session<WgpuBackend>>,
    dragging: bool,
    last_mouse_pos: Option<(f32, f32)>,
    cupboard_color: usize,
}

impl ViewerApp {
    fn new(assets: PathBuf, catalog: Catalog, options: Options) -> Self {
        Self {
            assets,
            catalog,
            options,
            guard: LifecycleGuard::new(),
            window: None,
            session: None,
            dragging: false,
            last_mouse_pos: None,
            cupboard_color: 0,
        }
    }

    fn start(&mut self, window: &Arc<Window>) -> Result<(), VisualiserError> {
        let host: Rc<dyn CanvasHost> = Rc::new(WindowHost {
            window: Arc::clone(window),
            bound: Cell::new(false),
        });
        let config = SessionConfig {
            catalog: self.catalog.clone(),
            options: self.options.clone(),
            source: Box::new(FsSource::new(&self.assets)),
            scheduler: Box::new(RedrawScheduler {
                window: Arc::clone(window),
                next: 0,
            }),
        };
        let surface_window = Arc::clone(window);
        let session = self.guard.init(&host, CANVAS, config, |canvas| {
            let size = surface_window.inner_size();
            log::info!(
                "creating GPU context for `{}` ({}x{})",
                canvas.id,
                size.width,
                size.height
            );
            let context = pollster::block_on(RenderContext::new(
                surface_window,
                (size.width.max(1), size.height.max(1)),
            ))?;
            Ok(WgpuBackend::new(context))
        })?;
        if session.is_some() {
            self.session = session;
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        let Some(session) = &mut self.session else {
            return;
        };
        let category = session.active_category();
        let command = match code {
            KeyCode::Digit1 => VisualiserCommand::CategoryChange {
                category: Category::Floor,
            },
            KeyCode::Digit2 => VisualiserCommand::CategoryChange {
                category: Category::Worktop,
            },
            KeyCode::Digit3 => VisualiserCommand::CategoryChange {
                category: Category::Walls,
            },
            KeyCode::Digit4 => VisualiserCommand::CategoryChange {
                category: Category::Cupboards,
            },
            KeyCode::ArrowRight | KeyCode::ArrowLeft => {
                let count = session.catalog().variants(category).len();
                if count == 0 {
                    return;
                }
                let current = session.textures().active_index(category).unwrap_or(0);
                let index = if code == KeyCode::ArrowRight {
                    (current + 1) % count
                } else {
                    (current + count - 1) % count
                };
                VisualiserCommand::select(category, index)
            }
            KeyCode::KeyC => {
                self.cupboard_color = (self.cupboard_color + 1) % CUPBOARD_COLORS.len();
                VisualiserCommand::SetCupboardColor {
                    hex: CUPBOARD_COLORS[self.cupboard_color].to_owned(),
                }
            }
            _ => return,
        };
        session.execute(command);
    }

    fn report_events(&self) {
        let Some(session) = &self.session else {
            return;
        };
        for event in session.drain_events() {
            match event {
                EngineEvent::Progress { value } => log::debug!("progress {value}%"),
                EngineEvent::Stage { label } => log::info!("{label}"),
                EngineEvent::Loaded => {
                    log::info!("loaded: 1-4 pick a surface, arrows change it, C recolors cupboards");
                }
                EngineEvent::CategoryChanged { category } => {
                    log::info!("{category}: {:?}", session.current_picker());
                }
                EngineEvent::SelectionChanged { category, index } => {
                    let name = session
                        .catalog()
                        .variant(category, index)
                        .map_or("?", |v| v.display_name.as_str());
                    log::info!("{category} -> {name}");
                }
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(format!("Visualiser - {}", self.catalog.room.name))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("cannot open window: {e}");
                event_loop.exit();
                return;
            }
        };
        if let Err(e) = self.start(&window) {
            log::error!("{e}");
            event_loop.exit();
            return;
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(session) = &mut self.session {
                    session.destroy();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(session)) =
                    (&self.window, &mut self.session)
                {
                    let scale = window.scale_factor();
                    let size = window.inner_size().to_logical::<f64>(scale);
                    session.execute(VisualiserCommand::Resize {
                        width: size.width as u32,
                        height: size.height as u32,
                        pixel_ratio: scale as f32,
                    });
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(session) = &mut self.session {
                    session.frame(Instant::now());
                }
                self.report_events();
            }

            WindowEvent::MouseInput { button, state, .. } => {
                if button == MouseButton::Left {
                    self.dragging = state == ElementState::Pressed;
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x as f32, position.y as f32);
                if let (Some(last), true) = (self.last_mouse_pos, self.dragging) {
                    if let Some(session) = &mut self.session {
                        session.execute(VisualiserCommand::RotateCamera {
                            delta: Vec2::new(pos.0 - last.0, pos.1 - last.1),
                        });
                    }
                }
                self.last_mouse_pos = Some(pos);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(session) = &mut self.session {
                    session.execute(VisualiserCommand::Zoom {
                        factor: 0.95f32.powf(-steps),
                    });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(code);
                    }
                }
            }

            _ => (),
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, VisualiserError> {
    let Some(path) = path else {
        return Ok(kitchen::catalog());
    };
    let json = std::fs::read_to_string(path)?;
    Ok(RoomManifest::from_json(&json)?.into_catalog())
}

fn run() -> Result<(), VisualiserError> {
    let mut args = std::env::args().skip(1);
    let assets = PathBuf::from(args.next().unwrap_or_else(|| "assets".to_owned()));
    let manifest = args.next().map(PathBuf::from);

    let catalog = load_catalog(manifest.as_deref())?;
    let options_path = assets.join("options.toml");
    let options = if options_path.exists() {
        Options::load(&options_path)?
    } else {
        Options::default()
    };
    log::info!(
        "room `{}` from {} ({} floor, {} worktop, {} wall variants)",
        catalog.room.slug,
        assets.display(),
        catalog.variants(Category::Floor).len(),
        catalog.variants(Category::Worktop).len(),
        catalog.variants(Category::Walls).len(),
    );

    let mut app = ViewerApp::new(assets, catalog, options);
    let event_loop =
        EventLoop::new().map_err(|e| VisualiserError::Viewer(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop
        .run_app(&mut app)
        .map_err(|e| VisualiserError::Viewer(e.to_string()))
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
