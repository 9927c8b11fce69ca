//! Rendering backend seam.
//!
//! The engine never talks to a graphics API directly. It uploads textures
//! and meshes through a [`RenderBackend`] and hands it a [`FrameView`] per
//! frame. The wgpu implementation lives in [`super::renderer`]; tests use
//! the recording backend in [`crate::headless`].

use glam::{Mat4, Vec3};

use crate::material::{Material, MaterialId};
use crate::scene::MeshData;

/// Handle to a backend texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// Wrap a backend-assigned index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Backend-assigned index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to uploaded geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u32);

impl MeshId {
    /// Wrap a backend-assigned index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Backend-assigned index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// An 8-bit color texture to upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    /// Debug label (usually the asset path).
    pub label: &'a str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: &'a [u8],
    /// Whether the pixels are sRGB-encoded color.
    pub srgb: bool,
}

/// An equirectangular HDR panorama to upload.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentDesc<'a> {
    /// Debug label.
    pub label: &'a str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major linear RGBA32F pixels.
    pub pixels: &'a [f32],
}

/// Lights and tone mapping for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLighting {
    /// Ambient color premultiplied by intensity.
    pub ambient: Vec3,
    /// Key light color premultiplied by intensity.
    pub key_color: Vec3,
    /// Unit vector pointing from the surface toward the key light.
    pub key_direction: Vec3,
    /// Tone-mapping exposure.
    pub exposure: f32,
    /// Whether ACES filmic tone mapping is applied.
    pub tone_mapping: bool,
    /// Clear color when no environment is available.
    pub clear_color: Vec3,
}

/// One mesh to draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    /// Uploaded geometry.
    pub mesh: MeshId,
    /// Local-to-world transform.
    pub world: Mat4,
    /// Material id (stable key for per-draw caches).
    pub material_id: MaterialId,
    /// Material parameters.
    pub material: &'a Material,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Camera view matrix.
    pub view: Mat4,
    /// Camera projection matrix.
    pub proj: Mat4,
    /// Camera position.
    pub eye: Vec3,
    /// Lights.
    pub lighting: FrameLighting,
    /// Environment panorama used as background and for reflections.
    pub environment: Option<TextureId>,
    /// Opaque draws first, then transparent draws back to front by
    /// render order.
    pub draws: &'a [DrawItem<'a>],
}

/// A graphics backend owned by one session.
pub trait RenderBackend {
    /// Upload a color texture.
    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> TextureId;

    /// Upload an environment panorama.
    fn create_environment(&mut self, desc: &EnvironmentDesc<'_>) -> TextureId;

    /// Upload geometry.
    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId;

    /// Resize the render target in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw a frame.
    fn render(&mut self, frame: &FrameView<'_>);

    /// Release every GPU resource. The backend is unusable afterwards.
    fn dispose(&mut self);
}
