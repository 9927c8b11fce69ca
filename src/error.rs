//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the visualiser crate.
///
/// Only structural misuse and setup failures surface here. Individual asset
/// fetch or decode problems are absorbed by the loading pipeline (see
/// [`LoadError`]) and never abort a session.
#[derive(Debug)]
pub enum VisualiserError {
    /// No render target with the given identifier exists in the host.
    CanvasNotFound(String),
    /// The render target is already owned by another live session.
    CanvasAlreadyBound(String),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Room manifest JSON could not be parsed.
    Manifest(serde_json::Error),
    /// An image or model payload could not be decoded.
    Decode(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for VisualiserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CanvasNotFound(id) => {
                write!(f, "render target `{id}` not found")
            }
            Self::CanvasAlreadyBound(id) => {
                write!(f, "render target `{id}` is already bound")
            }
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Manifest(e) => write!(f, "room manifest error: {e}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for VisualiserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Manifest(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for VisualiserError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for VisualiserError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for VisualiserError {
    fn from(e: serde_json::Error) -> Self {
        Self::Manifest(e)
    }
}

/// Why a single tracked resource failed to load.
///
/// Load errors are logged and replaced with fallbacks; they count as
/// completed for progress purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The asset source could not deliver the bytes.
    Fetch {
        /// Requested asset path.
        path: String,
        /// Source-specific failure description.
        reason: String,
    },
    /// The bytes arrived but could not be decoded.
    Decode {
        /// Requested asset path.
        path: String,
        /// Decoder failure description.
        reason: String,
    },
}

impl LoadError {
    /// The asset path this error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Decode { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { path, reason } => {
                write!(f, "failed to fetch `{path}`: {reason}")
            }
            Self::Decode { path, reason } => {
                write!(f, "failed to decode `{path}`: {reason}")
            }
        }
    }
}

impl std::error::Error for LoadError {}
