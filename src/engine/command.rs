//! The session's complete interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a picker click, a
//! pointer drag or a key press, is a [`VisualiserCommand`] passed to
//! [`Session::execute`](super::Session::execute).

use glam::Vec2;

use crate::catalog::Category;

/// A discrete action the session can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualiserCommand {
    // ── Picker ──────────────────────────────────────────────────────
    /// Switch the picker to another category.
    CategoryChange {
        /// Category to show.
        category: Category,
    },

    /// Bind a variant to its category.
    SelectVariant {
        /// Target category.
        category: Category,
        /// Index into the category's variants.
        index: usize,
    },

    /// Tint the cupboards with a `#rrggbb` color.
    SetCupboardColor {
        /// Hex color string.
        hex: String,
    },

    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit by a pointer drag in pixels.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom by a factor (>1 moves closer). Ignored unless enabled.
    Zoom {
        /// Zoom factor.
        factor: f32,
    },

    // ── Viewport ────────────────────────────────────────────────────
    /// The canvas changed size.
    Resize {
        /// New width in CSS pixels.
        width: u32,
        /// New height in CSS pixels.
        height: u32,
        /// Device pixel ratio.
        pixel_ratio: f32,
    },
}

impl VisualiserCommand {
    /// Command selecting a variant by catalog id.
    #[must_use]
    pub fn select(category: Category, index: usize) -> Self {
        Self::SelectVariant { category, index }
    }
}
