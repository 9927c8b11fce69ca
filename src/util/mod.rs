//! Shared utilities: easing curves, frame timing, and hex color helpers.

pub mod color;
pub mod easing;
pub mod frame_timing;
