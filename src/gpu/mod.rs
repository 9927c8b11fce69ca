//! GPU side of the visualiser.
//!
//! [`backend`] defines the seam the engine renders through; the remaining
//! modules implement it on wgpu.

pub mod backend;
pub mod pipeline_helpers;
pub mod render_context;
pub mod renderer;
