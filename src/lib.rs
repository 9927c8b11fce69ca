// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D room visualiser built on wgpu.
//!
//! A room model is loaded once, its meshes are classified into
//! customisable surfaces (floor, worktop, walls, cupboards) and fixed
//! fittings, and the host swaps surface textures from a catalog while a
//! single progress number ramps to 100.
//!
//! # Key entry points
//!
//! - [`engine::LifecycleGuard`] - creates at most one live
//!   [`engine::Session`] per canvas
//! - [`engine::Session`] - per-frame driver: loads, transitions, camera,
//!   drawing
//! - [`catalog::Catalog`] - room metadata and texture variants
//! - [`options::Options`] - runtime configuration (camera, loading,
//!   transitions, lighting, surfaces)
//!
//! # Architecture
//!
//! Everything runs on the thread that owns the session. Asset fetches are
//! started through an [`loading::AssetSource`] and polled once per frame;
//! finished loads are applied in the frame that polls them. Drawing goes
//! through the [`gpu::backend::RenderBackend`] trait: [`gpu::renderer`]
//! draws with wgpu, [`headless`] records calls for tests and tools.

pub mod animation;
pub mod camera;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod headless;
pub mod loading;
pub mod material;
pub mod options;
pub mod scene;
pub mod texture;
pub mod util;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod fixtures;

pub use engine::{EngineEvent, LifecycleGuard, Session, VisualiserCommand};
pub use error::VisualiserError;
