//! Camera system for the room view.
//!
//! A perspective camera plus orbit controls locked to a narrow,
//! straight-on viewing window.

/// Core camera struct and projection helpers.
pub mod core;
/// Damped orbit controls with angle and distance constraints.
pub mod orbit;
