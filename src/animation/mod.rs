//! Frame-stepped animation: scalar tweens, a keyed runner, and the
//! texture-swap transitions built on them.

pub mod fade;
mod runner;
mod tween;

pub use fade::{FadeStrategy, TransitionEngine};
pub use runner::{TweenFrame, TweenRunner};
pub use tween::{Rate, Tween};
