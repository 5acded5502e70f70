//! Compute module - Escape-time evaluation, frame geometry, and the render
//! engine.

mod engine;
mod escape;
mod geometry;
mod stats;

pub use engine::*;
pub use escape::*;
pub use geometry::*;
pub use stats::*;
