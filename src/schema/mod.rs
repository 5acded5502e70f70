//! Schema module - Configuration types for zoom-sequence renders.

mod config;

pub use config::*;
