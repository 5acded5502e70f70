//! Escape-time Mandelbrot zoom renderer.
//!
//! This crate renders zoom sequences over the Mandelbrot set: a stack of
//! progressively narrower windows of the complex plane, each sampled into
//! per-pixel smoothed escape counts by a pool of workers sharing one claim
//! counter. Finished volumes are stored as flat binary files with a
//! caller-selected byte order.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Configuration types for zoom sequences
//! - `compute`: Escape-time evaluation, frame geometry, and the render engine
//! - `volume`: Binary storage for rendered volumes
//!
//! # Example
//!
//! ```rust,no_run
//! use mandel_zoom::{
//!     compute::Renderer,
//!     schema::RenderConfig,
//!     volume::{ByteOrder, write_volume},
//! };
//!
//! // Narrow the default seahorse-valley sequence to a quick preview
//! let config = RenderConfig {
//!     width: 320,
//!     height: 320,
//!     frames: 24,
//!     ..RenderConfig::default()
//! };
//!
//! let renderer = Renderer::new(config).expect("valid configuration");
//! let volume = renderer.render().expect("render");
//! write_volume("zoom.dat", &volume, ByteOrder::BigEndian).expect("write");
//! ```

pub mod compute;
pub mod schema;
pub mod volume;

// Re-export commonly used types
pub use compute::{EscapeStats, EscapeVolume, RenderReport, Renderer};
pub use schema::RenderConfig;
pub use volume::{ByteOrder, VolumeHeader};
