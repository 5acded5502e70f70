//! Configuration types for zoom-sequence renders.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Default worker count: one per logical CPU.
fn default_workers() -> usize {
    num_cpus::get()
}

/// Top-level render configuration.
///
/// Describes one zoom sequence: `frames` windows of the complex plane, all
/// centered on `center`, each narrowed by `scale` relative to the previous
/// one and sampled on a `width` x `height` pixel grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Plane point every frame is centered on.
    pub center: Complex64,
    /// Half the plane width covered by frame 0.
    pub half_width: f64,
    /// Number of frames in the sequence.
    pub frames: u64,
    /// Window multiplier applied per frame (below 1.0 zooms in).
    pub scale: f64,
    /// Worker threads used by a render call.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1200,
            center: Complex64::new(-0.77568377, 0.13646737),
            half_width: 0.3,
            frames: 150,
            scale: 0.95,
            workers: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    /// Pixels per frame (width * height).
    #[inline]
    pub fn frame_len(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Total values in the rendered volume (width * height * frames).
    ///
    /// `None` when the flattened length overflows `u64`.
    #[inline]
    pub fn volume_len(&self) -> Option<u64> {
        self.frame_len().checked_mul(self.frames)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.frames == 0 {
            return Err(ConfigError::InvalidFrameCount);
        }
        if !self.center.re.is_finite() || !self.center.im.is_finite() {
            return Err(ConfigError::InvalidCenter);
        }
        if !self.half_width.is_finite() || self.half_width <= 0.0 {
            return Err(ConfigError::InvalidHalfWidth);
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale);
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers);
        }
        match self.volume_len() {
            Some(len) if usize::try_from(len).is_ok() => Ok(()),
            _ => Err(ConfigError::VolumeTooLarge),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Image dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Frame count must be non-zero")]
    InvalidFrameCount,
    #[error("Plane center must be finite")]
    InvalidCenter,
    #[error("Initial half-width must be finite and positive")]
    InvalidHalfWidth,
    #[error("Zoom scale must be finite and positive")]
    InvalidScale,
    #[error("Worker count must be non-zero")]
    InvalidWorkers,
    #[error("width * height * frames does not fit in addressable memory")]
    VolumeTooLarge,
}
