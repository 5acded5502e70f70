//! Frame geometry - mapping (frame, pixel) coordinates to plane points.
//!
//! Frame `f` covers a window centered on the configured point whose
//! half-width is `half_width * scale^f`. The window's vertical extent
//! follows the image aspect ratio, so pixels stay square. Corner and
//! per-pixel deltas are folded once per frame and reused for every pixel.

use num_complex::Complex64;

use crate::schema::RenderConfig;

/// Sampling window of a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    frame: u64,
    half_width: f64,
    left: f64,
    bottom: f64,
    dx: f64,
    dy: f64,
}

impl FrameGeometry {
    /// Window of frame `frame`, from the closed form `half_width * scale^f`.
    pub fn for_frame(config: &RenderConfig, frame: u64) -> Self {
        let half_width = config.half_width * config.scale.powf(frame as f64);
        Self::with_half_width(config, frame, half_width)
    }

    /// Step to the next frame by the incremental `half_width * scale` form.
    pub fn advance(&mut self, config: &RenderConfig) {
        *self = Self::with_half_width(config, self.frame + 1, self.half_width * config.scale);
    }

    fn with_half_width(config: &RenderConfig, frame: u64, half_width: f64) -> Self {
        let aspect = f64::from(config.height) / f64::from(config.width);
        Self {
            frame,
            half_width,
            left: config.center.re - half_width,
            bottom: config.center.im - aspect * half_width,
            dx: 2.0 * half_width / f64::from(config.width),
            dy: 2.0 * aspect * half_width / f64::from(config.height),
        }
    }

    /// Frame this window belongs to.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current half-width of the window.
    #[inline]
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Plane point sampled by pixel `(x, y)`, with `y` growing upward from
    /// the window's bottom edge.
    #[inline]
    pub fn point_at(&self, x: u32, y: u32) -> Complex64 {
        Complex64::new(
            self.left + f64::from(x) * self.dx,
            self.bottom + f64::from(y) * self.dy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(width: u32, height: u32, scale: f64) -> RenderConfig {
        RenderConfig {
            width,
            height,
            center: Complex64::new(0.0, 0.0),
            half_width: 2.0,
            frames: 50,
            scale,
            workers: 1,
        }
    }

    #[test]
    fn test_frame_zero_window_corners() {
        let config = test_config(4, 4, 1.0);
        let geometry = FrameGeometry::for_frame(&config, 0);
        assert_eq!(geometry.point_at(0, 0), Complex64::new(-2.0, -2.0));
        assert_eq!(geometry.point_at(3, 3), Complex64::new(1.0, 1.0));
        assert_eq!(geometry.half_width(), 2.0);
    }

    #[test]
    fn test_aspect_ratio_keeps_pixels_square() {
        let config = test_config(200, 100, 0.95);
        let geometry = FrameGeometry::for_frame(&config, 0);
        let p00 = geometry.point_at(0, 0);
        let p10 = geometry.point_at(1, 0);
        let p01 = geometry.point_at(0, 1);
        let dx = p10.re - p00.re;
        let dy = p01.im - p00.im;
        assert!((dx - dy).abs() < 1e-15, "dx {dx} dy {dy}");
        // Half the height in plane units is aspect * half_width.
        assert_eq!(p00.im, -1.0);
    }

    #[test]
    fn test_advance_increments_frame_and_scales_window() {
        let config = test_config(64, 64, 0.5);
        let mut geometry = FrameGeometry::for_frame(&config, 0);
        geometry.advance(&config);
        assert_eq!(geometry.frame(), 1);
        assert_eq!(geometry.half_width(), 1.0);
        geometry.advance(&config);
        assert_eq!(geometry.frame(), 2);
        assert_eq!(geometry.half_width(), 0.5);
    }

    #[test]
    fn test_closed_form_matches_incremental_within_tolerance() {
        let config = test_config(64, 64, 0.95);
        let mut stepped = FrameGeometry::for_frame(&config, 0);
        for frame in 1..=40 {
            stepped.advance(&config);
            let direct = FrameGeometry::for_frame(&config, frame);
            let relative = (stepped.half_width() - direct.half_width()).abs()
                / direct.half_width();
            assert!(relative < 1e-12, "frame {frame}: relative error {relative}");
        }
    }

    #[test]
    fn test_closed_form_matches_incremental_exactly_at_unit_scale() {
        let config = test_config(32, 32, 1.0);
        let mut stepped = FrameGeometry::for_frame(&config, 0);
        for frame in 1..=10 {
            stepped.advance(&config);
            let direct = FrameGeometry::for_frame(&config, frame);
            assert_eq!(stepped.point_at(31, 31), direct.point_at(31, 31));
            assert_eq!(stepped.half_width(), direct.half_width());
        }
    }
}
