//! Escape-time evaluation of the quadratic map.
//!
//! A point `c` is iterated under `z <- z^2 + c` until the orbit's squared
//! magnitude crosses the divergence bound or the iteration budget runs out.
//! Escaped points report a smoothed (fractional) iteration count; bounded
//! points report the [`BOUNDED`] sentinel.

use num_complex::Complex64;

/// Iteration budget per point.
pub const MAX_ITERS: u32 = 2000;

/// Orbit magnitude at which a point counts as divergent.
pub const DIVERGENCE_BOUND: f64 = 1e5;

/// Exponent of the quadratic map. Fixed, but named so the smoothing term
/// reads like the formula it implements.
pub const POWER: f64 = 2.0;

/// Escape value reported for points that never diverge.
pub const BOUNDED: f64 = -1.0;

/// Precomputed constants for the smoothed escape count.
///
/// The bound and logarithms depend only on the map constants, so they are
/// folded once per render call instead of once per point.
#[derive(Debug, Clone, Copy)]
pub struct EscapeParams {
    bound_sqr: f64,
    log_bound: f64,
    log_power: f64,
}

impl EscapeParams {
    pub fn new() -> Self {
        Self {
            bound_sqr: DIVERGENCE_BOUND * DIVERGENCE_BOUND,
            log_bound: DIVERGENCE_BOUND.ln(),
            log_power: POWER.ln(),
        }
    }
}

impl Default for EscapeParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Smoothed escape count of `c`.
///
/// Returns `i - log(log(mag) / log(DIVERGENCE_BOUND)) / log(POWER)` where
/// `i` is the first iteration whose orbit magnitude `mag` crosses the bound,
/// or [`BOUNDED`] when the orbit stays inside it for all of [`MAX_ITERS`]
/// iterations. The magnitude test compares squared values to skip the root.
#[inline]
pub fn divergence(c: Complex64, params: &EscapeParams) -> f64 {
    let mut z = Complex64::new(0.0, 0.0);
    for i in 0..MAX_ITERS {
        z = z * z + c;
        let mag_sqr = z.norm_sqr();
        if mag_sqr >= params.bound_sqr {
            return f64::from(i) - ((mag_sqr.ln() / params.log_bound).ln() / params.log_power);
        }
    }
    BOUNDED
}
