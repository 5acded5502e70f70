//! Summary statistics over rendered escape volumes.

use super::escape::BOUNDED;

/// Escape-value statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EscapeStats {
    pub bounded: u64,
    pub escaped: u64,
    pub min_escape: f64,
    pub max_escape: f64,
    pub mean_escape: f64,
}

impl EscapeStats {
    /// Compute statistics from a flat value buffer.
    ///
    /// Values equal to the bounded sentinel are counted separately and
    /// excluded from the range and mean; when nothing escaped, the range
    /// and mean report zero.
    pub fn from_values(values: &[f64]) -> Self {
        let mut bounded = 0u64;
        let mut escaped = 0u64;
        let mut min_escape = f64::INFINITY;
        let mut max_escape = f64::NEG_INFINITY;
        let mut sum = 0.0f64;

        for &v in values {
            if v == BOUNDED {
                bounded += 1;
            } else {
                escaped += 1;
                min_escape = min_escape.min(v);
                max_escape = max_escape.max(v);
                sum += v;
            }
        }

        if escaped == 0 {
            min_escape = 0.0;
            max_escape = 0.0;
        }

        Self {
            bounded,
            escaped,
            min_escape,
            max_escape,
            mean_escape: if escaped > 0 { sum / escaped as f64 } else { 0.0 },
        }
    }
}
