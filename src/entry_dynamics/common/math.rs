/// Tolerance under which a denominator is treated as degenerate.
pub const EPS: f64 = 1e-9;

/// Generalized method to normalize a value within a given range.
///
/// # Arguments
/// - `value`: The value to normalize.
/// - `min`: The minimum value of the range.
/// - `max`: The maximum value of the range.
///
/// # Returns
/// - A `Some(f64)` representing the normalized value in the range `[0.0, 1.0]`.
/// - Returns `None` if `min` and `max` are effectively the same (to prevent division by zero).
pub fn normalize(value: f64, min: f64, max: f64) -> Option<f64> {
    if (max - min).abs() <= EPS {
        None
    } else {
        Some((value - min) / (max - min))
    }
}

/// Linearly interpolates a value `t` between two points `(x1, y1)` and `(x2, y2)`.
///
/// # Arguments
/// - `x1`, `x2`: The x-coordinates of the two points.
/// - `y1`, `y2`: The y-coordinates of the two points.
/// - `t`: The x-coordinate for which the interpolated y-value is to be calculated.
///
/// # Returns
/// - An `f64` representing the interpolated y-value. `t` is clamped to `[x1, x2]`.
pub fn interpolate(x1: f64, x2: f64, y1: f64, y2: f64, t: f64) -> f64 {
    let r_t = t.clamp(x1, x2);
    y1 + (r_t - x1) * (y2 - y1) / (x2 - x1)
}

/// Running min/max/avg accumulator for a scalar channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelAccumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl ChannelAccumulator {
    pub fn new() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY, sum: 0.0, count: 0 }
    }

    pub fn push(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Collapses the accumulator into `(min, max, avg)`, or `None` when no
    /// value was pushed.
    pub fn finish(&self) -> Option<(f64, f64, f64)> {
        if self.count == 0 {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            Some((self.min, self.max, self.sum / self.count as f64))
        }
    }
}

impl Default for ChannelAccumulator {
    fn default() -> Self { Self::new() }
}
