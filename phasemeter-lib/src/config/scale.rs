use core::fmt;
use std::sync::Arc;

/// Maps a raw measurement to the number displayed in the schema's unit.
#[derive(Clone)]
pub struct Scale(Arc<dyn Fn(i64) -> f64 + Send + Sync>);

impl Scale {
    pub fn new(f: impl Fn(i64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Display raw values unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(raw_to_f64)
    }

    /// Display raw values divided by `divisor`, e.g. `1000.0` for milliseconds shown as seconds.
    #[must_use]
    pub fn divide_by(divisor: f64) -> Self {
        Self::new(move |raw| raw_to_f64(raw) / divisor)
    }

    #[must_use]
    pub fn apply(&self, raw: i64) -> f64 {
        (self.0)(raw)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scale")
    }
}

#[expect(clippy::cast_precision_loss, reason = "raw measurements stay well below 2^52 in practice")]
fn raw_to_f64(raw: i64) -> f64 {
    raw as f64
}

/// Format a scaled value the way reports print it: integral values keep one
/// decimal (`9.0`), others use the shortest exact form (`0.25`).
#[must_use]
pub fn format_scaled(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
