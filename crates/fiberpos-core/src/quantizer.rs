//! Step quantizer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rounds values to the nearest multiple of `q` inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantizer {
    q: f64,
    min: f64,
    max: f64,
}

impl Quantizer {
    pub fn new(q: f64, min: f64, max: f64) -> Result<Self> {
        if q <= 0.0 || !q.is_finite() {
            return Err(Error::invalid_argument("q", "should be upper zero"));
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::invalid_argument(
                "quantizer domain",
                format!("[{}, {}] is not an ordered interval", min, max),
            ));
        }
        Ok(Self { q, min, max })
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Index of the first multiple of `q` inside the domain.
    pub fn first_index(&self) -> i64 {
        (self.min / self.q).ceil() as i64
    }

    /// Index of the last multiple of `q` inside the domain.
    pub fn last_index(&self) -> i64 {
        (self.max / self.q).floor() as i64
    }

    /// Nearest multiple of `q` to `x` that lies inside the domain.
    ///
    /// Values outside the domain are clamped first. If the domain holds no
    /// multiple at all the clamped value is returned unchanged.
    pub fn quantize(&self, x: f64) -> f64 {
        let x = x.clamp(self.min, self.max);
        let (first, last) = (self.first_index(), self.last_index());
        if first > last {
            return x;
        }
        let n = ((x / self.q).round() as i64).clamp(first, last);
        n as f64 * self.q
    }
}
