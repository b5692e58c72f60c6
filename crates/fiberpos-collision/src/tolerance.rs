//! Error margins and the safety perimeter they induce.

use fiberpos_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Orientation and position error margins of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Orientation error margin (rad).
    pub eo: f64,
    /// Position error margin (mm).
    pub ep: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            eo: 0.001,
            ep: 0.01,
        }
    }
}

impl Tolerances {
    pub fn new(eo: f64, ep: f64) -> Result<Self> {
        let tolerances = Self { eo, ep };
        tolerances.validate()?;
        Ok(tolerances)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.eo.is_finite() || self.eo < 0.0 {
            return Err(Error::invalid_argument("Eo", "should be a non-negative number"));
        }
        if !self.ep.is_finite() || self.ep < 0.0 {
            return Err(Error::invalid_argument("Ep", "should be a non-negative number"));
        }
        Ok(())
    }

    /// Safety perimeter margin for an item of bounding radius `r_max`.
    pub fn spm(&self, r_max: f64) -> f64 {
        self.eo * r_max + self.ep
    }
}
