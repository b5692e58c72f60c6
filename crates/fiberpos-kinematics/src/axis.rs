//! Quantized rotation axis.
//!
//! Both joints of a positioner are stepper-driven rotations described the
//! same way: a monotonic step function `F` (angle → step), its inverse `G`,
//! a quantizer `Q` over the steps of the angular domain and the current
//! angle. Quantization exists to absorb the floating point noise `F`
//! introduces; it never moves the axis by more than half a step.

use fiberpos_core::error::ensure_finite;
use fiberpos_core::{Error, Function, Quantizer, Result};
use std::f64::consts::PI;
use tracing::warn;

const DOMAIN_EPS: f64 = 1e-12;

/// Angular state of one stepper-driven axis.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedAxis {
    name: &'static str,
    f: Function,
    g: Function,
    q: Quantizer,
    sb: f64,
    rbs: f64,
    min: f64,
    max: f64,
    theta: f64,
    quantify: bool,
}

impl QuantizedAxis {
    /// Creates an axis over `[min, max]` driven by the step function `f`.
    ///
    /// The initial angle is `min`, snapped to a step when `quantify` is set.
    pub fn new(name: &'static str, f: Function, min: f64, max: f64, quantify: bool) -> Result<Self> {
        let (g, sb) = Self::derive_inverse(name, &f)?;
        Self::check_domain(name, &f, min, max)?;
        let q = Quantizer::new(1.0, f.eval(min), f.eval(max))?;
        let mut axis = Self {
            name,
            f,
            g,
            q,
            sb,
            rbs: 2.0 * PI / sb,
            min,
            max,
            theta: min,
            quantify,
        };
        axis.theta = axis.admissible(min);
        Ok(axis)
    }

    /// Computes `G` and the steps per full turn for a candidate `F`.
    fn derive_inverse(name: &str, f: &Function) -> Result<(Function, f64)> {
        let g = f.inverse().map_err(|_| {
            Error::invalid_argument(
                format!("F({})", name),
                "should be monotonically increasing",
            )
        })?;
        let x0 = f.x_first().max(0.0);
        let x1 = f.x_last().min(2.0 * PI);
        if x1 <= x0 {
            return Err(Error::invalid_argument(
                format!("F({})", name),
                "should be defined on a stretch of [0, 2π]",
            ));
        }
        let sb = (f.eval(x1) - f.eval(x0)) / (x1 - x0) * 2.0 * PI;
        Ok((g, sb))
    }

    fn check_domain(name: &str, f: &Function, min: f64, max: f64) -> Result<()> {
        ensure_finite(name, min)?;
        ensure_finite(name, max)?;
        if min >= max {
            return Err(Error::invalid_argument(
                format!("{} domain", name),
                format!("min ({}) should be less than max ({})", min, max),
            ));
        }
        if !f.in_domain(min) || !f.in_domain(max) {
            return Err(Error::invalid_argument(
                format!("{} domain", name),
                format!("[{}, {}] should lie inside the domain of F", min, max),
            ));
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn f(&self) -> &Function {
        &self.f
    }

    pub fn g(&self) -> &Function {
        &self.g
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.q
    }

    /// Steps per full turn.
    pub fn sb(&self) -> f64 {
        self.sb
    }

    /// Average radians per step.
    pub fn rbs(&self) -> f64 {
        self.rbs
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn quantify(&self) -> bool {
        self.quantify
    }

    pub fn contains(&self, theta: f64) -> bool {
        theta >= self.min && theta <= self.max
    }

    /// Replaces `F`, clamping the angular domain to the new function's domain.
    pub fn set_f(&mut self, f: Function) -> Result<()> {
        let (g, sb) = Self::derive_inverse(self.name, &f)?;
        let min = self.min.max(f.x_first());
        let max = self.max.min(f.x_last());
        if min >= max {
            return Err(Error::invalid_argument(
                format!("F({})", self.name),
                "domain does not overlap the axis domain",
            ));
        }
        let q = Quantizer::new(1.0, f.eval(min), f.eval(max))?;

        self.f = f;
        self.g = g;
        self.sb = sb;
        self.rbs = 2.0 * PI / sb;
        self.min = min;
        self.max = max;
        self.q = q;
        self.theta = self.admissible(self.theta);
        Ok(())
    }

    pub fn set_domain(&mut self, min: f64, max: f64) -> Result<()> {
        Self::check_domain(self.name, &self.f, min, max)?;
        self.q = Quantizer::new(1.0, self.f.eval(min), self.f.eval(max))?;
        self.min = min;
        self.max = max;
        self.theta = self.admissible(self.theta);
        Ok(())
    }

    /// Moves the axis, clamping to the domain and snapping to a step when
    /// quantization is enabled.
    pub fn set_theta(&mut self, theta: f64) -> Result<()> {
        ensure_finite(self.name, theta)?;
        if !self.contains(theta) {
            warn!(
                axis = self.name,
                requested = theta,
                min = self.min,
                max = self.max,
                "angle outside the axis domain, clamping"
            );
        }
        self.theta = self.admissible(theta);
        Ok(())
    }

    /// Nearest admissible value: clamped, then quantized if enabled.
    fn admissible(&self, theta: f64) -> f64 {
        let theta = theta.clamp(self.min, self.max);
        if self.quantify {
            self.g.eval(self.q.quantize(self.f.eval(theta))).clamp(self.min, self.max)
        } else {
            theta
        }
    }

    /// Current position in the step domain.
    pub fn p(&self) -> f64 {
        let p = self.f.eval(self.theta);
        if self.quantify {
            self.q.quantize(p)
        } else {
            p
        }
    }

    pub fn set_p(&mut self, p: f64) -> Result<()> {
        ensure_finite(self.name, p)?;
        self.set_theta(self.g.eval(p))
    }

    /// Enables or disables quantization. Enabling snaps the current angle.
    pub fn set_quantify(&mut self, quantify: bool) {
        self.quantify = quantify;
        self.theta = self.admissible(self.theta);
    }

    /// Restores a previously saved state verbatim, without snapping.
    pub(crate) fn restore(&mut self, theta: f64, quantify: bool) {
        self.theta = theta;
        self.quantify = quantify;
    }

    /// Range of integer steps inside the quantizer domain.
    pub fn step_bounds(&self) -> (i64, i64) {
        (self.q.first_index(), self.q.last_index())
    }

    pub fn theta_of_step(&self, p: f64) -> f64 {
        self.g.eval(p)
    }

    pub fn step_of_theta(&self, theta: f64) -> f64 {
        self.f.eval(theta)
    }

    /// Turn offsets `k` for which `theta + 2πk` lies inside the domain.
    fn turns_inside(&self, theta: f64) -> (i64, i64) {
        let k_lo = ((self.min - theta) / (2.0 * PI) - DOMAIN_EPS).ceil() as i64;
        let k_hi = ((self.max - theta) / (2.0 * PI) + DOMAIN_EPS).floor() as i64;
        (k_lo, k_hi)
    }

    /// Representation of the direction `theta` inside the domain, choosing
    /// the one closest to the current angle when several turns fit.
    pub fn fit(&self, theta: f64) -> Option<f64> {
        let (k_lo, k_hi) = self.turns_inside(theta);
        (k_lo..=k_hi)
            .map(|k| (theta + 2.0 * PI * k as f64).clamp(self.min, self.max))
            .min_by(|a, b| (a - self.theta).abs().total_cmp(&(b - self.theta).abs()))
    }

    /// Closest admissible angle to the direction `theta`, whether or not
    /// the direction itself lies inside the domain.
    pub fn nearest_angle(&self, theta: f64) -> f64 {
        if let Some(fitted) = self.fit(theta) {
            return fitted;
        }
        let (k_lo, k_hi) = self.turns_inside(theta);
        (k_hi - 1..=k_lo + 1)
            .map(|k| {
                let unwrapped = theta + 2.0 * PI * k as f64;
                let clamped = unwrapped.clamp(self.min, self.max);
                (clamped, (clamped - unwrapped).abs())
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(clamped, _)| clamped)
            .unwrap_or(self.min)
    }

    /// Sub-intervals of the domain covered by the periodic interval
    /// `[a, b] + 2πk`.
    pub fn periodic_overlap(&self, a: f64, b: f64) -> Vec<(f64, f64)> {
        if a > b {
            return Vec::new();
        }
        let k_lo = ((self.min - b) / (2.0 * PI)).ceil() as i64;
        let k_hi = ((self.max - a) / (2.0 * PI)).floor() as i64;
        (k_lo..=k_hi)
            .filter_map(|k| {
                let shift = 2.0 * PI * k as f64;
                let lo = (a + shift).max(self.min);
                let hi = (b + shift).min(self.max);
                (lo <= hi).then_some((lo, hi))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_axis(quantify: bool) -> QuantizedAxis {
        let f = Function::steps_per_turn(2.0 * PI).unwrap();
        QuantizedAxis::new("theta_1", f, 0.0, 2.0 * PI, quantify).unwrap()
    }

    #[test]
    fn test_derived_scalars() {
        let axis = identity_axis(false);
        assert!((axis.sb() - 2.0 * PI).abs() < 1e-12);
        assert!((axis.rbs() - 1.0).abs() < 1e-12);
        assert!((axis.sb() - 2.0 * PI / axis.rbs()).abs() < 1e-12);
    }

    #[test]
    fn test_step_view() {
        let mut axis = identity_axis(false);
        axis.set_theta(PI).unwrap();
        assert!((axis.p() - PI).abs() < 1e-12);

        axis.set_quantify(true);
        assert_eq!(axis.p(), 3.0);
        assert!((axis.theta() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_to_domain() {
        let mut axis = identity_axis(false);
        axis.set_theta(-1.0).unwrap();
        assert_eq!(axis.theta(), 0.0);
        axis.set_theta(10.0).unwrap();
        assert_eq!(axis.theta(), 2.0 * PI);
        assert!(axis.set_theta(f64::NAN).is_err());
    }

    #[test]
    fn test_non_monotonic_f_rejected() {
        let f = Function::new(vec![(0.0, 0.0), (PI, 10.0), (2.0 * PI, 5.0)]).unwrap();
        let err = QuantizedAxis::new("theta_1", f, 0.0, PI, false).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_set_f_clamps_domain() {
        let mut axis = identity_axis(false);
        axis.set_theta(5.0).unwrap();
        axis.set_f(Function::linear(0.0, 0.0, PI, 100.0).unwrap()).unwrap();
        assert_eq!(axis.max(), PI);
        assert_eq!(axis.theta(), PI);
        assert!((axis.sb() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_domain_validation() {
        let mut axis = identity_axis(false);
        assert!(axis.set_domain(1.0, 1.0).is_err());
        assert!(axis.set_domain(-1.0, 1.0).is_err());
        axis.set_domain(1.0, 2.0).unwrap();
        assert_eq!(axis.theta(), 1.0);
    }

    #[test]
    fn test_fit_and_nearest_angle() {
        let f = Function::steps_per_turn(100.0).unwrap();
        let mut axis = QuantizedAxis::new("theta_2", f, 0.0, PI, false).unwrap();
        axis.set_theta(1.0).unwrap();
        assert!((axis.fit(-2.0 * PI + 1.5).unwrap() - 1.5).abs() < 1e-12);
        assert!(axis.fit(-0.5).is_none());
        assert_eq!(axis.nearest_angle(-0.5), 0.0);
        assert_eq!(axis.nearest_angle(3.5), PI);
    }

    #[test]
    fn test_periodic_overlap() {
        let axis = identity_axis(false);
        let pieces = axis.periodic_overlap(-0.5, 0.5);
        assert_eq!(pieces.len(), 2);
        assert!(pieces.contains(&(0.0, 0.5)));
        assert!(pieces
            .iter()
            .any(|&(lo, hi)| (lo - (2.0 * PI - 0.5)).abs() < 1e-12 && hi == 2.0 * PI));
    }
}
