//! Piecewise-linear sample functions.
//!
//! Axis step functions (`F`: angle → step) are tabulated as sorted samples
//! and evaluated by linear interpolation. Their inverse (`G`) is obtained by
//! swapping the sample coordinates, which is only valid for strictly
//! increasing tables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A tabulated function `y = f(x)` with strictly increasing abscissae.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Function {
    points: Vec<(f64, f64)>,
}

impl Function {
    /// Builds a function from samples in any order.
    ///
    /// Fails if there are no samples, a sample is not finite, or two
    /// samples share the same abscissa.
    pub fn new(mut points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::invalid_argument("function", "should have at least one point"));
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(Error::invalid_argument("function", "points should be finite"));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if points.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(Error::invalid_argument("function", "abscissae should be unique"));
        }
        Ok(Self { points })
    }

    /// Straight line through `(x0, y0)` and `(x1, y1)`.
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self> {
        Self::new(vec![(x0, y0), (x1, y1)])
    }

    /// Proportional step function `F(θ) = steps_per_turn·θ/2π` on [0, 2π].
    pub fn steps_per_turn(steps_per_turn: f64) -> Result<Self> {
        if !steps_per_turn.is_finite() || steps_per_turn <= 0.0 {
            return Err(Error::invalid_argument(
                "steps per turn",
                format!("should be a positive finite number, got {}", steps_per_turn),
            ));
        }
        Ok(Self {
            points: vec![(0.0, 0.0), (2.0 * std::f64::consts::PI, steps_per_turn)],
        })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_first(&self) -> f64 {
        self.points[0].0
    }

    pub fn x_last(&self) -> f64 {
        self.points[self.points.len() - 1].0
    }

    /// Closed interval of definition `[x_first, x_last]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.x_first(), self.x_last())
    }

    pub fn in_domain(&self, x: f64) -> bool {
        x >= self.x_first() && x <= self.x_last()
    }

    /// Evaluates by linear interpolation, clamping outside the domain.
    pub fn eval(&self, x: f64) -> f64 {
        let pts = &self.points;
        if x <= pts[0].0 {
            return pts[0].1;
        }
        let last = pts[pts.len() - 1];
        if x >= last.0 {
            return last.1;
        }
        let i = pts.partition_point(|p| p.0 <= x);
        let (x0, y0) = pts[i - 1];
        let (x1, y1) = pts[i];
        if x == x0 {
            return y0;
        }
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.points.windows(2).all(|w| w[1].1 > w[0].1)
    }

    /// Inverse function, defined only for strictly increasing tables.
    pub fn inverse(&self) -> Result<Self> {
        if !self.is_strictly_increasing() {
            return Err(Error::invalid_argument(
                "function",
                "should be monotonically increasing to be inverted",
            ));
        }
        Ok(Self {
            points: self.points.iter().map(|&(x, y)| (y, x)).collect(),
        })
    }
}

impl TryFrom<Vec<(f64, f64)>> for Function {
    type Error = Error;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Function> for Vec<(f64, f64)> {
    fn from(f: Function) -> Self {
        f.points
    }
}
