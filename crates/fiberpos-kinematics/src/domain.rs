//! Reachable domain and target resolution.
//!
//! The fiber tip sweeps the annulus `r_3min <= |P3 - P0| <= r_3max`. With
//! `beta` the angle between P0→P1 and P1→P3, the law of cosines gives
//!
//! ```text
//! r_3² = L01² + L13² + 2·L01·L13·cos(beta)
//! ```
//!
//! which is all the inverse kinematics needs.

use crate::cylinder::Cylinder;
use fiberpos_core::error::ensure_finite;
use fiberpos_core::geometry::{
    circle_circle_intersection, circles_are_secant, clamp_acos, safe_sqrt,
};
use fiberpos_core::{Error, Point, Result};
use std::f64::consts::PI;
use tracing::debug;

const WINDOW_EPS: f64 = 1e-9;

/// Outcome of solving for the angles that place the fiber tip on a target.
///
/// Both variants carry admissible angles: the exact solution when the target
/// is reachable, otherwise the closest angles the axes allow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetResolution {
    Reachable { theta_1: f64, theta_2: f64 },
    Unreachable { theta_1: f64, theta_2: f64 },
}

impl TargetResolution {
    pub fn is_reachable(&self) -> bool {
        matches!(self, TargetResolution::Reachable { .. })
    }

    pub fn angles(&self) -> (f64, f64) {
        match *self {
            TargetResolution::Reachable { theta_1, theta_2 }
            | TargetResolution::Unreachable { theta_1, theta_2 } => (theta_1, theta_2),
        }
    }
}

/// Grid point found by [`Cylinder::nearest_stable_position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StablePosition {
    pub p_1: f64,
    pub p_2: f64,
    /// Distance between the fiber tip at this grid point and the target.
    pub distance: f64,
}

/// Angular interval `|phi - center| <= half` on a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Window {
    Empty,
    Full,
    Half(f64),
}

impl Window {
    fn half_width(self) -> Option<f64> {
        match self {
            Window::Empty => None,
            Window::Full => Some(PI),
            Window::Half(h) => Some(h),
        }
    }
}

/// Directions `phi` (about `c`) for which the point `c + l·(cos phi, sin phi)`
/// lies within `rho` of `p`, as a half width about the direction of `p`.
fn angular_window(c: Point, l: f64, p: Point, rho: f64) -> Window {
    if rho <= 0.0 {
        return Window::Empty;
    }
    let d = c.distance_to(&p);
    if (d - l).abs() >= rho {
        return Window::Empty;
    }
    if d + l <= rho {
        return Window::Full;
    }
    assert!(
        circles_are_secant(c, l, p, rho),
        "circles ({:?}, {}) and ({:?}, {}) should be secant",
        c,
        l,
        p,
        rho
    );
    let points = circle_circle_intersection(c, l, p, rho);
    let Some(q) = points.first() else {
        panic!("secant circles without intersection");
    };
    let delta = (*q - c).angle() - (p - c).angle();
    Window::Half(delta.sin().atan2(delta.cos()).abs())
}

impl Cylinder {
    /// Angle `beta` between P0→P1 and P1→P3 placing P3 at distance `r_3`
    /// from P0, clamped into `[0, π]`.
    fn beta_of_r_3(&self, r_3: f64) -> f64 {
        let l01 = self.l01();
        let l13 = self.arm().l13();
        let c = (r_3 * r_3 - l01 * l01 - l13 * l13) / (2.0 * l01 * l13);
        clamp_acos(c)
    }

    /// Distance P0-P3 for a given axis-2 angle.
    pub fn r_3_of_theta_2(&self, theta_2: f64) -> f64 {
        let l01 = self.l01();
        let l13 = self.arm().l13();
        let beta = self.arm().beta(theta_2);
        safe_sqrt(l01 * l01 + l13 * l13 + 2.0 * l01 * l13 * beta.cos())
    }

    /// Axis-2 angle placing P3 at distance `r_3` from P0, if the axis allows
    /// one.
    pub fn theta_2_to_go_r_3(&self, r_3: f64) -> Option<f64> {
        if !r_3.is_finite() || r_3 < self.r_3min() || r_3 > self.r_3max() {
            return None;
        }
        let beta = self.beta_of_r_3(r_3);
        let axis = self.axis2();
        axis.fit(self.arm().theta_2_of_beta(beta))
            .or_else(|| axis.fit(self.arm().theta_2_of_beta(-beta)))
    }

    /// Fiber tip in S0 for the given angles, leaving the cylinder untouched.
    pub fn p3_of_angles(&self, theta_1: f64, theta_2: f64) -> Point {
        let phi = self.theta_o1() + theta_1;
        let beta = self.arm().beta(theta_2);
        self.p0()
            + Point::from_polar(self.l01(), phi)
            + Point::from_polar(self.arm().l13(), phi + beta)
    }

    /// Angles placing P3 at the S1 polar coordinates `(r_3, theta_3)`.
    pub fn angles_to_go_polar(&self, r_3: f64, theta_3: f64) -> Result<TargetResolution> {
        ensure_finite("r_3", r_3)?;
        ensure_finite("theta_3", theta_3)?;
        let in_range = r_3 >= self.r_3min() && r_3 <= self.r_3max();
        let beta = self.beta_of_r_3(r_3);
        let l01 = self.l01();
        let l13 = self.arm().l13();

        let target = self.s1_to_s0(Point::from_polar(r_3, theta_3));
        let mut nearest: Option<(f64, f64, f64)> = None;
        for beta in [beta, -beta] {
            let theta_1 = theta_3 - (l13 * beta.sin()).atan2(l01 + l13 * beta.cos());
            let theta_2 = self.arm().theta_2_of_beta(beta);
            if in_range {
                if let (Some(t1), Some(t2)) = (self.axis1().fit(theta_1), self.axis2().fit(theta_2)) {
                    return Ok(TargetResolution::Reachable {
                        theta_1: t1,
                        theta_2: t2,
                    });
                }
            }
            let t1 = self.axis1().nearest_angle(theta_1);
            let t2 = self.axis2().nearest_angle(theta_2);
            let d = self.p3_of_angles(t1, t2).distance_to(&target);
            if nearest.map_or(true, |(_, _, best)| d < best) {
                nearest = Some((t1, t2, d));
            }
        }
        let (theta_1, theta_2) = nearest
            .map(|(t1, t2, _)| (t1, t2))
            .unwrap_or((self.theta_1(), self.theta_2()));
        Ok(TargetResolution::Unreachable { theta_1, theta_2 })
    }

    /// Angles placing P3 on the S0 point `p`.
    pub fn angles_to_go_p3(&self, p: Point) -> Result<TargetResolution> {
        if !p.is_finite() {
            return Err(Error::invalid_argument("P3", "coordinates should be finite"));
        }
        let (r_3, theta_3) = self.s0_to_s1_polar(p);
        self.angles_to_go_polar(r_3, theta_3)
    }

    pub fn set_angles(&mut self, theta_1: f64, theta_2: f64) -> Result<()> {
        ensure_finite("theta_1", theta_1)?;
        ensure_finite("theta_2", theta_2)?;
        self.set_theta_1(theta_1)?;
        self.set_theta_2(theta_2)
    }

    pub fn set_steps(&mut self, p_1: f64, p_2: f64) -> Result<()> {
        ensure_finite("p_1", p_1)?;
        ensure_finite("p_2", p_2)?;
        self.set_p_1(p_1)?;
        self.set_p_2(p_2)
    }

    /// Moves P3 as close as the axes allow to `p`, returning whether `p` was
    /// reachable.
    pub fn move_to_p3(&mut self, p: Point) -> Result<bool> {
        let resolution = self.angles_to_go_p3(p)?;
        let (theta_1, theta_2) = resolution.angles();
        self.set_angles(theta_1, theta_2)?;
        Ok(resolution.is_reachable())
    }

    /// Step ranges of axis 1 whose pivot P1 can bring P3 within `radius` of
    /// `target`.
    fn axis1_step_windows(&self, target: Point, radius: f64) -> Vec<(i64, i64)> {
        let l13 = self.arm().l13();
        let outer = angular_window(self.p0(), self.l01(), target, l13 + radius + WINDOW_EPS);
        let inner = angular_window(self.p0(), self.l01(), target, l13 - radius - WINDOW_EPS);
        let Some(h_out) = outer.half_width() else {
            return Vec::new();
        };
        let h_in = match inner {
            Window::Full => return Vec::new(),
            Window::Empty => 0.0,
            Window::Half(h) => h,
        };
        let toward = (target - self.p0()).angle() - self.theta_o1();
        let intervals = if h_in == 0.0 {
            vec![(toward - h_out, toward + h_out)]
        } else {
            vec![(toward + h_in, toward + h_out), (toward - h_out, toward - h_in)]
        };
        let axis = self.axis1();
        let (first, last) = axis.step_bounds();
        intervals
            .into_iter()
            .flat_map(|(a, b)| axis.periodic_overlap(a - WINDOW_EPS, b + WINDOW_EPS))
            .map(|(lo, hi)| step_range(axis.step_of_theta(lo), axis.step_of_theta(hi), first, last))
            .filter(|(lo, hi)| lo <= hi)
            .collect()
    }

    /// Step ranges of axis 2 whose fold keeps `|P3 - P0|` compatible with a
    /// point within `radius` of `target`.
    fn axis2_step_windows(&self, target: Point, radius: f64) -> Vec<(i64, i64)> {
        let d = self.p0().distance_to(&target);
        let r_lo = (d - radius).max(self.r_3min());
        let r_hi = (d + radius).min(self.r_3max());
        if r_lo > r_hi {
            return Vec::new();
        }
        let beta_lo = (self.beta_of_r_3(r_hi) - WINDOW_EPS).max(0.0);
        let beta_hi = (self.beta_of_r_3(r_lo) + WINDOW_EPS).min(PI);
        let arm = self.arm();
        let axis = self.axis2();
        let (first, last) = axis.step_bounds();
        [(beta_lo, beta_hi), (-beta_hi, -beta_lo)]
            .into_iter()
            .map(|(a, b)| (arm.theta_2_of_beta(a), arm.theta_2_of_beta(b)))
            .flat_map(|(a, b)| axis.periodic_overlap(a, b))
            .map(|(lo, hi)| step_range(axis.step_of_theta(lo), axis.step_of_theta(hi), first, last))
            .filter(|(lo, hi)| lo <= hi)
            .collect()
    }

    /// Grid point whose fiber tip is closest to the tip at the given angles.
    ///
    /// The four grid corners around the exact target bound the search radius;
    /// every grid point that could beat them lies inside the angular windows
    /// derived from that radius, and those are scanned exhaustively. The axes
    /// are left as they were.
    pub fn nearest_stable_position(&mut self, theta_1: f64, theta_2: f64) -> Result<StablePosition> {
        let mut guard = self.save_state();
        guard.set_quantify(false);
        guard.set_angles(theta_1, theta_2)?;
        let target = guard.p3();
        let (p_1, p_2) = (guard.p_1(), guard.p_2());
        let (first_1, last_1) = guard.axis1().step_bounds();
        let (first_2, last_2) = guard.axis2().step_bounds();
        if first_1 > last_1 || first_2 > last_2 {
            return Err(Error::improper_call(
                "nearest_stable_position",
                "an axis domain holds no whole step",
            ));
        }

        let distance_at = |s1: i64, s2: i64| {
            let t1 = guard.axis1().theta_of_step(s1 as f64);
            let t2 = guard.axis2().theta_of_step(s2 as f64);
            guard.p3_of_angles(t1, t2).distance_to(&target)
        };

        let mut best = StablePosition {
            p_1: f64::NAN,
            p_2: f64::NAN,
            distance: f64::INFINITY,
        };
        let corners_1 = [p_1.floor(), p_1.ceil()].map(|s| (s as i64).clamp(first_1, last_1));
        let corners_2 = [p_2.floor(), p_2.ceil()].map(|s| (s as i64).clamp(first_2, last_2));
        for s1 in corners_1 {
            for s2 in corners_2 {
                let d = distance_at(s1, s2);
                if d < best.distance {
                    best = StablePosition {
                        p_1: s1 as f64,
                        p_2: s2 as f64,
                        distance: d,
                    };
                }
                if d == 0.0 {
                    return Ok(best);
                }
            }
        }

        let windows_1 = guard.axis1_step_windows(target, best.distance);
        let windows_2 = guard.axis2_step_windows(target, best.distance);
        let mut scanned = 0usize;
        for &(lo_1, hi_1) in &windows_1 {
            for s1 in lo_1..=hi_1 {
                for &(lo_2, hi_2) in &windows_2 {
                    for s2 in lo_2..=hi_2 {
                        scanned += 1;
                        let d = distance_at(s1, s2);
                        if d < best.distance {
                            best = StablePosition {
                                p_1: s1 as f64,
                                p_2: s2 as f64,
                                distance: d,
                            };
                        }
                    }
                }
            }
        }
        debug!(
            scanned,
            p_1 = best.p_1,
            p_2 = best.p_2,
            distance = best.distance,
            "nearest stable position"
        );
        Ok(best)
    }
}

fn step_range(lo: f64, hi: f64, first: i64, last: i64) -> (i64, i64) {
    ((lo.ceil() as i64).max(first), (hi.floor() as i64).min(last))
}
