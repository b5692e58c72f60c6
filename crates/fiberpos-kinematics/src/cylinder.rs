//! Axis-1 kinematic model of a positioner.
//!
//! A cylinder is anchored at P0 and rotates the arm pivot P1 about it at
//! distance L01. It exclusively owns its [`Arm`] and its [`Barrier`]; every
//! mutator ends in `refresh_dependents` so both always reflect
//! the current state.

use crate::arm::Arm;
use crate::axis::QuantizedAxis;
use crate::barrier::Barrier;
use crate::frames::{rec_to_pol, Frame};
use crate::guard::AxisStateGuard;
use fiberpos_core::error::ensure_finite;
use fiberpos_core::{Contour, ContourShape, Error, Function, Point, Result};
use std::f64::consts::PI;

/// Default mechanical parameters of a positioner.
pub mod defaults {
    /// Distance P0-P1 (mm).
    pub const L01: f64 = 1.443;
    /// Distance P1-P3 (mm).
    pub const L13: f64 = 1.443;
    /// Steps per turn of the axis-1 motor.
    pub const SB1: f64 = 1728.0;
    /// Steps per turn of the axis-2 motor.
    pub const SB2: f64 = 1728.0;
    pub const THETA_O3O: f64 = std::f64::consts::PI;
    pub const THETA_1_MIN: f64 = 0.0;
    pub const THETA_1_MAX: f64 = 2.0 * std::f64::consts::PI;
    pub const THETA_2_MIN: f64 = 0.0;
    pub const THETA_2_MAX: f64 = std::f64::consts::PI;
    /// Half width of the arm outline (mm).
    pub const ARM_HALF_WIDTH: f64 = 0.35;
}

/// Two-joint positioner kinematics.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    p0: Point,
    l01: f64,
    theta_o1: f64,
    axis: QuantizedAxis,
    arm: Arm,
    barrier: Barrier,
    // derived
    l0: f64,
    theta0: f64,
    p1: Point,
}

impl Cylinder {
    /// Creates a cylinder with default mechanics anchored at `p0`.
    pub fn new(p0: Point, theta_o1: f64) -> Result<Self> {
        let axis = QuantizedAxis::new(
            "theta_1",
            Function::steps_per_turn(defaults::SB1)?,
            defaults::THETA_1_MIN,
            defaults::THETA_1_MAX,
            true,
        )?;
        let axis2 = QuantizedAxis::new(
            "theta_2",
            Function::steps_per_turn(defaults::SB2)?,
            defaults::THETA_2_MIN,
            defaults::THETA_2_MAX,
            true,
        )?;
        let arm = Arm::new(
            defaults::L13,
            defaults::THETA_O3O,
            axis2,
            Contour::capsule(defaults::L13, defaults::ARM_HALF_WIDTH),
        )?;
        Self::from_parts(p0, defaults::L01, theta_o1, axis, arm, Contour::default())
    }

    /// Assembles a cylinder from validated parts.
    pub fn from_parts(
        p0: Point,
        l01: f64,
        theta_o1: f64,
        axis: QuantizedAxis,
        arm: Arm,
        barrier_contour: Contour,
    ) -> Result<Self> {
        check_point("P0", p0)?;
        check_length(l01)?;
        ensure_finite("thetaO1", theta_o1)?;
        let mut cylinder = Self {
            p0,
            l01,
            theta_o1,
            axis,
            arm,
            barrier: Barrier::new(barrier_contour, p0, theta_o1),
            l0: 0.0,
            theta0: 0.0,
            p1: p0,
        };
        cylinder.refresh_dependents();
        Ok(cylinder)
    }

    /// Recomputes every derived quantity and the placement of the arm and
    /// the barrier.
    fn refresh_dependents(&mut self) {
        let (l0, theta0) = rec_to_pol(self.p0);
        self.l0 = l0;
        self.theta0 = theta0;
        self.p1 = self.p0 + Point::from_polar(self.l01, self.theta_o1 + self.axis.theta());
        self.arm.set_base(self.p1, self.theta_o1 + self.axis.theta() + PI);
        self.barrier.set_placement(self.p0, self.theta_o1);
    }

    //------------------------------------------------------------------
    // accessors

    pub fn p0(&self) -> Point {
        self.p0
    }

    /// Polar radius of P0 in S0.
    pub fn l0(&self) -> f64 {
        self.l0
    }

    /// Polar angle of P0 in S0.
    pub fn theta0(&self) -> f64 {
        self.theta0
    }

    pub fn l01(&self) -> f64 {
        self.l01
    }

    pub fn theta_o1(&self) -> f64 {
        self.theta_o1
    }

    pub fn axis1(&self) -> &QuantizedAxis {
        &self.axis
    }

    pub fn axis2(&self) -> &QuantizedAxis {
        self.arm.axis()
    }

    pub fn arm(&self) -> &Arm {
        &self.arm
    }

    pub fn arm_mut(&mut self) -> &mut Arm {
        &mut self.arm
    }

    pub fn barrier(&self) -> &Barrier {
        &self.barrier
    }

    /// Axis-1 angle in S1.
    pub fn theta_1(&self) -> f64 {
        self.axis.theta()
    }

    /// Orientation of the line P0→P1 in S0.
    pub fn theta1(&self) -> f64 {
        self.theta_o1 + self.axis.theta()
    }

    pub fn theta_2(&self) -> f64 {
        self.arm.theta_2()
    }

    pub fn p_1(&self) -> f64 {
        self.axis.p()
    }

    pub fn p_2(&self) -> f64 {
        self.arm.p_2()
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    /// Fiber tip in S0.
    pub fn p3(&self) -> Point {
        self.arm.p3()
    }

    //------------------------------------------------------------------
    // setters

    pub fn set_p0(&mut self, p0: Point) -> Result<()> {
        check_point("P0", p0)?;
        self.p0 = p0;
        self.refresh_dependents();
        Ok(())
    }

    pub fn set_l01(&mut self, l01: f64) -> Result<()> {
        check_length(l01)?;
        self.l01 = l01;
        self.refresh_dependents();
        Ok(())
    }

    pub fn set_theta_o1(&mut self, theta_o1: f64) -> Result<()> {
        ensure_finite("thetaO1", theta_o1)?;
        self.theta_o1 = theta_o1;
        self.refresh_dependents();
        Ok(())
    }

    pub fn set_theta_1(&mut self, theta_1: f64) -> Result<()> {
        self.axis.set_theta(theta_1)?;
        self.refresh_dependents();
        Ok(())
    }

    /// Points the line P0→P1 towards the S0 orientation `theta1`.
    pub fn set_theta1(&mut self, theta1: f64) -> Result<()> {
        ensure_finite("theta1", theta1)?;
        let theta_1 = self.axis.nearest_angle(theta1 - self.theta_o1);
        self.set_theta_1(theta_1)
    }

    pub fn set_p_1(&mut self, p_1: f64) -> Result<()> {
        self.axis.set_p(p_1)?;
        self.refresh_dependents();
        Ok(())
    }

    pub fn set_theta_1_domain(&mut self, min: f64, max: f64) -> Result<()> {
        self.axis.set_domain(min, max)?;
        self.refresh_dependents();
        Ok(())
    }

    pub fn set_f1(&mut self, f: Function) -> Result<()> {
        self.axis.set_f(f)?;
        self.refresh_dependents();
        Ok(())
    }

    pub fn set_quantify_1(&mut self, quantify: bool) {
        self.axis.set_quantify(quantify);
        self.refresh_dependents();
    }

    pub fn set_theta_2(&mut self, theta_2: f64) -> Result<()> {
        self.arm.set_theta_2(theta_2)
    }

    pub fn set_p_2(&mut self, p_2: f64) -> Result<()> {
        self.arm.set_p_2(p_2)
    }

    pub fn set_quantify_2(&mut self, quantify: bool) {
        self.arm.set_quantify_2(quantify);
    }

    /// Enables or disables quantization on both axes.
    pub fn set_quantify(&mut self, quantify: bool) {
        self.set_quantify_1(quantify);
        self.set_quantify_2(quantify);
    }

    pub fn set_barrier_contour(&mut self, local: Contour) {
        self.barrier.set_contour(local);
    }

    /// Saves both axes and returns a guard restoring them when dropped.
    pub fn save_state(&mut self) -> AxisStateGuard<'_> {
        AxisStateGuard::new(self)
    }

    pub(crate) fn restore_axes(&mut self, theta_1: f64, quantify_1: bool, theta_2: f64, quantify_2: bool) {
        self.axis.restore(theta_1, quantify_1);
        self.arm.restore_axis(theta_2, quantify_2);
        self.refresh_dependents();
    }

    //------------------------------------------------------------------
    // frames

    /// S1 expressed in S0.
    pub fn s1_frame(&self) -> Frame {
        Frame::new(self.p0, self.theta_o1)
    }

    /// S2 expressed in S1.
    pub fn s2_frame(&self) -> Frame {
        let theta_1 = self.axis.theta();
        Frame::new(Point::from_polar(self.l01, theta_1), theta_1 + PI)
    }

    pub fn s0_to_s1(&self, p: Point) -> Point {
        self.s1_frame().to_local(p)
    }

    pub fn s1_to_s0(&self, p: Point) -> Point {
        self.s1_frame().to_parent(p)
    }

    pub fn s2_to_s1(&self, p: Point) -> Point {
        self.s2_frame().to_parent(p)
    }

    pub fn s1_to_s2(&self, p: Point) -> Point {
        self.s2_frame().to_local(p)
    }

    pub fn s3_to_s2(&self, p: Point) -> Point {
        self.arm.s3_to_s2(p)
    }

    /// Polar coordinates in S1 of a point given in S0.
    pub fn s0_to_s1_polar(&self, p: Point) -> (f64, f64) {
        rec_to_pol(self.s0_to_s1(p))
    }

    //------------------------------------------------------------------
    // radii

    /// Smallest distance P0-P3 the arm can reach.
    pub fn r_3min(&self) -> f64 {
        (self.l01 - self.arm.l13()).abs()
    }

    /// Largest distance P0-P3 the arm can reach.
    pub fn r_3max(&self) -> f64 {
        self.l01 + self.arm.l13()
    }

    /// Bounding radius about P0 of everything the cylinder moves or owns.
    pub fn r_max(&self) -> f64 {
        (self.l01 + self.arm.r_max()).max(self.barrier.r_max())
    }
}

fn check_length(l01: f64) -> Result<()> {
    if l01.is_finite() && l01 > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_argument("L01", "should be upper zero"))
    }
}

fn check_point(what: &str, p: Point) -> Result<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_argument(what, "coordinates should be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder() -> Cylinder {
        let mut c = Cylinder::new(Point::new(10.0, -5.0), 0.4).unwrap();
        c.set_quantify(false);
        c
    }

    #[test]
    fn test_defaults() {
        let c = Cylinder::new(Point::origin(), 0.0).unwrap();
        assert_eq!(c.l01(), defaults::L01);
        assert_eq!(c.arm().l13(), defaults::L13);
        assert!((c.axis1().sb() - defaults::SB1).abs() < 1e-9);
        assert!(c.r_3min().abs() < 1e-12);
        assert!((c.r_3max() - 2.0 * defaults::L01).abs() < 1e-12);
        assert!(c.barrier().contour().is_empty());
    }

    #[test]
    fn test_p1_follows_theta_1() {
        let mut c = cylinder();
        c.set_theta_1(PI / 2.0).unwrap();
        let expected = c.p0() + Point::from_polar(c.l01(), 0.4 + PI / 2.0);
        assert!(c.p1().distance_to(&expected) < 1e-12);
        assert!(c.arm().p1().distance_to(&expected) < 1e-12);

        c.set_l01(2.0).unwrap();
        let expected = c.p0() + Point::from_polar(2.0, 0.4 + PI / 2.0);
        assert!(c.p1().distance_to(&expected) < 1e-12);
    }

    #[test]
    fn test_frames_agree_with_p1_and_p3() {
        let mut c = cylinder();
        c.set_theta_1(1.1).unwrap();
        c.set_theta_2(0.7).unwrap();
        let p1 = c.s1_to_s0(c.s2_to_s1(Point::origin()));
        assert!(p1.distance_to(&c.p1()) < 1e-12);

        let tip_s3 = Point::new(c.arm().l13(), 0.0);
        let p3 = c.s1_to_s0(c.s2_to_s1(c.s3_to_s2(tip_s3)));
        assert!(p3.distance_to(&c.p3()) < 1e-12);
    }

    #[test]
    fn test_theta1_is_offset_by_theta_o1() {
        let mut c = cylinder();
        c.set_theta1(1.0).unwrap();
        assert!((c.theta_1() - 0.6).abs() < 1e-12);
        assert!((c.theta1() - 1.0).abs() < 1e-12);
        c.set_theta1(0.0).unwrap();
        assert!((c.theta_1() - (2.0 * PI - 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_setters_rejected() {
        let mut c = cylinder();
        assert!(c.set_l01(0.0).unwrap_err().is_invalid_argument());
        assert!(c.set_l01(-1.0).is_err());
        assert!(c.set_p0(Point::new(f64::NAN, 0.0)).is_err());
        assert!(c.set_theta_1_domain(2.0, 1.0).is_err());
        assert_eq!(c.l01(), defaults::L01);
    }

    #[test]
    fn test_domain_clamp() {
        let mut c = cylinder();
        c.set_theta_1_domain(0.5, 2.0).unwrap();
        c.set_theta_1(3.0).unwrap();
        assert_eq!(c.theta_1(), 2.0);
        c.set_theta_1(-3.0).unwrap();
        assert_eq!(c.theta_1(), 0.5);
    }

    #[test]
    fn test_r_max_covers_arm_and_barrier() {
        let mut c = cylinder();
        let reach = c.l01() + c.arm().r_max();
        assert!((c.r_max() - reach).abs() < 1e-12);
        c.set_barrier_contour(Contour::circle(Point::origin(), 10.0));
        assert_eq!(c.r_max(), 10.0);
    }
}
