//! Axis-2 kinematic model: the arm carrying the fiber.
//!
//! The arm rotates about P1 (the end of axis 1). Its own frame S3 has the
//! x axis pointing from P1 to the fiber tip P3, so the arm outline can be
//! described once and placed wherever the axes take it.

use crate::axis::QuantizedAxis;
use crate::frames::Frame;
use fiberpos_core::error::ensure_finite;
use fiberpos_core::{Contour, ContourShape, Error, Function, Point, Result};
use std::f64::consts::PI;

/// Second joint of a positioner plus its collision outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    l13: f64,
    theta_o3o: f64,
    axis: QuantizedAxis,
    local: Contour,
    // placement, owned by the cylinder
    p1: Point,
    theta_s2: f64,
    // derived
    p3: Point,
    contour: Contour,
    r_max: f64,
}

impl Arm {
    pub fn new(l13: f64, theta_o3o: f64, axis: QuantizedAxis, local: Contour) -> Result<Self> {
        check_length(l13)?;
        ensure_finite("thetaO3o", theta_o3o)?;
        let r_max = local.r_max();
        let mut arm = Self {
            l13,
            theta_o3o,
            axis,
            local,
            p1: Point::origin(),
            theta_s2: PI,
            p3: Point::origin(),
            contour: Contour::default(),
            r_max,
        };
        arm.refresh();
        Ok(arm)
    }

    /// Distance from P1 to the fiber tip P3.
    pub fn l13(&self) -> f64 {
        self.l13
    }

    /// Orientation of S3 in S2 when `theta_2` is zero.
    pub fn theta_o3o(&self) -> f64 {
        self.theta_o3o
    }

    pub fn axis(&self) -> &QuantizedAxis {
        &self.axis
    }

    /// Current axis-2 angle.
    pub fn theta_2(&self) -> f64 {
        self.axis.theta()
    }

    /// Current axis-2 position in steps.
    pub fn p_2(&self) -> f64 {
        self.axis.p()
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    /// Fiber tip in S0.
    pub fn p3(&self) -> Point {
        self.p3
    }

    /// Orientation in S0 of the line P1→P3.
    pub fn theta3(&self) -> f64 {
        self.theta_s2 + self.theta_o3o + self.axis.theta()
    }

    /// Angle between the line P0→P1 and the line P1→P3 for a given `theta_2`.
    pub fn beta(&self, theta_2: f64) -> f64 {
        theta_2 + self.theta_o3o - PI
    }

    /// Inverse of [`Arm::beta`].
    pub fn theta_2_of_beta(&self, beta: f64) -> f64 {
        beta - self.theta_o3o + PI
    }

    pub fn local_contour(&self) -> &Contour {
        &self.local
    }

    pub fn set_l13(&mut self, l13: f64) -> Result<()> {
        check_length(l13)?;
        self.l13 = l13;
        self.refresh();
        Ok(())
    }

    pub fn set_theta_o3o(&mut self, theta_o3o: f64) -> Result<()> {
        ensure_finite("thetaO3o", theta_o3o)?;
        self.theta_o3o = theta_o3o;
        self.refresh();
        Ok(())
    }

    pub fn set_theta_2(&mut self, theta_2: f64) -> Result<()> {
        self.axis.set_theta(theta_2)?;
        self.refresh();
        Ok(())
    }

    pub fn set_p_2(&mut self, p_2: f64) -> Result<()> {
        self.axis.set_p(p_2)?;
        self.refresh();
        Ok(())
    }

    pub fn set_theta_2_domain(&mut self, min: f64, max: f64) -> Result<()> {
        self.axis.set_domain(min, max)?;
        self.refresh();
        Ok(())
    }

    pub fn set_f2(&mut self, f: Function) -> Result<()> {
        self.axis.set_f(f)?;
        self.refresh();
        Ok(())
    }

    pub fn set_quantify_2(&mut self, quantify: bool) {
        self.axis.set_quantify(quantify);
        self.refresh();
    }

    pub fn set_contour(&mut self, local: Contour) {
        self.r_max = local.r_max();
        self.local = local;
        self.refresh();
    }

    /// S3 expressed in S2.
    pub fn s3_frame(&self) -> Frame {
        Frame::new(Point::origin(), self.theta_o3o + self.axis.theta())
    }

    pub fn s3_to_s2(&self, p: Point) -> Point {
        self.s3_frame().to_parent(p)
    }

    pub fn s2_to_s3(&self, p: Point) -> Point {
        self.s3_frame().to_local(p)
    }

    pub(crate) fn restore_axis(&mut self, theta_2: f64, quantify: bool) {
        self.axis.restore(theta_2, quantify);
        self.refresh();
    }

    /// Places the arm: `p1` in S0 and the orientation of S2 in S0.
    pub(crate) fn set_base(&mut self, p1: Point, theta_s2: f64) {
        self.p1 = p1;
        self.theta_s2 = theta_s2;
        self.refresh();
    }

    fn refresh(&mut self) {
        let theta3 = self.theta3();
        self.p3 = self.p1 + Point::from_polar(self.l13, theta3);
        self.contour = self.local.placed(self.p1, theta3);
    }
}

impl ContourShape for Arm {
    fn contour(&self) -> &Contour {
        &self.contour
    }

    /// Bounding radius of the outline about P1.
    fn r_max(&self) -> f64 {
        self.r_max
    }
}

fn check_length(l13: f64) -> Result<()> {
    if l13.is_finite() && l13 > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_argument("L13", "should be upper zero"))
    }
}
