//! Structured (de)serialization hooks.
//!
//! Every persistent entity exposes its state as a plain serde value. Setting
//! an instance validates the whole value first, so an invalid one leaves the
//! entity untouched.

use crate::arm::Arm;
use crate::axis::QuantizedAxis;
use crate::cylinder::{defaults, Cylinder};
use fiberpos_core::{Contour, Function, Point, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Access to the persistent state of an entity.
pub trait Instance {
    type Value: Serialize + DeserializeOwned;

    fn instance(&self) -> Self::Value;

    /// Replaces the state with `value`, or fails leaving it unchanged.
    fn set_instance(&mut self, value: Self::Value) -> Result<()>;
}

/// Step function of a default axis. The default step counts are positive
/// constants, so a rejection is an internal defect.
fn default_f(steps_per_turn: f64) -> Function {
    match Function::steps_per_turn(steps_per_turn) {
        Ok(f) => f,
        Err(e) => panic!("default step function rejected: {}", e),
    }
}

/// Persistent state of a [`Cylinder`] and its arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderInstance {
    pub p0: Point,
    pub theta_o1: f64,
    pub l01: f64,
    pub f1: Function,
    pub theta_1_min: f64,
    pub theta_1_max: f64,
    pub quantify_1: bool,
    pub theta_1: f64,
    pub l13: f64,
    pub theta_o3o: f64,
    pub f2: Function,
    pub theta_2_min: f64,
    pub theta_2_max: f64,
    pub quantify_2: bool,
    pub theta_2: f64,
    pub arm_contour: Contour,
    pub barrier_contour: Contour,
}

impl Default for CylinderInstance {
    fn default() -> Self {
        Self {
            p0: Point::origin(),
            theta_o1: 0.0,
            l01: defaults::L01,
            f1: default_f(defaults::SB1),
            theta_1_min: defaults::THETA_1_MIN,
            theta_1_max: defaults::THETA_1_MAX,
            quantify_1: true,
            theta_1: defaults::THETA_1_MIN,
            l13: defaults::L13,
            theta_o3o: defaults::THETA_O3O,
            f2: default_f(defaults::SB2),
            theta_2_min: defaults::THETA_2_MIN,
            theta_2_max: defaults::THETA_2_MAX,
            quantify_2: true,
            theta_2: defaults::THETA_2_MIN,
            arm_contour: Contour::capsule(defaults::L13, defaults::ARM_HALF_WIDTH),
            barrier_contour: Contour::default(),
        }
    }
}

impl Cylinder {
    /// Builds a cylinder from a persistent instance.
    pub fn from_instance(value: CylinderInstance) -> Result<Self> {
        let axis1 = QuantizedAxis::new(
            "theta_1",
            value.f1,
            value.theta_1_min,
            value.theta_1_max,
            value.quantify_1,
        )?;
        let axis2 = QuantizedAxis::new(
            "theta_2",
            value.f2,
            value.theta_2_min,
            value.theta_2_max,
            value.quantify_2,
        )?;
        let arm = Arm::new(value.l13, value.theta_o3o, axis2, value.arm_contour)?;
        let mut cylinder = Cylinder::from_parts(
            value.p0,
            value.l01,
            value.theta_o1,
            axis1,
            arm,
            value.barrier_contour,
        )?;
        cylinder.set_angles(value.theta_1, value.theta_2)?;
        Ok(cylinder)
    }
}

impl Instance for Cylinder {
    type Value = CylinderInstance;

    fn instance(&self) -> CylinderInstance {
        let axis1 = self.axis1();
        let axis2 = self.axis2();
        CylinderInstance {
            p0: self.p0(),
            theta_o1: self.theta_o1(),
            l01: self.l01(),
            f1: axis1.f().clone(),
            theta_1_min: axis1.min(),
            theta_1_max: axis1.max(),
            quantify_1: axis1.quantify(),
            theta_1: self.theta_1(),
            l13: self.arm().l13(),
            theta_o3o: self.arm().theta_o3o(),
            f2: axis2.f().clone(),
            theta_2_min: axis2.min(),
            theta_2_max: axis2.max(),
            quantify_2: axis2.quantify(),
            theta_2: self.theta_2(),
            arm_contour: self.arm().local_contour().clone(),
            barrier_contour: self.barrier().local_contour().clone(),
        }
    }

    fn set_instance(&mut self, value: CylinderInstance) -> Result<()> {
        *self = Cylinder::from_instance(value)?;
        Ok(())
    }
}
