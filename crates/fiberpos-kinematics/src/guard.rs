//! Scoped save and restore of the axis state.

use crate::cylinder::Cylinder;
use std::ops::{Deref, DerefMut};

/// Snapshot of both axes of a [`Cylinder`], restored when the guard drops.
///
/// Searches that move the axes to try candidate positions hold one of these,
/// so the cylinder returns to its initial angles and quantization flags on
/// every exit path.
pub struct AxisStateGuard<'a> {
    cylinder: &'a mut Cylinder,
    theta_1: f64,
    quantify_1: bool,
    theta_2: f64,
    quantify_2: bool,
}

impl<'a> AxisStateGuard<'a> {
    pub(crate) fn new(cylinder: &'a mut Cylinder) -> Self {
        let theta_1 = cylinder.theta_1();
        let quantify_1 = cylinder.axis1().quantify();
        let theta_2 = cylinder.theta_2();
        let quantify_2 = cylinder.axis2().quantify();
        Self {
            cylinder,
            theta_1,
            quantify_1,
            theta_2,
            quantify_2,
        }
    }

    pub fn saved_theta_1(&self) -> f64 {
        self.theta_1
    }

    pub fn saved_theta_2(&self) -> f64 {
        self.theta_2
    }
}

impl Deref for AxisStateGuard<'_> {
    type Target = Cylinder;

    fn deref(&self) -> &Cylinder {
        self.cylinder
    }
}

impl DerefMut for AxisStateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Cylinder {
        self.cylinder
    }
}

impl Drop for AxisStateGuard<'_> {
    fn drop(&mut self) {
        self.cylinder
            .restore_axes(self.theta_1, self.quantify_1, self.theta_2, self.quantify_2);
    }
}
