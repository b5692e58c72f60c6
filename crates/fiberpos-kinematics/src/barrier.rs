//! Fixed collision contours anchored at a point.

use fiberpos_core::{Contour, ContourShape, Point};

/// A contour fixed to an anchor point and orientation.
///
/// The local contour is expressed in the anchor frame; the placed copy is
/// kept in S0 and recomputed whenever the contour or the anchor changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    local: Contour,
    p0: Point,
    theta_o1: f64,
    contour: Contour,
    r_max: f64,
}

impl Barrier {
    pub fn new(local: Contour, p0: Point, theta_o1: f64) -> Self {
        let r_max = local.r_max();
        let contour = local.placed(p0, theta_o1);
        Self {
            local,
            p0,
            theta_o1,
            contour,
            r_max,
        }
    }

    pub fn local_contour(&self) -> &Contour {
        &self.local
    }

    pub fn p0(&self) -> Point {
        self.p0
    }

    pub fn theta_o1(&self) -> f64 {
        self.theta_o1
    }

    pub fn set_contour(&mut self, local: Contour) {
        self.r_max = local.r_max();
        self.local = local;
        self.contour = self.local.placed(self.p0, self.theta_o1);
    }

    /// Moves the anchor of the barrier.
    pub fn set_placement(&mut self, p0: Point, theta_o1: f64) {
        self.p0 = p0;
        self.theta_o1 = theta_o1;
        self.contour = self.local.placed(p0, theta_o1);
    }
}

impl ContourShape for Barrier {
    fn contour(&self) -> &Contour {
        &self.contour
    }

    fn r_max(&self) -> f64 {
        self.r_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_moves_contour() {
        let mut barrier = Barrier::new(Contour::circle(Point::origin(), 1.0), Point::origin(), 0.0);
        assert_eq!(barrier.r_max(), 1.0);
        barrier.set_placement(Point::new(5.0, 0.0), 0.3);
        assert!((barrier.distance_min(Point::new(5.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((barrier.distance_min(Point::new(8.0, 0.0)) - 2.0).abs() < 1e-12);
        assert_eq!(barrier.r_max(), 1.0);
    }
}
