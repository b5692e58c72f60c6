//! Continuous-path feasibility of the fiber tip.
//!
//! The boundary of the reachable domain is made of circular arcs: the outer
//! sweep of the extended arm, the inner sweep of the folded arm and, when
//! axis 1 does not turn fully, the two arcs traced by folding the arm at
//! either end of the axis-1 domain.

use crate::cylinder::Cylinder;
use fiberpos_core::{Arc, Point, Result, Segment};
use std::f64::consts::PI;

/// Arcs bounding the domain of P3, in S0.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryArcs {
    /// Sweep of the fully extended arm, radius `r_3max` about P0.
    pub outer: Arc,
    /// Sweep of the fully folded arm, radius `r_3min` about P0.
    pub inner: Option<Arc>,
    /// Folding at the lower end of the axis-1 domain.
    pub lower: Arc,
    /// Folding at the upper end of the axis-1 domain.
    pub upper: Arc,
}

impl BoundaryArcs {
    fn sweep_arcs(&self) -> impl Iterator<Item = &Arc> {
        std::iter::once(&self.outer).chain(self.inner.as_ref())
    }

    fn fold_arcs(&self) -> impl Iterator<Item = &Arc> {
        [&self.lower, &self.upper].into_iter()
    }
}

impl Cylinder {
    pub fn boundary_arcs(&self) -> BoundaryArcs {
        let axis1 = self.axis1();
        let axis2 = self.axis2();
        let arm = self.arm();
        let phi_min = self.theta_o1() + axis1.min();
        let span_1 = axis1.span();

        let outer = Arc::from_angles(self.p0(), self.r_3max(), phi_min, span_1);
        let r_3min = self.r_3min();
        let inner = (r_3min > 0.0).then(|| {
            // The folded tip points away from P1 when the arm outreaches L01.
            let offset = if arm.l13() > self.l01() { PI } else { 0.0 };
            Arc::from_angles(self.p0(), r_3min, phi_min + offset, span_1)
        });

        let fold = |theta_1: f64| {
            let phi = self.theta_o1() + theta_1;
            let pivot = self.p0() + Point::from_polar(self.l01(), phi);
            Arc::from_angles(pivot, arm.l13(), phi + arm.beta(axis2.min()), axis2.span())
        };

        BoundaryArcs {
            outer,
            inner,
            lower: fold(axis1.min()),
            upper: fold(axis1.max()),
        }
    }

    /// Whether `p` can be reached by the fiber tip.
    pub fn p3_in_domain(&self, p: Point) -> Result<bool> {
        Ok(self.angles_to_go_p3(p)?.is_reachable())
    }

    fn segment_hits_boundary(&self, s: &Segment, arcs: &BoundaryArcs, folds: bool) -> bool {
        arcs.sweep_arcs().any(|arc| arc.intersects_segment(s))
            || (folds && arcs.fold_arcs().any(|arc| arc.intersects_segment(s)))
    }

    /// Whether the segment `a`-`b` enters the region the fiber tip cannot
    /// reach.
    ///
    /// The folding arcs only bound the domain when axis 1 spans less than a
    /// full turn. With a full turn they lie inside the reachable annulus and
    /// are not tested here; see [`Cylinder::segment_cant_be_followed_by_p3`].
    pub fn segment_invades_domain_p3(&self, a: Point, b: Point) -> Result<bool> {
        if !self.p3_in_domain(a)? || !self.p3_in_domain(b)? {
            return Ok(true);
        }
        let arcs = self.boundary_arcs();
        let partial_turn = self.axis1().span() < 2.0 * PI;
        Ok(self.segment_hits_boundary(&Segment::new(a, b), &arcs, partial_turn))
    }

    /// Whether the fiber tip cannot follow the segment `a`-`b` continuously.
    ///
    /// Stricter than [`Cylinder::segment_invades_domain_p3`]: crossing either
    /// folding arc is refused even when axis 1 turns fully.
    pub fn segment_cant_be_followed_by_p3(&self, a: Point, b: Point) -> Result<bool> {
        if self.segment_invades_domain_p3(a, b)? {
            return Ok(true);
        }
        let arcs = self.boundary_arcs();
        let segment = Segment::new(a, b);
        let crosses_fold = arcs.fold_arcs().any(|arc| arc.intersects_segment(&segment));
        Ok(crosses_fold)
    }

    pub fn polyline_invades_domain_p3(&self, vertices: &[Point]) -> Result<bool> {
        self.polyline_test(vertices, |c, a, b| c.segment_invades_domain_p3(a, b))
    }

    pub fn polyline_cant_be_followed_by_p3(&self, vertices: &[Point]) -> Result<bool> {
        self.polyline_test(vertices, |c, a, b| c.segment_cant_be_followed_by_p3(a, b))
    }

    fn polyline_test<F>(&self, vertices: &[Point], segment_test: F) -> Result<bool>
    where
        F: Fn(&Self, Point, Point) -> Result<bool>,
    {
        if let [single] = vertices {
            return Ok(!self.p3_in_domain(*single)?);
        }
        for pair in vertices.windows(2) {
            if segment_test(self, pair[0], pair[1])? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_radii() {
        let mut c = Cylinder::new(Point::origin(), 0.0).unwrap();
        c.set_l01(2.0).unwrap();
        let arcs = c.boundary_arcs();
        assert!((arcs.outer.radius - c.r_3max()).abs() < 1e-12);
        assert!(arcs.outer.full_circle);
        let inner = arcs.inner.unwrap();
        assert!((inner.radius - c.r_3min()).abs() < 1e-12);
        assert!((arcs.lower.radius - c.arm().l13()).abs() < 1e-12);
    }

    #[test]
    fn test_no_inner_arc_for_equal_links() {
        let c = Cylinder::new(Point::origin(), 0.0).unwrap();
        assert!(c.boundary_arcs().inner.is_none());
    }
}
