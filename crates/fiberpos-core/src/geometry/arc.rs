//! Circular arcs traversed counter-clockwise.

use super::circle::{circle_circle_intersection, segment_circle_intersection};
use super::point::{normalize_angle, Point};
use super::segment::Segment;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const ANGLE_EPS: f64 = 1e-12;

/// A circular arc starting at angle `start` and sweeping `span` radians
/// counter-clockwise about `center`.
///
/// Arcs whose span covers the whole circumference are flagged as full
/// circles; every angular test on them succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    /// Start angle, normalized into [0, 2π).
    pub start: f64,
    /// Swept angle in (0, 2π].
    pub span: f64,
    pub full_circle: bool,
}

impl Arc {
    /// Builds an arc from its configured start angle and span.
    ///
    /// The span implied by the chord endpoints is compared with the
    /// configured one. When they differ by π or more the endpoints have
    /// collapsed onto each other (a full turn) and the arc is treated as a
    /// circle, so angular tests near the seam cannot fail spuriously.
    pub fn from_angles(center: Point, radius: f64, start: f64, span: f64) -> Self {
        let span = span.abs();
        let pa = center + Point::from_polar(radius, start);
        let pb = center + Point::from_polar(radius, start + span);
        let implied = normalize_angle((pb - center).angle() - (pa - center).angle());
        let full_circle = span >= 2.0 * PI - ANGLE_EPS || (implied - span).abs() >= PI;

        Self {
            center,
            radius,
            start: normalize_angle(start),
            span: if full_circle { 2.0 * PI } else { span },
            full_circle,
        }
    }

    /// Arc between two angles, sweeping counter-clockwise from `from` to `to`.
    pub fn between(center: Point, radius: f64, from: f64, to: f64) -> Self {
        Self::from_angles(center, radius, from, to - from)
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            start: 0.0,
            span: 2.0 * PI,
            full_circle: true,
        }
    }

    /// Whether the direction `theta` (about the center) falls inside the arc.
    pub fn contains_angle(&self, theta: f64) -> bool {
        if self.full_circle {
            return true;
        }
        let rel = normalize_angle(theta - self.start);
        rel <= self.span + ANGLE_EPS || rel >= 2.0 * PI - ANGLE_EPS
    }

    fn contains_direction(&self, p: Point) -> bool {
        self.contains_angle((p - self.center).angle())
    }

    /// First and last points of the arc. Both coincide on a full circle.
    pub fn endpoints(&self) -> (Point, Point) {
        (
            self.center + Point::from_polar(self.radius, self.start),
            self.center + Point::from_polar(self.radius, self.start + self.span),
        )
    }

    /// Endpoints worth testing as distance candidates.
    fn boundary_points(&self) -> Vec<Point> {
        if self.full_circle {
            Vec::new()
        } else {
            let (pa, pb) = self.endpoints();
            vec![pa, pb]
        }
    }

    pub fn distance_to_point(&self, p: Point) -> f64 {
        let v = p - self.center;
        let d = v.norm();
        if d == 0.0 {
            return self.radius;
        }
        if self.contains_angle(v.angle()) {
            return (d - self.radius).abs();
        }
        let (pa, pb) = self.endpoints();
        pa.distance_to(&p).min(pb.distance_to(&p))
    }

    /// Largest distance from `p` to any point of the arc.
    pub fn max_distance_from(&self, p: Point) -> f64 {
        let v = self.center - p;
        let d = v.norm();
        if d == 0.0 {
            return self.radius;
        }
        if self.contains_angle(v.angle()) {
            return d + self.radius;
        }
        let (pa, pb) = self.endpoints();
        pa.distance_to(&p).max(pb.distance_to(&p))
    }

    pub fn segment_intersections(&self, s: &Segment) -> Vec<Point> {
        segment_circle_intersection(s.a, s.b, self.center, self.radius)
            .into_iter()
            .filter(|p| self.contains_direction(*p))
            .collect()
    }

    pub fn intersects_segment(&self, s: &Segment) -> bool {
        !self.segment_intersections(s).is_empty()
    }

    pub fn intersects_arc(&self, other: &Arc) -> bool {
        if self.center.distance_to(&other.center) == 0.0 {
            return (self.radius - other.radius).abs() <= ANGLE_EPS && self.overlaps_angularly(other);
        }
        circle_circle_intersection(self.center, self.radius, other.center, other.radius)
            .into_iter()
            .any(|p| self.contains_direction(p) && other.contains_direction(p))
    }

    fn overlaps_angularly(&self, other: &Arc) -> bool {
        self.full_circle
            || other.full_circle
            || self.contains_angle(other.start)
            || other.contains_angle(self.start)
    }

    pub fn distance_to_segment(&self, s: &Segment) -> f64 {
        if self.intersects_segment(s) {
            return 0.0;
        }

        let mut best = self
            .distance_to_point(s.a)
            .min(self.distance_to_point(s.b));
        for p in self.boundary_points() {
            best = best.min(s.distance_to_point(p));
        }

        // Interior-to-interior candidates lie on the radii normal to the segment.
        if let Some(dir) = (s.b - s.a).normalized() {
            let normal = Point::new(-dir.y, dir.x);
            for n in [normal, -normal] {
                if self.contains_angle(n.angle()) {
                    let q = self.center + n * self.radius;
                    best = best.min(s.distance_to_point(q));
                }
            }
        }
        best
    }

    pub fn distance_to_arc(&self, other: &Arc) -> f64 {
        if self.intersects_arc(other) {
            return 0.0;
        }

        let mut best = f64::INFINITY;
        for p in self.boundary_points() {
            best = best.min(other.distance_to_point(p));
        }
        for p in other.boundary_points() {
            best = best.min(self.distance_to_point(p));
        }

        match (other.center - self.center).normalized() {
            Some(u) => {
                for su in [u, -u] {
                    if !self.contains_angle(su.angle()) {
                        continue;
                    }
                    let p = self.center + su * self.radius;
                    for ou in [u, -u] {
                        if other.contains_angle(ou.angle()) {
                            best = best.min(p.distance_to(&(other.center + ou * other.radius)));
                        }
                    }
                }
            }
            None => {
                if self.overlaps_angularly(other) {
                    best = best.min((self.radius - other.radius).abs());
                }
            }
        }
        best
    }

    /// Applies a rotation about the origin followed by a translation.
    pub fn placed(&self, origin: Point, orientation: f64) -> Arc {
        Arc {
            center: origin + self.center.rotated(orientation),
            radius: self.radius,
            start: normalize_angle(self.start + orientation),
            span: self.span,
            full_circle: self.full_circle,
        }
    }
}
