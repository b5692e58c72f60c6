//! Straight line segments.

use super::point::Point;
use serde::{Deserialize, Serialize};

/// A closed line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }

    /// Closest point of the segment to `p`.
    pub fn closest_point(&self, p: Point) -> Point {
        let d = self.b - self.a;
        let len2 = d.dot(&d);
        if len2 == 0.0 {
            return self.a;
        }
        let t = ((p - self.a).dot(&d) / len2).clamp(0.0, 1.0);
        self.a + d * t
    }

    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.closest_point(p).distance_to(&p)
    }

    /// Largest distance from `p` to any point of the segment.
    pub fn max_distance_from(&self, p: Point) -> f64 {
        self.a.distance_to(&p).max(self.b.distance_to(&p))
    }

    /// Whether the two closed segments share at least one point.
    pub fn intersects_segment(&self, other: &Segment) -> bool {
        let d1 = orientation(other.a, other.b, self.a);
        let d2 = orientation(other.a, other.b, self.b);
        let d3 = orientation(self.a, self.b, other.a);
        let d4 = orientation(self.a, self.b, other.b);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && on_segment(other.a, other.b, self.a))
            || (d2 == 0.0 && on_segment(other.a, other.b, self.b))
            || (d3 == 0.0 && on_segment(self.a, self.b, other.a))
            || (d4 == 0.0 && on_segment(self.a, self.b, other.b))
    }

    pub fn distance_to_segment(&self, other: &Segment) -> f64 {
        if self.intersects_segment(other) {
            return 0.0;
        }
        self.distance_to_point(other.a)
            .min(self.distance_to_point(other.b))
            .min(other.distance_to_point(self.a))
            .min(other.distance_to_point(self.b))
    }

    /// Applies a rotation about the origin followed by a translation.
    pub fn placed(&self, origin: Point, orientation: f64) -> Segment {
        Segment::new(
            origin + self.a.rotated(orientation),
            origin + self.b.rotated(orientation),
        )
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(&(c - a))
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_point() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(s.distance_to_point(Point::new(5.0, 3.0)), 3.0);
        assert_eq!(s.distance_to_point(Point::new(-4.0, 3.0)), 5.0);
        assert_eq!(s.max_distance_from(Point::new(0.0, 0.0)), 10.0);
    }

    #[test]
    fn test_crossing_and_touching_segments() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let crossing = Segment::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
        let touching = Segment::new(Point::new(2.0, 2.0), Point::new(3.0, 0.0));
        let apart = Segment::new(Point::new(3.0, 0.0), Point::new(4.0, 0.0));
        assert!(s.intersects_segment(&crossing));
        assert!(s.intersects_segment(&touching));
        assert!(!s.intersects_segment(&apart));
        assert_eq!(s.distance_to_segment(&crossing), 0.0);
        assert!((s.distance_to_segment(&apart) - 3.0 / 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_overlap() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        let t = Segment::new(Point::new(1.0, 0.0), Point::new(3.0, 0.0));
        assert!(s.intersects_segment(&t));
    }
}
