//! Circle intersection primitives.

use super::point::{safe_sqrt, Point};
use smallvec::SmallVec;

/// Intersection points of two circles, listed in no particular order.
///
/// Concentric circles (coincident included) and separated or nested pairs
/// yield no points; tangent circles yield exactly one.
pub fn circle_circle_intersection(c1: Point, r1: f64, c2: Point, r2: f64) -> SmallVec<[Point; 2]> {
    let mut points = SmallVec::new();
    let v = c2 - c1;
    let d = v.norm();
    if d == 0.0 || d > r1 + r2 || d < (r1 - r2).abs() {
        return points;
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = safe_sqrt(r1 * r1 - a * a);
    let u = v * (1.0 / d);
    let pm = c1 + u * a;
    if h == 0.0 {
        points.push(pm);
    } else {
        let n = Point::new(-u.y, u.x);
        points.push(pm + n * h);
        points.push(pm - n * h);
    }
    points
}

/// Whether two circles cross at two distinct points.
pub fn circles_are_secant(c1: Point, r1: f64, c2: Point, r2: f64) -> bool {
    let d = c1.distance_to(&c2);
    (r1 - r2).abs() < d && d < r1 + r2
}

/// Intersections of the line segment `a`-`b` with the circle (`center`, `r`).
pub fn segment_circle_intersection(a: Point, b: Point, center: Point, r: f64) -> SmallVec<[Point; 2]> {
    const EPS: f64 = 1e-12;

    let mut points = SmallVec::new();
    let dd = b - a;
    let f = a - center;
    let qa = dd.dot(&dd);
    let qc = f.dot(&f) - r * r;
    if qa == 0.0 {
        if qc.abs() <= EPS {
            points.push(a);
        }
        return points;
    }

    let qb = 2.0 * f.dot(&dd);
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return points;
    }
    let root = disc.sqrt();
    let roots = if root == 0.0 { 1 } else { 2 };
    let params = [(-qb - root) / (2.0 * qa), (-qb + root) / (2.0 * qa)];
    for &t in &params[..roots] {
        if (-EPS..=1.0 + EPS).contains(&t) {
            points.push(a + dd * t.clamp(0.0, 1.0));
        }
    }
    points
}
