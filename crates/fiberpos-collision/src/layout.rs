//! Hexagonal array layouts.

use fiberpos_core::Point;

/// Lattice steps around a hexagon, in axial coordinates.
const DIRECTIONS: [(i64, i64); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];

fn lattice_point(q: i64, r: i64, pitch: f64) -> Point {
    let (q, r) = (q as f64, r as f64);
    Point::new(pitch * (q + 0.5 * r), pitch * r * 3f64.sqrt() / 2.0)
}

/// Centers of hexagonal ring `ring` about the origin: the origin itself for
/// ring 0, `6 * ring` points otherwise.
pub fn ring_centers(ring: usize, pitch: f64) -> Vec<Point> {
    if ring == 0 {
        return vec![Point::origin()];
    }
    let k = ring as i64;
    let (mut q, mut r) = (DIRECTIONS[4].0 * k, DIRECTIONS[4].1 * k);
    let mut centers = Vec::with_capacity(6 * ring);
    for (dq, dr) in DIRECTIONS {
        for _ in 0..ring {
            centers.push(lattice_point(q, r, pitch));
            q += dq;
            r += dr;
        }
    }
    centers
}

/// Centers of a hexagonal array with `rings` rings about the origin.
pub fn hexagonal_centers(rings: usize, pitch: f64) -> Vec<Point> {
    (0..=rings).flat_map(|ring| ring_centers(ring, pitch)).collect()
}
