//! Cartesian reference frames.
//!
//! Frames are related by a rotation followed by a translation:
//!
//! ```text
//! S0  global
//! └── S1  origin P0, rotated by thetaO1
//!     └── S2  origin P1, rotated by theta_1 + π (x axis pointing back to P0)
//!         └── S3  origin P1, rotated by thetaO3o + theta_2 (x axis along the arm)
//! ```

use fiberpos_core::Point;
use nalgebra::{Rotation2, Vector2};

/// A child frame expressed in its parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    origin: Point,
    rotation: Rotation2<f64>,
}

impl Frame {
    pub fn new(origin: Point, orientation: f64) -> Self {
        Self {
            origin,
            rotation: Rotation2::new(orientation),
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn orientation(&self) -> f64 {
        self.rotation.angle()
    }

    /// Coordinates in the parent frame of a point given in this frame.
    pub fn to_parent(&self, p: Point) -> Point {
        self.origin + from_vector(self.rotation * to_vector(p))
    }

    /// Coordinates in this frame of a point given in the parent frame.
    pub fn to_local(&self, p: Point) -> Point {
        from_vector(self.rotation.inverse() * to_vector(p - self.origin))
    }
}

fn to_vector(p: Point) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

fn from_vector(v: Vector2<f64>) -> Point {
    Point::new(v.x, v.y)
}

/// Polar coordinates `(r, theta)` of a Cartesian point.
pub fn rec_to_pol(p: Point) -> (f64, f64) {
    (p.norm(), p.angle())
}

pub fn pol_to_rec(r: f64, theta: f64) -> Point {
    Point::from_polar(r, theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_frame_round_trip() {
        let frame = Frame::new(Point::new(3.0, -2.0), 0.7);
        let p = Point::new(1.25, 4.5);
        let back = frame.to_parent(frame.to_local(p));
        assert!(back.distance_to(&p) < 1e-12);
    }

    #[test]
    fn test_frame_axes() {
        let frame = Frame::new(Point::new(1.0, 1.0), PI / 2.0);
        let p = frame.to_parent(Point::new(1.0, 0.0));
        assert!(p.distance_to(&Point::new(1.0, 2.0)) < 1e-12);
        assert!((frame.orientation() - PI / 2.0).abs() < 1e-12);
    }
}
