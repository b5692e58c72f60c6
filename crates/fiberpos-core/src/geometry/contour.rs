//! Closed or open contours made of segments and arcs.
//!
//! A contour is the only geometric representation the collision engine sees.
//! Barriers and arms expose theirs through [`ContourShape`], so the engine
//! depends on distances, clearance tests and bounding radii, not on how a
//! particular outline was built.

use super::arc::Arc;
use super::point::Point;
use super::segment::Segment;
use serde::{Deserialize, Serialize};

/// One figure of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContourFigure {
    Segment(Segment),
    Arc(Arc),
}

impl ContourFigure {
    pub fn distance_to_point(&self, p: Point) -> f64 {
        match self {
            ContourFigure::Segment(s) => s.distance_to_point(p),
            ContourFigure::Arc(a) => a.distance_to_point(p),
        }
    }

    pub fn max_distance_from(&self, p: Point) -> f64 {
        match self {
            ContourFigure::Segment(s) => s.max_distance_from(p),
            ContourFigure::Arc(a) => a.max_distance_from(p),
        }
    }

    pub fn distance_to(&self, other: &ContourFigure) -> f64 {
        match (self, other) {
            (ContourFigure::Segment(s), ContourFigure::Segment(t)) => s.distance_to_segment(t),
            (ContourFigure::Segment(s), ContourFigure::Arc(a)) => a.distance_to_segment(s),
            (ContourFigure::Arc(a), ContourFigure::Segment(s)) => a.distance_to_segment(s),
            (ContourFigure::Arc(a), ContourFigure::Arc(b)) => a.distance_to_arc(b),
        }
    }

    pub fn intersects(&self, other: &ContourFigure) -> bool {
        match (self, other) {
            (ContourFigure::Segment(s), ContourFigure::Segment(t)) => s.intersects_segment(t),
            (ContourFigure::Segment(s), ContourFigure::Arc(a)) => a.intersects_segment(s),
            (ContourFigure::Arc(a), ContourFigure::Segment(s)) => a.intersects_segment(s),
            (ContourFigure::Arc(a), ContourFigure::Arc(b)) => a.intersects_arc(b),
        }
    }

    pub fn placed(&self, origin: Point, orientation: f64) -> ContourFigure {
        match self {
            ContourFigure::Segment(s) => ContourFigure::Segment(s.placed(origin, orientation)),
            ContourFigure::Arc(a) => ContourFigure::Arc(a.placed(origin, orientation)),
        }
    }
}

/// Ordered list of figures describing an outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contour {
    figures: Vec<ContourFigure>,
}

impl Contour {
    pub fn new(figures: Vec<ContourFigure>) -> Self {
        Self { figures }
    }

    /// A full circle of radius `r` about `center`.
    pub fn circle(center: Point, r: f64) -> Self {
        Self::new(vec![ContourFigure::Arc(Arc::circle(center, r))])
    }

    /// Closed polygon through `vertices`.
    pub fn polygon(vertices: &[Point]) -> Self {
        let n = vertices.len();
        let figures = (0..n)
            .filter(|&i| n > 1 && (n > 2 || i == 0))
            .map(|i| ContourFigure::Segment(Segment::new(vertices[i], vertices[(i + 1) % n])))
            .collect();
        Self { figures }
    }

    /// Stadium around the segment from the origin to (`length`, 0).
    pub fn capsule(length: f64, half_width: f64) -> Self {
        use std::f64::consts::FRAC_PI_2;
        use std::f64::consts::PI;

        let w = half_width;
        Self::new(vec![
            ContourFigure::Segment(Segment::new(Point::new(0.0, -w), Point::new(length, -w))),
            ContourFigure::Arc(Arc::from_angles(Point::new(length, 0.0), w, -FRAC_PI_2, PI)),
            ContourFigure::Segment(Segment::new(Point::new(length, w), Point::new(0.0, w))),
            ContourFigure::Arc(Arc::from_angles(Point::origin(), w, FRAC_PI_2, PI)),
        ])
    }

    pub fn figures(&self) -> &[ContourFigure] {
        &self.figures
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn push(&mut self, figure: ContourFigure) {
        self.figures.push(figure);
    }

    /// Minimum distance from `p` to the contour; infinite for an empty one.
    pub fn distance_min(&self, p: Point) -> f64 {
        self.figures
            .iter()
            .map(|f| f.distance_to_point(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Maximum distance from `p` to the contour; zero for an empty one.
    pub fn distance_max(&self, p: Point) -> f64 {
        self.figures
            .iter()
            .map(|f| f.max_distance_from(p))
            .fold(0.0, f64::max)
    }

    /// Bounding radius about the local origin.
    pub fn r_max(&self) -> f64 {
        self.distance_max(Point::origin())
    }

    /// Minimum distance between two contours.
    pub fn distance_min_to(&self, other: &Contour) -> f64 {
        let mut best = f64::INFINITY;
        for f in &self.figures {
            for g in &other.figures {
                best = best.min(f.distance_to(g));
                if best == 0.0 {
                    return 0.0;
                }
            }
        }
        best
    }

    pub fn intersects(&self, other: &Contour) -> bool {
        self.figures
            .iter()
            .any(|f| other.figures.iter().any(|g| f.intersects(g)))
    }

    /// Whether the contours cross or come closer than `clearance`.
    /// Crossing figures collide even at zero clearance.
    pub fn collides(&self, other: &Contour, clearance: f64) -> bool {
        self.figures.iter().any(|f| {
            other
                .figures
                .iter()
                .any(|g| f.intersects(g) || f.distance_to(g) < clearance)
        })
    }

    /// Copy of the contour rotated by `orientation` and moved to `origin`.
    pub fn placed(&self, origin: Point, orientation: f64) -> Contour {
        Contour {
            figures: self
                .figures
                .iter()
                .map(|f| f.placed(origin, orientation))
                .collect(),
        }
    }
}

/// Geometric contract the collision engine depends on.
pub trait ContourShape {
    /// Contour in the global frame.
    fn contour(&self) -> &Contour;

    /// Bounding radius of the contour about its own anchor.
    fn r_max(&self) -> f64;

    fn distance_min(&self, p: Point) -> f64 {
        self.contour().distance_min(p)
    }

    fn distance_min_to(&self, other: &dyn ContourShape) -> f64 {
        self.contour().distance_min_to(other.contour())
    }

    fn collides(&self, other: &dyn ContourShape, clearance: f64) -> bool {
        self.contour().collides(other.contour(), clearance)
    }
}
