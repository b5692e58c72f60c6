//! Planar geometry primitives shared by the kinematic and collision layers.

pub mod arc;
pub mod circle;
pub mod contour;
pub mod point;
pub mod segment;

pub use arc::Arc;
pub use circle::{circle_circle_intersection, circles_are_secant, segment_circle_intersection};
pub use contour::{Contour, ContourFigure, ContourShape};
pub use point::{clamp_acos, normalize_angle, safe_sqrt, Point};
pub use segment::Segment;
