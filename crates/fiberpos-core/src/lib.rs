//! # FiberPos Core
//!
//! Core types and utilities for FiberPos:
//! - Error taxonomy shared by every crate of the workspace
//! - Planar geometry (points, segments, arcs, contours)
//! - Tabulated step functions and their inverses
//! - Step quantization

pub mod error;
pub mod function;
pub mod geometry;
pub mod quantizer;

pub use error::{Error, Result};
pub use function::Function;
pub use geometry::{Arc, Contour, ContourFigure, ContourShape, Point, Segment};
pub use quantizer::Quantizer;
