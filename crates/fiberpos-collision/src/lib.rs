//! # FiberPos Collision
//!
//! Collision management for an array of fiber positioners:
//! - Exclusion areas and robotic positioners with error margins
//! - Owning model with broad-phase adjacency and pending-flag sweeps
//! - Instruction execution and joint-space motion checks
//! - Hexagonal array layouts

pub mod exclusion_area;
pub mod instruction;
pub mod layout;
pub mod model;
pub mod positioner;
pub mod tolerance;

pub use exclusion_area::{ExclusionArea, ExclusionAreaInstance};
pub use instruction::{Instruction, InstructionName};
pub use layout::{hexagonal_centers, ring_centers};
pub use model::{
    CollisionPair, EaIndex, FiberMosModel, MotionCollision, MotionReport, MotionTarget, RpIndex,
    SweepStats,
};
pub use positioner::{Adjacent, AdjacentEa, AdjacentRp, RoboticPositioner, RoboticPositionerInstance};
pub use tolerance::Tolerances;
