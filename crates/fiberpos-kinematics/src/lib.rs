//! # FiberPos Kinematics
//!
//! Kinematic model of a two-axis fiber positioner:
//! - Quantized stepper axes
//! - Reference frames S0, S1, S2 and S3
//! - Cylinder (axis 1), arm (axis 2) and barrier
//! - Reachable domain, target resolution and nearest stable position
//! - Continuous-path feasibility of the fiber tip

pub mod arm;
pub mod axis;
pub mod barrier;
pub mod cylinder;
pub mod domain;
pub mod frames;
pub mod guard;
pub mod instance;
pub mod path;

pub use arm::Arm;
pub use axis::QuantizedAxis;
pub use barrier::Barrier;
pub use cylinder::{defaults, Cylinder};
pub use domain::{StablePosition, TargetResolution};
pub use frames::Frame;
pub use guard::AxisStateGuard;
pub use instance::{CylinderInstance, Instance};
pub use path::BoundaryArcs;
