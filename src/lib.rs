//! # FiberPos
//!
//! Kinematics and collision management for arrays of two-axis fiber
//! positioners:
//! - Quantized stepper axes and the reachable domain of the fiber tip
//! - Target resolution and nearest stable positions
//! - Continuous-path feasibility of the fiber tip
//! - Broad- and narrow-phase collision detection across the array
//!
//! ## Architecture
//!
//! FiberPos is organized as a workspace with multiple crates:
//!
//! 1. **fiberpos-core** - Errors, planar geometry, sample functions, quantization
//! 2. **fiberpos-kinematics** - Axes, frames, cylinder and arm, domain and paths
//! 3. **fiberpos-collision** - Exclusion areas, positioners, the array model
//! 4. **fiberpos-settings** - Instrument configuration
//! 5. **fiberpos** - Logging, configuration wiring and the demo binary

pub mod instrument;

pub use fiberpos_collision::{
    CollisionPair, EaIndex, ExclusionArea, FiberMosModel, Instruction, InstructionName,
    MotionReport, MotionTarget, RoboticPositioner, RpIndex, SweepStats, Tolerances,
};
pub use fiberpos_core::{Contour, ContourShape, Error, Function, Point, Result};
pub use fiberpos_kinematics::{Cylinder, CylinderInstance, Instance, TargetResolution};
pub use fiberpos_settings::Config;
pub use instrument::{build_model, cylinder_instance};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with compact formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
