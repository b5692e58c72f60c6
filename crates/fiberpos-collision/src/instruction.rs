//! Positioner instructions.
//!
//! An instruction is a name plus up to two real arguments. Executing one on
//! a [`RoboticPositioner`] calls the matching kinematic setter.

use crate::positioner::RoboticPositioner;
use fiberpos_core::{Error, Point, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Instruction names understood by a positioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum InstructionName {
    /// Empty instruction, does nothing.
    #[default]
    Empty,
    /// Move both axes to angles (rad).
    MA,
    /// Move both axes to positions (steps).
    MS,
    /// Move axis 1 to a position (steps).
    M1,
    /// Move axis 2 to a position (steps).
    M2,
    /// Move the fiber tip to a point (mm).
    MM,
    /// Stop.
    ST,
    /// Set the axis speeds (steps/s).
    SP,
}

impl InstructionName {
    /// Number of arguments the instruction takes.
    pub fn arity(self) -> usize {
        match self {
            Self::Empty | Self::ST => 0,
            Self::M1 | Self::M2 => 1,
            Self::MA | Self::MS | Self::MM | Self::SP => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::MA => "MA",
            Self::MS => "MS",
            Self::M1 => "M1",
            Self::M2 => "M2",
            Self::MM => "MM",
            Self::ST => "ST",
            Self::SP => "SP",
        }
    }
}

impl fmt::Display for InstructionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Ok(Self::Empty),
            "MA" => Ok(Self::MA),
            "MS" => Ok(Self::MS),
            "M1" => Ok(Self::M1),
            "M2" => Ok(Self::M2),
            "MM" => Ok(Self::MM),
            "ST" => Ok(Self::ST),
            "SP" => Ok(Self::SP),
            other => Err(Error::invalid_argument(
                "instruction name",
                format!("unknown instruction {:?}", other),
            )),
        }
    }
}

/// A validated instruction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instruction {
    name: InstructionName,
    args: SmallVec<[f64; 2]>,
}

impl Instruction {
    /// Builds an instruction, checking the number of arguments and that
    /// every argument is finite.
    pub fn new(name: InstructionName, args: &[f64]) -> Result<Self> {
        if args.len() != name.arity() {
            return Err(Error::invalid_argument(
                format!("instruction {}", name),
                format!("takes {} arguments, got {}", name.arity(), args.len()),
            ));
        }
        if args.iter().any(|a| !a.is_finite()) {
            return Err(Error::invalid_argument(
                format!("instruction {}", name),
                "arguments should be finite",
            ));
        }
        Ok(Self {
            name,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn name(&self) -> InstructionName {
        self.name
    }

    pub fn args(&self) -> &[f64] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.name == InstructionName::Empty
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())?;
        for a in &self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

impl RoboticPositioner {
    /// Executes an instruction on this positioner.
    pub fn execute(&mut self, instruction: &Instruction) -> Result<()> {
        let args = instruction.args();
        debug!(id = self.id(), %instruction, "executing instruction");
        match instruction.name() {
            InstructionName::Empty => Ok(()),
            InstructionName::MA => self.cylinder_mut().set_angles(args[0], args[1]),
            InstructionName::MS => self.cylinder_mut().set_steps(args[0], args[1]),
            InstructionName::M1 => self.cylinder_mut().set_p_1(args[0]),
            InstructionName::M2 => self.cylinder_mut().set_p_2(args[0]),
            InstructionName::MM => {
                let target = Point::new(args[0], args[1]);
                if !self.cylinder_mut().move_to_p3(target)? {
                    warn!(
                        id = self.id(),
                        x = target.x,
                        y = target.y,
                        "target out of domain, moved to the nearest point"
                    );
                }
                Ok(())
            }
            InstructionName::ST => Ok(()),
            InstructionName::SP => self.set_speeds(args[0], args[1]),
        }
    }
}
