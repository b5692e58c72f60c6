//! Robotic positioners.

use crate::model::{EaIndex, RpIndex};
use crate::tolerance::Tolerances;
use fiberpos_core::{Error, Point, Result};
use fiberpos_kinematics::{Cylinder, CylinderInstance, Instance};
use serde::{Deserialize, Serialize};

/// Default axis speeds (steps per second).
pub const DEFAULT_SPEED: f64 = 1000.0;

/// Broad-phase neighbour of a positioner together with the distances
/// observed during the last motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjacent<I> {
    pub index: I,
    /// Minimum distance observed since the last reset.
    pub dmin: f64,
    /// Distance at the last observed position.
    pub dend: f64,
}

impl<I> Adjacent<I> {
    pub fn new(index: I) -> Self {
        Self {
            index,
            dmin: f64::INFINITY,
            dend: f64::INFINITY,
        }
    }

    pub fn observe(&mut self, distance: f64) {
        self.dmin = self.dmin.min(distance);
        self.dend = distance;
    }

    pub fn reset(&mut self) {
        self.dmin = f64::INFINITY;
        self.dend = f64::INFINITY;
    }
}

pub type AdjacentEa = Adjacent<EaIndex>;
pub type AdjacentRp = Adjacent<RpIndex>;

/// A two-axis positioner of the array.
#[derive(Debug, Clone, PartialEq)]
pub struct RoboticPositioner {
    id: u32,
    cylinder: Cylinder,
    tolerances: Tolerances,
    speed_1: f64,
    speed_2: f64,
    pub(crate) adjacent_eas: Vec<AdjacentEa>,
    pub(crate) adjacent_rps: Vec<AdjacentRp>,
    pub(crate) pending: bool,
}

impl RoboticPositioner {
    /// Positioner with default mechanics anchored at `p0`.
    pub fn new(id: u32, p0: Point, theta_o1: f64) -> Result<Self> {
        Self::with_cylinder(id, Cylinder::new(p0, theta_o1)?)
    }

    pub fn with_cylinder(id: u32, cylinder: Cylinder) -> Result<Self> {
        check_id(id)?;
        Ok(Self {
            id,
            cylinder,
            tolerances: Tolerances::default(),
            speed_1: DEFAULT_SPEED,
            speed_2: DEFAULT_SPEED,
            adjacent_eas: Vec::new(),
            adjacent_rps: Vec::new(),
            pending: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) -> Result<()> {
        check_id(id)?;
        self.id = id;
        Ok(())
    }

    pub fn cylinder(&self) -> &Cylinder {
        &self.cylinder
    }

    pub fn cylinder_mut(&mut self) -> &mut Cylinder {
        &mut self.cylinder
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) -> Result<()> {
        tolerances.validate()?;
        self.tolerances = tolerances;
        Ok(())
    }

    /// Safety perimeter margin.
    pub fn spm(&self) -> f64 {
        self.tolerances.spm(self.cylinder.r_max())
    }

    /// Axis speeds in steps per second.
    pub fn speeds(&self) -> (f64, f64) {
        (self.speed_1, self.speed_2)
    }

    pub fn set_speeds(&mut self, speed_1: f64, speed_2: f64) -> Result<()> {
        for (what, speed) in [("speed_1", speed_1), ("speed_2", speed_2)] {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(Error::invalid_argument(what, "should be upper zero"));
            }
        }
        self.speed_1 = speed_1;
        self.speed_2 = speed_2;
        Ok(())
    }

    /// Time needed to move both axes to the given steps at the current speeds.
    pub fn motion_time(&self, p_1: f64, p_2: f64) -> f64 {
        let t1 = (p_1 - self.cylinder.p_1()).abs() / self.speed_1;
        let t2 = (p_2 - self.cylinder.p_2()).abs() / self.speed_2;
        t1.max(t2)
    }

    pub fn adjacent_eas(&self) -> &[AdjacentEa] {
        &self.adjacent_eas
    }

    pub fn adjacent_rps(&self) -> &[AdjacentRp] {
        &self.adjacent_rps
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Smallest `dmin` over every neighbour.
    pub fn dmin(&self) -> f64 {
        self.adjacent_eas
            .iter()
            .map(|a| a.dmin)
            .chain(self.adjacent_rps.iter().map(|a| a.dmin))
            .fold(f64::INFINITY, f64::min)
    }
}

fn check_id(id: u32) -> Result<()> {
    if id == 0 {
        Err(Error::invalid_argument("Id", "should be upper zero"))
    } else {
        Ok(())
    }
}

/// Persistent state of a [`RoboticPositioner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoboticPositionerInstance {
    pub id: u32,
    #[serde(default)]
    pub cylinder: CylinderInstance,
    #[serde(default)]
    pub tolerances: Tolerances,
}

impl RoboticPositioner {
    pub fn from_instance(value: RoboticPositionerInstance) -> Result<Self> {
        let mut rp = Self::with_cylinder(value.id, Cylinder::from_instance(value.cylinder)?)?;
        rp.set_tolerances(value.tolerances)?;
        Ok(rp)
    }
}

impl Instance for RoboticPositioner {
    type Value = RoboticPositionerInstance;

    fn instance(&self) -> RoboticPositionerInstance {
        RoboticPositionerInstance {
            id: self.id,
            cylinder: self.cylinder.instance(),
            tolerances: self.tolerances,
        }
    }

    /// Keeps speeds and broad-phase neighbours.
    fn set_instance(&mut self, value: RoboticPositionerInstance) -> Result<()> {
        let mut rp = Self::from_instance(value)?;
        rp.speed_1 = self.speed_1;
        rp.speed_2 = self.speed_2;
        rp.adjacent_eas = std::mem::take(&mut self.adjacent_eas);
        rp.adjacent_rps = std::mem::take(&mut self.adjacent_rps);
        *self = rp;
        Ok(())
    }
}
