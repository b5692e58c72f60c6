//! Exclusion areas: fixed barriers the arms must keep away from.

use crate::model::RpIndex;
use crate::tolerance::Tolerances;
use fiberpos_core::{Contour, ContourShape, Error, Point, Result};
use fiberpos_kinematics::{Barrier, Instance};
use serde::{Deserialize, Serialize};

/// A fixed barrier with its error margins and broad-phase neighbours.
///
/// Identifiers need not be unique; an area is identified by its slot in the
/// owning model.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionArea {
    id: u32,
    barrier: Barrier,
    tolerances: Tolerances,
    pub(crate) adjacent_rps: Vec<RpIndex>,
    pub(crate) pending: bool,
}

impl ExclusionArea {
    pub fn new(id: u32, contour: Contour, p0: Point, theta_o1: f64) -> Result<Self> {
        check_id(id)?;
        if !p0.is_finite() || !theta_o1.is_finite() {
            return Err(Error::invalid_argument(
                "exclusion area placement",
                "should be finite",
            ));
        }
        Ok(Self {
            id,
            barrier: Barrier::new(contour, p0, theta_o1),
            tolerances: Tolerances::default(),
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

    pub fn barrier(&self) -> &Barrier {
        &self.barrier
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) -> Result<()> {
        tolerances.validate()?;
        self.tolerances = tolerances;
        Ok(())
    }

    pub fn set_contour(&mut self, contour: Contour) {
        self.barrier.set_contour(contour);
    }

    /// Safety perimeter margin.
    pub fn spm(&self) -> f64 {
        self.tolerances.spm(self.barrier.r_max())
    }

    pub fn adjacent_rps(&self) -> &[RpIndex] {
        &self.adjacent_rps
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

fn check_id(id: u32) -> Result<()> {
    if id == 0 {
        Err(Error::invalid_argument("Id", "should be upper zero"))
    } else {
        Ok(())
    }
}

/// Persistent state of an [`ExclusionArea`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionAreaInstance {
    pub id: u32,
    pub p0: Point,
    pub theta_o1: f64,
    pub contour: Contour,
    #[serde(default)]
    pub tolerances: Tolerances,
}

impl ExclusionArea {
    pub fn from_instance(value: ExclusionAreaInstance) -> Result<Self> {
        let mut area = Self::new(value.id, value.contour, value.p0, value.theta_o1)?;
        area.set_tolerances(value.tolerances)?;
        Ok(area)
    }
}

impl Instance for ExclusionArea {
    type Value = ExclusionAreaInstance;

    fn instance(&self) -> ExclusionAreaInstance {
        ExclusionAreaInstance {
            id: self.id,
            p0: self.barrier.p0(),
            theta_o1: self.barrier.theta_o1(),
            contour: self.barrier.local_contour().clone(),
            tolerances: self.tolerances,
        }
    }

    /// Keeps the broad-phase neighbours; the owning model decides whether
    /// they are still valid.
    fn set_instance(&mut self, value: ExclusionAreaInstance) -> Result<()> {
        let mut area = Self::from_instance(value)?;
        area.adjacent_rps = std::mem::take(&mut self.adjacent_rps);
        *self = area;
        Ok(())
    }
}
