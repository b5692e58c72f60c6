//! The positioner array: owning arena, broad phase and narrow phase.
//!
//! The broad phase (`determine_adjacents`) compares bounding circles and
//! records, for every item, the items it could ever touch. It only needs to
//! run again when the topology changes: items added or removed, anchors
//! moved, outlines resized. The narrow phase sweeps the adjacency graph,
//! testing contours of each unordered pair exactly once by means of the
//! per-item pending flag.

use crate::exclusion_area::ExclusionArea;
use crate::positioner::{AdjacentEa, AdjacentRp, RoboticPositioner};
use fiberpos_core::{ContourShape, Error, Point, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Handle of an exclusion area inside a [`FiberMosModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EaIndex(pub usize);

/// Handle of a positioner inside a [`FiberMosModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RpIndex(pub usize);

/// Two items whose contours come closer than their safety margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPair {
    ExclusionArea { ea: EaIndex, rp: RpIndex },
    Positioners { a: RpIndex, b: RpIndex },
}

/// Number of pairwise contour tests performed by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepStats {
    pub ea_rp_tests: usize,
    pub rp_rp_tests: usize,
}

impl SweepStats {
    pub fn total(&self) -> usize {
        self.ea_rp_tests + self.rp_rp_tests
    }
}

/// Joint-space target of a positioner for [`FiberMosModel::check_motion`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTarget {
    pub index: RpIndex,
    pub theta_1: f64,
    pub theta_2: f64,
}

/// Collision found while checking a motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCollision {
    /// First sample (1-based) at which the pair collides.
    pub sample: usize,
    pub pair: CollisionPair,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionReport {
    pub samples: usize,
    pub collisions: Vec<MotionCollision>,
    pub contour_tests: usize,
}

impl MotionReport {
    pub fn is_collision_free(&self) -> bool {
        self.collisions.is_empty()
    }
}

/// Geometry of a positioner the broad phase depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Footprint {
    p0: Point,
    r_max: f64,
    spm: f64,
}

impl Footprint {
    fn of(rp: &RoboticPositioner) -> Self {
        Self {
            p0: rp.cylinder().p0(),
            r_max: rp.cylinder().r_max(),
            spm: rp.spm(),
        }
    }
}

/// Owning arena of the exclusion areas and positioners of an instrument.
///
/// Removing an item leaves its slot empty, so handles of the other items
/// stay valid.
#[derive(Debug, Clone, Default)]
pub struct FiberMosModel {
    eas: Vec<Option<ExclusionArea>>,
    rps: Vec<Option<RoboticPositioner>>,
    footprints: Vec<Option<Footprint>>,
    topology_changed: bool,
    last_sweep: SweepStats,
}

impl FiberMosModel {
    pub fn new() -> Self {
        Self::default()
    }

    //------------------------------------------------------------------
    // items

    pub fn add_exclusion_area(&mut self, ea: ExclusionArea) -> EaIndex {
        self.eas.push(Some(ea));
        self.topology_changed = true;
        EaIndex(self.eas.len() - 1)
    }

    pub fn add_positioner(&mut self, rp: RoboticPositioner) -> RpIndex {
        self.rps.push(Some(rp));
        self.footprints.push(None);
        self.topology_changed = true;
        RpIndex(self.rps.len() - 1)
    }

    pub fn remove_exclusion_area(&mut self, index: EaIndex) -> Result<ExclusionArea> {
        let ea = self
            .eas
            .get_mut(index.0)
            .and_then(Option::take)
            .ok_or_else(|| no_such_item("exclusion area", index.0))?;
        self.topology_changed = true;
        Ok(ea)
    }

    pub fn remove_positioner(&mut self, index: RpIndex) -> Result<RoboticPositioner> {
        let rp = self
            .rps
            .get_mut(index.0)
            .and_then(Option::take)
            .ok_or_else(|| no_such_item("positioner", index.0))?;
        self.footprints[index.0] = None;
        self.topology_changed = true;
        Ok(rp)
    }

    pub fn exclusion_area(&self, index: EaIndex) -> Option<&ExclusionArea> {
        self.eas.get(index.0).and_then(Option::as_ref)
    }

    /// Mutable access to an exclusion area. Adjacents must be determined
    /// again before the next sweep.
    pub fn exclusion_area_mut(&mut self, index: EaIndex) -> Option<&mut ExclusionArea> {
        let ea = self.eas.get_mut(index.0).and_then(Option::as_mut);
        if ea.is_some() {
            self.topology_changed = true;
        }
        ea
    }

    pub fn positioner(&self, index: RpIndex) -> Option<&RoboticPositioner> {
        self.rps.get(index.0).and_then(Option::as_ref)
    }

    /// Mutable access to a positioner. Moving the axes keeps the adjacents
    /// valid; changing the anchor, the outline or the tolerances does not.
    pub fn positioner_mut(&mut self, index: RpIndex) -> Option<&mut RoboticPositioner> {
        self.rps.get_mut(index.0).and_then(Option::as_mut)
    }

    pub fn exclusion_areas(&self) -> impl Iterator<Item = (EaIndex, &ExclusionArea)> {
        self.eas
            .iter()
            .enumerate()
            .filter_map(|(i, ea)| ea.as_ref().map(|ea| (EaIndex(i), ea)))
    }

    pub fn positioners(&self) -> impl Iterator<Item = (RpIndex, &RoboticPositioner)> {
        self.rps
            .iter()
            .enumerate()
            .filter_map(|(i, rp)| rp.as_ref().map(|rp| (RpIndex(i), rp)))
    }

    pub fn exclusion_area_count(&self) -> usize {
        self.exclusion_areas().count()
    }

    pub fn positioner_count(&self) -> usize {
        self.positioners().count()
    }

    /// First positioner with the given identifier.
    pub fn find_positioner(&self, id: u32) -> Option<RpIndex> {
        self.positioners().find(|(_, rp)| rp.id() == id).map(|(i, _)| i)
    }

    fn rp(&self, index: RpIndex) -> Result<&RoboticPositioner> {
        self.positioner(index)
            .ok_or_else(|| no_such_item("positioner", index.0))
    }

    //------------------------------------------------------------------
    // broad phase

    /// Rebuilds every adjacency list from the bounding circles.
    pub fn determine_adjacents(&mut self) {
        let mut ea_rp = Vec::new();
        for (ei, ea) in self.exclusion_areas() {
            for (ri, rp) in self.positioners() {
                let reach = ea.barrier().distance_min(rp.cylinder().p0()) - rp.cylinder().r_max();
                if reach < ea.spm() + rp.spm() {
                    ea_rp.push((ei, ri));
                }
            }
        }

        let footprints: Vec<(RpIndex, Footprint)> = self
            .positioners()
            .map(|(i, rp)| (i, Footprint::of(rp)))
            .collect();
        let mut rp_rp = Vec::new();
        for (k, (i, a)) in footprints.iter().enumerate() {
            for (j, b) in &footprints[k + 1..] {
                let gap = a.p0.distance_to(&b.p0) - a.r_max - b.r_max;
                if gap < a.spm + b.spm {
                    rp_rp.push((*i, *j));
                }
            }
        }

        for ea in self.eas.iter_mut().flatten() {
            ea.adjacent_rps.clear();
        }
        for rp in self.rps.iter_mut().flatten() {
            rp.adjacent_eas.clear();
            rp.adjacent_rps.clear();
        }
        for &(ei, ri) in &ea_rp {
            if let Some(ea) = self.eas[ei.0].as_mut() {
                ea.adjacent_rps.push(ri);
            }
            if let Some(rp) = self.rps[ri.0].as_mut() {
                rp.adjacent_eas.push(AdjacentEa::new(ei));
            }
        }
        for &(i, j) in &rp_rp {
            if let Some(rp) = self.rps[i.0].as_mut() {
                rp.adjacent_rps.push(AdjacentRp::new(j));
            }
            if let Some(rp) = self.rps[j.0].as_mut() {
                rp.adjacent_rps.push(AdjacentRp::new(i));
            }
        }

        for (i, footprint) in footprints {
            self.footprints[i.0] = Some(footprint);
        }
        self.topology_changed = false;
        info!(
            exclusion_areas = self.exclusion_area_count(),
            positioners = footprints_len(&self.footprints),
            ea_rp = ea_rp.len(),
            rp_rp = rp_rp.len(),
            "adjacents determined"
        );
    }

    /// Whether the adjacency lists still describe the current topology.
    pub fn adjacents_are_current(&self) -> bool {
        !self.topology_changed
            && self
                .rps
                .iter()
                .zip(&self.footprints)
                .all(|(rp, footprint)| match (rp, footprint) {
                    (Some(rp), Some(footprint)) => Footprint::of(rp) == *footprint,
                    (None, _) => true,
                    (Some(_), None) => false,
                })
    }

    fn ensure_current(&self, operation: &str) -> Result<()> {
        if self.adjacents_are_current() {
            Ok(())
        } else {
            Err(Error::improper_call(
                operation,
                "adjacents are stale, call determine_adjacents first",
            ))
        }
    }

    /// Number of edges of the adjacency graph.
    pub fn adjacency_edge_count(&self) -> usize {
        let ea_rp: usize = self.exclusion_areas().map(|(_, ea)| ea.adjacent_rps().len()).sum();
        let rp_rp: usize = self.positioners().map(|(_, rp)| rp.adjacent_rps().len()).sum();
        ea_rp + rp_rp / 2
    }

    //------------------------------------------------------------------
    // narrow phase

    /// Marks every item as pending for the next sweep.
    pub fn enable_pending(&mut self) {
        for ea in self.eas.iter_mut().flatten() {
            ea.pending = true;
        }
        for rp in self.rps.iter_mut().flatten() {
            rp.pending = true;
        }
    }

    fn ea_rp_collide(ea: &ExclusionArea, rp: &RoboticPositioner) -> bool {
        ea.barrier()
            .collides(rp.cylinder().arm(), ea.spm() + rp.spm())
    }

    fn rp_rp_collide(a: &RoboticPositioner, b: &RoboticPositioner) -> bool {
        let clearance = a.spm() + b.spm();
        let (ca, cb) = (a.cylinder(), b.cylinder());
        ca.arm().collides(cb.arm(), clearance)
            || ca.arm().collides(cb.barrier(), clearance)
            || ca.barrier().collides(cb.arm(), clearance)
    }

    /// Visits every item once, testing it against its still pending
    /// neighbours. Stops at the first collision unless `exhaustive`.
    fn sweep(&mut self, exhaustive: bool) -> (Vec<CollisionPair>, SweepStats) {
        self.enable_pending();
        let mut pairs = Vec::new();
        let mut stats = SweepStats::default();

        for ei in 0..self.eas.len() {
            let Some(ea) = self.eas[ei].as_ref() else {
                continue;
            };
            for &ri in ea.adjacent_rps() {
                let Some(rp) = self.positioner(ri).filter(|rp| rp.pending) else {
                    continue;
                };
                stats.ea_rp_tests += 1;
                if Self::ea_rp_collide(ea, rp) {
                    pairs.push(CollisionPair::ExclusionArea { ea: EaIndex(ei), rp: ri });
                    if !exhaustive {
                        return (pairs, stats);
                    }
                }
            }
            if let Some(ea) = self.eas[ei].as_mut() {
                ea.pending = false;
            }
        }

        for i in 0..self.rps.len() {
            let Some(rp) = self.rps[i].as_ref() else {
                continue;
            };
            for adjacent in rp.adjacent_eas() {
                let Some(ea) = self.exclusion_area(adjacent.index).filter(|ea| ea.pending) else {
                    continue;
                };
                stats.ea_rp_tests += 1;
                if Self::ea_rp_collide(ea, rp) {
                    pairs.push(CollisionPair::ExclusionArea {
                        ea: adjacent.index,
                        rp: RpIndex(i),
                    });
                    if !exhaustive {
                        return (pairs, stats);
                    }
                }
            }
            for adjacent in rp.adjacent_rps() {
                let Some(other) = self.positioner(adjacent.index).filter(|rp| rp.pending) else {
                    continue;
                };
                stats.rp_rp_tests += 1;
                if Self::rp_rp_collide(rp, other) {
                    pairs.push(CollisionPair::Positioners {
                        a: RpIndex(i),
                        b: adjacent.index,
                    });
                    if !exhaustive {
                        return (pairs, stats);
                    }
                }
            }
            if let Some(rp) = self.rps[i].as_mut() {
                rp.pending = false;
            }
        }
        (pairs, stats)
    }

    /// Whether any pair of adjacent items collides.
    pub fn there_is_collision(&mut self) -> Result<bool> {
        self.ensure_current("there_is_collision")?;
        let (pairs, stats) = self.sweep(false);
        self.last_sweep = stats;
        if let Some(pair) = pairs.first() {
            warn!(?pair, "collision detected");
        }
        Ok(!pairs.is_empty())
    }

    /// Every colliding pair of adjacent items.
    pub fn search_colliding(&mut self) -> Result<Vec<CollisionPair>> {
        self.ensure_current("search_colliding")?;
        let (pairs, stats) = self.sweep(true);
        self.last_sweep = stats;
        for pair in &pairs {
            warn!(?pair, "collision detected");
        }
        debug!(tests = stats.total(), colliding = pairs.len(), "collision sweep");
        Ok(pairs)
    }

    /// Contour tests performed by the last sweep.
    pub fn last_sweep_stats(&self) -> SweepStats {
        self.last_sweep
    }

    /// Whether the given positioner collides with any of its neighbours.
    pub fn positioner_collides(&self, index: RpIndex) -> Result<bool> {
        self.ensure_current("positioner_collides")?;
        let rp = self.rp(index)?;
        let with_ea = rp
            .adjacent_eas()
            .iter()
            .filter_map(|a| self.exclusion_area(a.index))
            .any(|ea| Self::ea_rp_collide(ea, rp));
        let with_rp = rp
            .adjacent_rps()
            .iter()
            .filter_map(|a| self.positioner(a.index))
            .any(|other| Self::rp_rp_collide(rp, other));
        Ok(with_ea || with_rp)
    }

    //------------------------------------------------------------------
    // distances

    fn rp_rp_distance(a: &RoboticPositioner, b: &RoboticPositioner) -> f64 {
        let (ca, cb) = (a.cylinder(), b.cylinder());
        ca.arm()
            .distance_min_to(cb.arm())
            .min(ca.arm().distance_min_to(cb.barrier()))
            .min(ca.barrier().distance_min_to(cb.arm()))
    }

    /// Records the current contour distances in every adjacency entry.
    pub fn update_distances(&mut self) -> Result<()> {
        self.ensure_current("update_distances")?;
        let mut observed = Vec::new();
        for (i, rp) in self.positioners() {
            let to_eas: Vec<f64> = rp
                .adjacent_eas()
                .iter()
                .map(|a| {
                    self.exclusion_area(a.index)
                        .map_or(f64::INFINITY, |ea| ea.barrier().distance_min_to(rp.cylinder().arm()))
                })
                .collect();
            let to_rps: Vec<f64> = rp
                .adjacent_rps()
                .iter()
                .map(|a| {
                    self.positioner(a.index)
                        .map_or(f64::INFINITY, |other| Self::rp_rp_distance(rp, other))
                })
                .collect();
            observed.push((i, to_eas, to_rps));
        }
        for (i, to_eas, to_rps) in observed {
            if let Some(rp) = self.rps[i.0].as_mut() {
                for (adjacent, d) in rp.adjacent_eas.iter_mut().zip(to_eas) {
                    adjacent.observe(d);
                }
                for (adjacent, d) in rp.adjacent_rps.iter_mut().zip(to_rps) {
                    adjacent.observe(d);
                }
            }
        }
        Ok(())
    }

    pub fn reset_distances(&mut self) {
        for rp in self.rps.iter_mut().flatten() {
            rp.adjacent_eas.iter_mut().for_each(|a| a.reset());
            rp.adjacent_rps.iter_mut().for_each(|a| a.reset());
        }
    }

    //------------------------------------------------------------------
    // motion

    /// Moves the given positioners to their targets by linear interpolation
    /// in joint space, sweeping for collisions at each of `samples` steps.
    ///
    /// The positioners end at their targets and the adjacency entries hold
    /// the minimum and final distances of the motion.
    pub fn check_motion(&mut self, targets: &[MotionTarget], samples: usize) -> Result<MotionReport> {
        if samples == 0 {
            return Err(Error::invalid_argument("samples", "should be upper zero"));
        }
        self.ensure_current("check_motion")?;
        let mut starts = Vec::with_capacity(targets.len());
        for target in targets {
            if !target.theta_1.is_finite() || !target.theta_2.is_finite() {
                return Err(Error::invalid_argument("motion target", "angles should be finite"));
            }
            let cylinder = self.rp(target.index)?.cylinder();
            starts.push((cylinder.theta_1(), cylinder.theta_2()));
        }

        self.reset_distances();
        let mut report = MotionReport {
            samples,
            ..MotionReport::default()
        };
        for sample in 1..=samples {
            let f = sample as f64 / samples as f64;
            for (target, &(t1, t2)) in targets.iter().zip(&starts) {
                if let Some(rp) = self.positioner_mut(target.index) {
                    rp.cylinder_mut().set_angles(
                        t1 + f * (target.theta_1 - t1),
                        t2 + f * (target.theta_2 - t2),
                    )?;
                }
            }
            self.ensure_current("check_motion")?;
            let (pairs, stats) = self.sweep(true);
            report.contour_tests += stats.total();
            for pair in pairs {
                if report.collisions.iter().all(|c| c.pair != pair) {
                    warn!(sample, ?pair, "collision during motion");
                    report.collisions.push(MotionCollision { sample, pair });
                }
            }
            self.update_distances()?;
        }
        info!(
            positioners = targets.len(),
            samples,
            collisions = report.collisions.len(),
            "motion checked"
        );
        Ok(report)
    }
}

fn footprints_len(footprints: &[Option<Footprint>]) -> usize {
    footprints.iter().flatten().count()
}

fn no_such_item(what: &str, index: usize) -> Error {
    Error::invalid_argument(format!("{} index", what), format!("no {} at slot {}", what, index))
}
