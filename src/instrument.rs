//! Building a positioner array from a [`Config`].

use fiberpos_collision::{
    hexagonal_centers, ring_centers, ExclusionArea, ExclusionAreaInstance, FiberMosModel,
    RoboticPositioner, RoboticPositionerInstance, Tolerances,
};
use fiberpos_core::{Contour, Function, Point, Result};
use fiberpos_kinematics::CylinderInstance;
use fiberpos_settings::Config;
use tracing::info;

/// Cylinder parameters of a positioner anchored at `p0`, with axis 1 at the
/// bottom and axis 2 at the top of their domains.
pub fn cylinder_instance(config: &Config, p0: Point) -> Result<CylinderInstance> {
    let p = &config.positioner;
    let barrier_contour = if p.base_radius > 0.0 {
        Contour::circle(Point::origin(), p.base_radius)
    } else {
        Contour::default()
    };
    Ok(CylinderInstance {
        p0,
        theta_o1: 0.0,
        l01: p.l01,
        f1: Function::steps_per_turn(p.sb1)?,
        theta_1_min: p.theta_1_min,
        theta_1_max: p.theta_1_max,
        quantify_1: p.quantify_1,
        theta_1: p.theta_1_min,
        l13: p.l13,
        theta_o3o: p.theta_o3o,
        f2: Function::steps_per_turn(p.sb2)?,
        theta_2_min: p.theta_2_min,
        theta_2_max: p.theta_2_max,
        quantify_2: p.quantify_2,
        theta_2: p.theta_2_max,
        arm_contour: Contour::capsule(p.l13, p.arm_half_width),
        barrier_contour,
    })
}

/// Hexagonal array of positioners, optionally ringed by exclusion areas.
/// The configuration is validated first. Adjacents are determined.
pub fn build_model(config: &Config) -> anyhow::Result<FiberMosModel> {
    config.validate()?;
    let t = &config.tolerances;
    let layout = &config.layout;
    let mut model = FiberMosModel::new();

    for (i, p0) in hexagonal_centers(layout.rings, layout.pitch).into_iter().enumerate() {
        model.add_positioner(RoboticPositioner::from_instance(RoboticPositionerInstance {
            id: i as u32 + 1,
            cylinder: cylinder_instance(config, p0)?,
            tolerances: Tolerances::new(t.positioner_eo, t.positioner_ep)?,
        })?);
    }
    if layout.exclusion_ring {
        let ring = ring_centers(layout.rings + 1, layout.pitch);
        for (i, p0) in ring.into_iter().enumerate() {
            model.add_exclusion_area(ExclusionArea::from_instance(ExclusionAreaInstance {
                id: i as u32 + 1,
                p0,
                theta_o1: 0.0,
                contour: Contour::circle(Point::origin(), layout.exclusion_radius),
                tolerances: Tolerances::new(t.exclusion_eo, t.exclusion_ep)?,
            })?);
        }
    }
    model.determine_adjacents();
    info!(
        positioners = model.positioner_count(),
        exclusion_areas = model.exclusion_area_count(),
        "instrument built"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instrument() {
        let model = build_model(&Config::default()).unwrap();
        assert_eq!(model.positioner_count(), 19);
        assert_eq!(model.exclusion_area_count(), 18);
        assert!(model.adjacents_are_current());
    }

    #[test]
    fn test_parked_instrument_is_collision_free() {
        let mut config = Config::default();
        config.positioner.quantify_1 = false;
        config.positioner.quantify_2 = false;
        let mut model = build_model(&config).unwrap();
        assert!(model.search_colliding().unwrap().is_empty());
    }

    #[test]
    fn test_base_radius_adds_a_barrier() {
        let mut config = Config::default();
        config.positioner.base_radius = 0.5;
        let instance = cylinder_instance(&config, Point::new(1.0, 2.0)).unwrap();
        assert!(!instance.barrier_contour.is_empty());
        config.positioner.base_radius = 0.0;
        let instance = cylinder_instance(&config, Point::origin()).unwrap();
        assert!(instance.barrier_contour.is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = Config::default();
        config.positioner.sb1 = 0.0;
        let err = build_model(&config).unwrap_err();
        assert!(err.to_string().contains("positioner.sb1"));
        assert!(cylinder_instance(&config, Point::origin())
            .unwrap_err()
            .is_invalid_argument());

        let mut config = Config::default();
        config.layout.pitch = -1.0;
        assert!(build_model(&config).is_err());
    }
}
