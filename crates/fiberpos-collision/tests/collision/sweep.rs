use super::{array, extend, rp_at, PITCH};
use fiberpos_collision::{CollisionPair, FiberMosModel, RoboticPositioner, Tolerances};
use fiberpos_core::{ContourShape, Point};
use std::f64::consts::PI;

#[test]
fn test_each_adjacent_pair_is_tested_once() {
    let mut model = array(2, true);
    let pairs = model.search_colliding().unwrap();
    assert!(pairs.is_empty());

    let stats = model.last_sweep_stats();
    assert_eq!(stats.total(), model.adjacency_edge_count());
    let ea_edges: usize = model.exclusion_areas().map(|(_, ea)| ea.adjacent_rps().len()).sum();
    assert_eq!(stats.ea_rp_tests, ea_edges);
    assert!(model.positioners().all(|(_, rp)| !rp.is_pending()));
}

#[test]
fn test_parked_array_is_collision_free() {
    let mut model = array(3, true);
    assert!(!model.there_is_collision().unwrap());
    let indices: Vec<_> = model.positioners().map(|(i, _)| i).collect();
    for i in indices {
        assert!(!model.positioner_collides(i).unwrap());
    }
}

#[test]
fn test_facing_arms_collide() {
    let mut model = array(1, false);
    let a = rp_at(&model, Point::origin());
    let b = rp_at(&model, Point::new(PITCH, 0.0));
    extend(&mut model, a, 0.0);
    assert!(!model.there_is_collision().unwrap());

    extend(&mut model, b, PI);
    assert!(model.there_is_collision().unwrap());
    let pairs = model.search_colliding().unwrap();
    assert_eq!(pairs.len(), 1);
    match pairs[0] {
        CollisionPair::Positioners { a: i, b: j } => {
            assert!((i, j) == (a, b) || (i, j) == (b, a));
        }
        other => panic!("unexpected pair {:?}", other),
    }
    assert!(model.positioner_collides(a).unwrap());
    assert!(model.positioner_collides(b).unwrap());
}

#[test]
fn test_arm_reaching_an_exclusion_area() {
    let mut model = array(1, true);
    let rp = rp_at(&model, Point::new(PITCH, 0.0));
    extend(&mut model, rp, 0.0);
    let pairs = model.search_colliding().unwrap();
    assert_eq!(pairs.len(), 1);
    match pairs[0] {
        CollisionPair::ExclusionArea { ea, rp: i } => {
            assert_eq!(i, rp);
            let center = model.exclusion_area(ea).unwrap().barrier().p0();
            assert!(center.distance_to(&Point::new(2.0 * PITCH, 0.0)) < 1e-9);
        }
        other => panic!("unexpected pair {:?}", other),
    }
}

#[test]
fn test_margins_widen_the_contact() {
    let mut model = array(1, false);
    let a = rp_at(&model, Point::origin());
    let b = rp_at(&model, Point::new(PITCH, 0.0));
    // outlines about 1.4 apart
    extend(&mut model, a, 0.0);
    let gap = model.positioner(a).unwrap().cylinder().arm().distance_min_to(
        model.positioner(b).unwrap().cylinder().arm(),
    );
    assert!(gap > 1.0 && gap < 2.0);
    let before = model.search_colliding().unwrap().len();
    assert_eq!(before, 0);

    let indices: Vec<_> = model.positioners().map(|(i, _)| i).collect();
    for i in indices {
        let rp = model.positioner_mut(i).unwrap();
        rp.set_tolerances(Tolerances::new(0.0, 1.0).unwrap()).unwrap();
    }
    assert!(model.there_is_collision().unwrap_err().is_improper_call());
    model.determine_adjacents();
    let after = model.search_colliding().unwrap().len();
    assert!(after > before);
}

#[test]
fn test_stale_adjacents_are_rejected() {
    let mut model = array(1, false);
    model.add_positioner(RoboticPositioner::new(50, Point::new(0.0, 50.0), 0.0).unwrap());
    assert!(model.search_colliding().unwrap_err().is_improper_call());
    model.determine_adjacents();
    assert!(model.search_colliding().is_ok());

    let center = rp_at(&model, Point::origin());
    model
        .positioner_mut(center)
        .unwrap()
        .cylinder_mut()
        .set_p0(Point::new(0.5, 0.0))
        .unwrap();
    assert!(model.there_is_collision().unwrap_err().is_improper_call());
    assert!(model.positioner_collides(center).unwrap_err().is_improper_call());
}

#[test]
fn test_moving_axes_keeps_adjacents_current() {
    let mut model = array(1, false);
    let center = rp_at(&model, Point::origin());
    extend(&mut model, center, 1.0);
    assert!(model.adjacents_are_current());
}

#[test]
fn test_crossing_arms_collide_without_margins() {
    let mut model = FiberMosModel::new();
    let mut indices = Vec::new();
    for (id, p0) in [(1, Point::origin()), (2, Point::new(2.2, -2.0))] {
        let mut rp = RoboticPositioner::new(id, p0, 0.0).unwrap();
        rp.cylinder_mut().set_quantify(false);
        rp.set_tolerances(Tolerances::new(0.0, 0.0).unwrap()).unwrap();
        indices.push(model.add_positioner(rp));
    }
    let (a, b) = (indices[0], indices[1]);
    model.determine_adjacents();
    assert_eq!(model.adjacency_edge_count(), 1);

    // a lies along +x, b stands upright across it
    extend(&mut model, a, 0.0);
    extend(&mut model, b, PI / 2.0);
    let (arm_a, arm_b) = (
        model.positioner(a).unwrap().cylinder().arm(),
        model.positioner(b).unwrap().cylinder().arm(),
    );
    assert_eq!(arm_a.distance_min_to(arm_b), 0.0);
    assert_eq!(model.positioner(a).unwrap().spm(), 0.0);

    assert!(model.there_is_collision().unwrap());
    let pairs = model.search_colliding().unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(matches!(pairs[0], CollisionPair::Positioners { .. }));
    assert!(model.positioner_collides(a).unwrap());

    // fold b back out of the way
    model
        .positioner_mut(b)
        .unwrap()
        .cylinder_mut()
        .set_angles(3.0 * PI / 2.0, 0.0)
        .unwrap();
    assert!(!model.there_is_collision().unwrap());
}
