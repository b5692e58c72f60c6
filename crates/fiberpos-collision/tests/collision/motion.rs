use super::{array, rp_at, PITCH};
use fiberpos_collision::{CollisionPair, MotionTarget};
use fiberpos_core::Point;
use std::f64::consts::PI;

#[test]
fn test_free_motion_ends_at_targets() {
    let mut model = array(1, true);
    let a = rp_at(&model, Point::origin());
    let b = rp_at(&model, Point::new(PITCH, 0.0));
    let report = model
        .check_motion(&[MotionTarget { index: a, theta_1: 0.0, theta_2: 0.0 }], 20)
        .unwrap();
    assert!(report.is_collision_free());
    assert_eq!(report.samples, 20);
    assert_eq!(report.contour_tests, 20 * model.adjacency_edge_count());

    let cylinder = model.positioner(a).unwrap().cylinder();
    assert!(cylinder.theta_1().abs() < 1e-12);
    assert!(cylinder.theta_2().abs() < 1e-12);

    let adjacent = model
        .positioner(a)
        .unwrap()
        .adjacent_rps()
        .iter()
        .find(|adj| adj.index == b)
        .copied()
        .unwrap();
    // extending towards a parked neighbour only brings the arms closer
    assert!((adjacent.dmin - adjacent.dend).abs() < 1e-9);
    assert!(adjacent.dend > 0.0 && adjacent.dend.is_finite());
}

#[test]
fn test_head_on_motion_collides() {
    let mut model = array(1, false);
    let a = rp_at(&model, Point::origin());
    let b = rp_at(&model, Point::new(PITCH, 0.0));
    let targets = [
        MotionTarget { index: a, theta_1: 0.0, theta_2: 0.0 },
        MotionTarget { index: b, theta_1: PI, theta_2: 0.0 },
    ];
    let report = model.check_motion(&targets, 10).unwrap();
    assert!(!report.is_collision_free());
    assert_eq!(report.collisions.len(), 1);
    assert!(report.collisions[0].sample >= 1 && report.collisions[0].sample <= 10);
    match report.collisions[0].pair {
        CollisionPair::Positioners { a: i, b: j } => {
            assert!((i, j) == (a, b) || (i, j) == (b, a));
        }
        other => panic!("unexpected pair {:?}", other),
    }
    assert!(model.positioner(a).unwrap().dmin() < 0.1);
}

#[test]
fn test_motion_arguments_are_checked() {
    let mut model = array(1, false);
    let a = rp_at(&model, Point::origin());
    let target = MotionTarget { index: a, theta_1: 0.0, theta_2: 0.0 };
    assert!(model.check_motion(&[target], 0).unwrap_err().is_invalid_argument());

    let nan = MotionTarget { theta_1: f64::NAN, ..target };
    assert!(model.check_motion(&[nan], 4).unwrap_err().is_invalid_argument());

    let missing = MotionTarget { index: fiberpos_collision::RpIndex(999), ..target };
    assert!(model.check_motion(&[missing], 4).unwrap_err().is_invalid_argument());
}
