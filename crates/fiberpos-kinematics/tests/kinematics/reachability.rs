use super::cylinder;
use fiberpos_core::{Function, Point};
use fiberpos_kinematics::{Cylinder, CylinderInstance, TargetResolution};
use std::f64::consts::PI;

#[test]
fn test_extended_arm_reaches_outer_radius() {
    let c = cylinder(1.0, 1.0);
    assert_eq!(c.r_3min(), 0.0);
    assert_eq!(c.r_3max(), 2.0);

    let resolution = c.angles_to_go_polar(2.0, 0.0).unwrap();
    assert!(resolution.is_reachable());
    let (theta_1, theta_2) = resolution.angles();
    assert!(theta_1.abs() < 1e-9);
    assert!(theta_2.abs() < 1e-9);
}

#[test]
fn test_linear_step_function() {
    let mut c = Cylinder::from_instance(CylinderInstance {
        f1: Function::linear(0.0, 0.0, 2.0 * PI, 2.0 * PI).unwrap(),
        quantify_1: false,
        ..CylinderInstance::default()
    })
    .unwrap();
    let axis = c.axis1();
    assert!((axis.sb() - 2.0 * PI / axis.rbs()).abs() < 1e-9);
    assert!((axis.sb() - 2.0 * PI).abs() < 1e-9);

    c.set_theta_1(PI).unwrap();
    assert!((c.p_1() - PI).abs() < 1e-12);
    c.set_quantify_1(true);
    assert_eq!(c.p_1(), 3.0);
}

#[test]
fn test_target_outside_annulus_is_unreachable() {
    let c = cylinder(2.0, 1.0);
    let far = c.angles_to_go_p3(Point::new(5.0, 0.0)).unwrap();
    assert!(!far.is_reachable());
    let (theta_1, theta_2) = far.angles();
    // Closest pose is the extended arm pointing at the target.
    assert!(c.p3_of_angles(theta_1, theta_2).distance_to(&Point::new(3.0, 0.0)) < 1e-9);

    let near = c.angles_to_go_p3(Point::new(0.5, 0.0)).unwrap();
    assert!(matches!(near, TargetResolution::Unreachable { .. }));
}

#[test]
fn test_move_to_reachable_point() {
    let mut c = cylinder(2.0, 1.0);
    let target = c.p3_of_angles(1.0, 1.2);
    assert!(c.move_to_p3(target).unwrap());
    assert!(c.p3().distance_to(&target) < 1e-9);
}

#[test]
fn test_move_to_unreachable_point_stops_at_boundary() {
    let mut c = cylinder(2.0, 1.0);
    assert!(!c.move_to_p3(Point::new(0.0, 10.0)).unwrap());
    assert!((c.p3().norm() - c.r_3max()).abs() < 1e-9);
    assert!(c.move_to_p3(Point::new(f64::NAN, 0.0)).is_err());
}

#[test]
fn test_theta_2_for_radius() {
    let c = cylinder(1.0, 1.0);
    let theta_2 = c.theta_2_to_go_r_3(2.0_f64.sqrt()).unwrap();
    assert!((theta_2 - PI / 2.0).abs() < 1e-9);
    assert!((c.r_3_of_theta_2(theta_2) - 2.0_f64.sqrt()).abs() < 1e-9);
    assert!(c.theta_2_to_go_r_3(2.5).is_none());
    assert!(c.theta_2_to_go_r_3(f64::NAN).is_none());
}

#[test]
fn test_set_theta_1_clamps_to_domain() {
    let mut c = cylinder(1.0, 1.0);
    c.set_theta_1_domain(1.0, 2.0).unwrap();
    for requested in [-10.0, 0.5, 2.5, 100.0] {
        c.set_theta_1(requested).unwrap();
        assert!(c.theta_1() >= 1.0 && c.theta_1() <= 2.0);
    }
    c.set_theta_1(2.5).unwrap();
    assert_eq!(c.theta_1(), 2.0);
}

#[test]
fn test_non_monotonic_step_function_rejected() {
    let f = Function::new(vec![(0.0, 0.0), (PI, 100.0), (2.0 * PI, 50.0)]).unwrap();
    let err = Cylinder::from_instance(CylinderInstance {
        f1: f.clone(),
        ..CylinderInstance::default()
    })
    .unwrap_err();
    assert!(err.is_invalid_argument());

    let mut c = cylinder(1.0, 1.0);
    assert!(c.set_f1(f).unwrap_err().is_invalid_argument());
}

#[test]
fn test_g_inverts_f() {
    let f = Function::new(vec![(0.0, 0.0), (1.0, 300.0), (2.0 * PI, 1800.0)]).unwrap();
    let mut c = cylinder(1.0, 1.0);
    c.set_f1(f).unwrap();
    let axis = c.axis1();
    for theta in [0.0, 0.3, 1.0, 2.5, 6.0] {
        assert!((axis.theta_of_step(axis.step_of_theta(theta)) - theta).abs() < 1e-9);
    }
}
