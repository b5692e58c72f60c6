use super::coarse_cylinder;
use fiberpos_core::Point;
use fiberpos_kinematics::Cylinder;

fn tip_at_steps(c: &Cylinder, s1: i64, s2: i64) -> Point {
    c.p3_of_angles(
        c.axis1().theta_of_step(s1 as f64),
        c.axis2().theta_of_step(s2 as f64),
    )
}

#[test]
fn test_matches_exhaustive_search_on_coarse_grid() {
    let mut c = coarse_cylinder(36.0);
    let (first_1, last_1) = c.axis1().step_bounds();
    let (first_2, last_2) = c.axis2().step_bounds();
    for &(theta_1, theta_2) in &[(1.234, 0.987), (0.05, 3.1), (6.2, 0.4), (3.0, 1.7)] {
        let target = c.p3_of_angles(theta_1, theta_2);
        let found = c.nearest_stable_position(theta_1, theta_2).unwrap();

        let mut brute = f64::INFINITY;
        for s1 in first_1..=last_1 {
            for s2 in first_2..=last_2 {
                brute = brute.min(tip_at_steps(&c, s1, s2).distance_to(&target));
            }
        }
        assert!(
            (found.distance - brute).abs() < 1e-12,
            "found {} but exhaustive search gives {}",
            found.distance,
            brute
        );
        let check = tip_at_steps(&c, found.p_1 as i64, found.p_2 as i64).distance_to(&target);
        assert!((check - found.distance).abs() < 1e-12);
    }
}

#[test]
fn test_never_worse_than_corners() {
    let mut c = Cylinder::new(Point::new(2.0, -1.0), 0.3).unwrap();
    let (theta_1, theta_2) = (2.345_678, 1.234_567);
    let found = c.nearest_stable_position(theta_1, theta_2).unwrap();
    let target = c.p3_of_angles(theta_1, theta_2);
    let p_1 = c.axis1().step_of_theta(theta_1);
    let p_2 = c.axis2().step_of_theta(theta_2);
    for s1 in [p_1.floor(), p_1.ceil()] {
        for s2 in [p_2.floor(), p_2.ceil()] {
            let d = tip_at_steps(&c, s1 as i64, s2 as i64).distance_to(&target);
            assert!(found.distance <= d);
        }
    }
    assert_eq!(found.p_1.fract(), 0.0);
    assert_eq!(found.p_2.fract(), 0.0);
}

#[test]
fn test_exact_grid_point_returns_immediately() {
    let mut c = coarse_cylinder(36.0);
    let theta_1 = c.axis1().theta_of_step(7.0);
    let theta_2 = c.axis2().theta_of_step(4.0);
    let found = c.nearest_stable_position(theta_1, theta_2).unwrap();
    assert_eq!(found.distance, 0.0);
    assert_eq!((found.p_1, found.p_2), (7.0, 4.0));
}

#[test]
fn test_axes_are_restored() {
    let mut c = Cylinder::new(Point::origin(), 0.0).unwrap();
    c.set_steps(400.0, 300.0).unwrap();
    let before = c.clone();
    c.nearest_stable_position(1.0, 2.0).unwrap();
    assert_eq!(c, before);
    assert!(c.axis1().quantify());
    assert!(c.axis2().quantify());
}
