use super::cylinder;
use fiberpos_core::Point;
use std::f64::consts::PI;

#[test]
fn test_chord_inside_annulus_is_inside_domain() {
    let c = cylinder(2.0, 1.0);
    let a = Point::new(0.0, 2.0);
    let b = Point::new(-2.0, 0.0);
    assert!(c.p3_in_domain(a).unwrap());
    assert!(!c.segment_invades_domain_p3(a, b).unwrap());
    assert!(!c.segment_cant_be_followed_by_p3(a, b).unwrap());
}

#[test]
fn test_segment_through_the_hole_invades() {
    let c = cylinder(2.0, 1.0);
    assert!(c
        .segment_invades_domain_p3(Point::new(2.0, 0.0), Point::new(-2.0, 0.0))
        .unwrap());
}

#[test]
fn test_unreachable_endpoint_invades() {
    let c = cylinder(2.0, 1.0);
    assert!(!c.p3_in_domain(Point::new(4.0, 0.0)).unwrap());
    assert!(c
        .segment_invades_domain_p3(Point::new(2.0, 0.0), Point::new(4.0, 0.0))
        .unwrap());
}

#[test]
fn test_crossing_a_fold_cannot_be_followed() {
    let c = cylinder(2.0, 1.0);
    // Leaves the pivot at the lower end of axis 1 through its folding arc.
    let a = Point::new(2.0, 0.0);
    let b = Point::new(0.0, 2.0);
    assert!(!c.segment_invades_domain_p3(a, b).unwrap());
    assert!(c.segment_cant_be_followed_by_p3(a, b).unwrap());
}

#[test]
fn test_polyline_short_circuits_on_first_bad_segment() {
    let mut c = cylinder(2.0, 1.0);
    c.set_theta_1_domain(0.0, PI).unwrap();
    let good = [Point::new(0.0, 2.0), Point::new(-2.0, 0.0)];
    assert!(!c.polyline_invades_domain_p3(&good).unwrap());

    let bad = [Point::new(0.0, 2.0), Point::new(-2.0, 0.0), Point::new(0.0, -2.0)];
    assert!(c.polyline_invades_domain_p3(&bad).unwrap());
    assert!(c.polyline_cant_be_followed_by_p3(&bad).unwrap());

    assert!(!c.polyline_invades_domain_p3(&[]).unwrap());
    assert!(c.polyline_invades_domain_p3(&[Point::new(0.0, -2.0)]).unwrap());
}
