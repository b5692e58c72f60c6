use super::{array, rp_at, PITCH};
use fiberpos_collision::{ExclusionArea, FiberMosModel, RoboticPositioner};
use fiberpos_core::{Contour, Point};

#[test]
fn test_neighbours_of_a_single_ring() {
    let model = array(1, false);
    assert_eq!(model.positioner_count(), 7);
    let center = rp_at(&model, Point::origin());
    assert_eq!(model.positioner(center).unwrap().adjacent_rps().len(), 6);
    for (i, rp) in model.positioners() {
        if i != center {
            // centre plus the two ring neighbours
            assert_eq!(rp.adjacent_rps().len(), 3);
        }
    }
    assert_eq!(model.adjacency_edge_count(), 12);
}

#[test]
fn test_adjacency_is_symmetric() {
    let model = array(2, true);
    for (i, rp) in model.positioners() {
        for adjacent in rp.adjacent_rps() {
            assert_ne!(adjacent.index, i);
            let other = model.positioner(adjacent.index).unwrap();
            assert!(other.adjacent_rps().iter().any(|a| a.index == i));
        }
        for adjacent in rp.adjacent_eas() {
            let ea = model.exclusion_area(adjacent.index).unwrap();
            assert!(ea.adjacent_rps().contains(&i));
        }
    }
}

#[test]
fn test_far_exclusion_area_has_no_neighbours() {
    let mut model = array(1, true);
    let far = model.add_exclusion_area(
        ExclusionArea::new(99, Contour::circle(Point::origin(), 1.0), Point::new(100.0, 0.0), 0.0)
            .unwrap(),
    );
    model.determine_adjacents();
    assert!(model.exclusion_area(far).unwrap().adjacent_rps().is_empty());
    for (_, rp) in model.positioners() {
        assert!(rp.adjacent_eas().iter().all(|a| a.index != far));
    }
    // the ring just outside the grid touches the outer positioners only
    for (_, ea) in model.exclusion_areas() {
        for &ri in ea.adjacent_rps() {
            let d = model.positioner(ri).unwrap().cylinder().p0().distance_to(&ea.barrier().p0());
            assert!((d - PITCH).abs() < 1e-9);
        }
    }
}

#[test]
fn test_empty_barrier_is_never_adjacent() {
    let mut model = FiberMosModel::new();
    model.add_positioner(RoboticPositioner::new(1, Point::origin(), 0.0).unwrap());
    let ea = model.add_exclusion_area(
        ExclusionArea::new(1, Contour::default(), Point::origin(), 0.0).unwrap(),
    );
    model.determine_adjacents();
    assert!(model.exclusion_area(ea).unwrap().adjacent_rps().is_empty());
}

#[test]
fn test_removal_requires_new_adjacents() {
    let mut model = array(1, false);
    let center = rp_at(&model, Point::origin());
    model.remove_positioner(center).unwrap();
    assert!(!model.adjacents_are_current());
    assert!(model.there_is_collision().unwrap_err().is_improper_call());

    model.determine_adjacents();
    assert_eq!(model.adjacency_edge_count(), 6);
    for (_, rp) in model.positioners() {
        assert!(rp.adjacent_rps().iter().all(|a| a.index != center));
    }
}

#[test]
fn test_exclusion_areas_are_never_adjacent_to_each_other() {
    let mut model = FiberMosModel::new();
    let mut add = |id, center| {
        let contour = Contour::circle(Point::origin(), 1.0);
        model.add_exclusion_area(ExclusionArea::new(id, contour, center, 0.0).unwrap())
    };
    // two overlapping areas, one far away, and a positioner beside the pair
    let a = add(1, Point::origin());
    let b = add(2, Point::new(1.5, 0.0));
    let far = add(3, Point::new(40.0, 0.0));
    let rp = model.add_positioner(RoboticPositioner::new(1, Point::new(0.0, 3.5), 0.0).unwrap());
    model.determine_adjacents();

    let (ea_a, ea_far) = (model.exclusion_area(a).unwrap(), model.exclusion_area(far).unwrap());
    let gap = ea_a.barrier().p0().distance_to(&ea_far.barrier().p0());
    assert!(gap > ea_a.spm() + ea_far.spm() + 2.0 * 1.0);

    assert_eq!(model.exclusion_area(a).unwrap().adjacent_rps(), &[rp]);
    assert_eq!(model.exclusion_area(b).unwrap().adjacent_rps(), &[rp]);
    assert!(model.exclusion_area(far).unwrap().adjacent_rps().is_empty());
    assert_eq!(model.adjacency_edge_count(), 2);

    // overlapping fixed barriers are not a collision, only arms are tested
    assert!(model.search_colliding().unwrap().is_empty());
    assert_eq!(model.last_sweep_stats().ea_rp_tests, 2);
    assert_eq!(model.last_sweep_stats().rp_rp_tests, 0);
}
