use drillkit_formation::{
    bbox_from_coordinates, compute_optimal_coordinate_mapping, hungarian_algorithm,
    FormationError, Point,
};
use indexmap::IndexMap;
use proptest::collection::vec;
use proptest::prelude::*;

#[test]
fn test_mapping_is_total_and_unique() {
    let mut current = IndexMap::new();
    current.insert(101, Point::new(0.0, 0.0));
    current.insert(102, Point::new(4.0, 0.0));
    current.insert(103, Point::new(8.0, 0.0));
    let targets = [
        Point::new(8.0, 4.0),
        Point::new(0.0, 4.0),
        Point::new(4.0, 4.0),
    ];
    let mapping = compute_optimal_coordinate_mapping(&current, &targets).unwrap();
    assert_eq!(mapping.len(), 3);
    // Every marcher appears, every target is used exactly once.
    for id in [101, 102, 103] {
        assert!(mapping.contains_key(&id));
    }
    let mut used: Vec<Point> = mapping.values().copied().collect();
    used.sort_by(|a, b| a.x.total_cmp(&b.x));
    assert_eq!(used, vec![targets[1], targets[2], targets[0]]);
    // Each marcher keeps its column: that is the minimum-distance pairing.
    assert_eq!(mapping[&101], Point::new(0.0, 4.0));
    assert_eq!(mapping[&102], Point::new(4.0, 4.0));
    assert_eq!(mapping[&103], Point::new(8.0, 4.0));
}

#[test]
fn test_mismatched_counts_fail() {
    let mut current = IndexMap::new();
    current.insert(1, Point::new(0.0, 0.0));
    let err = compute_optimal_coordinate_mapping(&current, &[]).unwrap_err();
    assert_eq!(
        err,
        FormationError::CountMismatch {
            marchers: 1,
            targets: 0
        }
    );
}

fn square_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=15).prop_flat_map(|n| vec(vec(0.0f64..1000.0, n), n))
}

proptest! {
    #[test]
    fn prop_assignment_is_a_bijection(cost in square_matrix()) {
        let n = cost.len();
        let assignment = hungarian_algorithm(&cost, n);
        prop_assert_eq!(assignment.len(), n + 1);
        let mut seen = vec![false; n + 1];
        for &marcher in &assignment[1..] {
            prop_assert!((1..=n).contains(&marcher));
            prop_assert!(!seen[marcher]);
            seen[marcher] = true;
        }
    }

    #[test]
    fn prop_solution_is_no_worse_than_identity(cost in square_matrix()) {
        let n = cost.len();
        let assignment = hungarian_algorithm(&cost, n);
        let solved: f64 = (1..=n).map(|j| cost[assignment[j] - 1][j - 1]).sum();
        let identity: f64 = (0..n).map(|i| cost[i][i]).sum();
        prop_assert!(solved <= identity + 1e-6);
    }

    #[test]
    fn prop_bbox_contains_every_coordinate(
        points in vec((-500.0f64..500.0, -500.0f64..500.0), 0..40)
    ) {
        let points: Vec<Point> = points.into_iter().map(|(x, y)| Point::new(x, y)).collect();
        let bounds = bbox_from_coordinates(&points);
        prop_assert!(bounds.width >= 0.0 && bounds.height >= 0.0);
        for p in &points {
            prop_assert!(p.x >= bounds.left && p.x <= bounds.left + bounds.width);
            prop_assert!(p.y >= bounds.top && p.y <= bounds.top + bounds.height);
        }
    }

    #[test]
    fn prop_rigid_translation_maps_each_marcher_to_its_copy(
        offsets in vec((-50.0f64..50.0, -50.0f64..50.0), 1..2),
        n in 1usize..=12,
    ) {
        let (dx, dy) = offsets[0];
        let mut current = IndexMap::new();
        let mut targets = Vec::new();
        for i in 0..n {
            // Spread points far enough apart that the translation is the
            // unique optimum.
            let p = Point::new((i % 4) as f64 * 200.0, (i / 4) as f64 * 200.0);
            current.insert(i as i64, p);
            targets.push(Point::new(p.x + dx, p.y + dy));
        }
        let mapping = compute_optimal_coordinate_mapping(&current, &targets).unwrap();
        for (id, from) in &current {
            let to = mapping[id];
            prop_assert!((to.x - (from.x + dx)).abs() < 1e-9);
            prop_assert!((to.y - (from.y + dy)).abs() < 1e-9);
        }
    }
}
