use drillkit_path::{
    create_catmull_rom_spline, ControlPointKind, ControlPointManager, CubicCurve, Path, Point,
    Segment,
};

fn catmull_path() -> Path {
    create_catmull_rom_spline(&[
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(20.0, 0.0),
        Point::new(30.0, 10.0),
    ])
}

#[test]
fn test_adjacent_cubics_share_one_join_point() {
    let manager = ControlPointManager::new(catmull_path());
    // 3 cubics x 4 handles = 12, merged at the 2 interior joins: 10 globals.
    assert_eq!(manager.get_all_control_points(false, false).len(), 10);
    let join = manager
        .get_control_point_at(Point::new(10.0, 10.0), 0.1)
        .unwrap();
    assert_eq!(join.segment_hooks.len(), 2);
}

#[test]
fn test_dragging_a_join_moves_both_cubics() {
    let mut manager = ControlPointManager::new(catmull_path());
    let join_id = manager
        .get_control_point_at(Point::new(20.0, 0.0), 0.1)
        .unwrap()
        .id;
    assert!(manager.move_control_point(join_id, Point::new(22.0, -2.0)));

    let segments = manager.path().segments();
    assert_eq!(segments[1].end_point(), Point::new(22.0, -2.0));
    assert_eq!(segments[2].start_point(), Point::new(22.0, -2.0));
    // The untouched join is untouched.
    assert_eq!(segments[0].end_point(), Point::new(10.0, 10.0));
}

#[test]
fn test_bezier_handles_stay_independent() {
    let path = Path::new(vec![
        Segment::CubicCurve(CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(15.0, 10.0),
            Point::new(20.0, 0.0),
        )),
        Segment::CubicCurve(CubicCurve::new(
            Point::new(20.0, 0.0),
            Point::new(25.0, -10.0),
            Point::new(35.0, -10.0),
            Point::new(40.0, 0.0),
        )),
    ]);
    let mut manager = ControlPointManager::new(path);
    let handle_id = manager
        .get_control_point_at(Point::new(5.0, 10.0), 0.1)
        .unwrap()
        .id;
    assert!(manager.move_control_point(handle_id, Point::new(5.0, 20.0)));
    match &manager.path().segments()[0] {
        Segment::CubicCurve(c) => {
            assert_eq!(c.control1(), Point::new(5.0, 20.0));
            assert_eq!(c.control2(), Point::new(15.0, 10.0));
        }
        other => panic!("expected cubic, got {other:?}"),
    }
    // The second segment never changed.
    assert_eq!(
        manager.path().segments()[1].start_point(),
        Point::new(20.0, 0.0)
    );
}

#[test]
fn test_first_and_last_points_anchor_the_path() {
    let manager = ControlPointManager::new(catmull_path());
    let first = manager.get_first_control_point().unwrap();
    let last = manager.get_last_control_point().unwrap();
    assert_eq!(first.point, Point::new(0.0, 0.0));
    assert_eq!(last.point, Point::new(30.0, 10.0));
    assert!(first
        .segment_hooks
        .iter()
        .any(|h| h.segment_index == 0 && h.kind == ControlPointKind::Start));

    let without_anchors = manager.get_all_control_points(true, true);
    assert_eq!(without_anchors.len(), 8);
    assert!(without_anchors.iter().all(|cp| cp.id != first.id));
    assert!(without_anchors.iter().all(|cp| cp.id != last.id));
}

#[test]
fn test_index_is_stale_until_rebuilt() {
    let mut manager = ControlPointManager::new(catmull_path());
    let before = manager.get_all_control_points(false, false).len();
    manager
        .path_mut()
        .add_segment(Segment::CubicCurve(CubicCurve::new(
            Point::new(30.0, 10.0),
            Point::new(35.0, 10.0),
            Point::new(40.0, 5.0),
            Point::new(45.0, 5.0),
        )));
    // Direct path mutation: the index still reflects the old path.
    assert_eq!(manager.get_all_control_points(false, false).len(), before);
    manager.rebuild_control_points();
    assert_eq!(
        manager.get_all_control_points(false, false).len(),
        before + 3
    );
    assert_eq!(
        manager.get_last_control_point().unwrap().point,
        Point::new(45.0, 5.0)
    );
}

#[test]
fn test_moving_a_point_keeps_path_length_consistent() {
    let mut manager = ControlPointManager::new(catmull_path());
    let id = manager
        .get_control_point_at(Point::new(10.0, 10.0), 0.1)
        .unwrap()
        .id;
    assert!(manager.move_control_point(id, Point::new(10.0, 30.0)));
    // The path is still continuous: each segment starts where the previous
    // one ended.
    let segments = manager.path().segments();
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end_point(), pair[1].start_point());
    }
}
