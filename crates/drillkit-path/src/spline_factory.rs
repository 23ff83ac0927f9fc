//! Catmull-Rom path factory.
//!
//! Builds editable paths of cubic Bézier segments that interpolate a point
//! sequence, one segment per span. Unlike [`crate::segment::Spline`], the
//! result exposes per-segment Bézier handles, so downstream editors can
//! reshape individual spans.

use crate::path::Path;
use crate::segment::{CubicCurve, Point, Segment};

/// Builds a smooth path through `points` using Catmull-Rom tangents
/// converted to cubic Bézier handles with the standard 1/6 coefficient.
/// Endpoint neighbors clamp to the endpoints themselves (no wrap-around).
/// Fewer than 2 points yields an empty path.
pub fn create_catmull_rom_spline(points: &[Point]) -> Path {
    let n = points.len();
    if n < 2 {
        return Path::empty();
    }

    let mut segments = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        let c1 = Point::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0);
        let c2 = Point::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0);
        segments.push(Segment::CubicCurve(CubicCurve::new(p1, c1, c2, p2)));
    }
    Path::new(segments)
}

/// Like [`create_catmull_rom_spline`], but the points are given as deltas
/// from `origin`: each delta is summed onto the previous absolute point.
pub fn create_catmull_rom_spline_from_relative_points(deltas: &[Point], origin: Point) -> Path {
    let mut current = origin;
    let points: Vec<Point> = deltas
        .iter()
        .map(|d| {
            current = Point::new(current.x + d.x, current.y + d.y);
            current
        })
        .collect();
    create_catmull_rom_spline(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_every_input_point() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 10.0),
        ];
        let path = create_catmull_rom_spline(&points);
        assert_eq!(path.len(), 3);
        for (i, segment) in path.segments().iter().enumerate() {
            assert_eq!(segment.start_point(), points[i]);
            assert_eq!(segment.end_point(), points[i + 1]);
        }
    }

    #[test]
    fn two_points_make_a_straight_cubic() {
        let path = create_catmull_rom_spline(&[Point::new(0.0, 0.0), Point::new(12.0, 0.0)]);
        assert_eq!(path.len(), 1);
        assert_abs_diff_eq!(path.total_length(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn interior_handles_use_neighbor_tangents() {
        let path = create_catmull_rom_spline(&[
            Point::new(0.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(12.0, 6.0),
        ]);
        match &path.segments()[0] {
            Segment::CubicCurve(c) => {
                // First span: c1 from the clamped start, c2 from the
                // (p3 - p1) / 6 tangent.
                assert_eq!(c.control1(), Point::new(1.0, 0.0));
                assert_eq!(c.control2(), Point::new(4.0, -1.0));
            }
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn fewer_than_two_points_is_empty() {
        assert!(create_catmull_rom_spline(&[]).is_empty());
        assert!(create_catmull_rom_spline(&[Point::new(1.0, 2.0)]).is_empty());
    }

    #[test]
    fn relative_points_integrate_from_origin() {
        let path = create_catmull_rom_spline_from_relative_points(
            &[
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
            ],
            Point::new(100.0, 100.0),
        );
        assert_eq!(path.len(), 2);
        assert_eq!(path.start_point().unwrap(), Point::new(100.0, 100.0));
        assert_eq!(path.segments()[0].end_point(), Point::new(110.0, 100.0));
        assert_eq!(path.last_point().unwrap(), Point::new(110.0, 110.0));
    }
}
