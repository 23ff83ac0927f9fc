//! Cubic Bézier segment.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result, ValidationError};

use super::{
    decode_data, encode_data, expect_no_point_index, fmt_coord, integrate, quad, ControlPoint,
    ControlPointKind, Point, Segment, SegmentJsonData,
};

/// A cubic Bézier curve: start, two control handles, end.
#[derive(Debug, Clone)]
pub struct CubicCurve {
    start: Point,
    control1: Point,
    control2: Point,
    end: Point,
    start_point_override: Option<Point>,
    end_point_override: Option<Point>,
    arc_length: OnceCell<f64>,
}

impl PartialEq for CubicCurve {
    fn eq(&self, other: &Self) -> bool {
        // Memoized length is derived state and excluded from equality.
        self.start == other.start
            && self.control1 == other.control1
            && self.control2 == other.control2
            && self.end == other.end
            && self.start_point_override == other.start_point_override
            && self.end_point_override == other.end_point_override
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CubicCurveData {
    start_point: Point,
    control1: Point,
    control2: Point,
    end_point: Point,
}

impl CubicCurve {
    pub fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
            start_point_override: None,
            end_point_override: None,
            arc_length: OnceCell::new(),
        }
    }

    /// Authored start point (override not applied).
    pub fn authored_start(&self) -> Point {
        self.start
    }

    pub fn control1(&self) -> Point {
        self.control1
    }

    pub fn control2(&self) -> Point {
        self.control2
    }

    /// Authored end point (override not applied).
    pub fn authored_end(&self) -> Point {
        self.end
    }

    pub fn start_point(&self) -> Point {
        self.start_point_override.unwrap_or(self.start)
    }

    pub fn end_point(&self) -> Point {
        self.end_point_override.unwrap_or(self.end)
    }

    pub fn start_override(&self) -> Option<Point> {
        self.start_point_override
    }

    pub fn end_override(&self) -> Option<Point> {
        self.end_point_override
    }

    pub fn set_start_override(&mut self, point: Option<Point>) {
        self.start_point_override = point;
        self.arc_length = OnceCell::new();
    }

    pub fn set_end_override(&mut self, point: Option<Point>) {
        self.end_point_override = point;
        self.arc_length = OnceCell::new();
    }

    /// Point on the curve at parameter `t` in [0, 1].
    pub fn point_at_t(&self, t: f64) -> Point {
        let p0 = self.start_point();
        let p3 = self.end_point();
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * p0.x + b1 * self.control1.x + b2 * self.control2.x + b3 * p3.x,
            b0 * p0.y + b1 * self.control1.y + b2 * self.control2.y + b3 * p3.y,
        )
    }

    fn speed_at(&self, t: f64) -> f64 {
        let p0 = self.start_point();
        let p3 = self.end_point();
        let u = 1.0 - t;
        let dx = 3.0 * u * u * (self.control1.x - p0.x)
            + 6.0 * u * t * (self.control2.x - self.control1.x)
            + 3.0 * t * t * (p3.x - self.control2.x);
        let dy = 3.0 * u * u * (self.control1.y - p0.y)
            + 6.0 * u * t * (self.control2.y - self.control1.y)
            + 3.0 * t * t * (p3.y - self.control2.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        *self
            .arc_length
            .get_or_init(|| integrate(|t| self.speed_at(t), 0.0, 1.0))
    }

    pub fn point_at_length(&self, dist: f64) -> Point {
        if dist <= 0.0 {
            return self.start_point();
        }
        let total = self.length();
        if dist >= total {
            return self.end_point();
        }
        let t = quad::param_at_length(|t| self.speed_at(t), 1.0, dist);
        self.point_at_t(t)
    }

    pub fn to_svg(&self, include_move_to: bool) -> String {
        let s = self.start_point();
        let e = self.end_point();
        let curve = format!(
            "C {} {} {} {} {} {}",
            fmt_coord(self.control1.x),
            fmt_coord(self.control1.y),
            fmt_coord(self.control2.x),
            fmt_coord(self.control2.y),
            fmt_coord(e.x),
            fmt_coord(e.y),
        );
        if include_move_to {
            format!("M {} {} {}", fmt_coord(s.x), fmt_coord(s.y), curve)
        } else {
            curve
        }
    }

    pub fn to_json(&self) -> SegmentJsonData {
        encode_data(
            "cubic-curve",
            &CubicCurveData {
                start_point: self.start,
                control1: self.control1,
                control2: self.control2,
                end_point: self.end,
            },
        )
    }

    pub fn from_json(data: &SegmentJsonData) -> Result<Segment> {
        if data.segment_type != "cubic-curve" {
            return Err(ParseError::SegmentTypeMismatch {
                expected: "CubicCurve",
                actual: data.segment_type.clone(),
            }
            .into());
        }
        let raw: CubicCurveData = decode_data(data)?;
        Ok(Segment::CubicCurve(CubicCurve::new(
            raw.start_point,
            raw.control1,
            raw.control2,
            raw.end_point,
        )))
    }

    pub fn control_points(&self, segment_index: usize) -> Vec<ControlPoint> {
        let make = |point, kind| ControlPoint {
            point,
            segment_index,
            kind,
            point_index: None,
        };
        vec![
            make(self.start_point(), ControlPointKind::Start),
            make(self.control1, ControlPointKind::Control1),
            make(self.control2, ControlPointKind::Control2),
            make(self.end_point(), ControlPointKind::End),
        ]
    }

    pub fn with_control_point(
        &self,
        kind: ControlPointKind,
        point_index: Option<usize>,
        new_point: Point,
    ) -> Result<Segment> {
        expect_no_point_index(kind, point_index)?;
        let updated = match kind {
            ControlPointKind::Start => {
                CubicCurve::new(new_point, self.control1, self.control2, self.end)
            }
            ControlPointKind::Control1 => {
                CubicCurve::new(self.start, new_point, self.control2, self.end)
            }
            ControlPointKind::Control2 => {
                CubicCurve::new(self.start, self.control1, new_point, self.end)
            }
            ControlPointKind::End => {
                CubicCurve::new(self.start, self.control1, self.control2, new_point)
            }
            other => {
                return Err(ValidationError::UnsupportedControlPointKind {
                    segment: "CubicCurve",
                    kind: other,
                }
                .into())
            }
        };
        Ok(Segment::CubicCurve(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_straight_cubic_has_chord_length() {
        // Control points on the chord: the curve is the straight segment.
        let c = CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(8.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((c.length() - 10.0).abs() < 1e-9);
        let p = c.point_at_length(5.0);
        assert!((p.x - 5.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn endpoints_are_exact() {
        let c = CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert_eq!(c.point_at_length(-1.0), Point::new(0.0, 0.0));
        assert_eq!(c.point_at_length(c.length() + 1.0), Point::new(10.0, 0.0));
    }

    #[test]
    fn update_control_point_returns_new_value() {
        let c = CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
        );
        let moved = c
            .with_control_point(ControlPointKind::Control2, None, Point::new(2.0, 5.0))
            .unwrap();
        match moved {
            Segment::CubicCurve(m) => {
                assert_eq!(m.control2(), Point::new(2.0, 5.0));
                assert_eq!(c.control2(), Point::new(2.0, 1.0));
            }
            _ => panic!("expected cubic curve"),
        }
    }

    #[test]
    fn rejects_center_kind_and_stray_index() {
        let c = CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
        );
        assert!(c
            .with_control_point(ControlPointKind::Center, None, Point::new(0.0, 0.0))
            .is_err());
        assert!(c
            .with_control_point(ControlPointKind::Start, Some(3), Point::new(0.0, 0.0))
            .is_err());
    }

    #[test]
    fn override_changes_evaluation_not_authored_data() {
        let mut c = CubicCurve::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
        );
        let straight = c.length();
        c.set_start_override(Some(Point::new(0.0, 10.0)));
        assert_eq!(c.start_point(), Point::new(0.0, 10.0));
        assert_eq!(c.authored_start(), Point::new(0.0, 0.0));
        assert!(c.length() > straight);
    }
}
