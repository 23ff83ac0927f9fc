//! Quadratic Bézier segment.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result, ValidationError};

use super::{
    decode_data, encode_data, expect_no_point_index, fmt_coord, integrate, quad, ControlPoint,
    ControlPointKind, Point, Segment, SegmentJsonData,
};

/// A quadratic Bézier curve: start, one control handle, end. The handle is
/// addressed as `control1`.
#[derive(Debug, Clone)]
pub struct QuadraticCurve {
    start: Point,
    control: Point,
    end: Point,
    start_point_override: Option<Point>,
    end_point_override: Option<Point>,
    arc_length: OnceCell<f64>,
}

impl PartialEq for QuadraticCurve {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.control == other.control
            && self.end == other.end
            && self.start_point_override == other.start_point_override
            && self.end_point_override == other.end_point_override
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuadraticCurveData {
    start_point: Point,
    control_point: Point,
    end_point: Point,
}

impl QuadraticCurve {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self {
            start,
            control,
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

    pub fn control_point(&self) -> Point {
        self.control
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
        let p2 = self.end_point();
        let u = 1.0 - t;
        let b0 = u * u;
        let b1 = 2.0 * u * t;
        let b2 = t * t;
        Point::new(
            b0 * p0.x + b1 * self.control.x + b2 * p2.x,
            b0 * p0.y + b1 * self.control.y + b2 * p2.y,
        )
    }

    fn speed_at(&self, t: f64) -> f64 {
        let p0 = self.start_point();
        let p2 = self.end_point();
        let u = 1.0 - t;
        let dx = 2.0 * u * (self.control.x - p0.x) + 2.0 * t * (p2.x - self.control.x);
        let dy = 2.0 * u * (self.control.y - p0.y) + 2.0 * t * (p2.y - self.control.y);
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
            "Q {} {} {} {}",
            fmt_coord(self.control.x),
            fmt_coord(self.control.y),
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
            "quadratic-curve",
            &QuadraticCurveData {
                start_point: self.start,
                control_point: self.control,
                end_point: self.end,
            },
        )
    }

    pub fn from_json(data: &SegmentJsonData) -> Result<Segment> {
        if data.segment_type != "quadratic-curve" {
            return Err(ParseError::SegmentTypeMismatch {
                expected: "QuadraticCurve",
                actual: data.segment_type.clone(),
            }
            .into());
        }
        let raw: QuadraticCurveData = decode_data(data)?;
        Ok(Segment::QuadraticCurve(QuadraticCurve::new(
            raw.start_point,
            raw.control_point,
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
            make(self.control, ControlPointKind::Control1),
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
            ControlPointKind::Start => QuadraticCurve::new(new_point, self.control, self.end),
            ControlPointKind::Control1 => QuadraticCurve::new(self.start, new_point, self.end),
            ControlPointKind::End => QuadraticCurve::new(self.start, self.control, new_point),
            other => {
                return Err(ValidationError::UnsupportedControlPointKind {
                    segment: "QuadraticCurve",
                    kind: other,
                }
                .into())
            }
        };
        Ok(Segment::QuadraticCurve(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn known_length_of_symmetric_curve() {
        // Known value for M 0 0 Q 50 100 100 0, roughly 147.89.
        let curve = QuadraticCurve::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        );
        assert_abs_diff_eq!(curve.length(), 147.89, epsilon = 0.01);
    }

    #[test]
    fn midpoint_by_arc_length() {
        // Symmetric curve: half the arc length lands on the apex (50, 25).
        let curve = QuadraticCurve::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 0.0),
        );
        let mid = curve.point_at_length(curve.length() / 2.0);
        assert_abs_diff_eq!(mid.x, 50.0, epsilon = 0.5);
        assert_abs_diff_eq!(mid.y, 25.0, epsilon = 0.5);
    }

    #[test]
    fn updates_each_handle_independently() {
        let curve = QuadraticCurve::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 0.0),
        );
        let moved = curve
            .with_control_point(ControlPointKind::Control1, None, Point::new(60.0, 60.0))
            .unwrap();
        match moved {
            Segment::QuadraticCurve(m) => {
                assert_eq!(m.control_point(), Point::new(60.0, 60.0));
                assert_eq!(m.authored_start(), Point::new(0.0, 0.0));
                assert_eq!(m.authored_end(), Point::new(100.0, 0.0));
            }
            _ => panic!("expected quadratic curve"),
        }
    }

    #[test]
    fn rejects_unsupported_kinds() {
        let curve = QuadraticCurve::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 0.0),
        );
        let err = curve
            .with_control_point(ControlPointKind::Center, None, Point::new(0.0, 0.0))
            .unwrap_err();
        assert!(err.to_string().contains("center"));
        assert!(curve
            .with_control_point(ControlPointKind::Control2, None, Point::new(0.0, 0.0))
            .is_err());
    }
}
