//! Straight polyline segment.

use serde::{Deserialize, Serialize};

use crate::error::{ConstructionError, ParseError, Result, ValidationError};

use super::{
    decode_data, encode_data, fmt_coord, ControlPoint, ControlPointKind, Point, SegmentJsonData,
    Segment,
};

/// A polyline: straight line segments through an ordered sequence of control
/// points. The two-point form is the common case; interior points use the
/// same indexed addressing as [`super::Spline`].
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    points: Vec<Point>,
    start_point_override: Option<Point>,
    end_point_override: Option<Point>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    control_points: Option<Vec<Point>>,
    // Legacy two-point form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_point: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_point: Option<Point>,
}

impl Line {
    /// Creates a two-point line segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            points: vec![start, end],
            start_point_override: None,
            end_point_override: None,
        }
    }

    /// Creates a polyline through `points`. Fewer than 2 points is a
    /// construction error.
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ConstructionError::TooFewLinePoints {
                count: points.len(),
            }
            .into());
        }
        Ok(Self {
            points,
            start_point_override: None,
            end_point_override: None,
        })
    }

    /// The authored control points (overrides not applied).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Effective point at index `i`, with overrides applied at the ends.
    fn point_at(&self, i: usize) -> Point {
        let n = self.points.len();
        if i == 0 {
            return self.start_point();
        }
        if i >= n - 1 {
            return self.end_point();
        }
        self.points[i]
    }

    fn leg_length(&self, i: usize) -> f64 {
        self.point_at(i).distance_to(&self.point_at(i + 1))
    }

    pub fn length(&self) -> f64 {
        (0..self.points.len() - 1).map(|i| self.leg_length(i)).sum()
    }

    pub fn point_at_length(&self, dist: f64) -> Point {
        let total = self.length();
        if total <= 0.0 || dist <= 0.0 {
            return self.start_point();
        }
        if dist >= total {
            return self.end_point();
        }
        let mut remaining = dist;
        for i in 0..self.points.len() - 1 {
            let leg = self.leg_length(i);
            if remaining <= leg {
                let t = if leg > 0.0 { remaining / leg } else { 0.0 };
                return self.point_at(i).lerp(&self.point_at(i + 1), t);
            }
            remaining -= leg;
        }
        self.end_point()
    }

    /// `count` points spaced evenly by arc length from start to end.
    pub fn equidistant_points(&self, count: usize) -> Vec<Point> {
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![self.start_point()];
        }
        let total = self.length();
        (0..count)
            .map(|i| self.point_at_length(total * i as f64 / (count - 1) as f64))
            .collect()
    }

    pub fn start_point(&self) -> Point {
        self.start_point_override.unwrap_or(self.points[0])
    }

    pub fn end_point(&self) -> Point {
        self.end_point_override
            .unwrap_or(self.points[self.points.len() - 1])
    }

    pub fn start_override(&self) -> Option<Point> {
        self.start_point_override
    }

    pub fn end_override(&self) -> Option<Point> {
        self.end_point_override
    }

    pub fn set_start_override(&mut self, point: Option<Point>) {
        self.start_point_override = point;
    }

    pub fn set_end_override(&mut self, point: Option<Point>) {
        self.end_point_override = point;
    }

    pub fn to_svg(&self, include_move_to: bool) -> String {
        let mut parts = Vec::with_capacity(self.points.len());
        for i in 0..self.points.len() {
            let p = self.point_at(i);
            if i == 0 {
                if include_move_to {
                    parts.push(format!("M {} {}", fmt_coord(p.x), fmt_coord(p.y)));
                }
                continue;
            }
            parts.push(format!("L {} {}", fmt_coord(p.x), fmt_coord(p.y)));
        }
        parts.join(" ")
    }

    pub fn to_json(&self) -> SegmentJsonData {
        encode_data(
            "line",
            &LineData {
                control_points: Some(self.points.clone()),
                start_point: None,
                end_point: None,
            },
        )
    }

    /// Decodes a line from tagged JSON. Accepts the legacy
    /// `startPoint`/`endPoint` two-point form.
    pub fn from_json(data: &SegmentJsonData) -> Result<Segment> {
        if data.segment_type != "line" {
            return Err(ParseError::SegmentTypeMismatch {
                expected: "Line",
                actual: data.segment_type.clone(),
            }
            .into());
        }
        let raw: LineData = decode_data(data)?;
        let points = match raw.control_points {
            Some(points) => points,
            None => match (raw.start_point, raw.end_point) {
                (Some(s), Some(e)) => vec![s, e],
                _ => {
                    return Err(ParseError::InvalidJson {
                        reason: "line data needs controlPoints or startPoint/endPoint".to_string(),
                    }
                    .into())
                }
            },
        };
        Ok(Segment::Line(Line::from_points(points)?))
    }

    pub fn control_points(&self, segment_index: usize) -> Vec<ControlPoint> {
        let last = self.points.len() - 1;
        (0..self.points.len())
            .map(|i| ControlPoint {
                point: self.point_at(i),
                segment_index,
                kind: if i == 0 {
                    ControlPointKind::Start
                } else if i == last {
                    ControlPointKind::End
                } else {
                    ControlPointKind::SplinePoint
                },
                point_index: Some(i),
            })
            .collect()
    }

    pub fn with_control_point(
        &self,
        kind: ControlPointKind,
        point_index: Option<usize>,
        new_point: Point,
    ) -> Result<Segment> {
        let index = match kind {
            ControlPointKind::Start => 0,
            ControlPointKind::End => self.points.len() - 1,
            ControlPointKind::SplinePoint => point_index
                .ok_or(ValidationError::MissingPointIndex { kind })?,
            other => {
                return Err(ValidationError::UnsupportedControlPointKind {
                    segment: "Line",
                    kind: other,
                }
                .into())
            }
        };
        if index >= self.points.len() {
            return Err(ValidationError::PointIndexOutOfRange {
                index,
                count: self.points.len(),
            }
            .into());
        }
        let mut points = self.points.clone();
        points[index] = new_point;
        Ok(Segment::Line(Line {
            points,
            start_point_override: None,
            end_point_override: None,
        }))
    }
}
