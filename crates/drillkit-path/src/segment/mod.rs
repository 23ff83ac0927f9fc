//! Segment primitives: the curve variants a path is assembled from.
//!
//! A [`Segment`] is one atomic drawable curve: a straight polyline, an
//! elliptical arc, a cubic or quadratic Bézier, or a spline. All variants
//! share one capability surface (length, point-at-length, SVG/JSON codecs,
//! editable control points) dispatched exhaustively over the enum.
//!
//! Segment values are immutable at the geometry level: every control-point
//! edit returns a new value. The only mutable slots are the optional
//! start/end point overrides, which supersede the variant's natural
//! endpoints without touching its authored control data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result, ValidationError};

mod arc;
mod cubic;
mod line;
mod quad;
mod quadratic;
mod spline;

pub use arc::Arc;
pub use cubic::CubicCurve;
pub use line::Line;
pub use quadratic::QuadraticCurve;
pub use spline::Spline;

pub(crate) use quad::integrate;

/// A 2D point with X and Y coordinates. Plain value, no identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Linear interpolation towards `other` at parameter `t`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }
}

/// The kinds of editable handles a segment can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPointKind {
    /// Start point of the segment.
    Start,
    /// End point of the segment.
    End,
    /// First control handle (curves).
    Control1,
    /// Second control handle (cubic curves).
    Control2,
    /// Synthetic center handle (arcs).
    Center,
    /// An indexed point in a variable-length point list (splines, polylines).
    SplinePoint,
}

impl ControlPointKind {
    fn as_str(&self) -> &'static str {
        match self {
            ControlPointKind::Start => "start",
            ControlPointKind::End => "end",
            ControlPointKind::Control1 => "control1",
            ControlPointKind::Control2 => "control2",
            ControlPointKind::Center => "center",
            ControlPointKind::SplinePoint => "spline-point",
        }
    }
}

impl fmt::Display for ControlPointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A segment-local editable handle.
///
/// `point_index` is `Some` only for kinds that address a variable-length
/// point list ([`ControlPointKind::SplinePoint`], and the start/end of a
/// polyline); fixed-arity handles carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Current position of the handle (override-aware).
    pub point: Point,
    /// Index of the segment this handle belongs to within its path.
    pub segment_index: usize,
    /// Which handle of the segment this is.
    pub kind: ControlPointKind,
    /// Index into the segment's point list, where applicable.
    pub point_index: Option<usize>,
}

/// Identifies one handle on one segment, used by deduplicated global control
/// points to fan a move out to every segment sharing the coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentHook {
    /// Index of the hooked segment within its path.
    pub segment_index: usize,
    /// Which handle of that segment.
    pub kind: ControlPointKind,
    /// Index into the segment's point list, where applicable.
    pub point_index: Option<usize>,
}

/// JSON representation of a segment: a `type` tag plus variant-specific data.
///
/// This is the persisted serialization contract. It preserves the authored
/// representation (a spline keeps its control points and degree, not a
/// flattened polyline). Point overrides are deliberately not serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentJsonData {
    /// Variant tag: `line`, `arc`, `cubic-curve`, `quadratic-curve`, `spline`.
    #[serde(rename = "type")]
    pub segment_type: String,
    /// Variant-specific payload.
    pub data: serde_json::Value,
}

/// One atomic drawable curve primitive composing part of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
    CubicCurve(CubicCurve),
    QuadraticCurve(QuadraticCurve),
    Spline(Spline),
}

impl Segment {
    /// The serialization tag for this variant.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Segment::Line(_) => "line",
            Segment::Arc(_) => "arc",
            Segment::CubicCurve(_) => "cubic-curve",
            Segment::QuadraticCurve(_) => "quadratic-curve",
            Segment::Spline(_) => "spline",
        }
    }

    /// Total arc length of this segment. Memoized per instance for the
    /// curved variants; splines use sampled-polyline summation.
    pub fn length(&self) -> f64 {
        match self {
            Segment::Line(s) => s.length(),
            Segment::Arc(s) => s.length(),
            Segment::CubicCurve(s) => s.length(),
            Segment::QuadraticCurve(s) => s.length(),
            Segment::Spline(s) => s.length(),
        }
    }

    /// Point reached after travelling `dist` along the segment from its
    /// start. Distances clamp to the segment's endpoints; this is a
    /// deliberate clamp, not a failure.
    pub fn point_at_length(&self, dist: f64) -> Point {
        match self {
            Segment::Line(s) => s.point_at_length(dist),
            Segment::Arc(s) => s.point_at_length(dist),
            Segment::CubicCurve(s) => s.point_at_length(dist),
            Segment::QuadraticCurve(s) => s.point_at_length(dist),
            Segment::Spline(s) => s.point_at_length(dist),
        }
    }

    /// Start point, honoring the override if one is set.
    pub fn start_point(&self) -> Point {
        match self {
            Segment::Line(s) => s.start_point(),
            Segment::Arc(s) => s.start_point(),
            Segment::CubicCurve(s) => s.start_point(),
            Segment::QuadraticCurve(s) => s.start_point(),
            Segment::Spline(s) => s.start_point(),
        }
    }

    /// End point, honoring the override if one is set.
    pub fn end_point(&self) -> Point {
        match self {
            Segment::Line(s) => s.end_point(),
            Segment::Arc(s) => s.end_point(),
            Segment::CubicCurve(s) => s.end_point(),
            Segment::QuadraticCurve(s) => s.end_point(),
            Segment::Spline(s) => s.end_point(),
        }
    }

    /// The start point override, if any.
    pub fn start_override(&self) -> Option<Point> {
        match self {
            Segment::Line(s) => s.start_override(),
            Segment::Arc(s) => s.start_override(),
            Segment::CubicCurve(s) => s.start_override(),
            Segment::QuadraticCurve(s) => s.start_override(),
            Segment::Spline(s) => s.start_override(),
        }
    }

    /// The end point override, if any.
    pub fn end_override(&self) -> Option<Point> {
        match self {
            Segment::Line(s) => s.end_override(),
            Segment::Arc(s) => s.end_override(),
            Segment::CubicCurve(s) => s.end_override(),
            Segment::QuadraticCurve(s) => s.end_override(),
            Segment::Spline(s) => s.end_override(),
        }
    }

    /// Pins the segment's start to `point` (or clears the pin) without
    /// touching its authored control data. Invalidates memoized geometry.
    pub fn set_start_override(&mut self, point: Option<Point>) {
        match self {
            Segment::Line(s) => s.set_start_override(point),
            Segment::Arc(s) => s.set_start_override(point),
            Segment::CubicCurve(s) => s.set_start_override(point),
            Segment::QuadraticCurve(s) => s.set_start_override(point),
            Segment::Spline(s) => s.set_start_override(point),
        }
    }

    /// Pins the segment's end to `point` (or clears the pin) without
    /// touching its authored control data. Invalidates memoized geometry.
    pub fn set_end_override(&mut self, point: Option<Point>) {
        match self {
            Segment::Line(s) => s.set_end_override(point),
            Segment::Arc(s) => s.set_end_override(point),
            Segment::CubicCurve(s) => s.set_end_override(point),
            Segment::QuadraticCurve(s) => s.set_end_override(point),
            Segment::Spline(s) => s.set_end_override(point),
        }
    }

    /// Emits the SVG path-data fragment for this segment. Only the first
    /// segment of a path should emit the leading `M`.
    pub fn to_svg(&self, include_move_to: bool) -> String {
        match self {
            Segment::Line(s) => s.to_svg(include_move_to),
            Segment::Arc(s) => s.to_svg(include_move_to),
            Segment::CubicCurve(s) => s.to_svg(include_move_to),
            Segment::QuadraticCurve(s) => s.to_svg(include_move_to),
            Segment::Spline(s) => s.to_svg(include_move_to),
        }
    }

    /// The editable handles for this segment, tagged with `segment_index`
    /// for later re-indexing by the path or control point manager.
    pub fn control_points(&self, segment_index: usize) -> Vec<ControlPoint> {
        match self {
            Segment::Line(s) => s.control_points(segment_index),
            Segment::Arc(s) => s.control_points(segment_index),
            Segment::CubicCurve(s) => s.control_points(segment_index),
            Segment::QuadraticCurve(s) => s.control_points(segment_index),
            Segment::Spline(s) => s.control_points(segment_index),
        }
    }

    /// Returns a new segment value with the named handle moved to
    /// `new_point`. A kind/index combination the variant does not support
    /// fails with a [`ValidationError`].
    pub fn with_control_point(
        &self,
        kind: ControlPointKind,
        point_index: Option<usize>,
        new_point: Point,
    ) -> Result<Segment> {
        match self {
            Segment::Line(s) => s.with_control_point(kind, point_index, new_point),
            Segment::Arc(s) => s.with_control_point(kind, point_index, new_point),
            Segment::CubicCurve(s) => s.with_control_point(kind, point_index, new_point),
            Segment::QuadraticCurve(s) => s.with_control_point(kind, point_index, new_point),
            Segment::Spline(s) => s.with_control_point(kind, point_index, new_point),
        }
    }

    /// Serializes this segment's authored data under its type tag.
    pub fn to_json(&self) -> SegmentJsonData {
        match self {
            Segment::Line(s) => s.to_json(),
            Segment::Arc(s) => s.to_json(),
            Segment::CubicCurve(s) => s.to_json(),
            Segment::QuadraticCurve(s) => s.to_json(),
            Segment::Spline(s) => s.to_json(),
        }
    }

    /// Reconstructs a segment from tagged JSON data. An unrecognized tag is
    /// a hard parse error.
    pub fn from_json(data: &SegmentJsonData) -> Result<Segment> {
        match data.segment_type.as_str() {
            "line" => Line::from_json(data),
            "arc" => Arc::from_json(data),
            "cubic-curve" => CubicCurve::from_json(data),
            "quadratic-curve" => QuadraticCurve::from_json(data),
            "spline" => Spline::from_json(data),
            other => Err(ParseError::UnknownSegmentType {
                tag: other.to_string(),
            }
            .into()),
        }
    }
}

/// Checks that a fixed-arity handle was addressed without a point index.
pub(crate) fn expect_no_point_index(
    kind: ControlPointKind,
    point_index: Option<usize>,
) -> std::result::Result<(), ValidationError> {
    match point_index {
        None => Ok(()),
        Some(index) => Err(ValidationError::UnexpectedPointIndex { kind, index }),
    }
}

/// Decodes a variant payload, mapping serde failures to a parse error.
pub(crate) fn decode_data<T: serde::de::DeserializeOwned>(
    data: &SegmentJsonData,
) -> Result<T> {
    serde_json::from_value(data.data.clone()).map_err(|e| {
        ParseError::InvalidJson {
            reason: format!("bad '{}' segment data: {e}", data.segment_type),
        }
        .into()
    })
}

/// Encodes a variant payload under its tag. Serialization of plain structs
/// cannot fail.
pub(crate) fn encode_data<T: Serialize>(tag: &'static str, data: &T) -> SegmentJsonData {
    SegmentJsonData {
        segment_type: tag.to_string(),
        data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
    }
}

/// Formats a coordinate the way the SVG emitters do: shortest round-trip
/// form, so `10.0` prints as `10`.
pub(crate) fn fmt_coord(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
