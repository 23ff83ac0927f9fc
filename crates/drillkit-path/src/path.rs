//! A path: an ordered list of segments traversed start to end.

use serde::{Deserialize, Serialize};

use crate::error::{ConstructionError, ParseError, Result};
use crate::segment::{ControlPoint, Line, Point, Segment, SegmentJsonData, Spline};
use crate::svg_parser::parse_svg;

/// Axis-aligned bounding box of a path's control polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Deserialize)]
struct PathJsonData {
    segments: Vec<SegmentJsonData>,
}

/// A sequence of segments forming one continuous drawable path.
///
/// The path does not enforce segment-to-segment continuity; adjacent
/// segments that share an endpoint coordinate are merged into one editable
/// handle by the control point manager, not by the path itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    id: i64,
    segments: Vec<Segment>,
}

impl Path {
    /// Creates a path from segments, with no database identity.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { id: 0, segments }
    }

    /// Creates an empty path.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Database row id this path was loaded from, 0 for in-memory paths.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Appends a segment to the end of the path.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Removes the segment at `index`. Returns false when out of range.
    pub fn remove_segment(&mut self, index: usize) -> bool {
        if index < self.segments.len() {
            self.segments.remove(index);
            true
        } else {
            false
        }
    }

    /// Replaces the segment at `index`. Out-of-range indices are ignored;
    /// interactive editors call this with indices from a possibly stale
    /// snapshot.
    pub fn replace_segment(&mut self, index: usize, segment: Segment) {
        if let Some(slot) = self.segments.get_mut(index) {
            *slot = segment;
        }
    }

    /// Removes all segments.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Total arc length: the sum of the segment lengths.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Point reached after travelling `dist` along the path from its start.
    /// Distances clamp to the path's endpoints.
    pub fn point_at_length(&self, dist: f64) -> Result<Point> {
        let first = self.segments.first().ok_or(ConstructionError::EmptyPath)?;
        if dist <= 0.0 {
            return Ok(first.point_at_length(0.0));
        }
        let mut remaining = dist;
        for segment in &self.segments {
            let length = segment.length();
            if remaining <= length {
                return Ok(segment.point_at_length(remaining));
            }
            remaining -= length;
        }
        // Past the end of the last segment.
        let last = &self.segments[self.segments.len() - 1];
        Ok(last.point_at_length(last.length()))
    }

    /// Start point of the first segment (override-aware).
    pub fn start_point(&self) -> Result<Point> {
        self.segments
            .first()
            .map(Segment::start_point)
            .ok_or_else(|| ConstructionError::EmptyPath.into())
    }

    /// End point of the last segment (override-aware).
    pub fn last_point(&self) -> Result<Point> {
        self.segments
            .last()
            .map(Segment::end_point)
            .ok_or_else(|| ConstructionError::EmptyPath.into())
    }

    /// Pins the path's start to `point` via the first segment's override.
    pub fn set_start_point(&mut self, point: Option<Point>) -> Result<()> {
        let first = self
            .segments
            .first_mut()
            .ok_or(ConstructionError::EmptyPath)?;
        first.set_start_override(point);
        Ok(())
    }

    /// Pins the path's end to `point` via the last segment's override.
    pub fn set_end_point(&mut self, point: Option<Point>) -> Result<()> {
        let last = self
            .segments
            .last_mut()
            .ok_or(ConstructionError::EmptyPath)?;
        last.set_end_override(point);
        Ok(())
    }

    /// SVG path data for the whole path. Empty path yields an empty string.
    pub fn to_svg_string(&self) -> String {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| segment.to_svg(i == 0))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serializes the path's authored segment data to a JSON document.
    /// Endpoint overrides are transient editor state and are not persisted.
    pub fn to_json(&self) -> Result<String> {
        let data = PathJsonData {
            segments: self.segments.iter().map(Segment::to_json).collect(),
        };
        serde_json::to_string(&data).map_err(|e| {
            ParseError::InvalidJson {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Reconstructs a path from a JSON document produced by [`Path::to_json`].
    /// `start_override`/`end_override` pin the first segment's start and the
    /// last segment's end, for re-anchoring a stored path between live
    /// endpoints.
    pub fn from_json(
        json: &str,
        start_override: Option<Point>,
        end_override: Option<Point>,
        id: i64,
    ) -> Result<Path> {
        let data: PathJsonData = serde_json::from_str(json).map_err(|e| {
            ParseError::InvalidJson {
                reason: e.to_string(),
            }
        })?;
        let mut segments = data
            .segments
            .iter()
            .map(Segment::from_json)
            .collect::<Result<Vec<_>>>()?;
        if let Some(first) = segments.first_mut() {
            first.set_start_override(start_override);
        }
        if let Some(last) = segments.last_mut() {
            last.set_end_override(end_override);
        }
        Ok(Path { id, segments })
    }

    /// Loads a stored path by database id and serialized segment data.
    pub fn from_db(id: i64, path_data: &str) -> Result<Path> {
        Self::from_json(path_data, None, None, id)
    }

    /// Parses SVG path data into a path. Spline segments cannot be recovered
    /// from SVG; a spline serialized as SVG comes back as cubic curves.
    pub fn from_svg_string(d: &str) -> Result<Path> {
        Ok(Path::new(parse_svg(d)?))
    }

    /// Connects `points` with straight line segments. Fewer than 2 points
    /// yields an empty path.
    pub fn from_points(points: &[Point]) -> Path {
        if points.len() < 2 {
            return Path::empty();
        }
        Path::new(
            points
                .windows(2)
                .map(|pair| Segment::Line(Line::new(pair[0], pair[1])))
                .collect(),
        )
    }

    /// A path containing a single spline segment.
    pub fn from_spline(spline: Spline) -> Path {
        Path::new(vec![Segment::Spline(spline)])
    }

    /// Every editable handle of every segment, tagged with its segment
    /// index.
    pub fn control_points(&self) -> Vec<ControlPoint> {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(i, segment)| segment.control_points(i))
            .collect()
    }

    /// Bounding box of the control polygon: every handle of every segment,
    /// including Bézier handles and arc center handles. Looser than the
    /// tight curve bounds, but cheap and stable under editing.
    pub fn get_bounds_by_control_points(&self) -> Option<Bounds> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for control_point in self.control_points() {
            let Point { x, y } = control_point.point;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if min_x.is_infinite() {
            return None;
        }
        Some(Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::empty()
    }
}
