//! Spline segment: Catmull-Rom interpolation with a B-spline fallback.
//!
//! The segment stores its authored parameters (control points, degree,
//! optional knots/weights, closed flag, tension) and serializes them
//! losslessly; SVG output is a cubic-Bézier approximation. Sampled length
//! and the generated SVG string are memoized per instance; edits always
//! produce a new value, so the caches never need invalidation beyond the
//! endpoint-override setters.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::error::{ConstructionError, ParseError, Result, ValidationError};

use super::{
    decode_data, encode_data, fmt_coord, ControlPoint, ControlPointKind, Point, Segment,
    SegmentJsonData,
};

/// A spline through ≥2 control points.
///
/// With the default degree 3 and no explicit knot vector, evaluation uses
/// Catmull-Rom interpolation through the points. An explicit knot vector
/// (or a non-cubic degree) switches to de Boor B-spline evaluation, with
/// optional per-point weights for rational splines.
///
/// Arc length is approximated by sampling the curve and summing chord
/// lengths; precision scales with the sample count, not exact quadrature.
#[derive(Debug, Clone)]
pub struct Spline {
    points: Vec<Point>,
    degree: usize,
    knots: Option<Vec<f64>>,
    weights: Option<Vec<f64>>,
    closed: bool,
    tension: f64,
    start_point_override: Option<Point>,
    end_point_override: Option<Point>,
    arc_length: OnceCell<f64>,
    svg_approximation: OnceCell<String>,
}

impl PartialEq for Spline {
    fn eq(&self, other: &Self) -> bool {
        // Memoized length/SVG are derived state and excluded from equality.
        self.points == other.points
            && self.degree == other.degree
            && self.knots == other.knots
            && self.weights == other.weights
            && self.closed == other.closed
            && self.tension == other.tension
            && self.start_point_override == other.start_point_override
            && self.end_point_override == other.end_point_override
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SplineData {
    control_points: Vec<Point>,
    degree: usize,
    knots: Option<Vec<f64>>,
    weights: Option<Vec<f64>>,
    closed: bool,
    tension: f64,
}

impl Spline {
    /// Default degree for new splines.
    pub const DEFAULT_DEGREE: usize = 3;
    /// Default Catmull-Rom tension.
    pub const DEFAULT_TENSION: f64 = 0.5;

    pub fn new(
        points: Vec<Point>,
        degree: usize,
        knots: Option<Vec<f64>>,
        weights: Option<Vec<f64>>,
        closed: bool,
        tension: f64,
    ) -> Result<Self> {
        if points.len() < 2 {
            return Err(ConstructionError::TooFewSplinePoints {
                count: points.len(),
            }
            .into());
        }
        if let Some(knots) = &knots {
            // Evaluation indexes knots up to points + degree, so the count
            // must be exact and the sequence non-decreasing.
            let expected = points.len() + degree + 1;
            if knots.len() != expected {
                return Err(ConstructionError::WrongKnotCount {
                    points: points.len(),
                    degree,
                    expected,
                    actual: knots.len(),
                }
                .into());
            }
            if let Some(index) = knots.windows(2).position(|w| w[1] < w[0]) {
                return Err(ConstructionError::DecreasingKnots { index: index + 1 }.into());
            }
        }
        Ok(Self {
            points,
            degree,
            knots,
            weights,
            closed,
            tension,
            start_point_override: None,
            end_point_override: None,
            arc_length: OnceCell::new(),
            svg_approximation: OnceCell::new(),
        })
    }

    /// Catmull-Rom spline through `points` with the default cubic degree.
    pub fn from_points(points: Vec<Point>, tension: f64, closed: bool) -> Result<Self> {
        Self::new(points, Self::DEFAULT_DEGREE, None, None, closed, tension)
    }

    /// B-spline from control points, degree, and an explicit knot vector.
    pub fn b_spline(
        points: Vec<Point>,
        degree: usize,
        knots: Vec<f64>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        Self::new(points, degree, Some(knots), weights, false, Self::DEFAULT_TENSION)
    }

    /// The authored control points (overrides not applied).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> Option<&[f64]> {
        self.knots.as_deref()
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Control points with the endpoint overrides applied. Evaluation, SVG
    /// generation, and editing all see these effective points.
    fn effective_points(&self) -> Vec<Point> {
        let mut points = self.points.clone();
        if let Some(p) = self.start_point_override {
            points[0] = p;
        }
        if let Some(p) = self.end_point_override {
            let last = points.len() - 1;
            points[last] = p;
        }
        points
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
        self.arc_length = OnceCell::new();
        self.svg_approximation = OnceCell::new();
    }

    pub fn set_end_override(&mut self, point: Option<Point>) {
        self.end_point_override = point;
        self.arc_length = OnceCell::new();
        self.svg_approximation = OnceCell::new();
    }

    /// Evaluates the spline at normalized parameter `t` in [0, 1].
    pub fn point_at_t(&self, t: f64) -> Point {
        if self.degree == 3 && self.knots.is_none() {
            self.catmull_rom_at(t)
        } else {
            self.de_boor_at(t)
        }
    }

    fn catmull_rom_at(&self, t: f64) -> Point {
        let points = self.effective_points();
        let n = points.len();
        if n == 2 {
            return points[0].lerp(&points[1], t);
        }

        // n points form n-1 spans; locate the span and its local parameter.
        let spans = n - 1;
        let scaled = t * spans as f64;
        let span = (scaled.floor() as usize).min(spans - 1);
        let local = if scaled >= spans as f64 {
            1.0
        } else {
            scaled - span as f64
        };

        // Endpoint neighbors clamp to the endpoints themselves.
        let p0 = points[span.saturating_sub(1)];
        let p1 = points[span];
        let p2 = points[span + 1];
        let p3 = points[(span + 2).min(n - 1)];

        let t2 = local * local;
        let t3 = t2 * local;
        Point::new(
            0.5 * (2.0 * p1.x
                + (-p0.x + p2.x) * local
                + (2.0 * p0.x - 5.0 * p1.x + 4.0 * p2.x - p3.x) * t2
                + (-p0.x + 3.0 * p1.x - 3.0 * p2.x + p3.x) * t3),
            0.5 * (2.0 * p1.y
                + (-p0.y + p2.y) * local
                + (2.0 * p0.y - 5.0 * p1.y + 4.0 * p2.y - p3.y) * t2
                + (-p0.y + 3.0 * p1.y - 3.0 * p2.y + p3.y) * t3),
        )
    }

    /// Uniform open knot vector: `degree + 1` clamped values at each end,
    /// interior knots evenly spaced.
    fn uniform_knots(n: usize, degree: usize) -> Vec<f64> {
        let m = n + degree + 1;
        (0..m)
            .map(|i| {
                if i <= degree {
                    0.0
                } else if i >= n {
                    1.0
                } else {
                    (i - degree) as f64 / (n - degree) as f64
                }
            })
            .collect()
    }

    /// Index of the knot span containing `u`, by binary search.
    fn knot_span(u: f64, knots: &[f64], n: usize, degree: usize) -> usize {
        if u >= knots[n] {
            return n - 1;
        }
        if u <= knots[degree] {
            return degree;
        }
        let mut low = degree;
        let mut high = n;
        let mut mid = (low + high) / 2;
        while u < knots[mid] || u >= knots[mid + 1] {
            if u < knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    /// De Boor evaluation with optional rational weights, in homogeneous
    /// coordinates.
    fn de_boor_at(&self, t: f64) -> Point {
        let points = self.effective_points();
        let n = points.len();
        if n == 2 {
            return points[0].lerp(&points[1], t);
        }
        let degree = self.degree.min(n - 1);
        let owned_knots;
        let knots: &[f64] = match &self.knots {
            Some(k) => k,
            None => {
                owned_knots = Self::uniform_knots(n, degree);
                &owned_knots
            }
        };

        // Map normalized t onto the valid knot domain.
        let u_min = knots[degree];
        let u_max = knots[n];
        let u = u_min + t.clamp(0.0, 1.0) * (u_max - u_min);
        let span = Self::knot_span(u, knots, n, degree);

        let weight = |i: usize| {
            self.weights
                .as_ref()
                .and_then(|w| w.get(i).copied())
                .unwrap_or(1.0)
        };

        // Working homogeneous points d[j] = w * (x, y), w.
        let mut d: Vec<(f64, f64, f64)> = (0..=degree)
            .map(|j| {
                let i = span - degree + j;
                let w = weight(i);
                (points[i].x * w, points[i].y * w, w)
            })
            .collect();

        for r in 1..=degree {
            for j in (r..=degree).rev() {
                let i = span - degree + j;
                let denom = knots[i + degree - r + 1] - knots[i];
                let alpha = if denom.abs() < f64::EPSILON {
                    0.0
                } else {
                    (u - knots[i]) / denom
                };
                d[j] = (
                    (1.0 - alpha) * d[j - 1].0 + alpha * d[j].0,
                    (1.0 - alpha) * d[j - 1].1 + alpha * d[j].1,
                    (1.0 - alpha) * d[j - 1].2 + alpha * d[j].2,
                );
            }
        }

        let (x, y, w) = d[degree];
        if w.abs() < f64::EPSILON {
            points[n - 1]
        } else {
            Point::new(x / w, y / w)
        }
    }

    fn sample_count(&self) -> usize {
        (self.points.len() * 10).max(50)
    }

    pub fn length(&self) -> f64 {
        *self.arc_length.get_or_init(|| {
            let samples = self.sample_count();
            let mut length = 0.0;
            let mut prev = self.point_at_t(0.0);
            for i in 1..=samples {
                let current = self.point_at_t(i as f64 / samples as f64);
                length += prev.distance_to(&current);
                prev = current;
            }
            length
        })
    }

    /// Point after travelling `dist` along the spline. The distance maps
    /// proportionally onto the curve parameter, clamped to [0, 1].
    pub fn point_at_length(&self, dist: f64) -> Point {
        let total = self.length();
        if total == 0.0 {
            return self.start_point();
        }
        let t = (dist / total).clamp(0.0, 1.0);
        self.point_at_t(t)
    }

    pub fn to_svg(&self, include_move_to: bool) -> String {
        let svg = self
            .svg_approximation
            .get_or_init(|| self.generate_svg_approximation());
        if include_move_to {
            svg.clone()
        } else {
            // The memoized string always carries the leading move-to.
            match svg.find(|c| c == 'L' || c == 'C') {
                Some(idx) => svg[idx..].to_string(),
                None => String::new(),
            }
        }
    }

    /// Catmull-Rom to cubic Bézier conversion with the standard 1/6
    /// tangent coefficient, one `C` per span. Closed splines wrap around
    /// and emit a trailing `Z`.
    fn generate_svg_approximation(&self) -> String {
        let points = self.effective_points();
        let n = points.len();

        let mut path = format!(
            "M {} {}",
            fmt_coord(points[0].x),
            fmt_coord(points[0].y)
        );

        if n == 2 {
            path.push_str(&format!(
                " L {} {}",
                fmt_coord(points[1].x),
                fmt_coord(points[1].y)
            ));
            if self.closed {
                path.push_str(" Z");
            }
            return path;
        }

        let spans: Vec<(Point, Point, Point, Point)> = if self.closed {
            (0..n)
                .map(|i| {
                    (
                        points[(i + n - 1) % n],
                        points[i],
                        points[(i + 1) % n],
                        points[(i + 2) % n],
                    )
                })
                .collect()
        } else {
            (0..n - 1)
                .map(|i| {
                    (
                        points[i.saturating_sub(1)],
                        points[i],
                        points[i + 1],
                        points[(i + 2).min(n - 1)],
                    )
                })
                .collect()
        };

        for (p0, p1, p2, p3) in spans {
            let c1 = Point::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0);
            let c2 = Point::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0);
            path.push_str(&format!(
                " C {} {} {} {} {} {}",
                fmt_coord(c1.x),
                fmt_coord(c1.y),
                fmt_coord(c2.x),
                fmt_coord(c2.y),
                fmt_coord(p2.x),
                fmt_coord(p2.y)
            ));
        }
        if self.closed {
            path.push_str(" Z");
        }
        path
    }

    pub fn to_json(&self) -> SegmentJsonData {
        encode_data(
            "spline",
            &SplineData {
                control_points: self.points.clone(),
                degree: self.degree,
                knots: self.knots.clone(),
                weights: self.weights.clone(),
                closed: self.closed,
                tension: self.tension,
            },
        )
    }

    pub fn from_json(data: &SegmentJsonData) -> Result<Segment> {
        if data.segment_type != "spline" {
            return Err(ParseError::SegmentTypeMismatch {
                expected: "Spline",
                actual: data.segment_type.clone(),
            }
            .into());
        }
        let raw: SplineData = decode_data(data)?;
        Ok(Segment::Spline(Spline::new(
            raw.control_points,
            raw.degree,
            raw.knots,
            raw.weights,
            raw.closed,
            raw.tension,
        )?))
    }

    pub fn control_points(&self, segment_index: usize) -> Vec<ControlPoint> {
        self.effective_points()
            .into_iter()
            .enumerate()
            .map(|(i, point)| ControlPoint {
                point,
                segment_index,
                kind: ControlPointKind::SplinePoint,
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
        if kind != ControlPointKind::SplinePoint {
            return Err(ValidationError::UnsupportedControlPointKind {
                segment: "Spline",
                kind,
            }
            .into());
        }
        let index = point_index.ok_or(ValidationError::MissingPointIndex { kind })?;
        if index >= self.points.len() {
            return Err(ValidationError::PointIndexOutOfRange {
                index,
                count: self.points.len(),
            }
            .into());
        }
        // Overrides bake into the new value's authored points.
        let mut points = self.effective_points();
        points[index] = new_point;
        Ok(Segment::Spline(Spline::new(
            points,
            self.degree,
            self.knots.clone(),
            self.weights.clone(),
            self.closed,
            self.tension,
        )?))
    }
}
