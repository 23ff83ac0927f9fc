//! Elliptical arc segment in SVG endpoint parametrization.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result, ValidationError};

use super::{
    decode_data, encode_data, expect_no_point_index, fmt_coord, quad, ControlPoint,
    ControlPointKind, Point, Segment, SegmentJsonData,
};

/// An SVG elliptical arc: start point, radii, x-axis rotation, large-arc and
/// sweep flags, end point. Evaluation converts to center parametrization on
/// the fly; degenerate radii collapse to the chord.
#[derive(Debug, Clone)]
pub struct Arc {
    start: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    end: Point,
    start_point_override: Option<Point>,
    end_point_override: Option<Point>,
    arc_length: OnceCell<f64>,
}

impl PartialEq for Arc {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.rx == other.rx
            && self.ry == other.ry
            && self.x_axis_rotation == other.x_axis_rotation
            && self.large_arc == other.large_arc
            && self.sweep == other.sweep
            && self.end == other.end
            && self.start_point_override == other.start_point_override
            && self.end_point_override == other.end_point_override
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArcData {
    start_point: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc_flag: u8,
    sweep_flag: u8,
    end_point: Point,
}

/// Center parametrization of an arc: center, effective radii, rotation, and
/// the swept angle range.
struct CenterArc {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    cos_phi: f64,
    sin_phi: f64,
    theta1: f64,
    delta: f64,
}

impl CenterArc {
    fn point_at_theta(&self, theta: f64) -> Point {
        let u = theta.cos();
        let v = theta.sin();
        Point::new(
            self.cx + self.cos_phi * (self.rx * u) - self.sin_phi * (self.ry * v),
            self.cy + self.sin_phi * (self.rx * u) + self.cos_phi * (self.ry * v),
        )
    }

    /// |d(point)/d(theta)|; rotation does not change the magnitude.
    fn speed_at_theta(&self, theta: f64) -> f64 {
        let dx = self.rx * theta.sin();
        let dy = self.ry * theta.cos();
        (dx * dx + dy * dy).sqrt()
    }
}

fn angle_between(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let det = ux * vy - uy * vx;
    det.atan2(dot)
}

impl Arc {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    ) -> Self {
        Self {
            start,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            end,
            start_point_override: None,
            end_point_override: None,
            arc_length: OnceCell::new(),
        }
    }

    pub fn rx(&self) -> f64 {
        self.rx
    }

    pub fn ry(&self) -> f64 {
        self.ry
    }

    pub fn x_axis_rotation(&self) -> f64 {
        self.x_axis_rotation
    }

    pub fn large_arc(&self) -> bool {
        self.large_arc
    }

    pub fn sweep(&self) -> bool {
        self.sweep
    }

    /// Authored start point (override not applied).
    pub fn authored_start(&self) -> Point {
        self.start
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

    /// Endpoint-to-center conversion per the SVG implementation notes.
    /// Returns `None` when the arc is degenerate (zero radius or coincident
    /// endpoints) and should be treated as the chord.
    fn center_form(&self) -> Option<CenterArc> {
        let s = self.start_point();
        let e = self.end_point();
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return None;
        }
        if s == e {
            return None;
        }

        let phi = self.x_axis_rotation.to_radians();
        let cos_phi = phi.cos();
        let sin_phi = phi.sin();

        // Step 1: midpoint-relative start in the ellipse frame.
        let dx2 = (s.x - e.x) / 2.0;
        let dy2 = (s.y - e.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Step 2: scale radii up if they cannot span the endpoints.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        // Step 3: center in the ellipse frame.
        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let denom = rx2 * y1p * y1p + ry2 * x1p * x1p;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let numer = (rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p).max(0.0);
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coef = sign * (numer / denom).sqrt();
        let cxp = coef * (rx * y1p / ry);
        let cyp = coef * (-ry * x1p / rx);

        // Step 4: back to user space.
        let cx = cos_phi * cxp - sin_phi * cyp + (s.x + e.x) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (s.y + e.y) / 2.0;

        // Step 5: start angle and sweep.
        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;
        let theta1 = angle_between(1.0, 0.0, ux, uy);
        let mut delta = angle_between(ux, uy, vx, vy);
        if !self.sweep && delta > 0.0 {
            delta -= std::f64::consts::TAU;
        } else if self.sweep && delta < 0.0 {
            delta += std::f64::consts::TAU;
        }

        Some(CenterArc {
            cx,
            cy,
            rx,
            ry,
            cos_phi,
            sin_phi,
            theta1,
            delta,
        })
    }

    pub fn length(&self) -> f64 {
        *self.arc_length.get_or_init(|| match self.center_form() {
            None => self.start_point().distance_to(&self.end_point()),
            Some(c) => {
                if (c.rx - c.ry).abs() < f64::EPSILON {
                    // Circular arc: closed form.
                    c.delta.abs() * c.rx
                } else {
                    let sign = c.delta.signum();
                    super::integrate(
                        |s| c.speed_at_theta(c.theta1 + sign * s),
                        0.0,
                        c.delta.abs(),
                    )
                }
            }
        })
    }

    pub fn point_at_length(&self, dist: f64) -> Point {
        if dist <= 0.0 {
            return self.start_point();
        }
        let total = self.length();
        if dist >= total {
            return self.end_point();
        }
        match self.center_form() {
            None => {
                let s = self.start_point();
                s.lerp(&self.end_point(), dist / total)
            }
            Some(c) => {
                let sign = c.delta.signum();
                let s = if (c.rx - c.ry).abs() < f64::EPSILON {
                    dist / c.rx
                } else {
                    quad::param_at_length(
                        |s| c.speed_at_theta(c.theta1 + sign * s),
                        c.delta.abs(),
                        dist,
                    )
                };
                c.point_at_theta(c.theta1 + sign * s)
            }
        }
    }

    pub fn to_svg(&self, include_move_to: bool) -> String {
        let s = self.start_point();
        let e = self.end_point();
        let arc = format!(
            "A {} {} {} {} {} {} {}",
            fmt_coord(self.rx),
            fmt_coord(self.ry),
            fmt_coord(self.x_axis_rotation),
            u8::from(self.large_arc),
            u8::from(self.sweep),
            fmt_coord(e.x),
            fmt_coord(e.y),
        );
        if include_move_to {
            format!("M {} {} {}", fmt_coord(s.x), fmt_coord(s.y), arc)
        } else {
            arc
        }
    }

    pub fn to_json(&self) -> SegmentJsonData {
        encode_data(
            "arc",
            &ArcData {
                start_point: self.start,
                rx: self.rx,
                ry: self.ry,
                x_axis_rotation: self.x_axis_rotation,
                large_arc_flag: u8::from(self.large_arc),
                sweep_flag: u8::from(self.sweep),
                end_point: self.end,
            },
        )
    }

    pub fn from_json(data: &SegmentJsonData) -> Result<Segment> {
        if data.segment_type != "arc" {
            return Err(ParseError::SegmentTypeMismatch {
                expected: "Arc",
                actual: data.segment_type.clone(),
            }
            .into());
        }
        let raw: ArcData = decode_data(data)?;
        Ok(Segment::Arc(Arc::new(
            raw.start_point,
            raw.rx,
            raw.ry,
            raw.x_axis_rotation,
            raw.large_arc_flag != 0,
            raw.sweep_flag != 0,
            raw.end_point,
        )))
    }

    pub fn control_points(&self, segment_index: usize) -> Vec<ControlPoint> {
        let s = self.start_point();
        let e = self.end_point();

        // Synthetic center handle: perpendicular offset from the chord
        // midpoint by ry. An editing affordance, not the true ellipse center.
        let mid = s.midpoint(&e);
        let angle = (e.y - s.y).atan2(e.x - s.x);
        let center = Point::new(
            mid.x - self.ry * angle.sin(),
            mid.y - self.ry * angle.cos(),
        );

        let make = |point, kind| ControlPoint {
            point,
            segment_index,
            kind,
            point_index: None,
        };
        vec![
            make(s, ControlPointKind::Start),
            make(e, ControlPointKind::End),
            make(center, ControlPointKind::Center),
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
            ControlPointKind::Start => Arc::new(
                new_point,
                self.rx,
                self.ry,
                self.x_axis_rotation,
                self.large_arc,
                self.sweep,
                self.end,
            ),
            ControlPointKind::End => Arc::new(
                self.start,
                self.rx,
                self.ry,
                self.x_axis_rotation,
                self.large_arc,
                self.sweep,
                new_point,
            ),
            ControlPointKind::Center => {
                // Dragging the center handle re-derives the radii: rx from
                // the chord, ry from the handle's perpendicular offset.
                let mid = self.start.midpoint(&self.end);
                let constrained = Point::new(mid.x, new_point.y);
                let rx = self.start.distance_to(&self.end) / 2.0;
                let ry = constrained.distance_to(&mid);
                Arc::new(
                    self.start,
                    rx,
                    ry,
                    self.x_axis_rotation,
                    self.large_arc,
                    self.sweep,
                    self.end,
                )
            }
            other => {
                return Err(ValidationError::UnsupportedControlPointKind {
                    segment: "Arc",
                    kind: other,
                }
                .into())
            }
        };
        Ok(Segment::Arc(updated))
    }
}
