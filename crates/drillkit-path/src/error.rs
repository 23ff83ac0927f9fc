//! Error handling for the path engine.
//!
//! Three error kinds cover the failure modes of this crate:
//! - Construction errors (invalid geometry at build time, empty-path queries)
//! - Validation errors (bad control-point edits)
//! - Parse errors (SVG path data, segment JSON)
//!
//! Expected, recoverable misses in interactive editing (unknown control point
//! id, out-of-range segment removal) are reported as `false`/no-op returns
//! instead of errors.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::segment::ControlPointKind;

/// Errors raised while building geometry or querying geometry that does not
/// exist yet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// A spline was built with fewer than 2 control points.
    #[error("Spline must have at least 2 control points, got {count}")]
    TooFewSplinePoints {
        /// The number of control points supplied.
        count: usize,
    },

    /// A polyline was built with fewer than 2 control points.
    #[error("Line must have at least 2 control points, got {count}")]
    TooFewLinePoints {
        /// The number of control points supplied.
        count: usize,
    },

    /// A spline's explicit knot vector has the wrong number of knots for
    /// its point count and degree.
    #[error("Spline of {points} points and degree {degree} requires {expected} knots, got {actual}")]
    WrongKnotCount {
        /// The number of control points.
        points: usize,
        /// The spline degree.
        degree: usize,
        /// The required knot count (`points + degree + 1`).
        expected: usize,
        /// The number of knots supplied.
        actual: usize,
    },

    /// A spline's explicit knot vector is not non-decreasing.
    #[error("Spline knot vector must be non-decreasing, but knot {index} decreases")]
    DecreasingKnots {
        /// Index of the first knot smaller than its predecessor.
        index: usize,
    },

    /// A start/end/point-at-length query was made against a path with no
    /// segments.
    #[error("Cannot query an empty path")]
    EmptyPath,
}

/// Errors raised when a control-point edit names a handle the segment does
/// not have.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The segment variant has no control point of this kind.
    #[error("{segment} segments do not support control point kind '{kind}'")]
    UnsupportedControlPointKind {
        /// The segment variant name.
        segment: &'static str,
        /// The unsupported kind.
        kind: ControlPointKind,
    },

    /// The kind requires a point index but none was supplied.
    #[error("Control point kind '{kind}' requires a point index")]
    MissingPointIndex {
        /// The kind that needed an index.
        kind: ControlPointKind,
    },

    /// The kind does not take a point index but one was supplied.
    #[error("Control point kind '{kind}' does not take a point index, got {index}")]
    UnexpectedPointIndex {
        /// The kind that takes no index.
        kind: ControlPointKind,
        /// The index that was supplied.
        index: usize,
    },

    /// The point index is outside the segment's control point list.
    #[error("Invalid point index {index} for segment with {count} control points")]
    PointIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of control points the segment has.
        count: usize,
    },
}

/// Errors raised while parsing SVG path data or segment JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An SVG path command letter this parser does not understand.
    #[error("Unsupported SVG path command '{command}'")]
    UnsupportedCommand {
        /// The offending token.
        command: String,
    },

    /// A token that should have been a number was not one.
    #[error("Malformed number '{token}' in SVG path data")]
    MalformedNumber {
        /// The offending token.
        token: String,
    },

    /// A command ran out of arguments mid-group.
    #[error("SVG path command '{command}' is missing arguments")]
    MissingArguments {
        /// The command letter.
        command: char,
    },

    /// A segment JSON `type` tag no variant claims.
    #[error("Unknown segment type '{tag}'")]
    UnknownSegmentType {
        /// The unrecognized tag.
        tag: String,
    },

    /// Segment JSON handed to the wrong variant's decoder.
    #[error("Cannot create {expected} from data of type '{actual}'")]
    SegmentTypeMismatch {
        /// The variant that was asked to decode.
        expected: &'static str,
        /// The tag the data actually carried.
        actual: String,
    },

    /// The JSON document itself was malformed or structurally wrong.
    #[error("Invalid path JSON: {reason}")]
    InvalidJson {
        /// What was wrong with the document.
        reason: String,
    },
}

/// Unified error type for the path engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Construction error
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
