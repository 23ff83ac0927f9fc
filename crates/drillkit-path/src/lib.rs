//! # Drillkit Path
//!
//! 2D parametric path geometry for drill design.
//! Paths are ordered lists of segments (lines, arcs, Bézier curves,
//! splines) with arc-length queries, SVG and JSON codecs, and
//! deduplicated control-point editing for interactive tools.

pub mod control_points;
pub mod error;
pub mod path;
pub mod segment;
pub mod spline_factory;
pub mod svg_parser;

pub use control_points::{CallbackId, ControlPointManager, GlobalControlPoint};
pub use error::{ConstructionError, Error, ParseError, Result, ValidationError};
pub use path::{Bounds, Path};
pub use segment::{
    Arc, ControlPoint, ControlPointKind, CubicCurve, Line, Point, QuadraticCurve, Segment,
    SegmentHook, SegmentJsonData, Spline,
};
pub use spline_factory::{
    create_catmull_rom_spline, create_catmull_rom_spline_from_relative_points,
};
pub use svg_parser::parse_svg;
