//! SVG path data (`d` attribute) parser.
//!
//! Produces absolute-coordinate segments from the standard command set:
//! `M`/`m`, `L`/`l`, `H`/`h`, `V`/`v`, `C`/`c`, `S`/`s`, `Q`/`q`, `T`/`t`,
//! `A`/`a`, and `Z`/`z`. Coordinates after the first pair of a moveto are
//! implicit linetos. Smooth commands (`S`, `T`) reflect the previous curve's
//! trailing control handle when the previous command was of the matching
//! curve family.
//!
//! Unrecognized command letters and malformed numbers are parse errors, not
//! silently skipped.

use crate::error::{ParseError, Result};
use crate::segment::{Arc, CubicCurve, Line, Point, QuadraticCurve, Segment};

/// Parses an SVG path `d` string into a list of segments.
pub fn parse_svg(d: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current = Point::new(0.0, 0.0);
    let mut subpath_start = Point::new(0.0, 0.0);
    // Trailing control handle of the previous curve, for S/T reflection.
    let mut last_control: Option<Point> = None;
    // Uppercase letter of the previously executed command.
    let mut prev_command: Option<char> = None;

    for group in split_commands(d)? {
        let is_relative = group.command.is_ascii_lowercase();
        let upper = group.command.to_ascii_uppercase();

        if upper == 'Z' {
            if current != subpath_start {
                segments.push(Segment::Line(Line::new(current, subpath_start)));
            }
            current = subpath_start;
            last_control = None;
            prev_command = Some('Z');
            continue;
        }

        let mut args = Args::new(group.command, &group.args);
        if args.is_empty() {
            return Err(ParseError::MissingArguments {
                command: group.command,
            }
            .into());
        }

        let mut command = upper;
        while !args.is_empty() {
            match command {
                'M' => {
                    let next = args.next_point(is_relative, current)?;
                    current = next;
                    subpath_start = next;
                    last_control = None;
                    // Subsequent coordinate pairs are implicit linetos.
                    command = 'L';
                }
                'L' => {
                    let next = args.next_point(is_relative, current)?;
                    segments.push(Segment::Line(Line::new(current, next)));
                    current = next;
                    last_control = None;
                }
                'H' => {
                    let x = args.next()?;
                    let next = if is_relative {
                        Point::new(current.x + x, current.y)
                    } else {
                        Point::new(x, current.y)
                    };
                    segments.push(Segment::Line(Line::new(current, next)));
                    current = next;
                    last_control = None;
                }
                'V' => {
                    let y = args.next()?;
                    let next = if is_relative {
                        Point::new(current.x, current.y + y)
                    } else {
                        Point::new(current.x, y)
                    };
                    segments.push(Segment::Line(Line::new(current, next)));
                    current = next;
                    last_control = None;
                }
                'Q' => {
                    let c1 = args.next_point(is_relative, current)?;
                    let next = args.next_point(is_relative, current)?;
                    segments.push(Segment::QuadraticCurve(QuadraticCurve::new(
                        current, c1, next,
                    )));
                    current = next;
                    last_control = Some(c1);
                }
                'C' => {
                    let c1 = args.next_point(is_relative, current)?;
                    let c2 = args.next_point(is_relative, current)?;
                    let next = args.next_point(is_relative, current)?;
                    segments.push(Segment::CubicCurve(CubicCurve::new(current, c1, c2, next)));
                    current = next;
                    last_control = Some(c2);
                }
                'S' => {
                    let c2 = args.next_point(is_relative, current)?;
                    let next = args.next_point(is_relative, current)?;
                    let c1 = match (last_control, prev_command) {
                        (Some(prev), Some('C' | 'S')) => {
                            Point::new(2.0 * current.x - prev.x, 2.0 * current.y - prev.y)
                        }
                        _ => current,
                    };
                    segments.push(Segment::CubicCurve(CubicCurve::new(current, c1, c2, next)));
                    current = next;
                    last_control = Some(c2);
                }
                'T' => {
                    let next = args.next_point(is_relative, current)?;
                    let c1 = match (last_control, prev_command) {
                        (Some(prev), Some('Q' | 'T')) => {
                            Point::new(2.0 * current.x - prev.x, 2.0 * current.y - prev.y)
                        }
                        _ => current,
                    };
                    segments.push(Segment::QuadraticCurve(QuadraticCurve::new(
                        current, c1, next,
                    )));
                    current = next;
                    last_control = Some(c1);
                }
                'A' => {
                    let rx = args.next()?;
                    let ry = args.next()?;
                    let x_axis_rotation = args.next()?;
                    let large_arc = args.next()? != 0.0;
                    let sweep = args.next()? != 0.0;
                    let next = args.next_point(is_relative, current)?;

                    if rx == 0.0 || ry == 0.0 {
                        // Zero-radius arcs degrade to straight lines.
                        segments.push(Segment::Line(Line::new(current, next)));
                    } else if current != next {
                        segments.push(Segment::Arc(Arc::new(
                            current,
                            rx,
                            ry,
                            x_axis_rotation,
                            large_arc,
                            sweep,
                            next,
                        )));
                    }
                    current = next;
                    last_control = None;
                }
                other => {
                    return Err(ParseError::UnsupportedCommand {
                        command: other.to_string(),
                    }
                    .into())
                }
            }
            prev_command = Some(command);
        }
    }

    Ok(segments)
}

struct CommandGroup {
    command: char,
    args: Vec<f64>,
}

/// Splits path data into command letter + numeric argument groups.
/// `e`/`E` are never command letters; they belong to scientific notation.
fn split_commands(d: &str) -> Result<Vec<CommandGroup>> {
    let mut groups = Vec::new();
    let mut current: Option<(char, String)> = None;

    for c in d.chars() {
        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            if let Some((command, text)) = current.take() {
                groups.push(CommandGroup {
                    command,
                    args: lex_numbers(&text)?,
                });
            }
            current = Some((c, String::new()));
        } else if let Some((_, text)) = &mut current {
            text.push(c);
        } else if !c.is_whitespace() && c != ',' {
            // Numeric data before the first command letter.
            return Err(ParseError::UnsupportedCommand {
                command: c.to_string(),
            }
            .into());
        }
    }
    if let Some((command, text)) = current.take() {
        groups.push(CommandGroup {
            command,
            args: lex_numbers(&text)?,
        });
    }
    Ok(groups)
}

/// Lexes a run of SVG numbers. A sign starts a new token unless it follows
/// an exponent marker, and a second decimal point starts a new token.
fn lex_numbers(text: &str) -> Result<Vec<f64>> {
    let mut numbers = Vec::new();
    let mut token = String::new();
    let mut seen_dot = false;
    let mut prev: Option<char> = None;

    for c in text.chars() {
        match c {
            c if c.is_whitespace() || c == ',' => {
                flush(&mut token, &mut numbers)?;
                seen_dot = false;
            }
            '-' | '+' if !matches!(prev, Some('e' | 'E')) => {
                flush(&mut token, &mut numbers)?;
                seen_dot = false;
                token.push(c);
            }
            '.' if seen_dot => {
                flush(&mut token, &mut numbers)?;
                token.push(c);
            }
            '.' => {
                seen_dot = true;
                token.push(c);
            }
            _ => token.push(c),
        }
        prev = Some(c);
    }
    flush(&mut token, &mut numbers)?;
    Ok(numbers)
}

fn flush(token: &mut String, numbers: &mut Vec<f64>) -> Result<()> {
    if token.is_empty() {
        return Ok(());
    }
    let value: f64 = token.parse().map_err(|_| ParseError::MalformedNumber {
        token: token.clone(),
    })?;
    numbers.push(value);
    token.clear();
    Ok(())
}

/// Cursor over a command group's numeric arguments.
struct Args<'a> {
    command: char,
    values: &'a [f64],
    pos: usize,
}

impl<'a> Args<'a> {
    fn new(command: char, values: &'a [f64]) -> Self {
        Self {
            command,
            values,
            pos: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.values.len()
    }

    fn next(&mut self) -> Result<f64> {
        let value =
            self.values
                .get(self.pos)
                .copied()
                .ok_or(ParseError::MissingArguments {
                    command: self.command,
                })?;
        self.pos += 1;
        Ok(value)
    }

    fn next_point(&mut self, is_relative: bool, current: Point) -> Result<Point> {
        let x = self.next()?;
        let y = self.next()?;
        Ok(if is_relative {
            Point::new(current.x + x, current.y + y)
        } else {
            Point::new(x, y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn absolute_move_and_line() {
        let segments = parse_svg("M 0 0 L 10 0").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_point(), Point::new(0.0, 0.0));
        assert_eq!(segments[0].end_point(), Point::new(10.0, 0.0));
    }

    #[test]
    fn relative_commands_accumulate() {
        let segments = parse_svg("m 10 10 l 5 0 l 0 5").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_point(), Point::new(10.0, 10.0));
        assert_eq!(segments[0].end_point(), Point::new(15.0, 10.0));
        assert_eq!(segments[1].end_point(), Point::new(15.0, 15.0));
    }

    #[test]
    fn moveto_extra_pairs_are_implicit_linetos() {
        let segments = parse_svg("M 0 0 10 10 20 0").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].end_point(), Point::new(10.0, 10.0));
        assert_eq!(segments[1].start_point(), Point::new(10.0, 10.0));
        assert_eq!(segments[1].end_point(), Point::new(20.0, 0.0));
    }

    #[test]
    fn horizontal_and_vertical() {
        let segments = parse_svg("M 1 2 H 11 v 3").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].end_point(), Point::new(11.0, 2.0));
        assert_eq!(segments[1].end_point(), Point::new(11.0, 5.0));
    }

    #[test]
    fn cubic_and_quadratic_curves() {
        let segments = parse_svg("M 0 0 C 1 2 3 2 4 0 Q 6 3 8 0").unwrap();
        assert_eq!(segments.len(), 2);
        match &segments[0] {
            Segment::CubicCurve(c) => {
                assert_eq!(c.control1(), Point::new(1.0, 2.0));
                assert_eq!(c.control2(), Point::new(3.0, 2.0));
                assert_eq!(c.authored_end(), Point::new(4.0, 0.0));
            }
            other => panic!("expected cubic, got {other:?}"),
        }
        match &segments[1] {
            Segment::QuadraticCurve(q) => {
                assert_eq!(q.control_point(), Point::new(6.0, 3.0));
            }
            other => panic!("expected quadratic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_cubic_reflects_previous_handle() {
        let segments = parse_svg("M 0 0 C 0 5 5 5 10 0 S 20 -5 20 0").unwrap();
        assert_eq!(segments.len(), 2);
        match &segments[1] {
            // Reflection of (5, 5) about (10, 0) is (15, -5).
            Segment::CubicCurve(c) => assert_eq!(c.control1(), Point::new(15.0, -5.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_without_preceding_curve_uses_current_point() {
        let segments = parse_svg("M 0 0 L 5 0 S 10 5 15 0").unwrap();
        match &segments[1] {
            Segment::CubicCurve(c) => assert_eq!(c.control1(), Point::new(5.0, 0.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_quadratic_chain() {
        let segments = parse_svg("M 0 0 Q 5 10 10 0 T 20 0").unwrap();
        match &segments[1] {
            // Reflection of (5, 10) about (10, 0) is (15, -10).
            Segment::QuadraticCurve(q) => assert_eq!(q.control_point(), Point::new(15.0, -10.0)),
            other => panic!("expected quadratic, got {other:?}"),
        }
    }

    #[test]
    fn arc_command_parses_flags() {
        let segments = parse_svg("M 0 0 A 10 10 0 0 1 10 10").unwrap();
        assert_eq!(segments.len(), 1);
        match &segments[0] {
            Segment::Arc(a) => {
                assert_eq!(a.rx(), 10.0);
                assert_eq!(a.ry(), 10.0);
                assert!(!a.large_arc());
                assert!(a.sweep());
                assert_eq!(a.authored_end(), Point::new(10.0, 10.0));
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let segments = parse_svg("M 0 0 A 0 10 0 0 1 10 10").unwrap();
        assert!(matches!(segments[0], Segment::Line(_)));
    }

    #[test]
    fn zero_length_arc_is_skipped() {
        let segments = parse_svg("M 5 5 A 10 10 0 0 1 5 5").unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn z_closes_subpath_with_a_line() {
        let segments = parse_svg("M 0 0 L 10 0 L 10 10 Z").unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].start_point(), Point::new(10.0, 10.0));
        assert_eq!(segments[2].end_point(), Point::new(0.0, 0.0));
    }

    #[test]
    fn z_on_already_closed_subpath_adds_nothing() {
        let segments = parse_svg("M 0 0 L 10 0 L 0 0 Z").unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn compact_negative_coordinates() {
        let segments = parse_svg("M0 0L10-5").unwrap();
        assert_eq!(segments[0].end_point(), Point::new(10.0, -5.0));
    }

    #[test]
    fn scientific_notation_survives_lexing() {
        let segments = parse_svg("M 0 0 L 1e2 -1.5e1").unwrap();
        assert_eq!(segments[0].end_point(), Point::new(100.0, -15.0));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse_svg("M 0 0 B 1 2").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::UnsupportedCommand { .. })
        ));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = parse_svg("M 0 0 L 1..0.. 2").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn missing_arguments_is_an_error() {
        let err = parse_svg("M 0 0 C 1 2 3").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::MissingArguments { command: 'C' })
        ));
    }
}
