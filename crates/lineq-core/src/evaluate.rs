use serde::{Deserialize, Serialize};
use std::fmt;

use crate::equation::Equation;
use crate::plane::Point;

/// Allowed deviation when checking a drawn line's slope.
pub const SLOPE_TOLERANCE: f64 = 0.2;
/// Allowed deviation when checking a drawn line's intercept.
pub const INTERCEPT_TOLERANCE: f64 = 0.2;

/// Below this |dx| a point pair is treated as a vertical line.
const VERTICAL_EPSILON: f64 = 0.001;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Outcome of one evaluation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Draw mode: fewer than two points placed.
    NeedMorePoints,
    /// Draw mode: the two points share an x coordinate. Targets are never
    /// vertical, so this can't match and is rejected without a slope
    /// division.
    VerticalLine,
    /// Read mode: a or b did not parse as an integer.
    InvalidInput,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Incorrect => write!(f, "incorrect"),
            Self::NeedMorePoints => write!(f, "need more points"),
            Self::VerticalLine => write!(f, "vertical line"),
            Self::InvalidInput => write!(f, "invalid input"),
        }
    }
}

// ---------------------------------------------------------------------------
// Draw mode
// ---------------------------------------------------------------------------

/// Slope and intercept fitted through two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedLine {
    pub a: f64,
    pub b: f64,
}

/// Fit y = ax + b through two points. `None` when the pair is vertical.
pub fn fit_line(p1: Point, p2: Point) -> Option<FittedLine> {
    let dx = f64::from(p2.x - p1.x);
    if dx.abs() < VERTICAL_EPSILON {
        return None;
    }
    let a = f64::from(p2.y - p1.y) / dx;
    let b = f64::from(p1.y) - a * f64::from(p1.x);
    Some(FittedLine { a, b })
}

/// Check the student's two placed points against the target line.
pub fn evaluate_drawn(points: &[Point], target: Equation) -> Verdict {
    let [p1, p2] = points else {
        return Verdict::NeedMorePoints;
    };
    let Some(line) = fit_line(*p1, *p2) else {
        return Verdict::VerticalLine;
    };
    let a_diff = (line.a - f64::from(target.a)).abs();
    let b_diff = (line.b - f64::from(target.b)).abs();
    if a_diff <= SLOPE_TOLERANCE && b_diff <= INTERCEPT_TOLERANCE {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

// ---------------------------------------------------------------------------
// Read mode
// ---------------------------------------------------------------------------

/// Check typed coefficients against the target line.
///
/// Inputs must be plain decimal integers; `4.0` and friends are rejected
/// rather than truncated. Discrete inputs get an exact check, no tolerance.
pub fn evaluate_read(input_a: &str, input_b: &str, target: Equation) -> Verdict {
    let (Ok(a), Ok(b)) = (parse_coefficient(input_a), parse_coefficient(input_b)) else {
        return Verdict::InvalidInput;
    };
    if a == target.a && b == target.b {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

pub(crate) fn parse_coefficient(input: &str) -> Result<i32, std::num::ParseIntError> {
    input.trim().parse::<i32>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(p1: (i32, i32), p2: (i32, i32)) -> [Point; 2] {
        [Point::new(p1.0, p1.1), Point::new(p2.0, p2.1)]
    }

    #[test]
    fn test_drawn_exact_match() {
        let target = Equation::new(2, -1);
        let verdict = evaluate_drawn(&points((0, -1), (1, 1)), target);
        assert_eq!(verdict, Verdict::Correct);
    }

    #[test]
    fn test_drawn_outside_tolerance() {
        // slope through (0,-1) and (1,1.3) would be 2.3; with integer grid
        // points the nearest miss is (0,-1)-(1,2), slope 3
        let target = Equation::new(2, -1);
        let verdict = evaluate_drawn(&points((0, -1), (1, 2)), target);
        assert_eq!(verdict, Verdict::Incorrect);
    }

    #[test]
    fn test_drawn_wrong_intercept() {
        let target = Equation::new(2, -1);
        let verdict = evaluate_drawn(&points((0, 0), (1, 2)), target);
        assert_eq!(verdict, Verdict::Incorrect);
    }

    #[test]
    fn test_drawn_vertical() {
        for target in [Equation::new(2, -1), Equation::new(0, 3)] {
            let verdict = evaluate_drawn(&points((3, 0), (3, 5)), target);
            assert_eq!(verdict, Verdict::VerticalLine);
        }
    }

    #[test]
    fn test_drawn_needs_two_points() {
        let target = Equation::new(1, 1);
        assert_eq!(evaluate_drawn(&[], target), Verdict::NeedMorePoints);
        assert_eq!(
            evaluate_drawn(&[Point::new(0, 1)], target),
            Verdict::NeedMorePoints
        );
    }

    #[test]
    fn test_fit_line() {
        let line = fit_line(Point::new(0, -1), Point::new(1, 1)).unwrap();
        assert_eq!(line.a, 2.0);
        assert_eq!(line.b, -1.0);

        // order of the pair doesn't matter
        let line = fit_line(Point::new(1, 1), Point::new(0, -1)).unwrap();
        assert_eq!(line.a, 2.0);
        assert_eq!(line.b, -1.0);

        assert!(fit_line(Point::new(3, 0), Point::new(3, 5)).is_none());
    }

    #[test]
    fn test_read_exact_match() {
        let target = Equation::new(-2, 4);
        assert_eq!(evaluate_read("-2", "4", target), Verdict::Correct);
        assert_eq!(evaluate_read(" -2 ", " 4 ", target), Verdict::Correct);
    }

    #[test]
    fn test_read_no_tolerance() {
        let target = Equation::new(-2, 4);
        assert_eq!(evaluate_read("-2", "5", target), Verdict::Incorrect);
        assert_eq!(evaluate_read("-1", "4", target), Verdict::Incorrect);
    }

    #[test]
    fn test_read_rejects_non_integer_tokens() {
        let target = Equation::new(-2, 4);
        assert_eq!(evaluate_read("-2", "4.0", target), Verdict::InvalidInput);
        assert_eq!(evaluate_read("", "4", target), Verdict::InvalidInput);
        assert_eq!(evaluate_read("two", "4", target), Verdict::InvalidInput);
    }
}
