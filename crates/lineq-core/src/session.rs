use rand::Rng;

use crate::equation::Equation;
use crate::evaluate::{self, evaluate_drawn, evaluate_read, FittedLine, Verdict};
use crate::plane::{Point, PointBuffer};

// ---------------------------------------------------------------------------
// DrawSession
// ---------------------------------------------------------------------------

/// State of one draw-the-line round.
///
/// Correctness is monotonic: once a round is solved, placement and
/// submission are no-ops until `reset`. Hints are tagged with a sequence
/// number so a stale response from an earlier request can't overwrite a
/// newer one.
#[derive(Debug, Clone)]
pub struct DrawSession {
    equation: Equation,
    points: PointBuffer,
    correct: bool,
    hint: Option<String>,
    hint_seq: u64,
}

impl DrawSession {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            equation: Equation::random(rng),
            points: PointBuffer::default(),
            correct: false,
            hint: None,
            hint_seq: 0,
        }
    }

    pub fn equation(&self) -> Equation {
        self.equation
    }

    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }

    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Place a point, replacing the pair once a third arrives. Returns
    /// false (and does nothing) when the round is already solved.
    pub fn place_point(&mut self, point: Point) -> bool {
        if self.correct {
            return false;
        }
        self.points.push(point);
        true
    }

    /// The line through the placed pair, if there is one and it isn't
    /// vertical.
    pub fn user_line(&self) -> Option<FittedLine> {
        let (p1, p2) = self.points.pair()?;
        evaluate::fit_line(p1, p2)
    }

    /// Evaluate the placed points. `None` once solved: the lock makes a
    /// repeated submit a no-op rather than a duplicate message.
    pub fn submit(&mut self) -> Option<Verdict> {
        if self.correct {
            return None;
        }
        let verdict = evaluate_drawn(self.points.as_slice(), self.equation);
        match verdict {
            Verdict::Correct => self.correct = true,
            Verdict::Incorrect => self.hint = None,
            _ => {}
        }
        Some(verdict)
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Start a hint request; returns the sequence number the response must
    /// carry to be accepted.
    pub fn begin_hint(&mut self) -> u64 {
        self.hint_seq += 1;
        self.hint_seq
    }

    /// Sequence number of the latest hint request.
    pub fn hint_seq(&self) -> u64 {
        self.hint_seq
    }

    /// Store a hint if it belongs to the latest request.
    pub fn accept_hint(&mut self, seq: u64, text: String) -> bool {
        if seq != self.hint_seq {
            return false;
        }
        self.hint = Some(text);
        true
    }

    /// Fresh round: new equation, cleared points, hint, and lock.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.equation = Equation::random(rng);
        self.points.clear();
        self.correct = false;
        self.hint = None;
        self.hint_seq += 1;
    }
}

// ---------------------------------------------------------------------------
// ReadSession
// ---------------------------------------------------------------------------

/// State of one read-the-graph round.
#[derive(Debug, Clone)]
pub struct ReadSession {
    equation: Equation,
    pub input_a: String,
    pub input_b: String,
    correct: bool,
    hint: Option<String>,
    hint_seq: u64,
}

impl ReadSession {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            equation: Equation::random(rng),
            input_a: String::new(),
            input_b: String::new(),
            correct: false,
            hint: None,
            hint_seq: 0,
        }
    }

    pub fn equation(&self) -> Equation {
        self.equation
    }

    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Evaluate the typed coefficients; `None` once solved.
    pub fn submit(&mut self) -> Option<Verdict> {
        if self.correct {
            return None;
        }
        let verdict = evaluate_read(&self.input_a, &self.input_b, self.equation);
        match verdict {
            Verdict::Correct => self.correct = true,
            Verdict::Incorrect => self.hint = None,
            _ => {}
        }
        Some(verdict)
    }

    /// The typed values as integers, defaulting to 0 where unparseable.
    /// Used for the hint prompt, which wants the student's attempt even
    /// when it's half-filled.
    pub fn typed_coefficients(&self) -> (i32, i32) {
        (
            evaluate::parse_coefficient(&self.input_a).unwrap_or(0),
            evaluate::parse_coefficient(&self.input_b).unwrap_or(0),
        )
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn begin_hint(&mut self) -> u64 {
        self.hint_seq += 1;
        self.hint_seq
    }

    pub fn hint_seq(&self) -> u64 {
        self.hint_seq
    }

    pub fn accept_hint(&mut self, seq: u64, text: String) -> bool {
        if seq != self.hint_seq {
            return false;
        }
        self.hint = Some(text);
        true
    }

    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.equation = Equation::random(rng);
        self.input_a.clear();
        self.input_b.clear();
        self.correct = false;
        self.hint = None;
        self.hint_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    /// Force a known equation so verdicts are deterministic.
    fn draw_session(a: i32, b: i32) -> DrawSession {
        let mut s = DrawSession::new(&mut rng());
        s.equation = Equation::new(a, b);
        s
    }

    fn read_session(a: i32, b: i32) -> ReadSession {
        let mut s = ReadSession::new(&mut rng());
        s.equation = Equation::new(a, b);
        s
    }

    #[test]
    fn test_draw_round_to_correct() {
        let mut s = draw_session(2, -1);
        s.place_point(Point::new(0, -1));
        s.place_point(Point::new(1, 1));
        assert_eq!(s.submit(), Some(Verdict::Correct));
        assert!(s.is_correct());
    }

    #[test]
    fn test_correct_locks_session() {
        let mut s = draw_session(2, -1);
        s.place_point(Point::new(0, -1));
        s.place_point(Point::new(1, 1));
        s.submit();

        // repeated submit is a no-op, placement is refused
        assert_eq!(s.submit(), None);
        assert!(!s.place_point(Point::new(5, 5)));
        assert_eq!(s.points().len(), 2);
    }

    #[test]
    fn test_incorrect_clears_hint() {
        let mut s = draw_session(2, -1);
        let seq = s.begin_hint();
        assert!(s.accept_hint(seq, "try the intercept first".into()));
        assert!(s.hint().is_some());

        s.place_point(Point::new(0, 3));
        s.place_point(Point::new(1, 3));
        assert_eq!(s.submit(), Some(Verdict::Incorrect));
        assert!(s.hint().is_none());
    }

    #[test]
    fn test_stale_hint_discarded() {
        let mut s = draw_session(2, -1);
        let first = s.begin_hint();
        let second = s.begin_hint();
        assert!(!s.accept_hint(first, "stale".into()));
        assert!(s.hint().is_none());
        assert!(s.accept_hint(second, "fresh".into()));
        assert_eq!(s.hint(), Some("fresh"));
    }

    #[test]
    fn test_reset_starts_fresh_round() {
        let mut r = rng();
        let mut s = DrawSession::new(&mut r);
        s.equation = Equation::new(2, -1);
        s.place_point(Point::new(0, -1));
        s.place_point(Point::new(1, 1));
        s.submit();
        let seq_before = s.hint_seq;

        s.reset(&mut r);
        assert!(!s.is_correct());
        assert!(s.points().is_empty());
        assert!(s.hint().is_none());
        assert!(s.hint_seq > seq_before, "in-flight hints must go stale");
        let eq = s.equation();
        assert!(!(eq.a == 0 && eq.b == 0));
    }

    #[test]
    fn test_read_round_to_correct() {
        let mut s = read_session(-2, 4);
        s.input_a.push_str("-2");
        s.input_b.push_str("4");
        assert_eq!(s.submit(), Some(Verdict::Correct));
        assert_eq!(s.submit(), None);
    }

    #[test]
    fn test_read_invalid_then_retry() {
        let mut s = read_session(-2, 4);
        s.input_a.push_str("-2");
        s.input_b.push_str("4.0");
        assert_eq!(s.submit(), Some(Verdict::InvalidInput));

        s.input_b.clear();
        s.input_b.push_str("4");
        assert_eq!(s.submit(), Some(Verdict::Correct));
    }

    #[test]
    fn test_read_typed_coefficients_default_zero() {
        let mut s = read_session(1, 1);
        s.input_a.push_str("3");
        assert_eq!(s.typed_coefficients(), (3, 0));
    }

    #[test]
    fn test_read_reset_clears_inputs() {
        let mut r = rng();
        let mut s = ReadSession::new(&mut r);
        s.input_a.push_str("5");
        s.input_b.push_str("-1");
        s.reset(&mut r);
        assert!(s.input_a.is_empty());
        assert!(s.input_b.is_empty());
        assert!(!s.is_correct());
    }
}
