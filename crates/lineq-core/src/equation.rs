use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line in slope-intercept form, y = ax + b.
///
/// Coefficients are small integers so every target line passes through
/// integer grid points the student can click. Generated equations never
/// degenerate to y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    pub a: i32,
    pub b: i32,
}

impl Equation {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Draw a random equation: a in -3..=3, b in -5..=5.
    ///
    /// When the draw lands on a = 0, b = 0, b is redrawn from 1..=10.
    /// The redraw is positive-only, so b skews positive in that branch.
    pub fn random(rng: &mut impl Rng) -> Self {
        let a = rng.gen_range(-3..=3);
        let b = rng.gen_range(-5..=5);
        Self::from_draw(a, b, rng)
    }

    fn from_draw(a: i32, b: i32, rng: &mut impl Rng) -> Self {
        if a == 0 && b == 0 {
            return Self {
                a,
                b: rng.gen_range(1..=10),
            };
        }
        Self { a, b }
    }

    /// y value of the line at x.
    pub fn y_at(&self, x: f64) -> f64 {
        f64::from(self.a) * x + f64::from(self.b)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { a, b } = *self;
        if a == 0 {
            return write!(f, "y = {b}");
        }
        let slope = match a {
            1 => "x".to_string(),
            -1 => "-x".to_string(),
            _ => format!("{a}x"),
        };
        if b == 0 {
            write!(f, "y = {slope}")
        } else if b > 0 {
            write!(f, "y = {slope} + {b}")
        } else {
            write!(f, "y = {slope} - {}", -b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_never_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let eq = Equation::random(&mut rng);
            assert!(!(eq.a == 0 && eq.b == 0), "generated y = 0");
            assert!((-3..=3).contains(&eq.a));
            assert!((-5..=10).contains(&eq.b));
        }
    }

    #[test]
    fn test_degenerate_redraw_is_positive() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let eq = Equation::from_draw(0, 0, &mut rng);
            assert_eq!(eq.a, 0);
            assert!((1..=10).contains(&eq.b));
        }
    }

    #[test]
    fn test_non_degenerate_draw_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Equation::from_draw(0, -3, &mut rng), Equation::new(0, -3));
        assert_eq!(Equation::from_draw(2, 0, &mut rng), Equation::new(2, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Equation::new(2, -1).to_string(), "y = 2x - 1");
        assert_eq!(Equation::new(-3, 4).to_string(), "y = -3x + 4");
        assert_eq!(Equation::new(0, 5).to_string(), "y = 5");
        assert_eq!(Equation::new(0, -2).to_string(), "y = -2");
        assert_eq!(Equation::new(1, 0).to_string(), "y = x");
        assert_eq!(Equation::new(-1, 0).to_string(), "y = -x");
        assert_eq!(Equation::new(3, 0).to_string(), "y = 3x");
        assert_eq!(Equation::new(1, 1).to_string(), "y = x + 1");
    }

    #[test]
    fn test_y_at() {
        let eq = Equation::new(2, -1);
        assert_eq!(eq.y_at(0.0), -1.0);
        assert_eq!(eq.y_at(3.0), 5.0);
        assert_eq!(eq.y_at(-1.5), -4.0);
    }
}
