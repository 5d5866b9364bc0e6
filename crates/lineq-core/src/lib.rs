pub mod equation;
pub mod evaluate;
pub mod plane;
pub mod session;

pub use equation::Equation;
pub use evaluate::{
    evaluate_drawn, evaluate_read, fit_line, FittedLine, Verdict, INTERCEPT_TOLERANCE,
    SLOPE_TOLERANCE,
};
pub use plane::{Point, PointBuffer, SurfaceMap, PLANE_MAX, PLANE_MIN};
pub use session::{DrawSession, ReadSession};
