use lineq_core::Equation;

/// Persona for the system message.
pub const TUTOR_PERSONA: &str = "You are a kind and patient math tutor. You encourage \
students to enjoy math and give hints that are short, warm, and easy to follow.";

/// Hint prompt for the draw-the-line exercise.
///
/// Embeds the target equation so the model can teach toward it, but never
/// mentions the student's own (possibly wrong) line: the tutor should
/// explain the technique, not critique a guess it can't see rendered.
pub fn draw_hint(target: Equation) -> String {
    format!(
        "A student needs to draw the line {eq} on a coordinate grid by plotting two \
points, and hasn't found it yet.\n\
Without commenting on whatever the student may have drawn so far, give a friendly \
hint for drawing {eq}. Cover:\n\
1. What the slope and the y-intercept each tell you.\n\
2. A concrete example: substitute small integer x values (such as 0, 1, or -1) \
into the equation to get y, and plot those coordinates.\n\
3. How two plotted points determine the whole line.\n\
Important: start directly with the hint, with no greeting or preamble. Write \
equations as plain text like \"y = -3x - 4\" with no LaTeX or markdown. End with a \
single short sentence of encouragement.",
        eq = target,
    )
}

/// Hint prompt for the read-the-graph exercise.
///
/// Here the student's typed coefficients go into the prompt so the tutor
/// can steer from where they actually are.
pub fn read_hint(target: Equation, typed_a: i32, typed_b: i32) -> String {
    format!(
        "A student is looking at the graph of a line and must find its equation in \
the form y = ax + b. The correct answer is {eq}. The student has entered a = \
{typed_a}, b = {typed_b}.\n\
Give a friendly hint that covers:\n\
1. How to read the slope off the graph (how far the line rises or falls per step \
to the right).\n\
2. How to find the y-intercept (where the line crosses the y axis).\n\
3. A concrete example: pick integer coordinates the line passes through and work \
out a and b from them.\n\
Important: start directly with the hint, with no greeting or preamble. Write \
equations as plain text with no LaTeX or markdown. End with a single short \
sentence of encouragement.",
        eq = target,
    )
}
