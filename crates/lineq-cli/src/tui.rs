//! Interactive terminal UI: the two exercises side by side, each with a
//! braille-canvas coordinate plane. Mouse clicks plot points; the hint
//! backend runs on worker threads so the event loop never blocks.

use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Context as CanvasContext, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use lineq_core::{
    DrawSession, Equation, Point, ReadSession, SurfaceMap, Verdict, PLANE_MAX, PLANE_MIN,
};
use lineq_hint::{prompt, HintClient, HintError};

use crate::config::Config;

/// Plane range drawn on each canvas; slightly past the grid so axis
/// arrowheads and labels have room.
const CANVAS_BOUND: f64 = 6.8;

const GRID_COLOR: Color = Color::DarkGray;
const AXIS_COLOR: Color = Color::White;
const USER_COLOR: Color = Color::Magenta;
const TARGET_COLOR: Color = Color::Green;
const GRAPH_COLOR: Color = Color::Blue;

const HINTS_DISABLED: &str =
    "Hints are disabled: set api_key under [hint] in the config file or export OPENAI_API_KEY.";

pub fn run(config: Config) -> Result<()> {
    enable_raw_mode().context("entering raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Draw,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoefField {
    A,
    B,
}

#[derive(Debug, Clone, Copy)]
enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Message {
    kind: MessageKind,
    text: String,
}

impl Message {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Transient state of the hint area; the fetched text itself lives in the
/// session so it survives redraws and is cleared on reset/incorrect.
#[derive(Debug, Clone, Default)]
enum HintStatus {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

/// Completion of one hint worker thread.
struct HintOutcome {
    pane: Pane,
    seq: u64,
    result: Result<String, HintError>,
}

struct App {
    draw: DrawSession,
    read: ReadSession,
    focus: Pane,
    read_field: CoefField,
    draw_message: Option<Message>,
    read_message: Option<Message>,
    draw_hint: HintStatus,
    read_hint: HintStatus,
    /// Last-rendered areas, for mouse hit-testing.
    draw_pane_area: Rect,
    read_pane_area: Rect,
    draw_canvas_area: Rect,
    client: Option<Arc<HintClient>>,
    outcome_tx: mpsc::Sender<HintOutcome>,
    outcome_rx: mpsc::Receiver<HintOutcome>,
    rng: rand::rngs::ThreadRng,
    should_quit: bool,
}

impl App {
    fn new(config: &Config) -> Self {
        let mut rng = rand::thread_rng();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            draw: DrawSession::new(&mut rng),
            read: ReadSession::new(&mut rng),
            focus: Pane::Draw,
            read_field: CoefField::A,
            draw_message: None,
            read_message: None,
            draw_hint: HintStatus::Idle,
            read_hint: HintStatus::Idle,
            draw_pane_area: Rect::default(),
            read_pane_area: Rect::default(),
            draw_canvas_area: Rect::default(),
            client: HintClient::from_config(&config.hint).map(Arc::new),
            outcome_tx,
            outcome_rx,
            rng,
            should_quit: false,
        }
    }

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
                    Event::Mouse(mouse) => self.on_mouse(mouse),
                    _ => {}
                }
            }
            while let Ok(outcome) = self.outcome_rx.try_recv() {
                self.on_hint_outcome(outcome);
            }
        }
        Ok(())
    }

    // -- input ------------------------------------------------------------

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Pane::Draw => Pane::Read,
                    Pane::Read => Pane::Draw,
                };
            }
            KeyCode::Enter => self.submit(self.focus),
            KeyCode::Char('h') => self.request_hint(self.focus),
            KeyCode::Char('r') => self.reset(self.focus),
            KeyCode::Left if self.focus == Pane::Read => self.read_field = CoefField::A,
            KeyCode::Right if self.focus == Pane::Read => self.read_field = CoefField::B,
            KeyCode::Backspace if self.focus == Pane::Read => {
                if !self.read.is_correct() {
                    self.active_input().pop();
                }
            }
            KeyCode::Char(c) if self.focus == Pane::Read => {
                if !self.read.is_correct() && (c.is_ascii_digit() || c == '-') {
                    let input = self.active_input();
                    if input.len() < 4 {
                        input.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.read_field {
            CoefField::A => &mut self.read.input_a,
            CoefField::B => &mut self.read.input_b,
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        if self.read_pane_area.contains(position) {
            self.focus = Pane::Read;
            return;
        }
        if !self.draw_pane_area.contains(position) {
            return;
        }
        self.focus = Pane::Draw;
        if !self.draw_canvas_area.contains(position) || self.draw.is_correct() {
            return;
        }

        let map = surface_map(self.draw_canvas_area);
        // cell centers, not corners
        let (x, y) = map.to_plane(f64::from(mouse.column) + 0.5, f64::from(mouse.row) + 0.5);
        let point = Point::nearest(x, y);
        if point.in_plane() {
            self.draw.place_point(point);
        }
    }

    // -- actions ----------------------------------------------------------

    fn submit(&mut self, pane: Pane) {
        let verdict = match pane {
            Pane::Draw => self.draw.submit(),
            Pane::Read => self.read.submit(),
        };
        // None: the round is already solved and the lock makes this a no-op
        let Some(verdict) = verdict else { return };
        let message = verdict_message(verdict);
        match pane {
            Pane::Draw => {
                if verdict == Verdict::Incorrect {
                    self.draw_hint = HintStatus::Idle;
                }
                self.draw_message = Some(message);
            }
            Pane::Read => {
                if verdict == Verdict::Incorrect {
                    self.read_hint = HintStatus::Idle;
                }
                self.read_message = Some(message);
            }
        }
    }

    fn reset(&mut self, pane: Pane) {
        match pane {
            Pane::Draw => {
                self.draw.reset(&mut self.rng);
                self.draw_message = None;
                self.draw_hint = HintStatus::Idle;
            }
            Pane::Read => {
                self.read.reset(&mut self.rng);
                self.read_message = None;
                self.read_hint = HintStatus::Idle;
                self.read_field = CoefField::A;
            }
        }
    }

    fn request_hint(&mut self, pane: Pane) {
        match pane {
            Pane::Draw => {
                if self.draw.is_correct() {
                    return;
                }
                if self.draw.points().len() != 2 {
                    self.draw_message = Some(Message::new(
                        MessageKind::Info,
                        "Place two points before asking for a hint.",
                    ));
                    return;
                }
                if self.draw.user_line().is_none() {
                    self.draw_message = Some(verdict_message(Verdict::VerticalLine));
                    return;
                }
                let Some(client) = self.client.clone() else {
                    self.draw_hint = HintStatus::Failed(HINTS_DISABLED.into());
                    return;
                };
                let prompt = prompt::draw_hint(self.draw.equation());
                let seq = self.draw.begin_hint();
                self.draw_hint = HintStatus::Pending;
                spawn_hint_worker(client, prompt, Pane::Draw, seq, self.outcome_tx.clone());
            }
            Pane::Read => {
                if self.read.is_correct() {
                    return;
                }
                let Some(client) = self.client.clone() else {
                    self.read_hint = HintStatus::Failed(HINTS_DISABLED.into());
                    return;
                };
                let (typed_a, typed_b) = self.read.typed_coefficients();
                let prompt = prompt::read_hint(self.read.equation(), typed_a, typed_b);
                let seq = self.read.begin_hint();
                self.read_hint = HintStatus::Pending;
                spawn_hint_worker(client, prompt, Pane::Read, seq, self.outcome_tx.clone());
            }
        }
    }

    fn on_hint_outcome(&mut self, outcome: HintOutcome) {
        // responses for anything but the latest request are stale and dropped
        match outcome.pane {
            Pane::Draw => {
                if outcome.seq != self.draw.hint_seq() {
                    return;
                }
                match outcome.result {
                    Ok(text) => {
                        self.draw.accept_hint(outcome.seq, text);
                        self.draw_hint = HintStatus::Idle;
                    }
                    Err(err) => self.draw_hint = HintStatus::Failed(err.to_string()),
                }
            }
            Pane::Read => {
                if outcome.seq != self.read.hint_seq() {
                    return;
                }
                match outcome.result {
                    Ok(text) => {
                        self.read.accept_hint(outcome.seq, text);
                        self.read_hint = HintStatus::Idle;
                    }
                    Err(err) => self.read_hint = HintStatus::Failed(err.to_string()),
                }
            }
        }
    }

    // -- rendering --------------------------------------------------------

    fn render(&mut self, frame: &mut Frame) {
        let outer = Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());
        let panes =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(outer[0]);
        self.draw_pane_area = panes[0];
        self.read_pane_area = panes[1];

        self.render_draw_pane(frame, panes[0]);
        self.render_read_pane(frame, panes[1]);
        self.render_help(frame, outer[1]);
    }

    fn render_draw_pane(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(11),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(6),
        ])
        .split(area);

        let focused = self.focus == Pane::Draw;
        let title = Paragraph::new(TextLine::from(vec![
            Span::raw("Draw this line:  "),
            Span::styled(
                self.draw.equation().to_string(),
                Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]))
        .centered()
        .block(pane_block("Draw the line", focused));
        frame.render_widget(title, rows[0]);

        let canvas_block = Block::bordered().border_style(border_style(focused));
        self.draw_canvas_area = canvas_block.inner(rows[1]);
        let session = &self.draw;
        let canvas = Canvas::default()
            .block(canvas_block)
            .marker(Marker::Braille)
            .x_bounds([-CANVAS_BOUND, CANVAS_BOUND])
            .y_bounds([-CANVAS_BOUND, CANVAS_BOUND])
            .paint(|ctx| {
                paint_plane(ctx);
                ctx.layer();
                if session.is_correct() {
                    paint_equation_line(ctx, session.equation(), TARGET_COLOR);
                }
                let coords: Vec<(f64, f64)> = session
                    .points()
                    .iter()
                    .map(|p| (f64::from(p.x), f64::from(p.y)))
                    .collect();
                if coords.len() == 2 {
                    ctx.draw(&CanvasLine {
                        x1: coords[0].0,
                        y1: coords[0].1,
                        x2: coords[1].0,
                        y2: coords[1].1,
                        color: USER_COLOR,
                    });
                }
                ctx.draw(&Points {
                    coords: &coords,
                    color: USER_COLOR,
                });
            });
        frame.render_widget(canvas, rows[1]);

        let status = Paragraph::new(points_status(session.points())).centered();
        frame.render_widget(status, rows[2]);

        render_message(frame, rows[3], &self.draw_message);
        render_hint(frame, rows[4], self.draw.hint(), &self.draw_hint, focused);
    }

    fn render_read_pane(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(11),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(6),
        ])
        .split(area);

        let focused = self.focus == Pane::Read;
        let session = &self.read;

        // keep the equation hidden until it's been found
        let equation_text = if session.is_correct() {
            session.equation().to_string()
        } else {
            "y = ax + b".to_string()
        };
        let title = Paragraph::new(TextLine::from(vec![
            Span::raw("Find the equation:  "),
            Span::styled(
                equation_text,
                Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]))
        .centered()
        .block(pane_block("Read the graph", focused));
        frame.render_widget(title, rows[0]);

        let canvas_block = Block::bordered().border_style(border_style(focused));
        let canvas = Canvas::default()
            .block(canvas_block)
            .marker(Marker::Braille)
            .x_bounds([-CANVAS_BOUND, CANVAS_BOUND])
            .y_bounds([-CANVAS_BOUND, CANVAS_BOUND])
            .paint(|ctx| {
                paint_plane(ctx);
                ctx.layer();
                paint_equation_line(ctx, session.equation(), GRAPH_COLOR);
            });
        frame.render_widget(canvas, rows[1]);

        let inputs = Paragraph::new(TextLine::from(vec![
            Span::raw("slope a = "),
            field_span(&session.input_a, self.read_field == CoefField::A, focused, session.is_correct()),
            Span::raw("    intercept b = "),
            field_span(&session.input_b, self.read_field == CoefField::B, focused, session.is_correct()),
        ]))
        .centered();
        frame.render_widget(inputs, rows[2]);

        render_message(frame, rows[3], &self.read_message);
        render_hint(frame, rows[4], session.hint(), &self.read_hint, focused);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = match self.focus {
            Pane::Draw => "click plot point · enter check · h hint · r reset · tab switch · q quit",
            Pane::Read => {
                "type a/b (←/→ switch field) · enter check · h hint · r reset · tab switch · q quit"
            }
        };
        frame.render_widget(
            Paragraph::new(help)
                .style(Style::new().fg(Color::DarkGray))
                .centered(),
            area,
        );
    }
}

// ---------------------------------------------------------------------------
// Widgets & painting
// ---------------------------------------------------------------------------

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    Block::bordered().title(title).border_style(border_style(focused))
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Cyan)
    } else {
        Style::new().fg(Color::DarkGray)
    }
}

fn field_span(value: &str, active: bool, pane_focused: bool, locked: bool) -> Span<'_> {
    let style = if locked {
        Style::new().fg(Color::DarkGray)
    } else if active && pane_focused {
        Style::new().add_modifier(Modifier::REVERSED)
    } else {
        Style::new().fg(Color::White)
    };
    Span::styled(format!("[{value:>3}]"), style)
}

/// Unit grid, axes with arrowheads, tick marks, and integer labels.
fn paint_plane(ctx: &mut CanvasContext) {
    let min = f64::from(PLANE_MIN);
    let max = f64::from(PLANE_MAX);

    for i in PLANE_MIN..=PLANE_MAX {
        let i = f64::from(i);
        ctx.draw(&CanvasLine {
            x1: i,
            y1: min,
            x2: i,
            y2: max,
            color: GRID_COLOR,
        });
        ctx.draw(&CanvasLine {
            x1: min,
            y1: i,
            x2: max,
            y2: i,
            color: GRID_COLOR,
        });
    }

    ctx.layer();

    // axes
    ctx.draw(&CanvasLine {
        x1: -CANVAS_BOUND,
        y1: 0.0,
        x2: CANVAS_BOUND,
        y2: 0.0,
        color: AXIS_COLOR,
    });
    ctx.draw(&CanvasLine {
        x1: 0.0,
        y1: -CANVAS_BOUND,
        x2: 0.0,
        y2: CANVAS_BOUND,
        color: AXIS_COLOR,
    });

    // arrowheads
    for dy in [-0.25, 0.25] {
        ctx.draw(&CanvasLine {
            x1: CANVAS_BOUND,
            y1: 0.0,
            x2: CANVAS_BOUND - 0.5,
            y2: dy,
            color: AXIS_COLOR,
        });
    }
    for dx in [-0.25, 0.25] {
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: CANVAS_BOUND,
            x2: dx,
            y2: CANVAS_BOUND - 0.5,
            color: AXIS_COLOR,
        });
    }

    // tick marks at every non-zero integer
    for i in PLANE_MIN..=PLANE_MAX {
        if i == 0 {
            continue;
        }
        let i = f64::from(i);
        ctx.draw(&CanvasLine {
            x1: i,
            y1: -0.15,
            x2: i,
            y2: 0.15,
            color: AXIS_COLOR,
        });
        ctx.draw(&CanvasLine {
            x1: -0.15,
            y1: i,
            x2: 0.15,
            y2: i,
            color: AXIS_COLOR,
        });
    }

    ctx.layer();

    // labels: even integers only, the odd ones don't fit a cell grid
    let label_style = Style::new().fg(Color::Gray);
    for i in (PLANE_MIN..=PLANE_MAX).step_by(2) {
        if i == 0 {
            continue;
        }
        ctx.print(
            f64::from(i),
            -0.9,
            TextLine::styled(i.to_string(), label_style),
        );
        ctx.print(
            0.4,
            f64::from(i),
            TextLine::styled(i.to_string(), label_style),
        );
    }
    ctx.print(-0.7, -0.9, TextLine::styled("O", label_style));
    ctx.print(
        CANVAS_BOUND - 0.4,
        -0.9,
        TextLine::styled("x", label_style),
    );
    ctx.print(0.4, CANVAS_BOUND - 0.4, TextLine::styled("y", label_style));
}

/// Draw y = ax + b across the plane, clipped to the canvas box.
fn paint_equation_line(ctx: &mut CanvasContext, equation: Equation, color: Color) {
    let Some(((x1, y1), (x2, y2))) = clipped_segment(equation, CANVAS_BOUND) else {
        return;
    };
    ctx.draw(&CanvasLine {
        x1,
        y1,
        x2,
        y2,
        color,
    });
}

/// Intersect the line with the square [-bound, bound]^2. `None` when the
/// line misses the box entirely (|b| too large for a flat line).
fn clipped_segment(equation: Equation, bound: f64) -> Option<((f64, f64), (f64, f64))> {
    let a = f64::from(equation.a);
    let b = f64::from(equation.b);
    let (mut x1, mut x2) = (-bound, bound);
    if a != 0.0 {
        let at_bottom = (-bound - b) / a;
        let at_top = (bound - b) / a;
        let (lo, hi) = if at_bottom <= at_top {
            (at_bottom, at_top)
        } else {
            (at_top, at_bottom)
        };
        x1 = x1.max(lo);
        x2 = x2.min(hi);
        if x1 > x2 {
            return None;
        }
    } else if b.abs() > bound {
        return None;
    }
    Some(((x1, a * x1 + b), (x2, a * x2 + b)))
}

fn points_status(points: &[Point]) -> String {
    match points {
        [] => "Click two integer grid points to draw the line.".into(),
        [p] => format!("Point 1: {p} — place one more."),
        [p1, p2, ..] => format!("Points: {p1}, {p2}"),
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &Option<Message>) {
    let Some(message) = message else { return };
    let style = match message.kind {
        MessageKind::Info => Style::new().fg(Color::Cyan),
        MessageKind::Success => Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
        MessageKind::Error => Style::new().fg(Color::Red),
    };
    frame.render_widget(
        Paragraph::new(message.text.as_str()).style(style).centered(),
        area,
    );
}

fn render_hint(
    frame: &mut Frame,
    area: Rect,
    hint: Option<&str>,
    status: &HintStatus,
    focused: bool,
) {
    let block = Block::bordered()
        .title("Hint")
        .border_style(border_style(focused));
    let paragraph = match status {
        HintStatus::Pending => Paragraph::new("Thinking of a hint...")
            .style(Style::new().fg(Color::Yellow).add_modifier(Modifier::ITALIC)),
        HintStatus::Failed(reason) => {
            Paragraph::new(reason.as_str()).style(Style::new().fg(Color::Red))
        }
        HintStatus::Idle => match hint {
            Some(text) => Paragraph::new(text).style(Style::new().fg(Color::Cyan)),
            None => Paragraph::new("Press h for a hint.").style(Style::new().fg(Color::DarkGray)),
        },
    };
    frame.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

fn verdict_message(verdict: Verdict) -> Message {
    match verdict {
        Verdict::Correct => Message::new(MessageKind::Success, "Correct! Nicely done."),
        Verdict::Incorrect => {
            Message::new(MessageKind::Error, "Not quite yet — check a hint and try again.")
        }
        Verdict::NeedMorePoints => Message::new(MessageKind::Info, "Place two points first."),
        Verdict::VerticalLine => Message::new(
            MessageKind::Info,
            "That line is vertical — pick two points with different x values.",
        ),
        Verdict::InvalidInput => {
            Message::new(MessageKind::Info, "Enter whole numbers for both a and b.")
        }
    }
}

// ---------------------------------------------------------------------------
// Mouse mapping & hint workers
// ---------------------------------------------------------------------------

/// Map from terminal cells inside the canvas area to plane coordinates.
/// Cells per unit differ by axis since cells are taller than wide.
fn surface_map(area: Rect) -> SurfaceMap {
    let scale_x = f64::from(area.width) / (2.0 * CANVAS_BOUND);
    let scale_y = f64::from(area.height) / (2.0 * CANVAS_BOUND);
    let origin_x = f64::from(area.x) + f64::from(area.width) / 2.0;
    let origin_y = f64::from(area.y) + f64::from(area.height) / 2.0;
    SurfaceMap::new(scale_x, scale_y, origin_x, origin_y)
}

fn spawn_hint_worker(
    client: Arc<HintClient>,
    prompt: String,
    pane: Pane,
    seq: u64,
    tx: mpsc::Sender<HintOutcome>,
) {
    tracing::debug!(seq, "spawning hint request");
    std::thread::spawn(move || {
        let result = client.request_hint(&prompt);
        let _ = tx.send(HintOutcome { pane, seq, result });
    });
}
