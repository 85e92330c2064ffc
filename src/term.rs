use std::io::{stdout, Stdout, Write};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::engine::{GameSnapshot, RunState};
use crate::{Cell, Coord};

pub type TermInt = u16;
pub type TermCoords = (u16, u16);
/// Sizes computed from the board, wide enough for any `Coord`.
pub type FrameSize = (u32, u32);

// Terminal characters are about twice as tall as they are wide
const CELL_WIDTH: TermInt = 2;
const SIDEBAR_GAP: TermInt = 2;
const SIDEBAR_WIDTH: TermInt = 24;

const SNAKE_BODY: [char; 2] = ['█', '█'];
const DEAD_SNAKE: [char; 2] = ['X', 'X'];
const APPLE: [char; 2] = ['(', ')'];

const HELP_LINES: &[&str] = &[
    "Arrows/WASD  move",
    "P/Space      pause",
    "Enter        start",
    "R            restart",
    "Q/Ctrl+C     quit",
];

/// Off-screen character grid a frame is composed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Canvas { width, height, cells: vec![' '; width as usize * height as usize] }
    }

    pub fn size(&self) -> TermCoords {
        (self.width, self.height)
    }

    pub fn get(&self, pos: TermCoords) -> Option<char> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Writes outside the canvas are dropped.
    pub fn put(&mut self, pos: TermCoords, ch: char) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = ch;
        }
    }

    pub fn text(&mut self, pos: TermCoords, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.put((pos.0.saturating_add(i as TermInt), pos.1), ch);
        }
    }

    pub fn row(&self, y: TermInt) -> String {
        let start = self.width as usize * y as usize;
        self.cells[start..start + self.width as usize].iter().collect()
    }

    pub fn draw_border(&mut self, top_left: TermCoords, width: TermInt, height: TermInt) {
        let (x0, y0) = top_left;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.put((x, y0), ch);
            self.put((x, end_y), ch);
        }

        for y in y0 + 1..end_y {
            self.put((x0, y), '|');
            self.put((end_x, y), '|');
        }
    }

    /// Draws `lines` centered in a blank box around `center`.
    pub fn show_message(&mut self, center: TermCoords, lines: &[&str]) {
        let msg_height = lines.len() as TermInt + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as TermInt + 2;
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        for y_diff in 0..msg_height {
            for x_diff in 0..msg_width {
                self.put((top_left.0 + x_diff, top_left.1 + y_diff), ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.text((top_left.0, top_left.1 + i as TermInt + 1), &padded_line);
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: TermCoords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }
}

fn board_frame_size(board_width: Coord, board_height: Coord) -> FrameSize {
    let cols = (board_width.max(0) as u32).saturating_mul(CELL_WIDTH as u32).saturating_add(2);
    let rows = (board_height.max(0) as u32).saturating_add(2);
    (cols, rows)
}

fn sidebar_height() -> u32 {
    // title, blank, four stats, blank, state, blank, help
    9 + HELP_LINES.len() as u32
}

/// Smallest terminal that fits the board frame and the sidebar.
pub fn required_size(board_width: Coord, board_height: Coord) -> FrameSize {
    let (frame_w, frame_h) = board_frame_size(board_width, board_height);
    let cols = frame_w.saturating_add((SIDEBAR_GAP + SIDEBAR_WIDTH) as u32);
    (cols, frame_h.max(sidebar_height()))
}

pub fn fits(terminal: TermCoords, needed: FrameSize) -> bool {
    terminal.0 as u32 >= needed.0 && terminal.1 as u32 >= needed.1
}

fn clamp_to_term(v: u32) -> TermInt {
    TermInt::try_from(v).unwrap_or(TermInt::MAX)
}

/// `None` for cells that cannot be addressed on any terminal.
fn cell_pos(cell: Cell) -> Option<TermCoords> {
    let x = u32::try_from(cell.0).ok()?.checked_mul(CELL_WIDTH as u32)?.checked_add(1)?;
    let y = u32::try_from(cell.1).ok()?.checked_add(1)?;
    Some((TermInt::try_from(x).ok()?, TermInt::try_from(y).ok()?))
}

fn put_cell(canvas: &mut Canvas, cell: Cell, glyph: [char; 2]) {
    if let Some((x, y)) = cell_pos(cell) {
        canvas.put((x, y), glyph[0]);
        canvas.put((x.saturating_add(1), y), glyph[1]);
    }
}

/// Composes a full frame for `snap` on a canvas of the given size.
pub fn render(snap: &GameSnapshot, size: TermCoords) -> Canvas {
    let mut canvas = Canvas::new(size.0, size.1);
    let (frame_w, frame_h) = board_frame_size(snap.width, snap.height);
    let (frame_w, frame_h) = (clamp_to_term(frame_w), clamp_to_term(frame_h));

    canvas.draw_border((0, 0), frame_w, frame_h);

    let crashed = matches!(snap.outcome, Some(outcome) if !outcome.is_win());

    if let Some(food) = snap.food {
        put_cell(&mut canvas, food, APPLE);
    }

    for (i, &cell) in snap.snake.iter().enumerate().rev() {
        let glyph = match (crashed, i, snap.heading) {
            (true, _, _) => DEAD_SNAKE,
            (false, 0, Some(heading)) => [heading.head_char(), heading.head_char()],
            _ => SNAKE_BODY,
        };
        put_cell(&mut canvas, cell, glyph);
    }

    draw_sidebar(&mut canvas, snap, frame_w.saturating_add(SIDEBAR_GAP));

    let center = (frame_w / 2, frame_h / 2);
    let score_line = format!("Score: {}", snap.score);
    match snap.state {
        RunState::Ready => canvas.show_message(center, &[
            "Arrow keys or WASD to move",
            "P or Space to pause",
            "Q or Ctrl+C to quit",
            "",
            "Press Enter to begin",
        ]),
        RunState::Paused => canvas.show_message(center, &[
            "Paused",
            "Press P or Enter to resume",
            "or Q to quit",
        ]),
        RunState::GameOver => {
            let won = snap.outcome.map_or(false, |o| o.is_win());
            canvas.show_message(center, &[
                if won {"You won!"} else {"Game over!"},
                score_line.as_str(),
                "",
                "Press Enter to play again,",
                "or Q to quit.",
            ])
        }
        RunState::Running => {}
    }

    canvas
}

fn draw_sidebar(canvas: &mut Canvas, snap: &GameSnapshot, x: TermInt) {
    let moves_per_sec = 1.0 / snap.tick_interval.as_secs_f64().max(f64::EPSILON);
    let state = match snap.state {
        RunState::Ready => "READY",
        RunState::Running => "PLAYING",
        RunState::Paused => "PAUSED",
        RunState::GameOver => "GAME OVER",
    };

    let mut lines = vec![
        "SNEK".to_string(),
        String::new(),
        format!("Score   {}", snap.score),
        format!("Length  {}", snap.snake.len()),
        format!("Level   {}", snap.level),
        format!("Speed   {:.1}/s", moves_per_sec),
        String::new(),
        state.to_string(),
        String::new(),
    ];
    lines.extend(HELP_LINES.iter().map(|l| l.to_string()));

    for (i, line) in lines.iter().enumerate() {
        canvas.text((x, i as TermInt), line);
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    last_frame: Option<Canvas>,
}

impl TermManager {
    pub fn new() -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout(), last_frame: None })
    }

    pub fn get_terminal_size(&self) -> TermCoords {
        (self.width, self.height)
    }

    pub fn fits(&self, needed: FrameSize) -> bool {
        fits((self.width, self.height), needed)
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, LeaveAlternateScreen)
    }

    /// Renders `snap` and writes the rows that changed since the last frame.
    pub fn draw(&mut self, snap: &GameSnapshot) -> crossterm::Result<()> {
        let frame = render(snap, (self.width, self.height));

        for y in 0..self.height {
            let row = frame.row(y);
            let unchanged = self.last_frame.as_ref().map_or(false, |last| last.row(y) == row);
            if !unchanged {
                queue!(self.stdout, cursor::MoveTo(0, y), style::Print(row))?;
            }
        }

        self.stdout.flush()?;
        self.last_frame = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::{Engine, Outcome};
    use crate::snake::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn snapshot(state: RunState) -> GameSnapshot {
        GameSnapshot {
            state,
            snake: vec![(3, 2), (2, 2), (1, 2)],
            heading: Some(Direction::Right),
            food: Some((0, 0)),
            score: 7,
            level: 2,
            width: 10,
            height: 5,
            ticks: 12,
            tick_interval: Duration::from_millis(100),
            outcome: None,
        }
    }

    fn frame(board_width: Coord, board_height: Coord) -> TermCoords {
        let (cols, rows) = required_size(board_width, board_height);
        (clamp_to_term(cols), clamp_to_term(rows))
    }

    fn contains_text(canvas: &Canvas, needle: &str) -> bool {
        (0..canvas.size().1).any(|y| canvas.row(y).contains(needle))
    }

    #[test]
    fn required_size_covers_board_and_sidebar() {
        let sidebar = (SIDEBAR_GAP + SIDEBAR_WIDTH) as u32;
        assert_eq!(required_size(20, 10), (42 + sidebar, 14));
        assert_eq!(required_size(10, 30), (22 + sidebar, 32));
    }

    #[test]
    fn oversized_boards_never_fit() {
        let largest = (TermInt::MAX, TermInt::MAX);

        let wide = required_size(40_000, 10);
        assert!(wide.0 > TermInt::MAX as u32);
        assert!(!fits(largest, wide));

        assert!(!fits(largest, required_size(70_000, 10)));
        assert!(!fits(largest, required_size(10, 70_000)));
        assert!(!fits(largest, required_size(Coord::MAX, Coord::MAX)));
        assert!(fits((80, 24), required_size(20, 10)));
    }

    #[test]
    fn unaddressable_cells_are_skipped() {
        assert_eq!(cell_pos((3, 2)), Some((7, 3)));
        assert_eq!(cell_pos((40_000, 0)), None);
        assert_eq!(cell_pos((-1, 0)), None);

        let mut snap = snapshot(RunState::Running);
        snap.width = 70_000;
        snap.food = Some((65_000, 0));
        let canvas = render(&snap, (80, 24));
        assert_eq!(canvas.get((0, 0)), Some('+'));
    }

    #[test]
    fn running_frame_shows_snake_food_and_stats() {
        let size = frame(10, 5);
        let canvas = render(&snapshot(RunState::Running), size);

        assert_eq!(canvas.get((0, 0)), Some('+'));
        assert_eq!(canvas.get((21, 6)), Some('+'));
        assert_eq!(canvas.get((1, 1)), Some('('));
        assert_eq!(canvas.get((7, 3)), Some('>'));
        assert_eq!(canvas.get((5, 3)), Some('█'));
        assert!(contains_text(&canvas, "Score   7"));
        assert!(contains_text(&canvas, "Length  3"));
        assert!(contains_text(&canvas, "Speed   10.0/s"));
        assert!(contains_text(&canvas, "PLAYING"));
    }

    #[test]
    fn crashed_snake_is_crossed_out() {
        let mut snap = snapshot(RunState::GameOver);
        snap.outcome = Some(Outcome::HitWall);
        let canvas = render(&snap, frame(10, 5));

        assert!(contains_text(&canvas, "Game over!"));
        assert!(contains_text(&canvas, "Score: 7"));
        assert!(!contains_text(&canvas, ">>"));
    }

    #[test]
    fn filled_board_is_announced_as_a_win() {
        let mut snap = snapshot(RunState::GameOver);
        snap.outcome = Some(Outcome::BoardFilled);
        let canvas = render(&snap, frame(10, 5));

        assert!(contains_text(&canvas, "You won!"));
    }

    #[test]
    fn ready_and_paused_frames_carry_a_message() {
        let engine = Engine::new(GameConfig::default(), StdRng::seed_from_u64(0)).unwrap();
        let size = frame(engine.board().width(), engine.board().height());

        let ready = render(&engine.snapshot(), size);
        assert!(contains_text(&ready, "Press Enter to begin"));

        let paused = render(&snapshot(RunState::Paused), frame(10, 5));
        assert!(contains_text(&paused, "Paused"));
    }

    #[test]
    fn message_box_is_clipped_to_the_canvas() {
        let mut canvas = Canvas::new(6, 3);
        canvas.show_message((3, 1), &["a much longer line than fits"]);

        assert_eq!(canvas.row(1).chars().count(), 6);
    }
}
