//! Terminal presentation layer: draws the session state and turns raw
//! crossterm events into game actions. All game rules live in `session`;
//! this module only renders and translates input.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::puzzle::{Move, Tile, EMPTY, GRID_SIZE};
use crate::scores::{BestScore, Difficulty};
use crate::session::{Phase, Session};

const BOARD_LEFT: u16 = 2;
const BOARD_TOP: u16 = 3;
// Cell footprint on screen; the last column/row of each cell is a gap.
const TILE_W: u16 = 7;
const TILE_H: u16 = 3;

const BOARD_COLS: u16 = GRID_SIZE as u16 * TILE_W;
const BOARD_ROWS: u16 = GRID_SIZE as u16 * TILE_H;

/// Everything the player can ask for, one variant per input gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Slide(Move),
    Activate(usize),
    TogglePause,
    Restart,
    CycleDifficulty,
    Quit,
}

/// Translate a terminal event into a game action. Unbound events map to
/// nothing.
pub fn map_event(event: &Event) -> Option<Action> {
    match event {
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => match code {
            KeyCode::Up => Some(Action::Slide(Move::Up)),
            KeyCode::Down => Some(Action::Slide(Move::Down)),
            KeyCode::Left => Some(Action::Slide(Move::Left)),
            KeyCode::Right => Some(Action::Slide(Move::Right)),
            KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePause),
            KeyCode::Char('r') => Some(Action::Restart),
            KeyCode::Char('d') => Some(Action::CycleDifficulty),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => tile_at(*column, *row).map(Action::Activate),
        _ => None,
    }
}

/// Map a terminal coordinate to the tile cell under it, if any.
pub fn tile_at(column: u16, row: u16) -> Option<usize> {
    if column < BOARD_LEFT || row < BOARD_TOP {
        return None;
    }
    let col = ((column - BOARD_LEFT) / TILE_W) as usize;
    let grid_row = ((row - BOARD_TOP) / TILE_H) as usize;
    if col >= GRID_SIZE || grid_row >= GRID_SIZE {
        return None;
    }
    Some(grid_row * GRID_SIZE + col)
}

fn stats_line(session: &Session) -> String {
    format!("moves: {}   time: {}s", session.moves(), session.seconds())
}

fn best_line(tier: Difficulty, best: BestScore) -> String {
    match (best.moves, best.time) {
        (Some(moves), Some(time)) => {
            format!("difficulty: {}   best: {} moves / {}s", tier.label(), moves, time)
        }
        _ => format!("difficulty: {}   best: none yet", tier.label()),
    }
}

/// Raw-mode terminal session. `init` and `restore` bracket the run loop;
/// the caller makes sure `restore` runs on every exit path.
pub struct Screen {
    out: Stdout,
}

impl Screen {
    pub fn new() -> Self {
        Screen { out: io::stdout() }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, EnableMouseCapture, Hide)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, Show, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Redraw the whole frame from the current state. The board is small
    /// enough that diffing would buy nothing.
    pub fn draw(&mut self, session: &Session, tier: Difficulty, best: BestScore) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;

        queue!(
            self.out,
            MoveTo(BOARD_LEFT, 0),
            SetAttribute(Attribute::Bold),
            Print("fifteen"),
            SetAttribute(Attribute::Reset),
            MoveTo(BOARD_LEFT, 1),
            Print(stats_line(session))
        )?;

        self.draw_board(session.tiles())?;

        queue!(
            self.out,
            MoveTo(BOARD_LEFT, BOARD_TOP + BOARD_ROWS),
            Print(best_line(tier, best)),
            MoveTo(BOARD_LEFT, BOARD_TOP + BOARD_ROWS + 1),
            SetForegroundColor(Color::DarkGrey),
            Print("arrows slide   click moves a tile   p pause   r restart   d difficulty   q quit"),
            ResetColor
        )?;

        match session.phase() {
            Phase::Over => {
                let summary = format!(
                    "Solved in {} moves and {} seconds.",
                    session.moves(),
                    session.seconds()
                );
                self.draw_overlay(&["You win!", &summary, "Press r to play again."])?;
            }
            Phase::Paused => {
                self.draw_overlay(&["Game paused", "Press p to resume."])?;
            }
            _ => {}
        }

        self.out.flush()
    }

    fn draw_board(&mut self, tiles: &[Tile]) -> io::Result<()> {
        for (index, &tile) in tiles.iter().enumerate() {
            let col = (index % GRID_SIZE) as u16;
            let row = (index / GRID_SIZE) as u16;
            let x = BOARD_LEFT + col * TILE_W;
            let y = BOARD_TOP + row * TILE_H;

            if tile == EMPTY {
                continue;
            }

            let width = (TILE_W - 1) as usize;
            let label = format!("{:^width$}", tile);
            queue!(
                self.out,
                SetForegroundColor(Color::Black),
                SetBackgroundColor(Color::Cyan),
                MoveTo(x, y),
                Print(" ".repeat(width)),
                MoveTo(x, y + 1),
                Print(label),
                ResetColor
            )?;
        }
        Ok(())
    }

    /// A centered message box layered over the board.
    fn draw_overlay(&mut self, lines: &[&str]) -> io::Result<()> {
        let inner = lines.iter().map(|line| line.len()).max().unwrap_or(0);
        let box_w = inner as u16 + 4;
        let box_h = lines.len() as u16 + 2;
        let x = BOARD_LEFT + BOARD_COLS.saturating_sub(box_w) / 2;
        let y = BOARD_TOP + BOARD_ROWS.saturating_sub(box_h) / 2;

        queue!(
            self.out,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Color::DarkBlue)
        )?;
        for line in 0..box_h {
            queue!(
                self.out,
                MoveTo(x, y + line),
                Print(" ".repeat(box_w as usize))
            )?;
        }
        for (i, line) in lines.iter().enumerate() {
            let text = format!("{:^inner$}", line);
            queue!(self.out, MoveTo(x + 2, y + 1 + i as u16), Print(text))?;
        }
        queue!(self.out, ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn arrows_become_directional_requests() {
        assert_eq!(map_event(&key(KeyCode::Up)), Some(Action::Slide(Move::Up)));
        assert_eq!(
            map_event(&key(KeyCode::Right)),
            Some(Action::Slide(Move::Right))
        );
    }

    #[test]
    fn control_keys_map_to_their_actions() {
        assert_eq!(map_event(&key(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(
            map_event(&key(KeyCode::Char('p'))),
            Some(Action::TogglePause)
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('d'))),
            Some(Action::CycleDifficulty)
        );
        assert_eq!(map_event(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            map_event(&Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(Action::Quit)
        );
        assert_eq!(map_event(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn clicks_inside_the_board_activate_tiles() {
        // Top-left cell.
        assert_eq!(map_event(&click(BOARD_LEFT, BOARD_TOP)), Some(Action::Activate(0)));
        // Second column, third row.
        assert_eq!(
            map_event(&click(BOARD_LEFT + TILE_W, BOARD_TOP + 2 * TILE_H)),
            Some(Action::Activate(9))
        );
        // Bottom-right corner of the last cell.
        assert_eq!(
            map_event(&click(
                BOARD_LEFT + 4 * TILE_W - 1,
                BOARD_TOP + 4 * TILE_H - 1
            )),
            Some(Action::Activate(15))
        );
    }

    #[test]
    fn clicks_outside_the_board_do_nothing() {
        assert_eq!(map_event(&click(0, 0)), None);
        assert_eq!(map_event(&click(BOARD_LEFT + 4 * TILE_W, BOARD_TOP)), None);
        assert_eq!(map_event(&click(BOARD_LEFT, BOARD_TOP + 4 * TILE_H)), None);
    }

    #[test]
    fn best_line_spells_out_the_record() {
        let best = BestScore {
            moves: Some(35),
            time: Some(100),
        };
        assert_eq!(
            best_line(Difficulty::Medium, best),
            "difficulty: medium   best: 35 moves / 100s"
        );
        assert_eq!(
            best_line(Difficulty::Hard, BestScore::default()),
            "difficulty: hard   best: none yet"
        );
    }
}
