mod puzzle;
mod scores;
mod session;
mod ui;

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use crate::scores::{Difficulty, DirStore, ScoreStore, ScoreTracker};
use crate::session::{MoveOutcome, Phase, Session};
use crate::ui::{Action, Screen};

const TICK: Duration = Duration::from_secs(1);

/// Where the score record lives: `FIFTEEN_DATA_DIR` wins, then a dotdir in
/// the home directory, then the working directory.
fn data_dir() -> PathBuf {
    if let Some(dir) = env::var_os("FIFTEEN_DATA_DIR") {
        return PathBuf::from(dir);
    }
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".fifteen"),
        None => PathBuf::from("."),
    }
}

fn main() -> io::Result<()> {
    // Silent unless RUST_LOG asks; output goes to stderr so a redirect can
    // capture it without fighting the alternate screen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut tracker = ScoreTracker::load(DirStore::new(data_dir()));
    let mut session = Session::new();
    let mut tier = Difficulty::Medium;

    let mut screen = Screen::new();
    screen.init()?;
    let result = run(&mut screen, &mut session, &mut tracker, &mut tier);
    session.shutdown();
    screen.restore()?;
    result
}

/// The event loop: one thread, one `poll` deadline shared between input and
/// the one-second clock tick.
fn run<S: ScoreStore>(
    screen: &mut Screen,
    session: &mut Session,
    tracker: &mut ScoreTracker<S>,
    tier: &mut Difficulty,
) -> io::Result<()> {
    let mut redraw = true;
    let mut last_tick = Instant::now();

    loop {
        if redraw {
            screen.draw(session, *tier, tracker.best(*tier))?;
            redraw = false;
        }

        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;
            if let Some(action) = ui::map_event(&event) {
                match action {
                    Action::Quit => return Ok(()),
                    Action::Restart => {
                        session.reset();
                        redraw = true;
                    }
                    Action::TogglePause => match session.phase() {
                        Phase::Started => {
                            session.pause();
                            redraw = true;
                        }
                        Phase::Paused => {
                            session.resume();
                            // The paused interval must not count.
                            last_tick = Instant::now();
                            redraw = true;
                        }
                        _ => {}
                    },
                    Action::CycleDifficulty => {
                        *tier = tier.next();
                        redraw = true;
                    }
                    Action::Slide(direction) => {
                        let was_idle = session.phase() == Phase::Idle;
                        let outcome = session.slide(direction);
                        redraw |= settle(outcome, was_idle, &mut last_tick, tracker, *tier);
                    }
                    Action::Activate(index) => {
                        let was_idle = session.phase() == Phase::Idle;
                        let outcome = session.click_tile(index);
                        redraw |= settle(outcome, was_idle, &mut last_tick, tracker, *tier);
                    }
                }
            } else if matches!(event, Event::Resize(..)) {
                redraw = true;
            }
        }

        if last_tick.elapsed() >= TICK {
            last_tick = Instant::now();
            if session.timer_live() {
                session.tick();
                redraw = true;
            }
        }
    }
}

/// Apply a move outcome: align the tick deadline with a game that just
/// started, and hand finished games to the score tracker. Returns whether
/// anything changed on screen.
fn settle<S: ScoreStore>(
    outcome: MoveOutcome,
    was_idle: bool,
    last_tick: &mut Instant,
    tracker: &mut ScoreTracker<S>,
    tier: Difficulty,
) -> bool {
    match outcome {
        MoveOutcome::Ignored => false,
        MoveOutcome::Moved => {
            if was_idle {
                *last_tick = Instant::now();
            }
            true
        }
        MoveOutcome::Solved { moves, seconds } => {
            let improved = tracker.record(tier, moves, seconds);
            tracing::info!(tier = tier.label(), moves, seconds, improved, "game over");
            true
        }
    }
}
