use rand::thread_rng;

use crate::puzzle::{self, Move, Tile, GRID_SIZE, TILE_COUNT};

/// Lifecycle stage of one puzzle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Started,
    Paused,
    Over,
}

/// What a tile activation did, for the caller to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed: wrong phase, out-of-range index, or a tile that is
    /// not next to the empty slot.
    Ignored,
    Moved,
    /// The move completed the puzzle; the result goes to the score tracker.
    Solved { moves: u32, seconds: u64 },
}

/// Registration guard for the repeating one-second tick. The session never
/// schedules anything itself; the runtime watches `is_live` and delivers
/// `tick` calls. At most one registration exists, and starting while live
/// is a no-op.
#[derive(Debug, Default)]
struct TickGuard {
    live: bool,
}

impl TickGuard {
    fn start(&mut self) {
        if self.live {
            return;
        }
        self.live = true;
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// One puzzle session: the tile grid, move counter, clock, and phase. All
/// mutation happens through the methods below, synchronously on the calling
/// thread.
pub struct Session {
    tiles: Vec<Tile>,
    moves: u32,
    seconds: u64,
    phase: Phase,
    tick: TickGuard,
}

impl Session {
    pub fn new() -> Self {
        Self::with_grid(puzzle::generate_solvable(GRID_SIZE, &mut thread_rng()))
    }

    /// Start from a known layout. Tests use this; the game always starts
    /// from a generated grid.
    pub fn with_grid(tiles: Vec<Tile>) -> Self {
        Session {
            tiles,
            moves: 0,
            seconds: 0,
            phase: Phase::Idle,
            tick: TickGuard::default(),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the runtime should be delivering one-second ticks.
    pub fn timer_live(&self) -> bool {
        self.tick.is_live()
    }

    /// Activate the tile at `index`. Only a tile next to the empty slot
    /// moves; everything else is silently ignored. The first accepted move
    /// starts the game and its clock.
    pub fn click_tile(&mut self, index: usize) -> MoveOutcome {
        if matches!(self.phase, Phase::Over | Phase::Paused) {
            return MoveOutcome::Ignored;
        }
        if index >= TILE_COUNT {
            return MoveOutcome::Ignored;
        }

        let empty = puzzle::empty_index(&self.tiles);
        if !puzzle::are_neighbours(empty, index, GRID_SIZE) {
            return MoveOutcome::Ignored;
        }

        self.tiles = puzzle::swap_elements(&self.tiles, empty, index);
        self.moves += 1;

        if self.phase == Phase::Idle {
            self.phase = Phase::Started;
            self.tick.start();
        }

        if puzzle::is_solved(&self.tiles) {
            self.tick.stop();
            self.phase = Phase::Over;
            tracing::debug!(moves = self.moves, seconds = self.seconds, "grid solved");
            return MoveOutcome::Solved {
                moves: self.moves,
                seconds: self.seconds,
            };
        }

        MoveOutcome::Moved
    }

    /// Resolve a directional request to the tile that would slide into the
    /// empty slot from that side, then dispatch it through `click_tile`.
    /// Requests past a grid edge are ignored.
    pub fn slide(&mut self, direction: Move) -> MoveOutcome {
        if matches!(self.phase, Phase::Over | Phase::Paused) {
            return MoveOutcome::Ignored;
        }

        let empty = puzzle::empty_index(&self.tiles);
        let row = (empty / GRID_SIZE) as isize;
        let col = (empty % GRID_SIZE) as isize;
        let (dr, dc) = direction.as_offset();
        let (tile_row, tile_col) = (row + dr, col + dc);

        if tile_row < 0
            || tile_row >= GRID_SIZE as isize
            || tile_col < 0
            || tile_col >= GRID_SIZE as isize
        {
            return MoveOutcome::Ignored;
        }

        self.click_tile((tile_row * GRID_SIZE as isize + tile_col) as usize)
    }

    /// One second of elapsed play. Counts only while the game is running
    /// and the tick registration is live.
    pub fn tick(&mut self) {
        if self.phase == Phase::Started && self.tick.is_live() {
            self.seconds += 1;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Started {
            self.phase = Phase::Paused;
            self.tick.stop();
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Started;
            self.tick.start();
        }
    }

    /// Back to a fresh solvable grid with zeroed counters. Always stops the
    /// tick registration first.
    pub fn reset(&mut self) {
        self.tick.stop();
        self.tiles = puzzle::generate_solvable(GRID_SIZE, &mut thread_rng());
        self.moves = 0;
        self.seconds = 0;
        self.phase = Phase::Idle;
    }

    /// Session teardown: release the tick registration.
    pub fn shutdown(&mut self) {
        self.tick.stop();
    }
}
