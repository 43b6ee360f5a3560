use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{Board, COLUMNS, TickReport};
use crate::column_order::ColumnOrder;
use crate::error::GameError;
use crate::planner::CpuController;
use crate::random::RandomSource;
use crate::settings::{BoardTuning, Difficulty};
use crate::timer::GameClock;

pub const START_COLUMN: usize = 1;
pub const MAX_CURSOR: usize = COLUMNS - 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Down,
    Space,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Pressed,
    Released,
}

/// A discrete key transition from the input collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct KeyEdge {
    pub key: Key,
    pub edge: EdgeKind,
}

impl KeyEdge {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            edge: EdgeKind::Pressed,
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            edge: EdgeKind::Released,
        }
    }

    /// Press and release, the usual tap.
    pub fn tap(key: Key) -> [Self; 2] {
        [Self::pressed(key), Self::released(key)]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub score: u32,
    pub yoshis: u32,
    pub matches: u32,
    pub clock: GameClock,
}

impl PlayerStats {
    pub fn new(clock: GameClock) -> Self {
        Self {
            score: 0,
            yoshis: 0,
            matches: 0,
            clock,
        }
    }
}

/// Everything one player owns: the board, its column order, the swap cursor and stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    board: Board,
    order: ColumnOrder,
    cursor: usize,
    stats: PlayerStats,
}

impl Seat {
    pub fn new(difficulty: Difficulty, tuning: BoardTuning, clock: GameClock) -> Self {
        Self {
            board: Board::new(difficulty, tuning),
            order: ColumnOrder::default(),
            cursor: START_COLUMN,
            stats: PlayerStats::new(clock),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn order(&self) -> &ColumnOrder {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(MAX_CURSOR);
    }

    pub fn move_left(&mut self) {
        self.set_cursor(self.cursor.saturating_sub(1));
    }

    pub fn move_right(&mut self) {
        self.set_cursor(self.cursor + 1);
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }

    /// Swap the two columns under the cursor. The column order flips together with the
    /// board, before the pieces have visually moved.
    pub fn switch_columns(&mut self) -> Result<bool, GameError> {
        if !self.board.swap_columns(self.cursor) {
            return Ok(false);
        }
        self.order.swap(self.cursor)?;
        Ok(true)
    }

    pub fn force_gravity(&mut self) -> bool {
        self.board.apply_gravity()
    }

    /// Run one board tick and the player's clock.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        dt: Duration,
        rng: &mut R,
    ) -> Result<TickReport, GameError> {
        let report = self.board.tick(dt, rng)?;
        self.stats.clock.tick(dt);
        Ok(report)
    }
}

/// Keyboard-driven player. Edges queue up and at most one acts per tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HumanController {
    queue: VecDeque<KeyEdge>,
}

impl HumanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        seat: &mut Seat,
        dt: Duration,
        rng: &mut R,
        keys: &[KeyEdge],
    ) -> Result<TickReport, GameError> {
        let report = seat.advance(dt, rng)?;
        self.queue.extend(keys.iter().copied());
        self.handle_next(seat)?;
        Ok(report)
    }

    fn handle_next(&mut self, seat: &mut Seat) -> Result<(), GameError> {
        while let Some(edge) = self.queue.pop_front() {
            match (edge.key, edge.edge) {
                (Key::Left, EdgeKind::Released) => seat.move_left(),
                (Key::Right, EdgeKind::Released) => seat.move_right(),
                (Key::Down, EdgeKind::Pressed) => {
                    seat.force_gravity();
                }
                (Key::Space, EdgeKind::Released) => {
                    seat.switch_columns()?;
                }
                _ => continue,
            }
            break;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerController {
    Human(HumanController),
    Cpu(CpuController),
}

impl PlayerController {
    pub fn is_cpu(&self) -> bool {
        matches!(self, PlayerController::Cpu(_))
    }

    /// Drive the seat for one tick. `None` when the controller sat the tick out.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        seat: &mut Seat,
        dt: Duration,
        rng: &mut R,
        keys: &[KeyEdge],
    ) -> Result<Option<TickReport>, GameError> {
        match self {
            PlayerController::Human(human) => human.update(seat, dt, rng, keys).map(Some),
            PlayerController::Cpu(cpu) => cpu.update(seat, dt, rng),
        }
    }
}
