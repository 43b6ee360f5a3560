use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::timer::millis;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Goomba,
    Squid,
    Boo,
    Plant,
    ShellTop,
    ShellBottom,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Goomba,
        PieceKind::Squid,
        PieceKind::Boo,
        PieceKind::Plant,
        PieceKind::ShellTop,
        PieceKind::ShellBottom,
    ];

    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::UnknownPieceType(index))
    }

    pub fn index(self) -> usize {
        match self {
            PieceKind::Goomba => 0,
            PieceKind::Squid => 1,
            PieceKind::Boo => 2,
            PieceKind::Plant => 3,
            PieceKind::ShellTop => 4,
            PieceKind::ShellBottom => 5,
        }
    }
}

/// Handle to a piece on one board. Ids are handed out in increasing order and never
/// reused, so a held id of a removed piece stays dead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PieceId(pub u32);

/// Hatch size for a finished yoshi.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum YoshiTier {
    Tiny,
    Small,
    Medium,
    Large,
}

impl YoshiTier {
    pub fn from_size(size: usize) -> Self {
        match size {
            0..=2 => YoshiTier::Tiny,
            3..=6 => YoshiTier::Small,
            7..=8 => YoshiTier::Medium,
            _ => YoshiTier::Large,
        }
    }
}

/// A one-shot terminal animation (destroy or hatch).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Animation {
    #[serde(with = "millis")]
    pub elapsed: Duration,
    #[serde(with = "millis")]
    pub duration: Duration,
}

impl Animation {
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Per-cell state.
///
/// Vertical position is kept in half rows (`half_row / 2` is the row). A piece is only
/// ever placed on an even half row. Horizontal position is the physical column; while a
/// column swap is in flight `target_column` differs and `swap_progress` tracks how far
/// along the piece is, in swap units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub column: usize,
    pub target_column: usize,
    pub swap_progress: u32,
    pub half_row: usize,
    pub frozen: bool,
    pub placed: bool,
    pub destroyed: bool,
    pub yoshi: bool,
    pub yoshi_size: usize,
    pub animation: Option<Animation>,
}

impl Piece {
    /// Freshly spawned piece: row 0, frozen until released.
    pub fn spawned(kind: PieceKind, column: usize) -> Self {
        Self {
            kind,
            column,
            target_column: column,
            swap_progress: 0,
            half_row: 0,
            frozen: true,
            placed: false,
            destroyed: false,
            yoshi: false,
            yoshi_size: 0,
            animation: None,
        }
    }

    pub fn placed_at(kind: PieceKind, column: usize, row: usize) -> Self {
        Self {
            half_row: row * 2,
            frozen: false,
            placed: true,
            ..Self::spawned(kind, column)
        }
    }

    pub fn row(&self) -> usize {
        self.half_row / 2
    }

    /// True when the piece sits exactly on a row boundary.
    pub fn is_on_row(&self) -> bool {
        self.half_row % 2 == 0
    }

    /// Moving under gravity: neither frozen nor placed.
    pub fn is_falling(&self) -> bool {
        !self.frozen && !self.placed
    }

    pub fn has_target_column(&self) -> bool {
        self.column == self.target_column
    }

    pub fn begin_swap(&mut self, target_column: usize) {
        self.target_column = target_column;
        self.swap_progress = 0;
    }

    /// Advance toward `target_column`. Returns true when the piece arrived this call.
    pub fn advance_swap(&mut self, rate: u32, span: u32) -> bool {
        if self.has_target_column() {
            return false;
        }
        let remaining = span.saturating_sub(self.swap_progress);
        if remaining <= rate {
            self.column = self.target_column;
            self.swap_progress = 0;
            true
        } else {
            self.swap_progress += rate;
            false
        }
    }

    pub fn mark_destroyed(&mut self, duration: Duration) {
        self.destroyed = true;
        self.animation = Some(Animation::new(duration));
    }
}
