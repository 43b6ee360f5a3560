//! CPU opponent.
//!
//! Once per falling generation the planner scores every (falling piece, column) pair,
//! commits to the two best non-conflicting targets and then walks the column order
//! toward them one cursor step or swap at a time, paced by a difficulty-scaled timer.

use std::time::Duration;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Board, COLUMNS, TickReport};
use crate::column_order::ColumnOrder;
use crate::error::GameError;
use crate::piece::PieceKind;
use crate::player::{MAX_CURSOR, Seat};
use crate::random::RandomSource;
use crate::settings::{Difficulty, PlannerWeights};
use crate::timer::Timer;

pub const FALLING_PIECE_COUNT: usize = 2;

/// Bring stack `source` to physical position `destination_index`, under a falling piece.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    /// Stack currently under the falling piece.
    pub destination: usize,
    /// Physical column of the falling piece.
    pub destination_index: usize,
    /// Stack the piece should land on.
    pub source: usize,
    /// Last known position of `source`; refreshed from the live order before each move.
    pub source_index: usize,
    pub score: i32,
}

impl Target {
    pub fn conflicts_with(&self, other: &Target) -> bool {
        self.destination == other.destination || self.source == other.source
    }

    pub fn is_satisfied(&self, order: &ColumnOrder) -> Result<bool, GameError> {
        Ok(order.index_of(self.source)? == self.destination_index)
    }
}

/// Desirability of dropping a `kind` piece onto physical `column`.
pub fn score_column(board: &Board, kind: PieceKind, column: usize, weights: &PlannerWeights) -> i32 {
    let height = board.column_height(column) as i32;
    match kind {
        PieceKind::ShellTop => {
            let depth = board.bottom_shell_depth(column) as i32;
            weights.yoshi_piece * depth + weights.height_reward * height
        }
        PieceKind::ShellBottom => weights.bottom_shell_height * height,
        _ => match board.top_piece(column) {
            None => 0,
            Some(top) if top.kind == kind => weights.piece_match,
            Some(_) => {
                // pieces down to a bottom shell pay extra on top of the height penalty
                let depth = board.bottom_shell_depth(column) as i32;
                weights.piece_height * height + weights.shell_depth_penalty * depth
            }
        },
    }
}

/// Score every falling piece against every column and pick two targets that share
/// neither a destination nor a source.
///
/// `Ok(None)` while there is nothing to plan for (no falling pieces yet, or a swap
/// still sliding).
pub fn locate_targets(
    seat: &Seat,
    weights: &PlannerWeights,
) -> Result<Option<[Target; 2]>, GameError> {
    let board = seat.board();
    let falling = board.falling_pieces();
    if falling.is_empty() || board.is_swapping() {
        return Ok(None);
    }
    if falling.len() != FALLING_PIECE_COUNT {
        return Err(GameError::FallingPieceCount {
            expected: FALLING_PIECE_COUNT,
            found: falling.len(),
        });
    }

    let order = seat.order();
    let mut candidates = Vec::with_capacity(FALLING_PIECE_COUNT * COLUMNS);
    for id in falling {
        let Some(piece) = board.piece(id) else {
            continue;
        };
        for column in 0..COLUMNS {
            candidates.push(Target {
                destination: order.stack_at(piece.column)?,
                destination_index: piece.column,
                source: order.stack_at(column)?,
                source_index: column,
                score: score_column(board, piece.kind, column, weights),
            });
        }
    }

    // stable: equal scores keep piece-then-column order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let Some(&first) = candidates.first() else {
        return Ok(None);
    };
    let second = candidates
        .iter()
        .skip(1)
        .find(|t| !first.conflicts_with(t))
        .copied();

    Ok(second.map(|second| [first, second]))
}

/// The cursor index to head for next, given both targets' live positions.
///
/// Relative order is fixed first: if the two source stacks sit on the wrong sides of
/// each other (or one blocks the other's path), the blocking pair is swapped. Only then
/// is each source walked to its destination, target two first.
pub fn next_move_index(order: &ColumnOrder, targets: &[Target; 2]) -> Result<usize, GameError> {
    let [t1, t2] = targets;
    let (d1, d2) = (t1.destination_index, t2.destination_index);
    let c1 = order.index_of(t1.source)?;
    let c2 = order.index_of(t2.source)?;
    let left_of = |index: usize| index.checked_sub(1).ok_or(GameError::NoValidMove);

    let index = if d2 > d1 && c2 < c1 {
        c2
    } else if d2 < d1 && c2 > c1 {
        left_of(c2)?
    } else if d1 > d2 && c1 < c2 {
        c1
    } else if d1 < d2 && c1 > c2 {
        left_of(c1)?
    } else if d2 > d1 && c2 > c1 && c1 >= d2 {
        left_of(c1)?
    } else if d2 < d1 && c2 < c1 && c1 <= d2 {
        c1
    } else if d1 > d2 && c1 > c2 && c2 >= d1 {
        left_of(c2)?
    } else if d1 < d2 && c1 < c2 && c2 <= d1 {
        c2
    } else if c2 < d2 {
        c2
    } else if c2 > d2 {
        left_of(c2)?
    } else if c1 < d1 {
        c1
    } else if c1 > d1 {
        left_of(c1)?
    } else {
        return Err(GameError::NoValidMove);
    };

    if index > MAX_CURSOR {
        return Err(GameError::NoValidMove);
    }
    Ok(index)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CpuAction {
    MoveLeft,
    MoveRight,
    Swap,
    ForceGravity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CpuController {
    weights: PlannerWeights,
    move_timer: Timer,
    targets: Option<[Target; 2]>,
    last_action: Option<CpuAction>,
}

impl CpuController {
    pub fn new(difficulty: Difficulty, weights: PlannerWeights) -> Self {
        Self {
            weights,
            move_timer: Timer::new(weights.move_delay(difficulty)),
            targets: None,
            last_action: None,
        }
    }

    pub fn targets(&self) -> Option<&[Target; 2]> {
        self.targets.as_ref()
    }

    pub fn last_action(&self) -> Option<CpuAction> {
        self.last_action
    }

    pub fn targets_satisfied(&self, order: &ColumnOrder) -> Result<bool, GameError> {
        let Some([t1, t2]) = &self.targets else {
            return Ok(false);
        };
        Ok(t1.is_satisfied(order)? && t2.is_satisfied(order)?)
    }

    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        seat: &mut Seat,
        dt: Duration,
        rng: &mut R,
    ) -> Result<Option<TickReport>, GameError> {
        if seat.board().has_lost() {
            return Ok(None);
        }

        let falling_before = seat.board().has_falling();
        let report = seat.advance(dt, rng)?;
        let falling_after = seat.board().has_falling();

        if self.targets.is_none() {
            self.targets = locate_targets(seat, &self.weights)?;
            if let Some([t1, t2]) = &self.targets {
                debug!(
                    "cpu targets: stack {} -> {} ({}), stack {} -> {} ({})",
                    t1.source, t1.destination_index, t1.score, t2.source, t2.destination_index, t2.score
                );
            }
        } else if falling_before && falling_after {
            if !self.targets_satisfied(seat.order())? {
                self.move_timer.tick(dt);
                if self.move_timer.is_up() && !seat.board().is_swapping() {
                    self.move_timer.reset();
                    self.place_targets(seat)?;
                }
            } else if seat.force_gravity() {
                self.last_action = Some(CpuAction::ForceGravity);
            }
        } else {
            self.targets = None;
        }

        Ok(Some(report))
    }

    fn place_targets(&mut self, seat: &mut Seat) -> Result<(), GameError> {
        let Some(targets) = self.targets.as_mut() else {
            return Ok(());
        };
        for target in targets.iter_mut() {
            target.source_index = seat.order().index_of(target.source)?;
        }
        let index = next_move_index(seat.order(), targets)?;

        let action = if seat.cursor() < index {
            seat.move_right();
            CpuAction::MoveRight
        } else if seat.cursor() > index {
            seat.move_left();
            CpuAction::MoveLeft
        } else {
            seat.switch_columns()?;
            CpuAction::Swap
        };
        trace!("cpu {action:?} toward index {index}, cursor now {}", seat.cursor());
        self.last_action = Some(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BoardTuning;
    use crate::timer::GameClock;

    fn target(destination_index: usize, source: usize) -> Target {
        Target {
            destination: destination_index,
            destination_index,
            source,
            source_index: source,
            score: 0,
        }
    }

    fn board() -> Board {
        Board::new(Difficulty::Easy, BoardTuning::default())
    }

    #[test]
    fn shell_bottom_prefers_shortest_column() {
        let mut b = board();
        b.insert_placed(PieceKind::Boo, 0, 8);
        b.insert_placed(PieceKind::Boo, 0, 7);
        b.insert_placed(PieceKind::Plant, 1, 8);
        let w = PlannerWeights::default();
        assert_eq!(score_column(&b, PieceKind::ShellBottom, 0, &w), -14);
        assert_eq!(score_column(&b, PieceKind::ShellBottom, 1, &w), -7);
        assert_eq!(score_column(&b, PieceKind::ShellBottom, 2, &w), 0);
    }

    #[test]
    fn regular_piece_scores_match_shell_and_height() {
        let mut b = board();
        b.insert_placed(PieceKind::Squid, 0, 8);
        b.insert_placed(PieceKind::ShellBottom, 1, 8);
        b.insert_placed(PieceKind::Goomba, 1, 7);
        b.insert_placed(PieceKind::Boo, 1, 6);
        b.insert_placed(PieceKind::Plant, 2, 8);
        b.insert_placed(PieceKind::Boo, 2, 7);
        let w = PlannerWeights::default();

        assert_eq!(score_column(&b, PieceKind::Squid, 0, &w), 10);
        // three pieces down to the shell, nothing below it
        assert_eq!(score_column(&b, PieceKind::Squid, 1, &w), -18);
        assert_eq!(score_column(&b, PieceKind::Squid, 2, &w), -10);
        assert_eq!(score_column(&b, PieceKind::Squid, 3, &w), 0);
    }

    #[test]
    fn buried_bottom_shell_scores_below_plain_column() {
        let mut b = board();
        b.insert_placed(PieceKind::ShellBottom, 0, 8);
        b.insert_placed(PieceKind::Goomba, 0, 7);
        b.insert_placed(PieceKind::Plant, 1, 8);
        b.insert_placed(PieceKind::Goomba, 1, 7);
        b.insert_placed(PieceKind::Boo, 2, 8);
        b.insert_placed(PieceKind::Plant, 2, 7);
        b.insert_placed(PieceKind::ShellBottom, 2, 6);
        b.insert_placed(PieceKind::Goomba, 2, 5);
        b.insert_placed(PieceKind::Boo, 3, 8);
        b.insert_placed(PieceKind::Plant, 3, 7);
        b.insert_placed(PieceKind::Boo, 3, 6);
        b.insert_placed(PieceKind::Goomba, 3, 5);
        let w = PlannerWeights::default();

        let shell = score_column(&b, PieceKind::Squid, 0, &w);
        let plain = score_column(&b, PieceKind::Squid, 1, &w);
        assert_eq!(shell, -12);
        assert_eq!(plain, -10);
        assert!(shell < plain);

        let tall_shell = score_column(&b, PieceKind::Squid, 2, &w);
        let tall_plain = score_column(&b, PieceKind::Squid, 3, &w);
        assert!(tall_shell < tall_plain);
    }

    #[test]
    fn shell_top_rewards_depth_above_bottom_shell() {
        let mut b = board();
        b.insert_placed(PieceKind::ShellBottom, 3, 8);
        b.insert_placed(PieceKind::Goomba, 3, 7);
        let w = PlannerWeights::default();
        assert_eq!(score_column(&b, PieceKind::ShellTop, 3, &w), 50 * 2 + 25 * 2);
        assert_eq!(score_column(&b, PieceKind::ShellTop, 0, &w), 0);
    }

    #[test]
    fn walk_moves_target_two_first() {
        let order = ColumnOrder::default();
        // both on the correct side; target two must travel right
        let targets = [target(0, 0), target(3, 1)];
        assert_eq!(next_move_index(&order, &targets), Ok(1));
    }

    #[test]
    fn crossed_targets_are_fixed_before_walking() {
        let order = ColumnOrder::default();
        let targets = [target(3, 0), target(2, 1)];
        assert_eq!(next_move_index(&order, &targets), Ok(0));
    }

    #[test]
    fn satisfied_targets_have_no_move() {
        let order = ColumnOrder::default();
        let targets = [target(0, 0), target(1, 1)];
        assert_eq!(
            next_move_index(&order, &targets),
            Err(GameError::NoValidMove)
        );
    }

    #[test]
    fn locate_rejects_wrong_falling_count() {
        let mut seat = Seat::new(Difficulty::Easy, BoardTuning::default(), GameClock::untimed());
        seat.board_mut().insert_falling(PieceKind::Boo, 0, 2);
        assert_eq!(
            locate_targets(&seat, &PlannerWeights::default()),
            Err(GameError::FallingPieceCount {
                expected: 2,
                found: 1
            })
        );
    }
}
