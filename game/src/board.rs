use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::arena::PieceArena;
use crate::error::GameError;
use crate::piece::{Animation, Piece, PieceId, PieceKind, YoshiTier};
use crate::random::RandomSource;
use crate::settings::{BoardTuning, Difficulty};
use crate::timer::Timer;

pub const ROWS: usize = 9;
pub const COLUMNS: usize = 4;
pub const SPAWN_COUNT: usize = 2;

/// The single phase a board tick ran, in priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Spawn,
    Release,
    DestroyPause,
    SwapPause,
    Gravity,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BoardEvent {
    Spawned {
        id: PieceId,
        kind: PieceKind,
        column: usize,
    },
    Released {
        count: usize,
    },
    Placed {
        id: PieceId,
        kind: PieceKind,
        column: usize,
        row: usize,
    },
    Matched {
        kind: PieceKind,
        column: usize,
    },
    ShellTopDiscarded {
        column: usize,
    },
    YoshiFormed {
        size: usize,
    },
    YoshiHatching {
        tier: YoshiTier,
    },
    YoshiCompleted {
        size: usize,
    },
    SwapStarted {
        left: usize,
    },
    SwapFinished,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickReport {
    pub phase: Phase,
    pub events: Vec<BoardEvent>,
}

impl TickReport {
    /// Pieces destroyed by same-kind matches this tick.
    pub fn matched_pieces(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BoardEvent::Matched { .. }))
            .count()
            * 2
    }

    pub fn yoshi_formed(&self) -> Option<usize> {
        self.events.iter().find_map(|e| match e {
            BoardEvent::YoshiFormed { size } => Some(*size),
            _ => None,
        })
    }

    pub fn has(&self, event: &BoardEvent) -> bool {
        self.events.contains(event)
    }
}

/// One player's 4×9 grid and its per-tick phase machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pieces: PieceArena,
    difficulty: Difficulty,
    tuning: BoardTuning,
    gravity: Timer,
    pending: Vec<BoardEvent>,
    lost: bool,
    game_over: bool,
}

impl Board {
    pub fn new(difficulty: Difficulty, tuning: BoardTuning) -> Self {
        Self {
            pieces: PieceArena::new(),
            difficulty,
            tuning,
            gravity: Timer::new(tuning.gravity_delay(difficulty)),
            pending: Vec::new(),
            lost: false,
            game_over: false,
        }
    }

    pub fn gravity(&self) -> &Timer {
        &self.gravity
    }

    pub fn pieces(&self) -> &PieceArena {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn has_lost(&self) -> bool {
        self.lost
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// End the game for this board, as a loss or a win.
    pub fn set_game_result(&mut self, lost: bool) {
        self.lost = lost;
        self.game_over = true;
    }

    /// Put a piece on the board as-is. Used for prefill and for building test positions.
    pub fn insert_piece(&mut self, piece: Piece) -> PieceId {
        self.pieces.insert(piece)
    }

    pub fn insert_placed(&mut self, kind: PieceKind, column: usize, row: usize) -> PieceId {
        self.insert_piece(Piece::placed_at(kind, column, row))
    }

    /// A released piece at `half_row`, as if mid-fall.
    pub fn insert_falling(&mut self, kind: PieceKind, column: usize, half_row: usize) -> PieceId {
        let mut piece = Piece::spawned(kind, column);
        piece.frozen = false;
        piece.half_row = half_row;
        self.insert_piece(piece)
    }

    pub fn remove_piece(&mut self, id: PieceId) -> Option<Piece> {
        self.pieces.remove(id)
    }

    /// The piece sitting exactly on (`column`, `row`).
    pub fn piece_at(&self, column: usize, row: usize) -> Option<PieceId> {
        self.pieces
            .iter()
            .find(|(_, p)| p.column == column && p.half_row == row * 2)
            .map(|(id, _)| id)
    }

    pub fn has_falling(&self) -> bool {
        self.pieces.pieces().any(Self::is_active_falling)
    }

    pub fn falling_pieces(&self) -> Vec<PieceId> {
        self.pieces
            .iter()
            .filter(|(_, p)| Self::is_active_falling(p))
            .map(|(id, _)| id)
            .collect()
    }

    fn is_active_falling(p: &Piece) -> bool {
        p.is_falling() && !p.destroyed && !p.yoshi
    }

    pub fn has_destroyed(&self) -> bool {
        self.pieces.pieces().any(|p| p.destroyed)
    }

    pub fn has_yoshi(&self) -> bool {
        self.pieces.pieces().any(|p| p.yoshi)
    }

    pub fn yoshi_size(&self) -> Option<usize> {
        self.pieces.pieces().find(|p| p.yoshi).map(|p| p.yoshi_size)
    }

    pub fn is_swapping(&self) -> bool {
        self.pieces.pieces().any(|p| !p.has_target_column())
    }

    pub fn can_swap(&self) -> bool {
        !self.has_destroyed() && !self.has_yoshi() && !self.is_swapping()
    }

    /// True when nothing is left standing: no placed, yoshi or destroyed pieces.
    pub fn is_cleared(&self) -> bool {
        !self
            .pieces
            .pieces()
            .any(|p| p.placed || p.yoshi || p.destroyed)
    }

    /// Placed, live, non-yoshi pieces in `column`.
    pub fn column_height(&self, column: usize) -> usize {
        self.pieces
            .pieces()
            .filter(|p| p.column == column && p.placed && !p.destroyed && !p.yoshi)
            .count()
    }

    /// Highest placed piece in `column`.
    pub fn top_piece(&self, column: usize) -> Option<&Piece> {
        self.pieces
            .pieces()
            .filter(|p| p.column == column && p.placed && !p.destroyed)
            .min_by_key(|p| p.half_row)
    }

    /// Count of settled pieces from the top of `column` down to and including the
    /// nearest ShellBottom, or 0 when the column has none.
    pub fn bottom_shell_depth(&self, column: usize) -> usize {
        let mut count = 0;
        for row in 0..ROWS {
            let Some(piece) = self.piece_at(column, row).and_then(|id| self.pieces.get(id)) else {
                continue;
            };
            if !piece.placed || piece.destroyed || piece.yoshi || piece.frozen {
                continue;
            }
            count += 1;
            if piece.kind == PieceKind::ShellBottom {
                return count;
            }
        }
        0
    }

    /// A placed, live, non-ShellTop piece in row 0 loses the game.
    pub fn is_losing(&self) -> bool {
        self.pieces.pieces().any(|p| {
            p.placed && !p.destroyed && p.kind != PieceKind::ShellTop && p.half_row == 0
        })
    }

    /// Which phase the next tick would run.
    pub fn next_phase(&self) -> Phase {
        if !self.pieces.pieces().any(|p| p.row() == 0) {
            Phase::Spawn
        } else if self.can_release() {
            Phase::Release
        } else if self.has_destroyed() {
            Phase::DestroyPause
        } else if self.is_swapping() {
            Phase::SwapPause
        } else {
            Phase::Gravity
        }
    }

    fn can_release(&self) -> bool {
        let waiting = self
            .pieces
            .pieces()
            .any(|p| p.row() == 0 && p.frozen && !p.placed && !p.yoshi);
        waiting && !self.has_falling() && !self.has_destroyed() && !self.has_yoshi()
    }

    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        dt: Duration,
        rng: &mut R,
    ) -> Result<TickReport, GameError> {
        let phase = self.next_phase();
        let mut events = std::mem::take(&mut self.pending);

        match phase {
            Phase::Spawn => self.spawn(rng, &mut events)?,
            Phase::Release => self.release(&mut events),
            Phase::DestroyPause => self.advance_destroyed(dt),
            Phase::SwapPause => self.advance_swaps(&mut events),
            Phase::Gravity => self.apply_gravity_tick(dt, &mut events),
        }

        if !self.has_yoshi() && !self.lost && self.is_losing() {
            info!("board lost: a piece settled in the top row");
            self.set_game_result(true);
            events.push(BoardEvent::Lost);
        }

        Ok(TickReport { phase, events })
    }

    fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<BoardEvent>,
    ) -> Result<(), GameError> {
        let mut columns: Vec<usize> = (0..COLUMNS).collect();
        for _ in 0..SPAWN_COUNT {
            let kind = PieceKind::from_index(rng.next_below(PieceKind::ALL.len()))?;
            let column = columns.remove(rng.next_below(columns.len()));
            debug_assert!(self.piece_at(column, 0).is_none());
            let id = self.pieces.insert(Piece::spawned(kind, column));
            debug!("spawned {kind:?} in column {column}");
            events.push(BoardEvent::Spawned { id, kind, column });
        }
        Ok(())
    }

    fn release(&mut self, events: &mut Vec<BoardEvent>) {
        let mut count = 0;
        for (_, piece) in self.pieces.iter_mut() {
            if piece.row() == 0 && piece.frozen && !piece.placed && !piece.yoshi {
                piece.frozen = false;
                count += 1;
            }
        }
        events.push(BoardEvent::Released { count });
    }

    fn advance_destroyed(&mut self, dt: Duration) {
        for id in self.pieces.ids() {
            let Some(piece) = self.pieces.get_mut(id) else {
                continue;
            };
            if !piece.destroyed {
                continue;
            }
            let finished = piece.animation.is_none_or(|a| a.is_finished());
            if finished {
                self.pieces.remove(id);
            } else if let Some(animation) = piece.animation.as_mut() {
                animation.advance(dt);
            }
        }
    }

    fn advance_swaps(&mut self, events: &mut Vec<BoardEvent>) {
        let (rate, span) = (self.tuning.swap_rate, self.tuning.swap_span);
        for (_, piece) in self.pieces.iter_mut() {
            piece.advance_swap(rate, span);
        }
        if !self.is_swapping() {
            events.push(BoardEvent::SwapFinished);
        }
    }

    fn apply_gravity_tick(&mut self, dt: Duration, events: &mut Vec<BoardEvent>) {
        self.gravity.tick(dt);
        let fire = self.gravity.is_up();
        if fire {
            self.gravity.reset();
        }

        if self.has_yoshi() {
            self.resolve_yoshi(fire, dt, events);
            return;
        }
        if !fire {
            return;
        }
        for id in self.pieces.ids() {
            self.fall(id, events);
            if self.has_yoshi() {
                break;
            }
        }
    }

    fn fall(&mut self, id: PieceId, events: &mut Vec<BoardEvent>) {
        let Some(piece) = self.pieces.get(id) else {
            return;
        };
        if !Self::is_active_falling(piece) {
            return;
        }
        if piece.is_on_row() {
            let (column, row) = (piece.column, piece.row());
            if row + 1 >= ROWS || self.piece_at(column, row + 1).is_some() {
                self.place(id, events);
                return;
            }
        }
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.half_row += 1;
        }
    }

    fn place(&mut self, id: PieceId, events: &mut Vec<BoardEvent>) {
        let Some(piece) = self.pieces.get_mut(id) else {
            return;
        };
        piece.placed = true;
        let (kind, column, row) = (piece.kind, piece.column, piece.row());
        debug!("placed {kind:?} at column {column}, row {row}");
        events.push(BoardEvent::Placed {
            id,
            kind,
            column,
            row,
        });

        let destroy = self.tuning.destroy_animation;
        let below = self
            .piece_at(column, row + 1)
            .filter(|&b| self.pieces.get(b).is_some_and(|p| !p.destroyed));

        match below {
            Some(_) if kind == PieceKind::ShellTop => match self.scan_yoshi(column, row) {
                Some(size) => {
                    debug!("yoshi of size {size} formed in column {column}");
                    self.gravity.reset_to(self.tuning.yoshi_gravity);
                    events.push(BoardEvent::YoshiFormed { size });
                }
                None => self.discard_shell_top(id, column, events),
            },
            Some(below_id) => {
                let same = self
                    .pieces
                    .get(below_id)
                    .is_some_and(|p| p.kind == kind && !p.yoshi);
                if same {
                    for target in [id, below_id] {
                        if let Some(p) = self.pieces.get_mut(target) {
                            p.mark_destroyed(destroy);
                        }
                    }
                    debug!("matched {kind:?} in column {column}");
                    events.push(BoardEvent::Matched { kind, column });
                }
            }
            None if kind == PieceKind::ShellTop => self.discard_shell_top(id, column, events),
            None => {}
        }
    }

    fn discard_shell_top(&mut self, id: PieceId, column: usize, events: &mut Vec<BoardEvent>) {
        let destroy = self.tuning.destroy_animation;
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.mark_destroyed(destroy);
        }
        events.push(BoardEvent::ShellTopDiscarded { column });
    }

    /// Look for a ShellTop..ShellBottom run in `column` starting at `start_row`.
    ///
    /// On success every piece of the run becomes a frozen yoshi member and the run
    /// length is returned.
    pub fn scan_yoshi(&mut self, column: usize, start_row: usize) -> Option<usize> {
        let mut top = false;
        let mut start = start_row;
        let mut seen = false;

        for row in start_row..ROWS {
            let Some(kind) = self
                .piece_at(column, row)
                .and_then(|id| self.pieces.get(id))
                .map(|p| p.kind)
            else {
                if seen {
                    break;
                }
                continue;
            };
            seen = true;

            match kind {
                PieceKind::ShellTop => {
                    top = true;
                    start = row;
                }
                PieceKind::ShellBottom if top => {
                    let size = row - start + 1;
                    for member_row in start..=row {
                        let Some(id) = self.piece_at(column, member_row) else {
                            continue;
                        };
                        if let Some(piece) = self.pieces.get_mut(id) {
                            piece.yoshi = true;
                            piece.frozen = true;
                            piece.yoshi_size = size;
                        }
                    }
                    return Some(size);
                }
                PieceKind::ShellBottom => return None,
                _ => {}
            }
        }
        None
    }

    fn resolve_yoshi(&mut self, fire: bool, dt: Duration, events: &mut Vec<BoardEvent>) {
        let members: Vec<PieceId> = self
            .pieces
            .iter()
            .filter(|(_, p)| p.yoshi)
            .map(|(id, _)| id)
            .collect();

        if members.len() > 1 {
            if !fire {
                return;
            }
            let Some((top_id, column, half_row, size)) = members.iter().find_map(|&id| {
                self.pieces
                    .get(id)
                    .filter(|p| p.kind == PieceKind::ShellTop)
                    .map(|p| (id, p.column, p.half_row, p.yoshi_size))
            }) else {
                return;
            };

            let overlapped = self
                .pieces
                .iter()
                .find(|(id, p)| *id != top_id && p.column == column && p.half_row == half_row)
                .map(|(id, p)| (id, p.kind));

            match overlapped {
                Some((bottom_id, PieceKind::ShellBottom)) => {
                    let tier = YoshiTier::from_size(size);
                    let duration = self.tuning.hatch_duration(tier);
                    if let Some(bottom) = self.pieces.get_mut(bottom_id) {
                        bottom.animation = Some(Animation::new(duration));
                    }
                    self.pieces.remove(top_id);
                    debug!("yoshi hatching as {tier:?}");
                    events.push(BoardEvent::YoshiHatching { tier });
                }
                Some((member_id, _)) => {
                    self.pieces.remove(member_id);
                    self.drop_half_row(top_id);
                }
                None => self.drop_half_row(top_id),
            }
            return;
        }

        let Some(&bottom_id) = members.first() else {
            return;
        };
        let Some(bottom) = self.pieces.get_mut(bottom_id) else {
            return;
        };
        let size = bottom.yoshi_size;
        match bottom.animation.map(|a| a.is_finished()) {
            Some(true) => {
                self.pieces.remove(bottom_id);
                self.gravity
                    .reset_to(self.tuning.gravity_delay(self.difficulty));
                debug!("yoshi of size {size} completed");
                events.push(BoardEvent::YoshiCompleted { size });
            }
            Some(false) => {
                if let Some(animation) = bottom.animation.as_mut() {
                    animation.advance(dt);
                }
            }
            None => {
                let duration = self.tuning.hatch_duration(YoshiTier::from_size(size));
                bottom.animation = Some(Animation::new(duration));
            }
        }
    }

    fn drop_half_row(&mut self, id: PieceId) {
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.half_row += 1;
        }
    }

    /// Start swapping physical columns `left` and `left + 1`.
    ///
    /// Refused while pieces are destroyed, a yoshi exists or another swap is moving.
    /// Placed pieces trade columns. Unplaced pieces stay where they are unless a placed
    /// neighbour would slide into them, in which case they ride along.
    pub fn swap_columns(&mut self, left: usize) -> bool {
        let right = left + 1;
        if right >= COLUMNS || !self.can_swap() {
            return false;
        }
        let opposite = |column: usize| if column == left { right } else { left };

        let mut moves: Vec<(PieceId, usize)> = Vec::new();
        let mut carried: Vec<(usize, usize)> = Vec::new();
        for (id, piece) in self.pieces.iter() {
            if piece.column != left && piece.column != right {
                continue;
            }
            let other = opposite(piece.column);
            if piece.placed {
                moves.push((id, other));
                continue;
            }
            let blocked = self.pieces.pieces().any(|q| {
                q.placed
                    && q.column == other
                    && (q.half_row == piece.half_row || q.half_row == piece.half_row + 1)
            });
            if blocked {
                moves.push((id, other));
                carried.push((piece.column, piece.half_row));
            }
        }

        for (id, piece) in self.pieces.iter() {
            if piece.placed || (piece.column != left && piece.column != right) {
                continue;
            }
            if moves.iter().any(|(m, _)| *m == id) {
                continue;
            }
            let other = opposite(piece.column);
            let incoming = carried
                .iter()
                .any(|&(col, half_row)| col == other && half_row.abs_diff(piece.half_row) <= 1);
            if incoming {
                moves.push((id, other));
            }
        }

        for (id, target) in moves {
            if let Some(piece) = self.pieces.get_mut(id) {
                piece.begin_swap(target);
            }
        }
        self.pending.push(BoardEvent::SwapStarted { left });
        true
    }

    /// Make the next gravity tick fire immediately. Refused while the board cannot swap.
    pub fn apply_gravity(&mut self) -> bool {
        if !self.can_swap() {
            return false;
        }
        self.gravity.expire();
        true
    }

    /// Fill the bottom `rows` rows with placed pieces, never stacking two of a kind and
    /// never using a ShellTop.
    pub fn prefill<R: RandomSource + ?Sized>(&mut self, rows: usize, rng: &mut R) {
        let rows = rows.min(ROWS - 1);
        for row in (ROWS - rows..ROWS).rev() {
            for column in 0..COLUMNS {
                let below = self
                    .piece_at(column, row + 1)
                    .and_then(|id| self.pieces.get(id))
                    .map(|p| p.kind);
                let candidates: Vec<PieceKind> = PieceKind::ALL
                    .into_iter()
                    .filter(|&k| k != PieceKind::ShellTop && Some(k) != below)
                    .collect();
                let kind = candidates[rng.next_below(candidates.len())];
                self.insert_placed(kind, column, row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    const DT: Duration = Duration::from_millis(16);

    fn board() -> Board {
        Board::new(Difficulty::Easy, BoardTuning::default())
    }

    #[test]
    fn empty_board_spawns_two_frozen_pieces() {
        let mut b = board();
        // kind 0 -> column pool[1], kind 5 -> column pool[2]
        let mut rng = ScriptedRandom::new([0, 1, 5, 2]);
        let report = b.tick(DT, &mut rng).unwrap();
        assert_eq!(report.phase, Phase::Spawn);

        let spawned: Vec<&Piece> = b.pieces().pieces().collect();
        assert_eq!(spawned.len(), 2);
        assert_eq!(spawned[0].kind, PieceKind::Goomba);
        assert_eq!(spawned[0].column, 1);
        assert_eq!(spawned[1].kind, PieceKind::ShellBottom);
        assert_eq!(spawned[1].column, 3);
        assert!(spawned.iter().all(|p| p.frozen && p.row() == 0));
    }

    #[test]
    fn release_follows_spawn() {
        let mut b = board();
        let mut rng = ScriptedRandom::new([0, 0, 1, 0]);
        b.tick(DT, &mut rng).unwrap();
        let report = b.tick(DT, &mut rng).unwrap();
        assert_eq!(report.phase, Phase::Release);
        assert!(report.has(&BoardEvent::Released { count: 2 }));
        assert_eq!(b.falling_pieces().len(), 2);
    }

    #[test]
    fn destroy_pause_preempts_swap_and_gravity() {
        let mut b = board();
        b.insert_falling(PieceKind::Boo, 3, 0);
        let doomed = b.insert_placed(PieceKind::Plant, 0, 8);
        b.pieces.get_mut(doomed).unwrap().mark_destroyed(Duration::from_millis(300));
        let swapping = b.insert_placed(PieceKind::Squid, 1, 8);
        b.pieces.get_mut(swapping).unwrap().begin_swap(2);
        b.gravity.expire();

        let report = b.tick(DT, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(report.phase, Phase::DestroyPause);
        assert_eq!(b.piece(swapping).unwrap().column, 1);
        assert_eq!(b.piece(swapping).unwrap().swap_progress, 0);
    }

    #[test]
    fn swap_pause_preempts_gravity() {
        let mut b = board();
        b.insert_piece(Piece::spawned(PieceKind::Plant, 0));
        let falling = b.insert_falling(PieceKind::Boo, 3, 4);
        let swapping = b.insert_placed(PieceKind::Squid, 1, 8);
        b.pieces.get_mut(swapping).unwrap().begin_swap(2);
        b.gravity.expire();

        let report = b.tick(DT, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(report.phase, Phase::SwapPause);
        assert_eq!(b.piece(falling).unwrap().half_row, 4);
        assert_eq!(b.piece(swapping).unwrap().swap_progress, 10);
    }

    #[test]
    fn matching_pieces_are_destroyed_then_removed() {
        let mut b = board();
        b.insert_placed(PieceKind::Boo, 0, 8);
        let falling = b.insert_falling(PieceKind::Boo, 0, 14);
        b.insert_falling(PieceKind::Plant, 1, 0);
        b.gravity.expire();

        let report = b.tick(DT, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(report.phase, Phase::Gravity);
        assert!(report.has(&BoardEvent::Matched {
            kind: PieceKind::Boo,
            column: 0
        }));
        assert!(b.piece(falling).unwrap().destroyed);

        for _ in 0..40 {
            b.tick(Duration::from_millis(50), &mut ScriptedRandom::default())
                .unwrap();
            if !b.has_destroyed() {
                break;
            }
        }
        assert!(!b.has_destroyed());
        assert_eq!(b.column_height(0), 0);
    }

    #[test]
    fn shell_top_on_floor_is_discarded() {
        let mut b = board();
        b.insert_falling(PieceKind::ShellTop, 2, 16);
        b.insert_falling(PieceKind::Goomba, 0, 0);
        b.gravity.expire();
        let report = b.tick(DT, &mut ScriptedRandom::default()).unwrap();
        assert!(report.has(&BoardEvent::ShellTopDiscarded { column: 2 }));
    }

    #[test]
    fn forced_gravity_refused_without_swap_capability() {
        let mut b = board();
        assert!(b.apply_gravity());
        assert!(b.gravity().is_up());

        let mut b = board();
        let doomed = b.insert_placed(PieceKind::Plant, 0, 8);
        b.pieces.get_mut(doomed).unwrap().mark_destroyed(Duration::from_millis(300));
        assert!(!b.apply_gravity());
        assert!(!b.gravity().is_up());
    }

    #[test]
    fn swap_moves_placed_pieces_and_leaves_clear_fallers() {
        let mut b = board();
        let placed = b.insert_placed(PieceKind::Goomba, 0, 8);
        let faller = b.insert_falling(PieceKind::Squid, 1, 2);

        assert!(b.swap_columns(0));
        assert_eq!(b.piece(placed).unwrap().target_column, 1);
        assert!(b.piece(faller).unwrap().has_target_column());
        assert!(!b.swap_columns(0));
    }

    #[test]
    fn swap_carries_faller_beside_placed_neighbour() {
        let mut b = board();
        b.insert_placed(PieceKind::Goomba, 0, 8);
        b.insert_placed(PieceKind::Boo, 0, 7);
        // faller in column 1 at half row 13, neighbour below it at 14
        let faller = b.insert_falling(PieceKind::Squid, 1, 13);

        assert!(b.swap_columns(0));
        assert_eq!(b.piece(faller).unwrap().target_column, 0);
    }

    #[test]
    fn prefill_never_stacks_matching_kinds() {
        let mut b = board();
        let mut rng = crate::random::SeededRng::new(99);
        b.prefill(3, &mut rng);
        assert_eq!(b.pieces().len(), 3 * COLUMNS);
        for column in 0..COLUMNS {
            for row in ROWS - 3..ROWS - 1 {
                let upper = b.piece(b.piece_at(column, row).unwrap()).unwrap().kind;
                let lower = b.piece(b.piece_at(column, row + 1).unwrap()).unwrap().kind;
                assert_ne!(upper, lower);
                assert_ne!(upper, PieceKind::ShellTop);
            }
        }
    }
}
