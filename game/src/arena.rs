use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceId};

/// A board's pieces keyed by id.
///
/// Ids come from a running counter, so iteration order is spawn order, which is the
/// order the board updates pieces in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceArena {
    next_id: u32,
    pieces: BTreeMap<PieceId, Piece>,
}

impl Default for PieceArena {
    fn default() -> Self {
        Self {
            next_id: 1,
            pieces: BTreeMap::new(),
        }
    }
}

impl PieceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn insert(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.pieces.insert(id, piece);
        id
    }

    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        self.pieces.remove(&id)
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces.iter().map(|(&id, piece)| (id, piece))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PieceId, &mut Piece)> {
        self.pieces.iter_mut().map(|(&id, piece)| (id, piece))
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Snapshot of live ids, for loops that mutate the arena while walking it.
    pub fn ids(&self) -> Vec<PieceId> {
        self.pieces.keys().copied().collect()
    }
}
