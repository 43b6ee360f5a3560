use serde::{Deserialize, Serialize};

use crate::board::COLUMNS;
use crate::error::GameError;

/// Which column stack sits at each physical position.
///
/// Stacks keep their identity while swaps move them around; the planner aims stacks at
/// positions through this mapping. Always a permutation of `0..COLUMNS`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnOrder {
    slots: [usize; COLUMNS],
}

impl Default for ColumnOrder {
    fn default() -> Self {
        let mut slots = [0; COLUMNS];
        for (index, slot) in slots.iter_mut().enumerate() {
            *slot = index;
        }
        Self { slots }
    }
}

impl ColumnOrder {
    pub fn from_slots(slots: [usize; COLUMNS]) -> Result<Self, GameError> {
        let order = Self { slots };
        order.validate()?;
        Ok(order)
    }

    pub fn slots(&self) -> [usize; COLUMNS] {
        self.slots
    }

    /// Stack currently at physical `index`.
    pub fn stack_at(&self, index: usize) -> Result<usize, GameError> {
        self.slots
            .get(index)
            .copied()
            .ok_or(GameError::ColumnNotFound(index))
    }

    /// Physical position of `stack`.
    pub fn index_of(&self, stack: usize) -> Result<usize, GameError> {
        self.slots
            .iter()
            .position(|&s| s == stack)
            .ok_or(GameError::ColumnNotFound(stack))
    }

    /// Exchange the stacks at `left` and `left + 1`.
    pub fn swap(&mut self, left: usize) -> Result<(), GameError> {
        if left + 1 >= COLUMNS {
            return Err(GameError::ColumnNotFound(left + 1));
        }
        self.slots.swap(left, left + 1);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let mut seen = [false; COLUMNS];
        for &stack in &self.slots {
            match seen.get_mut(stack) {
                Some(flag) if !*flag => *flag = true,
                _ => return Err(GameError::BrokenColumnOrder(self.slots.to_vec())),
            }
        }
        Ok(())
    }
}
