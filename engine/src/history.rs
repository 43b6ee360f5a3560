use serde::{Deserialize, Serialize};

/// Every state a run has passed through, plus a cursor into them.
///
/// The cursor is the "now" the runner steps from. Moving it back and recording again
/// drops the abandoned future, so the timeline never forks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeMachine<State> {
    timeline: Vec<State>,
    cursor: usize,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            timeline: vec![initial_state],
            cursor: 0,
        }
    }

    pub fn frame(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    pub fn last_frame(&self) -> usize {
        self.timeline.len().saturating_sub(1)
    }

    pub fn state(&self) -> &State {
        &self.timeline[self.cursor]
    }

    pub fn state_at(&self, frame: usize) -> Option<&State> {
        self.timeline.get(frame)
    }

    pub fn history(&self) -> &[State] {
        &self.timeline
    }

    pub fn can_rewind(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_forward(&self) -> bool {
        self.cursor < self.last_frame()
    }

    /// Move the cursor to `frame`, clamped to what has been recorded.
    pub fn seek(&mut self, frame: usize) -> usize {
        self.cursor = frame.min(self.last_frame());
        self.cursor
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.seek(self.cursor.saturating_sub(frames))
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        self.seek(self.cursor.saturating_add(frames))
    }

    /// Append `state` after the cursor and make it current.
    pub fn record(&mut self, state: State) -> usize {
        self.timeline.truncate(self.cursor + 1);
        self.timeline.push(state);
        self.cursor = self.last_frame();
        self.cursor
    }
}
