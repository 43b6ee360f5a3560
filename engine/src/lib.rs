pub mod digest;
pub mod history;
#[cfg(feature = "files")]
mod recording;

pub use history::TimeMachine;

/// A deterministic, tick-driven simulation.
///
/// `step` must be a pure function of `(state, input)`: no clocks, no ambient randomness.
/// Anything random lives inside `State` so a recorded history replays exactly.
pub trait GameLogic {
    type State;
    type Input;
    type Error;

    fn initial_state(&self) -> Result<Self::State, Self::Error>;
    fn step(&self, state: &Self::State, input: Self::Input) -> Result<Self::State, Self::Error>;
}

#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    timemachine: TimeMachine<G::State>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Result<Self, G::Error> {
        let initial_state = game.initial_state()?;
        Ok(Self {
            game,
            timemachine: TimeMachine::new(initial_state),
        })
    }

    /// Resume from a previously recorded history (e.g. loaded from disk).
    pub fn from_timemachine(game: G, timemachine: TimeMachine<G::State>) -> Self {
        Self { game, timemachine }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &G::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[G::State] {
        self.timemachine.history()
    }

    pub fn timemachine(&self) -> &TimeMachine<G::State> {
        &self.timemachine
    }

    /// Advance one frame. On error the history is left untouched.
    pub fn step(&mut self, input: G::Input) -> Result<usize, G::Error> {
        let next_state = self.game.step(self.timemachine.state(), input)?;
        Ok(self.timemachine.record(next_state))
    }

    pub fn run<I>(&mut self, inputs: I) -> Result<usize, G::Error>
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input)?;
        }
        Ok(last_frame)
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.timemachine.rewind(frames)
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        self.timemachine.forward(frames)
    }

    pub fn seek(&mut self, frame: usize) -> usize {
        self.timemachine.seek(frame)
    }
}
