use std::time::Duration;

use engine::GameLogic;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::player::KeyEdge;
use crate::random::SeededRng;
use crate::session::{Mode, Session};
use crate::settings::GameSettings;

/// One recorded frame of input: elapsed time plus the key edges seen during it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub dt_ms: u64,
    #[serde(default)]
    pub keys: Vec<KeyEdge>,
}

impl Frame {
    pub fn idle(dt_ms: u64) -> Self {
        Self {
            dt_ms,
            keys: Vec::new(),
        }
    }

    pub fn with_keys(dt_ms: u64, keys: impl IntoIterator<Item = KeyEdge>) -> Self {
        Self {
            dt_ms,
            keys: keys.into_iter().collect(),
        }
    }
}

/// Seeded session as a pure `GameLogic`, so it can be recorded and replayed through
/// the engine's time machine.
#[derive(Debug, Clone)]
pub struct SessionLogic {
    mode: Mode,
    settings: GameSettings,
    seed: u64,
}

impl SessionLogic {
    pub fn new(mode: Mode, settings: GameSettings, seed: u64) -> Self {
        Self {
            mode,
            settings,
            seed,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl GameLogic for SessionLogic {
    type State = Session<SeededRng>;
    type Input = Frame;
    type Error = GameError;

    fn initial_state(&self) -> Result<Self::State, Self::Error> {
        Ok(Session::new(
            self.mode,
            self.settings,
            SeededRng::new(self.seed),
        ))
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Result<Self::State, Self::Error> {
        let mut next = state.clone();
        next.tick(Duration::from_millis(input.dt_ms), &input.keys)?;
        Ok(next)
    }
}
