use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Uniform integer source. The session owns one and lends it to spawn and prefill.
pub trait RandomSource {
    /// Uniform sample in `0..n`. `n` is always > 0.
    fn next_below(&mut self, n: usize) -> usize;
}

/// SplitMix64 stream keyed by the session seed.
///
/// The whole generator is one counter, so it serializes with the session and a
/// recorded game replays the same spawns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    counter: u64,
}

impl SeededRng {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self { counter: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(Self::GAMMA);
        let mut z = self.counter;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for SeededRng {
    /// Multiply-shift reduction of the high 32 bits onto `0..n`.
    fn next_below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        let high = self.next_u64() >> 32;
        ((high * n.max(1) as u64) >> 32) as usize
    }
}

/// Replays a fixed list of draws, then falls back to zero.
///
/// Each draw is reduced modulo `n` so a script written for one range stays valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedRandom {
    draws: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = usize>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_below(&mut self, n: usize) -> usize {
        self.draws.pop_front().unwrap_or(0) % n.max(1)
    }
}
