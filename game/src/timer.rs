use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serialize a `Duration` as whole milliseconds.
pub mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = value.as_millis().min(u64::MAX as u128) as u64;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Countdown with an explicit reset value.
///
/// Used for the board's gravity cadence, the CPU move delay and the timed modes.
/// `remaining` never goes below zero; once it reaches zero the timer is up until
/// someone resets it or adds time back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    #[serde(with = "millis")]
    reset: Duration,
    #[serde(with = "millis")]
    remaining: Duration,
}

impl Timer {
    pub fn new(reset: Duration) -> Self {
        Self {
            reset,
            remaining: reset,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub fn is_up(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn reset_duration(&self) -> Duration {
        self.reset
    }

    pub fn reset(&mut self) {
        self.remaining = self.reset;
    }

    /// Change the cadence and restart from it.
    pub fn reset_to(&mut self, reset: Duration) {
        self.reset = reset;
        self.reset();
    }

    pub fn expire(&mut self) {
        self.remaining = Duration::ZERO;
    }

    pub fn add(&mut self, extra: Duration) {
        self.remaining = self.remaining.saturating_add(extra);
    }

    /// Remove time, flooring at zero.
    pub fn deduct(&mut self, amount: Duration) {
        self.remaining = self.remaining.saturating_sub(amount);
    }
}

/// Per-player game clock: always counts elapsed play time, and optionally a countdown
/// for the timed modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    #[serde(with = "millis")]
    elapsed: Duration,
    countdown: Option<Timer>,
}

impl GameClock {
    pub fn untimed() -> Self {
        Self {
            elapsed: Duration::ZERO,
            countdown: None,
        }
    }

    pub fn countdown(limit: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            countdown: Some(Timer::new(limit)),
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.tick(dt);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_countdown(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.countdown.map(|t| t.remaining())
    }

    pub fn is_up(&self) -> bool {
        self.countdown.is_some_and(|t| t.is_up())
    }

    /// Add time to the countdown. No-op for untimed clocks.
    pub fn heal(&mut self, amount: Duration) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.add(amount);
        }
    }

    /// Remove time from the countdown, flooring at zero. No-op for untimed clocks.
    pub fn damage(&mut self, amount: Duration) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.deduct(amount);
        }
    }
}
