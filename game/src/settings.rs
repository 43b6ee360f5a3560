use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::ROWS;
use crate::error::{GameError, SettingsError};
use crate::piece::YoshiTier;
use crate::timer::millis;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::UnknownDifficulty(index))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardTuning {
    #[serde(with = "millis")]
    pub gravity_easy: Duration,
    #[serde(with = "millis")]
    pub gravity_medium: Duration,
    #[serde(with = "millis")]
    pub gravity_hard: Duration,
    #[serde(with = "millis")]
    pub yoshi_gravity: Duration,
    #[serde(with = "millis")]
    pub destroy_animation: Duration,
    #[serde(with = "millis")]
    pub hatch_tiny: Duration,
    #[serde(with = "millis")]
    pub hatch_small: Duration,
    #[serde(with = "millis")]
    pub hatch_medium: Duration,
    #[serde(with = "millis")]
    pub hatch_large: Duration,
    /// Distance between two adjacent columns, in swap units.
    pub swap_span: u32,
    /// Swap units covered per tick.
    pub swap_rate: u32,
}

impl Default for BoardTuning {
    fn default() -> Self {
        Self {
            gravity_easy: Duration::from_millis(900),
            gravity_medium: Duration::from_millis(450),
            gravity_hard: Duration::from_millis(125),
            yoshi_gravity: Duration::from_millis(150),
            destroy_animation: Duration::from_millis(300),
            hatch_tiny: Duration::from_millis(400),
            hatch_small: Duration::from_millis(600),
            hatch_medium: Duration::from_millis(800),
            hatch_large: Duration::from_millis(1000),
            swap_span: 60,
            swap_rate: 10,
        }
    }
}

impl BoardTuning {
    pub fn gravity_delay(&self, difficulty: Difficulty) -> Duration {
        match difficulty {
            Difficulty::Easy => self.gravity_easy,
            Difficulty::Medium => self.gravity_medium,
            Difficulty::Hard => self.gravity_hard,
        }
    }

    pub fn hatch_duration(&self, tier: YoshiTier) -> Duration {
        match tier {
            YoshiTier::Tiny => self.hatch_tiny,
            YoshiTier::Small => self.hatch_small,
            YoshiTier::Medium => self.hatch_medium,
            YoshiTier::Large => self.hatch_large,
        }
    }
}

/// Column scoring weights and move pacing for the CPU player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannerWeights {
    pub yoshi_piece: i32,
    pub height_reward: i32,
    pub piece_match: i32,
    pub piece_height: i32,
    pub bottom_shell_height: i32,
    pub shell_depth_penalty: i32,
    #[serde(with = "millis")]
    pub move_delay_easy: Duration,
    #[serde(with = "millis")]
    pub move_delay_medium: Duration,
    #[serde(with = "millis")]
    pub move_delay_hard: Duration,
}

impl Default for PlannerWeights {
    fn default() -> Self {
        Self {
            yoshi_piece: 50,
            height_reward: 25,
            piece_match: 10,
            piece_height: -5,
            bottom_shell_height: -7,
            shell_depth_penalty: -1,
            move_delay_easy: Duration::from_millis(250),
            move_delay_medium: Duration::from_millis(100),
            move_delay_hard: Duration::from_millis(25),
        }
    }
}

impl PlannerWeights {
    pub fn move_delay(&self, difficulty: Difficulty) -> Duration {
        match difficulty {
            Difficulty::Easy => self.move_delay_easy,
            Difficulty::Medium => self.move_delay_medium,
            Difficulty::Hard => self.move_delay_hard,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRules {
    pub match_piece: u32,
    pub yoshi_piece: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            match_piece: 10,
            yoshi_piece: 50,
        }
    }
}

/// How yoshi heal/damage grows with the yoshi's size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum YoshiScaling {
    /// Same amount regardless of size.
    Flat,
    /// Amount times group size.
    #[default]
    Linear,
    /// Amount times the hatch tier (1 to 4).
    Tiered,
}

impl YoshiScaling {
    pub fn apply(self, base: Duration, size: usize) -> Duration {
        let factor = match self {
            YoshiScaling::Flat => 1,
            YoshiScaling::Linear => size,
            YoshiScaling::Tiered => match YoshiTier::from_size(size) {
                YoshiTier::Tiny => 1,
                YoshiTier::Small => 2,
                YoshiTier::Medium => 3,
                YoshiTier::Large => 4,
            },
        };
        base.saturating_mul(factor.min(u32::MAX as usize) as u32)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttackTuning {
    #[serde(with = "millis")]
    pub match_heal: Duration,
    #[serde(with = "millis")]
    pub match_damage: Duration,
    #[serde(with = "millis")]
    pub yoshi_heal: Duration,
    #[serde(with = "millis")]
    pub yoshi_damage: Duration,
    #[serde(default)]
    pub scaling: YoshiScaling,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            match_heal: Duration::from_millis(1000),
            match_damage: Duration::from_millis(5000),
            yoshi_heal: Duration::from_millis(2000),
            yoshi_damage: Duration::from_millis(7000),
            scaling: YoshiScaling::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModeSettings {
    #[serde(with = "millis")]
    pub high_score_limit: Duration,
    #[serde(with = "millis")]
    pub attack_limit: Duration,
    pub prefill_rows: usize,
    #[serde(default)]
    pub attack: AttackTuning,
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self {
            high_score_limit: Duration::from_secs(180),
            attack_limit: Duration::from_secs(300),
            prefill_rows: 3,
            attack: AttackTuning::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub board: BoardTuning,
    #[serde(default)]
    pub planner: PlannerWeights,
    #[serde(default)]
    pub scoring: ScoringRules,
    #[serde(default)]
    pub modes: ModeSettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            difficulty: Difficulty::default(),
            board: BoardTuning::default(),
            planner: PlannerWeights::default(),
            scoring: ScoringRules::default(),
            modes: ModeSettings::default(),
        }
    }
}

impl GameSettings {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let board = &self.board;
        let delays = [
            ("board.gravity_easy", board.gravity_easy),
            ("board.gravity_medium", board.gravity_medium),
            ("board.gravity_hard", board.gravity_hard),
            ("board.yoshi_gravity", board.yoshi_gravity),
            ("planner.move_delay_easy", self.planner.move_delay_easy),
            ("planner.move_delay_medium", self.planner.move_delay_medium),
            ("planner.move_delay_hard", self.planner.move_delay_hard),
            ("modes.high_score_limit", self.modes.high_score_limit),
            ("modes.attack_limit", self.modes.attack_limit),
        ];
        if let Some((name, _)) = delays.iter().find(|(_, d)| d.is_zero()) {
            return Err(SettingsError::Validation(format!("{name} must be > 0")));
        }
        if board.swap_rate == 0 {
            return Err(SettingsError::Validation(
                "board.swap_rate must be > 0".to_string(),
            ));
        }
        if board.swap_span == 0 {
            return Err(SettingsError::Validation(
                "board.swap_span must be > 0".to_string(),
            ));
        }
        if self.modes.prefill_rows >= ROWS {
            return Err(SettingsError::Validation(format!(
                "modes.prefill_rows must be < {ROWS}"
            )));
        }
        Ok(())
    }
}

fn default_version() -> u32 {
    1
}
