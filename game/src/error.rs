use std::path::PathBuf;

/// Invariant violations inside the simulation.
///
/// None of these are expected during play; they surface defects (bad indices from a
/// caller, a corrupted column permutation, a planner that lost track of its pieces).
/// Ordinary outcomes such as a lost board are state flags, never errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("unknown piece type index {0}")]
    UnknownPieceType(usize),

    #[error("unknown difficulty index {0}")]
    UnknownDifficulty(usize),

    #[error("unknown mode index {0}")]
    UnknownMode(usize),

    #[error("expected {expected} falling pieces, found {found}")]
    FallingPieceCount { expected: usize, found: usize },

    #[error("column {0} not found in column order")]
    ColumnNotFound(usize),

    #[error("column order is not a permutation: {0:?}")]
    BrokenColumnOrder(Vec<usize>),

    #[error("no valid move toward the selected targets")]
    NoValidMove,
}

/// Errors that can occur when loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write settings: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("settings validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_piece_count_display() {
        let err = GameError::FallingPieceCount {
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "expected 2 falling pieces, found 1");
    }

    #[test]
    fn broken_column_order_display() {
        let err = GameError::BrokenColumnOrder(vec![0, 0, 2, 3]);
        assert_eq!(
            err.to_string(),
            "column order is not a permutation: [0, 0, 2, 3]"
        );
    }

    #[test]
    fn settings_validation_display() {
        let err = SettingsError::Validation("board.swap_rate must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "settings validation error: board.swap_rate must be > 0"
        );
    }
}
