pub mod arena;
pub mod board;
pub mod column_order;
pub mod error;
pub mod piece;
pub mod planner;
pub mod player;
pub mod playtest;
pub mod random;
pub mod session;
pub mod settings;
#[cfg(feature = "files")]
pub mod store;
pub mod timer;

pub use board::{Board, BoardEvent, COLUMNS, Phase, ROWS, TickReport};
pub use error::{GameError, SettingsError};
pub use session::{Mode, Session};
