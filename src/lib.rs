//! Twin Arcade - simulation cores for two arcade mini-games
//!
//! A flap-through-the-gates flyer and a dodge-the-falling-bodies avoider,
//! both driven by the same frame loop.
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (clock, physics, spawning, collisions, power-ups)
//! - `highscores`: Bounded run-history leaderboard
//! - `persistence`: Key-value storage port and native stores
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Demo bots for headless play

pub mod autopilot;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::{Leaderboard, ScoreRecord};
pub use persistence::{MemoryStore, Store, StoreError};
pub use sim::{AvoiderEngine, Engine, FlyerEngine, GameEvent, PowerUpKind, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Longest frame delta the simulation will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Leaderboard capacity
    pub const MAX_LEADERBOARD_ENTRIES: usize = 50;
}
