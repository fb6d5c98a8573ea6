//! Frame-rate independent simulation
//!
//! All gameplay logic lives here. No rendering, audio or storage access:
//! - Time arrives as timestamps through `Engine::step`
//! - Persistence goes through the `Store` port
//! - Presentation polls `Snapshot`s and drains `GameEvent`s

pub mod avoider;
pub mod clock;
pub mod collision;
pub mod flyer;
pub mod rules;
pub mod state;
pub mod tick;
pub mod timers;

pub use avoider::{Avoider, Dodger, FallingBody};
pub use clock::Clock;
pub use collision::{Aabb, proximity_hit};
pub use flyer::{Bird, Flyer, Gate};
pub use rules::{Rules, Tracked};
pub use state::{GameEvent, Playfield, PowerUp, PowerUpKind, PowerUps, Run, Snapshot};
pub use tick::{AvoiderEngine, Engine, FlyerEngine};
pub use timers::{Expiry, ExpiryTimers};
