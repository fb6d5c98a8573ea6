//! Per-game strategies plugged into the shared frame driver
//!
//! [`Engine`](super::Engine) owns the frame skeleton (clock, spawn countdown,
//! advance/prune, pass scoring, collision, power-up decay). A [`Rules`]
//! implementation supplies everything that differs between games.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Playfield, PowerUpKind};
use crate::tuning::PowerUpTiming;

/// Obstacles carry a stable identity for their whole life
pub trait Tracked {
    fn id(&self) -> u32;
}

pub trait Rules {
    /// The player-controlled actor
    type Entity: Clone + fmt::Debug;
    /// Things the entity must avoid
    type Obstacle: Clone + fmt::Debug + Tracked;

    /// Storage namespace, e.g. `best-score:<name>`
    fn name(&self) -> &'static str;

    fn default_playfield(&self) -> Playfield;

    /// Entity at the start of a Run
    fn spawn_entity(&self) -> Self::Entity;

    /// Countdown before the first obstacle of a Run
    fn first_spawn_delay(&self) -> f32;

    /// Power-ups available to a Run
    fn power_ups(&self) -> &'static [PowerUpKind] {
        &[]
    }

    fn power_up_timing(&self, _kind: PowerUpKind) -> Option<PowerUpTiming> {
        None
    }

    /// Simulation time multiplier while Slow-mo is active
    fn slow_mo_time_scale(&self) -> f32 {
        1.0
    }

    /// Whether finished runs are appended to a leaderboard
    fn keeps_leaderboard(&self) -> bool {
        false
    }

    /// Passive motion of the entity over `dt`
    fn integrate(&self, entity: &Self::Entity, dt: f32, field: &Playfield) -> Self::Entity;

    /// Discrete impulse (flap). None if the game has no impulse control.
    fn impulse(&self, _entity: &Self::Entity) -> Option<Self::Entity> {
        None
    }

    /// Direct lateral placement. None if the game has no lateral control.
    fn reposition(&self, _entity: &Self::Entity, _fraction: f32) -> Option<Self::Entity> {
        None
    }

    /// Seconds between spawns at `score`
    fn spawn_interval(&self, score: f64) -> f32;

    fn spawn_obstacle(
        &self,
        id: u32,
        score: f64,
        field: &Playfield,
        rng: &mut Pcg32,
    ) -> Self::Obstacle;

    /// Move an obstacle over `dt`. None once it has left the playfield.
    fn advance(&self, obstacle: &Self::Obstacle, dt: f32, score: f64) -> Option<Self::Obstacle>;

    /// The obstacle flagged as passed, if it was passed for the first time
    fn pass(&self, _entity: &Self::Entity, _obstacle: &Self::Obstacle) -> Option<Self::Obstacle> {
        None
    }

    /// Points earned by simply staying alive for `dt` real seconds
    fn survival_points(&self, _dt: f32) -> f64 {
        0.0
    }

    /// Playfield boundary test
    fn out_of_bounds(&self, _entity: &Self::Entity, _field: &Playfield) -> bool {
        false
    }

    /// Entity/obstacle contact test
    fn hits(&self, entity: &Self::Entity, obstacle: &Self::Obstacle, field: &Playfield) -> bool;
}

/// Uniform sample from `[lo, hi)`, or `lo` for an empty band
pub(crate) fn sample(rng: &mut Pcg32, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
