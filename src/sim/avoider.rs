//! Engine B: dodge falling bodies
//!
//! The player slides along the bottom of the playfield, placed directly by
//! input. Bodies rain down at score-scaled speed. Score accrues per second
//! survived. Slow-mo and Shield power-ups are available.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::proximity_hit;
use super::rules::{Rules, Tracked, sample};
use super::state::{Playfield, PowerUpKind};
use crate::tuning::{AvoiderTuning, PowerUpTiming};

/// The player. `x` is the normalized horizontal center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dodger {
    pub x: f32,
}

/// A body falling from the top of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingBody {
    pub id: u32,
    /// Normalized horizontal center, fixed after spawn
    pub x: f32,
    /// Normalized vertical center, grows over time
    pub y: f32,
    /// Edge length in pixels
    pub size: f32,
    /// Base fall speed (playfield heights per second)
    pub vy: f32,
}

impl Tracked for FallingBody {
    fn id(&self) -> u32 {
        self.id
    }
}

const POWER_UPS: &[PowerUpKind] = &[PowerUpKind::Slow, PowerUpKind::Shield];

/// Engine B rules
#[derive(Debug, Clone, Default)]
pub struct Avoider {
    tuning: AvoiderTuning,
}

impl Avoider {
    pub fn new(tuning: AvoiderTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &AvoiderTuning {
        &self.tuning
    }
}

impl Rules for Avoider {
    type Entity = Dodger;
    type Obstacle = FallingBody;

    fn name(&self) -> &'static str {
        "avoider"
    }

    fn default_playfield(&self) -> Playfield {
        Playfield::from_vec(self.tuning.playfield)
    }

    fn spawn_entity(&self) -> Dodger {
        Dodger {
            x: self.tuning.start_x,
        }
    }

    fn first_spawn_delay(&self) -> f32 {
        self.tuning.first_spawn_delay
    }

    fn power_ups(&self) -> &'static [PowerUpKind] {
        POWER_UPS
    }

    fn power_up_timing(&self, kind: PowerUpKind) -> Option<PowerUpTiming> {
        Some(match kind {
            PowerUpKind::Slow => self.tuning.slow_mo,
            PowerUpKind::Shield => self.tuning.shield,
        })
    }

    fn slow_mo_time_scale(&self) -> f32 {
        self.tuning.slow_mo_time_scale
    }

    fn keeps_leaderboard(&self) -> bool {
        true
    }

    fn integrate(&self, dodger: &Dodger, _dt: f32, _field: &Playfield) -> Dodger {
        // Lateral position only changes through input
        *dodger
    }

    fn reposition(&self, dodger: &Dodger, fraction: f32) -> Option<Dodger> {
        if !fraction.is_finite() {
            return Some(*dodger);
        }
        Some(Dodger {
            x: fraction.clamp(0.0, 1.0),
        })
    }

    fn spawn_interval(&self, score: f64) -> f32 {
        self.tuning.spawn_interval.at(score)
    }

    fn spawn_obstacle(
        &self,
        id: u32,
        _score: f64,
        _field: &Playfield,
        rng: &mut Pcg32,
    ) -> FallingBody {
        FallingBody {
            id,
            x: sample(rng, self.tuning.spawn_x),
            y: self.tuning.spawn_y,
            size: sample(rng, self.tuning.size).floor(),
            vy: sample(rng, self.tuning.fall_speed),
        }
    }

    fn advance(&self, body: &FallingBody, dt: f32, score: f64) -> Option<FallingBody> {
        let y = body.y + body.vy * dt * self.tuning.speed_up.at(score);
        (y < self.tuning.despawn_y).then_some(FallingBody { y, ..*body })
    }

    fn survival_points(&self, dt: f32) -> f64 {
        (self.tuning.score_rate * dt) as f64
    }

    fn hits(&self, dodger: &Dodger, body: &FallingBody, field: &Playfield) -> bool {
        let player = Vec2::new(dodger.x, self.tuning.player_y);
        let player_extent = Vec2::splat(self.tuning.player_size) / field.size();
        // Bodies are measured against playfield height on both axes
        let body_extent = Vec2::splat(body.size / field.height());
        proximity_hit(
            player,
            player_extent,
            Vec2::new(body.x, body.y),
            body_extent,
            self.tuning.overlap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> Playfield {
        Playfield::new(360.0, 640.0).unwrap()
    }

    #[test]
    fn test_reposition_clamps() {
        let avoider = Avoider::default();
        let d = avoider.spawn_entity();
        assert_eq!(avoider.reposition(&d, 1.7).unwrap().x, 1.0);
        assert_eq!(avoider.reposition(&d, -0.3).unwrap().x, 0.0);
        assert_eq!(avoider.reposition(&d, 0.25).unwrap().x, 0.25);
        assert_eq!(avoider.reposition(&d, f32::NAN).unwrap(), d);
    }

    #[test]
    fn test_spawn_ranges() {
        let avoider = Avoider::default();
        let mut rng = Pcg32::seed_from_u64(99);
        for id in 0..500 {
            let body = avoider.spawn_obstacle(id, 0.0, &field(), &mut rng);
            assert!((0.08..0.92).contains(&body.x));
            assert!((26.0..68.0).contains(&body.size));
            assert_eq!(body.size, body.size.floor());
            assert!((0.13..0.28).contains(&body.vy));
            assert_eq!(body.y, -0.05);
        }
    }

    #[test]
    fn test_fall_speeds_up_with_score_but_caps() {
        let avoider = Avoider::default();
        let body = FallingBody {
            id: 1,
            x: 0.5,
            y: 0.0,
            size: 40.0,
            vy: 0.2,
        };
        let slow = avoider.advance(&body, 0.05, 0.0).unwrap();
        let fast = avoider.advance(&body, 0.05, 100.0).unwrap();
        let capped = avoider.advance(&body, 0.05, 1e6).unwrap();
        assert!((slow.y - 0.01).abs() < 1e-6);
        assert!((fast.y - 0.015).abs() < 1e-6);
        assert!((capped.y - 0.019).abs() < 1e-6);
    }

    #[test]
    fn test_body_below_floor_is_pruned() {
        let avoider = Avoider::default();
        let body = FallingBody {
            id: 1,
            x: 0.5,
            y: 1.19,
            size: 40.0,
            vy: 0.28,
        };
        assert!(avoider.advance(&body, 0.05, 0.0).is_none());
    }

    #[test]
    fn test_survival_points() {
        let avoider = Avoider::default();
        assert!((avoider.survival_points(1.0) - 15.0).abs() < 1e-9);
        assert!((avoider.survival_points(0.05) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_proximity_collision() {
        let avoider = Avoider::default();
        let f = field();
        let player = Dodger { x: 0.5 };
        let on_top = FallingBody {
            id: 1,
            x: 0.52,
            y: 0.9,
            size: 40.0,
            vy: 0.2,
        };
        assert!(avoider.hits(&player, &on_top, &f));

        let beside = FallingBody { x: 0.8, ..on_top };
        assert!(!avoider.hits(&player, &beside, &f));

        let above = FallingBody { y: 0.5, ..on_top };
        assert!(!avoider.hits(&player, &above, &f));
    }
}
