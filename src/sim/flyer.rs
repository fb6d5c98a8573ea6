//! Engine A: flap through gated gaps
//!
//! The bird falls under constant gravity and is kicked upward by a flap.
//! Gates scroll right to left; each one scores once when it crosses the
//! bird's column.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rules::{Rules, Tracked, sample};
use super::state::Playfield;
use crate::tuning::FlyerTuning;

/// The flyer. `y` is the normalized top edge (0 = top), `vy` is px/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub y: f32,
    pub vy: f32,
}

/// A pipe pair with a gap to fly through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    /// Normalized horizontal center
    pub x: f32,
    /// Gap center (px from top)
    pub center: f32,
    /// Gap height (px)
    pub gap: f32,
    /// Set once when the gate crosses the bird
    pub passed: bool,
}

impl Gate {
    /// Bottom edge of the upper pipe (px)
    pub fn gap_top(&self) -> f32 {
        self.center - self.gap / 2.0
    }

    /// Top edge of the lower pipe (px)
    pub fn gap_bottom(&self) -> f32 {
        self.center + self.gap / 2.0
    }
}

impl Tracked for Gate {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Engine A rules
#[derive(Debug, Clone, Default)]
pub struct Flyer {
    tuning: FlyerTuning,
}

impl Flyer {
    pub fn new(tuning: FlyerTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &FlyerTuning {
        &self.tuning
    }

    /// Bird hitbox in pixels
    pub fn bird_box(&self, bird: &Bird, field: &Playfield) -> Aabb {
        Aabb::hanging(
            self.tuning.bird_x * field.width(),
            bird.y * field.height(),
            self.tuning.bird_size,
        )
    }

    /// Range of legal gap centers for a gap of `gap` px.
    /// None when the playfield is too short to keep the margins.
    pub fn gap_band(&self, gap: f32, field: &Playfield) -> Option<(f32, f32)> {
        let margin = self.tuning.gap_edge_margin;
        let lo = margin + gap / 2.0;
        let hi = field.height() - margin - gap / 2.0;
        (hi >= lo).then_some((lo, hi))
    }
}

impl Rules for Flyer {
    type Entity = Bird;
    type Obstacle = Gate;

    fn name(&self) -> &'static str {
        "flyer"
    }

    fn default_playfield(&self) -> Playfield {
        Playfield::from_vec(self.tuning.playfield)
    }

    fn spawn_entity(&self) -> Bird {
        Bird {
            y: self.tuning.start_y,
            vy: 0.0,
        }
    }

    fn first_spawn_delay(&self) -> f32 {
        self.tuning.first_spawn_delay
    }

    fn integrate(&self, bird: &Bird, dt: f32, field: &Playfield) -> Bird {
        let h = field.height();
        let vy = bird.vy + self.tuning.gravity * dt;
        let y_px = bird.y * h + vy * dt;
        Bird { y: y_px / h, vy }
    }

    fn impulse(&self, bird: &Bird) -> Option<Bird> {
        // Replaces the current velocity so every flap feels the same
        Some(Bird {
            y: bird.y,
            vy: self.tuning.flap_velocity,
        })
    }

    fn spawn_interval(&self, score: f64) -> f32 {
        self.tuning.spawn_interval.at(score)
    }

    fn spawn_obstacle(&self, id: u32, score: f64, field: &Playfield, rng: &mut Pcg32) -> Gate {
        let gap = self.tuning.gap_at(score);
        let center = match self.gap_band(gap, field) {
            Some(band) => sample(rng, band),
            None => field.height() / 2.0,
        };
        Gate {
            id,
            x: self.tuning.spawn_x,
            center,
            gap,
            passed: false,
        }
    }

    fn advance(&self, gate: &Gate, dt: f32, score: f64) -> Option<Gate> {
        let speed = self.tuning.pipe_speed * self.tuning.speed_up.at(score);
        let x = gate.x - dt * speed;
        (x > self.tuning.despawn_x).then_some(Gate { x, ..*gate })
    }

    fn pass(&self, _bird: &Bird, gate: &Gate) -> Option<Gate> {
        (!gate.passed && gate.x <= self.tuning.bird_x).then_some(Gate {
            passed: true,
            ..*gate
        })
    }

    fn out_of_bounds(&self, bird: &Bird, field: &Playfield) -> bool {
        let b = self.bird_box(bird, field);
        let margin = self.tuning.bounds_margin;
        b.min.y < margin || b.max.y > field.height() - margin
    }

    fn hits(&self, bird: &Bird, gate: &Gate, field: &Playfield) -> bool {
        let b = self.bird_box(bird, field);
        let px = gate.x * field.width();
        let half = self.tuning.pipe_width / 2.0;
        b.overlaps_x(px - half, px + half) && !b.within_y(gate.gap_top(), gate.gap_bottom())
    }
}
