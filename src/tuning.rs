//! Data-driven game balance
//!
//! Every constant the two engines use lives here so a JSON file can retune a
//! build without recompiling. Missing fields fall back to the defaults below.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_FRAME_DT;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Score-driven difficulty ramp: `max(floor, base - min(cap, score / divisor))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub base: f32,
    pub floor: f32,
    pub divisor: f32,
    pub cap: f32,
}

impl Ramp {
    /// Evaluate the ramp at a score
    pub fn at(&self, score: f64) -> f32 {
        let shrink = ((score / self.divisor as f64) as f32).min(self.cap);
        (self.base - shrink).max(self.floor)
    }
}

/// Saturating speed-up: `1 + min(cap, score / divisor)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedUp {
    pub divisor: f32,
    pub cap: f32,
}

impl SpeedUp {
    pub fn at(&self, score: f64) -> f32 {
        1.0 + ((score / self.divisor as f64) as f32).min(self.cap)
    }
}

/// Effect and cooldown length of a power-up (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTiming {
    pub effect_secs: f32,
    pub cooldown_secs: f32,
}

/// Engine A balance (flap through gates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyerTuning {
    /// Default playfield size in pixels
    pub playfield: Vec2,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Vertical velocity set by a flap (px/s, negative is up)
    pub flap_velocity: f32,
    /// Normalized start height
    pub start_y: f32,
    /// Bird box size in pixels
    pub bird_size: Vec2,
    /// Fraction of playfield width where the bird sits
    pub bird_x: f32,
    /// Top/bottom safety margin in pixels
    pub bounds_margin: f32,
    /// Seconds before the first gate of a run
    pub first_spawn_delay: f32,
    pub spawn_interval: Ramp,
    /// Gap height in pixels: `max(floor, base - min(cap, score * per_point))`
    pub gap_base: f32,
    pub gap_floor: f32,
    pub gap_per_point: f32,
    pub gap_cap: f32,
    /// Distance the gap must keep from the top and bottom edges (px)
    pub gap_edge_margin: f32,
    /// Gate width in pixels
    pub pipe_width: f32,
    /// Horizontal gate speed (playfield widths per second)
    pub pipe_speed: f32,
    pub speed_up: SpeedUp,
    pub spawn_x: f32,
    pub despawn_x: f32,
}

impl Default for FlyerTuning {
    fn default() -> Self {
        Self {
            playfield: Vec2::new(360.0, 560.0),
            gravity: 680.0,
            flap_velocity: -260.0,
            start_y: 0.42,
            bird_size: Vec2::new(44.0, 32.0),
            bird_x: 0.34,
            bounds_margin: 6.0,
            first_spawn_delay: 0.8,
            spawn_interval: Ramp {
                base: 1.45,
                floor: 0.9,
                divisor: 26.0,
                cap: 0.9,
            },
            gap_base: 180.0,
            gap_floor: 120.0,
            gap_per_point: 1.6,
            gap_cap: 60.0,
            gap_edge_margin: 80.0,
            pipe_width: 76.0,
            pipe_speed: 0.32,
            speed_up: SpeedUp {
                divisor: 200.0,
                cap: 0.9,
            },
            spawn_x: 1.06,
            despawn_x: -0.28,
        }
    }
}

impl FlyerTuning {
    /// Gap height for the current score
    pub fn gap_at(&self, score: f64) -> f32 {
        let shrink = (score as f32 * self.gap_per_point).min(self.gap_cap);
        (self.gap_base - shrink).max(self.gap_floor)
    }
}

/// Engine B balance (dodge falling bodies)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoiderTuning {
    pub playfield: Vec2,
    /// Player square size in pixels
    pub player_size: f32,
    /// Normalized vertical position of the player
    pub player_y: f32,
    pub start_x: f32,
    /// Points per second of active play
    pub score_rate: f32,
    pub first_spawn_delay: f32,
    pub spawn_interval: Ramp,
    /// Normalized horizontal spawn band
    pub spawn_x: (f32, f32),
    /// Body size band in pixels
    pub size: (f32, f32),
    /// Fall speed band (playfield heights per second)
    pub fall_speed: (f32, f32),
    pub spawn_y: f32,
    pub despawn_y: f32,
    pub speed_up: SpeedUp,
    /// Share of the combined extents that counts as contact
    pub overlap: f32,
    pub slow_mo: PowerUpTiming,
    pub shield: PowerUpTiming,
    /// Multiplier applied to simulation time while Slow-mo is active
    pub slow_mo_time_scale: f32,
}

impl Default for AvoiderTuning {
    fn default() -> Self {
        Self {
            playfield: Vec2::new(360.0, 640.0),
            player_size: 56.0,
            player_y: 0.92,
            start_x: 0.5,
            score_rate: 15.0,
            first_spawn_delay: 0.0,
            spawn_interval: Ramp {
                base: 1.0,
                floor: 0.38,
                divisor: 160.0,
                cap: 0.85,
            },
            spawn_x: (0.08, 0.92),
            size: (26.0, 68.0),
            fall_speed: (0.13, 0.28),
            spawn_y: -0.05,
            despawn_y: 1.2,
            speed_up: SpeedUp {
                divisor: 200.0,
                cap: 0.9,
            },
            overlap: 0.6,
            slow_mo: PowerUpTiming {
                effect_secs: 4.2,
                cooldown_secs: 12.0,
            },
            shield: PowerUpTiming {
                effect_secs: 6.0,
                cooldown_secs: 18.0,
            },
            slow_mo_time_scale: 0.5,
        }
    }
}

/// Complete balance sheet for both engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Frame delta ceiling in seconds
    pub max_frame_dt: f32,
    pub flyer: FlyerTuning,
    pub avoider: AvoiderTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,
            flyer: FlyerTuning::default(),
            avoider: AvoiderTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }
}
