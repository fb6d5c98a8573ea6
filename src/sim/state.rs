//! Run state and core simulation types
//!
//! Everything a Run owns lives here. The presentation layer only ever sees
//! this through a [`Snapshot`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Playfield extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    size: Vec2,
}

impl Playfield {
    /// Returns None for sizes that cannot host a simulation
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let size = Vec2::new(width, height);
        (size.is_finite() && size.cmpgt(Vec2::ZERO).all()).then_some(Self { size })
    }

    pub(crate) fn from_vec(size: Vec2) -> Self {
        Self::new(size.x, size.y).unwrap_or(Self {
            size: Vec2::new(360.0, 560.0),
        })
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Slows simulation time while active
    Slow,
    /// Absorbs one collision
    Shield,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Slow => "slow",
            PowerUpKind::Shield => "shield",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PowerUpKind::Slow => "Slow-mo",
            PowerUpKind::Shield => "Shield",
        }
    }
}

/// One power-up slot: idle -> active -> cooling -> idle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub active: bool,
    /// Seconds until the power-up may be activated again
    pub cooldown: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind) -> Self {
        Self {
            kind,
            active: false,
            cooldown: 0.0,
        }
    }

    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }
}

/// The set of power-ups a Run carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    slots: Vec<PowerUp>,
}

impl PowerUps {
    pub fn new(kinds: &[PowerUpKind]) -> Self {
        Self {
            slots: kinds.iter().copied().map(PowerUp::new).collect(),
        }
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&PowerUp> {
        self.slots.iter().find(|p| p.kind == kind)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.get(kind).is_some_and(|p| p.active)
    }

    /// Activate if present and off cooldown. Returns false when ignored.
    pub fn activate(&mut self, kind: PowerUpKind, cooldown_secs: f32) -> bool {
        match self.slots.iter_mut().find(|p| p.kind == kind) {
            Some(slot) if slot.ready() => {
                slot.active = true;
                slot.cooldown = cooldown_secs;
                true
            }
            _ => false,
        }
    }

    /// Switch off. Returns whether it was active.
    pub fn deactivate(&mut self, kind: PowerUpKind) -> bool {
        match self.slots.iter_mut().find(|p| p.kind == kind) {
            Some(slot) => std::mem::replace(&mut slot.active, false),
            None => false,
        }
    }

    /// Cooldowns tick down every frame whether or not the effect is on
    pub fn decay(&mut self, dt: f32) {
        for slot in &mut self.slots {
            slot.cooldown = (slot.cooldown - dt).max(0.0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.slots.iter()
    }

    pub fn to_vec(&self) -> Vec<PowerUp> {
        self.slots.clone()
    }
}

/// Discrete signals for the audio/haptics layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A Run began
    Start,
    /// Flap impulse applied
    Flap,
    /// Score awarded for passing an obstacle
    Point,
    /// The Run ended on a collision
    Hit,
    /// A power-up activation was accepted
    PowerUp(PowerUpKind),
    /// Shield swallowed a collision
    ShieldAbsorbed,
}

/// One play session from start to collision/stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run<E, O> {
    /// Bumped on every start; stale deferred work compares against it
    pub generation: u64,
    pub running: bool,
    pub score: f64,
    pub entity: E,
    /// Live obstacles in spawn order
    pub obstacles: Vec<O>,
    /// Seconds until the next spawn
    pub spawn_remaining: f32,
    pub power_ups: PowerUps,
    /// Obstacles already swallowed by a Shield
    pub absorbed: Vec<u32>,
    /// Seconds of active play
    pub elapsed: f32,
    next_id: u32,
}

impl<E, O> Run<E, O> {
    pub fn new(generation: u64, entity: E, first_spawn_delay: f32, power_ups: PowerUps) -> Self {
        Self {
            generation,
            running: false,
            score: 0.0,
            entity,
            obstacles: Vec::new(),
            spawn_remaining: first_spawn_delay,
            power_ups,
            absorbed: Vec::new(),
            elapsed: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Read-only view polled by the presentation layer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<E, O> {
    pub entity: E,
    pub obstacles: Vec<O>,
    pub score: f64,
    pub best: u64,
    pub running: bool,
    pub power_ups: Vec<PowerUp>,
    pub playfield: Playfield,
}
