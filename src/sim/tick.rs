//! Frame driver
//!
//! One loop serves both games. Per frame:
//! clock -> (if running) integrate -> spawn -> advance/prune -> pass scoring
//! -> collision -> (hit) finish run, else power-up decay.
//!
//! The engine never schedules itself; an external scheduler calls
//! [`Engine::step`] at display cadence.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::Clock;
use super::rules::{Rules, Tracked};
use super::state::{GameEvent, Playfield, PowerUpKind, PowerUps, Run, Snapshot};
use super::timers::ExpiryTimers;
use super::{Avoider, Flyer};
use crate::consts::MAX_FRAME_DT;
use crate::highscores::Leaderboard;
use crate::persistence::{Store, best_score_key, leaderboard_key};
use crate::platform;
use crate::tuning::Tuning;

pub type FlyerEngine<S> = Engine<Flyer, S>;
pub type AvoiderEngine<S> = Engine<Avoider, S>;

/// A self-contained game: rules, current Run, persistence and clock
pub struct Engine<R: Rules, S: Store> {
    rules: R,
    store: S,
    rng: Pcg32,
    clock: Clock,
    field: Playfield,
    run: Run<R::Entity, R::Obstacle>,
    best: u64,
    timers: ExpiryTimers,
    events: Vec<GameEvent>,
    wall_clock: fn() -> i64,
}

impl<R: Rules, S: Store> Engine<R, S> {
    /// Create an idle engine. The persisted best score is read immediately;
    /// unreadable values fall back to 0.
    pub fn new(rules: R, store: S, seed: u64) -> Self {
        let best = load_best(&rules, &store);
        let run = Run::new(
            0,
            rules.spawn_entity(),
            rules.first_spawn_delay(),
            PowerUps::new(rules.power_ups()),
        );
        Self {
            field: rules.default_playfield(),
            rules,
            store,
            rng: Pcg32::seed_from_u64(seed),
            clock: Clock::new(MAX_FRAME_DT),
            run,
            best,
            timers: ExpiryTimers::new(),
            events: Vec::new(),
            wall_clock: platform::unix_millis,
        }
    }

    /// Override the frame delta ceiling (seconds)
    pub fn with_max_frame_dt(mut self, max_dt: f32) -> Self {
        self.clock = Clock::new(max_dt);
        self
    }

    /// Override the source of leaderboard timestamps
    pub fn with_wall_clock(mut self, wall_clock: fn() -> i64) -> Self {
        self.wall_clock = wall_clock;
        self
    }

    /// Discard the current Run and begin a fresh one
    pub fn start(&mut self) {
        let generation = self.run.generation + 1;
        self.timers.clear();
        self.run = Run::new(
            generation,
            self.rules.spawn_entity(),
            self.rules.first_spawn_delay(),
            PowerUps::new(self.rules.power_ups()),
        );
        self.run.running = true;
        self.events.push(GameEvent::Start);
        log::info!("{} run {} started", self.rules.name(), generation);
    }

    /// End the Run without recording it
    pub fn stop(&mut self) {
        if !self.run.running {
            return;
        }
        self.run.running = false;
        self.timers.clear();
        log::info!(
            "{} run {} stopped at score {:.0}",
            self.rules.name(),
            self.run.generation,
            self.run.score
        );
    }

    /// Advance the simulation to `now` (ms, monotonic)
    pub fn step(&mut self, now: f64) {
        // The clock runs even when idle so a resumed run never sees a stale gap
        let dt = self.clock.tick(now);
        self.fire_timers(now);

        if self.run.running {
            self.advance_run(dt);
        }
    }

    /// Flap. Ignored while no Run is active.
    pub fn inject_impulse(&mut self) {
        if !self.run.running {
            return;
        }
        match self.rules.impulse(&self.run.entity) {
            Some(entity) => {
                self.run.entity = entity;
                self.events.push(GameEvent::Flap);
            }
            None => log::debug!("{} has no impulse control", self.rules.name()),
        }
    }

    /// Move the entity to a horizontal fraction of the playfield (clamped to 0..=1)
    pub fn inject_lateral_position(&mut self, fraction: f32) {
        if !self.run.running {
            return;
        }
        match self.rules.reposition(&self.run.entity, fraction) {
            Some(entity) => self.run.entity = entity,
            None => log::debug!("{} has no lateral control", self.rules.name()),
        }
    }

    /// Request a power-up. Returns false when the request was ignored
    /// (no Run, unknown kind, or still cooling down).
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> bool {
        if !self.run.running {
            return false;
        }
        let Some(timing) = self.rules.power_up_timing(kind) else {
            log::debug!("{} has no {} power-up", self.rules.name(), kind.as_str());
            return false;
        };
        if !self.run.power_ups.activate(kind, timing.cooldown_secs) {
            return false;
        }
        self.timers.schedule(
            self.run.generation,
            kind,
            self.clock.last(),
            timing.effect_secs,
        );
        self.events.push(GameEvent::PowerUp(kind));
        true
    }

    /// Resize the playfield. Degenerate sizes are rejected.
    pub fn set_playfield(&mut self, width: f32, height: f32) -> bool {
        match Playfield::new(width, height) {
            Some(field) => {
                self.field = field;
                true
            }
            None => {
                log::warn!("Ignoring invalid playfield size {width}x{height}");
                false
            }
        }
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<R::Entity, R::Obstacle> {
        Snapshot {
            entity: self.run.entity.clone(),
            obstacles: self.run.obstacles.clone(),
            score: self.run.score,
            best: self.best,
            running: self.run.running,
            power_ups: self.run.power_ups.to_vec(),
            playfield: self.field,
        }
    }

    /// Persisted leaderboard (empty when missing or unreadable)
    pub fn leaderboard(&self) -> Leaderboard {
        let key = leaderboard_key(self.rules.name());
        match self.store.get_list(&key) {
            Ok(Some(entries)) => Leaderboard::from_entries(entries),
            Ok(None) => Leaderboard::new(),
            Err(e) => {
                log::warn!("Ignoring unreadable {key}: {e}");
                Leaderboard::new()
            }
        }
    }

    pub fn run(&self) -> &Run<R::Entity, R::Obstacle> {
        &self.run
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn playfield(&self) -> &Playfield {
        &self.field
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    pub fn score(&self) -> f64 {
        self.run.score
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Apply due expiry timers that still belong to the current Run
    fn fire_timers(&mut self, now: f64) {
        for expiry in self.timers.take_due(now) {
            if expiry.generation != self.run.generation {
                continue;
            }
            self.run.power_ups.deactivate(expiry.kind);
        }
    }

    fn advance_run(&mut self, dt: f32) {
        let sim_dt = if self.run.power_ups.is_active(PowerUpKind::Slow) {
            dt * self.rules.slow_mo_time_scale()
        } else {
            dt
        };
        let score = self.run.score;

        self.run.entity = self.rules.integrate(&self.run.entity, sim_dt, &self.field);

        self.run.spawn_remaining -= sim_dt;
        let spawned = if self.run.spawn_remaining <= 0.0 {
            self.run.spawn_remaining = self.rules.spawn_interval(score);
            let id = self.run.next_obstacle_id();
            Some(
                self.rules
                    .spawn_obstacle(id, score, &self.field, &mut self.rng),
            )
        } else {
            None
        };

        // Next obstacle set is built from the previous one, never edited in place
        let mut passed = 0u32;
        let obstacles: Vec<R::Obstacle> = self
            .run
            .obstacles
            .iter()
            .chain(spawned.iter())
            .filter_map(|o| self.rules.advance(o, sim_dt, score))
            .map(|o| match self.rules.pass(&self.run.entity, &o) {
                Some(flagged) => {
                    passed += 1;
                    flagged
                }
                None => o,
            })
            .collect();
        self.run
            .absorbed
            .retain(|id| obstacles.iter().any(|o| o.id() == *id));
        self.run.obstacles = obstacles;

        // Survival points accrue on real time, Slow-mo does not dilute them
        self.run.score += passed as f64 + self.rules.survival_points(dt);
        self.run.elapsed += dt;
        self.events
            .extend(std::iter::repeat_n(GameEvent::Point, passed as usize));

        let hit_ids: Vec<u32> = self
            .run
            .obstacles
            .iter()
            .filter(|o| !self.run.absorbed.contains(&o.id()))
            .filter(|o| self.rules.hits(&self.run.entity, o, &self.field))
            .map(|o| o.id())
            .collect();
        let collided =
            self.rules.out_of_bounds(&self.run.entity, &self.field) || !hit_ids.is_empty();

        if collided {
            if self.run.power_ups.deactivate(PowerUpKind::Shield) {
                self.run.absorbed.extend(hit_ids);
                self.events.push(GameEvent::ShieldAbsorbed);
                log::debug!("{} shield absorbed a hit", self.rules.name());
            } else {
                self.finish_run();
                return;
            }
        }

        self.run.power_ups.decay(dt);
    }

    /// Collision ended the Run: record best and leaderboard
    fn finish_run(&mut self) {
        self.run.running = false;
        self.timers.clear();
        self.events.push(GameEvent::Hit);

        let name = self.rules.name();
        let final_score = self.run.score.round().max(0.0) as u64;
        self.best = self.best.max(final_score);

        // Written every time, even when unchanged
        if let Err(e) = self
            .store
            .set_number(&best_score_key(name), self.best as f64)
        {
            log::warn!("Could not save best score for {name}: {e}");
        }

        if self.rules.keeps_leaderboard() {
            let mut board = self.leaderboard();
            let rank = board.record(final_score, (self.wall_clock)());
            match self.store.set_list(&leaderboard_key(name), board.entries()) {
                Ok(()) => {
                    if let Some(rank) = rank {
                        log::info!("{name} leaderboard: score {final_score} ranked #{rank}");
                    }
                }
                Err(e) => log::warn!("Could not save leaderboard for {name}: {e}"),
            }
        }

        log::info!(
            "{name} run {} over: score {final_score}, best {}",
            self.run.generation,
            self.best
        );
    }
}

impl<S: Store> Engine<Flyer, S> {
    /// Engine A configured from a balance sheet
    pub fn flyer(tuning: &Tuning, store: S, seed: u64) -> Self {
        Engine::new(Flyer::new(tuning.flyer.clone()), store, seed)
            .with_max_frame_dt(tuning.max_frame_dt)
    }
}

impl<S: Store> Engine<Avoider, S> {
    /// Engine B configured from a balance sheet
    pub fn avoider(tuning: &Tuning, store: S, seed: u64) -> Self {
        Engine::new(Avoider::new(tuning.avoider.clone()), store, seed)
            .with_max_frame_dt(tuning.max_frame_dt)
    }
}

fn load_best<R: Rules, S: Store>(rules: &R, store: &S) -> u64 {
    let key = best_score_key(rules.name());
    match store.get_number(&key) {
        Ok(Some(n)) if n > 0.0 => n.round() as u64,
        Ok(_) => 0,
        Err(e) => {
            log::warn!("Ignoring unreadable {key}: {e}");
            0
        }
    }
}
