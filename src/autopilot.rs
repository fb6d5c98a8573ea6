//! Demo bots
//!
//! Simple pilots that drive an engine through its public inputs, the way a
//! player would. Used by the headless demo and for soak tests.

use crate::persistence::Store;
use crate::sim::{
    Avoider, AvoiderEngine, Bird, Dodger, FallingBody, Flyer, FlyerEngine, Gate, Playfield,
    PowerUpKind, Rules,
};

/// Flaps to keep the bird's underside just above the next gap's lower pipe
#[derive(Debug, Clone, Copy)]
pub struct FlyerPilot {
    /// Clearance kept above the lower pipe (px)
    pub clearance: f32,
}

impl Default for FlyerPilot {
    fn default() -> Self {
        Self { clearance: 22.0 }
    }
}

impl FlyerPilot {
    /// Line (px from top) the bird's underside should stay above
    pub fn target_line(&self, flyer: &Flyer, gates: &[Gate], field: &Playfield) -> f32 {
        let t = flyer.tuning();
        let bird_left = t.bird_x * field.width() - t.bird_size.x / 2.0;
        let half_pipe = t.pipe_width / 2.0;

        // Nearest gate whose trailing edge has not yet cleared the bird
        gates
            .iter()
            .filter(|g| g.x * field.width() + half_pipe > bird_left)
            .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
            .map(|g| g.gap_bottom() - self.clearance)
            .unwrap_or(field.height() * 0.6)
    }

    pub fn should_flap(&self, flyer: &Flyer, bird: &Bird, gates: &[Gate], field: &Playfield) -> bool {
        let underside = bird.y * field.height() + flyer.tuning().bird_size.y;
        bird.vy >= 0.0 && underside > self.target_line(flyer, gates, field)
    }

    /// Feed this frame's input to the engine
    pub fn act<S: Store>(&self, engine: &mut FlyerEngine<S>) {
        if !engine.is_running() {
            return;
        }
        let run = engine.run();
        if self.should_flap(engine.rules(), &run.entity, &run.obstacles, engine.playfield()) {
            engine.inject_impulse();
        }
    }
}

/// Slides toward the emptiest lane and spends power-ups when cornered
#[derive(Debug, Clone, Copy)]
pub struct AvoiderPilot {
    /// Candidate lanes across the playfield
    pub lanes: usize,
    /// Largest lateral move per frame (playfield widths)
    pub max_step: f32,
    /// Bodies above this line are ignored
    pub horizon: f32,
    /// Threat count that triggers slow-mo
    pub crowd: usize,
}

impl Default for AvoiderPilot {
    fn default() -> Self {
        Self {
            lanes: 21,
            max_step: 0.05,
            horizon: 0.45,
            crowd: 3,
        }
    }
}

impl AvoiderPilot {
    fn threats<'a>(&self, bodies: &'a [FallingBody]) -> impl Iterator<Item = &'a FallingBody> {
        let horizon = self.horizon;
        bodies.iter().filter(move |b| b.y >= horizon && b.y <= 1.0)
    }

    /// Horizontal fraction the pilot wants to reach
    pub fn choose_lane(
        &self,
        avoider: &Avoider,
        dodger: &Dodger,
        bodies: &[FallingBody],
        field: &Playfield,
    ) -> f32 {
        let t = avoider.tuning();
        let player_half = t.player_size / field.width();
        let lanes = self.lanes.max(2);

        let cost = |x: f32| -> f32 {
            let danger: f32 = self
                .threats(bodies)
                .filter(|b| {
                    let reach = (player_half + b.size / field.height()) * t.overlap;
                    (x - b.x).abs() < reach * 1.25
                })
                .map(|b| b.y)
                .sum();
            danger + 0.1 * (x - dodger.x).abs()
        };

        (0..lanes)
            .map(|i| i as f32 / (lanes - 1) as f32)
            .map(|x| (x, cost(x)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(x, _)| x)
            .unwrap_or(dodger.x)
    }

    /// True when a body will overlap `dodger` within `lookahead` seconds
    pub fn imminent_hit(
        &self,
        avoider: &Avoider,
        dodger: &Dodger,
        bodies: &[FallingBody],
        field: &Playfield,
        lookahead: f32,
    ) -> bool {
        bodies.iter().any(|b| {
            let ahead = FallingBody {
                y: b.y + b.vy * lookahead,
                ..*b
            };
            avoider.hits(dodger, b, field) || avoider.hits(dodger, &ahead, field)
        })
    }

    /// Feed this frame's input to the engine
    pub fn act<S: Store>(&self, engine: &mut AvoiderEngine<S>) {
        if !engine.is_running() {
            return;
        }
        let run = engine.run();
        let field = *engine.playfield();
        let avoider = engine.rules();

        let target = self.choose_lane(avoider, &run.entity, &run.obstacles, &field);
        let x = run.entity.x + (target - run.entity.x).clamp(-self.max_step, self.max_step);
        let moved = Dodger { x };

        let cornered = self.imminent_hit(avoider, &moved, &run.obstacles, &field, 0.1);
        let crowded = self.threats(&run.obstacles).count() >= self.crowd;

        engine.inject_lateral_position(x);
        if cornered && engine.activate_power_up(PowerUpKind::Shield) {
            log::debug!("Pilot raised shield at x={x:.2}");
        }
        if crowded && engine.activate_power_up(PowerUpKind::Slow) {
            log::debug!("Pilot triggered slow-mo");
        }
    }
}
