//! End-to-end runs through the public engine API

use twin_arcade::persistence::best_score_key;
use twin_arcade::sim::{Avoider, Flyer};
use twin_arcade::tuning::AvoiderTuning;
use twin_arcade::{
    AvoiderEngine, FlyerEngine, GameEvent, MemoryStore, ScoreRecord, Store, StoreError,
};

const FRAME: f64 = 50.0;

fn fixed_time() -> i64 {
    1_700_000_000_000
}

/// Bodies only ever fall along the far right edge
fn right_edge_rain() -> AvoiderTuning {
    AvoiderTuning {
        spawn_x: (0.95, 0.99),
        ..AvoiderTuning::default()
    }
}

/// Bodies only ever fall down the middle
fn center_rain() -> AvoiderTuning {
    AvoiderTuning {
        spawn_x: (0.5, 0.5),
        ..AvoiderTuning::default()
    }
}

/// Step until the current Run ends. Returns the final score.
fn play_until_hit<S: Store>(engine: &mut AvoiderEngine<S>, now: &mut f64) -> f64 {
    for _ in 0..2_000 {
        *now += FRAME;
        engine.step(*now);
        if !engine.is_running() {
            return engine.score();
        }
    }
    panic!("run never ended");
}

#[test]
fn avoider_scores_fifteen_points_per_second() {
    let mut engine = AvoiderEngine::new(Avoider::new(right_edge_rain()), MemoryStore::new(), 7);
    engine.start();
    engine.inject_lateral_position(0.0);
    engine.step(0.0);

    for i in 1..=200 {
        engine.step(i as f64 * FRAME);
    }

    assert!(engine.is_running());
    assert!((engine.score() - 150.0).abs() < 1e-3, "score {}", engine.score());
}

#[test]
fn leaderboard_stays_bounded_and_sorted() {
    let mut store = MemoryStore::new();
    let mut engine =
        AvoiderEngine::new(Avoider::new(center_rain()), &mut store, 11).with_wall_clock(fixed_time);
    let mut now = 0.0;

    for run in 0..60 {
        engine.start();
        // Hide in the corner for a varying stretch, then step into the rain
        engine.inject_lateral_position(0.0);
        for _ in 0..(run % 13) * 4 {
            now += FRAME;
            engine.step(now);
        }
        engine.inject_lateral_position(0.5);
        play_until_hit(&mut engine, &mut now);
    }

    let board = engine.leaderboard();
    assert_eq!(board.len(), 50);
    let scores: Vec<u64> = board.entries().iter().map(|r| r.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
    assert_eq!(board.best(), Some(engine.best()));
    assert!(board.entries().iter().all(|r| r.timestamp == fixed_time()));
}

#[test]
fn best_score_survives_a_new_engine() {
    let mut store = MemoryStore::new();
    let first_best = {
        let mut engine = AvoiderEngine::new(Avoider::new(right_edge_rain()), &mut store, 3);
        let mut now = 0.0;
        engine.start();
        engine.inject_lateral_position(0.0);
        engine.step(now);
        for _ in 0..40 {
            now += FRAME;
            engine.step(now);
        }
        engine.inject_lateral_position(0.97);
        play_until_hit(&mut engine, &mut now);
        engine.best()
    };
    assert!(first_best >= 30);

    let engine = AvoiderEngine::new(Avoider::new(right_edge_rain()), &mut store, 4);
    assert_eq!(engine.best(), first_best);
    drop(engine);
    assert_eq!(
        store.get_number(&best_score_key("avoider")).unwrap(),
        Some(first_best as f64)
    );
}

#[test]
fn flyer_without_input_falls_out_and_records_best() {
    let mut store = MemoryStore::new();
    let mut engine = FlyerEngine::new(Flyer::default(), &mut store, 5);
    engine.start();
    let mut now = 0.0;
    engine.step(now);
    while engine.is_running() && now < 10_000.0 {
        now += FRAME;
        engine.step(now);
    }

    assert!(!engine.is_running());
    // Unaided fall from the start height takes under a second
    assert!(now < 1_500.0, "fell for {now}ms");
    let events = engine.drain_events();
    assert_eq!(events.first(), Some(&GameEvent::Start));
    assert_eq!(events.last(), Some(&GameEvent::Hit));
    drop(engine);
    assert_eq!(store.get_number(&best_score_key("flyer")).unwrap(), Some(0.0));
    assert!(store.get_list("leaderboard:flyer").unwrap().is_none());
}

/// A backend where every operation fails
struct BrokenStore;

impl Store for BrokenStore {
    fn get_number(&self, _key: &str) -> Result<Option<f64>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    fn set_number(&mut self, _key: &str, _value: f64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    fn get_list(&self, _key: &str) -> Result<Option<Vec<ScoreRecord>>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    fn set_list(&mut self, _key: &str, _value: &[ScoreRecord]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
}

#[test]
fn storage_failures_never_stop_play() {
    let mut engine = AvoiderEngine::new(Avoider::new(center_rain()), BrokenStore, 9);
    assert_eq!(engine.best(), 0);

    let mut now = 0.0;
    for _ in 0..3 {
        engine.start();
        engine.inject_lateral_position(0.5);
        play_until_hit(&mut engine, &mut now);
        assert!(engine.drain_events().contains(&GameEvent::Hit));
    }
    assert!(engine.leaderboard().is_empty());
}

/// Counts writes on top of an in-memory map
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    number_writes: usize,
}

impl Store for CountingStore {
    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        self.inner.get_number(key)
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.number_writes += 1;
        self.inner.set_number(key, value)
    }

    fn get_list(&self, key: &str) -> Result<Option<Vec<ScoreRecord>>, StoreError> {
        self.inner.get_list(key)
    }

    fn set_list(&mut self, key: &str, value: &[ScoreRecord]) -> Result<(), StoreError> {
        self.inner.set_list(key, value)
    }
}

#[test]
fn best_is_rewritten_after_every_run() {
    let mut store = CountingStore::default();
    store
        .inner
        .set_number(&best_score_key("avoider"), 1000.0)
        .unwrap();

    let mut engine = AvoiderEngine::new(Avoider::new(center_rain()), &mut store, 2);
    assert_eq!(engine.best(), 1000);

    let mut now = 0.0;
    for _ in 0..4 {
        engine.start();
        engine.inject_lateral_position(0.5);
        play_until_hit(&mut engine, &mut now);
    }
    assert_eq!(engine.best(), 1000);
    drop(engine);

    assert_eq!(store.number_writes, 4);
    assert_eq!(
        store.get_number(&best_score_key("avoider")).unwrap(),
        Some(1000.0)
    );
}

#[test]
fn long_frame_gaps_are_clamped() {
    let mut smooth = FlyerEngine::new(Flyer::default(), MemoryStore::new(), 1);
    let mut stalled = FlyerEngine::new(Flyer::default(), MemoryStore::new(), 1);
    for engine in [&mut smooth, &mut stalled] {
        engine.start();
        engine.step(1_000.0);
    }

    smooth.step(1_050.0);
    // Tab was backgrounded for a minute
    stalled.step(61_000.0);

    assert_eq!(smooth.snapshot().entity, stalled.snapshot().entity);
}

#[test]
fn stop_abandons_without_recording() {
    let mut store = MemoryStore::new();
    let mut engine = AvoiderEngine::new(Avoider::new(right_edge_rain()), &mut store, 8);
    engine.start();
    engine.inject_lateral_position(0.0);
    for i in 0..40 {
        engine.step(i as f64 * FRAME);
    }
    engine.stop();
    assert!(!engine.is_running());
    assert!(engine.leaderboard().is_empty());

    // Stepping an idle engine changes nothing
    let score = engine.score();
    engine.step(10_000.0);
    assert_eq!(engine.score(), score);
    drop(engine);
    assert!(store.get_number(&best_score_key("avoider")).unwrap().is_none());
}
