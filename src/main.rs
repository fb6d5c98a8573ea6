//! Twin Arcade headless demo
//!
//! Plays both games with the demo pilots at display cadence and reports the
//! results. Scores persist to a JSON file between invocations.
//!
//! Environment:
//! - `TWIN_ARCADE_TUNING`: path to a tuning JSON file (defaults built in)
//! - `TWIN_ARCADE_STORE`: score file (default `twin-arcade-scores.json`)
//! - `TWIN_ARCADE_SEED`: RNG seed (default: wall clock)
//! - `TWIN_ARCADE_SECONDS`: simulated seconds per game (default 60)

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::env;

    use twin_arcade::autopilot::{AvoiderPilot, FlyerPilot};
    use twin_arcade::persistence::JsonFileStore;
    use twin_arcade::platform;
    use twin_arcade::sim::Rules;
    use twin_arcade::{AvoiderEngine, Engine, FlyerEngine, GameEvent, Store, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEFAULT_STORE: &str = "twin-arcade-scores.json";
    const DEFAULT_SECONDS: f64 = 60.0;

    /// Totals for one game's session
    #[derive(Debug, Default)]
    struct Session {
        runs: Vec<u64>,
        flaps: usize,
        power_ups: usize,
        absorbed: usize,
    }

    fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
        let raw = env::var(name).ok()?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring unparseable {name}={raw}");
                None
            }
        }
    }

    fn load_tuning() -> Tuning {
        let Ok(path) = env::var("TWIN_ARCADE_TUNING") else {
            return Tuning::default();
        };
        match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning, {path} rejected: {e}");
                Tuning::default()
            }
        }
    }

    /// Drive `engine` for `seconds` of simulated time, restarting after each crash
    fn play<R, S>(
        engine: &mut Engine<R, S>,
        seconds: f64,
        mut pilot: impl FnMut(&mut Engine<R, S>),
    ) -> Session
    where
        R: Rules,
        S: Store,
    {
        let mut session = Session::default();
        let frames = (seconds * 1000.0 / FRAME_MS).ceil() as u64;

        engine.start();
        for frame in 0..frames {
            pilot(engine);
            engine.step(frame as f64 * FRAME_MS);

            for event in engine.drain_events() {
                match event {
                    GameEvent::Hit => session.runs.push(engine.score().round() as u64),
                    GameEvent::Flap => session.flaps += 1,
                    GameEvent::PowerUp(_) => session.power_ups += 1,
                    GameEvent::ShieldAbsorbed => session.absorbed += 1,
                    GameEvent::Start | GameEvent::Point => {}
                }
            }
            if !engine.is_running() {
                engine.start();
            }
        }
        // The run still in flight is abandoned, not recorded
        engine.stop();
        session
    }

    fn report<R: Rules, S: Store>(engine: &Engine<R, S>, session: &Session) {
        let name = engine.rules().name();
        let top = session.runs.iter().max().copied().unwrap_or(0);
        log::info!(
            "{name}: {} finished runs, session top {top}, all-time best {}",
            session.runs.len(),
            engine.best()
        );
        log::debug!(
            "{name}: {} flaps, {} power-ups, {} hits absorbed",
            session.flaps,
            session.power_ups,
            session.absorbed
        );
    }

    pub fn run() {
        env_logger::init();
        log::info!("Twin Arcade (headless) starting...");

        let tuning = load_tuning();
        let store_path = env::var("TWIN_ARCADE_STORE").unwrap_or_else(|_| DEFAULT_STORE.into());
        let seed = env_parse::<u64>("TWIN_ARCADE_SEED")
            .unwrap_or_else(|| platform::unix_millis().unsigned_abs());
        let seconds = env_parse::<f64>("TWIN_ARCADE_SECONDS")
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SECONDS);
        log::info!("Seed {seed}, {seconds}s per game, scores in {store_path}");

        let mut store = JsonFileStore::open(&store_path);

        {
            let mut flyer = FlyerEngine::flyer(&tuning, &mut store, seed);
            let pilot = FlyerPilot::default();
            let session = play(&mut flyer, seconds, |e| pilot.act(e));
            report(&flyer, &session);
        }

        let mut avoider = AvoiderEngine::avoider(&tuning, &mut store, seed.wrapping_add(1));
        let pilot = AvoiderPilot::default();
        let session = play(&mut avoider, seconds, |e| pilot.act(e));
        report(&avoider, &session);

        let board = avoider.leaderboard();
        println!("\nAvoider leaderboard ({} runs kept)", board.len());
        for (i, record) in board.top(10).iter().enumerate() {
            println!("{:>3}. {:>6}  @ {}", i + 1, record.score, record.timestamp);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
