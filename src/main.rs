//! Fruit Catch entry point
//!
//! The browser build is driven from the page through `FruitCatch` (see
//! `platform::web`). Natively this runs one headless round on autopilot.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fruit_catch::consts::FRAME_MS;
    use fruit_catch::sim::{GamePhase, suggest_command};
    use fruit_catch::{GameEngine, Settings, Viewport, platform};

    env_logger::init();
    log::info!("Fruit Catch (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid settings in {}: {}", path, e);
                Settings::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path, e);
                Settings::default()
            }
        },
        None => Settings::load(),
    };

    let seed = platform::clock_seed();
    let mut engine = GameEngine::new(seed, Viewport::new(640.0, 480.0), settings.tuning);
    engine.set_on_time_update(|t| {
        if t % 10 == 0 {
            log::info!("{}s left", t);
        }
    });
    engine.set_on_game_over(|score| println!("Final score: {}", score));

    engine.start();
    while engine.phase() == GamePhase::Playing {
        if let Some(cmd) = suggest_command(engine.state()) {
            engine.input(cmd);
        }
        engine.step(FRAME_MS);
    }

    log::info!(
        "Round over at level {} with {}s left",
        engine.level(),
        engine.time_left()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the exported FruitCatch class, this is just to satisfy the compiler
}
