//! Lasso Panic headless demo
//!
//! Plays one session with the autopilot at a fixed 60 Hz step and logs the
//! result. Usage: `lasso-panic [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use lasso_panic::catalog::TextureCatalog;
    use lasso_panic::platform::{default_audio, default_store, random_seed};
    use lasso_panic::sim::{Autopilot, Session, SessionPhase};
    use lasso_panic::tuning::Tuning;
    use lasso_panic::ui::{HudSink, LogHud};

    /// Simulation step
    const DT: f32 = 1.0 / 60.0;
    /// Seconds the autopilot plays before letting go
    const DEMO_PLAY_SEC: f32 = 45.0;
    /// Give up on tunings that never drain
    const DEMO_LIMIT_SEC: f32 = 600.0;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lasso Panic (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::error!("Bad tuning file {}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => Tuning::default(),
    };

    let seed = random_seed();
    let mut session = match Session::new(
        tuning,
        TextureCatalog::builtin(),
        seed,
        default_audio(),
        default_store(),
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Session initialized with seed: {}", seed);

    let mut pilot = Autopilot::new();
    let mut hud = LogHud::new();

    while session.phase() != SessionPhase::GameOver {
        if session.elapsed_sec() < DEMO_PLAY_SEC {
            pilot.step(&mut session, DT);
        }
        session.update(DT);
        for event in session.drain_events() {
            hud.on_event(&event);
        }
        hud.update(&session.snapshot());
        if session.elapsed_sec() >= DEMO_LIMIT_SEC {
            log::warn!("Demo stopped after {:.0}s without a game over", DEMO_LIMIT_SEC);
            break;
        }
    }

    if let Some(summary) = session.game_over_summary() {
        log::info!(
            "Demo finished: {} gestures, score {}, survived {:.1}s",
            pilot.gestures(),
            summary.score,
            summary.elapsed_sec
        );
    }
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `platform::WebGame`, this is just to satisfy the compiler
}
