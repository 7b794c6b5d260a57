//! Dino Dash - headless demo
//!
//! Runs an autopilot session at 60 Hz and logs the outcome. Usage:
//!
//! ```text
//! dino-dash [seed] [jump-capacity] [seconds]
//! ```
//!
//! The browser build embeds the library directly; this binary only exists
//! natively.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dino_dash::sim::Autopilot;
    use dino_dash::{GameEvent, GameLoop, MemoryProfile, Profile, Session, Tuning};

    dino_dash::platform::init_logging();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(dino_dash::platform::clock_seed);
    let capacity = args.next().and_then(|s| s.parse::<u8>().ok()).unwrap_or(3);
    let seconds = args.next().and_then(|s| s.parse::<f64>().ok()).unwrap_or(90.0);

    log::info!("Dino Dash (headless) seed={} capacity={} limit={}s", seed, capacity, seconds);

    let mut session = Session::new(MemoryProfile::with_capacity(capacity), Tuning::default(), seed);
    session.resize(800.0, 400.0);
    let mut game = GameLoop::new(session);
    game.restart();

    let pilot = Autopilot::default();
    let mut jumps = 0u32;
    let frames = game.run_headless(0.0, 60.0, seconds, |session| {
        if pilot.decide(session.world()) {
            session.jump();
        }
        for event in session.drain_events() {
            match event {
                GameEvent::Jumped { .. } => jumps += 1,
                GameEvent::NewRecord { score } => log::info!("New record: {}", score),
                _ => {}
            }
        }
    });

    let session = game.session();
    log::info!(
        "Finished after {} frames: phase={:?} elapsed={:.1}s stage={} score={} coins={} jumps={} balance={}",
        frames,
        session.phase(),
        session.elapsed(),
        session.stage().as_str(),
        session.score_points(),
        session.run_coins(),
        jumps,
        session.profile().currency()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is driven from JavaScript through the library
}
