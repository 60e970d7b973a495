//! Rasta Blasta headless runner
//!
//! Plays one seeded round with a simple tracking bot and logs the outcome.
//! Usage: `rasta-blasta [seed] [max_ticks]`. Set `RUST_LOG=debug` for
//! respawn details. High scores persist under `RASTA_BLASTA_DATA`
//! (default `.rasta-blasta`).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rasta_blasta::Session;
    use rasta_blasta::audio::SoundEffect;
    use rasta_blasta::consts::TICK_MS;
    use rasta_blasta::persistence::FileStore;
    use rasta_blasta::sim::{GameEvent, Mode};
    use rasta_blasta::taunts::BuiltInTaunts;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed_1e55);
    let max_ticks = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60 * 60 * 5);
    let data_dir =
        std::env::var("RASTA_BLASTA_DATA").unwrap_or_else(|_| ".rasta-blasta".to_string());

    log::info!("Rasta Blasta (native) starting, seed {seed}");
    let mut session = Session::new(
        seed,
        Box::new(FileStore::new(data_dir)),
        Box::new(BuiltInTaunts),
    );
    let mixer = session.mixer();

    let mut now_ms = 0.0;
    session.start(now_ms);

    let mut held = (false, false);
    let mut cues = 0usize;
    let mut last_taunt: Option<String> = None;

    while session.mode() == Mode::Playing && session.state().time_ticks < max_ticks {
        // Track the bank's centre, dodge nothing, always fire
        let state = session.state();
        let target = state.bank.pos.x + state.bank.size.x / 2.0;
        let centre = state.player.pos.x + state.player.size.x / 2.0;
        let want = (centre > target + 4.0, centre < target - 4.0);
        for (name, was, now) in [("ArrowLeft", held.0, want.0), ("ArrowRight", held.1, want.1)] {
            if now && !was {
                session.key_down(name);
            } else if was && !now {
                session.key_up(name);
            }
        }
        held = want;
        session.key_down(" ");

        now_ms += TICK_MS;
        session.update(TICK_MS, now_ms);

        for event in session.drain_events() {
            if let GameEvent::BankDestroyed { level } = event {
                log::info!("Bot toppled the bank, now level {level}");
            }
            if SoundEffect::for_event(&event).is_some_and(|e| mixer.gain_for(e).is_some()) {
                cues += 1;
            }
        }

        let taunt = session.snapshot().current_taunt;
        if taunt.is_some() && taunt != last_taunt {
            log::info!("Bank: {}", taunt.as_deref().unwrap_or_default());
        }
        last_taunt = taunt;
    }

    if session.mode() == Mode::EnteringInitials {
        for name in ["B", "O", "T", "Enter"] {
            session.key_down(name);
        }
    }
    if session.mode() == Mode::Playing {
        session.stop();
    }

    let state = session.state();
    log::info!(
        "Finished after {} ticks: score {}, level {}, {} sound cues, mode {:?}",
        state.time_ticks,
        state.score,
        state.level,
        cues,
        state.mode
    );
    if let Some(top) = session.high_scores().top_score() {
        log::info!("Top high score: {top}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Session` directly
}
