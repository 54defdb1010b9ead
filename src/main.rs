//! Clickaway entry point
//!
//! On the web the page loads the library and drives `WebGame` directly. Natively this runs one
//! headless round with an auto-player and logs what happened.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use clickaway::App;
    use clickaway::consts::DEFAULT_ARENA_SIZE;
    use clickaway::difficulty::Difficulty;
    use clickaway::platform::{self, SystemClock};
    use clickaway::sim::{GameState, KeyPress, PowerUpKind, RoundPhase, TickInput, tick};

    /// Simulated frame length
    const FRAME_MS: u64 = 50;
    /// Chance per frame that the auto-player clicks
    const CLICK_CHANCE: f64 = 0.35;
    /// Chance a click lands on the target
    const AIM: f64 = 0.85;
    /// Upper bound on simulated time, in case a round never ends
    const MAX_FRAMES: u32 = 20 * 60 * 10;

    /// Auto-player: clicks at random intervals, spends charges as soon as it has them
    fn idle_input(state: &GameState, rng: &mut Pcg32) -> TickInput {
        let mut input = TickInput::default();
        if state.phase() != RoundPhase::Playing {
            return input;
        }

        let round = state.round();
        if let Some(kind) = PowerUpKind::ALL
            .into_iter()
            .find(|kind| round.charges.get(*kind) > 0)
        {
            input.keys.push(KeyPress::new(kind.key()));
        }

        if rng.random_bool(CLICK_CHANCE) {
            let pos = if rng.random_bool(AIM) {
                round.target_center()
            } else {
                // Opposite corner of the arena from the target
                let arena = state.arena_size().as_vec2();
                arena - round.target_center()
            };
            input.pointer_down.push(pos);
        }
        input
    }

    pub fn run(difficulty: Difficulty) {
        let mut app = App::load_default();
        app.login();
        app.select_difficulty(difficulty);

        let seed = platform::time_seed(&SystemClock);
        let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut state = GameState::new(app.selected_difficulty(), DEFAULT_ARENA_SIZE, seed);
        log::info!("Demo round on {} (seed {})", difficulty.label(), seed);

        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        for _ in 0..MAX_FRAMES {
            tick(&mut state, &input, FRAME_MS);
            for entry in app.handle_events(&state.drain_events()) {
                log::info!(
                    "Finished {}: score {}, accuracy {}, best streak {}, +{} coins",
                    entry.played_at,
                    entry.score,
                    entry.accuracy,
                    entry.best_streak,
                    entry.coins_earned
                );
            }
            if state.phase() == RoundPhase::GameOver {
                break;
            }
            input = idle_input(&state, &mut rng);
        }
        state.unmount();

        let stats = app.player_stats();
        log::info!(
            "Profile: {} coins, best score {}, accuracy {}",
            app.coins(),
            stats.best_score,
            stats.accuracy
        );
        for row in app.standings() {
            log::info!(
                "#{} {:<12} {:>4} pts  streak {:>3}  {}",
                row.rank,
                row.username,
                row.best_score,
                row.best_streak,
                row.accuracy
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Clickaway (native) starting...");

    let difficulty = std::env::args()
        .nth(1)
        .map(|id| clickaway::difficulty::Difficulty::from_id(&id))
        .unwrap_or_default();
    demo::run(difficulty);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook, this is just to satisfy the compiler
}
