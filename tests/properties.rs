//! Property tests for round math and the round engine

use clickaway::difficulty::Difficulty;
use clickaway::history::{History, HistoryEntry, MAX_HISTORY_ENTRIES};
use clickaway::rewards::round_coins;
use clickaway::sim::math;
use clickaway::sim::{GameState, KeyPress, PowerUpKind, RoundPhase};
use glam::{UVec2, Vec2};
use proptest::prelude::*;

const ARENA: UVec2 = UVec2::new(600, 400);

#[derive(Debug, Clone)]
enum Action {
    Hit,
    Miss(f32, f32),
    Key(u8),
    Wait(u64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::Hit),
        2 => (0.0f32..600.0, 0.0f32..400.0).prop_map(|(x, y)| Action::Miss(x, y)),
        1 => (0u8..5).prop_map(Action::Key),
        1 => (0u64..1500).prop_map(Action::Wait),
    ]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
    ]
}

fn entry(score: u32) -> HistoryEntry {
    HistoryEntry {
        id: format!("r-{}", score),
        played_at: String::new(),
        played_at_ms: 0.0,
        score,
        hits: score,
        misses: 0,
        best_streak: 0,
        accuracy: "100%".to_string(),
        coins_earned: 0,
        difficulty_id: "normal".to_string(),
    }
}

proptest! {
    #[test]
    fn combo_multiplier_is_monotonic(streak in 0u32..10_000, step in 1u32..50) {
        let here = math::combo_multiplier(streak, step);
        prop_assert!(here >= 1);
        prop_assert!(math::combo_multiplier(streak + 1, step) >= here);
    }

    #[test]
    fn accuracy_is_a_whole_percentage(hits in 0u32..100_000, misses in 0u32..100_000) {
        let text = math::format_accuracy(hits, misses);
        let value: u32 = text.trim_end_matches('%').parse().unwrap();
        prop_assert!(value <= 100);
        if hits + misses == 0 {
            prop_assert_eq!(text, "0%");
        }
    }

    #[test]
    fn shrink_never_grows_or_undershoots(
        difficulty in difficulty(),
        steps in 0usize..300,
    ) {
        let params = difficulty.params();
        let mut size = params.initial_button_size;
        for _ in 0..steps {
            let next = math::next_target_size(size, params.shrink_factor, params.min_button_size);
            prop_assert!(next <= size);
            prop_assert!(next >= params.min_button_size);
            size = next;
        }
    }

    #[test]
    fn random_position_stays_in_arena(seed in any::<u64>(), size in 0u32..700) {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
        let pos = math::random_position(&mut rng, ARENA, size);
        prop_assert!(pos.x + size.min(ARENA.x) <= ARENA.x);
        prop_assert!(pos.y + size.min(ARENA.y) <= ARENA.y);
    }

    #[test]
    fn coins_are_never_negative(clicks in 0u32..10_000, mult in -10.0f64..10.0) {
        let coins = round_coins(clicks, mult);
        prop_assert!(coins <= (clicks as f64 * mult.max(0.0)).floor() as u64);
    }

    #[test]
    fn history_is_bounded_and_latest_first(scores in prop::collection::vec(0u32..1000, 0..120)) {
        let mut history = History::new();
        for &score in &scores {
            history.push(entry(score));
            prop_assert_eq!(history.latest().map(|e| e.score), Some(score));
        }
        prop_assert_eq!(history.len(), scores.len().min(MAX_HISTORY_ENTRIES));
    }

    #[test]
    fn round_invariants_hold_under_any_input(
        difficulty in difficulty(),
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 0..200),
    ) {
        let params = *difficulty.params();
        let mut state = GameState::new(difficulty, ARENA, seed);
        state.start_round().unwrap();
        state.advance(3_000);
        prop_assert_eq!(state.phase(), RoundPhase::Playing);

        for action in actions {
            let before = state.round().clone();
            let mut boosted = false;
            match action {
                Action::Hit => {
                    let center = state.round().target_center();
                    let _ = state.pointer_down(center);
                }
                Action::Miss(x, y) => {
                    let _ = state.pointer_down(Vec2::new(x, y));
                }
                Action::Key(k) => {
                    let used = state.key_down(&KeyPress::new(k.to_string()));
                    boosted = used == Ok(PowerUpKind::TimeBoost);
                }
                Action::Wait(ms) => state.advance(ms),
            }

            let round = state.round();
            prop_assert!(round.best_streak >= round.streak);
            prop_assert!(round.best_streak >= before.best_streak);
            prop_assert!(round.target_size >= params.min_button_size);
            prop_assert!(round.target_size <= params.initial_button_size);
            prop_assert!(round.hits >= before.hits && round.misses >= before.misses);
            if boosted {
                prop_assert!(round.time_left <= params.max_time_buffer_seconds);
            }
        }

        // Exactly one summary, whatever happened
        let longest = params.duration_seconds.max(params.max_time_buffer_seconds);
        state.advance(u64::from(longest) * 1_000 + 5_000);
        prop_assert_eq!(state.phase(), RoundPhase::GameOver);
        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, clickaway::sim::RoundEvent::RoundComplete(_)))
            .count();
        prop_assert_eq!(completions, 1);
    }
}
