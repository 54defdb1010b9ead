//! Round state and core engine types
//!
//! Everything a round needs lives in [`GameState`]: the scoring aggregate,
//! the target, feedback markers, timer handles and the seeded RNG.

use std::fmt;

use glam::{UVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::math;
use super::powerup::{PowerUpCharges, PowerUpKind};
use super::timers::{Scheduler, TimerId, TimerKind};
use crate::consts::*;
use crate::difficulty::Difficulty;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Waiting for the player to start
    Ready,
    /// Pre-round countdown
    Countdown,
    /// Clock running, clicks count
    Playing,
    /// Round finished, summary shown
    GameOver,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Ready => "ready",
            RoundPhase::Countdown => "countdown",
            RoundPhase::Playing => "playing",
            RoundPhase::GameOver => "game_over",
        }
    }

    /// Difficulty may only change outside an active round
    pub fn allows_difficulty_change(&self) -> bool {
        matches!(self, RoundPhase::Ready | RoundPhase::GameOver)
    }
}

/// Scoring aggregate for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Difficulty locked in when the round started
    pub difficulty: Difficulty,
    pub countdown: u32,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub hits: u32,
    pub misses: u32,
    pub powerups_used: u32,
    /// Target edge length in pixels
    pub target_size: u32,
    /// Target top-left corner, arena-relative
    pub target_pos: UVec2,
    /// Seconds left on the clock
    pub time_left: u32,
    pub charges: PowerUpCharges,
}

impl Round {
    /// Fresh round for `difficulty` with the target centered in `arena`
    pub fn new(difficulty: Difficulty, arena: UVec2) -> Self {
        let params = difficulty.params();
        Self {
            difficulty,
            countdown: READY_COUNTDOWN_START,
            score: 0,
            streak: 0,
            best_streak: 0,
            hits: 0,
            misses: 0,
            powerups_used: 0,
            target_size: params.initial_button_size,
            target_pos: math::centered_position(arena, params.initial_button_size),
            time_left: params.duration_seconds,
            charges: PowerUpCharges::default(),
        }
    }

    /// Multiplier the current streak earns
    pub fn combo_multiplier(&self) -> u32 {
        math::combo_multiplier(self.streak, self.difficulty.params().combo_step)
    }

    pub fn accuracy(&self) -> String {
        math::format_accuracy(self.hits, self.misses)
    }

    /// Center of the target in arena coordinates
    pub fn target_center(&self) -> Vec2 {
        self.target_pos.as_vec2() + Vec2::splat(self.target_size as f32 / 2.0)
    }

    /// Whether an arena-relative point lands on the (round) target
    pub fn target_contains(&self, point: Vec2) -> bool {
        let radius = self.target_size as f32 / 2.0;
        point.distance_squared(self.target_center()) <= radius * radius
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            clicks_scored: self.hits,
            hits: self.hits,
            misses: self.misses,
            score: self.score,
            best_streak: self.best_streak,
            powerups_used: self.powerups_used,
            difficulty: self.difficulty,
            coin_multiplier: self.difficulty.params().coin_multiplier,
        }
    }
}

/// Results handed to the host when a round ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Hits that count toward coins
    pub clicks_scored: u32,
    pub hits: u32,
    pub misses: u32,
    pub score: u32,
    pub best_streak: u32,
    pub powerups_used: u32,
    #[serde(rename = "difficulty_id")]
    pub difficulty: Difficulty,
    pub coin_multiplier: f64,
}

impl RoundSummary {
    pub fn accuracy(&self) -> String {
        math::format_accuracy(self.hits, self.misses)
    }
}

/// Feedback tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Short-lived marker drawn where something happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: u64,
    /// Arena-relative position
    pub pos: Vec2,
    pub text: String,
    pub polarity: Polarity,
}

/// Things the host may want to react to (sounds, overlays, persistence)
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    PhaseChanged { from: RoundPhase, to: RoundPhase },
    Hit { points: u32, streak: u32 },
    Miss { penalty: u32 },
    PowerUpGranted(PowerUpKind),
    PowerUpUsed(PowerUpKind),
    /// Fired exactly once per round, on entering game over
    RoundComplete(RoundSummary),
}

/// Why a round operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    /// Only valid while the clock is running
    NotPlaying(RoundPhase),
    /// Not allowed during countdown or play
    RoundInProgress(RoundPhase),
    /// Auto-repeat key events are ignored
    KeyRepeat,
    /// Key is not bound to a power-up
    UnmappedKey,
    /// No charge left for this power-up
    NoCharge(PowerUpKind),
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPlaying(phase) => write!(f, "round is not playing ({})", phase.as_str()),
            Self::RoundInProgress(phase) => {
                write!(f, "not allowed while the round is in {}", phase.as_str())
            }
            Self::KeyRepeat => write!(f, "key repeat ignored"),
            Self::UnmappedKey => write!(f, "key is not bound to a power-up"),
            Self::NoCharge(kind) => write!(f, "no {} charges available", kind.id()),
        }
    }
}

impl std::error::Error for RoundError {}

/// Recorded timer handles, cleared whenever a round is reset
#[derive(Debug, Clone, Default)]
pub(crate) struct TimerSlots {
    pub countdown: Option<TimerId>,
    pub round: Option<TimerId>,
    pub shake: Option<TimerId>,
    pub freeze: Option<TimerId>,
}

/// Complete engine state for the game view
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) phase: RoundPhase,
    pub(crate) round: Round,
    /// Difficulty the next round will use
    pub(crate) selected: Difficulty,
    pub(crate) arena: UVec2,
    pub(crate) feedback: Vec<FeedbackItem>,
    pub(crate) shake_active: bool,
    pub(crate) frozen: bool,
    pub(crate) summary_emitted: bool,
    pub(crate) scheduler: Scheduler,
    pub(crate) timers: TimerSlots,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<RoundEvent>,
    next_feedback_id: u64,
}

impl GameState {
    /// Create an engine in the ready phase
    pub fn new(selected: Difficulty, arena: UVec2, seed: u64) -> Self {
        Self {
            phase: RoundPhase::Ready,
            round: Round::new(selected, arena),
            selected,
            arena,
            feedback: Vec::new(),
            shake_active: false,
            frozen: false,
            summary_emitted: false,
            scheduler: Scheduler::new(),
            timers: TimerSlots::default(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_feedback_id: 1,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.selected
    }

    pub fn arena_size(&self) -> UVec2 {
        self.arena
    }

    pub fn feedback(&self) -> &[FeedbackItem] {
        &self.feedback
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_active
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    pub fn can_change_difficulty(&self) -> bool {
        self.phase.allows_difficulty_change()
    }

    /// Virtual milliseconds elapsed since the engine was created
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn target_label(&self) -> &'static str {
        math::target_label(self.round.target_size)
    }

    pub fn target_label_font_size(&self) -> u32 {
        math::target_label_font_size(self.round.target_size)
    }

    pub fn atmosphere_tier(&self) -> usize {
        math::streak_atmosphere_tier(self.round.streak)
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn arena_center(&self) -> Vec2 {
        self.arena.as_vec2() / 2.0
    }

    /// Add a feedback marker offset from `at` and schedule its removal
    pub(crate) fn push_feedback(&mut self, at: Vec2, text: String, polarity: Polarity) {
        let id = self.next_feedback_id;
        self.next_feedback_id += 1;
        self.feedback.push(FeedbackItem {
            id,
            pos: at + FEEDBACK_OFFSET,
            text,
            polarity,
        });
        self.scheduler.schedule_once(
            TimerKind::FeedbackExpiry { feedback_id: id },
            FEEDBACK_LIFETIME_MS,
        );
    }

    /// Render-ready view of the engine, e.g. for a JS host
    pub fn snapshot(&self) -> GameSnapshot {
        let round = &self.round;
        GameSnapshot {
            phase: self.phase,
            difficulty: round.difficulty,
            selected_difficulty: self.selected,
            countdown: round.countdown,
            score: round.score,
            streak: round.streak,
            best_streak: round.best_streak,
            combo_multiplier: round.combo_multiplier(),
            hits: round.hits,
            misses: round.misses,
            accuracy: round.accuracy(),
            powerups_used: round.powerups_used,
            time_left: round.time_left,
            target: TargetView {
                x: round.target_pos.x,
                y: round.target_pos.y,
                size: round.target_size,
                label: self.target_label().to_string(),
                font_size: self.target_label_font_size(),
            },
            powerups: round
                .charges
                .iter()
                .map(|(kind, charges)| PowerUpView {
                    id: kind.id(),
                    key: kind.key(),
                    label: kind.label(),
                    charges,
                    hint: kind.hint(charges),
                })
                .collect(),
            feedback: self.feedback.clone(),
            shake: self.shake_active,
            frozen: self.frozen,
            atmosphere_tier: self.atmosphere_tier(),
            can_change_difficulty: self.can_change_difficulty(),
        }
    }
}

/// Target placement and label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub label: String,
    pub font_size: u32,
}

/// One power-up tray slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub id: &'static str,
    pub key: &'static str,
    pub label: &'static str,
    pub charges: u32,
    pub hint: String,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: RoundPhase,
    pub difficulty: Difficulty,
    pub selected_difficulty: Difficulty,
    pub countdown: u32,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub combo_multiplier: u32,
    pub hits: u32,
    pub misses: u32,
    pub accuracy: String,
    pub powerups_used: u32,
    pub time_left: u32,
    pub target: TargetView,
    pub powerups: Vec<PowerUpView>,
    pub feedback: Vec<FeedbackItem>,
    pub shake: bool,
    pub frozen: bool,
    pub atmosphere_tier: usize,
    pub can_change_difficulty: bool,
}
