//! Round transitions and timer-driven ticks
//!
//! All mutations of a [`GameState`] happen here, either from player input
//! or from a timer coming due inside [`tick`].

use glam::{UVec2, Vec2};

use super::math;
use super::powerup::PowerUpKind;
use super::state::{GameState, Polarity, Round, RoundError, RoundEvent, RoundPhase};
use super::timers::{Fired, TimerKind};
use crate::consts::*;
use crate::difficulty::Difficulty;

/// A key press as delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    /// Auto-repeat from a held key
    pub repeat: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            repeat: false,
        }
    }
}

/// Input gathered since the previous tick (one-shot)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start (or restart) a round
    pub start: bool,
    /// Presses inside the arena, arena-relative, oldest first
    pub pointer_down: Vec<Vec2>,
    /// Key presses, oldest first
    pub keys: Vec<KeyPress>,
    pub select_difficulty: Option<Difficulty>,
    /// Arena was resized
    pub arena_size: Option<UVec2>,
}

/// Apply queued input, then advance virtual time by `dt_ms`
///
/// Rejected inputs are logged and otherwise ignored.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    if let Some(size) = input.arena_size {
        state.set_arena_size(size);
    }
    if let Some(difficulty) = input.select_difficulty {
        if let Err(err) = state.select_difficulty(difficulty) {
            log::debug!("Difficulty change rejected: {}", err);
        }
    }
    if input.start {
        if let Err(err) = state.start_round() {
            log::debug!("Start rejected: {}", err);
        }
    }
    for &pos in &input.pointer_down {
        if let Err(err) = state.pointer_down(pos) {
            log::debug!("Press at {} ignored: {}", pos, err);
        }
    }
    for key in &input.keys {
        if let Err(err) = state.key_down(key) {
            log::debug!("Key '{}' ignored: {}", key.key, err);
        }
    }

    state.advance(dt_ms);
}

impl GameState {
    /// Advance virtual time, firing every timer that comes due on the way
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.scheduler.now_ms() + dt_ms;
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.on_timer(fired);
        }
        self.scheduler.advance_to(until);
    }

    /// Begin a new round with the selected difficulty (ready or game over only)
    pub fn start_round(&mut self) -> Result<(), RoundError> {
        if !self.phase.allows_difficulty_change() {
            return Err(RoundError::RoundInProgress(self.phase));
        }

        self.reset_timers();
        self.round = Round::new(self.selected, self.arena);
        self.feedback.clear();
        self.shake_active = false;
        self.frozen = false;
        self.summary_emitted = false;

        self.set_phase(RoundPhase::Countdown);
        self.timers.countdown = Some(
            self.scheduler
                .schedule_repeating(TimerKind::CountdownTick, TIMER_TICK_MS),
        );
        Ok(())
    }

    /// Choose the difficulty for the next round
    ///
    /// In the ready phase the idle round is rebuilt immediately. After game
    /// over the summary stays untouched and the choice applies on restart.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), RoundError> {
        match self.phase {
            RoundPhase::Countdown | RoundPhase::Playing => {
                Err(RoundError::RoundInProgress(self.phase))
            }
            RoundPhase::Ready => {
                self.selected = difficulty;
                self.round = Round::new(difficulty, self.arena);
                Ok(())
            }
            RoundPhase::GameOver => {
                self.selected = difficulty;
                Ok(())
            }
        }
    }

    /// Resize the arena and keep the target inside it
    pub fn set_arena_size(&mut self, size: UVec2) {
        self.arena = size;
        let round = &mut self.round;
        round.target_pos = match self.phase {
            RoundPhase::Ready | RoundPhase::Countdown => {
                math::centered_position(size, round.target_size)
            }
            RoundPhase::Playing | RoundPhase::GameOver => {
                math::clamp_position(round.target_pos, size, round.target_size)
            }
        };
    }

    /// Classify a press inside the arena as a hit or a miss
    ///
    /// Returns `Ok(true)` for a hit.
    pub fn pointer_down(&mut self, pos: Vec2) -> Result<bool, RoundError> {
        if !self.is_playing() {
            return Err(RoundError::NotPlaying(self.phase));
        }
        if self.round.target_contains(pos) {
            self.hit_target(pos)?;
            Ok(true)
        } else {
            self.miss(pos)?;
            Ok(false)
        }
    }

    /// Register a hit on the target at `pos`
    pub fn hit_target(&mut self, pos: Vec2) -> Result<(), RoundError> {
        if !self.is_playing() {
            return Err(RoundError::NotPlaying(self.phase));
        }

        let params = self.round.difficulty.params();
        let round = &mut self.round;
        round.streak += 1;
        round.hits += 1;
        let points =
            params.base_points_per_hit * math::combo_multiplier(round.streak, params.combo_step);
        round.score += points;
        round.best_streak = round.best_streak.max(round.streak);
        let streak = round.streak;

        self.push_feedback(pos, format!("+{}", points), Polarity::Positive);
        self.events.push(RoundEvent::Hit { points, streak });

        for kind in PowerUpKind::ALL {
            if kind.awards_at(streak) {
                self.round.charges.grant(kind);
                let center = self.arena_center();
                self.push_feedback(center, format!("{}+", kind.key()), Polarity::Positive);
                self.events.push(RoundEvent::PowerUpGranted(kind));
            }
        }

        self.round.target_size = math::next_target_size(
            self.round.target_size,
            params.shrink_factor,
            params.min_button_size,
        );
        self.reposition_target();
        Ok(())
    }

    /// Register a press inside the arena that missed the target
    pub fn miss(&mut self, pos: Vec2) -> Result<(), RoundError> {
        if !self.is_playing() {
            return Err(RoundError::NotPlaying(self.phase));
        }

        let penalty = self.round.difficulty.params().miss_penalty;
        let round = &mut self.round;
        round.streak = 0;
        round.misses += 1;
        round.score = round.score.saturating_sub(penalty);

        self.trigger_shake();

        let text = if penalty > 0 {
            format!("-{}", penalty)
        } else {
            "Miss".to_string()
        };
        self.push_feedback(pos, text, Polarity::Negative);
        self.events.push(RoundEvent::Miss { penalty });
        Ok(())
    }

    /// Spend a power-up charge bound to a key
    pub fn key_down(&mut self, key: &KeyPress) -> Result<PowerUpKind, RoundError> {
        if key.repeat {
            return Err(RoundError::KeyRepeat);
        }
        if !self.is_playing() {
            return Err(RoundError::NotPlaying(self.phase));
        }
        let kind = PowerUpKind::from_key(&key.key).ok_or(RoundError::UnmappedKey)?;
        self.use_powerup(kind)?;
        Ok(kind)
    }

    /// Spend one charge of `kind` and apply its effect
    pub fn use_powerup(&mut self, kind: PowerUpKind) -> Result<(), RoundError> {
        if !self.is_playing() {
            return Err(RoundError::NotPlaying(self.phase));
        }
        if !self.round.charges.consume(kind) {
            return Err(RoundError::NoCharge(kind));
        }
        self.round.powerups_used += 1;

        let params = self.round.difficulty.params();
        let text = match kind {
            PowerUpKind::TimeBoost => {
                self.round.time_left = (self.round.time_left + TIME_BOOST_SECONDS)
                    .min(params.max_time_buffer_seconds);
                format!("+{}s", TIME_BOOST_SECONDS)
            }
            PowerUpKind::SizeBoost => {
                self.round.target_size =
                    (self.round.target_size + SIZE_BOOST_PIXELS).min(params.initial_button_size);
                self.reposition_target();
                "Grow".to_string()
            }
            PowerUpKind::FreezeMovement => {
                self.frozen = true;
                self.scheduler.cancel_slot(&mut self.timers.freeze);
                self.timers.freeze = Some(
                    self.scheduler
                        .schedule_once(TimerKind::FreezeEnd, FREEZE_MOVEMENT_DURATION_MS),
                );
                "Freeze".to_string()
            }
        };

        log::debug!("Power-up {} used", kind.id());
        let center = self.arena_center();
        self.push_feedback(center, text, Polarity::Positive);
        self.events.push(RoundEvent::PowerUpUsed(kind));
        Ok(())
    }

    /// Tear down: cancel every timer so nothing fires into a dead view
    pub fn unmount(&mut self) {
        self.reset_timers();
        self.feedback.clear();
        self.shake_active = false;
        self.frozen = false;
    }

    fn reset_timers(&mut self) {
        self.scheduler.cancel_all();
        self.timers = Default::default();
    }

    /// Move the target somewhere random; while frozen only pull it back inside the arena
    fn reposition_target(&mut self) {
        let round = &mut self.round;
        round.target_pos = if self.frozen {
            math::clamp_position(round.target_pos, self.arena, round.target_size)
        } else {
            math::random_position(&mut self.rng, self.arena, round.target_size)
        };
    }

    fn trigger_shake(&mut self) {
        self.scheduler.cancel_slot(&mut self.timers.shake);
        self.shake_active = true;
        self.timers.shake = Some(
            self.scheduler
                .schedule_once(TimerKind::ShakeEnd, SHAKE_DURATION_MS),
        );
    }

    fn set_phase(&mut self, to: RoundPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Round phase {} -> {}", from.as_str(), to.as_str());
        self.events.push(RoundEvent::PhaseChanged { from, to });

        if to == RoundPhase::GameOver && !self.summary_emitted {
            self.summary_emitted = true;
            let summary = self.round.summary();
            log::info!(
                "Round complete: score {}, hits {}, misses {}, best streak {}",
                summary.score,
                summary.hits,
                summary.misses,
                summary.best_streak
            );
            self.events.push(RoundEvent::RoundComplete(summary));
        }
    }

    fn on_timer(&mut self, fired: Fired) {
        match fired.kind {
            TimerKind::CountdownTick => {
                if self.phase != RoundPhase::Countdown {
                    return;
                }
                if self.round.countdown <= 1 {
                    self.round.countdown = 0;
                    self.scheduler.cancel_slot(&mut self.timers.countdown);
                    self.set_phase(RoundPhase::Playing);
                    self.timers.round = Some(
                        self.scheduler
                            .schedule_repeating(TimerKind::RoundTick, TIMER_TICK_MS),
                    );
                } else {
                    self.round.countdown -= 1;
                }
            }
            TimerKind::RoundTick => {
                if self.phase != RoundPhase::Playing {
                    return;
                }
                if self.round.time_left <= 1 {
                    self.round.time_left = 0;
                    self.scheduler.cancel_slot(&mut self.timers.round);
                    self.set_phase(RoundPhase::GameOver);
                } else {
                    self.round.time_left -= 1;
                }
            }
            TimerKind::FeedbackExpiry { feedback_id } => {
                self.feedback.retain(|item| item.id != feedback_id);
            }
            TimerKind::ShakeEnd => {
                self.shake_active = false;
                self.timers.shake = None;
            }
            TimerKind::FreezeEnd => {
                self.frozen = false;
                self.timers.freeze = None;
            }
        }
    }
}
