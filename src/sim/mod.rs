//! Deterministic round engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only (advanced by the host)
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod math;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod timers;

pub use powerup::{PowerUpCharges, PowerUpKind};
pub use state::{
    FeedbackItem, GameSnapshot, GameState, Polarity, PowerUpView, Round, RoundError, RoundEvent,
    RoundPhase, RoundSummary, TargetView,
};
pub use tick::{KeyPress, TickInput, tick};
pub use timers::{Fired, Scheduler, TimerId, TimerKind};
