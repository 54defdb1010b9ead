//! Clickaway - A reflex click arcade game
//!
//! Core modules:
//! - `sim`: Deterministic round engine (phases, timers, scoring, power-ups)
//! - `difficulty`: Data-driven difficulty tables
//! - `rewards` / `history`: Coins and persisted round history
//! - `shop` / `leaderboard`: Cosmetics catalog and rival standings
//! - `app`: Persisted player profile
//! - `persistence` / `platform`: Key-value storage and browser/native glue

pub mod app;
pub mod difficulty;
pub mod history;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod rewards;
pub mod shop;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web_game;

pub use app::{App, Profile};
pub use difficulty::{Difficulty, DifficultyParams};
pub use history::{History, HistoryEntry};
pub use shop::{ShopError, ShopItem};

/// Game configuration constants
pub mod consts {
    use glam::{UVec2, Vec2};

    /// Countdown shown before a round starts
    pub const READY_COUNTDOWN_START: u32 = 3;
    /// Countdown and round clock period
    pub const TIMER_TICK_MS: u64 = 1000;

    /// Floating "+N" / "-N" text lifetime
    pub const FEEDBACK_LIFETIME_MS: u64 = 500;
    /// Click feedback is drawn up and to the right of the pointer
    pub const FEEDBACK_OFFSET: Vec2 = Vec2::new(12.0, -12.0);

    /// Arena shake after a miss
    pub const SHAKE_DURATION_MS: u64 = 260;

    /// Power-up effects
    pub const TIME_BOOST_SECONDS: u32 = 2;
    pub const SIZE_BOOST_PIXELS: u32 = 10;
    pub const FREEZE_MOVEMENT_DURATION_MS: u64 = 1000;

    /// Target label
    pub const TARGET_LABEL: &str = "Click Me";
    /// Targets smaller than this hide their label
    pub const LABEL_HIDE_SIZE_THRESHOLD: u32 = 40;
    pub const LABEL_SCALE_FACTOR: f64 = 0.18;
    pub const MIN_LABEL_FONT_SIZE: u32 = 8;
    pub const MAX_LABEL_FONT_SIZE: u32 = 18;

    /// Arena size before the host reports a real one
    pub const DEFAULT_ARENA_SIZE: UVec2 = UVec2::new(640, 420);
}
