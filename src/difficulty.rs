//! Difficulty presets
//!
//! Each preset is a fixed set of round tunables. Lookups by id never fail:
//! an unknown id resolves to [`Difficulty::DEFAULT`].

use serde::{Deserialize, Serialize};

/// Difficulty preset identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Tunable round parameters for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Round length in seconds
    pub duration_seconds: u32,
    /// Target size at round start (also the growth ceiling)
    pub initial_button_size: u32,
    /// Target size floor
    pub min_button_size: u32,
    /// Size multiplier applied per hit (0..1)
    pub shrink_factor: f64,
    /// Points removed per miss
    pub miss_penalty: u32,
    pub base_points_per_hit: u32,
    /// Streak length per combo multiplier step (>= 1)
    pub combo_step: u32,
    /// Clock ceiling for time boosts
    pub max_time_buffer_seconds: u32,
    /// Coins per hit at round end
    pub coin_multiplier: f64,
}

const EASY: DifficultyParams = DifficultyParams {
    duration_seconds: 200,
    initial_button_size: 110,
    min_button_size: 24,
    shrink_factor: 0.98,
    miss_penalty: 0,
    base_points_per_hit: 1,
    combo_step: 6,
    max_time_buffer_seconds: 40,
    coin_multiplier: 1.0,
};

const NORMAL: DifficultyParams = DifficultyParams {
    duration_seconds: 15,
    initial_button_size: 100,
    min_button_size: 12,
    shrink_factor: 0.96,
    miss_penalty: 1,
    base_points_per_hit: 1,
    combo_step: 5,
    max_time_buffer_seconds: 30,
    coin_multiplier: 1.1,
};

const HARD: DifficultyParams = DifficultyParams {
    duration_seconds: 12,
    initial_button_size: 96,
    min_button_size: 10,
    shrink_factor: 0.94,
    miss_penalty: 2,
    base_points_per_hit: 1,
    combo_step: 4,
    max_time_buffer_seconds: 24,
    coin_multiplier: 1.25,
};

impl Difficulty {
    /// Preset used when nothing (or something unknown) is selected
    pub const DEFAULT: Difficulty = Difficulty::Normal;

    /// All presets in menu order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Strict parse; `None` for ids that are not presets
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Lenient lookup: unknown ids resolve to [`Difficulty::DEFAULT`]
    pub fn from_id(id: &str) -> Self {
        Self::parse(id).unwrap_or_else(|| {
            log::debug!(
                "Unknown difficulty '{}', using {}",
                id,
                Self::DEFAULT.as_str()
            );
            Self::DEFAULT
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Longer timer and gentler pacing.",
            Difficulty::Normal => "Balanced timing and score pressure.",
            Difficulty::Hard => "Faster shrink and harsher miss cost.",
        }
    }

    pub fn player_hint(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Best for new players learning movement and timing.",
            Difficulty::Normal => "Best for consistent score runs with moderate pressure.",
            Difficulty::Hard => "Best for high-risk leaderboard pushes and short windows.",
        }
    }

    pub fn params(&self) -> &'static DifficultyParams {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }
}
