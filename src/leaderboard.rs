//! Leaderboard
//!
//! The player's best numbers come from local history; everyone else is a
//! fixed rival table. Ranked by best score, then best streak.

use serde::Serialize;

use crate::history::HistoryEntry;
use crate::sim::math::format_accuracy;

/// Aggregate numbers for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub best_score: u32,
    pub best_streak: u32,
    pub accuracy: String,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            best_score: 0,
            best_streak: 0,
            accuracy: "0%".to_string(),
        }
    }
}

impl PlayerStats {
    /// Best score and streak across rounds; accuracy over all attempts
    pub fn from_history<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        let mut best_score = 0;
        let mut best_streak = 0;
        let mut total_hits = 0u32;
        let mut total_misses = 0u32;

        for entry in entries {
            best_score = best_score.max(entry.score);
            best_streak = best_streak.max(entry.best_streak);
            total_hits = total_hits.saturating_add(entry.hits);
            total_misses = total_misses.saturating_add(entry.misses);
        }

        Self {
            best_score,
            best_streak,
            accuracy: format_accuracy(total_hits, total_misses),
        }
    }
}

/// A rival row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rival {
    pub username: &'static str,
    pub best_score: u32,
    pub best_streak: u32,
    pub accuracy: &'static str,
}

/// Fixed rivals the player is ranked against
pub const RIVALS: [Rival; 5] = [
    Rival {
        username: "ClickMaster",
        best_score: 128,
        best_streak: 19,
        accuracy: "86%",
    },
    Rival {
        username: "NeonNinja",
        best_score: 117,
        best_streak: 16,
        accuracy: "82%",
    },
    Rival {
        username: "SwiftTap",
        best_score: 103,
        best_streak: 14,
        accuracy: "79%",
    },
    Rival {
        username: "ArcadeAce",
        best_score: 94,
        best_streak: 12,
        accuracy: "75%",
    },
    Rival {
        username: "FocusFox",
        best_score: 88,
        best_streak: 11,
        accuracy: "73%",
    },
];

/// One ranked row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based
    pub rank: usize,
    pub username: String,
    pub best_score: u32,
    pub best_streak: u32,
    pub accuracy: String,
    pub is_player: bool,
}

/// Rank the player among the rivals
///
/// Ties keep rivals ahead of the player.
pub fn standings(player_name: &str, player: &PlayerStats) -> Vec<Standing> {
    let mut rows: Vec<Standing> = RIVALS
        .iter()
        .map(|r| Standing {
            rank: 0,
            username: r.username.to_string(),
            best_score: r.best_score,
            best_streak: r.best_streak,
            accuracy: r.accuracy.to_string(),
            is_player: false,
        })
        .collect();
    rows.push(Standing {
        rank: 0,
        username: player_name.to_string(),
        best_score: player.best_score,
        best_streak: player.best_streak,
        accuracy: player.accuracy.clone(),
        is_player: true,
    });

    // Stable sort keeps insertion order on ties
    rows.sort_by(|a, b| {
        b.best_score
            .cmp(&a.best_score)
            .then(b.best_streak.cmp(&a.best_streak))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

/// The player's 1-based rank among the rivals
pub fn player_rank(player: &PlayerStats) -> usize {
    RIVALS
        .iter()
        .filter(|r| {
            r.best_score > player.best_score
                || (r.best_score == player.best_score && r.best_streak >= player.best_streak)
        })
        .count()
        + 1
}
