//! Round history
//!
//! Persisted to the key-value store, most recent first, capped at
//! [`MAX_HISTORY_ENTRIES`].

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::persistence::{self, KeyValueStore, keys};
use crate::sim::RoundSummary;
use crate::sim::math::format_accuracy;

/// Maximum number of rounds to keep
pub const MAX_HISTORY_ENTRIES: usize = 50;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Display timestamp, `YYYY-MM-DD HH:MM` (UTC)
    pub played_at: String,
    /// Unix timestamp (ms)
    #[serde(default)]
    pub played_at_ms: f64,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub hits: u32,
    #[serde(default)]
    pub misses: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub accuracy: String,
    #[serde(default)]
    pub coins_earned: u64,
    #[serde(default)]
    pub difficulty_id: String,
}

impl HistoryEntry {
    /// Snapshot a finished round
    pub fn from_summary<R: Rng>(
        summary: &RoundSummary,
        coins_earned: u64,
        played_at_ms: f64,
        rng: &mut R,
    ) -> Self {
        let suffix: u16 = rng.random();
        Self {
            id: format!("r-{}-{:04x}", played_at_ms as u64, suffix),
            played_at: format_timestamp(played_at_ms),
            played_at_ms,
            score: summary.score,
            hits: summary.hits,
            misses: summary.misses,
            best_streak: summary.best_streak,
            accuracy: format_accuracy(summary.hits, summary.misses),
            coins_earned,
            difficulty_id: summary.difficulty.as_str().to_string(),
        }
    }

    /// Difficulty the round was played on (unknown ids read as the default)
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_id(&self.difficulty_id)
    }

    /// "5 mins ago"-style label relative to `now_ms`
    pub fn relative_label(&self, now_ms: f64) -> String {
        format_relative(self.played_at_ms, now_ms)
    }
}

/// Bounded, most-recent-first round history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert at the head and evict the oldest beyond the cap
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Load from the store; corrupt entries are dropped
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut entries: Vec<HistoryEntry> =
            persistence::read_json_array(store, keys::ROUND_HISTORY);
        entries.truncate(MAX_HISTORY_ENTRIES);
        log::info!("Loaded {} history entries", entries.len());
        Self { entries }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        persistence::write_json(store, keys::ROUND_HISTORY, &self.entries);
        log::debug!("History saved ({} entries)", self.entries.len());
    }
}

/// UTC datetime for a Unix ms timestamp; out-of-range values clamp to the epoch
fn utc_datetime(timestamp_ms: f64) -> DateTime<Utc> {
    let millis = if timestamp_ms.is_finite() {
        timestamp_ms.floor() as i64
    } else {
        0
    };
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Format a Unix ms timestamp as `YYYY-MM-DD HH:MM` (UTC)
pub fn format_timestamp(timestamp_ms: f64) -> String {
    utc_datetime(timestamp_ms)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Format a timestamp relative to `now_ms`
pub fn format_relative(timestamp_ms: f64, now_ms: f64) -> String {
    let diff_ms = (now_ms - timestamp_ms).max(0.0);
    let diff_days = diff_ms / MS_PER_DAY;
    let diff_hours = diff_ms / MS_PER_HOUR;
    let diff_mins = diff_ms / MS_PER_MINUTE;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            utc_datetime(timestamp_ms).format("%-m/%-d/%y").to_string()
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    // 2024-03-15 14:05:00 UTC
    const MARCH_15_2024: f64 = 1_710_511_500_000.0;

    fn summary(score: u32) -> RoundSummary {
        RoundSummary {
            clicks_scored: 10,
            hits: 10,
            misses: 2,
            score,
            best_streak: 6,
            powerups_used: 1,
            difficulty: Difficulty::Hard,
            coin_multiplier: 1.25,
        }
    }

    fn entry(score: u32) -> HistoryEntry {
        let mut rng = Pcg32::seed_from_u64(score as u64);
        HistoryEntry::from_summary(&summary(score), 12, MARCH_15_2024, &mut rng)
    }

    #[test]
    fn test_entry_from_summary() {
        let e = entry(14);
        assert!(e.id.starts_with("r-1710511500000-"));
        assert_eq!(e.id.len(), "r-1710511500000-".len() + 4);
        assert_eq!(e.played_at, "2024-03-15 14:05");
        assert_eq!(e.accuracy, "83%");
        assert_eq!(e.coins_earned, 12);
        assert_eq!(e.difficulty(), Difficulty::Hard);
        assert_eq!(e.difficulty_id, "hard");
    }

    #[test]
    fn test_push_is_most_recent_first_and_bounded() {
        let mut history = History::new();
        for score in 0..(MAX_HISTORY_ENTRIES as u32 + 7) {
            history.push(entry(score));
            assert!(history.len() <= MAX_HISTORY_ENTRIES);
            assert_eq!(history.latest().unwrap().score, score);
        }
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        // Oldest evicted
        assert_eq!(history.entries.last().unwrap().score, 7);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = MemoryStore::new();
        let mut history = History::new();
        history.push(entry(3));
        history.push(entry(9));
        history.save(&mut store);

        let loaded = History::load(&store);
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_tolerates_corruption() {
        let store = MemoryStore::with_values([(keys::ROUND_HISTORY, "not json")]);
        assert!(History::load(&store).is_empty());

        // Legacy records without the newer fields still load
        let legacy = r#"[{"id":"r-001","playedAt":"Today, 4:12 PM","score":84,"hits":67,"misses":15,"accuracy":"82%","coinsEarned":67}, 5]"#;
        let store = MemoryStore::with_values([(keys::ROUND_HISTORY, legacy)]);
        let history = History::load(&store);
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries[0].score, 84);
        assert_eq!(history.entries[0].difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(MARCH_15_2024), "2024-03-15 14:05");
        // Leap day
        assert_eq!(format_timestamp(951_782_400_000.0), "2000-02-29 00:00");
        // Garbage timestamps read as the epoch
        assert_eq!(format_timestamp(f64::NAN), "1970-01-01 00:00");
    }

    #[test]
    fn test_format_relative() {
        let now = MARCH_15_2024;
        assert_eq!(format_relative(now - 5_000.0, now), "Just now");
        assert_eq!(format_relative(now - 60_000.0, now), "1 min ago");
        assert_eq!(format_relative(now - 5.0 * MS_PER_MINUTE, now), "5 mins ago");
        assert_eq!(format_relative(now - 1.5 * MS_PER_HOUR, now), "1 hour ago");
        assert_eq!(format_relative(now - 3.0 * MS_PER_HOUR, now), "3 hours ago");
        assert_eq!(format_relative(now - MS_PER_DAY, now), "Yesterday");
        assert_eq!(format_relative(now - 3.0 * MS_PER_DAY, now), "3 days ago");
        assert_eq!(format_relative(now - 10.0 * MS_PER_DAY, now), "3/5/24");
    }
}
