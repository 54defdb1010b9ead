//! Round rewards
//!
//! Turns a finished round into coins and a history record.

use rand::Rng;

use crate::history::HistoryEntry;
use crate::sim::RoundSummary;

/// Coins for a round: `floor(clicks * multiplier)`, never negative
///
/// A non-finite multiplier counts as 1; a negative one as 0.
pub fn round_coins(clicks_scored: u32, coin_multiplier: f64) -> u64 {
    let multiplier = if coin_multiplier.is_finite() {
        coin_multiplier.max(0.0)
    } else {
        1.0
    };
    (clicks_scored as f64 * multiplier).floor().max(0.0) as u64
}

/// Coins plus the history entry for one finished round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReward {
    pub coins_earned: u64,
    pub entry: HistoryEntry,
}

impl RoundReward {
    pub fn from_summary<R: Rng>(summary: &RoundSummary, played_at_ms: f64, rng: &mut R) -> Self {
        let coins_earned = round_coins(summary.clicks_scored, summary.coin_multiplier);
        Self {
            coins_earned,
            entry: HistoryEntry::from_summary(summary, coins_earned, played_at_ms, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_round_coins() {
        assert_eq!(round_coins(10, 1.1), 11);
        assert_eq!(round_coins(10, 1.25), 12);
        assert_eq!(round_coins(7, 1.0), 7);
        assert_eq!(round_coins(0, 1.25), 0);
        assert_eq!(round_coins(10, -2.0), 0);
        assert_eq!(round_coins(10, f64::NAN), 10);
        assert_eq!(round_coins(10, f64::INFINITY), 10);
    }

    #[test]
    fn test_reward_from_summary() {
        let summary = RoundSummary {
            clicks_scored: 10,
            hits: 10,
            misses: 0,
            score: 13,
            best_streak: 10,
            powerups_used: 0,
            difficulty: Difficulty::Normal,
            coin_multiplier: 1.1,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let reward = RoundReward::from_summary(&summary, 0.0, &mut rng);
        assert_eq!(reward.coins_earned, 11);
        assert_eq!(reward.entry.coins_earned, 11);
        assert_eq!(reward.entry.accuracy, "100%");
        assert_eq!(reward.entry.score, 13);
    }
}
