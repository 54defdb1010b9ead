//! Pure round math
//!
//! No state, no side effects. Sizes and positions are whole pixels.

use glam::UVec2;
use rand::Rng;

use crate::consts::*;

/// Minimum streak for each atmosphere tier (index = tier)
const STREAK_ATMOSPHERE_MIN_STREAKS: [u32; 5] = [0, 4, 8, 12, 18];

/// Largest valid offset of an item along one axis
#[inline]
fn max_offset(container: u32, item: u32) -> u32 {
    container.saturating_sub(item)
}

/// Top-left position that centers `item_size` inside `container`
pub fn centered_position(container: UVec2, item_size: u32) -> UVec2 {
    UVec2::new(
        max_offset(container.x, item_size) / 2,
        max_offset(container.y, item_size) / 2,
    )
}

/// Uniform random top-left position keeping `item_size` fully inside `container`
///
/// Each axis is drawn independently from `0..=container - item_size`. When
/// the item does not fit, the axis collapses to 0.
pub fn random_position<R: Rng>(rng: &mut R, container: UVec2, item_size: u32) -> UVec2 {
    UVec2::new(
        rng.random_range(0..=max_offset(container.x, item_size)),
        rng.random_range(0..=max_offset(container.y, item_size)),
    )
}

/// Clamp an existing position so the item stays inside a (resized) container
pub fn clamp_position(position: UVec2, container: UVec2, item_size: u32) -> UVec2 {
    UVec2::new(
        position.x.min(max_offset(container.x, item_size)),
        position.y.min(max_offset(container.y, item_size)),
    )
}

/// Target size after a successful hit
pub fn next_target_size(current_size: u32, shrink_factor: f64, min_size: u32) -> u32 {
    let shrunk = (current_size as f64 * shrink_factor).floor().max(0.0) as u32;
    shrunk.max(min_size)
}

/// Score multiplier for a streak: `1 + floor(streak / step)`
///
/// A step of 0 is treated as 1.
#[inline]
pub fn combo_multiplier(streak: u32, combo_step: u32) -> u32 {
    1 + streak / combo_step.max(1)
}

/// Hit ratio as a whole percentage, e.g. `"83%"`; `"0%"` with no attempts
pub fn format_accuracy(hits: u32, misses: u32) -> String {
    let attempts = hits as u64 + misses as u64;
    if attempts == 0 {
        return "0%".to_string();
    }
    let percent = (hits as f64 / attempts as f64 * 100.0).round() as u32;
    format!("{}%", percent)
}

/// Text drawn on the target; hidden once the target is too small to read
pub fn target_label(size: u32) -> &'static str {
    if size >= LABEL_HIDE_SIZE_THRESHOLD {
        TARGET_LABEL
    } else {
        ""
    }
}

/// Label font size in pixels, linear in target size and clamped
pub fn target_label_font_size(size: u32) -> u32 {
    let scaled = (size as f64 * LABEL_SCALE_FACTOR).floor() as u32;
    scaled.clamp(MIN_LABEL_FONT_SIZE, MAX_LABEL_FONT_SIZE)
}

/// Visual intensity tier for the current streak (0 = calm)
pub fn streak_atmosphere_tier(streak: u32) -> usize {
    STREAK_ATMOSPHERE_MIN_STREAKS
        .iter()
        .rposition(|&min| streak >= min)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_centered_position() {
        assert_eq!(centered_position(UVec2::new(500, 300), 100), UVec2::new(200, 100));
        // Odd leftovers round down
        assert_eq!(centered_position(UVec2::new(101, 101), 100), UVec2::new(0, 0));
        // Item larger than container pins to the origin
        assert_eq!(centered_position(UVec2::new(50, 50), 100), UVec2::ZERO);
    }

    #[test]
    fn test_random_position_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let container = UVec2::new(320, 240);
        for size in [10, 50, 100, 240, 400] {
            for _ in 0..200 {
                let pos = random_position(&mut rng, container, size);
                assert!(pos.x <= container.x.saturating_sub(size));
                assert!(pos.y <= container.y.saturating_sub(size));
            }
        }
    }

    #[test]
    fn test_random_position_reaches_both_edges() {
        let mut rng = Pcg32::seed_from_u64(1);
        let container = UVec2::new(12, 12);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..500 {
            let pos = random_position(&mut rng, container, 10);
            seen_min |= pos.x == 0;
            seen_max |= pos.x == 2;
        }
        assert!(seen_min && seen_max, "range must be inclusive");
    }

    #[test]
    fn test_clamp_position() {
        let clamped = clamp_position(UVec2::new(400, 10), UVec2::new(300, 300), 50);
        assert_eq!(clamped, UVec2::new(250, 10));
    }

    #[test]
    fn test_next_target_size() {
        assert_eq!(next_target_size(100, 0.96, 12), 96);
        assert_eq!(next_target_size(96, 0.96, 12), 92);
        assert_eq!(next_target_size(12, 0.96, 12), 12);
        assert_eq!(next_target_size(13, 0.5, 12), 12);
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(combo_multiplier(0, 5), 1);
        assert_eq!(combo_multiplier(4, 5), 1);
        assert_eq!(combo_multiplier(5, 5), 2);
        assert_eq!(combo_multiplier(14, 5), 3);
        assert_eq!(combo_multiplier(3, 0), 4);
    }

    #[test]
    fn test_format_accuracy() {
        assert_eq!(format_accuracy(0, 0), "0%");
        assert_eq!(format_accuracy(5, 0), "100%");
        assert_eq!(format_accuracy(0, 3), "0%");
        assert_eq!(format_accuracy(2, 1), "67%");
        assert_eq!(format_accuracy(1, 7), "13%");
    }

    #[test]
    fn test_label_and_font_size() {
        assert_eq!(target_label(100), "Click Me");
        assert_eq!(target_label(40), "Click Me");
        assert_eq!(target_label(39), "");

        assert_eq!(target_label_font_size(100), 18);
        assert_eq!(target_label_font_size(60), 10);
        assert_eq!(target_label_font_size(10), 8);
    }

    #[test]
    fn test_streak_atmosphere_tier() {
        assert_eq!(streak_atmosphere_tier(0), 0);
        assert_eq!(streak_atmosphere_tier(3), 0);
        assert_eq!(streak_atmosphere_tier(4), 1);
        assert_eq!(streak_atmosphere_tier(12), 3);
        assert_eq!(streak_atmosphere_tier(100), 4);
    }
}
