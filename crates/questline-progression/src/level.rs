//! Level curve: cumulative XP to level mapping and level-derived bonuses.
//!
//! XP required to advance from level `n` to `n + 1` grows geometrically:
//! `floor(BASE_XP * GROWTH^(n - 1))`. The curve is evaluated from scratch on
//! every query; nothing here caches or accumulates incrementally, so the
//! level/XP relationship can never drift.

use questline_common::Reward;
use serde::{Deserialize, Serialize};

/// XP required to advance from level 1 to level 2.
pub const BASE_XP: u64 = 100;

/// Geometric growth factor applied per level.
pub const GROWTH: f64 = 1.2;

/// Level cap. XP keeps accumulating past it but the level freezes.
pub const MAX_LEVEL: u32 = 100;

/// Gold multiplier gained per level above 1.
const GOLD_MULTIPLIER_PER_LEVEL: f64 = 0.10;
/// XP multiplier gained per level above 1.
const XP_MULTIPLIER_PER_LEVEL: f64 = 0.05;
/// Max energy gained per level above 1.
const ENERGY_PER_LEVEL: u32 = 5;
/// Max health gained per level above 1.
const HEALTH_PER_LEVEL: u32 = 10;

/// XP required to advance from `level` to `level + 1`.
///
/// Returns 0 at or above [`MAX_LEVEL`]: no further advancement exists.
#[must_use]
pub fn xp_for_next_level(level: u32) -> u64 {
    if level >= MAX_LEVEL {
        return 0;
    }
    let level = level.max(1);
    (BASE_XP as f64 * GROWTH.powi(level as i32 - 1)).floor() as u64
}

/// Cumulative XP required to reach `level` from scratch.
///
/// Level input above [`MAX_LEVEL`] is clamped before lookup; level 1 (or
/// below) costs nothing.
#[must_use]
pub fn xp_for_level(level: u32) -> u64 {
    let level = level.min(MAX_LEVEL);
    if level <= 1 {
        return 0;
    }
    (2..=level)
        .map(|l| (BASE_XP as f64 * GROWTH.powi(l as i32 - 2)).floor() as u64)
        .sum()
}

/// Level reached with `total_xp` cumulative XP, capped at [`MAX_LEVEL`].
#[must_use]
pub fn level_for_xp(total_xp: u64) -> u32 {
    let mut level = 1;
    let mut consumed = 0;

    while level < MAX_LEVEL {
        let next = xp_for_next_level(level);
        if consumed + next > total_xp {
            break;
        }
        consumed += next;
        level += 1;
    }

    level
}

/// Progress within the current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// XP earned since the current level was reached.
    pub current: u64,
    /// XP needed to advance to the next level.
    pub needed: u64,
    /// Completion percentage, rounded to two decimal places.
    pub percentage: f64,
}

/// Progress toward the next level for a cumulative XP total.
///
/// At [`MAX_LEVEL`] the progress bar is pinned to `{0, 0, 100.0}`.
#[must_use]
pub fn progress(total_xp: u64) -> LevelProgress {
    let level = level_for_xp(total_xp);
    if level >= MAX_LEVEL {
        return LevelProgress {
            current: 0,
            needed: 0,
            percentage: 100.0,
        };
    }

    let current = total_xp - xp_for_level(level);
    let needed = xp_for_next_level(level);
    let percentage = (current as f64 / needed as f64 * 100.0 * 100.0).round() / 100.0;

    LevelProgress {
        current,
        needed,
        percentage,
    }
}

/// Outcome of comparing levels before and after an XP change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// Whether the new XP total crossed at least one level threshold.
    pub leveled_up: bool,
    /// Level before the change.
    pub old_level: u32,
    /// Level after the change.
    pub new_level: u32,
    /// Number of levels gained.
    pub levels_gained: u32,
    /// Whether the new level is the cap.
    pub is_max_level: bool,
}

/// Compares the levels implied by two cumulative XP totals.
#[must_use]
pub fn check_level_up(old_xp: u64, new_xp: u64) -> LevelUp {
    let old_level = level_for_xp(old_xp);
    let new_level = level_for_xp(new_xp);

    LevelUp {
        leveled_up: new_level > old_level,
        old_level,
        new_level,
        levels_gained: new_level.saturating_sub(old_level),
        is_max_level: new_level >= MAX_LEVEL,
    }
}

/// Bonuses derived from a hero's level.
///
/// Always recomputed from the level, never incrementally adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBonuses {
    /// Multiplier applied to gold rewards.
    pub gold_multiplier: f64,
    /// Multiplier applied to XP rewards.
    pub xp_multiplier: f64,
    /// Maximum energy at this level.
    pub max_energy: u32,
    /// Maximum health at this level.
    pub max_health: u32,
}

impl Default for LevelBonuses {
    fn default() -> Self {
        Self::for_level(1)
    }
}

impl LevelBonuses {
    /// Computes the bonuses for a level.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let above_first = (level - 1) as f64;

        Self {
            gold_multiplier: 1.0 + above_first * GOLD_MULTIPLIER_PER_LEVEL,
            xp_multiplier: 1.0 + above_first * XP_MULTIPLIER_PER_LEVEL,
            max_energy: 100 + (level - 1) * ENERGY_PER_LEVEL,
            max_health: 100 + (level - 1) * HEALTH_PER_LEVEL,
        }
    }

    /// Applies the multipliers to a base reward, flooring the results.
    #[must_use]
    pub fn scale(&self, base: Reward) -> Reward {
        Reward {
            xp: (base.xp as f64 * self.xp_multiplier).floor() as u64,
            gold: (base.gold as f64 * self.gold_multiplier).floor() as u64,
        }
    }
}

/// Snapshot of everything a level implies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    /// The level described.
    pub level: u32,
    /// Cumulative XP required to reach this level.
    pub xp_for_current_level: u64,
    /// XP required to advance past this level (0 at the cap).
    pub xp_for_next_level: u64,
    /// Bonuses at this level.
    pub bonuses: LevelBonuses,
    /// Whether this level is the cap.
    pub is_max_level: bool,
}

/// Describes a level: thresholds, bonuses, and cap status.
#[must_use]
pub fn level_stats(level: u32) -> LevelStats {
    let level = level.clamp(1, MAX_LEVEL);

    LevelStats {
        level,
        xp_for_current_level: xp_for_level(level),
        xp_for_next_level: xp_for_next_level(level),
        bonuses: LevelBonuses::for_level(level),
        is_max_level: level >= MAX_LEVEL,
    }
}

/// XP still missing to reach `target_level` from `current_xp`.
///
/// Returns 0 when the target is already reached.
#[must_use]
pub fn xp_to_reach_level(current_xp: u64, target_level: u32) -> u64 {
    if target_level <= level_for_xp(current_xp) {
        return 0;
    }
    xp_for_level(target_level).saturating_sub(current_xp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_for_xp_thresholds() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(220), 3); // 100 + 120
        assert_eq!(level_for_xp(364), 4); // 100 + 120 + 144
    }

    #[test]
    fn test_xp_for_next_level() {
        assert_eq!(xp_for_next_level(1), 100);
        assert_eq!(xp_for_next_level(2), 120);
        assert_eq!(xp_for_next_level(3), 144);
        assert_eq!(xp_for_next_level(MAX_LEVEL), 0);
    }

    #[test]
    fn test_xp_for_level_prefix_sums() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100);
        assert_eq!(xp_for_level(3), 220);
        assert_eq!(xp_for_level(4), 364);
        // Input above the cap is clamped before lookup.
        assert_eq!(xp_for_level(MAX_LEVEL + 50), xp_for_level(MAX_LEVEL));
    }

    #[test]
    fn test_progress_mid_level() {
        let p = progress(150);
        assert_eq!(p.current, 50); // 150 - 100
        assert_eq!(p.needed, 120);
        assert!((p.percentage - 41.67).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_at_exact_threshold() {
        let p = progress(100);
        assert_eq!(p.current, 0);
        assert_eq!(p.needed, 120);
        assert!((p.percentage - 0.0).abs() < f64::EPSILON);

        assert_eq!(progress(364).current, 0);
    }

    #[test]
    fn test_progress_at_max_level() {
        let p = progress(xp_for_level(MAX_LEVEL) + 1_000_000);
        assert_eq!(p.current, 0);
        assert_eq!(p.needed, 0);
        assert!((p.percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_level_up() {
        let up = check_level_up(0, 150);
        assert!(up.leveled_up);
        assert_eq!(up.old_level, 1);
        assert_eq!(up.new_level, 2);
        assert_eq!(up.levels_gained, 1);
        assert!(!up.is_max_level);

        let none = check_level_up(0, 50);
        assert!(!none.leveled_up);
        assert_eq!(none.new_level, 1);
        assert_eq!(none.levels_gained, 0);
    }

    #[test]
    fn test_bonuses_for_level() {
        let base = LevelBonuses::for_level(1);
        assert!((base.gold_multiplier - 1.0).abs() < f64::EPSILON);
        assert!((base.xp_multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(base.max_energy, 100);
        assert_eq!(base.max_health, 100);

        let five = LevelBonuses::for_level(5);
        assert!((five.gold_multiplier - 1.4).abs() < 1e-9);
        assert!((five.xp_multiplier - 1.2).abs() < 1e-9);
        assert_eq!(five.max_energy, 120);
        assert_eq!(five.max_health, 140);
    }

    #[test]
    fn test_bonuses_scale_reward_floors() {
        let bonuses = LevelBonuses::for_level(5); // xp x1.2, gold x1.4
        let scaled = bonuses.scale(Reward::new(33, 33));
        assert_eq!(scaled, Reward::new(39, 46)); // 39.6 and 46.2, floored

        let unscaled = LevelBonuses::for_level(1).scale(Reward::new(25, 10));
        assert_eq!(unscaled, Reward::new(25, 10));
    }

    #[test]
    fn test_level_stats() {
        let stats = level_stats(4);
        assert_eq!(stats.xp_for_current_level, 364);
        assert_eq!(stats.xp_for_next_level, 172); // floor(100 * 1.2^3)
        assert!(!stats.is_max_level);

        assert!(level_stats(MAX_LEVEL).is_max_level);
        assert_eq!(level_stats(MAX_LEVEL).xp_for_next_level, 0);
    }

    #[test]
    fn test_xp_to_reach_level() {
        assert_eq!(xp_to_reach_level(0, 2), 100);
        assert_eq!(xp_to_reach_level(150, 3), 70);
        assert_eq!(xp_to_reach_level(364, 4), 0); // already there
        assert_eq!(xp_to_reach_level(364, 2), 0);
    }

    proptest! {
        #[test]
        fn prop_level_curve_is_monotonic(a in 0u64..5_000_000, b in 0u64..5_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_xp(lo) <= level_for_xp(hi));
        }

        #[test]
        fn prop_cumulative_round_trip(xp in 0u64..5_000_000) {
            let level = level_for_xp(xp);
            prop_assert!(xp_for_level(level) <= xp);
            if level < MAX_LEVEL {
                prop_assert!(xp < xp_for_level(level + 1));
            }
        }

        #[test]
        fn prop_progress_stays_in_bounds(xp in 0u64..5_000_000) {
            let p = progress(xp);
            prop_assert!(p.percentage >= 0.0 && p.percentage <= 100.0);
            if p.needed > 0 {
                prop_assert!(p.current < p.needed);
            }
        }
    }
}
