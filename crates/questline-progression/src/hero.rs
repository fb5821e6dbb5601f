//! Hero state: the record every progression transition operates on.
//!
//! The hero record is owned by the surrounding application; this crate only
//! ever mutates it through whole transitions. Stats are a string-keyed book
//! of cumulative counters so that new achievement categories can be added
//! without migrating historical hero records: a key that was never written
//! simply reads as zero.

use crate::level::{self, LevelBonuses};
use crate::streak::{StreakKind, Streaks};
use questline_common::AchievementId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Hard cap on the spendable gold balance.
///
/// Only the balance is capped; the cumulative `total_gold_earned` counters
/// keep growing past it, and achievement thresholds read the cumulative
/// counters, so the cap never makes a gold achievement unreachable.
pub const GOLD_CAP: u64 = 9_999;

/// Gold a fresh hero starts with.
pub const STARTING_GOLD: u64 = 100;

/// Canonical stat keys written by the progression core.
pub mod stat {
    /// Missions completed, all difficulties.
    pub const MISSIONS_COMPLETED: &str = "missions_completed";
    /// Cumulative XP earned from missions and explicit gains.
    pub const TOTAL_XP_GAINED: &str = "total_xp_gained";
    /// Cumulative gold earned, pre-clamp.
    pub const TOTAL_GOLD_EARNED: &str = "total_gold_earned";
    /// Cumulative gold spent.
    pub const TOTAL_GOLD_SPENT: &str = "total_gold_spent";
    /// Mirror of the daily-mission streak's current run.
    pub const CURRENT_STREAK: &str = "current_streak";
    /// Mirror of the daily-mission streak's longest run.
    pub const LONGEST_STREAK: &str = "longest_streak";
    /// Levels gained over the hero's lifetime.
    pub const LEVELS_GAINED: &str = "levels_gained";
    /// Achievements unlocked so far.
    pub const ACHIEVEMENTS_UNLOCKED: &str = "achievements_unlocked";
    /// XP granted by achievement rewards.
    pub const TOTAL_ACHIEVEMENT_XP: &str = "total_achievement_xp";
    /// Gold granted by achievement rewards.
    pub const TOTAL_ACHIEVEMENT_GOLD: &str = "total_achievement_gold";
    /// Easy missions completed.
    pub const MISSIONS_EASY: &str = "missions_easy";
    /// Medium missions completed.
    pub const MISSIONS_MEDIUM: &str = "missions_medium";
    /// Hard missions completed.
    pub const MISSIONS_HARD: &str = "missions_hard";
    /// XP attributed to mission completions.
    pub const XP_FROM_MISSIONS: &str = "xp_from_missions";
    /// XP attributed to achievement rewards.
    pub const XP_FROM_ACHIEVEMENTS: &str = "xp_from_achievements";
    /// XP attributed to one-off bonuses.
    pub const XP_FROM_BONUSES: &str = "xp_from_bonuses";
}

/// Attribution bucket for XP gains, mapped to a `xp_from_*` stat key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    /// XP from completing missions.
    Missions,
    /// XP from achievement rewards.
    Achievements,
    /// XP from one-off bonuses.
    Bonuses,
}

impl XpSource {
    /// The stat key this source accumulates under.
    #[must_use]
    pub const fn stat_key(self) -> &'static str {
        match self {
            Self::Missions => stat::XP_FROM_MISSIONS,
            Self::Achievements => stat::XP_FROM_ACHIEVEMENTS,
            Self::Bonuses => stat::XP_FROM_BONUSES,
        }
    }
}

/// String-keyed book of cumulative counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    counters: HashMap<String, u64>,
}

impl Stats {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a counter. Keys never written read as 0.
    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Adds to a counter, saturating at `u64::MAX`.
    pub fn add(&mut self, key: &str, amount: u64) {
        let entry = self.counters.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Overwrites a counter.
    pub fn set(&mut self, key: &str, value: u64) {
        self.counters.insert(key.to_string(), value);
    }

    /// Number of counters that have been written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether no counter has ever been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Insertion-ordered, append-only log of unlocked achievement ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockedAchievements {
    ids: Vec<AchievementId>,
}

impl UnlockedAchievements {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an id. Returns false (and changes nothing) if already present.
    pub fn insert(&mut self, id: AchievementId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Whether an id has been unlocked.
    #[must_use]
    pub fn contains(&self, id: &AchievementId) -> bool {
        self.ids.contains(id)
    }

    /// Ids in unlock order.
    pub fn iter(&self) -> impl Iterator<Item = &AchievementId> {
        self.ids.iter()
    }

    /// Number of unlocked achievements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing has been unlocked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The most recently unlocked ids, newest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&AchievementId> {
        self.ids.iter().rev().take(count).collect()
    }
}

/// Validation errors for hero records arriving from storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeroStateError {
    /// Stored level does not match the level implied by cumulative XP
    #[error("level {level} does not match XP {xp} (curve says {expected})")]
    LevelMismatch {
        /// Stored level
        level: u32,
        /// Cumulative XP
        xp: u64,
        /// Level the curve derives from the XP
        expected: u32,
    },
    /// A streak claims a longer current run than its record
    #[error("streak {kind:?} has current {current} above longest {longest}")]
    StreakCorrupt {
        /// Streak kind affected
        kind: StreakKind,
        /// Current run length
        current: u32,
        /// Longest run on record
        longest: u32,
    },
    /// Gold balance above the cap
    #[error("gold balance {0} exceeds cap {GOLD_CAP}")]
    GoldOverCap(u64),
}

/// The full hero record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroState {
    /// Display name.
    pub name: String,
    /// Current level. Invariant: always `level_for_xp(xp)`.
    pub level: u32,
    /// Cumulative XP, monotonically non-decreasing.
    pub xp: u64,
    /// Spendable gold balance, clamped to `[0, GOLD_CAP]`.
    pub gold: u64,
    /// Level-derived bonuses, recomputed whenever the level changes.
    pub bonuses: LevelBonuses,
    /// Unlocked achievement ids, in unlock order.
    pub unlocked: UnlockedAchievements,
    /// Streak counters by kind.
    pub streaks: Streaks,
    /// Cumulative stat counters.
    pub stats: Stats,
}

impl HeroState {
    /// Creates a fresh hero: level 1, no XP, starting gold, nothing
    /// unlocked.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            xp: 0,
            gold: STARTING_GOLD,
            bonuses: LevelBonuses::default(),
            unlocked: UnlockedAchievements::new(),
            streaks: Streaks::new(),
            stats: Stats::new(),
        }
    }

    /// Checks the cross-field invariants of a stored record.
    pub fn validate(&self) -> Result<(), HeroStateError> {
        let expected = level::level_for_xp(self.xp);
        if self.level != expected {
            return Err(HeroStateError::LevelMismatch {
                level: self.level,
                xp: self.xp,
                expected,
            });
        }

        for (kind, streak) in self.streaks.iter() {
            if streak.longest < streak.current {
                return Err(HeroStateError::StreakCorrupt {
                    kind,
                    current: streak.current,
                    longest: streak.longest,
                });
            }
        }

        if self.gold > GOLD_CAP {
            return Err(HeroStateError::GoldOverCap(self.gold));
        }

        Ok(())
    }

    /// Recomputes level and bonuses from cumulative XP.
    ///
    /// Run on records loaded from storage so a hero saved by an older
    /// build (or edited by hand) comes back consistent.
    pub fn normalize(&mut self) {
        self.level = level::level_for_xp(self.xp);
        self.bonuses = LevelBonuses::for_level(self.level);
        self.gold = self.gold.min(GOLD_CAP);
    }
}
