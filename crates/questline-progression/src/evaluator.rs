//! Achievement evaluation.
//!
//! Evaluation is a pure function of `(catalog, hero state, event context)`:
//! no mutation, no I/O, no clock reads. Matches are reported in catalog
//! declaration order and already-unlocked ids are always excluded, which is
//! what makes repeated evaluation after a commit naturally idempotent — an
//! achievement whose condition stays true forever is still granted exactly
//! once.

use crate::achievement::{AchievementCatalog, AchievementDef, EventFlag, Rarity, Trigger};
use crate::hero::{stat, HeroState};
use questline_common::AchievementId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Boolean facts about the triggering event, computed by the caller from
/// the event's timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    /// The action happened before 08:00.
    pub completed_early: bool,
    /// The action happened at or after 22:00.
    pub completed_late: bool,
}

impl EventContext {
    /// Context with no flags set (non-mission events).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            completed_early: false,
            completed_late: false,
        }
    }

    /// Derives the flags from the hour-of-day (0-23) of the action.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        Self {
            completed_early: hour < 8,
            completed_late: hour >= 22,
        }
    }

    /// Reads a flag.
    #[must_use]
    pub const fn flag(&self, flag: EventFlag) -> bool {
        match flag {
            EventFlag::EarlyCompletion => self.completed_early,
            EventFlag::LateCompletion => self.completed_late,
        }
    }
}

/// Progress toward a single achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    /// Progress so far, clamped to `required`.
    pub current: u64,
    /// Threshold to reach.
    pub required: u64,
    /// Integer percentage, 0-100.
    pub percentage: u32,
}

fn trigger_met(trigger: &Trigger, hero: &HeroState, ctx: &EventContext) -> bool {
    match trigger {
        Trigger::StatAtLeast { key, threshold } => hero.stats.get(key) >= *threshold,
        Trigger::LevelAtLeast(threshold) => hero.level >= *threshold,
        Trigger::StreakAtLeast(threshold) => {
            hero.stats.get(stat::LONGEST_STREAK) >= u64::from(*threshold)
        },
        Trigger::EventFlag(flag) => ctx.flag(*flag),
    }
}

impl AchievementCatalog {
    /// Returns every definition that newly qualifies: its trigger is met
    /// and the hero does not already own it, in declaration order.
    ///
    /// Pure and total: the hero is untouched and "no matches" is the empty
    /// vector, not an error.
    #[must_use]
    pub fn evaluate(&self, hero: &HeroState, ctx: &EventContext) -> Vec<&AchievementDef> {
        self.iter()
            .filter(|def| !hero.unlocked.contains(&def.id) && trigger_met(&def.trigger, hero, ctx))
            .collect()
    }

    /// Progress toward one achievement, or `None` for an unknown id.
    ///
    /// Event-flag achievements have binary progress: 0 until unlocked,
    /// then complete.
    #[must_use]
    pub fn progress_for(&self, id: &AchievementId, hero: &HeroState) -> Option<AchievementProgress> {
        let def = self.get(id)?;

        let (actual, required) = match &def.trigger {
            Trigger::StatAtLeast { key, threshold } => (hero.stats.get(key), *threshold),
            Trigger::LevelAtLeast(threshold) => (u64::from(hero.level), u64::from(*threshold)),
            Trigger::StreakAtLeast(threshold) => {
                (hero.stats.get(stat::LONGEST_STREAK), u64::from(*threshold))
            },
            Trigger::EventFlag(_) => (u64::from(hero.unlocked.contains(id)), 1),
        };

        // Catalog validation guarantees required > 0.
        let current = actual.min(required);
        let percentage = ((current as f64 / required as f64) * 100.0).round() as u32;

        Some(AchievementProgress {
            current,
            required,
            percentage,
        })
    }

    /// Locked achievements nearest to unlocking, best progress first.
    /// Ties keep declaration order.
    #[must_use]
    pub fn upcoming(&self, hero: &HeroState, count: usize) -> Vec<(&AchievementDef, AchievementProgress)> {
        let mut locked: Vec<(&AchievementDef, AchievementProgress)> = self
            .iter()
            .filter(|def| !hero.unlocked.contains(&def.id))
            .filter_map(|def| self.progress_for(&def.id, hero).map(|p| (def, p)))
            .collect();

        locked.sort_by(|a, b| b.1.percentage.cmp(&a.1.percentage));
        locked.truncate(count);
        locked
    }

    /// Overall and per-rarity completion tallies for a hero.
    #[must_use]
    pub fn completion_stats(&self, hero: &HeroState) -> CompletionStats {
        let total = self.len();
        let unlocked = self
            .iter()
            .filter(|def| hero.unlocked.contains(&def.id))
            .count();
        let percentage = if total > 0 {
            ((unlocked as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        let mut by_rarity: HashMap<Rarity, RarityTally> = HashMap::new();
        for def in self.iter() {
            let tally = by_rarity.entry(def.rarity).or_default();
            tally.total += 1;
            if hero.unlocked.contains(&def.id) {
                tally.unlocked += 1;
            }
        }

        CompletionStats {
            total,
            unlocked,
            percentage,
            by_rarity,
        }
    }
}

/// Unlock counts for one rarity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityTally {
    /// Achievements of this rarity in the catalog.
    pub total: usize,
    /// How many of them the hero has unlocked.
    pub unlocked: usize,
}

/// Catalog-wide completion summary for a hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Catalog size.
    pub total: usize,
    /// Achievements unlocked.
    pub unlocked: usize,
    /// Integer completion percentage.
    pub percentage: u32,
    /// Tallies per rarity tier.
    pub by_rarity: HashMap<Rarity, RarityTally>,
}
