//! Progression transitions: the entry points the task tracker calls after
//! each event (mission completion, XP gain, login).
//!
//! Each call is one atomic state transition over the hero record. Stat
//! counters are updated before achievements are evaluated, because
//! achievements read them; the returned [`TransitionResult`] enumerates
//! every change the call made and is the single source of truth for
//! caller-side notifications.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::achievement::{standard_catalog, AchievementCatalog, AchievementDef};
use crate::evaluator::EventContext;
use crate::events::{EventBus, ProgressionEvent};
use crate::hero::{stat, HeroState, XpSource, GOLD_CAP};
use crate::level::{self, LevelBonuses, LevelUp};
use crate::streak::{StreakKind, StreakUpdate};
use crate::title::{check_title_change, TitleChange};
use questline_common::{Clock, Reward};

/// Mission difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Quick, low-effort missions.
    Easy,
    /// The everyday tier.
    Medium,
    /// Demanding missions.
    Hard,
}

impl Difficulty {
    /// Base XP granted for completing a mission of this difficulty.
    #[must_use]
    pub const fn base_xp(self) -> u64 {
        match self {
            Self::Easy => 10,
            Self::Medium => 25,
            Self::Hard => 50,
        }
    }

    /// The per-difficulty completion counter this tier increments.
    #[must_use]
    pub const fn stat_key(self) -> &'static str {
        match self {
            Self::Easy => stat::MISSIONS_EASY,
            Self::Medium => stat::MISSIONS_MEDIUM,
            Self::Hard => stat::MISSIONS_HARD,
        }
    }
}

/// Mission cadence, scaling the gold payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// One-off, long-running goals.
    Campaign,
}

impl MissionKind {
    /// Gold multiplier for this cadence.
    #[must_use]
    pub const fn gold_multiplier(self) -> u64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Campaign => 3,
        }
    }
}

/// Base rewards for a mission: XP from difficulty, gold at 40% of the XP
/// scaled by cadence.
#[must_use]
pub fn mission_rewards(difficulty: Difficulty, kind: MissionKind) -> Reward {
    let xp = difficulty.base_xp();
    let base_gold = (xp as f64 * 0.4).round() as u64;
    Reward::new(xp, base_gold * kind.gold_multiplier())
}

/// Metadata about a completed mission, supplied by the task tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionMeta {
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Cadence.
    pub kind: MissionKind,
    /// When the mission was completed. Its calendar date drives the
    /// daily-mission streak; its hour drives the early/late event flags.
    pub completed_at: NaiveDateTime,
}

impl MissionMeta {
    /// Creates mission metadata.
    #[must_use]
    pub const fn new(difficulty: Difficulty, kind: MissionKind, completed_at: NaiveDateTime) -> Self {
        Self {
            difficulty,
            kind,
            completed_at,
        }
    }
}

/// Everything one transition changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// Level comparison across the whole transition, achievement rewards
    /// included.
    pub level_up: LevelUp,
    /// Rank title change, when the level change crossed a title threshold.
    pub title_change: Option<TitleChange>,
    /// Streak outcome for the streak this transition touches.
    pub streak: StreakUpdate,
    /// Newly unlocked achievements, in catalog order.
    pub unlocked: Vec<AchievementDef>,
    /// Sum of the unlocked achievements' rewards.
    pub total_reward: Reward,
    /// XP delta the caller passed in.
    pub xp_gained: u64,
    /// Gold delta the caller passed in.
    pub gold_gained: u64,
}

/// The progression engine: immutable catalog plus an event bus.
///
/// Holds no hero state of its own; every method is a synchronous, pure
/// computation over the hero record passed in. Callers are responsible for
/// serializing concurrent transitions on the same hero.
#[derive(Debug)]
pub struct Progression {
    catalog: &'static AchievementCatalog,
    events: EventBus,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Creates an engine over the built-in achievement catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(standard_catalog())
    }

    /// Creates an engine over a custom catalog.
    #[must_use]
    pub fn with_catalog(catalog: &'static AchievementCatalog) -> Self {
        Self {
            catalog,
            events: EventBus::default(),
        }
    }

    /// The catalog this engine evaluates.
    #[must_use]
    pub fn catalog(&self) -> &AchievementCatalog {
        self.catalog
    }

    /// The event bus transitions publish to.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Applies a completed mission to the hero.
    ///
    /// Steps run in a fixed order: XP and level first, then the stat
    /// counters achievements read, then the daily-mission streak, then
    /// achievement evaluation and commit. Infallible on well-formed input:
    /// every step is a total function and deltas are unsigned.
    pub fn apply_mission_completion(
        &self,
        hero: &mut HeroState,
        xp_gained: u64,
        gold_gained: u64,
        meta: &MissionMeta,
    ) -> TransitionResult {
        let old_xp = hero.xp;

        // 1. XP and provisional level; bonuses only move when the level does.
        hero.xp = hero.xp.saturating_add(xp_gained);
        self.sync_level(hero);
        self.events.publish(ProgressionEvent::XpGained {
            amount: xp_gained,
            source: XpSource::Missions,
        });

        // 2. Counters, before evaluation reads them. The balance is
        // clamped; the cumulative counters are not.
        hero.stats.add(stat::MISSIONS_COMPLETED, 1);
        hero.stats.add(meta.difficulty.stat_key(), 1);
        hero.stats.add(stat::TOTAL_XP_GAINED, xp_gained);
        hero.stats.add(stat::TOTAL_GOLD_EARNED, gold_gained);
        hero.stats.add(XpSource::Missions.stat_key(), xp_gained);
        hero.gold = hero.gold.saturating_add(gold_gained).min(GOLD_CAP);
        if gold_gained > 0 {
            self.events
                .publish(ProgressionEvent::GoldEarned { amount: gold_gained });
        }

        // 3. Daily-mission streak, on the completion date.
        let streak = self.record_streak(hero, StreakKind::DailyMissions, meta.completed_at.date());

        // 4. Event flags from the completion hour.
        let ctx = EventContext::from_hour(meta.completed_at.hour());

        // 5. Achievements.
        let (unlocked, total_reward) = self.commit_achievements(hero, &ctx);

        // 6. Achievement XP may have crossed another threshold; reconcile
        // so level == level_for_xp(xp) holds on return.
        let (level_up, title_change) = self.reconcile_level(hero, old_xp);

        TransitionResult {
            level_up,
            title_change,
            streak,
            unlocked,
            total_reward,
            xp_gained,
            gold_gained,
        }
    }

    /// Applies a bare XP gain (bonus XP, imported history, admin grants).
    ///
    /// Advances the XP-gain streak and evaluates achievements with no
    /// event flags set.
    pub fn apply_xp_gain(
        &self,
        hero: &mut HeroState,
        amount: u64,
        source: XpSource,
        at: NaiveDateTime,
    ) -> TransitionResult {
        let old_xp = hero.xp;

        hero.xp = hero.xp.saturating_add(amount);
        self.sync_level(hero);
        self.events
            .publish(ProgressionEvent::XpGained { amount, source });

        hero.stats.add(stat::TOTAL_XP_GAINED, amount);
        hero.stats.add(source.stat_key(), amount);

        let streak = self.record_streak(hero, StreakKind::XpGain, at.date());
        let (unlocked, total_reward) = self.commit_achievements(hero, &EventContext::none());
        let (level_up, title_change) = self.reconcile_level(hero, old_xp);

        TransitionResult {
            level_up,
            title_change,
            streak,
            unlocked,
            total_reward,
            xp_gained: amount,
            gold_gained: 0,
        }
    }

    /// Records a login for streak purposes.
    pub fn record_login(&self, hero: &mut HeroState, clock: &dyn Clock) -> StreakUpdate {
        self.record_streak(hero, StreakKind::Login, clock.today())
    }

    /// Aligns `hero.level` and bonuses with cumulative XP.
    fn sync_level(&self, hero: &mut HeroState) {
        let level = level::level_for_xp(hero.xp);
        if level != hero.level {
            hero.level = level;
            hero.bonuses = LevelBonuses::for_level(level);
        }
    }

    /// Records streak activity and mirrors the streak stats achievements
    /// read.
    fn record_streak(&self, hero: &mut HeroState, kind: StreakKind, today: NaiveDate) -> StreakUpdate {
        let update = hero.streaks.record(kind, today);
        if update.updated {
            hero.stats.set(stat::CURRENT_STREAK, u64::from(update.current));
            let longest = u64::from(hero.streaks.longest(kind));
            if longest > hero.stats.get(stat::LONGEST_STREAK) {
                hero.stats.set(stat::LONGEST_STREAK, longest);
            }

            debug!("streak {:?} extended to {}", kind, update.current);
            self.events.publish(ProgressionEvent::StreakExtended {
                kind,
                current: update.current,
                is_new_record: update.is_new_record,
            });
        }
        update
    }

    /// Evaluates the catalog and commits every match: ids appended in
    /// evaluation order, rewards applied, achievement stats bumped.
    fn commit_achievements(
        &self,
        hero: &mut HeroState,
        ctx: &EventContext,
    ) -> (Vec<AchievementDef>, Reward) {
        let unlocked: Vec<AchievementDef> = self
            .catalog
            .evaluate(hero, ctx)
            .into_iter()
            .cloned()
            .collect();

        let mut total = Reward::NONE;
        for def in &unlocked {
            hero.unlocked.insert(def.id.clone());
            total += def.reward;

            info!(
                "achievement unlocked: {} ({})",
                def.id,
                def.rarity.display_name()
            );
            self.events.publish(ProgressionEvent::AchievementUnlocked {
                id: def.id.clone(),
                reward: def.reward,
            });
        }

        if !unlocked.is_empty() {
            hero.xp = hero.xp.saturating_add(total.xp);
            hero.gold = hero.gold.saturating_add(total.gold).min(GOLD_CAP);
            hero.stats.add(stat::ACHIEVEMENTS_UNLOCKED, unlocked.len() as u64);
            hero.stats.add(stat::TOTAL_ACHIEVEMENT_XP, total.xp);
            hero.stats.add(stat::TOTAL_ACHIEVEMENT_GOLD, total.gold);
            hero.stats.add(XpSource::Achievements.stat_key(), total.xp);
        }

        (unlocked, total)
    }

    /// Final level pass over the whole transition, old XP to final XP.
    fn reconcile_level(&self, hero: &mut HeroState, old_xp: u64) -> (LevelUp, Option<TitleChange>) {
        let level_up = level::check_level_up(old_xp, hero.xp);
        if hero.level != level_up.new_level {
            hero.level = level_up.new_level;
            hero.bonuses = LevelBonuses::for_level(hero.level);
        }

        let title_change = check_title_change(level_up.old_level, level_up.new_level);
        if level_up.leveled_up {
            hero.stats
                .add(stat::LEVELS_GAINED, u64::from(level_up.levels_gained));

            info!(
                "level up: {} -> {}",
                level_up.old_level, level_up.new_level
            );
            self.events.publish(ProgressionEvent::LevelUp {
                old_level: level_up.old_level,
                new_level: level_up.new_level,
            });
            if let Some(change) = &title_change {
                self.events.publish(ProgressionEvent::TitleChanged {
                    new_title: change.new_title.clone(),
                });
            }
        }

        (level_up, title_change)
    }
}
