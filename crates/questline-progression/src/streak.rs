//! Daily streak tracking.
//!
//! This module provides:
//! - Per-kind continuous-day streak counters
//! - Calendar-day continuity (same-day idempotence, gap reset)
//! - Bounded per-day history for charting
//! - Milestone table for streak length rewards
//!
//! Continuity is decided by calendar-date equality and an explicit
//! "yesterday = today minus one calendar day" check, never elapsed-hours
//! math, so outcomes cannot shift near midnight or across DST changes.

use chrono::NaiveDate;
use questline_common::Reward;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of history entries retained per streak (oldest evicted).
const HISTORY_CAP: usize = 100;

/// Kinds of tracked streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    /// Completing at least one mission per day.
    DailyMissions,
    /// Logging in each day.
    Login,
    /// Gaining XP each day.
    XpGain,
    /// Unlocking achievements on consecutive days.
    Achievements,
}

impl StreakKind {
    /// All tracked kinds.
    pub const ALL: [Self; 4] = [
        Self::DailyMissions,
        Self::Login,
        Self::XpGain,
        Self::Achievements,
    ];

    /// Stable key for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DailyMissions => "daily_missions",
            Self::Login => "login",
            Self::XpGain => "xp_gain",
            Self::Achievements => "achievements",
        }
    }
}

/// One day of recorded streak activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDay {
    /// Calendar date of the activity.
    pub date: NaiveDate,
    /// Streak value reached that day.
    pub streak: u32,
}

/// Result of recording streak activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    /// Whether the streak changed (false when already recorded today).
    pub updated: bool,
    /// Streak length after the call.
    pub current: u32,
    /// Whether the streak just became the longest ever.
    pub is_new_record: bool,
}

/// State of a single streak counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Length of the active run.
    pub current: u32,
    /// Longest run ever recorded. Invariant: `longest >= current`.
    pub longest: u32,
    /// Date of the most recent activity.
    pub last_active: Option<NaiveDate>,
    /// Recent activity, newest last, capped to [`HISTORY_CAP`] entries.
    history: Vec<StreakDay>,
}

impl StreakState {
    /// Creates an empty (cold) streak.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records activity for `today`.
    ///
    /// Calling twice with the same date is a no-op the second time: the
    /// streak can only advance once per calendar day. Activity after a gap
    /// of more than one day starts a fresh run at 1, because today itself
    /// counts as day one.
    pub fn record_activity(&mut self, today: NaiveDate) -> StreakUpdate {
        if self.last_active == Some(today) {
            return StreakUpdate {
                updated: false,
                current: self.current,
                is_new_record: false,
            };
        }

        if self.last_active.is_some() && self.last_active == today.pred_opt() {
            self.current += 1;
        } else {
            self.current = 1;
        }

        self.last_active = Some(today);
        self.longest = self.longest.max(self.current);

        self.history.push(StreakDay {
            date: today,
            streak: self.current,
        });
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }

        StreakUpdate {
            updated: true,
            current: self.current,
            is_new_record: self.current == self.longest && self.current > 1,
        }
    }

    /// Whether the streak is still alive relative to `today`.
    #[must_use]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.last_active == Some(today) || self.last_active == today.pred_opt()
    }

    /// Days left to act before the streak breaks: 1 when activity is
    /// required today to keep it alive, 0 otherwise.
    #[must_use]
    pub fn days_until_reset(&self, today: NaiveDate) -> u32 {
        if self.last_active.is_some() && self.last_active == today.pred_opt() {
            1
        } else {
            0
        }
    }

    /// Recorded activity, newest last.
    #[must_use]
    pub fn history(&self) -> &[StreakDay] {
        &self.history
    }

    /// Clears the active run. The longest record and history are kept.
    pub fn reset(&mut self) {
        self.current = 0;
        self.last_active = None;
    }
}

/// Per-kind collection of streak counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    streaks: HashMap<StreakKind, StreakState>,
}

impl Streaks {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records activity for a streak kind, creating it cold if needed.
    pub fn record(&mut self, kind: StreakKind, today: NaiveDate) -> StreakUpdate {
        self.streaks.entry(kind).or_default().record_activity(today)
    }

    /// State of a streak kind, if it has ever recorded activity.
    #[must_use]
    pub fn get(&self, kind: StreakKind) -> Option<&StreakState> {
        self.streaks.get(&kind)
    }

    /// Current run length for a kind (0 when cold).
    #[must_use]
    pub fn current(&self, kind: StreakKind) -> u32 {
        self.streaks.get(&kind).map_or(0, |s| s.current)
    }

    /// Longest run ever recorded for a kind (0 when cold).
    #[must_use]
    pub fn longest(&self, kind: StreakKind) -> u32 {
        self.streaks.get(&kind).map_or(0, |s| s.longest)
    }

    /// Iterates over all streaks that have recorded activity.
    pub fn iter(&self) -> impl Iterator<Item = (StreakKind, &StreakState)> {
        self.streaks.iter().map(|(k, s)| (*k, s))
    }
}

/// A streak length milestone and its reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakMilestone {
    /// Consecutive days required.
    pub days: u32,
    /// Reward granted at this milestone.
    pub reward: Reward,
    /// Honorific attached to the milestone.
    pub title: &'static str,
}

/// Milestone table, ascending by length.
pub const MILESTONES: [StreakMilestone; 6] = [
    StreakMilestone {
        days: 3,
        reward: Reward::new(50, 25),
        title: "Consistent Novice",
    },
    StreakMilestone {
        days: 7,
        reward: Reward::new(150, 75),
        title: "Weekly Warrior",
    },
    StreakMilestone {
        days: 14,
        reward: Reward::new(300, 150),
        title: "Fortnight Champion",
    },
    StreakMilestone {
        days: 30,
        reward: Reward::new(750, 375),
        title: "Monthly Legend",
    },
    StreakMilestone {
        days: 60,
        reward: Reward::new(1500, 750),
        title: "Master of Discipline",
    },
    StreakMilestone {
        days: 100,
        reward: Reward::new(3000, 1500),
        title: "Immortal Dedication",
    },
];

/// Milestones already reached at `streak_len`, longest first.
#[must_use]
pub fn milestones_reached(streak_len: u32) -> Vec<&'static StreakMilestone> {
    MILESTONES
        .iter()
        .rev()
        .filter(|m| streak_len >= m.days)
        .collect()
}

/// The next milestone ahead of `streak_len`, if any remain.
#[must_use]
pub fn next_milestone(streak_len: u32) -> Option<&'static StreakMilestone> {
    MILESTONES.iter().find(|m| streak_len < m.days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_cold_start_begins_at_one() {
        let mut streak = StreakState::new();
        let update = streak.record_activity(date(2024, 3, 10));

        assert!(update.updated);
        assert_eq!(update.current, 1);
        assert!(!update.is_new_record); // a 1-day run is not a record
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut streak = StreakState::new();
        let today = date(2024, 3, 10);

        streak.record_activity(today);
        let second = streak.record_activity(today);

        assert!(!second.updated);
        assert_eq!(second.current, 1);
        assert_eq!(streak.history().len(), 1);
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut streak = StreakState::new();
        streak.record_activity(date(2024, 3, 10));
        let update = streak.record_activity(date(2024, 3, 11));

        assert!(update.updated);
        assert_eq!(update.current, 2);
        assert!(update.is_new_record);
    }

    #[test]
    fn test_gap_resets_to_one_not_zero() {
        let mut streak = StreakState::new();
        for day in 10..=14 {
            streak.record_activity(date(2024, 3, day));
        }
        assert_eq!(streak.current, 5);

        // Five-day gap: recording today is day one of a new run.
        let update = streak.record_activity(date(2024, 3, 19));
        assert!(update.updated);
        assert_eq!(update.current, 1);
        assert_eq!(streak.longest, 5);
        assert!(!update.is_new_record);
    }

    #[test]
    fn test_crossing_previous_record() {
        let mut streak = StreakState {
            current: 6,
            longest: 6,
            last_active: Some(date(2024, 3, 9)),
            ..StreakState::default()
        };

        let update = streak.record_activity(date(2024, 3, 10));
        assert_eq!(update.current, 7);
        assert!(update.is_new_record);
        assert_eq!(streak.longest, 7);
    }

    #[test]
    fn test_continuing_below_record_is_not_a_record() {
        let mut streak = StreakState {
            current: 2,
            longest: 10,
            last_active: Some(date(2024, 3, 9)),
            ..StreakState::default()
        };

        let update = streak.record_activity(date(2024, 3, 10));
        assert_eq!(update.current, 3);
        assert!(!update.is_new_record);
        assert_eq!(streak.longest, 10);
    }

    #[test]
    fn test_month_boundary_counts_as_consecutive() {
        let mut streak = StreakState::new();
        streak.record_activity(date(2024, 2, 29));
        let update = streak.record_activity(date(2024, 3, 1));
        assert_eq!(update.current, 2);
    }

    #[test]
    fn test_history_is_capped() {
        let mut streak = StreakState::new();
        let start = date(2020, 1, 1);
        for offset in 0..150 {
            streak.record_activity(start + chrono::Days::new(offset));
        }

        assert_eq!(streak.history().len(), 100);
        assert_eq!(streak.current, 150);
        // Oldest entries were evicted first.
        assert_eq!(streak.history()[0].streak, 51);
    }

    #[test]
    fn test_is_active_and_days_until_reset() {
        let mut streak = StreakState::new();
        let today = date(2024, 3, 10);
        streak.record_activity(today);

        assert!(streak.is_active(today));
        assert_eq!(streak.days_until_reset(today), 0);

        let tomorrow = date(2024, 3, 11);
        assert!(streak.is_active(tomorrow));
        assert_eq!(streak.days_until_reset(tomorrow), 1);

        let next_week = date(2024, 3, 17);
        assert!(!streak.is_active(next_week));
        assert_eq!(streak.days_until_reset(next_week), 0);
    }

    #[test]
    fn test_reset_keeps_longest() {
        let mut streak = StreakState::new();
        streak.record_activity(date(2024, 3, 10));
        streak.record_activity(date(2024, 3, 11));
        streak.reset();

        assert_eq!(streak.current, 0);
        assert_eq!(streak.last_active, None);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn test_streaks_collection_tracks_kinds_independently() {
        let mut streaks = Streaks::new();
        let today = date(2024, 3, 10);

        streaks.record(StreakKind::DailyMissions, today);
        streaks.record(StreakKind::DailyMissions, today + chrono::Days::new(1));
        streaks.record(StreakKind::Login, today);

        assert_eq!(streaks.current(StreakKind::DailyMissions), 2);
        assert_eq!(streaks.current(StreakKind::Login), 1);
        assert_eq!(streaks.current(StreakKind::XpGain), 0);
        assert!(streaks.get(StreakKind::Achievements).is_none());
    }

    #[test]
    fn test_milestones_reached_descending() {
        let reached = milestones_reached(14);
        let days: Vec<u32> = reached.iter().map(|m| m.days).collect();
        assert_eq!(days, vec![14, 7, 3]);

        assert!(milestones_reached(2).is_empty());
    }

    #[test]
    fn test_streak_kind_keys_are_stable() {
        let keys: Vec<&str> = StreakKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["daily_missions", "login", "xp_gain", "achievements"]
        );
    }

    #[test]
    fn test_next_milestone() {
        assert_eq!(next_milestone(0).map(|m| m.days), Some(3));
        assert_eq!(next_milestone(7).map(|m| m.days), Some(14));
        assert_eq!(next_milestone(100), None);
    }
}
