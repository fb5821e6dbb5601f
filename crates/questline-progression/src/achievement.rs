//! Achievement catalog: declarative definitions and load-time validation.
//!
//! Each achievement is a static definition whose trigger is one variant of
//! a closed sum type. Adding a new trigger kind means adding a variant and
//! letting the compiler point at every match that must handle it, instead
//! of growing an if-chain.

use crate::hero::stat;
use questline_common::{AchievementId, Reward};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

/// Achievement grouping for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Mission completion counts.
    Missions,
    /// Level milestones.
    Levels,
    /// Streak lengths.
    Streaks,
    /// Cumulative resource totals.
    Resources,
    /// Event-driven one-offs.
    Special,
}

/// Achievement rarity, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Baseline rarity.
    Common,
    /// Slightly harder to earn.
    Uncommon,
    /// A real accomplishment.
    Rare,
    /// Exceptional dedication.
    Epic,
    /// The rarest tier.
    Legendary,
}

impl Rarity {
    /// Display name for this rarity.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// Boolean flags describing the triggering event, computed by the caller
/// from the event's timestamp. The evaluator never reads a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFlag {
    /// The triggering action happened before 08:00.
    EarlyCompletion,
    /// The triggering action happened at or after 22:00.
    LateCompletion,
}

/// Condition under which an achievement unlocks.
///
/// All threshold variants use at-least semantics: the achievement fires
/// when the value meets or exceeds the threshold, not only on exact match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// A cumulative stat counter reached a threshold.
    StatAtLeast {
        /// Stat key to read (missing keys read as 0).
        key: String,
        /// Threshold to meet or exceed.
        threshold: u64,
    },
    /// The hero's level reached a threshold.
    LevelAtLeast(u32),
    /// The longest recorded streak reached a threshold.
    StreakAtLeast(u32),
    /// A boolean event flag was set on the triggering action.
    EventFlag(EventFlag),
}

impl Trigger {
    /// Creates a stat threshold trigger.
    #[must_use]
    pub fn stat(key: impl Into<String>, threshold: u64) -> Self {
        Self::StatAtLeast {
            key: key.into(),
            threshold,
        }
    }

    /// Creates a level threshold trigger.
    #[must_use]
    pub const fn level(threshold: u32) -> Self {
        Self::LevelAtLeast(threshold)
    }

    /// Creates a streak length trigger.
    #[must_use]
    pub const fn streak(threshold: u32) -> Self {
        Self::StreakAtLeast(threshold)
    }

    /// Creates an event flag trigger.
    #[must_use]
    pub const fn event(flag: EventFlag) -> Self {
        Self::EventFlag(flag)
    }
}

/// A single achievement definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    /// Stable unique key.
    pub id: AchievementId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Grouping for display.
    pub category: Category,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Unlock condition.
    pub trigger: Trigger,
    /// Reward granted on unlock.
    pub reward: Reward,
}

/// Catalog validation errors. Fatal at load time: a catalog that fails
/// validation must never be evaluated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two definitions share an id
    #[error("duplicate achievement id: {0}")]
    DuplicateId(AchievementId),
    /// A threshold trigger with a zero requirement
    #[error("achievement {0} has a zero threshold")]
    ZeroThreshold(AchievementId),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// An immutable, validated set of achievement definitions.
///
/// Declaration order is preserved and is the order evaluation results are
/// reported in, so notification ordering stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementCatalog {
    defs: Vec<AchievementDef>,
}

impl AchievementCatalog {
    /// Builds a catalog, rejecting duplicate ids and zero thresholds.
    pub fn new(defs: Vec<AchievementDef>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for def in &defs {
            if !seen.insert(def.id.clone()) {
                return Err(CatalogError::DuplicateId(def.id.clone()));
            }

            let zero = match def.trigger {
                Trigger::StatAtLeast { threshold, .. } => threshold == 0,
                Trigger::LevelAtLeast(threshold) | Trigger::StreakAtLeast(threshold) => {
                    threshold == 0
                },
                Trigger::EventFlag(_) => false,
            };
            if zero {
                return Err(CatalogError::ZeroThreshold(def.id.clone()));
            }
        }

        Ok(Self { defs })
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AchievementDef> {
        self.defs.iter()
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn get(&self, id: &AchievementId) -> Option<&AchievementDef> {
        self.defs.iter().find(|d| &d.id == id)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions in a category, declaration order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&AchievementDef> {
        self.defs.iter().filter(|d| d.category == category).collect()
    }

    /// Definitions of a rarity, declaration order.
    #[must_use]
    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&AchievementDef> {
        self.defs.iter().filter(|d| d.rarity == rarity).collect()
    }
}

/// The built-in achievement table, initialized once per process.
///
/// The table is code, not data: a zero threshold or duplicate id here is a
/// programmer error, so first access fails fast rather than evaluating a
/// broken catalog.
pub fn standard_catalog() -> &'static AchievementCatalog {
    static STANDARD: OnceLock<AchievementCatalog> = OnceLock::new();
    STANDARD.get_or_init(|| {
        AchievementCatalog::new(standard_defs()).expect("built-in achievement catalog is valid")
    })
}

fn standard_defs() -> Vec<AchievementDef> {
    fn def(
        id: &str,
        title: &str,
        description: &str,
        category: Category,
        rarity: Rarity,
        trigger: Trigger,
        reward: Reward,
    ) -> AchievementDef {
        AchievementDef {
            id: AchievementId::new(id),
            title: title.to_string(),
            description: description.to_string(),
            category,
            rarity,
            trigger,
            reward,
        }
    }

    vec![
        // Missions
        def(
            "first_mission",
            "First Steps",
            "Complete your first mission",
            Category::Missions,
            Rarity::Common,
            Trigger::stat(stat::MISSIONS_COMPLETED, 1),
            Reward::new(50, 25),
        ),
        def(
            "mission_veteran",
            "Seasoned Adventurer",
            "Complete 10 missions",
            Category::Missions,
            Rarity::Uncommon,
            Trigger::stat(stat::MISSIONS_COMPLETED, 10),
            Reward::new(200, 100),
        ),
        def(
            "mission_master",
            "Mission Master",
            "Complete 50 missions",
            Category::Missions,
            Rarity::Rare,
            Trigger::stat(stat::MISSIONS_COMPLETED, 50),
            Reward::new(500, 250),
        ),
        def(
            "mission_legend",
            "Living Legend",
            "Complete 100 missions",
            Category::Missions,
            Rarity::Legendary,
            Trigger::stat(stat::MISSIONS_COMPLETED, 100),
            Reward::new(1000, 500),
        ),
        // Levels
        def(
            "level_up",
            "Moving Up",
            "Reach level 5",
            Category::Levels,
            Rarity::Common,
            Trigger::level(5),
            Reward::new(100, 50),
        ),
        def(
            "experienced",
            "Experienced",
            "Reach level 10",
            Category::Levels,
            Rarity::Uncommon,
            Trigger::level(10),
            Reward::new(300, 150),
        ),
        def(
            "expert",
            "Expert",
            "Reach level 25",
            Category::Levels,
            Rarity::Rare,
            Trigger::level(25),
            Reward::new(750, 375),
        ),
        def(
            "master",
            "Grandmaster",
            "Reach level 50",
            Category::Levels,
            Rarity::Legendary,
            Trigger::level(50),
            Reward::new(1500, 750),
        ),
        // Streaks
        def(
            "streak_starter",
            "Streak Starter",
            "Keep a 3-day streak going",
            Category::Streaks,
            Rarity::Common,
            Trigger::streak(3),
            Reward::new(75, 40),
        ),
        def(
            "streak_keeper",
            "Streak Keeper",
            "Keep a 7-day streak going",
            Category::Streaks,
            Rarity::Uncommon,
            Trigger::streak(7),
            Reward::new(200, 100),
        ),
        def(
            "streak_master",
            "Streak Master",
            "Keep a 30-day streak going",
            Category::Streaks,
            Rarity::Rare,
            Trigger::streak(30),
            Reward::new(1000, 500),
        ),
        // Resources
        def(
            "gold_collector",
            "Gold Collector",
            "Earn 1000 gold in total",
            Category::Resources,
            Rarity::Uncommon,
            Trigger::stat(stat::TOTAL_GOLD_EARNED, 1000),
            Reward::new(300, 200),
        ),
        def(
            "gold_hoarder",
            "Gold Hoarder",
            "Earn 5000 gold in total",
            Category::Resources,
            Rarity::Rare,
            Trigger::stat(stat::TOTAL_GOLD_EARNED, 5000),
            Reward::new(750, 500),
        ),
        def(
            "xp_hunter",
            "XP Hunter",
            "Gain 5000 XP in total",
            Category::Resources,
            Rarity::Uncommon,
            Trigger::stat(stat::TOTAL_XP_GAINED, 5000),
            Reward::new(500, 250),
        ),
        // Special
        def(
            "early_bird",
            "Early Bird",
            "Complete a mission before 08:00",
            Category::Special,
            Rarity::Uncommon,
            Trigger::event(EventFlag::EarlyCompletion),
            Reward::new(100, 50),
        ),
        def(
            "night_owl",
            "Night Owl",
            "Complete a mission after 22:00",
            Category::Special,
            Rarity::Uncommon,
            Trigger::event(EventFlag::LateCompletion),
            Reward::new(100, 50),
        ),
        def(
            "perfectionist",
            "Perfectionist",
            "Complete 10 hard missions",
            Category::Special,
            Rarity::Rare,
            Trigger::stat(stat::MISSIONS_HARD, 10),
            Reward::new(400, 200),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = standard_catalog();
        assert_eq!(catalog.len(), 17);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_standard_catalog_declaration_order() {
        let catalog = standard_catalog();
        let first = catalog.iter().next().expect("non-empty");
        assert_eq!(first.id.as_str(), "first_mission");

        let last = catalog.iter().last().expect("non-empty");
        assert_eq!(last.id.as_str(), "perfectionist");
    }

    #[test]
    fn test_get_by_id() {
        let catalog = standard_catalog();
        let keeper = catalog
            .get(&AchievementId::new("streak_keeper"))
            .expect("exists");
        assert_eq!(keeper.trigger, Trigger::streak(7));
        assert_eq!(keeper.reward, Reward::new(200, 100));

        assert!(catalog.get(&AchievementId::new("nonexistent")).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let dup = standard_defs()
            .into_iter()
            .chain(standard_defs().into_iter().take(1))
            .collect();
        let result = AchievementCatalog::new(dup);
        assert_eq!(
            result,
            Err(CatalogError::DuplicateId(AchievementId::new(
                "first_mission"
            )))
        );
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let defs = vec![AchievementDef {
            id: AchievementId::new("broken"),
            title: "Broken".to_string(),
            description: "Zero threshold".to_string(),
            category: Category::Missions,
            rarity: Rarity::Common,
            trigger: Trigger::stat(stat::MISSIONS_COMPLETED, 0),
            reward: Reward::new(10, 5),
        }];
        assert_eq!(
            AchievementCatalog::new(defs),
            Err(CatalogError::ZeroThreshold(AchievementId::new("broken")))
        );

        let defs = vec![AchievementDef {
            id: AchievementId::new("broken_level"),
            title: "Broken".to_string(),
            description: "Zero level".to_string(),
            category: Category::Levels,
            rarity: Rarity::Common,
            trigger: Trigger::level(0),
            reward: Reward::new(10, 5),
        }];
        assert!(matches!(
            AchievementCatalog::new(defs),
            Err(CatalogError::ZeroThreshold(_))
        ));
    }

    #[test]
    fn test_by_category_and_rarity() {
        let catalog = standard_catalog();
        assert_eq!(catalog.by_category(Category::Missions).len(), 4);
        assert_eq!(catalog.by_category(Category::Special).len(), 3);
        assert_eq!(catalog.by_rarity(Rarity::Legendary).len(), 2);
        assert!(catalog.by_rarity(Rarity::Epic).is_empty());
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Uncommon < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }
}
