//! Level-gated hero rank titles.

use serde::{Deserialize, Serialize};

/// A rank title earned at a level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTitle {
    /// Level at which the title is earned.
    pub level: u32,
    /// Display title.
    pub title: &'static str,
    /// Flavor text shown with the title.
    pub description: &'static str,
}

/// Title table, ascending by level.
pub const TITLES: [RankTitle; 7] = [
    RankTitle {
        level: 1,
        title: "Novice",
        description: "Taking the first steps of the journey",
    },
    RankTitle {
        level: 5,
        title: "Apprentice",
        description: "Gaining confidence and momentum",
    },
    RankTitle {
        level: 15,
        title: "Journeyman",
        description: "Reliable under any workload",
    },
    RankTitle {
        level: 30,
        title: "Veteran",
        description: "Leading by steady example",
    },
    RankTitle {
        level: 50,
        title: "Master",
        description: "A recognized expert",
    },
    RankTitle {
        level: 75,
        title: "Grandmaster",
        description: "Shaping the craft itself",
    },
    RankTitle {
        level: 100,
        title: "Paragon",
        description: "The summit of dedication",
    },
];

/// The title held at a level: the highest entry not above it.
#[must_use]
pub fn title_for_level(level: u32) -> &'static RankTitle {
    TITLES
        .iter()
        .rev()
        .find(|t| level >= t.level)
        .unwrap_or(&TITLES[0])
}

/// The next title ahead of `level`, if any remain.
#[must_use]
pub fn next_title(level: u32) -> Option<&'static RankTitle> {
    TITLES.iter().find(|t| level < t.level)
}

/// A title change produced by a level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleChange {
    /// Title held before.
    pub old_title: String,
    /// Title held now.
    pub new_title: String,
}

/// Detects whether moving between levels crossed a title threshold.
#[must_use]
pub fn check_title_change(old_level: u32, new_level: u32) -> Option<TitleChange> {
    let old = title_for_level(old_level);
    let new = title_for_level(new_level);

    (old.title != new.title).then(|| TitleChange {
        old_title: old.title.to_string(),
        new_title: new.title.to_string(),
    })
}
