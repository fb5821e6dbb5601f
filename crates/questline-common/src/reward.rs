//! Reward value types shared by missions, achievements, and streaks.

use serde::{Deserialize, Serialize};

/// An XP/gold reward pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    /// Experience points granted.
    pub xp: u64,
    /// Gold granted.
    pub gold: u64,
}

impl Reward {
    /// The empty reward.
    pub const NONE: Self = Self { xp: 0, gold: 0 };

    /// Creates a new reward.
    #[must_use]
    pub const fn new(xp: u64, gold: u64) -> Self {
        Self { xp, gold }
    }

    /// Checks whether the reward grants nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.xp == 0 && self.gold == 0
    }
}

impl std::ops::Add for Reward {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            xp: self.xp.saturating_add(rhs.xp),
            gold: self.gold.saturating_add(rhs.gold),
        }
    }
}

impl std::ops::AddAssign for Reward {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Reward {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::NONE, |acc, r| acc + r)
    }
}

impl std::fmt::Display for Reward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} XP, {} gold", self.xp, self.gold)
    }
}
