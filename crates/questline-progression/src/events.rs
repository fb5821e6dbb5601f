//! Event bus for broadcasting progression changes.
//!
//! Transitions publish plain-data events that the notification collaborator
//! drains and renders. Publishing never blocks: when the channel is full
//! the event is dropped, since a missed toast must not stall a transition.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::hero::XpSource;
use crate::streak::StreakKind;
use questline_common::{AchievementId, Reward};

/// Progression changes worth telling the user about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// XP was gained
    XpGained {
        /// Amount gained
        amount: u64,
        /// Attribution bucket
        source: XpSource,
    },
    /// Gold was earned
    GoldEarned {
        /// Amount earned, pre-clamp
        amount: u64,
    },
    /// A level threshold was crossed
    LevelUp {
        /// Level before
        old_level: u32,
        /// Level after
        new_level: u32,
    },
    /// A new rank title was earned
    TitleChanged {
        /// Title now held
        new_title: String,
    },
    /// An achievement was unlocked
    AchievementUnlocked {
        /// Achievement id
        id: AchievementId,
        /// Reward granted
        reward: Reward,
    },
    /// A streak advanced
    StreakExtended {
        /// Streak kind
        kind: StreakKind,
        /// Run length after the extension
        current: u32,
        /// Whether this set a new record
        is_new_record: bool,
    },
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<ProgressionEvent>,
    /// Receiver for collecting events
    receiver: Receiver<ProgressionEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: ProgressionEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<ProgressionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<ProgressionEvent> {
        self.sender.clone()
    }
}
