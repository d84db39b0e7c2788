//! Activity feed of workshop events
//!
//! A bounded, newest-first log owned by whoever constructs it and injected into
//! the workshop. There is no process-wide feed.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::types::{CreationId, OwnerId, Timestamp};
use crate::scoring::grade::Grade;

const DEFAULT_FEED_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedEvent {
    Submitted {
        owner: OwnerId,
        creation: CreationId,
        grade: Grade,
        total: u8,
    },
    LevelUp {
        owner: OwnerId,
        level: u32,
    },
    Kept {
        owner: OwnerId,
        creation: CreationId,
    },
}

impl FeedEvent {
    pub fn owner(&self) -> OwnerId {
        match self {
            FeedEvent::Submitted { owner, .. }
            | FeedEvent::LevelUp { owner, .. }
            | FeedEvent::Kept { owner, .. } => *owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub at: Timestamp,
    pub event: FeedEvent,
}

#[derive(Debug)]
pub struct ActivityFeed {
    entries: RwLock<VecDeque<FeedEntry>>,
    capacity: usize,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub fn post(&self, event: FeedEvent) {
        let entry = FeedEntry { at: Utc::now(), event };
        // Entries remain valid after a writer panic
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Up to `limit` entries, newest first
    pub fn latest(&self, limit: usize) -> Vec<FeedEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().take(limit).cloned().collect()
    }

    /// Up to `limit` entries about one owner, newest first
    pub fn for_owner(&self, owner: OwnerId, limit: usize) -> Vec<FeedEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .filter(|e| e.event.owner() == owner)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_up(owner: OwnerId, level: u32) -> FeedEvent {
        FeedEvent::LevelUp { owner, level }
    }

    #[test]
    fn test_newest_first() {
        let feed = ActivityFeed::new(10);
        let owner = OwnerId::new();
        feed.post(level_up(owner, 2));
        feed.post(level_up(owner, 3));

        let latest = feed.latest(10);
        assert_eq!(latest[0].event, level_up(owner, 3));
        assert_eq!(latest[1].event, level_up(owner, 2));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let feed = ActivityFeed::new(3);
        let owner = OwnerId::new();
        for level in 1..=5 {
            feed.post(level_up(owner, level));
        }

        assert_eq!(feed.len(), 3);
        let levels: Vec<_> = feed
            .latest(10)
            .into_iter()
            .map(|e| match e.event {
                FeedEvent::LevelUp { level, .. } => level,
                _ => 0,
            })
            .collect();
        assert_eq!(levels, vec![5, 4, 3]);
    }

    #[test]
    fn test_for_owner_filters() {
        let feed = ActivityFeed::default();
        let alice = OwnerId::new();
        let bob = OwnerId::new();
        feed.post(level_up(alice, 2));
        feed.post(level_up(bob, 2));
        feed.post(level_up(alice, 3));

        let entries = feed.for_owner(alice, 10);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.event.owner() == alice));
    }

    #[test]
    fn test_separate_feeds_do_not_share_state() {
        let a = ActivityFeed::default();
        let b = ActivityFeed::default();
        a.post(level_up(OwnerId::new(), 2));
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let json = serde_json::to_value(level_up(OwnerId::new(), 4)).unwrap();
        assert_eq!(json["kind"], "level_up");
        assert_eq!(json["level"], 4);
    }
}
