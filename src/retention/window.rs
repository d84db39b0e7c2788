//! Recent-creations window
//!
//! An owner keeps at most `cap` creations tagged recent. Newer creations win;
//! creations sharing a timestamp are ordered by id so the split is total and
//! repeatable.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::types::{CreationId, OwnerId, Timestamp};

/// Number of creations kept in an owner's recent window
pub const DEFAULT_RECENT_CAP: usize = 5;

/// A creation currently tagged recent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItem {
    pub id: CreationId,
    pub created_at: Timestamp,
}

/// Which recent creations stay and which leave the window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimOutcome {
    /// Newest first
    pub retained: Vec<CreationId>,
    /// Newest first
    pub evicted: Vec<CreationId>,
}

impl TrimOutcome {
    pub fn is_noop(&self) -> bool {
        self.evicted.is_empty()
    }
}

/// Newest first, ties broken by ascending id
fn newest_first(a: &RecentItem, b: &RecentItem) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
}

/// Split an owner's recent creations into the `cap` newest and the rest
///
/// Pure: the caller applies the outcome to its store. Running it again on the
/// retained set evicts nothing.
pub fn trim_recent(owner: OwnerId, items: &[RecentItem], cap: usize) -> TrimOutcome {
    let mut ordered = items.to_vec();
    ordered.sort_by(newest_first);

    let split = cap.min(ordered.len());
    let evicted: Vec<CreationId> = ordered[split..].iter().map(|item| item.id).collect();
    let retained: Vec<CreationId> = ordered[..split].iter().map(|item| item.id).collect();

    if !evicted.is_empty() {
        tracing::debug!(
            "Recent window for {} over cap {}: evicting {} of {}",
            owner,
            cap,
            evicted.len(),
            items.len()
        );
    }

    TrimOutcome { retained, evicted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn item(id: u128, minutes: i64) -> RecentItem {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RecentItem {
            id: CreationId::from_u128(id),
            created_at: epoch + Duration::minutes(minutes),
        }
    }

    fn ids(raw: &[u128]) -> Vec<CreationId> {
        raw.iter().map(|id| CreationId::from_u128(*id)).collect()
    }

    #[test]
    fn test_seven_items_keep_five_newest() {
        let owner = OwnerId::new();
        let items: Vec<_> = (1..=7).map(|i| item(i, i as i64)).collect();

        let outcome = trim_recent(owner, &items, DEFAULT_RECENT_CAP);
        assert_eq!(outcome.retained, ids(&[7, 6, 5, 4, 3]));
        assert_eq!(outcome.evicted, ids(&[2, 1]));
    }

    #[test]
    fn test_trim_is_idempotent() {
        let owner = OwnerId::new();
        let items: Vec<_> = (1..=7).map(|i| item(i, i as i64)).collect();
        let first = trim_recent(owner, &items, 5);

        let survivors: Vec<_> = items
            .iter()
            .filter(|i| first.retained.contains(&i.id))
            .copied()
            .collect();
        let second = trim_recent(owner, &survivors, 5);

        assert!(second.is_noop());
        assert_eq!(second.retained, first.retained);
    }

    #[test]
    fn test_under_cap_evicts_nothing() {
        let items: Vec<_> = (1..=3).map(|i| item(i, i as i64)).collect();
        let outcome = trim_recent(OwnerId::new(), &items, 5);
        assert!(outcome.is_noop());
        assert_eq!(outcome.retained.len(), 3);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let owner = OwnerId::new();
        let items = vec![item(3, 30), item(1, 10), item(5, 50), item(2, 20), item(4, 40), item(6, 60)];
        let mut reversed = items.clone();
        reversed.reverse();

        assert_eq!(trim_recent(owner, &items, 5), trim_recent(owner, &reversed, 5));
        assert_eq!(trim_recent(owner, &items, 5).evicted, ids(&[1]));
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let owner = OwnerId::new();
        let items: Vec<_> = [9, 4, 7, 1, 8, 2].iter().map(|id| item(*id, 0)).collect();

        let outcome = trim_recent(owner, &items, 5);
        assert_eq!(outcome.retained, ids(&[1, 2, 4, 7, 8]));
        assert_eq!(outcome.evicted, ids(&[9]));
    }

    #[test]
    fn test_zero_cap_evicts_everything() {
        let items: Vec<_> = (1..=2).map(|i| item(i, i as i64)).collect();
        let outcome = trim_recent(OwnerId::new(), &items, 0);
        assert!(outcome.retained.is_empty());
        assert_eq!(outcome.evicted, ids(&[2, 1]));
    }

    #[test]
    fn test_empty_input() {
        let outcome = trim_recent(OwnerId::new(), &[], 5);
        assert_eq!(outcome, TrimOutcome::default());
    }
}
