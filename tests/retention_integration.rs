//! Integration tests for the recent window against creation stores

use std::future::Future;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dyecraft::core::types::{CreationId, OwnerId};
use dyecraft::retention::{
    enforce_recent_window, Creation, CreationStore, InMemoryCreationStore, RetentionSlot,
    DEFAULT_RECENT_CAP,
};
use dyecraft::scoring::Scorer;
use dyecraft::{DyeError, Result};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn creation_at(owner: OwnerId, minutes: i64) -> Creation {
    Creation::recent(
        owner,
        Vec::new(),
        Scorer::default().score(&[]),
        epoch() + Duration::minutes(minutes),
    )
}

/// Inserts `count` creations a minute apart, oldest first
async fn seed<S: CreationStore>(store: &S, owner: OwnerId, count: i64) -> Vec<Creation> {
    let mut created = Vec::new();
    for minute in 0..count {
        let creation = creation_at(owner, minute);
        store.insert(creation.clone()).await.unwrap();
        created.push(creation);
    }
    created
}

fn ids(creations: &[Creation]) -> Vec<CreationId> {
    creations.iter().map(|c| c.id).collect()
}

/// In-memory store whose slot updates fail for one creation
struct FlakyStore {
    inner: InMemoryCreationStore,
    fail_on: Option<CreationId>,
}

impl CreationStore for FlakyStore {
    fn insert(&self, creation: Creation) -> impl Future<Output = Result<()>> + Send {
        self.inner.insert(creation)
    }

    fn get(&self, id: CreationId) -> impl Future<Output = Result<Creation>> + Send {
        self.inner.get(id)
    }

    fn list(
        &self,
        owner: OwnerId,
        slot: RetentionSlot,
    ) -> impl Future<Output = Result<Vec<Creation>>> + Send {
        self.inner.list(owner, slot)
    }

    fn set_slot(&self, id: CreationId, slot: RetentionSlot) -> impl Future<Output = Result<()>> + Send {
        let fail = self.fail_on == Some(id);
        async move {
            if fail {
                return Err(DyeError::Store("injected slot failure".into()));
            }
            self.inner.set_slot(id, slot).await
        }
    }
}

#[tokio::test]
async fn test_seven_creations_leave_five_recent() {
    let store = InMemoryCreationStore::new();
    let owner = OwnerId::new();
    let created = seed(&store, owner, 7).await;

    let report = enforce_recent_window(&store, owner, DEFAULT_RECENT_CAP).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.expired_count(), 2);

    let recent = store.list(owner, RetentionSlot::Recent).await.unwrap();
    let mut newest_five = ids(&created[2..]);
    newest_five.reverse();
    assert_eq!(ids(&recent), newest_five);

    let expired = store.list(owner, RetentionSlot::Expired).await.unwrap();
    assert_eq!(ids(&expired), vec![created[1].id, created[0].id]);

    // Eviction only re-tags; nothing is deleted
    assert_eq!(store.len(), 7);
}

#[tokio::test]
async fn test_second_run_changes_nothing() {
    let store = InMemoryCreationStore::new();
    let owner = OwnerId::new();
    seed(&store, owner, 7).await;

    enforce_recent_window(&store, owner, 5).await.unwrap();
    let before = store.list(owner, RetentionSlot::Recent).await.unwrap();

    let report = enforce_recent_window(&store, owner, 5).await.unwrap();
    assert!(report.outcome.is_noop());
    assert_eq!(store.list(owner, RetentionSlot::Recent).await.unwrap(), before);
}

#[tokio::test]
async fn test_under_cap_is_untouched() {
    let store = InMemoryCreationStore::new();
    let owner = OwnerId::new();
    seed(&store, owner, 3).await;

    let report = enforce_recent_window(&store, owner, 5).await.unwrap();
    assert!(report.outcome.is_noop());
    assert_eq!(report.outcome.retained.len(), 3);
}

#[tokio::test]
async fn test_other_owners_are_not_counted() {
    let store = InMemoryCreationStore::new();
    let alice = OwnerId::new();
    let bob = OwnerId::new();
    seed(&store, alice, 4).await;
    seed(&store, bob, 4).await;

    enforce_recent_window(&store, alice, 5).await.unwrap();

    assert_eq!(store.list(alice, RetentionSlot::Recent).await.unwrap().len(), 4);
    assert_eq!(store.list(bob, RetentionSlot::Recent).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_kept_creations_are_never_evicted() {
    let store = InMemoryCreationStore::new();
    let owner = OwnerId::new();
    let created = seed(&store, owner, 7).await;

    // The two oldest are moved to the inventory before trimming
    store.set_slot(created[0].id, RetentionSlot::Kept).await.unwrap();
    store.set_slot(created[1].id, RetentionSlot::Kept).await.unwrap();

    let report = enforce_recent_window(&store, owner, 5).await.unwrap();
    assert!(report.outcome.is_noop());

    let kept = store.list(owner, RetentionSlot::Kept).await.unwrap();
    assert_eq!(kept.len(), 2);
    assert!(store.list(owner, RetentionSlot::Expired).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_slot_update_is_reported_not_fatal() {
    let owner = OwnerId::new();
    let mut store = FlakyStore {
        inner: InMemoryCreationStore::new(),
        fail_on: None,
    };
    let created = seed(&store, owner, 7).await;
    store.fail_on = Some(created[0].id);

    let report = enforce_recent_window(&store, owner, 5).await.unwrap();
    assert!(!report.is_complete());
    assert_eq!(report.failed, vec![created[0].id]);
    assert_eq!(report.expired_count(), 1);

    // The window overshoots by the failed creation until a later run succeeds
    assert_eq!(store.list(owner, RetentionSlot::Recent).await.unwrap().len(), 6);

    store.fail_on = None;
    let retry = enforce_recent_window(&store, owner, 5).await.unwrap();
    assert!(retry.is_complete());
    assert_eq!(retry.outcome.evicted, vec![created[0].id]);
    assert_eq!(store.list(owner, RetentionSlot::Recent).await.unwrap().len(), 5);
}

#[test]
fn test_atomic_insert_keeps_window_at_cap() {
    let store = InMemoryCreationStore::new();
    let owner = OwnerId::new();

    let mut last = None;
    for minute in 0..9 {
        let outcome = store.insert_with_retention(creation_at(owner, minute), 5).unwrap();
        assert!(outcome.retained.len() <= 5);
        last = Some(outcome);
    }

    let last = last.unwrap();
    assert_eq!(last.retained.len(), 5);
    assert_eq!(last.evicted.len(), 1);
    assert_eq!(store.len(), 9);
}
