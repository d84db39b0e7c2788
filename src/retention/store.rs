//! Creation storage
//!
//! `CreationStore` is the seam between the engine and whatever persists
//! creations. The hosted database is reached through `remote::RestCreationStore`;
//! `InMemoryCreationStore` serves tests, the CLI simulation and local demos.

use std::fmt;
use std::future::{ready, Future};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{DyeError, Result};
use crate::core::types::{CreationId, OwnerId, Timestamp};
use crate::craft::layer::Layer;
use crate::retention::window::{trim_recent, RecentItem, TrimOutcome};
use crate::scoring::score::ScoreResult;

/// Retention state of a stored creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionSlot {
    /// In the owner's bounded recent window
    Recent,
    /// Moved to the owner's inventory; never evicted
    Kept,
    /// Pushed out of the recent window; still stored
    Expired,
}

impl RetentionSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionSlot::Recent => "recent",
            RetentionSlot::Kept => "kept",
            RetentionSlot::Expired => "expired",
        }
    }
}

impl fmt::Display for RetentionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored cloth as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creation {
    pub id: CreationId,
    #[serde(rename = "owner_id")]
    pub owner: OwnerId,
    pub layers: Vec<Layer>,
    pub score: ScoreResult,
    pub slot: RetentionSlot,
    pub created_at: Timestamp,
}

impl Creation {
    pub fn recent(owner: OwnerId, layers: Vec<Layer>, score: ScoreResult, created_at: Timestamp) -> Self {
        Self {
            id: CreationId::new(),
            owner,
            layers,
            score,
            slot: RetentionSlot::Recent,
            created_at,
        }
    }

    pub fn as_recent_item(&self) -> RecentItem {
        RecentItem {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

/// Persistence for creations
///
/// Implementations must be shareable across tasks; every call is independent
/// and no call is retried here.
pub trait CreationStore: Send + Sync {
    fn insert(&self, creation: Creation) -> impl Future<Output = Result<()>> + Send;

    fn get(&self, id: CreationId) -> impl Future<Output = Result<Creation>> + Send;

    /// An owner's creations in `slot`, newest first
    fn list(&self, owner: OwnerId, slot: RetentionSlot)
        -> impl Future<Output = Result<Vec<Creation>>> + Send;

    fn set_slot(&self, id: CreationId, slot: RetentionSlot) -> impl Future<Output = Result<()>> + Send;
}

/// Creations held in process memory
#[derive(Debug, Default)]
pub struct InMemoryCreationStore {
    creations: RwLock<AHashMap<CreationId, Creation>>,
}

impl InMemoryCreationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, AHashMap<CreationId, Creation>>> {
        self.creations
            .read()
            .map_err(|_| DyeError::Store("creation map lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AHashMap<CreationId, Creation>>> {
        self.creations
            .write()
            .map_err(|_| DyeError::Store("creation map lock poisoned".into()))
    }

    pub fn len(&self) -> usize {
        self.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_now(&self, owner: OwnerId, slot: RetentionSlot) -> Result<Vec<Creation>> {
        let map = self.read()?;
        let mut found: Vec<Creation> = map
            .values()
            .filter(|c| c.owner == owner && c.slot == slot)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    /// Insert a recent creation and trim the owner's window under one lock
    ///
    /// The strict alternative to `enforce_recent_window`: the cap can never be
    /// observed exceeded, at the cost of holding the write lock for the trim.
    pub fn insert_with_retention(&self, creation: Creation, cap: usize) -> Result<TrimOutcome> {
        let mut map = self.write()?;
        let owner = creation.owner;
        map.insert(creation.id, Creation { slot: RetentionSlot::Recent, ..creation });

        let recent: Vec<RecentItem> = map
            .values()
            .filter(|c| c.owner == owner && c.slot == RetentionSlot::Recent)
            .map(Creation::as_recent_item)
            .collect();

        let outcome = trim_recent(owner, &recent, cap);
        for id in &outcome.evicted {
            if let Some(evicted) = map.get_mut(id) {
                evicted.slot = RetentionSlot::Expired;
            }
        }
        Ok(outcome)
    }
}

impl CreationStore for InMemoryCreationStore {
    fn insert(&self, creation: Creation) -> impl Future<Output = Result<()>> + Send {
        let result = self.write().map(|mut map| {
            map.insert(creation.id, creation);
        });
        ready(result)
    }

    fn get(&self, id: CreationId) -> impl Future<Output = Result<Creation>> + Send {
        let result = self
            .read()
            .and_then(|map| map.get(&id).cloned().ok_or(DyeError::CreationNotFound(id)));
        ready(result)
    }

    fn list(
        &self,
        owner: OwnerId,
        slot: RetentionSlot,
    ) -> impl Future<Output = Result<Vec<Creation>>> + Send {
        ready(self.list_now(owner, slot))
    }

    fn set_slot(&self, id: CreationId, slot: RetentionSlot) -> impl Future<Output = Result<()>> + Send {
        let result = self.write().and_then(|mut map| match map.get_mut(&id) {
            Some(creation) => {
                creation.slot = slot;
                Ok(())
            }
            None => Err(DyeError::CreationNotFound(id)),
        });
        ready(result)
    }
}
