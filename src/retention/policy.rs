//! Best-effort enforcement of the recent window against a store
//!
//! Eviction is not atomic with the insert that triggered it. When moving an
//! evicted creation out of the recent slot fails, the failure is logged and
//! reported; the window may overshoot its cap until a later run trims it.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{CreationId, OwnerId};
use crate::retention::store::{Creation, CreationStore, RetentionSlot};
use crate::retention::window::{trim_recent, RecentItem, TrimOutcome};

/// Result of one enforcement run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforceReport {
    pub outcome: TrimOutcome,
    /// Evicted creations whose slot update failed; still tagged recent
    pub failed: Vec<CreationId>,
}

impl EnforceReport {
    /// True when every evicted creation left the recent slot
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn expired_count(&self) -> usize {
        self.outcome.evicted.len() - self.failed.len()
    }
}

/// Trim an owner's recent window in `store` down to `cap`
///
/// Only creations in the recent slot are considered; kept and expired ones are
/// never touched. Returns an error only if the recent creations cannot be listed.
pub async fn enforce_recent_window<S: CreationStore>(
    store: &S,
    owner: OwnerId,
    cap: usize,
) -> Result<EnforceReport> {
    let recent: Vec<RecentItem> = store
        .list(owner, RetentionSlot::Recent)
        .await?
        .iter()
        .map(Creation::as_recent_item)
        .collect();

    let outcome = trim_recent(owner, &recent, cap);
    let mut failed = Vec::new();

    for id in &outcome.evicted {
        if let Err(e) = store.set_slot(*id, RetentionSlot::Expired).await {
            tracing::warn!("Failed to expire creation {} for {}: {}", id, owner, e);
            failed.push(*id);
        }
    }

    if !outcome.evicted.is_empty() {
        tracing::info!(
            "Expired {} of {} evicted creations for {}",
            outcome.evicted.len() - failed.len(),
            outcome.evicted.len(),
            owner
        );
    }

    Ok(EnforceReport { outcome, failed })
}
