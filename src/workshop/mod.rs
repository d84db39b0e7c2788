//! The dye workshop: submitting cloths and managing creations
//!
//! A submission flows through every engine component:
//! 1. Score the cloth and grade it
//! 2. Persist it as a recent creation
//! 3. Grant the grade's reward to the player
//! 4. Trim the player's recent window (best-effort)
//! 5. Record the submission, and any level-up, in the activity feed
//!
//! The player ledger is passed in and updated in place; persisting it is the
//! caller's job.

pub mod feed;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::core::config::EngineConfig;
use crate::core::error::{DyeError, Result};
use crate::core::types::{CreationId, OwnerId, Timestamp};
use crate::craft::layer::Layer;
use crate::progression::level::LevelInfo;
use crate::progression::player::{LevelChange, PlayerProgress};
use crate::progression::reward::Reward;
use crate::retention::policy::{enforce_recent_window, EnforceReport};
use crate::retention::store::{Creation, CreationStore, RetentionSlot};
use crate::scoring::score::{ScoreResult, Scorer};

pub use feed::{ActivityFeed, FeedEntry, FeedEvent};

/// Everything that happened for one submission
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub creation_id: CreationId,
    pub score: ScoreResult,
    pub reward: Reward,
    pub level: LevelChange,
    pub level_info: LevelInfo,
    /// None when the recent window could not be read; the next submission retries
    pub retention: Option<EnforceReport>,
}

pub struct Workshop<S: CreationStore> {
    store: S,
    config: Arc<EngineConfig>,
    scorer: Scorer,
    feed: Arc<ActivityFeed>,
}

impl<S: CreationStore> Workshop<S> {
    pub fn new(store: S, config: Arc<EngineConfig>, feed: Arc<ActivityFeed>) -> Self {
        let scorer = Scorer::from_config(&config);
        Self {
            store,
            config,
            scorer,
            feed,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    /// Submit a cloth for `player`, stamped with the current time
    pub async fn submit(&self, player: &mut PlayerProgress, layers: Vec<Layer>) -> Result<Submission> {
        self.submit_at(player, layers, Utc::now()).await
    }

    /// Submit a cloth with an explicit creation time
    ///
    /// Nothing is granted if the creation cannot be stored.
    pub async fn submit_at(
        &self,
        player: &mut PlayerProgress,
        layers: Vec<Layer>,
        created_at: Timestamp,
    ) -> Result<Submission> {
        let owner = player.owner;
        let score = self.scorer.score(&layers);
        let creation = Creation::recent(owner, layers, score, created_at);
        let creation_id = creation.id;

        self.store.insert(creation).await?;

        let reward = self.config.rewards.reward_for(score.grade);
        let level = player.apply_reward(reward, &self.config.level_curve);
        let level_info = player.level_info(&self.config.level_curve);

        tracing::info!(
            "Creation {} by {} scored {} ({}), reward {} exp / {} currency",
            creation_id,
            owner,
            score.total,
            score.grade,
            reward.exp,
            reward.currency
        );

        let retention = self.trim_window(owner).await;

        self.feed.post(FeedEvent::Submitted {
            owner,
            creation: creation_id,
            grade: score.grade,
            total: score.total,
        });
        if level.leveled_up() {
            self.feed.post(FeedEvent::LevelUp {
                owner,
                level: level.after,
            });
        }

        Ok(Submission {
            creation_id,
            score,
            reward,
            level,
            level_info,
            retention,
        })
    }

    async fn trim_window(&self, owner: OwnerId) -> Option<EnforceReport> {
        match enforce_recent_window(&self.store, owner, self.config.retention.recent_cap).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("Could not trim recent window for {}: {}", owner, e);
                None
            }
        }
    }

    async fn owned(&self, owner: OwnerId, id: CreationId) -> Result<Creation> {
        let creation = self.store.get(id).await?;
        if creation.owner != owner {
            return Err(DyeError::NotOwner { creation: id, owner });
        }
        Ok(creation)
    }

    /// Move a creation into the owner's inventory, out of reach of eviction
    pub async fn keep(&self, owner: OwnerId, id: CreationId) -> Result<()> {
        let creation = self.owned(owner, id).await?;
        if creation.slot == RetentionSlot::Kept {
            return Ok(());
        }

        self.store.set_slot(id, RetentionSlot::Kept).await?;
        self.feed.post(FeedEvent::Kept { owner, creation: id });
        Ok(())
    }

    /// Score an existing creation again under the current config
    ///
    /// The result is stored as a new recent creation; the original is left
    /// untouched and no reward is granted.
    pub async fn rescore(&self, owner: OwnerId, id: CreationId) -> Result<Creation> {
        let original = self.owned(owner, id).await?;
        let score = self.scorer.score(&original.layers);
        let creation = Creation::recent(owner, original.layers, score, Utc::now());

        self.store.insert(creation.clone()).await?;
        tracing::info!(
            "Rescored {} as {}: {} -> {}",
            id,
            creation.id,
            original.score.total,
            score.total
        );

        self.trim_window(owner).await;
        Ok(creation)
    }

    /// The owner's recent creations, newest first
    pub async fn recent(&self, owner: OwnerId) -> Result<Vec<Creation>> {
        self.store.list(owner, RetentionSlot::Recent).await
    }

    /// The owner's kept creations, newest first
    pub async fn inventory(&self, owner: OwnerId) -> Result<Vec<Creation>> {
        self.store.list(owner, RetentionSlot::Kept).await
    }
}
