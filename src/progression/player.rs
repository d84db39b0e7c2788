//! Player experience and currency ledger

use serde::{Deserialize, Serialize};

use crate::core::error::{DyeError, Result};
use crate::core::types::OwnerId;
use crate::progression::level::{LevelCurve, LevelInfo};
use crate::progression::reward::Reward;

/// A player's progression state
///
/// Only experience and currency are stored. Level is always derived from
/// experience through a `LevelCurve`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub owner: OwnerId,
    experience: u64,
    currency: u64,
}

/// Level before and after an experience gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub before: u32,
    pub after: u32,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.after > self.before
    }

    pub fn levels_gained(&self) -> u32 {
        self.after.saturating_sub(self.before)
    }
}

impl PlayerProgress {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            experience: 0,
            currency: 0,
        }
    }

    /// Restore a player from stored totals
    pub fn with_totals(owner: OwnerId, experience: u64, currency: u64) -> Self {
        Self {
            owner,
            experience,
            currency,
        }
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn currency(&self) -> u64 {
        self.currency
    }

    pub fn level_info(&self, curve: &LevelCurve) -> LevelInfo {
        curve.info(self.experience)
    }

    /// Grant a reward; experience only ever grows
    pub fn apply_reward(&mut self, reward: Reward, curve: &LevelCurve) -> LevelChange {
        let before = curve.info(self.experience).level;
        self.experience = self.experience.saturating_add(reward.exp);
        self.currency = self.currency.saturating_add(reward.currency);
        let after = curve.info(self.experience).level;

        if after > before {
            tracing::info!("Player {} reached level {} (from {})", self.owner, after, before);
        }

        LevelChange { before, after }
    }

    /// Deduct currency, failing without change when the balance is short
    pub fn spend(&mut self, amount: u64) -> Result<u64> {
        if amount > self.currency {
            return Err(DyeError::InsufficientCurrency {
                needed: amount,
                available: self.currency,
            });
        }
        self.currency -= amount;
        tracing::debug!("Player {} spent {} (balance {})", self.owner, amount, self.currency);
        Ok(self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_level_one() {
        let player = PlayerProgress::new(OwnerId::new());
        let info = player.level_info(&LevelCurve::default());
        assert_eq!(info.level, 1);
        assert_eq!(player.currency(), 0);
    }

    #[test]
    fn test_reward_accumulates() {
        let curve = LevelCurve::default();
        let mut player = PlayerProgress::new(OwnerId::new());

        let change = player.apply_reward(Reward::new(35, 20), &curve);
        assert!(!change.leveled_up());
        assert_eq!(player.experience(), 35);
        assert_eq!(player.currency(), 20);

        let change = player.apply_reward(Reward::new(75, 50), &curve);
        assert!(change.leveled_up());
        assert_eq!(change, LevelChange { before: 1, after: 2 });
        assert_eq!(player.level_info(&curve).current_level_exp, 10);
    }

    #[test]
    fn test_large_reward_can_skip_levels() {
        let curve = LevelCurve::default();
        let mut player = PlayerProgress::new(OwnerId::new());
        let change = player.apply_reward(Reward::new(100 + 282 + 519, 0), &curve);
        assert_eq!(change.levels_gained(), 3);
    }

    #[test]
    fn test_spend_deducts() {
        let mut player = PlayerProgress::with_totals(OwnerId::new(), 0, 50);
        assert_eq!(player.spend(20).unwrap(), 30);
        assert_eq!(player.currency(), 30);
    }

    #[test]
    fn test_overspend_fails_without_change() {
        let mut player = PlayerProgress::with_totals(OwnerId::new(), 0, 10);
        let err = player.spend(11).unwrap_err();
        assert!(matches!(
            err,
            DyeError::InsufficientCurrency {
                needed: 11,
                available: 10
            }
        ));
        assert_eq!(player.currency(), 10);
    }
}
