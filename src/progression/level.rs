//! Experience-to-level curve
//!
//! Advancing from level n to n+1 costs `floor(base * n^exponent)` experience.
//! Level and in-level progress are always derived from cumulative experience
//! here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::{DyeError, Result};

/// Parameters of the level curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCurve {
    pub base: f64,
    pub exponent: f64,
    /// Highest reachable level; bounds the walk
    pub max_level: u32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: 100.0,
            exponent: 1.5,
            max_level: 100,
        }
    }
}

/// Level and progress derived from cumulative experience
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    /// Experience earned since reaching `level`
    pub current_level_exp: u64,
    /// Cost of the step from `level` to the next
    pub exp_to_next_level: u64,
    /// `current_level_exp / exp_to_next_level`, clamped to [0, 1]
    pub progress: f64,
}

impl LevelCurve {
    /// Experience needed to advance from `level` to `level + 1`
    pub fn step_cost(&self, level: u32) -> u64 {
        (self.base * (level as f64).powf(self.exponent)).floor() as u64
    }

    /// Cumulative experience at which `level` is reached
    pub fn exp_for_level(&self, level: u32) -> u64 {
        (1..level.min(self.max_level))
            .map(|n| self.step_cost(n))
            .fold(0u64, u64::saturating_add)
    }

    /// Walk the curve from level 1, paying each step while experience covers it
    pub fn info(&self, total_exp: u64) -> LevelInfo {
        let mut level = 1;
        let mut remaining = total_exp;

        while level < self.max_level {
            let cost = self.step_cost(level);
            if remaining < cost {
                break;
            }
            remaining -= cost;
            level += 1;
        }

        let exp_to_next_level = self.step_cost(level);
        let progress = if exp_to_next_level == 0 {
            1.0
        } else {
            (remaining as f64 / exp_to_next_level as f64).clamp(0.0, 1.0)
        };

        LevelInfo {
            level,
            current_level_exp: remaining,
            exp_to_next_level,
            progress,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base.is_finite() || self.base < 0.0 {
            return Err(DyeError::InvalidConfig(format!(
                "level curve base must be finite and non-negative, got {}",
                self.base
            )));
        }
        if !self.exponent.is_finite() || self.exponent <= 0.0 {
            return Err(DyeError::InvalidConfig(format!(
                "level curve exponent must be positive, got {}",
                self.exponent
            )));
        }
        if self.max_level == 0 {
            return Err(DyeError::InvalidConfig("max_level must be at least 1".into()));
        }
        Ok(())
    }
}

/// Level info for a cumulative experience total, using the global curve
///
/// Negative totals are a caller bug and are rejected rather than clamped.
pub fn level_info(total_exp: i64) -> Result<LevelInfo> {
    let total = u64::try_from(total_exp).map_err(|_| DyeError::NegativeExperience(total_exp))?;
    Ok(config().level_curve.info(total))
}
