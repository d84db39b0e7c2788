//! Player progression: level curve, grade rewards and the player ledger

pub mod level;
pub mod player;
pub mod reward;

pub use level::{level_info, LevelCurve, LevelInfo};
pub use player::{LevelChange, PlayerProgress};
pub use reward::{reward_for_grade, reward_for_label, Reward, RewardTable};
