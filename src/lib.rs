//! Dyecraft - scoring, progression and retention engine for the dye-crafting minigame

pub mod core;
pub mod craft;
pub mod progression;
pub mod remote;
pub mod retention;
pub mod scoring;
pub mod workshop;

pub use crate::core::error::{DyeError, Result};
pub use crate::progression::{level_info, reward_for_grade, reward_for_label};
pub use crate::retention::trim_recent;
pub use crate::scoring::score_cloth;
