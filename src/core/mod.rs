pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, EngineConfig};
pub use error::{DyeError, Result};
pub use types::{CreationId, OwnerId, Timestamp};
