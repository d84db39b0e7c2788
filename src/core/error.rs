use thiserror::Error;

use crate::core::types::{CreationId, OwnerId};

#[derive(Error, Debug)]
pub enum DyeError {
    #[error("Invalid grade: {0:?}")]
    InvalidGrade(String),

    #[error("Experience cannot be negative: {0}")]
    NegativeExperience(i64),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient currency: needed {needed}, available {available}")]
    InsufficientCurrency { needed: u64, available: u64 },

    #[error("Creation not found: {0}")]
    CreationNotFound(CreationId),

    #[error("Creation {creation} does not belong to owner {owner}")]
    NotOwner { creation: CreationId, owner: OwnerId },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DyeError>;
