//! Retention of an owner's creations
//!
//! Each owner sees a bounded window of recent creations. Submitting past the cap
//! pushes the oldest recent creations into the expired slot; creations moved to
//! the inventory (kept) are exempt. Nothing is ever deleted here.

pub mod policy;
pub mod store;
pub mod window;

pub use policy::{enforce_recent_window, EnforceReport};
pub use store::{Creation, CreationStore, InMemoryCreationStore, RetentionSlot};
pub use window::{trim_recent, RecentItem, TrimOutcome, DEFAULT_RECENT_CAP};
