//! Adapters to the hosted database

pub mod rest_store;

pub use rest_store::RestCreationStore;
