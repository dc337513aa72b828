//! Vestry settings persistence
//!
//! Site settings are key/value rows. This crate provides the [`SettingsStore`]
//! trait and its backends:
//!
//! - **rest**: the hosted backend's PostgREST endpoint (always available)
//! - **postgres**: a direct sqlx connection (`postgres` feature)
//! - **memory**: an in-process map for tests and offline tooling

pub mod factory;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod rest;
pub mod store;

// Re-export commonly used types
pub use factory::create_settings_store;
pub use memory::InMemorySettingsStore;
#[cfg(feature = "postgres")]
pub use postgres::PgSettingsStore;
pub use rest::RestSettingsStore;
pub use store::{SettingsError, SettingsResult, SettingsStore};
