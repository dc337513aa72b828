//! Vestry Storage Library
//!
//! This crate provides the fallback object storage used when the image CDN is
//! disabled or unreachable. It includes the [`ObjectStorage`] trait and
//! implementations for a hosted bucket (Supabase storage REST API) and the
//! local filesystem.
//!
//! # Object path format
//!
//! Objects live under a free-text folder label: `{folder}/{object_name}`, e.g.
//! `popups/popup-1718000000000-k3x9qa.jpg`. Paths must not contain `..` or a
//! leading `/`. Name generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_object_name, object_path};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
pub use vestry_core::StorageBackend;
