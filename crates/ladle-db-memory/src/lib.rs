//! In-memory recipe storage backend.
//!
//! Provides a concurrent, process-local implementation of
//! [`ladle_storage::RecipeStore`], used as the system of record for
//! single-process deployments and as the backend under test everywhere
//! else. Identifiers are UUID v4 strings assigned on insert;
//! `publishedAt` is stamped at creation and survives updates.

mod store;

pub use store::MemoryStore;
