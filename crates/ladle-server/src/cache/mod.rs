//! Caching layer for the recipe listing endpoint.
//!
//! ## Architecture
//!
//! - **Local mode (DashMap)**: in-process cache for single-instance
//!   deployments and tests
//! - **Redis mode**: one shared cache visible to every service replica
//!
//! The cache is a performance optimization, never a correctness
//! dependency: the store remains the system of record, every mutation
//! invalidates the cached snapshot before the mutation's result is
//! reported, and a cache outage degrades reads to the store.

pub mod backend;
pub mod recipes;

pub use backend::{CacheBackend, CacheError, CacheStats, CachedEntry};
pub use recipes::{RecipeListCache, RECIPE_LIST_KEY};
