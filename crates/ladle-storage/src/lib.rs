//! # ladle-storage
//!
//! Storage abstraction layer for the Ladle server.
//!
//! This crate defines the traits and types that all recipe storage backends
//! must implement. It does not contain any implementations - those are
//! provided by separate crates.
//!
//! ## Overview
//!
//! The main trait is [`RecipeStore`], which defines the contract for:
//! - Listing and tag search
//! - Lookup by identifier
//! - Create / update / delete
//!
//! ## Example
//!
//! ```ignore
//! use ladle_storage::{RecipeStore, StorageError};
//!
//! async fn desserts(store: &dyn RecipeStore) -> Result<usize, StorageError> {
//!     Ok(store.find_by_tag("dessert").await?.len())
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::RecipeStore;
pub use types::RecipeDraft;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a boxed storage trait object.
pub type DynRecipeStore = std::sync::Arc<dyn RecipeStore>;
