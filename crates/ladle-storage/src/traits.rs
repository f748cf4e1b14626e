//! Storage traits for the recipe storage abstraction layer.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::RecipeDraft;
use ladle_core::Recipe;

/// The main storage trait that all recipe storage backends must implement.
///
/// This is the system of record: backends own record identity and durable
/// field values. Implementations must be thread-safe (`Send + Sync`) and
/// safe for concurrent use by many in-flight requests.
///
/// # Example
///
/// ```ignore
/// use ladle_storage::{RecipeStore, StorageError};
///
/// async fn titles(store: &dyn RecipeStore) -> Result<Vec<String>, StorageError> {
///     Ok(store.find_all().await?.into_iter().map(|r| r.title).collect())
/// }
/// ```
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Returns every recipe in the store.
    ///
    /// Ordering is whatever the backend provides and is not guaranteed
    /// stable across calls.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` on connectivity or query failure.
    async fn find_all(&self) -> Result<Vec<Recipe>, StorageError>;

    /// Looks a recipe up by identifier.
    ///
    /// Returns `None` for unknown identifiers. A malformed identifier is
    /// treated identically to an unknown one - callers cannot distinguish
    /// the two, which keeps the lookup path total over arbitrary client
    /// input.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, never for absence.
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StorageError>;

    /// Returns every recipe whose tag set contains `tag`.
    ///
    /// Matching is exact and case-sensitive. An empty result is not an
    /// error.
    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, StorageError>;

    /// Inserts a new recipe built from `draft`.
    ///
    /// The store assigns the identifier and the `publishedAt` timestamp.
    /// Never partially inserts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` on failure.
    async fn insert(&self, draft: RecipeDraft) -> Result<Recipe, StorageError>;

    /// Replaces the draft fields of the recipe with identifier `id`.
    ///
    /// Returns the number of records updated (0 or 1). The identifier and
    /// `publishedAt` are left untouched; a malformed or unknown identifier
    /// counts as 0.
    async fn update(&self, id: &str, draft: RecipeDraft) -> Result<u64, StorageError>;

    /// Deletes the recipe with identifier `id`.
    ///
    /// Returns the number of records deleted (0 or 1). A malformed or
    /// unknown identifier counts as 0.
    async fn delete(&self, id: &str) -> Result<u64, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that RecipeStore is object-safe
    fn _assert_store_object_safe(_: &dyn RecipeStore) {}
}
