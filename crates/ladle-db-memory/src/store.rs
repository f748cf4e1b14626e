use async_trait::async_trait;
use dashmap::DashMap;

use ladle_core::{generate_id, now_utc, validate_id, Recipe};
use ladle_storage::{RecipeDraft, RecipeStore, StorageError};

/// In-memory recipe storage backend using a concurrent hash map.
///
/// Readers never block each other; the invalidate-after-write protocol in
/// the caching layer is the only cross-request consistency mechanism this
/// backend participates in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, Recipe>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`, keyed by their ids.
    ///
    /// Intended for tests and fixtures; duplicate ids keep the last record.
    pub fn with_records(records: impl IntoIterator<Item = Recipe>) -> Self {
        let store = Self::new();
        for record in records {
            store.records.insert(record.id.clone(), record);
        }
        store
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Recipe>, StorageError> {
        Ok(self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StorageError> {
        // Malformed ids read as absent, same as unknown ones.
        if validate_id(id).is_err() {
            return Ok(None);
        }
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, StorageError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().has_tag(tag))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert(&self, draft: RecipeDraft) -> Result<Recipe, StorageError> {
        let recipe = Recipe {
            id: generate_id(),
            title: draft.title,
            thumbnail: draft.thumbnail,
            url: draft.url,
            tags: draft.tags,
            published_at: Some(now_utc()),
        };
        self.records.insert(recipe.id.clone(), recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: &str, draft: RecipeDraft) -> Result<u64, StorageError> {
        if validate_id(id).is_err() {
            return Ok(0);
        }
        match self.records.get_mut(id) {
            Some(mut entry) => {
                let recipe = entry.value_mut();
                recipe.title = draft.title;
                recipe.thumbnail = draft.thumbnail;
                recipe.url = draft.url;
                recipe.tags = draft.tags;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &str) -> Result<u64, StorageError> {
        if validate_id(id).is_err() {
            return Ok(0);
        }
        Ok(u64::from(self.records.remove(id).is_some()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
