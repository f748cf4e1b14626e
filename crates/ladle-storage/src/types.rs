//! Shared types for the storage abstraction layer.

use serde::{Deserialize, Serialize};

/// Client-supplied recipe fields, used as the body of create and update
/// operations.
///
/// These are exactly the fields an update declares authoritative: an update
/// replaces them wholesale and leaves `id` and `publishedAt` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}
