use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// A recipe record as held by the source of truth.
///
/// `id` is assigned by the store on insert and immutable thereafter;
/// `published_at` is stamped at creation time and survives updates. All
/// other fields are replaced wholesale by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
}

impl Recipe {
    pub fn new(id: String) -> Self {
        Self {
            id,
            title: String::new(),
            thumbnail: String::new(),
            url: String::new(),
            tags: Vec::new(),
            published_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Exact, case-sensitive tag membership test.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
