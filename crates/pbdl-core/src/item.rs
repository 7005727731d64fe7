//! Work items and resolved metadata.

use serde::{Deserialize, Serialize};

/// One playlist entry to download. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Video identifier. Absent for malformed playlist entries, which then fail with `no-id`.
    pub id: Option<String>,
    /// Title from the playlist listing, if any.
    pub title: Option<String>,
    /// Explicit page URL; when absent the provider derives one from `id`.
    pub url: Option<String>,
}

impl WorkItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: None,
            url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Identifier, treating an empty string as missing.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Title for display: own title, then identifier, then a placeholder.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.id())
            .unwrap_or("<untitled>")
    }
}

/// Metadata resolved from the provider before downloading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemMetadata {
    pub title: Option<String>,
    /// Size estimate in bytes (exact or approximate); `None` if unknown.
    pub size_estimate: Option<u64>,
}
