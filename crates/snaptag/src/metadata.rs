use serde::{Deserialize, Serialize};

/// Descriptive metadata derived for a single image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Short title for the image.
    pub title: String,
    /// Longer free-text description.
    pub description: String,
    /// Keywords in provider order.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ImageMetadata {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            keywords,
        }
    }

    /// True when the provider produced nothing usable.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.description.trim().is_empty() && self.keywords.is_empty()
    }

    /// Drops keywords beyond `limit`, keeping provider order.
    pub fn clamp_keywords(&mut self, limit: usize) {
        if self.keywords.len() > limit {
            self.keywords.truncate(limit);
        }
    }
}
