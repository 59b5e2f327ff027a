use serde::{Deserialize, Serialize};

pub const MAX_ENHANCED_TAGS: usize = 5;
pub const MAX_TLDR_CHARS: usize = 300;
pub const MAX_SEARCHABLE_CHARS: usize = 1000;

/// Metadata scraped from an article's HTML. Every field is optional since
/// extraction works on a truncated prefix of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    /// Publication date as printed on the page (`YYYY/MM/DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tldr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable_content: Option<String>,
}

impl ArticleMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
