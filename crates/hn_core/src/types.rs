use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single name/value annotation on an Arweave transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArweaveTag {
    pub name: String,
    pub value: String,
}

impl ArweaveTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataInfo {
    /// Byte size as reported by the gateway, which serializes it as a decimal string.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
}

impl DataInfo {
    pub fn byte_size(&self) -> u64 {
        self.size
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub timestamp: i64,
    pub height: u64,
}

/// A transaction node as returned by the gateway GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id: String,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub data: DataInfo,
    #[serde(default)]
    pub tags: Vec<ArweaveTag>,
    #[serde(default)]
    pub block: Option<BlockInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEdge {
    pub node: RawTransaction,
    pub cursor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    #[serde(default)]
    pub edges: Vec<TransactionEdge>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl TransactionPage {
    /// Cursor of the last edge, used to request the following page.
    pub fn last_cursor(&self) -> Option<String> {
        self.edges.last().map(|edge| edge.cursor.clone())
    }
}

/// A feed entry derived from transaction tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub content_type: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: Option<u32>,
    pub url: String,
}
