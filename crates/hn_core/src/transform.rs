use chrono::{DateTime, Utc};

use crate::gateway::CANONICAL_HOST;
use crate::types::{Article, ArweaveTag, RawTransaction};

const AVG_CHARS_PER_WORD: f64 = 5.0;
const WORDS_PER_MINUTE: f64 = 200.0;

/// Case-insensitive lookup; the first tag with a matching name wins.
fn tag_value<'a>(tags: &'a [ArweaveTag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.name.eq_ignore_ascii_case(name))
        .map(|tag| tag.value.as_str())
}

/// First non-empty value among `names`, tried in priority order.
fn first_tag(tags: &[ArweaveTag], names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| tag_value(tags, name).filter(|value| !value.is_empty()))
        .map(str::to_string)
}

fn is_topic_tag(tag: &ArweaveTag) -> bool {
    tag.name.starts_with("Tag-") || tag.name == "Topic"
}

/// Reading time estimated from the raw byte size: bytes / 5 chars per word / 200 wpm.
pub fn estimate_reading_time(byte_size: u64) -> u32 {
    let words = byte_size as f64 / AVG_CHARS_PER_WORD;
    (words / WORDS_PER_MINUTE).ceil() as u32
}

fn fallback_title(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("Article {}", prefix)
}

impl From<&RawTransaction> for Article {
    fn from(tx: &RawTransaction) -> Self {
        let tags = &tx.tags;

        let title = first_tag(tags, &["Title", "Page-Title"])
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| fallback_title(&tx.id));

        let published_at = tx
            .block
            .and_then(|block| DateTime::<Utc>::from_timestamp(block.timestamp, 0));

        Article {
            id: tx.id.clone(),
            title,
            description: first_tag(tags, &["Description", "OG-Description"]),
            author: first_tag(tags, &["Author", "Creator"]),
            published_at,
            image_url: first_tag(tags, &["Image", "OG-Image"]),
            content_type: first_tag(tags, &["Content-Type"]).or_else(|| tx.data.content_type.clone()),
            tags: tags
                .iter()
                .filter(|tag| is_topic_tag(tag))
                .map(|tag| tag.value.clone())
                .collect(),
            reading_time: Some(estimate_reading_time(tx.data.byte_size())),
            url: format!("https://{}/{}", CANONICAL_HOST, tx.id),
        }
    }
}

impl From<RawTransaction> for Article {
    fn from(tx: RawTransaction) -> Self {
        Article::from(&tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockInfo, DataInfo, Owner};

    fn transaction(id: &str, tags: Vec<ArweaveTag>) -> RawTransaction {
        RawTransaction {
            id: id.to_string(),
            owner: Owner {
                address: "wallet".to_string(),
            },
            data: DataInfo {
                size: Some("12000".to_string()),
                content_type: Some("text/html".to_string()),
            },
            tags,
            block: Some(BlockInfo {
                timestamp: 1_700_000_000,
                height: 1_300_000,
            }),
        }
    }

    #[test]
    fn test_title_beats_page_title() {
        let tx = transaction(
            "abcdefghijkl",
            vec![
                ArweaveTag::new("Page-Title", "Page title"),
                ArweaveTag::new("Title", "Real title"),
            ],
        );
        assert_eq!(Article::from(&tx).title, "Real title");
    }

    #[test]
    fn test_tag_lookup_is_case_insensitive_and_first_wins() {
        let tx = transaction(
            "abcdefghijkl",
            vec![
                ArweaveTag::new("title", "first"),
                ArweaveTag::new("TITLE", "second"),
                ArweaveTag::new("og-description", "og desc"),
                ArweaveTag::new("creator", "Jane"),
            ],
        );
        let article = Article::from(&tx);
        assert_eq!(article.title, "first");
        assert_eq!(article.description.as_deref(), Some("og desc"));
        assert_eq!(article.author.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_title_falls_back_to_id_prefix() {
        let tx = transaction("abcdefghijkl", vec![]);
        assert_eq!(Article::from(&tx).title, "Article abcdefgh");

        let short = transaction("abc", vec![ArweaveTag::new("Title", "  ")]);
        assert_eq!(Article::from(&short).title, "Article abc");
    }

    #[test]
    fn test_tags_keep_source_order_and_duplicates() {
        let tx = transaction(
            "abcdefghijkl",
            vec![
                ArweaveTag::new("Tag-1", "rust"),
                ArweaveTag::new("Topic", "web3"),
                ArweaveTag::new("tag-2", "ignored"),
                ArweaveTag::new("Tag-3", "rust"),
                ArweaveTag::new("Title", "x"),
            ],
        );
        assert_eq!(Article::from(&tx).tags, vec!["rust", "web3", "rust"]);
    }

    #[test]
    fn test_content_type_prefers_tag() {
        let mut tx = transaction("abcdefghijkl", vec![ArweaveTag::new("Content-Type", "text/markdown")]);
        assert_eq!(Article::from(&tx).content_type.as_deref(), Some("text/markdown"));

        tx.tags.clear();
        assert_eq!(Article::from(&tx).content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_published_at_and_url() {
        let mut tx = transaction("abcdefghijkl", vec![]);
        let article = Article::from(&tx);
        assert_eq!(article.published_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(article.url, "https://arweave.net/abcdefghijkl");

        tx.block = None;
        assert!(Article::from(&tx).published_at.is_none());
    }

    #[test]
    fn test_reading_time_estimate() {
        assert_eq!(estimate_reading_time(0), 0);
        assert_eq!(estimate_reading_time(1), 1);
        assert_eq!(estimate_reading_time(1000), 1);
        assert_eq!(estimate_reading_time(1001), 2);

        let article = Article::from(&transaction("abcdefghijkl", vec![]));
        assert_eq!(article.reading_time, Some(12));
    }
}
