use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::gateway::GatewayResolver;
use crate::models::ArticleMetadata;
use crate::types::Article;

const DATE_FORMAT: &str = "%b %-d, %Y";

/// What an article listing shows: enhanced metadata where available, tag-derived
/// fields otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: Option<u32>,
    pub link: String,
    pub enhanced: bool,
}

fn format_published(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_page_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y/%m/%d")
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

impl ArticleView {
    pub fn merge(article: &Article, metadata: Option<&ArticleMetadata>, resolver: &GatewayResolver) -> Self {
        let link = resolver.resolve(&article.id);
        let Some(meta) = metadata else {
            return Self {
                id: article.id.clone(),
                title: article.title.clone(),
                description: article.description.clone(),
                author: article.author.clone(),
                date: article.published_at.as_ref().map(format_published),
                tags: article.tags.clone(),
                reading_time: article.reading_time,
                link,
                enhanced: false,
            };
        };

        let tags = match &meta.tags {
            Some(tags) if !tags.is_empty() => tags.clone(),
            _ => article.tags.clone(),
        };

        Self {
            id: article.id.clone(),
            title: meta.title.clone().unwrap_or_else(|| article.title.clone()),
            description: meta
                .tldr
                .clone()
                .or_else(|| meta.description.clone())
                .or_else(|| article.description.clone()),
            author: meta.author.clone().or_else(|| article.author.clone()),
            date: meta
                .published_date
                .as_deref()
                .map(format_page_date)
                .or_else(|| article.published_at.as_ref().map(format_published)),
            tags,
            reading_time: meta.reading_time.filter(|t| *t > 0).or(article.reading_time),
            link,
            enhanced: true,
        }
    }

    /// Description cut to `limit` characters, with an ellipsis when truncated.
    pub fn excerpt(&self, limit: usize) -> Option<String> {
        let description = self.description.as_deref()?;
        if description.chars().count() <= limit {
            return Some(description.to_string());
        }
        let cut: String = description.chars().take(limit).collect();
        Some(format!("{}...", cut.trim_end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article() -> Article {
        Article {
            id: "tx1".to_string(),
            title: "Tag title".to_string(),
            description: Some("Tag description".to_string()),
            author: Some("Tag author".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2023, 11, 14, 12, 0, 0).unwrap()),
            image_url: None,
            content_type: None,
            tags: vec!["rust".to_string()],
            reading_time: Some(3),
            url: "https://arweave.net/tx1".to_string(),
        }
    }

    #[test]
    fn test_without_metadata_uses_article_fields() {
        let view = ArticleView::merge(&article(), None, &GatewayResolver::new("bar.permagate.io"));
        assert_eq!(view.title, "Tag title");
        assert_eq!(view.date.as_deref(), Some("Nov 14, 2023"));
        assert_eq!(view.link, "https://permagate.io/tx1");
        assert!(!view.enhanced);
    }

    #[test]
    fn test_metadata_takes_precedence() {
        let meta = ArticleMetadata {
            title: Some("Page title".to_string()),
            description: Some("Meta description".to_string()),
            tldr: Some("Short version".to_string()),
            published_date: Some("2024/01/05".to_string()),
            tags: Some(vec![]),
            reading_time: Some(7),
            ..Default::default()
        };
        let view = ArticleView::merge(&article(), Some(&meta), &GatewayResolver::default());
        assert_eq!(view.title, "Page title");
        assert_eq!(view.description.as_deref(), Some("Short version"));
        assert_eq!(view.author.as_deref(), Some("Tag author"));
        assert_eq!(view.date.as_deref(), Some("Jan 5, 2024"));
        assert_eq!(view.tags, vec!["rust"]);
        assert_eq!(view.reading_time, Some(7));
        assert!(view.enhanced);
    }

    #[test]
    fn test_excerpt() {
        let mut view = ArticleView::merge(&article(), None, &GatewayResolver::default());
        assert_eq!(view.excerpt(100).as_deref(), Some("Tag description"));
        assert_eq!(view.excerpt(3).as_deref(), Some("Tag..."));
        view.description = None;
        assert!(view.excerpt(10).is_none());
    }
}
