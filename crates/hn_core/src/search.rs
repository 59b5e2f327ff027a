use std::collections::HashMap;
use std::sync::Arc;

use crate::models::ArticleMetadata;
use crate::types::Article;

pub type MetadataSnapshot = HashMap<String, Arc<ArticleMetadata>>;

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn matches_article(article: &Article, needle: &str) -> bool {
    contains(&article.title, needle)
        || article.description.as_deref().is_some_and(|d| contains(d, needle))
        || article.author.as_deref().is_some_and(|a| contains(a, needle))
        || article.tags.iter().any(|tag| contains(tag, needle))
}

fn matches_metadata(metadata: &ArticleMetadata, needle: &str) -> bool {
    metadata.tldr.as_deref().is_some_and(|t| contains(t, needle))
        || metadata
            .searchable_content
            .as_deref()
            .is_some_and(|c| contains(c, needle))
        || metadata
            .tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|tag| contains(tag, needle)))
}

/// Case-insensitive substring filter over base article fields and any cached
/// enhanced metadata. A blank term returns every article.
pub fn filter_articles(articles: &[Article], term: &str, metadata: &MetadataSnapshot) -> Vec<Article> {
    if term.trim().is_empty() {
        return articles.to_vec();
    }
    let needle = term.to_lowercase();

    articles
        .iter()
        .filter(|article| {
            matches_article(article, &needle)
                || metadata
                    .get(&article.id)
                    .is_some_and(|meta| matches_metadata(meta, &needle))
        })
        .cloned()
        .collect()
}
