use hn_core::ArticleMetadata;

pub mod hackernoon;

pub use hackernoon::HackerNoonScraper;

/// Turns a (possibly truncated) HTML document into article metadata.
pub trait Scraper: Send + Sync {
    /// Returns the name of the publication
    fn source(&self) -> &str;

    /// Extracts whatever metadata can be found. Never fails: missing patterns
    /// leave fields empty.
    fn extract(&self, html: &str) -> ArticleMetadata;
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use lazy_static::lazy_static;
    use regex::Regex;
    use scraper::ElementRef;

    lazy_static! {
        static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid tag pattern");
        static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
    }

    /// Replace every markup tag with `replacement`.
    pub fn strip_tags(html: &str, replacement: &str) -> String {
        TAG_RE.replace_all(html, replacement).into_owned()
    }

    pub fn collapse_whitespace(text: &str) -> String {
        WHITESPACE_RE.replace_all(text, " ").trim().to_string()
    }

    /// All text nodes below `element`, separated by spaces and collapsed.
    pub fn element_text(element: ElementRef<'_>) -> String {
        collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
    }

    pub fn truncate_chars(text: &str, max: usize) -> String {
        match text.char_indices().nth(max) {
            Some((idx, _)) => text[..idx].to_string(),
            None => text.to_string(),
        }
    }

    pub fn non_empty(text: String) -> Option<String> {
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::utils;
    use scraper::{Html, Selector};

    #[test]
    fn test_strip_tags() {
        assert_eq!(utils::strip_tags("<p>Hello <b>world</b></p>", ""), "Hello world");
        assert_eq!(utils::strip_tags("a<br/>b", " "), "a b");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(utils::collapse_whitespace("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn test_element_text() {
        let document = Html::parse_fragment("<div><p>One</p><p>Two\n three</p></div>");
        let selector = Selector::parse("div").unwrap();
        let div = document.select(&selector).next().unwrap();
        assert_eq!(utils::element_text(div), "One Two three");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(utils::truncate_chars("héllo", 2), "hé");
        assert_eq!(utils::truncate_chars("abc", 10), "abc");
    }
}
