use hn_core::models::{MAX_ENHANCED_TAGS, MAX_SEARCHABLE_CHARS, MAX_TLDR_CHARS};
use hn_core::ArticleMetadata;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

use super::utils::{collapse_whitespace, element_text, non_empty, strip_tags, truncate_chars};
use crate::scrapers::Scraper;

const SITE_SUFFIX: &str = "| HackerNoon";
const TAG_SECTION_LABEL: &str = "Tech Story Tags";
const WORDS_PER_MINUTE: usize = 200;
/// Fallback containers only count when they hold more than this many characters.
const MIN_FALLBACK_CHARS: usize = 100;

lazy_static! {
    static ref TLDR_RE: Regex =
        Regex::new(r"(?is)<summary>TLDR</summary>(.*?)(?:</details>|<a href)").expect("valid tldr pattern");
    static ref AUTHOR_RE: Regex =
        Regex::new(r#"(?i)Written by.*?<a[^>]*href="([^"]*)"[^>]*>\s*(.*?)\s*</a>"#).expect("valid author pattern");
    static ref EMPTY_COMMENT_RE: Regex = Regex::new(r"<!--\s*-->").expect("valid comment pattern");
    static ref PUBLISHED_RE: Regex =
        Regex::new(r"(?i)Published.*?(\d{4}/\d{2}/\d{2})").expect("valid date pattern");
    static ref TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref H1_LINK: Selector = Selector::parse("h1 a").expect("valid selector");
    static ref META_DESCRIPTION: Selector = Selector::parse(
        r#"meta[name="description"], meta[property="og:description"]"#
    )
    .expect("valid selector");
    static ref TAG_LINK: Selector = Selector::parse(r#"a[href*="/tagged/"]"#).expect("valid selector");
    static ref IMAGE: Selector = Selector::parse("img[src]").expect("valid selector");
    static ref ARTICLE: Selector = Selector::parse("article").expect("valid selector");
    static ref FALLBACK_CONTAINERS: Vec<Selector> = [
        "main",
        r#"div[class*="content"]"#,
        r#"div[class*="post"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect();
}

#[derive(Debug, Clone, Default)]
pub struct HackerNoonScraper;

impl HackerNoonScraper {
    pub fn new() -> Self {
        Self
    }

    fn title(document: &Html) -> Option<String> {
        let clean = |raw: String| non_empty(collapse_whitespace(&raw.replacen(SITE_SUFFIX, "", 1)));

        document
            .select(&TITLE)
            .next()
            .and_then(|el| clean(el.text().collect()))
            .or_else(|| {
                document
                    .select(&H1_LINK)
                    .next()
                    .and_then(|el| clean(element_text(el)))
            })
    }

    fn description(document: &Html) -> Option<String> {
        document
            .select(&META_DESCRIPTION)
            .filter_map(|el| el.value().attr("content"))
            .map(collapse_whitespace)
            .find(|content| !content.is_empty())
    }

    fn tldr(html: &str) -> Option<String> {
        let captures = TLDR_RE.captures(html)?;
        let text = collapse_whitespace(&strip_tags(&captures[1], ""));
        non_empty(truncate_chars(&text, MAX_TLDR_CHARS))
    }

    fn author(html: &str) -> (Option<String>, Option<String>) {
        let Some(captures) = AUTHOR_RE.captures(html) else {
            return (None, None);
        };
        let name = EMPTY_COMMENT_RE.replace_all(&captures[2], "");
        let name = strip_tags(&name, "").trim().to_string();
        (non_empty(name), non_empty(captures[1].to_string()))
    }

    fn published_date(html: &str) -> Option<String> {
        PUBLISHED_RE.captures(html).map(|c| c[1].to_string())
    }

    fn tags(document: &Html) -> Option<Vec<String>> {
        let mut tags: Vec<String> = Vec::new();
        for link in document.select(&TAG_LINK) {
            let tag = element_text(link);
            if tag.is_empty() || tag.contains(TAG_SECTION_LABEL) || tags.contains(&tag) {
                continue;
            }
            tags.push(tag);
            if tags.len() == MAX_ENHANCED_TAGS {
                break;
            }
        }
        if tags.is_empty() {
            None
        } else {
            Some(tags)
        }
    }

    fn image(document: &Html) -> Option<String> {
        document
            .select(&IMAGE)
            .filter_map(|el| el.value().attr("src"))
            .find(|src| {
                let src = src.to_ascii_lowercase();
                src.starts_with("http://") || src.starts_with("https://")
            })
            .map(str::to_string)
    }

    /// Plain text of the main article body: `<article>` first, then the first
    /// fallback container with enough text.
    fn body_text(document: &Html) -> Option<String> {
        if let Some(article) = document.select(&ARTICLE).next() {
            let text = element_text(article);
            if !text.is_empty() {
                return Some(text);
            }
        }

        FALLBACK_CONTAINERS.iter().find_map(|selector| {
            let text = element_text(document.select(selector).next()?);
            (text.chars().count() > MIN_FALLBACK_CHARS).then_some(text)
        })
    }
}

pub fn reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

impl Scraper for HackerNoonScraper {
    fn source(&self) -> &str {
        "HackerNoon"
    }

    fn extract(&self, html: &str) -> ArticleMetadata {
        let document = Html::parse_document(html);
        let (author, author_url) = Self::author(html);
        let body = Self::body_text(&document);

        ArticleMetadata {
            title: Self::title(&document),
            description: Self::description(&document),
            author,
            author_url,
            published_date: Self::published_date(html),
            tags: Self::tags(&document),
            tldr: Self::tldr(html),
            image_url: Self::image(&document),
            reading_time: body.as_deref().map(reading_time),
            searchable_content: body.map(|text| truncate_chars(&text, MAX_SEARCHABLE_CHARS)),
        }
    }
}
