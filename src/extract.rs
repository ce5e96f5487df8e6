use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{
    DISCUSSION_PATH_MARKER, MAX_DISCUSSION_TITLE_LEN, MIN_LINK_TEXT_LEN, MIN_TOPIC_LEN, NO_TITLE,
    TOPIC_KEYWORDS,
};
use crate::model::{DiscussionLink, Topic};

static SEL_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static SEL_HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4").unwrap());
static SEL_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// What a listing page yields before any comment is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub page_title: String,
    pub topics: Vec<Topic>,
    pub discussions: Vec<DiscussionLink>,
}

pub fn extract(html: &str, base: &Url) -> Extracted {
    let document = Html::parse_document(html);
    Extracted {
        page_title: page_title(&document),
        topics: extract_topics(&document),
        discussions: extract_discussions(&document, base),
    }
}

/// Every descendant text node trimmed and joined with no separator, so
/// `<span>Py</span> <span>thon</span>` reads "Python". Whitespace runs inside
/// a single node collapse to one space.
pub fn visible_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| RE_WHITESPACE.replace_all(s, " "))
        .collect()
}

fn page_title(document: &Html) -> String {
    document
        .select(&SEL_TITLE)
        .next()
        .map(visible_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn is_topic(text: &str) -> bool {
    if text.chars().count() <= MIN_TOPIC_LEN {
        return false;
    }
    let lower = text.to_lowercase();
    TOPIC_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn extract_topics(document: &Html) -> Vec<Topic> {
    document
        .select(&SEL_HEADINGS)
        .map(visible_text)
        .filter(|text| is_topic(text))
        .map(Topic::new)
        .collect()
}

fn extract_discussions(document: &Html, base: &Url) -> Vec<DiscussionLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for a in document.select(&SEL_LINKS) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let text = visible_text(a);
        if text.chars().count() <= MIN_LINK_TEXT_LEN {
            continue;
        }

        let Some(url) = resolve_href(base, href) else {
            continue;
        };
        if !url.contains(DISCUSSION_PATH_MARKER) || seen.contains(&url) {
            continue;
        }

        seen.insert(url.clone());
        links.push(DiscussionLink {
            title: truncate_chars(&text, MAX_DISCUSSION_TITLE_LEN),
            url,
        });
    }

    links
}

/// Resolve `href` against the listing page; "/r/..." lands on the page's origin.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
