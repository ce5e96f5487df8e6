use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::COMMENT_TOMBSTONES;
use crate::error::FetchError;
use crate::extract::visible_text;
use crate::fetch::Fetch;

static SEL_COMMENT_AREA: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.commentarea").unwrap());
static SEL_COMMENT_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.usertext-body").unwrap());

/// Result of reading one discussion's comments. Neither variant drops the
/// discussion; an unavailable thread just has no comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Fetched(Vec<String>),
    Unavailable(FetchError),
}

impl CommentOutcome {
    pub fn into_comments(self) -> Vec<String> {
        match self {
            CommentOutcome::Fetched(comments) => comments,
            CommentOutcome::Unavailable(_) => Vec::new(),
        }
    }
}

pub struct CommentReader<'a, F: Fetch> {
    fetcher: &'a F,
    user_agent: &'a str,
    primary_host: &'a str,
    static_host: &'a str,
}

impl<'a, F: Fetch> CommentReader<'a, F> {
    pub fn new(
        fetcher: &'a F,
        user_agent: &'a str,
        primary_host: &'a str,
        static_host: &'a str,
    ) -> Self {
        Self { fetcher, user_agent, primary_host, static_host }
    }

    pub fn read_comments(&self, discussion_url: &str) -> CommentOutcome {
        let url = match Url::parse(discussion_url) {
            Ok(u) => static_variant(u, self.primary_host, self.static_host),
            Err(e) => {
                warn!(url = discussion_url, error = %e, "Skipping comments for unparsable URL");
                return CommentOutcome::Unavailable(FetchError::Request {
                    url: discussion_url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        info!(url = %url, "Reading comments");
        match self.fetcher.fetch(&url, self.user_agent) {
            Ok(html) => CommentOutcome::Fetched(extract_comments(&html)),
            Err(e @ FetchError::Status { .. }) => {
                debug!(error = %e, "Comment page unavailable");
                CommentOutcome::Unavailable(e)
            }
            Err(e) => {
                warn!(error = %e, "Error reading comments");
                CommentOutcome::Unavailable(e)
            }
        }
    }
}

/// Point a thread on the script-rendered host at its static twin.
pub fn static_variant(mut url: Url, primary_host: &str, static_host: &str) -> Url {
    if url.host_str().is_some_and(|h| h.eq_ignore_ascii_case(primary_host)) {
        if let Err(e) = url.set_host(Some(static_host)) {
            warn!(url = %url, static_host, error = %e, "Could not rewrite host");
        }
    }
    url
}

/// Comment bodies inside the comment area, in document order.
pub fn extract_comments(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Some(area) = document.select(&SEL_COMMENT_AREA).next() else {
        return Vec::new();
    };

    area.select(&SEL_COMMENT_BODY)
        .map(visible_text)
        .filter(|text| !text.is_empty() && !COMMENT_TOMBSTONES.contains(&text.as_str()))
        .collect()
}
