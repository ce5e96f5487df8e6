use serde::Serialize;

/// Tag written to the `type` column of both outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    PythonTopic,
    Discussion,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::PythonTopic => "python_topic",
            EntryKind::Discussion => "discussion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Topic {
    pub fn new(title: String) -> Self {
        Self { title, kind: EntryKind::PythonTopic }
    }
}

/// A comments link found on a listing page, before its comments are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discussion {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(rename = "comments_count")]
    pub comment_count: usize,
    pub comments: Vec<String>,
}

impl Discussion {
    /// The count is always derived from `comments`.
    pub fn new(link: DiscussionLink, comments: Vec<String>) -> Self {
        Self {
            title: link.title,
            url: link.url,
            kind: EntryKind::Discussion,
            comment_count: comments.len(),
            comments,
        }
    }
}

/// Everything scraped from one listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    #[serde(rename = "subreddit")]
    pub source_name: String,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "title")]
    pub page_title: String,
    pub scraped_at: String,
    #[serde(rename = "python_topics")]
    pub topics: Vec<Topic>,
    pub discussions: Vec<Discussion>,
}
