use std::path::PathBuf;
use std::time::Duration;

/// Listing pages scraped when no `--source` is given.
pub const DEFAULT_SOURCES: [&str; 2] = [
    "https://www.reddit.com/r/Python",
    "https://www.reddit.com/r/learnpython",
];

/// Identity sent when fetching listing pages.
pub const LISTING_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Identity sent when fetching comment pages.
pub const COMMENTS_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Host that needs script execution to render comments.
pub const PRIMARY_HOST: &str = "www.reddit.com";
/// Host serving the same threads as static markup.
pub const STATIC_HOST: &str = "old.reddit.com";

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const THROTTLE_DELAY_SECS: u64 = 2;

pub const JSON_FILENAME: &str = "python_topics.json";
pub const CSV_FILENAME: &str = "python_topics.csv";

// Extraction rules
pub const TOPIC_KEYWORDS: [&str; 5] = ["python", "programming", "code", "develop", "coding"];
/// Headings must be strictly longer than this (in chars).
pub const MIN_TOPIC_LEN: usize = 3;
/// Link text must be strictly longer than this (in chars).
pub const MIN_LINK_TEXT_LEN: usize = 5;
pub const MAX_DISCUSSION_TITLE_LEN: usize = 100;
pub const DISCUSSION_PATH_MARKER: &str = "/comments/";
pub const NO_TITLE: &str = "No title";
pub const COMMENT_TOMBSTONES: [&str; 2] = ["[deleted]", "[removed]"];

/// Runtime settings for one scrape run.
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: Vec<String>,
    pub out_dir: PathBuf,
    pub timeout: Duration,
    /// Fixed pause after every source page and every comment fetch.
    pub delay: Duration,
    pub fetch_comments: bool,
    pub listing_user_agent: String,
    pub comments_user_agent: String,
    pub primary_host: String,
    pub static_host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            out_dir: PathBuf::from("."),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            delay: Duration::from_secs(THROTTLE_DELAY_SECS),
            fetch_comments: true,
            listing_user_agent: LISTING_USER_AGENT.to_string(),
            comments_user_agent: COMMENTS_USER_AGENT.to_string(),
            primary_host: PRIMARY_HOST.to_string(),
            static_host: STATIC_HOST.to_string(),
        }
    }
}

impl Config {
    pub fn json_path(&self) -> PathBuf {
        self.out_dir.join(JSON_FILENAME)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(CSV_FILENAME)
    }
}
