use std::cell::Cell;
use std::thread::sleep;
use std::time::Duration;

use tracing::{debug, error, info};
use url::Url;

use crate::comments::CommentReader;
use crate::config::Config;
use crate::error::SourceError;
use crate::extract::extract;
use crate::fetch::Fetch;
use crate::model::{Discussion, SourceRecord};

/// A source either yields a complete record or is left out entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Scraped(SourceRecord),
    Skipped { source: String, error: SourceError },
}

/// Fixed pause between requests. Never adapts to server responses.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    pauses: Cell<usize>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pauses: Cell::new(0) }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pauses taken so far, zero-length ones included.
    pub fn pauses(&self) -> usize {
        self.pauses.get()
    }

    pub fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
        if !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "Throttling");
            sleep(self.delay);
        }
    }
}

pub struct Scraper<F: Fetch> {
    fetcher: F,
    config: Config,
    throttle: Throttle,
}

impl<F: Fetch> Scraper<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        let throttle = Throttle::new(config.delay);
        Self { fetcher, config, throttle }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Scrape every configured source in order, keeping only the ones that succeeded.
    pub fn run(&self) -> Vec<SourceRecord> {
        self.config
            .sources
            .iter()
            .filter_map(|source| match self.scrape_source(source) {
                SourceOutcome::Scraped(record) => Some(record),
                SourceOutcome::Skipped { source, error } => {
                    error!(source = %source, error = %error, "Skipping source");
                    None
                }
            })
            .collect()
    }

    pub fn scrape_source(&self, source: &str) -> SourceOutcome {
        let url = match Url::parse(source) {
            Ok(u) => u,
            Err(e) => {
                return SourceOutcome::Skipped {
                    source: source.to_string(),
                    error: SourceError::InvalidUrl {
                        url: source.to_string(),
                        message: e.to_string(),
                    },
                };
            }
        };

        let name = source_name(&url);
        info!(subreddit = %name, "Scraping subreddit");

        let html = match self.fetcher.fetch(&url, &self.config.listing_user_agent) {
            Ok(body) => body,
            Err(e) => {
                return SourceOutcome::Skipped { source: source.to_string(), error: e.into() };
            }
        };

        let page = extract(&html, &url);
        debug!(
            subreddit = %name,
            topics = page.topics.len(),
            discussions = page.discussions.len(),
            "Extracted listing"
        );

        let reader = CommentReader::new(
            &self.fetcher,
            &self.config.comments_user_agent,
            &self.config.primary_host,
            &self.config.static_host,
        );

        let mut discussions = Vec::with_capacity(page.discussions.len());
        for link in page.discussions {
            let comments = if self.config.fetch_comments {
                info!(title = %preview(&link.title, 30), "Downloading comments");
                let comments = reader.read_comments(&link.url).into_comments();
                self.throttle.pause();
                comments
            } else {
                Vec::new()
            };
            discussions.push(Discussion::new(link, comments));
        }

        let record = SourceRecord {
            source_name: name,
            source_url: source.to_string(),
            page_title: page.page_title,
            scraped_at: timestamp(),
            topics: page.topics,
            discussions,
        };

        self.throttle.pause();
        SourceOutcome::Scraped(record)
    }
}

/// Last non-empty path segment, e.g. "Python" for ".../r/Python/".
pub fn source_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segs| segs.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn preview(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Counts logged at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub sources: usize,
    pub topics: usize,
    pub discussions: usize,
    pub comments: usize,
}

impl Totals {
    pub fn of(records: &[SourceRecord]) -> Self {
        records.iter().fold(Totals::default(), |acc, r| Totals {
            sources: acc.sources + 1,
            topics: acc.topics + r.topics.len(),
            discussions: acc.discussions + r.discussions.len(),
            comments: acc.comments + r.discussions.iter().map(|d| d.comment_count).sum::<usize>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_name_is_last_path_segment() {
        let name = |s: &str| source_name(&Url::parse(s).unwrap());
        assert_eq!(name("https://www.reddit.com/r/Python"), "Python");
        assert_eq!(name("https://www.reddit.com/r/learnpython/"), "learnpython");
        assert_eq!(name("https://www.reddit.com/"), "www.reddit.com");
    }

    #[test]
    fn totals_sum_over_records() {
        use crate::model::{DiscussionLink, Topic};

        let record = |topics: usize, comments: usize| SourceRecord {
            source_name: "Python".into(),
            source_url: "https://www.reddit.com/r/Python".into(),
            page_title: "r/Python".into(),
            scraped_at: "2024-01-01 00:00:00".into(),
            topics: (0..topics).map(|i| Topic::new(format!("Python {i}"))).collect(),
            discussions: vec![Discussion::new(
                DiscussionLink { title: "A thread".into(), url: "https://x/comments/1/".into() },
                (0..comments).map(|i| i.to_string()).collect(),
            )],
        };

        let totals = Totals::of(&[record(2, 3), record(1, 0)]);
        assert_eq!(totals, Totals { sources: 2, topics: 3, discussions: 2, comments: 3 });
        assert_eq!(Totals::of(&[]), Totals::default());
    }

    #[test]
    fn throttle_counts_every_pause() {
        let throttle = Throttle::new(Duration::ZERO);
        throttle.pause();
        throttle.pause();
        assert_eq!(throttle.pauses(), 2);
        assert_eq!(throttle.delay(), Duration::ZERO);
    }

    #[test]
    fn timestamp_has_fixed_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
