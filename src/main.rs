use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reddit_topics::config::{REQUEST_TIMEOUT_SECS, THROTTLE_DELAY_SECS};
use reddit_topics::{persist, Config, HttpFetcher, Scraper, Totals};

/// reddit-topics - collect Python topics and discussions from subreddit pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listing page to scrape (repeatable; replaces the default subreddits)
    #[arg(short = 's', long = "source")]
    sources: Vec<String>,

    /// Directory receiving python_topics.json and python_topics.csv
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Timeout in seconds for each request
    #[arg(short = 't', long = "timeout-secs", default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Fixed pause in seconds after each page and comment fetch
    #[arg(short = 'd', long = "delay-secs", default_value_t = THROTTLE_DELAY_SECS)]
    delay_secs: u64,

    /// Do not follow discussion links to read their comments
    #[arg(long = "no-comments")]
    no_comments: bool,
}

impl Args {
    fn into_config(self) -> Config {
        let mut cfg = Config::default();
        if !self.sources.is_empty() {
            cfg.sources = self.sources;
        }
        cfg.out_dir = self.out_dir;
        cfg.timeout = Duration::from_secs(self.timeout_secs);
        cfg.delay = Duration::from_secs(self.delay_secs);
        cfg.fetch_comments = !self.no_comments;
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reddit_topics=info".parse()?))
        .init();

    let config = Args::parse().into_config();
    let fetcher = HttpFetcher::new(config.timeout)?;
    let scraper = Scraper::new(fetcher, config);

    let records = scraper.run();
    if records.is_empty() {
        info!("There is no data returned");
        return Ok(());
    }

    let totals = Totals::of(&records);
    info!(
        sources = totals.sources,
        topics = totals.topics,
        discussions = totals.discussions,
        comments = totals.comments,
        "Processing the data"
    );

    let cfg = scraper.config();
    persist(&records, &cfg.json_path(), &cfg.csv_path());
    Ok(())
}
