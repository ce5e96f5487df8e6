//! Scrape subreddit listing pages for Python topics and discussion threads,
//! read each thread's comments from the static host, and save everything as
//! JSON and CSV.

pub mod aggregate;
pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod persist;

pub use aggregate::{Scraper, SourceOutcome, Totals};
pub use config::Config;
pub use fetch::{Fetch, HttpFetcher};
pub use persist::{persist, Persisted};
