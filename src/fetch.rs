use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Blocking page transport. Implemented over HTTP by [`HttpFetcher`]; tests
/// plug in canned pages.
pub trait Fetch {
    /// GET `url` as `user_agent` and return the body of a 2xx response.
    fn fetch(&self, url: &Url, user_agent: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url, user_agent: &str) -> Result<String, FetchError> {
        debug!(url = %url, "GET");
        let resp = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        resp.text().map_err(|e| FetchError::from_reqwest(url.as_str(), e))
    }
}
