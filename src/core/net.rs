// src/core/net.rs
// Page fetching. Any transport, timeout or status failure collapses to `None`;
// the caller keeps its previous state and tries again next run.

use std::time::Duration;

use crate::config::consts::{FETCH_TIMEOUT_SECS, USER_AGENT};
use crate::error::Result;

/// Source of raw page text.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Blocking HTTP fetcher with a fixed timeout and an identifying user agent.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        let resp = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Failed to fetch {url}: {e}");
                return None;
            }
        };
        let status = resp.status();
        if !status.is_success() {
            log::warn!("Failed to fetch {url}: HTTP {status}");
            return None;
        }
        match resp.text() {
            Ok(body) => {
                log::debug!("Fetched {url} ({} bytes)", body.len());
                Some(body)
            }
            Err(e) => {
                log::warn!("Failed to read body of {url}: {e}");
                None
            }
        }
    }
}
