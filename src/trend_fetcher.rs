use log::{debug, info};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::common::constants::{HTTP_TIMEOUT_SECS, PAGE_SIZE, REDDIT_API_URL, USER_AGENT};
use crate::common::{Post, TimeWindow};

/// Every way a single fetch attempt can fail. The `Display` text is what the
/// user sees in the failure notification.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error {0}: {1}")]
    HttpStatus(u16, String),
    #[error("No posts found for r/{0}")]
    NoResults(String),
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

pub type FetchResult = Result<Vec<Post>, FetchError>;

/// Seam between the panel host and the HTTP fetcher.
pub trait PostSource: Send + Sync {
    fn fetch(&self, community: &str, window: TimeWindow) -> FetchResult;
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: REDDIT_API_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

/// Reads the "top" listing of a community.
pub struct TrendFetcher {
    client: Client,
    base_url: String,
}

impl TrendFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The community is spliced into the path verbatim.
    pub fn listing_url(&self, community: &str, window: TimeWindow) -> String {
        format!(
            "{}/r/{}/top/.json?t={}&limit={}",
            self.base_url,
            community,
            window.as_str(),
            PAGE_SIZE
        )
    }

    pub fn fetch(&self, community: &str, window: TimeWindow) -> FetchResult {
        let url = self.listing_url(community, window);
        debug!("Fetching top posts from: {}", url);

        let response = self.client.get(&url).send().map_err(|e| {
            debug!("Request for r/{} failed: {}", community, e);
            FetchError::Network(e)
        })?;

        let status = response.status();
        debug!("Received response with status: {}", status);

        if !status.is_success() {
            debug!("HTTP request failed with status: {}", status);
            return Err(FetchError::HttpStatus(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default().to_string(),
            ));
        }

        let body = response.text()?;
        let json: Value = serde_json::from_str(&body).map_err(|e| {
            debug!("Response for r/{} is not valid JSON: {}", community, e);
            FetchError::Decode(e)
        })?;

        let posts = parse_listing(&json);
        if posts.is_empty() {
            info!("Listing for r/{} ({}) is empty", community, window);
            return Err(FetchError::NoResults(community.to_string()));
        }

        debug!("Parsed {} posts for r/{}", posts.len(), community);
        Ok(posts)
    }
}

impl PostSource for TrendFetcher {
    fn fetch(&self, community: &str, window: TimeWindow) -> FetchResult {
        TrendFetcher::fetch(self, community, window)
    }
}

/// Reshapes `data.children[*].data` into posts, keeping server order. A missing
/// collection yields an empty list.
pub fn parse_listing(json: &Value) -> Vec<Post> {
    json.pointer("/data/children")
        .and_then(|c| c.as_array())
        .map(|children| {
            children
                .iter()
                .map(|child| Post::from_json(&child["data"]))
                .collect()
        })
        .unwrap_or_default()
}
