//! Video search client. Wraps the YouTube Data API `search.list` endpoint.
//!
//! Returns ranked `SearchHit`s. Link construction happens in the generation layer
//! via `watch_url` so the video list handed to the model is built in one place.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::errors::{Provider, ProviderError};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
/// Sent as a header, never in the query string.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// One ranked video candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub video_id: String,
}

#[async_trait]
pub trait VideoSearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, ProviderError>;
}

/// `https://www.youtube.com/watch?v=<video_id>`
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

/// True when the link points at the video provider (youtube.com, any subdomain, or youtu.be).
pub fn is_video_provider_link(link: &Url) -> bool {
    match link.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            // `youtube.com.` is the same fully-qualified name.
            let host = host.strip_suffix('.').unwrap_or(&host);
            host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be"
        }
        None => false,
    }
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl YouTubeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .context("Failed to build HTTP client for the video search provider")?;

        Ok(Self {
            client,
            api_key: config.youtube_api_key.clone(),
            endpoint: format!(
                "{}/youtube/v3/search",
                config.youtube_base_url.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl VideoSearchClient for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, ProviderError> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(Provider::VideoSearch, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(
                Provider::VideoSearch,
                status.as_u16(),
                &body,
            ));
        }

        let body: SearchListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(Provider::VideoSearch, e))?;

        // Channel and playlist results carry no videoId.
        let hits: Vec<SearchHit> = body
            .items
            .into_iter()
            .filter_map(|item| {
                item.id.video_id.map(|video_id| SearchHit {
                    title: item.snippet.title,
                    video_id,
                })
            })
            .collect();

        debug!("Video search for {query:?} returned {} hits", hits.len());
        Ok(hits)
    }
}
