use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::traits::VideoMetadataProvider;

const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: ThumbnailSet,
}

#[derive(Debug, Default, Deserialize)]
struct ThumbnailSet {
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
    standard: Option<Thumbnail>,
    maxres: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Largest first; a missing size falls through to the next one down.
fn best_thumbnail(thumbnails: &ThumbnailSet) -> String {
    thumbnails
        .maxres
        .as_ref()
        .or(thumbnails.standard.as_ref())
        .or(thumbnails.high.as_ref())
        .or(thumbnails.medium.as_ref())
        .or(thumbnails.fallback.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// Title and thumbnail lookup via the YouTube Data API.
pub struct YoutubeMetadata {
    client: Client,
    api_key: String,
}

impl YoutubeMetadata {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    async fn fetch_snippet(&self, video_id: &str) -> Result<(String, String)> {
        let response = self
            .client
            .get(VIDEOS_URL)
            .query(&[("part", "snippet"), ("id", video_id), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Video lookup failed: {} - {}", status, error_text));
        }

        let listing: VideoListResponse = response.json().await?;
        let snippet = listing
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet)
            .ok_or_else(|| anyhow!("No video found for id {}", video_id))?;

        let thumbnail = best_thumbnail(&snippet.thumbnails);
        Ok((snippet.title, thumbnail))
    }
}

#[async_trait]
impl VideoMetadataProvider for YoutubeMetadata {
    async fn fetch(&self, video_id: &str) -> (String, String) {
        match self.fetch_snippet(video_id).await {
            Ok(pair) => pair,
            Err(e) => {
                debug!(video_id, error = %e, "video metadata lookup failed");
                (String::new(), String::new())
            }
        }
    }
}
