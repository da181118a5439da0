//! GIF-search HTTP client
//!
//! Thin wrapper over a Tenor-style v2 API: free-text search plus lookup by
//! post ID (used to resolve pasted share URLs). Nothing is persisted.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use tally_core::traits::{GifProvider, RepoResult};
use tally_core::GifResult;

use crate::error::{map_read_status, map_transport_error};

/// Tenor-style GIF search client
#[derive(Clone)]
pub struct GifClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GifClient {
    /// Create a client against `base_url` with the provider API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

// Wire payloads ------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PostPayload>,
}

#[derive(Debug, Deserialize)]
struct PostPayload {
    id: String,
    #[serde(default)]
    title: String,
    media_formats: MediaFormats,
}

#[derive(Debug, Deserialize)]
struct MediaFormats {
    gif: Option<MediaObject>,
    tinygif: Option<MediaObject>,
}

#[derive(Debug, Deserialize)]
struct MediaObject {
    url: String,
}

impl PostPayload {
    fn into_result(self) -> Option<GifResult> {
        let url = self.media_formats.gif.map(|m| m.url)?;
        Some(GifResult {
            id: self.id,
            title: self.title,
            url,
            preview_url: self.media_formats.tinygif.map(|m| m.url),
        })
    }
}

// Provider impl ------------------------------------------------------------

#[async_trait]
impl GifProvider for GifClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: u8) -> RepoResult<Vec<GifResult>> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_read_status(status, "gif search"));
        }

        let body: SearchResponse = response.json().await.map_err(map_transport_error)?;
        Ok(body
            .results
            .into_iter()
            .filter_map(PostPayload::into_result)
            .collect())
    }

    #[instrument(skip(self))]
    async fn by_id(&self, id: &str) -> RepoResult<Option<GifResult>> {
        let response = self
            .http
            .get(format!("{}/posts", self.base_url))
            .query(&[("ids", id), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_read_status(status, "gif lookup"));
        }

        let body: SearchResponse = response.json().await.map_err(map_transport_error)?;
        Ok(body
            .results
            .into_iter()
            .next()
            .and_then(PostPayload::into_result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_without_gif_format_is_dropped() {
        let post = PostPayload {
            id: "1".to_string(),
            title: "cat".to_string(),
            media_formats: MediaFormats {
                gif: None,
                tinygif: None,
            },
        };
        assert!(post.into_result().is_none());
    }

    #[test]
    fn test_post_maps_urls() {
        let post = PostPayload {
            id: "1".to_string(),
            title: "cat".to_string(),
            media_formats: MediaFormats {
                gif: Some(MediaObject {
                    url: "https://g.example/full.gif".to_string(),
                }),
                tinygif: Some(MediaObject {
                    url: "https://g.example/tiny.gif".to_string(),
                }),
            },
        };
        let result = post.into_result().unwrap();
        assert_eq!(result.url, "https://g.example/full.gif");
        assert_eq!(result.preview_url.as_deref(), Some("https://g.example/tiny.gif"));
    }
}
