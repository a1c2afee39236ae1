//! Unsplash random photo client

use reqwest::Client;
use serde::Deserialize;

use super::{ApiError, ApiResult, ImageSearch, fetch_json, http_client};

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Unsplash API client
pub struct UnsplashClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl UnsplashClient {
    /// Create a new Unsplash client
    pub fn new(access_key: &str) -> Self {
        Self::with_base_url(access_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom host (used by tests)
    pub fn with_base_url(access_key: &str, base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        }
    }
}

impl ImageSearch for UnsplashClient {
    fn name(&self) -> &'static str {
        "Unsplash"
    }

    async fn search(&self, query: &str) -> ApiResult<String> {
        let url = format!(
            "{}/photos/random?query={}&orientation=landscape&content_filter=high",
            self.base_url,
            urlencoding::encode(query)
        );

        let photo: UnsplashPhoto = fetch_json(
            self.client
                .get(&url)
                .header("Authorization", format!("Client-ID {}", self.access_key)),
        )
        .await?;

        Some(photo.urls.regular)
            .filter(|u| !u.is_empty())
            .ok_or(ApiError::NoResult)
    }
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}
