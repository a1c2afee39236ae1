//! Pixabay image search client

use reqwest::Client;
use serde::Deserialize;

use super::{ApiError, ApiResult, ImageSearch, fetch_json, http_client};

const DEFAULT_BASE_URL: &str = "https://pixabay.com";

/// Pixabay API client
pub struct PixabayClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PixabayClient {
    /// Create a new Pixabay client
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom host (used by tests)
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl ImageSearch for PixabayClient {
    fn name(&self) -> &'static str {
        "Pixabay"
    }

    async fn search(&self, query: &str) -> ApiResult<String> {
        let url = format!(
            "{}/api/?key={}&q={}&image_type=photo&per_page=3",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        );

        let response: PixabayResponse = fetch_json(self.client.get(&url)).await?;

        response
            .hits
            .into_iter()
            .map(|hit| hit.large_image_url)
            .find(|u| !u.is_empty())
            .ok_or(ApiError::NoResult)
    }
}

#[derive(Debug, Deserialize)]
struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
}
