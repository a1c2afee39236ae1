//! Bing image search client

use reqwest::Client;
use serde::Deserialize;

use super::{ApiError, ApiResult, ImageSearch, fetch_json, http_client};

const DEFAULT_BASE_URL: &str = "https://api.bing.microsoft.com";

/// Bing image search API client
pub struct BingClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BingClient {
    /// Create a new Bing client
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

impl ImageSearch for BingClient {
    fn name(&self) -> &'static str {
        "Bing"
    }

    async fn search(&self, query: &str) -> ApiResult<String> {
        let url = format!(
            "{}/v7.0/images/search?q={}&count=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response: BingResponse = fetch_json(
            self.client
                .get(&url)
                .header("Ocp-Apim-Subscription-Key", &self.api_key),
        )
        .await?;

        response
            .value
            .into_iter()
            .next()
            .map(|image| image.content_url)
            .filter(|u| !u.is_empty())
            .ok_or(ApiError::NoResult)
    }
}

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(default)]
    value: Vec<BingImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingImage {
    content_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_search_reads_content_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v7.0/images/search")
            .match_query(Matcher::UrlEncoded("q".into(), "Mount Fuji".into()))
            .match_header("ocp-apim-subscription-key", "bing-key")
            .with_body(r#"{"value": [{"contentUrl": "https://bing.example/fuji.jpg", "name": "Fuji"}]}"#)
            .create_async()
            .await;

        let client = BingClient::with_base_url("bing-key", &server.url());
        assert_eq!(
            client.search("Mount Fuji").await.unwrap(),
            "https://bing.example/fuji.jpg"
        );
        mock.assert_async().await;
    }
}
