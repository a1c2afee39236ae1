//! DuckDuckGo image search client
//!
//! DuckDuckGo has no public image API. The search page embeds a `vqd`
//! token which the `i.js` endpoint requires, so a search is two requests.

use std::sync::LazyLock;

use regex_lite::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use serde::Deserialize;

use super::{ApiError, ApiResult, ImageSearch, fetch_json, http_client};

const DEFAULT_BASE_URL: &str = "https://duckduckgo.com";

static VQD_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"vqd=["']([^"']+)["']"#).ok());

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// DuckDuckGo image search client
pub struct DuckDuckGoClient {
    client: Client,
    base_url: String,
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoClient {
    /// Create a new DuckDuckGo client
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom host (used by tests)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_token(&self, encoded_query: &str) -> ApiResult<String> {
        let url = format!("{}/?q={encoded_query}&t=_", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, BROWSER_UA)
            .header(REFERER, "https://duckduckgo.com")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let html = response.text().await?;
        extract_vqd(&html).ok_or(ApiError::NoResult)
    }
}

impl ImageSearch for DuckDuckGoClient {
    fn name(&self) -> &'static str {
        "DuckDuckGo"
    }

    async fn search(&self, query: &str) -> ApiResult<String> {
        let encoded = urlencoding::encode(query.trim());
        let vqd = self.fetch_token(&encoded).await?;
        tracing::trace!("DuckDuckGo vqd token: {vqd}");

        let url = format!(
            "{}/i.js?q={encoded}&vqd={}&p=1&s=0",
            self.base_url,
            urlencoding::encode(&vqd)
        );

        let response: DuckDuckGoImages = fetch_json(
            self.client
                .get(&url)
                .header(USER_AGENT, "Mozilla/5.0")
                .header(REFERER, "https://duckduckgo.com"),
        )
        .await?;

        response
            .results
            .into_iter()
            .next()
            .map(|r| r.image)
            .filter(|u| !u.is_empty())
            .ok_or(ApiError::NoResult)
    }
}

/// Pull the `vqd` token out of a search results page
fn extract_vqd(html: &str) -> Option<String> {
    VQD_PATTERN
        .as_ref()?
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct DuckDuckGoImages {
    #[serde(default)]
    results: Vec<DuckDuckGoImage>,
}

#[derive(Debug, Deserialize)]
struct DuckDuckGoImage {
    image: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_vqd_pattern_compiles() {
        assert!(VQD_PATTERN.is_some());
    }

    #[test]
    fn test_extract_vqd() {
        assert_eq!(
            extract_vqd(r#"<script>nrj('/d.js?q=x',vqd='4-12345',kl='wt-wt')</script>"#).as_deref(),
            Some("4-12345")
        );
        assert_eq!(
            extract_vqd(r#"var x = {vqd="4-999"};"#).as_deref(),
            Some("4-999")
        );
        assert_eq!(extract_vqd("<html>no token here</html>"), None);
    }

    #[tokio::test]
    async fn test_two_step_search() {
        let mut server = mockito::Server::new_async().await;
        let page = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("q".into(), "Saturn".into()))
            .with_body("<html><script>vqd='4-abc'</script></html>")
            .create_async()
            .await;
        let images = server
            .mock("GET", "/i.js")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Saturn".into()),
                Matcher::UrlEncoded("vqd".into(), "4-abc".into()),
            ]))
            .with_body(r#"{"results": [{"image": "https://ddg.example/saturn.png", "title": "Saturn"}]}"#)
            .create_async()
            .await;

        let client = DuckDuckGoClient::with_base_url(&server.url());
        let url = client.search("Saturn").await.unwrap();

        page.assert_async().await;
        images.assert_async().await;
        assert_eq!(url, "https://ddg.example/saturn.png");
    }

    #[tokio::test]
    async fn test_missing_token_is_no_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_body("<html>blocked</html>")
            .create_async()
            .await;

        let client = DuckDuckGoClient::with_base_url(&server.url());
        assert!(matches!(client.search("Saturn").await, Err(ApiError::NoResult)));
    }
}
