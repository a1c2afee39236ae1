//! HTTP clients for Wikipedia and the image search providers

pub mod bing;
pub mod duckduckgo;
pub mod pixabay;
pub mod unsplash;
pub mod wikipedia;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Errors from a single HTTP exchange
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status
    #[error("unexpected status {0}")]
    Status(StatusCode),
    /// The body was not the JSON we expected
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The response was valid but contained nothing usable
    #[error("no usable result")]
    NoResult,
}

/// Result alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Build the shared HTTP client
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(15))
        .user_agent(concat!("swipepedia/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Send a request and decode a JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Reduce an article title to a search query: everything before the first
/// bracket, trimmed.
pub fn clean_query(title: &str) -> &str {
    let cleaned = title
        .split(['(', ')', '[', ']', '{', '}'])
        .next()
        .unwrap_or(title)
        .trim();
    if cleaned.is_empty() { title.trim() } else { cleaned }
}

/// An image search backend
#[allow(async_fn_in_trait)]
pub trait ImageSearch {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Find one image URL for `query`
    async fn search(&self, query: &str) -> ApiResult<String>;
}

/// Known image providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// DuckDuckGo image search (no key)
    DuckDuckGo,
    /// Unsplash random photo API
    Unsplash,
    /// Pixabay search API
    Pixabay,
    /// Bing image search API
    Bing,
}

impl ProviderKind {
    /// Get all providers
    pub const fn all() -> &'static [Self] {
        &[Self::DuckDuckGo, Self::Unsplash, Self::Pixabay, Self::Bing]
    }

    /// Get the display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Unsplash => "Unsplash",
            Self::Pixabay => "Pixabay",
            Self::Bing => "Bing",
        }
    }
}

/// Unified provider that wraps the vendor-specific clients
pub enum ImageProvider {
    /// DuckDuckGo client
    DuckDuckGo(duckduckgo::DuckDuckGoClient),
    /// Unsplash client
    Unsplash(unsplash::UnsplashClient),
    /// Pixabay client
    Pixabay(pixabay::PixabayClient),
    /// Bing client
    Bing(bing::BingClient),
}

impl ImageProvider {
    /// Build a provider from config; `None` when it needs a key that is not set
    pub fn from_config(kind: ProviderKind, config: &Config) -> Option<Self> {
        let key = |k: &Option<String>| k.as_deref().filter(|k| !k.trim().is_empty()).map(str::to_string);

        match kind {
            ProviderKind::DuckDuckGo => Some(Self::DuckDuckGo(duckduckgo::DuckDuckGoClient::new())),
            ProviderKind::Unsplash => key(&config.unsplash_access_key)
                .map(|k| Self::Unsplash(unsplash::UnsplashClient::new(&k))),
            ProviderKind::Pixabay => {
                key(&config.pixabay_api_key).map(|k| Self::Pixabay(pixabay::PixabayClient::new(&k)))
            }
            ProviderKind::Bing => {
                key(&config.bing_api_key).map(|k| Self::Bing(bing::BingClient::new(&k)))
            }
        }
    }
}

impl ImageSearch for ImageProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo(c) => c.name(),
            Self::Unsplash(c) => c.name(),
            Self::Pixabay(c) => c.name(),
            Self::Bing(c) => c.name(),
        }
    }

    async fn search(&self, query: &str) -> ApiResult<String> {
        match self {
            Self::DuckDuckGo(c) => c.search(query).await,
            Self::Unsplash(c) => c.search(query).await,
            Self::Pixabay(c) => c.search(query).await,
            Self::Bing(c) => c.search(query).await,
        }
    }
}

/// Build the configured providers in order, skipping those without keys
pub fn providers_from_config(config: &Config) -> Vec<ImageProvider> {
    config
        .image_providers
        .iter()
        .filter_map(|&kind| {
            let provider = ImageProvider::from_config(kind, config);
            if provider.is_none() {
                tracing::info!("{} has no API key configured, skipping", kind.name());
            }
            provider
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("Mercury (planet)"), "Mercury");
        assert_eq!(clean_query("  Plain title "), "Plain title");
        assert_eq!(clean_query("Foo [disambiguation] bar"), "Foo");
        assert_eq!(clean_query("(1990)"), "(1990)");
    }

    #[test]
    fn test_providers_without_keys_are_skipped() {
        let mut config = Config::default();
        config.image_providers = ProviderKind::all().to_vec();
        config.pixabay_api_key = Some("abc".to_string());
        config.bing_api_key = Some("   ".to_string());

        let names: Vec<_> = providers_from_config(&config)
            .iter()
            .map(ImageSearch::name)
            .collect();
        assert_eq!(names, ["DuckDuckGo", "Pixabay"]);
    }
}
