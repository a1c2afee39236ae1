//! Image resolution chain
//!
//! Given an article, find one image URL by trying, in order: the article's
//! own thumbnail, each configured provider with the cleaned title, then the
//! generic fallback query against the last provider.

use std::collections::HashMap;

use crate::api::{ImageSearch, clean_query};
use crate::models::Article;

/// Query used when nothing matches the article title
pub const FALLBACK_QUERY: &str = "knowledge education learning";

/// Ordered fallback sequence across image providers
pub struct ImageChain<P> {
    providers: Vec<P>,
}

impl<P: ImageSearch> ImageChain<P> {
    /// Create a chain over `providers`, tried in order
    pub fn new(providers: Vec<P>) -> Self {
        Self { providers }
    }

    /// Providers in the order they are tried
    pub fn providers(&self) -> &[P] {
        &self.providers
    }

    /// Resolve an image for `article`. `None` means every step came up empty.
    pub async fn resolve(&self, article: &Article) -> Option<String> {
        if let Some(url) = article.thumbnail_url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }

        let query = clean_query(&article.title);
        for provider in &self.providers {
            if let Some(url) = attempt(provider, query).await {
                return Some(url);
            }
        }

        let last = self.providers.last()?;
        tracing::debug!("No image for '{}', trying fallback query", article.title);
        attempt(last, FALLBACK_QUERY).await
    }
}

async fn attempt<P: ImageSearch>(provider: &P, query: &str) -> Option<String> {
    match provider.search(query).await {
        Ok(url) if !url.is_empty() => {
            tracing::debug!("{} found an image for '{query}'", provider.name());
            Some(url)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("{} failed for '{query}': {e}", provider.name());
            None
        }
    }
}

/// Resolved image URLs per article id.
///
/// Only successes are remembered; an article that resolved to nothing runs
/// the whole chain again the next time it is shown.
#[derive(Debug, Default)]
pub struct ResolvedImages {
    urls: HashMap<String, String>,
}

impl ResolvedImages {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached URL for an article
    pub fn get(&self, article_id: &str) -> Option<&str> {
        self.urls.get(article_id).map(String::as_str)
    }

    /// Remember a successful resolution
    pub fn insert(&mut self, article_id: &str, url: &str) {
        self.urls.insert(article_id.to_string(), url.to_string());
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.urls.clear();
    }
}
