//! Wikipedia content API client

use reqwest::Client;
use serde::Deserialize;

use crate::models::{Article, Language};

use super::{ApiError, ApiResult, fetch_json, http_client};

/// Number of pages requested per random batch
pub const BATCH_SIZE: usize = 10;

/// Wikipedia client bound to one language edition
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: Client,
    base_url: String,
    language: Language,
}

impl WikipediaClient {
    /// Create a client for the given language edition
    pub fn new(language: Language) -> Self {
        Self::with_base_url(language, &format!("https://{}.wikipedia.org", language.code()))
    }

    /// Create a client against a custom host (used by tests)
    pub fn with_base_url(language: Language, base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    /// Language edition this client reads from
    pub const fn language(&self) -> Language {
        self.language
    }

    fn random_batch_url(&self) -> String {
        let lang = self.language.code();
        format!(
            "{}/w/api.php?action=query&format=json&formatversion=2&generator=random&grnnamespace=0&grnlimit={BATCH_SIZE}\
             &prop=extracts%7Cpageimages%7Cinfo&exintro=true&explaintext=true&inprop=url\
             &piprop=thumbnail&pithumbsize=400&uselang={lang}",
            self.base_url
        )
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/api/rest_v1{path}", self.base_url)
    }

    /// Fetch a batch of random articles in arrival order
    pub async fn random_batch(&self) -> ApiResult<Vec<Article>> {
        let url = self.random_batch_url();
        tracing::debug!("Fetching random batch: {url}");

        let response: QueryResponse = fetch_json(self.client.get(&url)).await?;

        Ok(response
            .query
            .map(|q| q.pages)
            .unwrap_or_default()
            .into_iter()
            .map(WikiPage::into_article)
            .collect())
    }

    /// Fetch a single random article summary
    pub async fn random_summary(&self) -> ApiResult<Article> {
        let url = self.rest_url("/page/random/summary");
        let summary: SummaryResponse = fetch_json(self.client.get(&url)).await?;
        summary.into_article()
    }

    /// Fetch the summary of a page by title
    pub async fn summary(&self, title: &str) -> ApiResult<Article> {
        let path = urlencoding::encode(&title.replace(' ', "_")).into_owned();
        let url = self.rest_url(&format!("/page/summary/{path}"));
        let summary: SummaryResponse = fetch_json(self.client.get(&url)).await?;
        summary.into_article()
    }
}

// ==================== API Types ====================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    pageid: u64,
    title: String,
    extract: Option<String>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl WikiPage {
    fn into_article(self) -> Article {
        Article::new(
            self.pageid.to_string(),
            self.title,
            self.extract.unwrap_or_default(),
            self.thumbnail.map(|t| t.source),
        )
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    pageid: Option<u64>,
    extract: Option<String>,
    thumbnail: Option<Thumbnail>,
}

impl SummaryResponse {
    fn into_article(self) -> ApiResult<Article> {
        let id = self.pageid.ok_or(ApiError::NoResult)?;
        Ok(Article::new(
            id.to_string(),
            self.title,
            self.extract.unwrap_or_default(),
            self.thumbnail.map(|t| t.source),
        ))
    }
}
