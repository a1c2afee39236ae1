//! Article model (a single Wikipedia page summary)

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Language;

/// A Wikipedia article as shown on a card.
///
/// Articles are immutable once fetched. Two articles are equal when their
/// identifiers match, regardless of the rest of their content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Wikipedia page id
    pub id: String,
    /// Page title
    pub title: String,
    /// Plain-text intro extract
    pub summary: String,
    /// Thumbnail supplied by Wikipedia, if any
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl Article {
    /// Create a new article
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        thumbnail_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: summary.into(),
            thumbnail_url,
        }
    }

    /// Web URL of the article on the given language edition
    pub fn url(&self, language: Language) -> String {
        format!(
            "https://{}.wikipedia.org/wiki/{}",
            language.code(),
            self.title.replace(' ', "_")
        )
    }

    /// Text used when sharing an article
    pub fn share_text(&self, language: Language) -> String {
        format!(
            "Check out this interesting article from Wikipedia!\n\n{}\n\n{}\n\nRead more: {}\n\nShared via SwipePedia",
            self.title,
            self.summary,
            self.url(language)
        )
    }

    /// Single-line preview of the summary, truncated to `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.summary.replace('\n', " ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{}…", cut.trim_end())
        }
    }
}

impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Article {}

impl Hash for Article {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
