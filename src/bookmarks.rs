//! Bookmark list with local persistence
//!
//! Bookmarks are stored newest-first and serialized as a single JSON array
//! under one key of the key-value store.

use anyhow::{Context, Result};

use crate::analytics::{Analytics, Event};
use crate::db::Database;
use crate::models::{Article, BookmarkSortOrder};

/// Maximum number of bookmarks kept
pub const MAX_BOOKMARKS: usize = 50;

/// Key the serialized list is stored under
pub const STORAGE_KEY: &str = "SavedBookmarks";

/// User-saved articles, most recent first
pub struct Bookmarks {
    db: Database,
    articles: Vec<Article>,
    analytics: Analytics,
}

impl Bookmarks {
    /// Load bookmarks from the store.
    ///
    /// Stored data that cannot be decoded is logged and treated as empty.
    pub fn load(db: Database, analytics: Analytics) -> Result<Self> {
        let articles = match db.get(STORAGE_KEY)? {
            Some(json) => serde_json::from_str::<Vec<Article>>(&json).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable bookmarks: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(Self {
            db,
            articles,
            analytics,
        })
    }

    /// Add an article at the front. Returns `false` if it was already saved.
    pub fn add(&mut self, article: Article) -> Result<bool> {
        if self.contains(&article.id) {
            return Ok(false);
        }

        let mut articles = Vec::with_capacity(MAX_BOOKMARKS);
        articles.push(article);
        articles.extend(self.articles.iter().take(MAX_BOOKMARKS - 1).cloned());
        self.save(&articles)?;
        self.articles = articles;

        self.analytics.log(&Event::BookmarkAction {
            action: "add",
            count: self.articles.len(),
        });
        Ok(true)
    }

    /// Remove the article with `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Ok(false);
        }
        let articles: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        self.save(&articles)?;
        self.articles = articles;
        Ok(true)
    }

    /// Remove everything, returning how many bookmarks were dropped
    pub fn clear(&mut self) -> Result<usize> {
        self.db.delete(STORAGE_KEY)?;
        let count = self.articles.len();
        self.articles.clear();

        self.analytics.log(&Event::BookmarkAction {
            action: "clear_all",
            count,
        });
        Ok(count)
    }

    /// Whether an article with `id` is saved
    pub fn contains(&self, id: &str) -> bool {
        self.articles.iter().any(|a| a.id == id)
    }

    /// Number of bookmarks
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether there are no bookmarks
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Bookmarks in storage order (newest first)
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Bookmarks in the requested order
    pub fn sorted(&self, order: BookmarkSortOrder) -> Vec<&Article> {
        let mut view: Vec<&Article> = self.articles.iter().collect();
        if order == BookmarkSortOrder::Alphabetical {
            view.sort_by(|a, b| a.title.cmp(&b.title));
        }
        view
    }

    /// Write `articles` to the store. Callers swap them in only on success.
    fn save(&self, articles: &[Article]) -> Result<()> {
        let json = serde_json::to_string(articles).context("Failed to encode bookmarks")?;
        self.db.set(STORAGE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn article(id: usize, title: &str) -> Article {
        Article::new(id.to_string(), title, format!("Summary of {title}"), None)
    }

    fn empty() -> Bookmarks {
        Bookmarks::load(Database::open_in_memory().unwrap(), Analytics::disabled()).unwrap()
    }

    #[test]
    fn test_add_inserts_newest_first() {
        let mut bookmarks = empty();
        assert!(bookmarks.add(article(1, "One")).unwrap());
        assert!(bookmarks.add(article(2, "Two")).unwrap());

        let ids: Vec<_> = bookmarks.articles().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut bookmarks = empty();
        bookmarks.add(article(1, "One")).unwrap();
        bookmarks.add(article(2, "Two")).unwrap();

        assert!(!bookmarks.add(article(1, "One again")).unwrap());
        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks.articles()[1].title, "One");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut bookmarks = empty();
        for i in 0..MAX_BOOKMARKS {
            bookmarks.add(article(i, &format!("A{i}"))).unwrap();
        }
        assert_eq!(bookmarks.len(), MAX_BOOKMARKS);
        assert!(bookmarks.contains("0"));

        bookmarks.add(article(999, "Newest")).unwrap();
        assert_eq!(bookmarks.len(), MAX_BOOKMARKS);
        assert!(!bookmarks.contains("0"));
        assert_eq!(bookmarks.articles()[0].id, "999");
        assert_eq!(bookmarks.articles()[MAX_BOOKMARKS - 1].id, "1");
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut bookmarks = empty();
        bookmarks.add(article(1, "One")).unwrap();

        assert!(!bookmarks.remove("404").unwrap());
        assert_eq!(bookmarks.len(), 1);

        assert!(bookmarks.remove("1").unwrap());
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_sorting() {
        let mut bookmarks = empty();
        bookmarks.add(article(1, "Mango")).unwrap();
        bookmarks.add(article(2, "Apple")).unwrap();
        bookmarks.add(article(3, "Zebra")).unwrap();

        let recent: Vec<_> = bookmarks
            .sorted(BookmarkSortOrder::MostRecent)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(recent, ["Zebra", "Apple", "Mango"]);

        let alpha: Vec<_> = bookmarks
            .sorted(BookmarkSortOrder::Alphabetical)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(alpha, ["Apple", "Mango", "Zebra"]);

        // Sorting is a view; storage order is untouched
        assert_eq!(bookmarks.articles()[0].title, "Zebra");
    }

    #[test]
    fn test_clear() {
        let mut bookmarks = empty();
        bookmarks.add(article(1, "One")).unwrap();
        bookmarks.add(article(2, "Two")).unwrap();
        assert_eq!(bookmarks.clear().unwrap(), 2);
        assert!(bookmarks.is_empty());
        assert!(bookmarks.db.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_failed_write_leaves_list_unchanged() {
        let mut bookmarks = empty();
        for i in 0..MAX_BOOKMARKS {
            bookmarks.add(article(i, &format!("A{i}"))).unwrap();
        }
        bookmarks.db.set_read_only().unwrap();

        assert!(bookmarks.add(article(999, "Newest")).is_err());
        assert!(bookmarks.remove("3").is_err());
        assert!(bookmarks.clear().is_err());

        assert_eq!(bookmarks.len(), MAX_BOOKMARKS);
        assert!(bookmarks.contains("0"));
        assert!(bookmarks.contains("3"));
        assert!(!bookmarks.contains("999"));
        assert_eq!(bookmarks.articles()[0].id, (MAX_BOOKMARKS - 1).to_string());
    }

    #[test]
    fn test_persists_across_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.sqlite");

        {
            let db = Database::open_path(&path).unwrap();
            let mut bookmarks = Bookmarks::load(db, Analytics::disabled()).unwrap();
            bookmarks.add(article(1, "One")).unwrap();
            bookmarks.add(article(2, "Two")).unwrap();
            bookmarks.remove("1").unwrap();
        }

        let db = Database::open_path(&path).unwrap();
        let bookmarks = Bookmarks::load(db, Analytics::disabled()).unwrap();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks.articles()[0].title, "Two");
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let db = Database::open_in_memory().unwrap();
        db.set(STORAGE_KEY, "not json").unwrap();
        let bookmarks = Bookmarks::load(db, Analytics::disabled()).unwrap();
        assert!(bookmarks.is_empty());
    }
}
