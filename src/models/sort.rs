//! Bookmark ordering

use serde::{Deserialize, Serialize};

/// How the bookmark list is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkSortOrder {
    /// Newest bookmark first (storage order)
    #[default]
    MostRecent,
    /// By title, ascending
    Alphabetical,
}

impl BookmarkSortOrder {
    /// Get the display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MostRecent => "Most Recent",
            Self::Alphabetical => "Alphabetical",
        }
    }

    /// Toggle to the other order
    pub const fn toggle(&self) -> Self {
        match self {
            Self::MostRecent => Self::Alphabetical,
            Self::Alphabetical => Self::MostRecent,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "recent" | "most_recent" | "most-recent" | "newest" => Some(Self::MostRecent),
            "alpha" | "alphabetical" | "title" | "az" => Some(Self::Alphabetical),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookmarkSortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
