//! What the user did with a card

/// Action taken on the current card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    /// Swipe right
    Like,
    /// Swipe left
    Dislike,
    /// Save to bookmarks; the card stays on top
    Bookmark,
}

impl SwipeAction {
    /// Analytics action name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Bookmark => "bookmark",
        }
    }

    /// Get the emoji icon
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Like => "💚",
            Self::Dislike => "✖",
            Self::Bookmark => "🔖",
        }
    }

    /// Whether the action removes the card from the deck
    pub const fn consumes_card(&self) -> bool {
        matches!(self, Self::Like | Self::Dislike)
    }
}
