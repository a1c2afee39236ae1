//! Application state

use std::collections::HashSet;

use image::DynamicImage;
use ratatui_image::protocol::StatefulProtocol;

use super::async_ops::AsyncCommand;
use crate::analytics::{Analytics, Event};
use crate::bookmarks::Bookmarks;
use crate::config::Config;
use crate::feed::{FeedBuffer, RefillTicket};
use crate::images::{self, ImageCache, ResolvedImages};
use crate::models::{Article, Language, SwipeAction};
use crate::theme::Theme;

/// How long a swipe tints the card border
const FLASH_TICKS: u64 = 6;

/// Top-level views, switched with Tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Swipe,
    Bookmarks,
    Settings,
}

impl View {
    pub const fn next(&self) -> Self {
        match self {
            Self::Swipe => Self::Bookmarks,
            Self::Bookmarks => Self::Settings,
            Self::Settings => Self::Swipe,
        }
    }

    pub const fn prev(&self) -> Self {
        match self {
            Self::Swipe => Self::Settings,
            Self::Bookmarks => Self::Swipe,
            Self::Settings => Self::Bookmarks,
        }
    }
}

/// Modal overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Help,
    ThemePicker,
    LanguagePicker,
    ConfirmClear,
}

/// Rows on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Language,
    Theme,
    BookmarkSort,
    ShowImages,
    ClearBookmarks,
}

impl SettingsItem {
    pub const ALL: [Self; 5] = [
        Self::Language,
        Self::Theme,
        Self::BookmarkSort,
        Self::ShowImages,
        Self::ClearBookmarks,
    ];
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Whether to quit
    pub should_quit: bool,
    /// Current theme
    pub theme: Theme,
    /// Current view
    pub view: View,
    /// Current modal
    pub mode: Mode,

    /// Article deck
    pub feed: FeedBuffer,
    /// Saved articles
    pub bookmarks: Bookmarks,
    /// Selected row in the (sorted) bookmark list
    pub selected_bookmark: usize,
    /// Selected row on the settings screen
    pub settings_index: usize,
    /// Highlighted theme in the picker
    pub theme_picker_index: usize,
    /// Highlighted language in the picker
    pub language_picker_index: usize,

    /// Image URLs found by the resolution chain, per article id
    pub resolved_images: ResolvedImages,
    /// Decoded images ready to draw, per URL
    pub image_protocols: ImageCache<StatefulProtocol>,
    /// URLs currently downloading
    pub loading_images: HashSet<String>,
    /// URLs whose download failed this session
    failed_images: HashSet<String>,
    /// Article whose image was last looked at, and whether the chain ran for it
    image_view: Option<String>,
    chain_requested: bool,

    /// Analytics sink
    pub analytics: Analytics,
    /// Last article logged as viewed
    last_viewed: Option<String>,
    /// Last swipe and the tick it happened on
    flash: Option<(SwipeAction, u64)>,

    /// Status message (bottom bar)
    pub status: String,

    /// Tick counter for animations
    tick: u64,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: Config, bookmarks: Bookmarks, analytics: Analytics) -> Self {
        let theme = config.theme;

        Self {
            config,
            should_quit: false,
            theme,
            view: View::Swipe,
            mode: Mode::Normal,
            feed: FeedBuffer::new(),
            bookmarks,
            selected_bookmark: 0,
            settings_index: 0,
            theme_picker_index: 0,
            language_picker_index: 0,
            resolved_images: ResolvedImages::new(),
            image_protocols: ImageCache::new(),
            loading_images: HashSet::new(),
            failed_images: HashSet::new(),
            image_view: None,
            chain_requested: false,
            analytics,
            last_viewed: None,
            flash: None,
            status: String::new(),
            tick: 0,
        }
    }

    /// Tick for animations
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Get current tick
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Swipe to highlight on the card border, for a few ticks after it happens
    pub fn flash(&self) -> Option<SwipeAction> {
        self.flash
            .filter(|(_, at)| self.tick.wrapping_sub(*at) < FLASH_TICKS)
            .map(|(action, _)| action)
    }

    /// Content language
    pub const fn language(&self) -> Language {
        self.config.language
    }

    /// Whether a feed fetch is running
    pub const fn loading(&self) -> bool {
        self.feed.is_refilling()
    }

    /// Card on top of the deck
    pub fn current_article(&self) -> Option<&Article> {
        self.feed.current()
    }

    /// Article whose image should be on screen for the current view
    pub fn focused_article(&self) -> Option<&Article> {
        match self.view {
            View::Swipe => self.current_article(),
            View::Bookmarks => self.selected_bookmark_article(),
            View::Settings => None,
        }
    }

    /// Turn a refill ticket into a worker command
    pub fn prefetch_command(&self, ticket: RefillTicket) -> AsyncCommand {
        AsyncCommand::Prefetch {
            ticket,
            language: self.config.language,
        }
    }

    /// Kick off a refill if the deck has room. Used at startup and on manual retry.
    pub fn request_refill(&mut self) -> Option<AsyncCommand> {
        let ticket = self.feed.begin_refill()?;
        self.set_status("Loading articles...");
        Some(self.prefetch_command(ticket))
    }

    // ==================== Swiping ====================

    /// Apply a swipe to the current card
    pub fn swipe(&mut self, action: SwipeAction) -> Option<AsyncCommand> {
        let article = self.current_article()?.clone();

        self.analytics.log(&Event::ArticleInteraction {
            action: action.as_str(),
            title: &article.title,
        });
        self.flash = Some((action, self.tick));

        if action == SwipeAction::Bookmark {
            match self.bookmarks.add(article.clone()) {
                Ok(true) => self.set_status(format!("🔖 Saved \"{}\"", article.title)),
                Ok(false) => self.set_status("Already bookmarked"),
                Err(e) => {
                    tracing::error!("Failed to save bookmark: {e:#}");
                    self.set_status(format!("❌ {e}"));
                }
            }
        }

        if action.consumes_card() {
            self.set_status(format!("{} {}", action.emoji(), article.title));
            let ticket = self.feed.consume(&article.id)?;
            return Some(self.prefetch_command(ticket));
        }
        None
    }

    /// Log a view event when a new card comes to the top
    pub fn note_view(&mut self) {
        if self.view != View::Swipe {
            return;
        }
        let Some(article) = self.feed.current() else {
            return;
        };
        if self.last_viewed.as_deref() == Some(article.id.as_str()) {
            return;
        }
        self.analytics.log(&Event::ArticleView {
            title: &article.title,
        });
        self.last_viewed = Some(article.id.clone());
    }

    // ==================== Bookmarks ====================

    /// Bookmarks in the configured order
    pub fn sorted_bookmarks(&self) -> Vec<&Article> {
        self.bookmarks.sorted(self.config.bookmark_sort)
    }

    /// Highlighted bookmark
    pub fn selected_bookmark_article(&self) -> Option<&Article> {
        self.sorted_bookmarks().get(self.selected_bookmark).copied()
    }

    /// Move selection down in bookmarks
    pub fn select_next_bookmark(&mut self) {
        let len = self.bookmarks.len();
        if len > 0 {
            self.selected_bookmark = (self.selected_bookmark + 1).min(len - 1);
        }
    }

    /// Move selection up in bookmarks
    pub fn select_prev_bookmark(&mut self) {
        self.selected_bookmark = self.selected_bookmark.saturating_sub(1);
    }

    /// Switch between most-recent and alphabetical order
    pub fn toggle_bookmark_sort(&mut self) {
        self.config.bookmark_sort = self.config.bookmark_sort.toggle();
        self.selected_bookmark = 0;
        self.set_status(format!("Sorted by {}", self.config.bookmark_sort.name()));
    }

    /// Delete the highlighted bookmark
    pub fn remove_selected_bookmark(&mut self) {
        let Some(article) = self.selected_bookmark_article().cloned() else {
            return;
        };
        match self.bookmarks.remove(&article.id) {
            Ok(_) => {
                self.set_status(format!("Removed \"{}\"", article.title));
                self.selected_bookmark = self
                    .selected_bookmark
                    .min(self.bookmarks.len().saturating_sub(1));
            }
            Err(e) => self.set_status(format!("❌ {e}")),
        }
    }

    /// Delete every bookmark
    pub fn clear_bookmarks(&mut self) {
        match self.bookmarks.clear() {
            Ok(count) => self.set_status(format!("✓ Cleared {count} bookmarks")),
            Err(e) => self.set_status(format!("❌ {e}")),
        }
        self.selected_bookmark = 0;
    }

    // ==================== Settings ====================

    /// Change content language, resetting the deck
    pub fn set_language(&mut self, language: Language) -> Option<AsyncCommand> {
        if language == self.config.language {
            return None;
        }
        self.config.language = language;
        self.analytics.log(&Event::LanguageChange {
            language: language.code(),
        });
        self.set_status(format!("Language: {language}"));

        // Page ids are per edition
        self.resolved_images.clear();
        self.chain_requested = false;

        let ticket = self.feed.reset()?;
        Some(self.prefetch_command(ticket))
    }

    /// Apply a theme
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.config.theme = theme;
        self.analytics.log(&Event::ThemeChange { theme: theme.slug() });
        self.set_status(format!("✓ Theme set to {}", theme.name()));
    }

    /// Move selection down in settings
    pub fn select_next_setting(&mut self) {
        self.settings_index = (self.settings_index + 1).min(SettingsItem::ALL.len() - 1);
    }

    /// Move selection up in settings
    pub fn select_prev_setting(&mut self) {
        self.settings_index = self.settings_index.saturating_sub(1);
    }

    /// Highlighted settings row
    pub const fn selected_setting(&self) -> SettingsItem {
        SettingsItem::ALL[self.settings_index]
    }

    // ==================== Images ====================

    /// Next piece of image work for the focused article, if any.
    ///
    /// The resolution chain runs at most once per view of an article; a
    /// resolved URL is downloaded once.
    pub fn next_image_work(&mut self) -> Option<AsyncCommand> {
        if !self.config.show_images {
            return None;
        }
        let article = self.focused_article()?.clone();

        if self.image_view.as_deref() != Some(article.id.as_str()) {
            self.image_view = Some(article.id.clone());
            self.chain_requested = false;
        }

        if let Some(url) = self.resolved_images.get(&article.id) {
            if self.image_protocols.contains(url)
                || self.loading_images.contains(url)
                || self.failed_images.contains(url)
            {
                return None;
            }
            let url = url.to_string();
            self.loading_images.insert(url.clone());
            return Some(AsyncCommand::LoadImage { url });
        }

        if self.chain_requested {
            return None;
        }
        self.chain_requested = true;
        Some(AsyncCommand::ResolveImage {
            generation: self.feed.generation(),
            article,
        })
    }

    /// Record the outcome of the resolution chain
    ///
    /// Page ids are only unique within one edition, so results from before a
    /// language change are dropped.
    pub fn image_resolved(&mut self, generation: u64, article_id: &str, url: Option<String>) {
        if generation != self.feed.generation() {
            tracing::debug!("Dropping image for article {article_id} from another edition");
            return;
        }
        if let Some(url) = url {
            self.resolved_images.insert(article_id, &url);
        } else {
            tracing::debug!("No image for article {article_id}");
        }
    }

    /// Prepare a downloaded image for drawing
    pub fn image_loaded(&mut self, url: &str, image: DynamicImage) {
        self.loading_images.remove(url);
        if let Some(picker) = images::picker() {
            let protocol = picker.new_resize_protocol(image);
            self.image_protocols.insert(url, protocol);
        }
    }

    /// Remember a failed download so it is not retried every frame
    pub fn image_failed(&mut self, url: &str) {
        self.loading_images.remove(url);
        self.failed_images.insert(url.to_string());
    }

    /// Whether the focused article has an image ready to draw
    pub fn has_focused_image(&self) -> bool {
        self.config.show_images
            && self
                .focused_article()
                .and_then(|a| self.resolved_images.get(&a.id))
                .is_some_and(|url| self.image_protocols.contains(url))
    }

    /// Drawable image for the focused article
    pub fn focused_image_protocol(&mut self) -> Option<&mut StatefulProtocol> {
        let url = self
            .focused_article()
            .and_then(|a| self.resolved_images.get(&a.id))?
            .to_string();
        self.image_protocols.get_mut(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn state() -> AppState {
        let bookmarks =
            Bookmarks::load(Database::open_in_memory().unwrap(), Analytics::disabled()).unwrap();
        AppState::new(Config::default(), bookmarks, Analytics::disabled())
    }

    fn fill(state: &mut AppState, n: usize) {
        let ticket = state.feed.begin_refill().unwrap();
        let batch = (0..n)
            .map(|i| Article::new(i.to_string(), format!("Article {i}"), "", None))
            .collect();
        state.feed.finish_refill(ticket, Ok(batch));
    }

    #[test]
    fn test_bookmark_keeps_card_and_like_consumes() {
        let mut state = state();
        fill(&mut state, 5);

        assert!(state.swipe(SwipeAction::Bookmark).is_none());
        assert_eq!(state.feed.len(), 5);
        assert!(state.bookmarks.contains("0"));

        assert!(state.swipe(SwipeAction::Like).is_none());
        assert_eq!(state.current_article().unwrap().id, "1");

        // 4 -> 3 hits the refill threshold
        let cmd = state.swipe(SwipeAction::Dislike);
        assert!(matches!(
            cmd,
            Some(AsyncCommand::Prefetch { language: Language::English, .. })
        ));
    }

    #[test]
    fn test_language_change_resets_deck() {
        let mut state = state();
        fill(&mut state, 5);

        let cmd = state.set_language(Language::Spanish);
        assert!(matches!(
            cmd,
            Some(AsyncCommand::Prefetch { language: Language::Spanish, .. })
        ));
        assert!(state.feed.is_empty());
        assert!(state.set_language(Language::Spanish).is_none());
    }

    #[test]
    fn test_image_chain_requested_once_per_view() {
        let mut state = state();
        fill(&mut state, 5);

        assert!(matches!(
            state.next_image_work(),
            Some(AsyncCommand::ResolveImage { .. })
        ));
        assert!(state.next_image_work().is_none());

        // Chain found nothing: no retry while the same card is shown
        let generation = state.feed.generation();
        state.image_resolved(generation, "0", None);
        assert!(state.next_image_work().is_none());

        // A new card gets its own attempt
        state.swipe(SwipeAction::Like);
        assert!(matches!(
            state.next_image_work(),
            Some(AsyncCommand::ResolveImage { article, .. }) if article.id == "1"
        ));
    }

    #[test]
    fn test_image_from_previous_edition_is_dropped() {
        let mut state = state();
        fill(&mut state, 5);
        let Some(AsyncCommand::ResolveImage { generation, .. }) = state.next_image_work() else {
            panic!("expected image resolution");
        };

        state.set_language(Language::French);
        state.image_resolved(generation, "0", Some("https://img.example/en.png".to_string()));
        assert!(state.resolved_images.get("0").is_none());

        state.image_resolved(
            state.feed.generation(),
            "0",
            Some("https://img.example/fr.png".to_string()),
        );
        assert_eq!(state.resolved_images.get("0"), Some("https://img.example/fr.png"));
    }

    #[test]
    fn test_resolved_url_is_downloaded_once() {
        let mut state = state();
        fill(&mut state, 5);
        state.next_image_work();
        let generation = state.feed.generation();
        state.image_resolved(generation, "0", Some("https://img.example/0.png".to_string()));

        assert!(matches!(
            state.next_image_work(),
            Some(AsyncCommand::LoadImage { url }) if url == "https://img.example/0.png"
        ));
        assert!(state.next_image_work().is_none());

        state.image_failed("https://img.example/0.png");
        assert!(state.next_image_work().is_none());
    }

    #[test]
    fn test_bookmark_selection_follows_sort() {
        let mut state = state();
        state.bookmarks.add(Article::new("1", "Beta", "", None)).unwrap();
        state.bookmarks.add(Article::new("2", "Alpha", "", None)).unwrap();
        state.bookmarks.add(Article::new("3", "Gamma", "", None)).unwrap();

        state.view = View::Bookmarks;
        assert_eq!(state.selected_bookmark_article().unwrap().title, "Gamma");

        state.toggle_bookmark_sort();
        assert_eq!(state.selected_bookmark_article().unwrap().title, "Alpha");

        state.select_next_bookmark();
        state.remove_selected_bookmark();
        assert_eq!(state.bookmarks.len(), 2);
        assert!(!state.bookmarks.contains("1"));
    }
}
