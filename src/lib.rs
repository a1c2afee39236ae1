//! # SwipePedia 📚
//!
//! Swipe through random Wikipedia articles from your terminal.
//!
//! ## Overview
//!
//! SwipePedia deals random articles one card at a time. Like them, dislike
//! them, or bookmark them for later. Every card gets a picture, from the
//! article itself or from an image search when Wikipedia has none.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │     Sync draw loop + tokio worker talking over channels     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │      Feed       │ │     Images      │ │    Bookmarks    │
//! │                 │ │                 │ │                 │
//! │ • 5-card deck   │ │ • Provider chain│ │ • 50 saved max  │
//! │ • Refill at 3   │ │ • Download/LRU  │ │ • Sort views    │
//! │ • Reset on lang │ │ • Terminal draw │ │ • Persisted     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │       API       │ │    Database     │ │    Analytics    │
//! │                 │ │                 │ │                 │
//! │ • Wikipedia     │ │ • SQLite kv     │ │ • JSONL events  │
//! │ • DuckDuckGo    │ │                 │ │                 │
//! │ • Unsplash, ... │ │                 │ │                 │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — Wikipedia and image search clients
//! - [`app`] — TUI application state and event loop
//! - [`bookmarks`] — Saved articles
//! - [`config`] — Configuration management
//! - [`db`] — `SQLite` key-value store
//! - [`feed`] — The deck of upcoming articles
//! - [`images`] — Image resolution, download and caching
//! - [`analytics`] — Local event log
//! - [`models`] — Data models (Article, Language, ...)
//! - [`theme`] — Theme support via ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use swipepedia::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/swipepedia/0.1.0")]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::similar_names)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod analytics;
pub mod api;
pub mod app;
pub mod bookmarks;
pub mod config;
pub mod db;
pub mod feed;
pub mod images;
pub mod models;
pub mod paths;
pub mod theme;

// Re-export main types for convenience
pub use app::AppState;
pub use bookmarks::Bookmarks;
pub use config::Config;
pub use db::Database;
pub use feed::FeedBuffer;
pub use models::{Article, BookmarkSortOrder, Language, SwipeAction};
pub use theme::{Theme, ThemeColors};

/// ASCII logo for the application
pub const LOGO: &str = r"
  ___        _          ___        _ _
 / __|_ __ _(_)_ __  __| _ \___ __| (_)__ _
 \__ \ V  V / | '_ \/ -_)  _/ -_) _` | / _` |
 |___/\_/\_/|_| .__/\___|_| \___\__,_|_\__,_|
              |_|
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
