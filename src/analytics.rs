//! Write-only analytics sink
//!
//! Events are appended as JSON lines to a local file. Nothing reads them back;
//! failures are logged and otherwise ignored.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::paths;

/// An analytics event
#[derive(Debug, Clone)]
pub enum Event<'a> {
    /// App launched
    AppOpen,
    /// A card was shown
    ArticleView { title: &'a str },
    /// Like, dislike or bookmark on a card
    ArticleInteraction { action: &'a str, title: &'a str },
    /// Bookmark list changed
    BookmarkAction { action: &'a str, count: usize },
    /// Theme switched
    ThemeChange { theme: &'a str },
    /// Content language switched
    LanguageChange { language: &'a str },
}

impl Event<'_> {
    /// Event name as written to the log
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppOpen => "app_open",
            Self::ArticleView { .. } => "article_view",
            Self::ArticleInteraction { .. } => "article_interaction",
            Self::BookmarkAction { .. } => "bookmark_action",
            Self::ThemeChange { .. } => "theme_change",
            Self::LanguageChange { .. } => "language_change",
        }
    }

    fn params(&self) -> Value {
        match self {
            Self::AppOpen => json!({}),
            Self::ArticleView { title } => json!({ "title": title, "content_type": "article" }),
            Self::ArticleInteraction { action, title } => {
                json!({ "action_type": action, "article_title": title })
            }
            Self::BookmarkAction { action, count } => {
                json!({ "action_type": action, "bookmark_count": count })
            }
            Self::ThemeChange { theme } => json!({ "theme": theme }),
            Self::LanguageChange { language } => json!({ "selected_language": language }),
        }
    }
}

#[derive(Serialize)]
struct Record {
    id: Uuid,
    timestamp: DateTime<Utc>,
    name: &'static str,
    params: Value,
}

/// Fire-and-forget event logger
#[derive(Debug, Clone, Default)]
pub struct Analytics {
    path: Option<PathBuf>,
}

impl Analytics {
    /// Log to the default location, or nowhere when `enabled` is false
    pub fn open(enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }
        match paths::events_path() {
            Ok(path) => Self::to_path(path),
            Err(e) => {
                tracing::warn!("Analytics disabled: {e}");
                Self::disabled()
            }
        }
    }

    /// Log to a specific file
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A sink that drops every event
    pub const fn disabled() -> Self {
        Self { path: None }
    }

    /// Whether events are written anywhere
    pub const fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Record an event
    pub fn log(&self, event: &Event<'_>) {
        let Some(path) = &self.path else {
            return;
        };

        let record = Record {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            name: event.name(),
            params: event.params(),
        };

        if let Err(e) = append(path, &record) {
            tracing::warn!("Failed to log {} event: {e}", event.name());
        } else {
            tracing::debug!("Logged {} event", event.name());
        }
    }
}

fn append(path: &Path, record: &Record) -> anyhow::Result<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_events_are_appended_as_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let analytics = Analytics::to_path(&path);

        analytics.log(&Event::AppOpen);
        analytics.log(&Event::ArticleInteraction {
            action: "like",
            title: "Rust (programming language)",
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["name"], "app_open");
        assert_eq!(lines[1]["name"], "article_interaction");
        assert_eq!(lines[1]["params"]["action_type"], "like");
    }

    #[test]
    fn test_disabled_sink_writes_nothing() {
        let analytics = Analytics::disabled();
        assert!(!analytics.is_enabled());
        analytics.log(&Event::AppOpen);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let dir = tempdir().unwrap();
        let analytics = Analytics::to_path(dir.path().join("missing").join("events.jsonl"));
        analytics.log(&Event::AppOpen);
    }
}
